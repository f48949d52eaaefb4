//! Command-line driver for the theme controller.
//!
//! Every invocation simulates one page load of `--url` against a durable
//! [`FileStore`], so the preference carries over between runs exactly as it
//! would between page loads on the same origin.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use console::style;
use serde::Serialize;
use themekeeper::{
    system_theme, ControllerConfig, FileStore, Page, PageLocation, PreferenceStore, Theme,
    ThemeController, ToggleOutcome, VirtualPage,
};
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(author, version, about = "Resolve, apply and toggle a persisted light/dark theme")]
pub struct Args {
    /// JSON file holding preferences for every origin.
    #[arg(long, global = true, default_value = "themekeeper.json")]
    pub store: PathBuf,

    /// Page URL; its origin scopes the stored preference.
    #[arg(long, global = true, default_value = "http://localhost:8080/")]
    pub url: String,

    /// YAML controller configuration.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the stored preference without loading a page.
    Status,
    /// Load the page and apply the resolved theme.
    Init {
        /// Also print the resulting page markup.
        #[arg(long)]
        html: bool,
    },
    /// Load the page and click the theme toggle.
    Toggle {
        /// Number of clicks.
        #[arg(long, default_value_t = 1)]
        times: usize,
        /// Also print the resulting page markup.
        #[arg(long)]
        html: bool,
    },
    /// Show the operating system's color scheme.
    Detect,
}

#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Report {
    Status {
        origin: String,
        theme: Option<Theme>,
        raw: Option<String>,
    },
    Init {
        origin: String,
        theme: Theme,
        control: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        html: Option<String>,
    },
    Toggle {
        origin: String,
        outcomes: Vec<ToggleOutcome>,
        #[serde(skip_serializing_if = "Option::is_none")]
        html: Option<String>,
    },
    Detect {
        theme: Option<Theme>,
        error: Option<String>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ControllerConfig> {
    match path {
        Some(path) => {
            let config = ControllerConfig::from_path(path)
                .with_context(|| format!("load config {}", path.display()))?;
            info!(path = %path.display(), "loaded controller config");
            Ok(config)
        }
        None => {
            debug!("using default controller config");
            Ok(ControllerConfig::default())
        }
    }
}

fn load_page(url: &str) -> anyhow::Result<VirtualPage> {
    let location = PageLocation::parse(url).with_context(|| format!("parse page url {url}"))?;
    Ok(VirtualPage::new(location).with_stylesheet("dark-mode-css", "/css/dark.css", false))
}

fn snapshot(page: &VirtualPage, wanted: bool) -> anyhow::Result<Option<String>> {
    if !wanted {
        return Ok(None);
    }
    Ok(Some(page.render_html().context("render page")?))
}

fn detect() -> Report {
    match system_theme() {
        Ok(theme) => Report::Detect {
            theme: Some(theme),
            error: None,
        },
        Err(e) => {
            warn!(error = %e, "system color scheme unavailable");
            Report::Detect {
                theme: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Runs one command and describes what happened.
pub fn execute(args: &Args) -> anyhow::Result<Report> {
    if let Command::Detect = args.command {
        return Ok(detect());
    }

    let config = load_config(args.config.as_deref())?;
    let mut page = load_page(&args.url)?;
    let origin = page.location().origin();
    let store = FileStore::new(&args.store, origin.clone());
    debug!(store = %args.store.display(), %origin, "opened preference store");

    let report = match &args.command {
        Command::Detect => detect(),
        Command::Status => {
            let raw = store
                .get(&config.storage_key)
                .with_context(|| format!("read {}", args.store.display()))?;
            let theme = raw.as_deref().and_then(|value| value.parse().ok());
            Report::Status { origin, theme, raw }
        }
        Command::Init { html } => {
            let mut controller = ThemeController::with_config(store, config);
            let theme = controller.initialize(&mut page);
            let control = controller
                .control()
                .and_then(|handle| page.element(handle))
                .map(|el| el.text().to_string());
            Report::Init {
                origin,
                theme,
                control,
                html: snapshot(&page, *html)?,
            }
        }
        Command::Toggle { times, html } => {
            let mut controller = ThemeController::with_config(store, config);
            controller.initialize(&mut page);
            let control = controller
                .control()
                .context("page has no theme toggle to click")?;
            for _ in 0..*times {
                page.click(control);
            }
            debug!(clicks = *times, %control, "queued toggle clicks");
            let outcomes = controller.run_pending(&mut page);
            Report::Toggle {
                origin,
                outcomes,
                html: snapshot(&page, *html)?,
            }
        }
    };
    Ok(report)
}

fn styled_theme(theme: Theme) -> String {
    match theme {
        Theme::Dark => style(theme).magenta().bold().to_string(),
        Theme::Light => style(theme).yellow().bold().to_string(),
    }
}

/// Writes a report to stdout.
pub fn print(report: &Report, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    match report {
        Report::Status { origin, theme, raw } => match (theme, raw) {
            (Some(theme), _) => println!("{} {}", style(origin).dim(), styled_theme(*theme)),
            (None, Some(raw)) => println!(
                "{} {} {}",
                style(origin).dim(),
                style("unrecognized").red(),
                raw
            ),
            (None, None) => println!("{} {}", style(origin).dim(), style("unset").italic()),
        },
        Report::Init {
            origin,
            theme,
            control,
            html,
        } => {
            println!("{} {}", style(origin).dim(), styled_theme(*theme));
            if let Some(glyph) = control {
                println!("toggle {}", glyph);
            }
            if let Some(html) = html {
                println!("{}", html);
            }
        }
        Report::Toggle {
            origin,
            outcomes,
            html,
        } => {
            for outcome in outcomes {
                let mut line = format!(
                    "{} {} -> {}",
                    style(origin).dim(),
                    styled_theme(outcome.previous),
                    styled_theme(outcome.theme)
                );
                if !outcome.persisted {
                    line.push_str(&format!(" {}", style("(not saved)").red()));
                }
                if outcome.reload_scheduled {
                    line.push_str(&format!(" {}", style("(reload scheduled)").cyan()));
                }
                println!("{}", line);
            }
            if let Some(html) = html {
                println!("{}", html);
            }
        }
        Report::Detect { theme, error } => match (theme, error) {
            (Some(theme), _) => println!("system {}", styled_theme(*theme)),
            (None, error) => println!(
                "system {} {}",
                style("unknown").red(),
                error.as_deref().unwrap_or_default()
            ),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(dir: &TempDir, argv: &[&str]) -> Args {
        let store = dir.path().join("prefs.json");
        let mut full = vec!["themekeeper", "--store", store.to_str().unwrap()];
        full.extend_from_slice(argv);
        Args::parse_from(full)
    }

    #[test]
    fn test_status_unset_then_init_persists_light() {
        let dir = TempDir::new().unwrap();

        match execute(&args(&dir, &["status"])).unwrap() {
            Report::Status { theme, raw, origin } => {
                assert_eq!(origin, "http://localhost:8080");
                assert!(theme.is_none());
                assert!(raw.is_none());
            }
            other => panic!("unexpected report {:?}", other),
        }

        match execute(&args(&dir, &["init"])).unwrap() {
            Report::Init { theme, control, .. } => {
                assert_eq!(theme, Theme::Light);
                assert_eq!(control.as_deref(), Some("🌙"));
            }
            other => panic!("unexpected report {:?}", other),
        }

        match execute(&args(&dir, &["status"])).unwrap() {
            Report::Status { theme, .. } => assert_eq!(theme, Some(Theme::Light)),
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_toggle_persists_across_runs() {
        let dir = TempDir::new().unwrap();
        execute(&args(&dir, &["toggle"])).unwrap();

        match execute(&args(&dir, &["init", "--html"])).unwrap() {
            Report::Init { theme, html, .. } => {
                assert_eq!(theme, Theme::Dark);
                assert!(html.unwrap().contains("class=\"dark-mode\""));
            }
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_toggle_times_reports_each_click() {
        let dir = TempDir::new().unwrap();
        match execute(&args(&dir, &["toggle", "--times", "3"])).unwrap() {
            Report::Toggle { outcomes, .. } => {
                let themes: Vec<Theme> = outcomes.iter().map(|o| o.theme).collect();
                assert_eq!(themes, vec![Theme::Dark, Theme::Light, Theme::Dark]);
            }
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_origins_do_not_share_preferences() {
        let dir = TempDir::new().unwrap();
        execute(&args(&dir, &["--url", "https://a.example/", "toggle"])).unwrap();

        match execute(&args(&dir, &["--url", "https://b.example/", "status"])).unwrap() {
            Report::Status { theme, .. } => assert!(theme.is_none()),
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_config_enables_loopback_reload() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("themekeeper.yaml");
        fs::write(&config, "reload:\n  mode: loopback\n").unwrap();

        let argv = ["--config", config.to_str().unwrap(), "toggle"];
        match execute(&args(&dir, &argv)).unwrap() {
            Report::Toggle { outcomes, .. } => assert!(outcomes[0].reload_scheduled),
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.yaml");
        let argv = ["--config", missing.to_str().unwrap(), "status"];
        let err = execute(&args(&dir, &argv)).unwrap_err();
        assert!(err.to_string().contains("load config"));
    }

    #[test]
    fn test_bad_url_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = execute(&args(&dir, &["--url", "not a url", "status"])).unwrap_err();
        assert!(err.to_string().contains("parse page url"));
    }

    #[test]
    fn test_report_json_is_tagged() {
        let report = Report::Status {
            origin: "https://example.com".into(),
            theme: Some(Theme::Dark),
            raw: Some("dark".into()),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["command"], "status");
        assert_eq!(value["theme"], "dark");
    }
}
