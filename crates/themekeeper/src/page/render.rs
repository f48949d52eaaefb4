//! HTML snapshots of a [`VirtualPage`](super::VirtualPage).

use minijinja::{AutoEscape, Environment};
use once_cell::sync::Lazy;
use serde::Serialize;

use super::PageError;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html{% if root.classes %} class="{{ root.classes|join(' ') }}"{% endif %}{% for name, value in root.attributes|items %} {{ name }}="{{ value }}"{% endfor %}>
<head>
{%- for sheet in stylesheets %}
  <link rel="stylesheet" id="{{ sheet.id }}" href="{{ sheet.href }}"{% if not sheet.enabled %} disabled{% endif %}>
{%- endfor %}
</head>
<body>
{%- for el in elements recursive %}
  <{{ el.tag }}{% if el.id %} id="{{ el.id }}"{% endif %}{% if el.classes %} class="{{ el.classes|join(' ') }}"{% endif %}{% for name, value in el.attributes|items %} {{ name }}="{{ value }}"{% endfor %}>{{ el.text }}{{ loop(el.children) }}</{{ el.tag }}>
{%- endfor %}
</body>
</html>
"#;

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env
});

pub(crate) fn page_markup<T: Serialize>(snapshot: &T) -> Result<String, PageError> {
    Ok(ENV.render_str(PAGE_TEMPLATE, snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_markup_renders_empty_snapshot() {
        let snapshot = serde_json::json!({
            "root": { "classes": [], "attributes": {} },
            "stylesheets": [],
            "elements": [],
        });
        let html = page_markup(&snapshot).unwrap();
        assert!(html.contains("<html>"));
        assert!(html.contains("<body>"));
    }

    #[test]
    fn test_page_markup_escapes_attributes() {
        let snapshot = serde_json::json!({
            "root": { "classes": [], "attributes": {} },
            "stylesheets": [],
            "elements": [{
                "tag": "button",
                "id": "theme-toggle",
                "classes": [],
                "attributes": { "aria-label": "a \"quoted\" <label>" },
                "text": "",
                "children": [],
            }],
        });
        let html = page_markup(&snapshot).unwrap();
        assert!(!html.contains("<label>"));
        assert!(html.contains("&lt;label&gt;"));
    }

    #[test]
    fn test_page_markup_nests_children() {
        let snapshot = serde_json::json!({
            "root": { "classes": [], "attributes": {} },
            "stylesheets": [],
            "elements": [{
                "tag": "header",
                "id": null,
                "classes": [],
                "attributes": {},
                "text": "",
                "children": [{
                    "tag": "button",
                    "id": "theme-toggle",
                    "classes": [],
                    "attributes": {},
                    "text": "x",
                    "children": [],
                }],
            }],
        });
        let html = page_markup(&snapshot).unwrap();
        let header = html.find("<header>").unwrap();
        let button = html.find("<button id=\"theme-toggle\">x</button>").unwrap();
        let close = html.find("</header>").unwrap();
        assert!(header < button && button < close);
    }
}
