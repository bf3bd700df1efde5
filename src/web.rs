// 🌐 Web assets - HTML views and static files compiled into the binary

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WebError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("static asset not found: {0}")]
    AssetNotFound(String),
}

/// An embedded static file
#[derive(Debug, Clone, Copy)]
pub struct StaticAsset {
    pub content_type: &'static str,
    pub bytes: &'static [u8],
}

const TEMPLATES: &[(&str, &str)] = &[
    ("table.html", include_str!("../web/templates/table.html")),
    ("settings.html", include_str!("../web/templates/settings.html")),
    ("api-setup.html", include_str!("../web/templates/api-setup.html")),
];

const STATIC_FILES: &[(&str, &[u8])] = &[
    ("style.css", include_bytes!("../web/static/style.css")),
    ("app.js", include_bytes!("../web/static/app.js")),
    ("settings.js", include_bytes!("../web/static/settings.js")),
    ("favicon.svg", include_bytes!("../web/static/favicon.svg")),
];

/// Render an HTML view by template name
pub fn render_template(name: &str) -> Result<&'static str, WebError> {
    TEMPLATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, html)| *html)
        .ok_or_else(|| WebError::TemplateNotFound(name.to_string()))
}

/// Resolve a request path such as `/static/style.css` to an embedded file
pub fn resolve_static(path: &str) -> Result<StaticAsset, WebError> {
    let name = path.trim_start_matches('/');
    let name = name.strip_prefix("static/").unwrap_or(name);

    STATIC_FILES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(n, bytes)| StaticAsset {
            content_type: content_type_for(n),
            bytes,
        })
        .ok_or_else(|| WebError::AssetNotFound(path.to_string()))
}

fn content_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("html") => "text/html; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_known_templates() {
        for name in ["table.html", "settings.html", "api-setup.html"] {
            let html = render_template(name).unwrap();
            assert!(html.contains("<html"), "{} should be an HTML page", name);
        }
    }

    #[test]
    fn test_render_unknown_template() {
        assert_eq!(
            render_template("missing.html"),
            Err(WebError::TemplateNotFound("missing.html".to_string()))
        );
    }

    #[test]
    fn test_resolve_static_by_request_path() {
        let css = resolve_static("/static/style.css").unwrap();
        assert_eq!(css.content_type, "text/css; charset=utf-8");
        assert!(!css.bytes.is_empty());

        let js = resolve_static("/static/app.js").unwrap();
        assert!(js.content_type.starts_with("application/javascript"));
    }

    #[test]
    fn test_resolve_static_rejects_unknown_and_traversal() {
        assert!(resolve_static("/static/nope.css").is_err());
        assert!(resolve_static("/static/../Cargo.toml").is_err());
    }
}
