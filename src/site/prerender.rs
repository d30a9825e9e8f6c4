use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::{RenderResult, Site, SiteError, render};
use crate::core::RawInput;
use crate::prefs::PreferencesStore;

pub const INDEX_TEMPLATE: &str = include_str!("../../web/index.html");
pub const STYLES_CSS: &str = include_str!("../../web/styles.css");

const HEAD_PLACEHOLDER: &str = "<!--head-tags-->";
const APP_PLACEHOLDER: &str = "<!--app-html-->";
const EMPTY_ROOT: &str = r#"<div id="root"></div>"#;

/// Places a rendered page into an HTML template.
pub fn inject(template: &str, result: &RenderResult) -> String {
    let mut html = template.to_string();

    if !result.html_attributes.is_empty() {
        if let Some(start) = html.find("<html") {
            if let Some(len) = html[start..].find('>') {
                html.replace_range(
                    start..=start + len,
                    &format!("<html {}>", result.html_attributes),
                );
            }
        }
    }

    html = if html.contains(HEAD_PLACEHOLDER) {
        html.replacen(HEAD_PLACEHOLDER, &result.head_tags, 1)
    } else {
        html.replacen("</head>", &format!("{}\n</head>", result.head_tags), 1)
    };

    if html.contains(APP_PLACEHOLDER) {
        html.replacen(APP_PLACEHOLDER, &result.app_html, 1)
    } else {
        html.replacen(
            EMPTY_ROOT,
            &format!(r#"<div id="root">{}</div>"#, result.app_html),
            1,
        )
    }
}

/// `/` maps to `index.html`; every other route to `<route>/index.html`.
pub fn output_path(out_dir: &Path, route: &str) -> PathBuf {
    let relative = route.trim_start_matches('/');
    if relative.is_empty() {
        out_dir.join("index.html")
    } else {
        out_dir.join(relative).join("index.html")
    }
}

fn is_template(html: &str) -> bool {
    html.contains(APP_PLACEHOLDER) || html.contains(EMPTY_ROOT)
}

/// Uses `out_dir/index.html` when it still is an unrendered template.
pub fn load_template(out_dir: &Path) -> Result<String, SiteError> {
    let path = out_dir.join("index.html");
    match fs::read_to_string(&path) {
        Ok(html) if is_template(&html) => Ok(html),
        Ok(_) => {
            warn!(
                "{} has no app placeholder; using the built-in template",
                path.display()
            );
            Ok(INDEX_TEMPLATE.to_string())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(INDEX_TEMPLATE.to_string()),
        Err(e) => Err(SiteError::io(&path)(e)),
    }
}

/// Writes one HTML file per route plus the stylesheet. Returns the route
/// count.
pub fn prerender_all(site: &Site, out_dir: &Path) -> Result<usize, SiteError> {
    let template = load_template(out_dir)?;
    let prefs = PreferencesStore::ephemeral();
    let routes = site.routes.all_routes();

    for route in &routes {
        let result = render(site, route, &RawInput::new(), &prefs);
        let path = output_path(out_dir, route);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(SiteError::io(parent))?;
        }
        fs::write(&path, inject(&template, &result)).map_err(SiteError::io(&path))?;
    }

    let styles = out_dir.join("styles.css");
    fs::write(&styles, STYLES_CSS).map_err(SiteError::io(&styles))?;

    info!("Prerendered {} routes.", routes.len());
    Ok(routes.len())
}
