use std::fs;
use std::path::Path;

use log::info;

use super::{Site, SiteError};

const SITEMAP_NAMESPACE: &str = "https://www.sitemaps.org/schemas/sitemap/0.9";
const DEFAULT_ROBOTS: &str = "User-agent: *\nAllow: /\n";

pub fn sitemap_xml(base_url: &str, routes: &[&str]) -> String {
    let urls: Vec<String> = routes
        .iter()
        .map(|route| format!("  <url>\n    <loc>{base_url}{route}</loc>\n  </url>"))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"{SITEMAP_NAMESPACE}\">\n{}\n</urlset>\n",
        urls.join("\n")
    )
}

/// Points `robots.txt` at the sitemap, replacing an existing `Sitemap:` line
/// or appending one.
pub fn merge_robots(existing: Option<&str>, base_url: &str) -> String {
    let existing = existing.unwrap_or(DEFAULT_ROBOTS);
    let sitemap_line = format!("Sitemap: {base_url}/sitemap.xml");

    let merged = if existing.lines().any(|line| line.starts_with("Sitemap:")) {
        let mut replaced = false;
        existing
            .lines()
            .map(|line| {
                if !replaced && line.starts_with("Sitemap:") {
                    replaced = true;
                    sitemap_line.as_str()
                } else {
                    line
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        format!("{}\n{sitemap_line}\n", existing.trim())
    };
    format!("{}\n", merged.trim())
}

/// Writes `sitemap.xml` and `robots.txt` into `out_dir`, keeping any rules
/// already present in an existing `robots.txt`. Returns the number of URLs.
pub fn write_sitemap(site: &Site, out_dir: &Path) -> Result<usize, SiteError> {
    fs::create_dir_all(out_dir).map_err(SiteError::io(out_dir))?;

    let routes = site.routes.all_routes();
    let sitemap_path = out_dir.join("sitemap.xml");
    fs::write(&sitemap_path, sitemap_xml(&site.site_url, &routes))
        .map_err(SiteError::io(&sitemap_path))?;

    let robots_path = out_dir.join("robots.txt");
    let existing = match fs::read_to_string(&robots_path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(SiteError::io(&robots_path)(e)),
    };
    fs::write(&robots_path, merge_robots(existing.as_deref(), &site.site_url))
        .map_err(SiteError::io(&robots_path))?;

    info!("Sitemap generated with {} routes.", routes.len());
    Ok(routes.len())
}
