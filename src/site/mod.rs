//! Static site tooling: route catalog, head tags, server-side rendering,
//! sitemap generation and prerendering.

mod error;
pub mod prerender;
pub mod render;
pub mod routes;
pub mod seo;
pub mod sitemap;
pub mod structured_data;

pub use error::SiteError;
pub use render::{RenderResult, render};
pub use routes::{CalculatorMeta, PageMeta, RouteCatalog, SiteInfo};

use crate::core::{Calculator, catalog};

/// Everything page generation needs: the routes, the calculators behind
/// them and the public base URL.
#[derive(Clone)]
pub struct Site {
    pub routes: RouteCatalog,
    pub calculators: &'static [&'static dyn Calculator],
    /// Normalised, without a trailing slash.
    pub site_url: String,
}

impl Site {
    pub fn load(site_url: impl Into<String>) -> Result<Self, SiteError> {
        let routes = RouteCatalog::embedded()?;
        let calculators = catalog();
        routes.check_against(calculators)?;
        Ok(Self {
            routes,
            calculators,
            site_url: site_url.into(),
        })
    }

    pub fn canonical(&self, path: &str) -> String {
        seo::canonical(&self.site_url, path)
    }

    pub fn calculator(&self, id: &str) -> Option<&'static dyn Calculator> {
        self.calculators.iter().copied().find(|c| c.id() == id)
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
pub(crate) fn test_site() -> Site {
    Site::load("https://calc.test").expect("embedded site")
}
