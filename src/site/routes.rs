use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::SiteError;
use crate::core::Calculator;

const ROUTES_JSON: &str = include_str!("../../data/routes.json");

const HOME_ID: &str = "home";
const CALCULATORS_ID: &str = "calculators";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub contact_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub id: String,
    pub path: String,
    pub title: String,
    pub description: String,
    pub breadcrumb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorMeta {
    #[serde(flatten)]
    pub page: PageMeta,
    pub category: String,
    pub popular: bool,
    pub related: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalog {
    site: SiteInfo,
    core_pages: Vec<PageMeta>,
    legal_pages: Vec<PageMeta>,
    calculators: Vec<CalculatorMeta>,
}

/// Every page the site serves, with the lookups the layout and SEO need.
#[derive(Debug, Clone)]
pub struct RouteCatalog {
    pub site: SiteInfo,
    pub core_pages: Vec<PageMeta>,
    pub legal_pages: Vec<PageMeta>,
    pub calculators: Vec<CalculatorMeta>,
    home: usize,
    index: usize,
}

impl RouteCatalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self, SiteError> {
        Self::from_json(ROUTES_JSON)
    }

    pub fn from_json(text: &str) -> Result<Self, SiteError> {
        let raw: RawCatalog = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;

        let mut seen = BTreeSet::new();
        let pages = raw
            .core_pages
            .iter()
            .chain(&raw.legal_pages)
            .chain(raw.calculators.iter().map(|c| &c.page));
        for page in pages {
            if !page.path.starts_with('/') {
                return Err(SiteError::InvalidCatalog(format!(
                    "path {:?} of {} must start with '/'",
                    page.path, page.id
                )));
            }
            if !seen.insert(page.path.as_str()) {
                return Err(SiteError::InvalidCatalog(format!(
                    "duplicate path {}",
                    page.path
                )));
            }
        }

        let position = |id: &str| {
            raw.core_pages
                .iter()
                .position(|page| page.id == id)
                .ok_or_else(|| SiteError::InvalidCatalog(format!("missing core page {id}")))
        };
        let home = position(HOME_ID)?;
        let index = position(CALCULATORS_ID)?;
        if raw.core_pages[home].path != "/" {
            return Err(SiteError::InvalidCatalog(
                "home page must live at /".to_string(),
            ));
        }

        Ok(Self {
            site: raw.site,
            core_pages: raw.core_pages,
            legal_pages: raw.legal_pages,
            calculators: raw.calculators,
            home,
            index,
        })
    }

    /// Fails unless every descriptor has a route entry and vice versa.
    pub fn check_against(&self, calculators: &[&dyn Calculator]) -> Result<(), SiteError> {
        let described: BTreeSet<&str> = calculators.iter().map(|c| c.id()).collect();
        let routed: BTreeSet<&str> = self.calculators.iter().map(|c| c.page.id.as_str()).collect();
        if described == routed {
            return Ok(());
        }
        let missing: Vec<_> = described.symmetric_difference(&routed).collect();
        Err(SiteError::InvalidCatalog(format!(
            "calculators without both a descriptor and a route: {missing:?}"
        )))
    }

    pub fn home(&self) -> &PageMeta {
        &self.core_pages[self.home]
    }

    pub fn calculators_index(&self) -> &PageMeta {
        &self.core_pages[self.index]
    }

    /// Core pages, then legal pages, then calculators.
    pub fn all_routes(&self) -> Vec<&str> {
        self.core_pages
            .iter()
            .chain(&self.legal_pages)
            .chain(self.calculators.iter().map(|c| &c.page))
            .map(|page| page.path.as_str())
            .collect()
    }

    pub fn calculator_by_id(&self, id: &str) -> Option<&CalculatorMeta> {
        self.calculators.iter().find(|c| c.page.id == id)
    }

    pub fn calculator_by_path(&self, path: &str) -> Option<&CalculatorMeta> {
        self.calculators.iter().find(|c| c.page.path == path)
    }

    /// Core or legal page at `path`; calculators are looked up separately.
    pub fn page_by_path(&self, path: &str) -> Option<&PageMeta> {
        self.core_pages
            .iter()
            .chain(&self.legal_pages)
            .find(|page| page.path == path)
    }

    pub fn popular_calculators(&self) -> Vec<&CalculatorMeta> {
        self.calculators.iter().filter(|c| c.popular).collect()
    }

    pub fn related_calculators(&self, id: &str) -> Vec<&CalculatorMeta> {
        let Some(calculator) = self.calculator_by_id(id) else {
            return Vec::new();
        };
        calculator
            .related
            .iter()
            .filter_map(|related| self.calculator_by_id(related))
            .collect()
    }

    /// Calculators grouped by category, categories in first-seen order.
    pub fn categories(&self) -> Vec<(&str, Vec<&CalculatorMeta>)> {
        let mut groups: Vec<(&str, Vec<&CalculatorMeta>)> = Vec::new();
        for calculator in &self.calculators {
            match groups
                .iter_mut()
                .find(|(category, _)| *category == calculator.category)
            {
                Some((_, items)) => items.push(calculator),
                None => groups.push((calculator.category.as_str(), vec![calculator])),
            }
        }
        groups
    }

    pub fn breadcrumbs(&self, path: &str) -> Vec<&PageMeta> {
        let home = self.home();
        if path == home.path {
            return Vec::new();
        }
        let index = self.calculators_index();
        if path == index.path {
            return vec![home, index];
        }
        if path.starts_with("/calculators/") {
            if let Some(calculator) = self.calculator_by_path(path) {
                return vec![home, index, &calculator.page];
            }
        }
        match self.page_by_path(path) {
            Some(page) => vec![home, page],
            None => vec![home],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;

    fn routes() -> RouteCatalog {
        RouteCatalog::embedded().expect("embedded catalog")
    }

    fn crumb_paths(catalog: &RouteCatalog, path: &str) -> Vec<String> {
        catalog
            .breadcrumbs(path)
            .into_iter()
            .map(|page| page.path.clone())
            .collect()
    }

    #[test]
    fn embedded_catalog_matches_calculator_descriptors() {
        let routes = routes();
        routes.check_against(catalog()).expect("one route per calculator");
        assert_eq!(routes.all_routes().len(), 11);
        assert_eq!(routes.all_routes()[0], "/");
        assert_eq!(routes.site.name, "English Calculators");
    }

    #[test]
    fn breadcrumbs_follow_page_kind() {
        let routes = routes();
        assert!(crumb_paths(&routes, "/").is_empty());
        assert_eq!(crumb_paths(&routes, "/calculators"), vec!["/", "/calculators"]);
        assert_eq!(
            crumb_paths(&routes, "/calculators/loan-payment"),
            vec!["/", "/calculators", "/calculators/loan-payment"]
        );
        assert_eq!(crumb_paths(&routes, "/privacy"), vec!["/", "/privacy"]);
        assert_eq!(crumb_paths(&routes, "/calculators/unknown"), vec!["/"]);
        assert_eq!(crumb_paths(&routes, "/nowhere"), vec!["/"]);
    }

    #[test]
    fn lookups_by_id_and_path() {
        let routes = routes();
        let mortgage = routes
            .calculator_by_path("/calculators/mortgage-payment")
            .expect("mortgage route");
        assert_eq!(mortgage.page.id, "mortgage-payment");
        assert!(routes.calculator_by_id("mortgage-payment").is_some());
        assert!(routes.page_by_path("/terms").is_some());
        assert!(routes.page_by_path("/calculators/mortgage-payment").is_none());
    }

    #[test]
    fn related_calculators_skip_unknown_ids() {
        let mut routes = routes();
        routes.calculators[0]
            .related
            .insert(0, "retirement-planner".to_string());
        let related: Vec<_> = routes
            .related_calculators(&routes.calculators[0].page.id.clone())
            .into_iter()
            .map(|c| c.page.id.clone())
            .collect();
        assert_eq!(
            related,
            vec!["investment-fee-impact", "salary-to-hourly", "student-loan-payoff"]
        );
        assert!(routes.related_calculators("missing").is_empty());
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let routes = routes();
        let names: Vec<_> = routes.categories().iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["Saving & Investing", "Borrowing", "Housing", "Income"]
        );
        assert!(routes.popular_calculators().len() >= 3);
    }

    #[test]
    fn from_json_rejects_duplicate_paths_and_missing_home() {
        let duplicate = r#"{
            "site": {"name": "n", "tagline": "t", "description": "d", "contactEmail": "e"},
            "corePages": [
                {"id": "home", "path": "/", "title": "t", "description": "d", "breadcrumb": "b"},
                {"id": "calculators", "path": "/", "title": "t", "description": "d", "breadcrumb": "b"}
            ],
            "legalPages": [],
            "calculators": []
        }"#;
        assert!(matches!(
            RouteCatalog::from_json(duplicate),
            Err(SiteError::InvalidCatalog(_))
        ));

        let no_home = r#"{
            "site": {"name": "n", "tagline": "t", "description": "d", "contactEmail": "e"},
            "corePages": [],
            "legalPages": [],
            "calculators": []
        }"#;
        assert!(matches!(
            RouteCatalog::from_json(no_home),
            Err(SiteError::InvalidCatalog(_))
        ));
        assert!(matches!(
            RouteCatalog::from_json("{"),
            Err(SiteError::Catalog(_))
        ));
    }

    #[test]
    fn from_json_tolerates_byte_order_mark() {
        let text = format!("\u{feff}{ROUTES_JSON}");
        assert!(RouteCatalog::from_json(&text).is_ok());
    }
}
