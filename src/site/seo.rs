use serde_json::Value;

use super::{Site, escape_html};

pub const SOCIAL_CARD_PATH: &str = "/social-card.svg";
const DEFAULT_OG_TYPE: &str = "website";

pub fn canonical(site_url: &str, path: &str) -> String {
    format!("{site_url}{path}")
}

pub fn default_social_image(site_url: &str) -> String {
    format!("{site_url}{SOCIAL_CARD_PATH}")
}

/// `<meta>` keyed either by `name` or by `property` (Open Graph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub attribute: &'static str,
    pub key: &'static str,
    pub content: String,
}

impl MetaTag {
    fn name(key: &'static str, content: impl Into<String>) -> Self {
        Self {
            attribute: "name",
            key,
            content: content.into(),
        }
    }

    fn property(key: &'static str, content: impl Into<String>) -> Self {
        Self {
            attribute: "property",
            key,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTag {
    pub rel: &'static str,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    pub kind: &'static str,
    pub json: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadData {
    pub title: String,
    pub meta: Vec<MetaTag>,
    pub links: Vec<LinkTag>,
    pub scripts: Vec<ScriptTag>,
    pub html_attributes: Vec<(&'static str, String)>,
}

/// What a page declares about itself for search engines and link previews.
#[derive(Debug, Clone, Default)]
pub struct PageSeo<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub path: &'a str,
    pub og_type: Option<&'a str>,
    pub image: Option<String>,
    pub structured_data: Vec<Value>,
}

impl HeadData {
    pub fn for_page(site: &Site, page: PageSeo<'_>) -> Self {
        let canonical = site.canonical(page.path);
        let image = page
            .image
            .unwrap_or_else(|| default_social_image(&site.site_url));
        let site_name = site.routes.site.name.clone();

        let meta = vec![
            MetaTag::name("description", page.description),
            MetaTag::property("og:title", page.title),
            MetaTag::property("og:description", page.description),
            MetaTag::property("og:url", canonical.clone()),
            MetaTag::property("og:type", page.og_type.unwrap_or(DEFAULT_OG_TYPE)),
            MetaTag::property("og:site_name", site_name),
            MetaTag::property("og:image", image.clone()),
            MetaTag::name("twitter:card", "summary_large_image"),
            MetaTag::name("twitter:title", page.title),
            MetaTag::name("twitter:description", page.description),
            MetaTag::name("twitter:image", image),
        ];

        let scripts = if page.structured_data.is_empty() {
            Vec::new()
        } else {
            vec![ScriptTag {
                kind: "application/ld+json",
                json: script_safe_json(&Value::Array(page.structured_data)),
            }]
        };

        Self {
            title: page.title.to_string(),
            meta,
            links: vec![LinkTag {
                rel: "canonical",
                href: canonical,
            }],
            scripts,
            html_attributes: Vec::new(),
        }
    }

    /// Serialised tags for the document head, one per line.
    pub fn to_tags(&self) -> String {
        let mut tags = Vec::with_capacity(1 + self.meta.len() + self.links.len());
        if !self.title.is_empty() {
            tags.push(format!("<title>{}</title>", escape_html(&self.title)));
        }
        for meta in &self.meta {
            tags.push(format!(
                r#"<meta {}="{}" content="{}">"#,
                meta.attribute,
                escape_html(meta.key),
                escape_html(&meta.content)
            ));
        }
        for link in &self.links {
            tags.push(format!(
                r#"<link rel="{}" href="{}">"#,
                escape_html(link.rel),
                escape_html(&link.href)
            ));
        }
        for script in &self.scripts {
            tags.push(format!(
                r#"<script type="{}">{}</script>"#,
                script.kind, script.json
            ));
        }
        tags.join("\n")
    }

    pub fn html_attributes_string(&self) -> String {
        attributes_string(&self.html_attributes)
    }
}

pub fn attributes_string(attributes: &[(&'static str, String)]) -> String {
    attributes
        .iter()
        .map(|(key, value)| format!(r#"{key}="{}""#, escape_html(value)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// JSON that cannot close the surrounding `<script>` element.
fn script_safe_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}
