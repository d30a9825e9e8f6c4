//! schema.org JSON-LD documents.

use serde_json::{Value, json};

use super::routes::PageMeta;
use super::{Site, seo};
use crate::core::Faq;

const CONTEXT: &str = "https://schema.org";

pub fn website(site: &Site) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "WebSite",
        "name": site.routes.site.name,
        "url": site.site_url,
        "description": site.routes.site.description,
    })
}

pub fn organization(site: &Site) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "Organization",
        "name": site.routes.site.name,
        "url": site.site_url,
        "email": site.routes.site.contact_email,
        "logo": seo::default_social_image(&site.site_url),
    })
}

pub fn breadcrumb_list(site: &Site, crumbs: &[&PageMeta]) -> Value {
    let items: Vec<Value> = crumbs
        .iter()
        .enumerate()
        .map(|(index, crumb)| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "name": crumb.breadcrumb,
                "item": site.canonical(&crumb.path),
            })
        })
        .collect();
    json!({
        "@context": CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

pub fn faq_page(faqs: &[Faq]) -> Value {
    let questions: Vec<Value> = faqs
        .iter()
        .map(|faq| {
            json!({
                "@type": "Question",
                "name": faq.question,
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": faq.answer,
                },
            })
        })
        .collect();
    json!({
        "@context": CONTEXT,
        "@type": "FAQPage",
        "mainEntity": questions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::test_site;

    #[test]
    fn breadcrumb_positions_start_at_one() {
        let site = test_site();
        let crumbs = site.routes.breadcrumbs("/calculators/mortgage-payment");
        let doc = breadcrumb_list(&site, &crumbs);

        let items = doc["itemListElement"].as_array().expect("items");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["position"], 1);
        assert_eq!(items[0]["item"], "https://calc.test/");
        assert_eq!(items[2]["position"], 3);
        assert_eq!(items[2]["name"], "Mortgage Payment");
        assert_eq!(items[2]["item"], "https://calc.test/calculators/mortgage-payment");
    }

    #[test]
    fn faq_page_wraps_each_answer() {
        let faqs = [Faq {
            question: "Q?",
            answer: "A.",
        }];
        let doc = faq_page(&faqs);
        assert_eq!(doc["@type"], "FAQPage");
        assert_eq!(doc["mainEntity"][0]["name"], "Q?");
        assert_eq!(doc["mainEntity"][0]["acceptedAnswer"]["text"], "A.");
    }

    #[test]
    fn organization_uses_social_card_logo() {
        let site = test_site();
        let doc = organization(&site);
        assert_eq!(doc["logo"], "https://calc.test/social-card.svg");
        assert_eq!(doc["email"], "support@englishcalculators.com");
        assert_eq!(website(&site)["url"], "https://calc.test");
    }
}
