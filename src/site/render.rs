//! Server-side rendering of every page into an HTML fragment plus head tags.

use std::fmt::Write;

use super::routes::{CalculatorMeta, PageMeta};
use super::seo::{HeadData, PageSeo};
use super::{Site, escape_html, structured_data};
use crate::core::{Calculator, Evaluation, InputField, RawInput};
use crate::prefs::PreferencesStore;

const DISCLAIMER: &str =
    "Results are estimates and for informational purposes only. This is not financial advice.";
const FOOTER_NOTE: &str = "Results are estimates and not financial advice.";
const NOT_FOUND_TITLE: &str = "Page not found | English Calculators";
const NOT_FOUND_DESCRIPTION: &str =
    "The page you are looking for was not found. Explore calculators instead.";
const NOT_FOUND_PATH: &str = "/404";
const FOOTER_POPULAR: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub app_html: String,
    pub head_tags: String,
    /// `key="value"` pairs for the `<html>` start tag.
    pub html_attributes: String,
    pub status: u16,
}

struct Page {
    body: String,
    head: HeadData,
    status: u16,
}

/// Renders `path` as the browser would see it after hydration. Calculator
/// pages take their inputs from `query`, falling back to field defaults.
pub fn render(site: &Site, path: &str, query: &RawInput, prefs: &PreferencesStore) -> RenderResult {
    let path = normalize_path(path);
    let page = page_for(site, &path, query);

    let mut head = page.head;
    head.html_attributes = prefs.html_attributes();

    RenderResult {
        app_html: layout(site, &path, &page.body),
        head_tags: head.to_tags(),
        html_attributes: head.html_attributes_string(),
        status: page.status,
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.strip_suffix("/index.html").unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn page_for(site: &Site, path: &str, query: &RawInput) -> Page {
    let routes = &site.routes;
    if path == routes.home().path {
        return home_page(site);
    }
    if path == routes.calculators_index().path {
        return calculators_index_page(site);
    }
    if let Some(meta) = routes.calculator_by_path(path) {
        if let Some(calculator) = site.calculator(&meta.page.id) {
            return calculator_page(site, meta, calculator, query);
        }
    }
    match routes.page_by_path(path) {
        Some(page) if page.id == "privacy" => legal_page(site, page, privacy_body(site)),
        Some(page) if page.id == "terms" => legal_page(site, page, terms_body(site)),
        Some(page) if page.id == "accessibility" => legal_page(site, page, accessibility_body(site)),
        _ => not_found_page(site),
    }
}

fn ok(head: HeadData, body: String) -> Page {
    Page {
        body,
        head,
        status: 200,
    }
}

fn layout(site: &Site, path: &str, body: &str) -> String {
    let info = &site.routes.site;
    let mut html = String::new();
    html.push_str(r##"<div class="app"><a class="skip-link" href="#main">Skip to main content</a>"##);
    let _ = write!(
        html,
        r#"<header class="site-header"><div class="container header-inner"><a href="/" class="logo">{}</a>"#,
        escape_html(&info.name)
    );
    html.push_str(r#"<nav class="nav" aria-label="Primary">"#);
    for (href, label) in [
        ("/calculators", "Calculators"),
        ("/privacy", "Privacy"),
        ("/terms", "Terms"),
        ("/accessibility", "Accessibility"),
    ] {
        let current = if path == href { r#" aria-current="page""# } else { "" };
        let _ = write!(html, r#"<a href="{href}"{current}>{label}</a>"#);
    }
    html.push_str("</nav></div></header>");

    html.push_str(r#"<main id="main" class="main"><div class="container">"#);
    html.push_str(&breadcrumbs(site, path));
    let _ = write!(
        html,
        r#"</div><div class="container main-content">{body}</div></main>"#
    );

    let _ = write!(
        html,
        r#"<footer class="footer"><div class="container footer-grid"><div><h3>{}</h3><p>{}</p><p class="field-helper">{FOOTER_NOTE}</p></div>"#,
        escape_html(&info.name),
        escape_html(&info.tagline)
    );
    html.push_str(r#"<div><h4>Popular calculators</h4><div class="inline-list">"#);
    for calculator in site.routes.popular_calculators().into_iter().take(FOOTER_POPULAR) {
        let _ = write!(
            html,
            r#"<a href="{}">{}</a>"#,
            escape_html(&calculator.page.path),
            escape_html(&calculator.page.title)
        );
    }
    html.push_str(
        r#"</div></div><div><h4>Trust &amp; legal</h4><div class="inline-list"><a href="/privacy">Privacy</a><a href="/terms">Terms</a><a href="/accessibility">Accessibility</a></div></div></div></footer></div>"#,
    );
    html
}

fn breadcrumbs(site: &Site, path: &str) -> String {
    let crumbs = site.routes.breadcrumbs(path);
    if crumbs.is_empty() {
        return String::new();
    }
    let mut html = String::from(r#"<nav class="breadcrumbs" aria-label="Breadcrumb"><ol>"#);
    let last = crumbs.len() - 1;
    for (index, crumb) in crumbs.iter().enumerate() {
        let label = escape_html(&crumb.breadcrumb);
        if index == last {
            let _ = write!(html, r#"<li><span aria-current="page">{label}</span></li>"#);
        } else {
            let _ = write!(
                html,
                r#"<li><a href="{}">{label}</a></li>"#,
                escape_html(&crumb.path)
            );
        }
    }
    html.push_str("</ol></nav>");
    html
}

fn card(calculator: &CalculatorMeta, action: &str) -> String {
    format!(
        r#"<a href="{}" class="card"><span class="tag">{}</span><h3>{}</h3><p>{}</p><span class="btn btn-ghost">{action}</span></a>"#,
        escape_html(&calculator.page.path),
        escape_html(&calculator.category),
        escape_html(&calculator.page.title),
        escape_html(&calculator.page.description),
    )
}

fn card_grid<'a>(calculators: impl IntoIterator<Item = &'a CalculatorMeta>, action: &str) -> String {
    let cards: String = calculators.into_iter().map(|c| card(c, action)).collect();
    format!(r#"<div class="card-grid">{cards}</div>"#)
}

fn calculator_link(site: &Site, id: &str) -> String {
    match site.routes.calculator_by_id(id) {
        Some(meta) => format!(
            r#"<a href="{}">{}</a>"#,
            escape_html(&meta.page.path),
            escape_html(&meta.page.title)
        ),
        None => String::new(),
    }
}

fn home_page(site: &Site) -> Page {
    let routes = &site.routes;
    let home = routes.home();
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<section class="hero"><h1>English calculators for personal finance and education ROI</h1><p>{} Get clear inputs, instant results, and quick guidance without the clutter.</p>"#,
        escape_html(&routes.site.description)
    );
    body.push_str(
        r#"<div class="hero-actions"><a href="/calculators" class="btn btn-primary">Explore calculators</a><a href="/calculators/compound-interest" class="btn btn-ghost">Start with compound interest</a></div>"#,
    );
    body.push_str(r#"<div class="badge-row">"#);
    for badge in [
        "Fast estimates",
        "No sign-up required",
        "WCAG-minded design",
        "Built for clarity",
    ] {
        let _ = write!(body, r#"<span class="badge">{badge}</span>"#);
    }
    body.push_str("</div></section>");

    let _ = write!(
        body,
        r#"<section class="section"><h2>Plan smarter with clear, practical estimates</h2><p>English Calculators is built for people who want straightforward answers without a wall of jargon. Each calculator focuses on one decision, gives you the right inputs, and explains the output in plain language. Use the {} to see how monthly savings grow, or the {} to understand how small fees add up over time. For debt planning, the {} helps you compare fixed-rate offers, while the {} shows how payment changes affect your timeline. If housing is on your mind, the {} includes taxes and insurance so the monthly total is more realistic.</p>"#,
        calculator_link(site, "compound-interest"),
        calculator_link(site, "investment-fee-impact"),
        calculator_link(site, "loan-payment"),
        calculator_link(site, "student-loan-payoff"),
        calculator_link(site, "mortgage-payment"),
    );
    let _ = write!(
        body,
        r#"<p>You can also translate income into a more useful hourly rate with the {}, which is helpful for comparing job offers or budgeting against monthly bills. Every tool includes an explanation and a short FAQ so you can understand the assumptions behind the numbers. Adjust the inputs, test best-case and conservative scenarios, and use the results as a starting point for your next decision.</p></section>"#,
        calculator_link(site, "salary-to-hourly"),
    );

    let _ = write!(
        body,
        r#"<section class="section"><h2>Popular calculators</h2>{}</section>"#,
        card_grid(routes.popular_calculators(), "Calculate now")
    );
    let _ = write!(
        body,
        r#"<section class="section"><h2>All calculators</h2>{}</section>"#,
        card_grid(&routes.calculators, "View details")
    );
    body.push_str(
        r#"<section class="section"><h2>Why people use English Calculators</h2><div class="card-grid"><div class="card"><h3>Focused on what matters</h3><p>Inputs are simple, defaults are realistic, and the results emphasize next steps.</p></div><div class="card"><h3>Built for accessibility</h3><p>Keyboard-friendly controls, visible focus states, and customizable contrast.</p></div><div class="card"><h3>SEO-friendly structure</h3><p>Each calculator includes explanations, FAQs, and structured data.</p></div></div></section>"#,
    );

    let head = HeadData::for_page(
        site,
        PageSeo {
            title: &home.title,
            description: &home.description,
            path: &home.path,
            structured_data: vec![
                structured_data::website(site),
                structured_data::organization(site),
            ],
            ..PageSeo::default()
        },
    );
    ok(head, body)
}

fn calculators_index_page(site: &Site) -> Page {
    let routes = &site.routes;
    let index = routes.calculators_index();
    let mut body = String::from(
        r#"<section class="section"><h1>All calculators</h1><p class="notice">Choose a calculator to explore your next financial step. Each tool includes a short explanation and FAQ so you can move with confidence.</p></section>"#,
    );
    let _ = write!(
        body,
        r#"<section class="section"><h2>Popular calculators</h2>{}</section>"#,
        card_grid(routes.popular_calculators(), "Open calculator")
    );
    for (category, items) in routes.categories() {
        let _ = write!(
            body,
            r#"<section class="section"><h2>{}</h2>{}</section>"#,
            escape_html(category),
            card_grid(items, "Open calculator")
        );
    }

    let head = HeadData::for_page(
        site,
        PageSeo {
            title: &index.title,
            description: &index.description,
            path: &index.path,
            ..PageSeo::default()
        },
    );
    ok(head, body)
}

fn field_html(field: &InputField, value: &str, error: Option<&str>) -> String {
    let helper_id = format!("{}-help", field.id);
    let error_id = format!("{}-error", field.id);
    let described_by = match error {
        Some(_) => format!("{helper_id} {error_id}"),
        None => helper_id.clone(),
    };
    let step = field
        .step
        .map(|step| format!(r#" step="{step}""#))
        .unwrap_or_default();

    let mut html = format!(
        r#"<div class="field"><label class="field-label" for="{id}">{label}</label><div class="field-control"><input id="{id}" name="{key}" type="number" inputmode="decimal" value="{value}"{step} aria-invalid="{invalid}" aria-describedby="{described_by}"><span class="field-unit">{unit}</span></div><p id="{helper_id}" class="field-helper">{helper}</p>"#,
        id = field.id,
        key = field.key,
        label = escape_html(field.label),
        value = escape_html(value),
        invalid = error.is_some(),
        unit = escape_html(field.unit),
        helper = escape_html(field.helper),
    );
    if let Some(error) = error {
        let _ = write!(
            html,
            r#"<p id="{error_id}" class="field-error" role="status" aria-live="polite">{}</p>"#,
            escape_html(error)
        );
    }
    html.push_str("</div>");
    html
}

fn results_panel(calculator: &dyn Calculator, evaluation: &Evaluation) -> String {
    let mut html = format!(
        r#"<section class="results-panel" aria-live="polite"><h2>{}</h2><div>"#,
        escape_html(calculator.results_title())
    );
    for line in &evaluation.results {
        let _ = write!(
            html,
            r#"<div class="result-item"><span>{}</span><div class="result-value">{}</div></div>"#,
            escape_html(line.label),
            escape_html(&line.value)
        );
    }
    html.push_str("</div>");
    // Errors not tied to a form field, such as an out-of-range result.
    let declared: Vec<&str> = calculator.fields().iter().map(|f| f.key).collect();
    for (key, message) in &evaluation.errors {
        if !declared.contains(key) {
            let _ = write!(
                html,
                r#"<p class="field-error" role="status">{}</p>"#,
                escape_html(message)
            );
        }
    }
    let _ = write!(
        html,
        r#"<p class="field-helper">{}</p></section>"#,
        escape_html(&evaluation.summary)
    );
    html
}

fn faq_html(calculator: &dyn Calculator) -> String {
    let faqs = calculator.faqs();
    if faqs.is_empty() {
        return String::new();
    }
    let mut html = String::from(
        r#"<section class="section faq" aria-label="Frequently asked questions"><h2>FAQ</h2>"#,
    );
    for faq in faqs {
        let _ = write!(
            html,
            "<details><summary>{}</summary><p>{}</p></details>",
            escape_html(faq.question),
            escape_html(faq.answer)
        );
    }
    html.push_str("</section>");
    html
}

fn calculator_page(
    site: &Site,
    meta: &CalculatorMeta,
    calculator: &dyn Calculator,
    query: &RawInput,
) -> Page {
    let evaluation = calculator.evaluate(query);
    let page = &meta.page;

    let mut body = format!(
        r#"<article class="section"><header class="section"><h1>{}</h1><p class="notice">{}</p></header>"#,
        escape_html(&page.title),
        escape_html(calculator.intro())
    );
    let _ = write!(
        body,
        r#"<section class="calc-grid"><div class="panel"><h2>Inputs</h2><form class="form-grid" method="get" action="{}">"#,
        escape_html(&page.path)
    );
    for field in calculator.fields() {
        let value = evaluation.inputs.get(field.key).unwrap_or(field.default);
        body.push_str(&field_html(field, value, evaluation.error(field.key)));
    }
    body.push_str(r#"<button type="submit" class="btn btn-primary">Calculate</button></form></div>"#);
    let _ = write!(
        body,
        r#"<div class="panel">{}<p class="disclaimer">{DISCLAIMER}</p></div></section>"#,
        results_panel(calculator, &evaluation)
    );
    body.push_str(&faq_html(calculator));
    let _ = write!(
        body,
        r#"<section class="section"><h2>Related calculators</h2>{}</section></article>"#,
        card_grid(site.routes.related_calculators(&page.id), "Open calculator")
    );

    let title = format!("{} | {}", page.title, site.routes.site.name);
    let crumbs = site.routes.breadcrumbs(&page.path);
    let head = HeadData::for_page(
        site,
        PageSeo {
            title: &title,
            description: &page.description,
            path: &page.path,
            structured_data: vec![
                structured_data::breadcrumb_list(site, &crumbs),
                structured_data::faq_page(calculator.faqs()),
            ],
            ..PageSeo::default()
        },
    );
    ok(head, body)
}

fn legal_page(site: &Site, page: &PageMeta, body: String) -> Page {
    let head = HeadData::for_page(
        site,
        PageSeo {
            title: &page.title,
            description: &page.description,
            path: &page.path,
            ..PageSeo::default()
        },
    );
    ok(head, body)
}

fn privacy_body(site: &Site) -> String {
    format!(
        r#"<section class="section"><h1>Privacy policy</h1><p class="notice">We keep this site lightweight and do not run third-party analytics, ads, or trackers. Your calculations stay in your browser.</p><h2>What we collect</h2><p>We do not collect personal information, and we do not store calculator inputs on our servers. Standard hosting logs may capture basic technical data such as IP address and request time.</p><h2>How we use data</h2><p>Any technical logs are used only to keep the site secure, diagnose outages, and improve performance. We do not sell data.</p><h2>Contact</h2><p>If you have privacy questions, email {}.</p></section>"#,
        escape_html(&site.routes.site.contact_email)
    )
}

fn terms_body(site: &Site) -> String {
    format!(
        r#"<section class="section"><h1>Terms of use</h1><p class="notice">By using {name}, you agree to these terms. The calculators provide estimates for educational purposes and are not financial advice.</p><h2>Use of information</h2><p>You are responsible for how you use the results. Always verify important financial decisions with qualified professionals.</p><h2>Availability</h2><p>We aim to keep the site reliable, but we do not guarantee uninterrupted access. Features may change without notice.</p><h2>Contact</h2><p>Questions about these terms? Email {email}.</p></section>"#,
        name = escape_html(&site.routes.site.name),
        email = escape_html(&site.routes.site.contact_email)
    )
}

fn accessibility_body(site: &Site) -> String {
    format!(
        r#"<section class="section"><h1>Accessibility statement</h1><p class="notice">{name} aims to meet WCAG 2.1 AA guidance. We build with semantic HTML, clear focus states, and adjustable display settings.</p><h2>Accessibility features</h2><ul><li>Keyboard-friendly navigation and visible focus indicators.</li><li>Skip link to jump directly to main content.</li><li>Form fields with labels, helper text, and live error messaging.</li><li>Optional high contrast mode, reduced motion, and larger text size.</li></ul><h2>Feedback</h2><p>If you encounter an accessibility barrier, let us know at {email}. We will respond within two business days.</p></section>"#,
        name = escape_html(&site.routes.site.name),
        email = escape_html(&site.routes.site.contact_email)
    )
}

fn not_found_page(site: &Site) -> Page {
    let body = String::from(
        r#"<section class="section"><h1>Page not found</h1><p class="notice">We could not find that page. Try the calculators index or head back to the home page.</p><div class="hero-actions"><a href="/calculators" class="btn btn-primary">View calculators</a><a href="/" class="btn btn-ghost">Go home</a></div></section>"#,
    );
    let head = HeadData::for_page(
        site,
        PageSeo {
            title: NOT_FOUND_TITLE,
            description: NOT_FOUND_DESCRIPTION,
            path: NOT_FOUND_PATH,
            ..PageSeo::default()
        },
    );
    Page {
        body,
        head,
        status: 404,
    }
}
