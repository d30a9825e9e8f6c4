use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::{HeaderValue, StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::{Evaluation, InputField, RawInput};
use crate::prefs::PreferencesStore;
use crate::site::prerender::{INDEX_TEMPLATE, STYLES_CSS, inject};
use crate::site::sitemap::{merge_robots, sitemap_xml};
use crate::site::{Site, render};

/// A form value as sent by a client: the raw text, or a JSON number.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
struct EvaluatePayload(BTreeMap<String, FieldValue>);

impl From<EvaluatePayload> for RawInput {
    fn from(payload: EvaluatePayload) -> Self {
        payload
            .0
            .into_iter()
            .map(|(key, value)| (key, value.into_text()))
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculatorSummary<'a> {
    id: &'a str,
    path: &'a str,
    title: &'a str,
    category: &'a str,
    fields: &'static [InputField],
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

struct AppState {
    site: Site,
}

type SharedState = Arc<AppState>;

pub async fn run_http_server(site: Site, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let state = Arc::new(AppState { site });
    let app = Router::new()
        .route("/styles.css", get(styles_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler))
        .route("/api/calculators", get(calculators_handler))
        .route(
            "/api/calculators/:id",
            get(evaluate_get_handler).post(evaluate_post_handler),
        )
        .fallback(page_handler)
        .with_state(state);

    let listener = TcpListener::bind(addr).await?;
    info!("English Calculators listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn sitemap_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let site = &state.site;
    with_cache_control((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap_xml(&site.site_url, &site.routes.all_routes()),
    ))
}

async fn robots_handler(State(state): State<SharedState>) -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        merge_robots(None, &state.site.site_url),
    ))
}

async fn calculators_handler(State(state): State<SharedState>) -> Response {
    json_response(StatusCode::OK, calculator_summaries(&state.site))
}

async fn evaluate_get_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(raw): Query<RawInput>,
) -> Response {
    evaluate_handler_impl(&state.site, &id, &raw)
}

async fn evaluate_post_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<EvaluatePayload>,
) -> Response {
    evaluate_handler_impl(&state.site, &id, &payload.into())
}

fn evaluate_handler_impl(site: &Site, id: &str, raw: &RawInput) -> Response {
    match evaluate_request(site, id, raw) {
        Ok(evaluation) => json_response(StatusCode::OK, evaluation),
        Err(msg) => error_response(StatusCode::NOT_FOUND, &msg),
    }
}

async fn page_handler(
    State(state): State<SharedState>,
    uri: Uri,
    Query(raw): Query<RawInput>,
) -> Response {
    if uri.path().starts_with("/api/") {
        return error_response(StatusCode::NOT_FOUND, "Not found");
    }
    let (status, html) = render_page(&state.site, uri.path(), &raw);
    with_cache_control((status, Html(html)))
}

fn evaluate_request(site: &Site, id: &str, raw: &RawInput) -> Result<Evaluation, String> {
    let calculator = site
        .calculator(id)
        .ok_or_else(|| format!("Unknown calculator: {id}"))?;
    let evaluation = calculator.evaluate(raw);
    debug!("evaluated {id}: valid={}", evaluation.valid);
    Ok(evaluation)
}

fn calculator_summaries(site: &Site) -> Vec<CalculatorSummary<'_>> {
    site.routes
        .calculators
        .iter()
        .filter_map(|meta| {
            let calculator = site.calculator(&meta.page.id)?;
            Some(CalculatorSummary {
                id: calculator.id(),
                path: &meta.page.path,
                title: &meta.page.title,
                category: &meta.category,
                fields: calculator.fields(),
            })
        })
        .collect()
}

/// Full HTML document for `path`. Preferences are request-local defaults.
fn render_page(site: &Site, path: &str, raw: &RawInput) -> (StatusCode, String) {
    let prefs = PreferencesStore::ephemeral();
    let result = render(site, path, raw, &prefs);
    let status = StatusCode::from_u16(result.status).unwrap_or(StatusCode::OK);
    (status, inject(INDEX_TEMPLATE, &result))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn raw_input_from_json(json: &str) -> Result<RawInput, String> {
    let payload = serde_json::from_str::<EvaluatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(payload.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::test_site;

    #[test]
    fn raw_input_from_json_accepts_strings_and_numbers() {
        let raw = raw_input_from_json(r#"{"amount": 20000, "rate": "7", "years": 5.5}"#)
            .expect("valid payload");
        assert_eq!(raw.get("amount"), Some("20000"));
        assert_eq!(raw.get("rate"), Some("7"));
        assert_eq!(raw.get("years"), Some("5.5"));
    }

    #[test]
    fn raw_input_from_json_rejects_non_scalar_values() {
        let err = raw_input_from_json(r#"{"amount": true}"#).expect_err("bool is not a field");
        assert!(err.contains("Invalid API JSON payload"));
        assert!(raw_input_from_json("[1, 2]").is_err());
    }

    #[test]
    fn evaluate_request_fills_missing_fields_with_defaults() {
        let site = test_site();
        let raw = raw_input_from_json(r#"{"amount": 20000}"#).expect("valid payload");
        let evaluation = evaluate_request(&site, "loan-payment", &raw).expect("known id");
        assert!(evaluation.valid);
        assert_eq!(evaluation.results[0].value, "$396.02");

        let json = serde_json::to_value(&evaluation).expect("serialize");
        assert_eq!(json["id"], "loan-payment");
        assert_eq!(json["valid"], true);
        assert!(json["values"]["payment"].as_f64().expect("payment") > 396.0);
        assert_eq!(json["results"][0]["label"], "Monthly payment");
        assert_eq!(
            json["summary"],
            "This estimate assumes on-time monthly payments over the full term."
        );
    }

    #[test]
    fn evaluate_request_reports_field_errors() {
        let site = test_site();
        let raw = raw_input_from_json(r#"{"salary": "", "hours": 0}"#).expect("valid payload");
        let evaluation = evaluate_request(&site, "salary-to-hourly", &raw).expect("known id");
        let json = serde_json::to_value(&evaluation).expect("serialize");
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"]["salary"], "Enter a salary greater than 0.");
        assert_eq!(json["errors"]["hours"], "Enter hours greater than 0.");
        assert!(json["errors"].get("weeks").is_none());
        assert_eq!(json["values"]["hourly"], 0.0);
    }

    #[test]
    fn evaluate_request_rejects_unknown_calculator() {
        let site = test_site();
        let err = evaluate_request(&site, "retirement", &RawInput::new()).expect_err("unknown");
        assert_eq!(err, "Unknown calculator: retirement");
    }

    #[test]
    fn calculator_summaries_follow_route_order() {
        let site = test_site();
        let summaries = calculator_summaries(&site);
        let ids: Vec<_> = summaries.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                "compound-interest",
                "loan-payment",
                "mortgage-payment",
                "student-loan-payoff",
                "investment-fee-impact",
                "salary-to-hourly",
            ]
        );

        let json = serde_json::to_value(&summaries).expect("serialize");
        assert_eq!(json[2]["path"], "/calculators/mortgage-payment");
        assert_eq!(json[2]["fields"][0]["key"], "homePrice");
        assert_eq!(json[2]["fields"][0]["default"], "350000");
        assert!(json[0]["fields"][0].get("step").is_none());
        assert_eq!(json[0]["fields"][2]["step"], "0.01");
    }

    #[test]
    fn render_page_wraps_ssr_output_in_template() {
        let site = test_site();
        let raw: RawInput = [("payment", "500")].into_iter().collect();
        let (status, html) = render_page(&site, "/calculators/student-loan-payoff", &raw);
        assert_eq!(status, StatusCode::OK);
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>Student Loan Payoff Calculator | English Calculators</title>"));
        assert!(html.contains(r#"value="500""#));
        assert!(!html.contains("<!--app-html-->"));
    }

    #[test]
    fn render_page_returns_not_found_status() {
        let site = test_site();
        let (status, html) = render_page(&site, "/missing", &RawInput::new());
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("Page not found"));
    }
}
