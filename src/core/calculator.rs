use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use super::engine::suppress;
use super::input::{RawInput, ValidationResult, parse_number};
use super::types::Outputs;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    /// DOM id of the form control.
    pub id: &'static str,
    /// Name used in raw input maps, query strings and API payloads.
    pub key: &'static str,
    pub label: &'static str,
    pub helper: &'static str,
    pub unit: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<&'static str>,
    pub default: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultLine {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub lines: Vec<ResultLine>,
    pub summary: String,
}

/// Numbers parsed from a raw input map; absent keys read as NaN.
#[derive(Debug, Clone, Default)]
pub struct ParsedInputs(BTreeMap<String, f64>);

impl ParsedInputs {
    pub fn from_raw(raw: &RawInput) -> Self {
        Self(
            raw.iter()
                .map(|(key, text)| (key.to_string(), parse_number(text)))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(f64::NAN)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: &'static str,
    pub valid: bool,
    pub errors: BTreeMap<&'static str, String>,
    pub values: serde_json::Value,
    pub results: Vec<ResultLine>,
    pub summary: String,
    /// The raw values the evaluation ran on, defaults filled in.
    pub inputs: RawInput,
}

impl Evaluation {
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }
}

pub trait Calculator: Send + Sync {
    fn id(&self) -> &'static str;
    fn intro(&self) -> &'static str;
    fn results_title(&self) -> &'static str;
    fn fields(&self) -> &'static [InputField];
    fn faqs(&self) -> &'static [Faq];
    fn evaluate(&self, raw: &RawInput) -> Evaluation;

    /// Fills keys missing from `raw` with the field defaults and drops keys
    /// this calculator does not know.
    fn resolve(&self, raw: &RawInput) -> RawInput {
        self.fields()
            .iter()
            .map(|field| (field.key, raw.get(field.key).unwrap_or(field.default)))
            .collect()
    }

    fn defaults(&self) -> RawInput {
        self.resolve(&RawInput::new())
    }
}

/// One calculator page: its form, validation, formula and presentation.
pub struct CalculatorDef<I, R> {
    pub id: &'static str,
    pub intro: &'static str,
    pub results_title: &'static str,
    pub fields: &'static [InputField],
    pub faqs: &'static [Faq],
    pub inputs: fn(&ParsedInputs) -> I,
    pub validate: fn(&I) -> ValidationResult,
    pub compute: fn(&I) -> R,
    pub present: fn(&I, &R) -> Presentation,
}

impl<I, R> Calculator for CalculatorDef<I, R>
where
    R: Outputs,
{
    fn id(&self) -> &'static str {
        self.id
    }

    fn intro(&self) -> &'static str {
        self.intro
    }

    fn results_title(&self) -> &'static str {
        self.results_title
    }

    fn fields(&self) -> &'static [InputField] {
        self.fields
    }

    fn faqs(&self) -> &'static [Faq] {
        self.faqs
    }

    fn evaluate(&self, raw: &RawInput) -> Evaluation {
        let resolved = self.resolve(raw);
        let inputs = (self.inputs)(&ParsedInputs::from_raw(&resolved));
        let outcome = suppress((self.validate)(&inputs), || (self.compute)(&inputs));
        if !outcome.is_valid() {
            debug!(
                "{}: suppressed results, invalid fields {:?}",
                self.id,
                outcome.validation.messages().keys().collect::<Vec<_>>()
            );
        }

        let presentation = (self.present)(&inputs, &outcome.result);
        Evaluation {
            id: self.id,
            valid: outcome.is_valid(),
            errors: outcome.validation.messages(),
            values: serde_json::to_value(&outcome.result).unwrap_or(serde_json::Value::Null),
            results: presentation.lines,
            summary: presentation.summary,
            inputs: resolved,
        }
    }
}
