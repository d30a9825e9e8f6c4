use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use thiserror::Error;

use crate::api;
use crate::config::{Overrides, SiteConfig};
use crate::core::{Calculator, Evaluation, RawInput, find};
use crate::prefs::{A11yUpdate, JsonFileStore, PreferencesStore, StaticMedia, TextSize, ThemeSetting};
use crate::site::{Site, SiteError, prerender, sitemap};

#[derive(Debug, Parser)]
#[command(name = "english-calculators", version, about = "Personal finance calculators and site tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the site and the JSON API.
    Serve {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        site_url: Option<String>,
    },
    /// Write sitemap.xml and robots.txt.
    Sitemap {
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        site_url: Option<String>,
    },
    /// Write one static HTML file per route.
    Prerender {
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        site_url: Option<String>,
    },
    /// Prerender every route, then write the sitemap.
    Build {
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        site_url: Option<String>,
    },
    /// Evaluate one calculator, e.g. `calc loan-payment amount=20000 rate=7`.
    Calc {
        id: String,
        values: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// List the calculators and their fields.
    List,
    /// Show or change saved theme and accessibility preferences.
    Prefs {
        #[arg(long, default_value = "preferences.json")]
        file: PathBuf,
        #[arg(long, value_enum, conflicts_with = "toggle_theme")]
        theme: Option<ThemeChoice>,
        #[arg(long)]
        toggle_theme: bool,
        #[arg(long, value_enum)]
        text_size: Option<TextSizeChoice>,
        #[arg(long)]
        high_contrast: Option<bool>,
        #[arg(long)]
        reduce_motion: Option<bool>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    System,
}

impl From<ThemeChoice> for ThemeSetting {
    fn from(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Light => ThemeSetting::Light,
            ThemeChoice::Dark => ThemeSetting::Dark,
            ThemeChoice::System => ThemeSetting::System,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum TextSizeChoice {
    Normal,
    Large,
}

impl From<TextSizeChoice> for TextSize {
    fn from(choice: TextSizeChoice) -> Self {
        match choice {
            TextSizeChoice::Normal => TextSize::Normal,
            TextSizeChoice::Large => TextSize::Large,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Site(#[from] SiteError),
    #[error("server error: {0}")]
    Server(#[source] std::io::Error),
    #[error("unknown calculator {0:?}; run `list` to see the available ids")]
    UnknownCalculator(String),
    #[error("expected key=value, got {0:?}")]
    InvalidAssignment(String),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Serve { port, site_url } => {
            let config = SiteConfig::from_env(Overrides {
                site_url,
                port,
                out_dir: None,
            });
            let site = Site::load(config.site_url)?;
            api::run_http_server(site, config.port)
                .await
                .map_err(CliError::Server)
        }
        Command::Sitemap { out_dir, site_url } => {
            let (site, out_dir) = load_for_output(site_url, out_dir)?;
            sitemap::write_sitemap(&site, &out_dir)?;
            Ok(())
        }
        Command::Prerender { out_dir, site_url } => {
            let (site, out_dir) = load_for_output(site_url, out_dir)?;
            prerender::prerender_all(&site, &out_dir)?;
            Ok(())
        }
        Command::Build { out_dir, site_url } => {
            let (site, out_dir) = load_for_output(site_url, out_dir)?;
            prerender::prerender_all(&site, &out_dir)?;
            sitemap::write_sitemap(&site, &out_dir)?;
            info!("Site written to {}", out_dir.display());
            Ok(())
        }
        Command::Calc { id, values, json } => {
            println!("{}", calc_output(&id, &values, json)?);
            Ok(())
        }
        Command::List => {
            let site = Site::load(SiteConfig::from_env(Overrides::default()).site_url)?;
            print!("{}", list_output(&site));
            Ok(())
        }
        Command::Prefs {
            file,
            theme,
            toggle_theme,
            text_size,
            high_contrast,
            reduce_motion,
        } => {
            let update = PrefsUpdate {
                theme: theme.map(ThemeSetting::from),
                toggle_theme,
                a11y: A11yUpdate {
                    text_size: text_size.map(TextSize::from),
                    high_contrast,
                    reduce_motion,
                },
            };
            print!("{}", prefs_output(&file, update));
            Ok(())
        }
    }
}

fn load_for_output(
    site_url: Option<String>,
    out_dir: Option<PathBuf>,
) -> Result<(Site, PathBuf), CliError> {
    let config = SiteConfig::from_env(Overrides {
        site_url,
        port: None,
        out_dir,
    });
    let site = Site::load(config.site_url)?;
    Ok((site, config.out_dir))
}

/// Splits `key=value` arguments. Later assignments to the same key win.
pub fn parse_assignments(values: &[String]) -> Result<RawInput, CliError> {
    let mut raw = RawInput::new();
    for value in values {
        let (key, text) = value
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| CliError::InvalidAssignment(value.clone()))?;
        raw.set(key.trim(), text);
    }
    Ok(raw)
}

pub fn calc_output(id: &str, values: &[String], json: bool) -> Result<String, CliError> {
    let calculator = find(id).ok_or_else(|| CliError::UnknownCalculator(id.to_string()))?;
    let raw = parse_assignments(values)?;
    for (key, _) in raw.iter() {
        if !calculator.fields().iter().any(|field| field.key == key) {
            warn!("{id} has no field {key:?}; ignoring it");
        }
    }

    let evaluation = calculator.evaluate(&raw);
    if json {
        Ok(serde_json::to_string_pretty(&evaluation)?)
    } else {
        Ok(evaluation_text(calculator, &evaluation))
    }
}

fn evaluation_text(calculator: &dyn Calculator, evaluation: &Evaluation) -> String {
    let mut lines = Vec::new();
    if !evaluation.valid {
        lines.push("Invalid input".to_string());
        for field in calculator.fields() {
            if let Some(message) = evaluation.error(field.key) {
                lines.push(format!("  {}: {message}", field.label));
            }
        }
        for (key, message) in &evaluation.errors {
            if !calculator.fields().iter().any(|field| field.key == *key) {
                lines.push(format!("  {message}"));
            }
        }
        return lines.join("\n");
    }

    lines.push(calculator.results_title().to_string());
    for result in &evaluation.results {
        lines.push(format!("  {}: {}", result.label, result.value));
    }
    lines.push(evaluation.summary.clone());
    lines.join("\n")
}

pub fn list_output(site: &Site) -> String {
    let mut out = String::new();
    for meta in &site.routes.calculators {
        let Some(calculator) = site.calculator(&meta.page.id) else {
            continue;
        };
        let keys: Vec<&str> = calculator.fields().iter().map(|field| field.key).collect();
        out.push_str(&format!(
            "{:<24} {}\n{:<24} fields: {}\n",
            meta.page.id,
            meta.page.title,
            "",
            keys.join(", ")
        ));
    }
    out
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PrefsUpdate {
    pub theme: Option<ThemeSetting>,
    pub toggle_theme: bool,
    pub a11y: A11yUpdate,
}

/// Applies `update` to the preferences saved in `file` and describes the
/// resulting `<html>` attributes.
pub fn prefs_output(file: &Path, update: PrefsUpdate) -> String {
    let store = JsonFileStore::new(file);
    info!("using preferences from {}", store.path().display());
    let mut prefs = PreferencesStore::new(Box::new(store), Arc::new(StaticMedia::default()));

    if let Some(theme) = update.theme {
        prefs.set_theme_setting(theme);
    }
    if update.toggle_theme {
        prefs.toggle_theme();
    }
    if update.a11y != A11yUpdate::default() {
        prefs.update_a11y(update.a11y);
    }

    prefs
        .html_attributes()
        .into_iter()
        .map(|(name, value)| format!("{name}={value}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::test_site;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["english-calculators", "serve", "--port", "3000"])
            .expect("serve parses");
        assert!(matches!(
            cli.command,
            Command::Serve {
                port: Some(3000),
                site_url: None
            }
        ));

        let cli = Cli::try_parse_from([
            "english-calculators",
            "calc",
            "loan-payment",
            "amount=1000",
            "--json",
        ])
        .expect("calc parses");
        match cli.command {
            Command::Calc { id, values, json } => {
                assert_eq!(id, "loan-payment");
                assert_eq!(values, vec!["amount=1000".to_string()]);
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(
            Cli::try_parse_from(["english-calculators", "prefs", "--theme", "dark", "--toggle-theme"])
                .is_err()
        );
    }

    #[test]
    fn parse_assignments_keeps_text_after_first_equals() {
        let raw = parse_assignments(&args(&["rate= 7", "note=a=b", "rate=8"])).expect("valid");
        assert_eq!(raw.get("rate"), Some("8"));
        assert_eq!(raw.get("note"), Some("a=b"));
    }

    #[test]
    fn parse_assignments_rejects_missing_key() {
        for bad in ["amount", "=5"] {
            let err = parse_assignments(&args(&[bad])).expect_err("invalid");
            assert!(matches!(err, CliError::InvalidAssignment(ref v) if v == bad));
        }
    }

    #[test]
    fn calc_output_prints_results() {
        let text = calc_output("loan-payment", &[], false).expect("known calculator");
        assert!(text.contains("  Monthly payment: $396.02"));
        assert!(text.contains("  Total interest: $3,761.44"));
        assert!(text.ends_with("This estimate assumes on-time monthly payments over the full term."));
    }

    #[test]
    fn calc_output_lists_errors_by_label() {
        let text = calc_output("salary-to-hourly", &args(&["hours=0"]), false).expect("known");
        assert_eq!(text, "Invalid input\n  Hours per week: Enter hours greater than 0.");
    }

    #[test]
    fn calc_output_json_matches_evaluation() {
        let text = calc_output("salary-to-hourly", &args(&["salary=52000"]), true).expect("known");
        let json: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(json["valid"], true);
        assert_eq!(json["values"]["hourly"], 25.0);
        assert_eq!(json["inputs"]["salary"], "52000");
        assert_eq!(json["inputs"]["hours"], "40");
    }

    #[test]
    fn calc_output_rejects_unknown_calculator() {
        let err = calc_output("retirement", &[], false).expect_err("unknown");
        assert!(matches!(err, CliError::UnknownCalculator(ref id) if id == "retirement"));
    }

    #[test]
    fn list_output_has_every_calculator() {
        let text = list_output(&test_site());
        assert_eq!(text.lines().count(), 12);
        assert!(text.starts_with("compound-interest"));
        assert!(text.contains("fields: homePrice, downPayment, rate, years, taxRate, insurance, hoa"));
    }

    #[test]
    fn prefs_output_persists_between_runs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("prefs").join("preferences.json");

        let first = prefs_output(
            &file,
            PrefsUpdate {
                theme: Some(ThemeSetting::Dark),
                a11y: A11yUpdate {
                    text_size: Some(TextSize::Large),
                    ..A11yUpdate::default()
                },
                ..PrefsUpdate::default()
            },
        );
        assert!(first.contains("data-theme=dark\n"));
        assert!(first.contains("data-text-size=large\n"));

        let second = prefs_output(
            &file,
            PrefsUpdate {
                toggle_theme: true,
                ..PrefsUpdate::default()
            },
        );
        assert!(second.contains("data-theme=light\n"));
        assert!(second.contains("data-text-size=large\n"));
        assert!(second.contains("data-high-contrast=false\n"));
    }
}
