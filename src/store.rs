use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::core::{MAX_PERIOD_YEARS, Period, ProjectionInputs};

pub const INPUTS_KEY: &str = "inputs";

pub fn default_inputs() -> ProjectionInputs {
    ProjectionInputs {
        initial: 0.0,
        periods: vec![Period::new(10, 2000.0)],
        cap_rate: 0.1,
        inflation_rate: 0.05,
        income_tax_rate: 0.15,
        discount_rate: 0.08,
        roi_cap: 0.25,
        monte_carlo_enabled: false,
    }
}

// JSON-file key-value store holding the projection inputs under a stable
// key. Reads that fail for any reason fall back to the defaults; the caller
// never sees a load error.
pub struct InputsStore {
    path: PathBuf,
}

impl InputsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> ProjectionInputs {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return default_inputs();
        };
        let Ok(doc) = serde_json::from_str::<Value>(&raw) else {
            return default_inputs();
        };
        match doc.get(INPUTS_KEY) {
            Some(stored) => migrate_inputs(stored),
            None => default_inputs(),
        }
    }

    pub fn save(&self, inputs: &ProjectionInputs) -> Result<(), String> {
        let mut doc = fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
            .filter(Value::is_object)
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        let encoded = serde_json::to_value(inputs)
            .map_err(|e| format!("Failed to encode inputs: {e}"))?;
        doc[INPUTS_KEY] = encoded;

        let body = serde_json::to_string_pretty(&doc)
            .map_err(|e| format!("Failed to encode store: {e}"))?;
        fs::write(&self.path, body).map_err(|e| format!("Failed to write store: {e}"))
    }
}

// Upgrades whatever shape is on disk to the current inputs. The legacy
// layout carried two fixed period slots (years1/monthly1, years2/monthly2);
// the current layout carries an ordered `periods` list plus the newer rate
// fields. Migrating already-current data is a no-op.
pub fn migrate_inputs(stored: &Value) -> ProjectionInputs {
    let defaults = default_inputs();

    if stored.get("periods").is_some_and(Value::is_array) {
        return ProjectionInputs {
            initial: number_or(stored, "initial", defaults.initial),
            periods: parse_periods(&stored["periods"]),
            cap_rate: number_or(stored, "capRate", defaults.cap_rate),
            inflation_rate: number_or(stored, "inflationRate", defaults.inflation_rate),
            income_tax_rate: number_or(stored, "incomeTaxRate", defaults.income_tax_rate),
            discount_rate: number_or(stored, "discountRate", defaults.discount_rate),
            roi_cap: number_or(stored, "roiCap", defaults.roi_cap),
            monte_carlo_enabled: stored
                .get("monteCarloEnabled")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.monte_carlo_enabled),
        };
    }

    let mut periods = Vec::new();
    if let Some(period) = legacy_period(stored, "years1", "monthly1") {
        periods.push(period);
    }
    if let Some(period) = legacy_period(stored, "years2", "monthly2") {
        periods.push(period);
    }

    ProjectionInputs {
        initial: number_or(stored, "initial", 0.0),
        periods: if periods.is_empty() {
            defaults.periods.clone()
        } else {
            periods
        },
        cap_rate: number_or(stored, "capRate", defaults.cap_rate),
        inflation_rate: defaults.inflation_rate,
        income_tax_rate: defaults.income_tax_rate,
        discount_rate: defaults.discount_rate,
        roi_cap: defaults.roi_cap,
        monte_carlo_enabled: defaults.monte_carlo_enabled,
    }
}

fn parse_periods(value: &Value) -> Vec<Period> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .map(|entry| {
            Period::new(
                clamp_years(entry.get("years").and_then(Value::as_f64).unwrap_or(0.0)),
                entry
                    .get("monthly")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0)
                    .max(0.0),
            )
        })
        .collect()
}

// A legacy slot only exists when both of its keys are present; non-numeric
// values degrade to zero, which marks the period inactive.
fn legacy_period(stored: &Value, years_key: &str, monthly_key: &str) -> Option<Period> {
    let years = stored.get(years_key)?;
    let monthly = stored.get(monthly_key)?;
    Some(Period::new(
        clamp_years(years.as_f64().unwrap_or(0.0)),
        monthly.as_f64().unwrap_or(0.0).max(0.0),
    ))
}

fn clamp_years(raw: f64) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    (raw.floor() as u32).min(MAX_PERIOD_YEARS)
}

fn number_or(stored: &Value, key: &str, fallback: f64) -> f64 {
    stored
        .get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(fallback)
}
