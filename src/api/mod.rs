use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::{
    Complexity, InvestmentOption, Liquidity, MAX_PERIOD_YEARS, Period, ProjectionInputs,
    ProjectionRow, Risk, SortDirection, SortKey, SortSpec, TableQuery, XorShiftRng,
    default_catalog, query_rows, to_csv_string,
};
use crate::store::{InputsStore, default_inputs};

const DEFAULT_SEED: u64 = 42;

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Savings projection calculator over an investment option catalog"
)]
struct Cli {
    #[arg(long, default_value_t = 0.0, help = "Starting capital")]
    initial: f64,
    #[arg(
        long = "period",
        value_parser = parse_period_arg,
        help = "Contribution period as YEARS:MONTHLY; repeatable, applied in order"
    )]
    periods: Vec<Period>,
    #[arg(
        long,
        default_value_t = 0.1,
        help = "Annual rate cap applied to income estimation, fractional"
    )]
    cap_rate: f64,
    #[arg(
        long,
        default_value_t = 0.05,
        help = "Annual inflation assumption, fractional"
    )]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 0.15,
        help = "Tax rate applied to estimated income, fractional"
    )]
    income_tax_rate: f64,
    #[arg(
        long,
        default_value_t = 0.08,
        help = "Discount rate for present-value figures, fractional"
    )]
    discount_rate: f64,
    #[arg(
        long,
        default_value_t = 0.25,
        help = "Ceiling applied to instrument ROI before compounding, fractional"
    )]
    roi_cap: f64,
    #[arg(long, help = "Replace point forecasts with simulated percentile bands")]
    monte_carlo: bool,
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn parse_period_arg(raw: &str) -> Result<Period, String> {
    let Some((years_raw, monthly_raw)) = raw.split_once(':') else {
        return Err(format!("expected YEARS:MONTHLY, got {raw:?}"));
    };
    let years = years_raw
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("period years must be a whole number, got {years_raw:?}"))?;
    let monthly = monthly_raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("period monthly amount must be a number, got {monthly_raw:?}"))?;
    Ok(Period::new(years, monthly))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PeriodPayload {
    years: Option<f64>,
    monthly: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    initial: Option<f64>,
    periods: Option<Vec<PeriodPayload>>,
    cap_rate: Option<f64>,
    inflation_rate: Option<f64>,
    income_tax_rate: Option<f64>,
    discount_rate: Option<f64>,
    roi_cap: Option<f64>,
    monte_carlo_enabled: Option<bool>,
    seed: Option<u64>,

    search: Option<String>,
    category: Option<String>,
    subcategory: Option<String>,
    risk: Option<Risk>,
    liquidity: Option<Liquidity>,
    complexity: Option<Complexity>,
    sort_by: Option<SortKey>,
    sort_dir: Option<SortDirection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    inputs: ProjectionInputs,
    rows: Vec<ProjectionRow>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: &Cli) -> Result<ProjectionInputs, String> {
    let periods = if cli.periods.is_empty() {
        default_inputs().periods
    } else {
        cli.periods.clone()
    };
    normalize_inputs(ProjectionInputs {
        initial: cli.initial,
        periods,
        cap_rate: cli.cap_rate,
        inflation_rate: cli.inflation_rate,
        income_tax_rate: cli.income_tax_rate,
        discount_rate: cli.discount_rate,
        roi_cap: cli.roi_cap,
        monte_carlo_enabled: cli.monte_carlo,
    })
}

// Boundary normalization: the engine assumes well-formed input and performs
// no validation of its own, so everything is rejected or clamped here.
fn normalize_inputs(mut inputs: ProjectionInputs) -> Result<ProjectionInputs, String> {
    if !inputs.initial.is_finite() || inputs.initial < 0.0 {
        return Err("initial must be a finite value >= 0".to_string());
    }
    for period in &mut inputs.periods {
        if !period.monthly.is_finite() || period.monthly < 0.0 {
            return Err("period monthly amount must be a finite value >= 0".to_string());
        }
        period.years = period.years.min(MAX_PERIOD_YEARS);
    }
    inputs.cap_rate = unit_rate(inputs.cap_rate, "capRate")?;
    inputs.income_tax_rate = unit_rate(inputs.income_tax_rate, "incomeTaxRate")?;
    non_negative_rate(inputs.inflation_rate, "inflationRate")?;
    non_negative_rate(inputs.discount_rate, "discountRate")?;
    non_negative_rate(inputs.roi_cap, "roiCap")?;
    Ok(inputs)
}

fn unit_rate(value: f64, name: &str) -> Result<f64, String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{name} must be a finite value >= 0"));
    }
    Ok(value.min(1.0))
}

fn non_negative_rate(value: f64, name: &str) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{name} must be a finite value >= 0"));
    }
    Ok(())
}

fn period_from_payload(payload: &PeriodPayload) -> Result<Period, String> {
    let years = payload.years.unwrap_or(0.0);
    let monthly = payload.monthly.unwrap_or(0.0);
    if !years.is_finite() || years < 0.0 {
        return Err("period years must be a finite value >= 0".to_string());
    }
    if !monthly.is_finite() || monthly < 0.0 {
        return Err("period monthly amount must be a finite value >= 0".to_string());
    }
    Ok(Period::new(
        (years.floor() as u32).min(MAX_PERIOD_YEARS),
        monthly,
    ))
}

// Absent payload fields keep the base value, so a request can override any
// subset of the persisted inputs.
fn resolve_inputs(
    base: ProjectionInputs,
    payload: &ProjectPayload,
) -> Result<ProjectionInputs, String> {
    let mut candidate = base;
    if let Some(v) = payload.initial {
        candidate.initial = v;
    }
    if let Some(list) = &payload.periods {
        candidate.periods = list
            .iter()
            .map(period_from_payload)
            .collect::<Result<Vec<_>, _>>()?;
    }
    if let Some(v) = payload.cap_rate {
        candidate.cap_rate = v;
    }
    if let Some(v) = payload.inflation_rate {
        candidate.inflation_rate = v;
    }
    if let Some(v) = payload.income_tax_rate {
        candidate.income_tax_rate = v;
    }
    if let Some(v) = payload.discount_rate {
        candidate.discount_rate = v;
    }
    if let Some(v) = payload.roi_cap {
        candidate.roi_cap = v;
    }
    if let Some(v) = payload.monte_carlo_enabled {
        candidate.monte_carlo_enabled = v;
    }
    normalize_inputs(candidate)
}

fn resolve_query(payload: &ProjectPayload) -> TableQuery {
    TableQuery {
        search: payload
            .search
            .clone()
            .filter(|needle| !needle.trim().is_empty()),
        category: payload.category.clone(),
        subcategory: payload.subcategory.clone(),
        risk: payload.risk,
        liquidity: payload.liquidity,
        complexity: payload.complexity,
        sort: payload.sort_by.map(|key| SortSpec {
            key,
            direction: payload.sort_dir.unwrap_or(SortDirection::Ascending),
        }),
    }
}

#[derive(Clone)]
struct AppState {
    store: Arc<InputsStore>,
    catalog: Arc<Vec<InvestmentOption>>,
}

pub async fn run_http_server(port: u16, store_path: impl Into<PathBuf>) -> std::io::Result<()> {
    let state = AppState {
        store: Arc::new(InputsStore::new(store_path)),
        catalog: Arc::new(default_catalog()),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/options", get(options_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route(
            "/api/project.csv",
            get(project_csv_get_handler).post(project_csv_post_handler),
        )
        .route(
            "/api/inputs",
            get(inputs_get_handler).post(inputs_post_handler),
        )
        .fallback(not_found_handler)
        .with_state(state);

    let listener = TcpListener::bind(addr).await?;
    println!("nestegg HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/options");

    axum::serve(listener, app).await
}

// One-shot CSV export of the projection table, driven by CLI flags.
pub fn run_projection_export(raw_args: &[String]) -> Result<(), String> {
    let cli = Cli::try_parse_from(raw_args).map_err(|e| e.to_string())?;
    let inputs = build_inputs(&cli)?;
    let mut rng = XorShiftRng::new(cli.seed);
    let rows = query_rows(&default_catalog(), &inputs, &TableQuery::default(), &mut rng);
    let body = to_csv_string(&rows)?;
    print!("{body}");
    Ok(())
}

async fn options_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, state.catalog.as_ref())
}

async fn project_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<ProjectPayload>,
) -> Response {
    project_response(&state, payload)
}

async fn project_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> Response {
    project_response(&state, payload)
}

async fn project_csv_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<ProjectPayload>,
) -> Response {
    project_csv_response(&state, payload)
}

async fn project_csv_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> Response {
    project_csv_response(&state, payload)
}

async fn inputs_get_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, state.store.load())
}

async fn inputs_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> Response {
    let inputs = match resolve_inputs(state.store.load(), &payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    if let Err(msg) = state.store.save(&inputs) {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, &msg);
    }
    json_response(StatusCode::OK, inputs)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn project_response(state: &AppState, payload: ProjectPayload) -> Response {
    match evaluate_rows(state, &payload) {
        Ok((inputs, rows)) => json_response(StatusCode::OK, ProjectResponse { inputs, rows }),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn project_csv_response(state: &AppState, payload: ProjectPayload) -> Response {
    let rows = match evaluate_rows(state, &payload) {
        Ok((_, rows)) => rows,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    match to_csv_string(&rows) {
        Ok(body) => csv_response(body),
        Err(msg) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &msg),
    }
}

fn evaluate_rows(
    state: &AppState,
    payload: &ProjectPayload,
) -> Result<(ProjectionInputs, Vec<ProjectionRow>), String> {
    let inputs = resolve_inputs(state.store.load(), payload)?;
    let query = resolve_query(payload);
    let mut rng = XorShiftRng::new(payload.seed.unwrap_or(DEFAULT_SEED));
    let rows = query_rows(&state.catalog, &inputs, &query, &mut rng);
    Ok((inputs, rows))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn csv_response(body: String) -> Response {
    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
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
fn payload_from_json(json: &str) -> Result<ProjectPayload, String> {
    serde_json::from_str::<ProjectPayload>(json).map_err(|e| format!("Invalid API payload: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_store_state(name: &str) -> AppState {
        let path = std::env::temp_dir().join(format!(
            "nestegg-api-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        AppState {
            store: Arc::new(InputsStore::new(path)),
            catalog: Arc::new(default_catalog()),
        }
    }

    #[test]
    fn empty_payload_resolves_to_the_stored_defaults() {
        let inputs = resolve_inputs(default_inputs(), &ProjectPayload::default())
            .expect("defaults are valid");
        assert_eq!(inputs, default_inputs());
    }

    #[test]
    fn payload_fields_override_the_base_inputs() {
        let payload = payload_from_json(
            r#"{
                "initial": 2500,
                "periods": [{ "years": 5, "monthly": 3000 }, { "years": 15, "monthly": 1000 }],
                "capRate": 0.12,
                "monteCarloEnabled": true
            }"#,
        )
        .expect("parses");
        let inputs = resolve_inputs(default_inputs(), &payload).expect("valid");
        assert_eq!(inputs.initial, 2500.0);
        assert_eq!(
            inputs.periods,
            vec![Period::new(5, 3000.0), Period::new(15, 1000.0)]
        );
        assert_eq!(inputs.cap_rate, 0.12);
        assert!(inputs.monte_carlo_enabled);
        // Untouched fields keep their base values.
        assert_eq!(inputs.inflation_rate, default_inputs().inflation_rate);
    }

    #[test]
    fn period_years_clamp_to_the_domain_limit() {
        let payload = payload_from_json(r#"{ "periods": [{ "years": 35, "monthly": 100 }] }"#)
            .expect("parses");
        let inputs = resolve_inputs(default_inputs(), &payload).expect("valid");
        assert_eq!(inputs.periods, vec![Period::new(20, 100.0)]);
    }

    #[test]
    fn fractional_years_floor_to_whole_years() {
        let payload = payload_from_json(r#"{ "periods": [{ "years": 10.9, "monthly": 100 }] }"#)
            .expect("parses");
        let inputs = resolve_inputs(default_inputs(), &payload).expect("valid");
        assert_eq!(inputs.periods, vec![Period::new(10, 100.0)]);
    }

    #[test]
    fn unit_rates_clamp_to_one() {
        let payload = payload_from_json(r#"{ "capRate": 1.5, "incomeTaxRate": 2.0 }"#)
            .expect("parses");
        let inputs = resolve_inputs(default_inputs(), &payload).expect("valid");
        assert_eq!(inputs.cap_rate, 1.0);
        assert_eq!(inputs.income_tax_rate, 1.0);
    }

    #[test]
    fn negative_amounts_are_rejected_with_a_message() {
        let negative_initial =
            payload_from_json(r#"{ "initial": -1 }"#).expect("parses");
        let err = resolve_inputs(default_inputs(), &negative_initial).unwrap_err();
        assert!(err.contains("initial"));

        let negative_monthly =
            payload_from_json(r#"{ "periods": [{ "years": 5, "monthly": -10 }] }"#)
                .expect("parses");
        let err = resolve_inputs(default_inputs(), &negative_monthly).unwrap_err();
        assert!(err.contains("monthly"));

        let negative_rate = payload_from_json(r#"{ "discountRate": -0.05 }"#).expect("parses");
        let err = resolve_inputs(default_inputs(), &negative_rate).unwrap_err();
        assert!(err.contains("discountRate"));
    }

    #[test]
    fn query_resolution_defaults_sort_direction_to_ascending() {
        let payload = payload_from_json(r#"{ "sortBy": "forecastCapital" }"#).expect("parses");
        let query = resolve_query(&payload);
        let sort = query.sort.expect("sort requested");
        assert_eq!(sort.key, SortKey::ForecastCapital);
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn blank_search_is_dropped_from_the_query() {
        let payload = payload_from_json(r#"{ "search": "   " }"#).expect("parses");
        assert!(resolve_query(&payload).search.is_none());
    }

    #[test]
    fn evaluate_covers_the_whole_catalog_with_a_missing_store() {
        let state = missing_store_state("evaluate");
        let (inputs, rows) =
            evaluate_rows(&state, &ProjectPayload::default()).expect("evaluates");
        assert_eq!(inputs, default_inputs());
        assert_eq!(rows.len(), default_catalog().len());
    }

    #[test]
    fn monte_carlo_payload_produces_bands_for_every_row() {
        let state = missing_store_state("bands");
        let payload = payload_from_json(r#"{ "monteCarloEnabled": true }"#).expect("parses");
        let (_, rows) = evaluate_rows(&state, &payload).expect("evaluates");
        assert!(rows.iter().all(|r| r.result.bands.is_some()));
        for row in &rows {
            let bands = row.result.bands.expect("present");
            assert!(bands.p10 <= bands.p50 && bands.p50 <= bands.p90);
        }
    }

    #[test]
    fn identical_payloads_share_the_default_seed() {
        let state = missing_store_state("seeded");
        let payload = r#"{ "monteCarloEnabled": true }"#;
        let (_, first) =
            evaluate_rows(&state, &payload_from_json(payload).expect("parses")).expect("evaluates");
        let (_, second) =
            evaluate_rows(&state, &payload_from_json(payload).expect("parses")).expect("evaluates");
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.result.forecast_capital, b.result.forecast_capital);
        }
    }

    #[test]
    fn csv_of_the_catalog_has_a_header_and_one_line_per_row() {
        let state = missing_store_state("csv");
        let (_, rows) =
            evaluate_rows(&state, &ProjectPayload::default()).expect("evaluates");
        let body = to_csv_string(&rows).expect("serializes");
        assert_eq!(body.lines().count(), rows.len() + 1);
        assert!(body.starts_with("id,category"));
    }

    #[test]
    fn cli_defaults_build_valid_inputs() {
        let cli = Cli::try_parse_from(["nestegg"]).expect("parses with defaults");
        let inputs = build_inputs(&cli).expect("valid");
        assert_eq!(inputs, default_inputs());
    }

    #[test]
    fn cli_periods_apply_in_flag_order() {
        let cli = Cli::try_parse_from([
            "nestegg",
            "--period",
            "5:3000",
            "--period",
            "15:1000",
            "--monte-carlo",
        ])
        .expect("parses");
        let inputs = build_inputs(&cli).expect("valid");
        assert_eq!(
            inputs.periods,
            vec![Period::new(5, 3000.0), Period::new(15, 1000.0)]
        );
        assert!(inputs.monte_carlo_enabled);
    }

    #[test]
    fn malformed_period_flags_are_rejected() {
        assert!(parse_period_arg("banana").is_err());
        assert!(parse_period_arg("5").is_err());
        assert!(parse_period_arg("5:abc").is_err());
        assert!(parse_period_arg("-1:100").is_err());
        assert_eq!(parse_period_arg("10:2000"), Ok(Period::new(10, 2000.0)));
    }
}
