use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    CompoundingFrequency, ProjectionInput, ProjectionResult, project, solve_initial_from_target,
    solve_rate_from_final_target,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCompounding {
    Annually,
    Quarterly,
    Monthly,
    Daily,
}

impl From<CliCompounding> for CompoundingFrequency {
    fn from(value: CliCompounding) -> Self {
        match value {
            CliCompounding::Annually => CompoundingFrequency::Annually,
            CliCompounding::Quarterly => CompoundingFrequency::Quarterly,
            CliCompounding::Monthly => CompoundingFrequency::Monthly,
            CliCompounding::Daily => CompoundingFrequency::Daily,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiCompounding {
    #[serde(alias = "annual", alias = "yearly")]
    Annually,
    Quarterly,
    Monthly,
    Daily,
}

impl From<ApiCompounding> for CliCompounding {
    fn from(value: ApiCompounding) -> Self {
        match value {
            ApiCompounding::Annually => CliCompounding::Annually,
            ApiCompounding::Quarterly => CliCompounding::Quarterly,
            ApiCompounding::Monthly => CliCompounding::Monthly,
            ApiCompounding::Daily => CliCompounding::Daily,
        }
    }
}

impl From<CliCompounding> for ApiCompounding {
    fn from(value: CliCompounding) -> Self {
        match value {
            CliCompounding::Annually => ApiCompounding::Annually,
            CliCompounding::Quarterly => ApiCompounding::Quarterly,
            CliCompounding::Monthly => ApiCompounding::Monthly,
            CliCompounding::Daily => ApiCompounding::Daily,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    principal: Option<f64>,
    annual_rate: Option<f64>,
    compounding: Option<ApiCompounding>,
    years: Option<u32>,
    months: Option<u32>,
    deposit: Option<f64>,
    deposit_increase: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SolveRatePayload {
    target_balance: Option<f64>,
    principal: Option<f64>,
    compounding: Option<ApiCompounding>,
    years: Option<u32>,
    months: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SolveInitialPayload {
    target_balance: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "compound",
    about = "Compound interest projection engine (periodic deposits, inverse solvers, doubling time)"
)]
struct Cli {
    #[arg(long, default_value_t = 1000.0, help = "Starting balance")]
    principal: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Nominal annual interest rate in percent, e.g. 5"
    )]
    annual_rate: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliCompounding::Monthly,
        help = "Compounding frequency"
    )]
    compounding: CliCompounding,
    #[arg(long, default_value_t = 10, help = "Whole years to project")]
    years: u32,
    #[arg(
        long,
        default_value_t = 0,
        help = "Months beyond the whole years (0-11)"
    )]
    months: u32,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Deposit added at the end of every compounding period"
    )]
    deposit: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual growth of the periodic deposit in percent"
    )]
    deposit_increase: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    principal: f64,
    annual_rate: f64,
    compounding: ApiCompounding,
    years: u32,
    months: u32,
    deposit: f64,
    deposit_increase: f64,
    #[serde(flatten)]
    result: ProjectionResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveRateResponse {
    annual_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveInitialResponse {
    principal: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_input(cli: &Cli) -> Result<ProjectionInput, String> {
    if !cli.principal.is_finite() || cli.principal < 0.0 {
        return Err("--principal must be >= 0".to_string());
    }

    if !cli.annual_rate.is_finite() || cli.annual_rate <= -100.0 {
        return Err("--annual-rate must be > -100".to_string());
    }

    if cli.months > 11 {
        return Err("--months must be between 0 and 11".to_string());
    }

    if cli.years > 1_000 {
        return Err("--years must be <= 1000".to_string());
    }

    if !cli.deposit.is_finite() || cli.deposit < 0.0 {
        return Err("--deposit must be >= 0".to_string());
    }

    if !cli.deposit_increase.is_finite() || cli.deposit_increase < 0.0 {
        return Err("--deposit-increase must be >= 0".to_string());
    }

    Ok(ProjectionInput {
        principal: cli.principal,
        annual_rate_percent: cli.annual_rate,
        frequency: cli.compounding.into(),
        duration_years: cli.years as f64 + cli.months as f64 / 12.0,
        periodic_deposit: cli.deposit,
        annual_deposit_increase_percent: cli.deposit_increase,
    })
}

fn default_cli_for_api() -> Cli {
    Cli {
        principal: 1_000.0,
        annual_rate: 5.0,
        compounding: CliCompounding::Monthly,
        years: 10,
        months: 0,
        deposit: 0.0,
        deposit_increase: 0.0,
    }
}

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let input = build_input(&cli)?;
    let response = project_response(&cli, &input);
    let rendered =
        serde_json::to_string_pretty(&response).map_err(|e| format!("JSON encoding failed: {e}"))?;
    println!("{rendered}");
    Ok(())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route(
            "/api/solve-rate",
            get(solve_rate_get_handler).post(solve_rate_post_handler),
        )
        .route(
            "/api/solve-initial",
            get(solve_initial_get_handler).post(solve_initial_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("compound HTTP API listening on http://{addr}");
    info!("local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    let cli = cli_from_project_payload(payload);
    let input = match build_input(&cli) {
        Ok(input) => input,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    debug!(
        "projecting principal={} rate={} periods/yr={} duration={}",
        input.principal,
        input.annual_rate_percent,
        input.frequency.periods_per_year(),
        input.duration_years
    );
    json_response(StatusCode::OK, project_response(&cli, &input))
}

async fn solve_rate_get_handler(Query(payload): Query<SolveRatePayload>) -> Response {
    solve_rate_handler_impl(payload)
}

async fn solve_rate_post_handler(Json(payload): Json<SolveRatePayload>) -> Response {
    solve_rate_handler_impl(payload)
}

fn solve_rate_handler_impl(payload: SolveRatePayload) -> Response {
    let Some(target_balance) = payload.target_balance else {
        return error_response(StatusCode::BAD_REQUEST, "targetBalance is required");
    };

    let mut cli = default_cli_for_api();
    if let Some(v) = payload.principal {
        cli.principal = v;
    }
    if let Some(v) = payload.compounding {
        cli.compounding = v.into();
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.months {
        cli.months = v;
    }

    let input = match build_input(&cli) {
        Ok(input) => input,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    match solve_rate_from_final_target(
        target_balance,
        input.principal,
        input.frequency,
        input.duration_years,
    ) {
        Ok(annual_rate) => json_response(StatusCode::OK, SolveRateResponse { annual_rate }),
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

async fn solve_initial_get_handler(Query(payload): Query<SolveInitialPayload>) -> Response {
    solve_initial_handler_impl(payload)
}

async fn solve_initial_post_handler(Json(payload): Json<SolveInitialPayload>) -> Response {
    solve_initial_handler_impl(payload)
}

fn solve_initial_handler_impl(payload: SolveInitialPayload) -> Response {
    let Some(target_balance) = payload.target_balance else {
        return error_response(StatusCode::BAD_REQUEST, "targetBalance is required");
    };
    if !target_balance.is_finite() {
        return error_response(StatusCode::BAD_REQUEST, "targetBalance must be finite");
    }

    json_response(
        StatusCode::OK,
        SolveInitialResponse {
            principal: solve_initial_from_target(target_balance),
        },
    )
}

fn cli_from_project_payload(payload: ProjectPayload) -> Cli {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.principal {
        cli.principal = v;
    }
    if let Some(v) = payload.annual_rate {
        cli.annual_rate = v;
    }
    if let Some(v) = payload.compounding {
        cli.compounding = v.into();
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.months {
        cli.months = v;
    }
    if let Some(v) = payload.deposit {
        cli.deposit = v;
    }
    if let Some(v) = payload.deposit_increase {
        cli.deposit_increase = v;
    }

    cli
}

fn project_response(cli: &Cli, input: &ProjectionInput) -> ProjectResponse {
    ProjectResponse {
        principal: input.principal,
        annual_rate: input.annual_rate_percent,
        compounding: cli.compounding.into(),
        years: cli.years,
        months: cli.months,
        deposit: input.periodic_deposit,
        deposit_increase: input.annual_deposit_increase_percent,
        result: project(input),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
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
mod tests {
    use super::*;
    use crate::core::{DoublingOutcome, SolveRateError};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn payload_from_json(json: &str) -> ProjectPayload {
        serde_json::from_str(json).expect("payload should parse")
    }

    #[test]
    fn build_input_folds_years_and_months_into_a_fractional_duration() {
        let mut cli = default_cli_for_api();
        cli.years = 2;
        cli.months = 6;

        let input = build_input(&cli).expect("valid input");
        assert_approx(input.duration_years, 2.5);
    }

    #[test]
    fn build_input_rejects_negative_principal() {
        let mut cli = default_cli_for_api();
        cli.principal = -1.0;

        let err = build_input(&cli).expect_err("must reject negative principal");
        assert!(err.contains("--principal"));
    }

    #[test]
    fn build_input_rejects_out_of_range_months() {
        let mut cli = default_cli_for_api();
        cli.months = 12;

        let err = build_input(&cli).expect_err("must reject 12 months");
        assert!(err.contains("--months"));
    }

    #[test]
    fn build_input_rejects_rates_at_or_below_total_loss() {
        let mut cli = default_cli_for_api();
        cli.annual_rate = -100.0;

        let err = build_input(&cli).expect_err("must reject -100 rate");
        assert!(err.contains("--annual-rate"));
    }

    #[test]
    fn build_input_rejects_negative_deposits_and_increases() {
        let mut cli = default_cli_for_api();
        cli.deposit = -5.0;
        assert!(build_input(&cli).is_err());

        let mut cli = default_cli_for_api();
        cli.deposit_increase = -1.0;
        assert!(build_input(&cli).is_err());
    }

    #[test]
    fn project_payload_parses_web_keys() {
        let payload = payload_from_json(
            r#"{
              "principal": 2500,
              "annualRate": 4.2,
              "compounding": "quarterly",
              "years": 8,
              "months": 6,
              "deposit": 100,
              "depositIncrease": 2
            }"#,
        );
        let cli = cli_from_project_payload(payload);
        let input = build_input(&cli).expect("valid input");

        assert_approx(input.principal, 2_500.0);
        assert_approx(input.annual_rate_percent, 4.2);
        assert_eq!(input.frequency, CompoundingFrequency::Quarterly);
        assert_approx(input.duration_years, 8.5);
        assert_approx(input.periodic_deposit, 100.0);
        assert_approx(input.annual_deposit_increase_percent, 2.0);
    }

    #[test]
    fn project_payload_accepts_compounding_aliases() {
        let payload = payload_from_json(r#"{ "compounding": "annual" }"#);
        let cli = cli_from_project_payload(payload);
        assert_eq!(cli.compounding, CliCompounding::Annually);
    }

    #[test]
    fn missing_payload_fields_fall_back_to_defaults() {
        let cli = cli_from_project_payload(payload_from_json("{}"));
        let input = build_input(&cli).expect("defaults are valid");

        assert_approx(input.principal, 1_000.0);
        assert_approx(input.annual_rate_percent, 5.0);
        assert_eq!(input.frequency, CompoundingFrequency::Monthly);
        assert_approx(input.duration_years, 10.0);
        assert_approx(input.periodic_deposit, 0.0);
    }

    #[test]
    fn project_response_serializes_camel_case_with_tagged_doubling() {
        let cli = default_cli_for_api();
        let input = build_input(&cli).expect("valid input");
        let response = project_response(&cli, &input);

        let value = serde_json::to_value(&response).expect("serializable");
        assert!(value.get("finalBalance").is_some());
        assert!(value.get("totalInterest").is_some());
        assert!(value.get("totalDeposits").is_some());
        assert!(value.get("yearlyBreakdown").is_some());
        assert_eq!(value["compounding"], "monthly");
        assert_eq!(value["timeToDouble"]["status"], "reached");
        assert_eq!(value["timeToDouble"]["years"], 13);
        assert_eq!(value["timeToDouble"]["months"], 10);
    }

    #[test]
    fn undefined_doubling_serializes_as_a_bare_status() {
        let outcome = DoublingOutcome::Undefined;
        let value = serde_json::to_value(outcome).expect("serializable");
        assert_eq!(value["status"], "undefined");

        let value = serde_json::to_value(DoublingOutcome::CapReached).expect("serializable");
        assert_eq!(value["status"], "capReached");
    }

    #[test]
    fn solve_rate_error_messages_name_the_degenerate_input() {
        assert!(
            SolveRateError::ZeroPrincipal
                .to_string()
                .contains("principal")
        );
        assert!(
            SolveRateError::NonPositiveTarget
                .to_string()
                .contains("target")
        );
    }
}
