use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use loan_risk_engine::LoanEngine;
use loan_risk_engine::api::{AppState, EmiResponse, PolicyInfo, create_router};
use loan_risk_engine::error::EngineError;
use loan_risk_engine::models::{ApplicantProfile, CreditHistory, Education, LoanTerms, MaritalStatus};
use loan_risk_engine::telemetry::{self, TelemetryError};

#[derive(Parser, Debug)]
#[command(
    name = "loan-engine",
    about = "Score loan applicants and calculate EMIs",
    version,
    allow_negative_numbers = true
)]
struct Cli {
    /// Directory holding policies/ and amortization.yaml
    #[arg(long, global = true, env = "LOAN_ENGINE_CONFIG", default_value = "./config")]
    config_dir: PathBuf,
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "LOAN_ENGINE_LOG", default_value = "info")]
    log_level: String,
    /// Address the HTTP service listens on
    #[arg(long, global = true, env = "LOAN_ENGINE_ADDR", default_value = "127.0.0.1:8080")]
    addr: SocketAddr,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve,
    /// Score one applicant under a policy
    Score(ScoreArgs),
    /// Calculate the monthly installment for a loan
    Emi(EmiArgs),
    /// List the loaded policies
    Policies,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Policy name
    #[arg(long, default_value = "threshold")]
    policy: String,
    /// Applicant's monthly income
    #[arg(long)]
    income: Decimal,
    /// Co-applicant's monthly income
    #[arg(long, default_value = "0")]
    coapplicant_income: Decimal,
    /// Requested loan amount
    #[arg(long)]
    loan_amount: Decimal,
    /// Credit history: good, bad, 1 or 0
    #[arg(long, value_parser = parse_credit_history)]
    credit_history: CreditHistory,
    /// Education: graduate or not_graduate
    #[arg(long, value_parser = parse_education)]
    education: Option<Education>,
    /// Marital status: married or single
    #[arg(long, value_parser = parse_marital_status)]
    marital_status: Option<MaritalStatus>,
}

#[derive(Args, Debug)]
struct EmiArgs {
    /// Loan principal
    #[arg(long)]
    principal: Decimal,
    /// Annual interest rate in percent
    #[arg(long)]
    rate: Decimal,
    /// Tenure in years
    #[arg(long)]
    tenure: Decimal,
    /// Print the month-by-month schedule
    #[arg(long)]
    schedule: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to render output: {0}")]
    Json(#[from] serde_json::Error),
}

fn parse_credit_history(raw: &str) -> Result<CreditHistory, String> {
    raw.parse().map_err(|e: EngineError| e.to_string())
}

fn parse_education(raw: &str) -> Result<Education, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "graduate" => Ok(Education::Graduate),
        "not_graduate" | "not-graduate" => Ok(Education::NotGraduate),
        other => Err(format!("'{other}' is not one of graduate, not_graduate")),
    }
}

fn parse_marital_status(raw: &str) -> Result<MaritalStatus, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "married" => Ok(MaritalStatus::Married),
        "single" => Ok(MaritalStatus::Single),
        other => Err(format!("'{other}' is not one of married, single")),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    let engine = LoanEngine::load(&cli.config_dir)?;
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(engine, cli.addr).await,
        Command::Score(args) => run_score(&engine, args),
        Command::Emi(args) => run_emi(&engine, args),
        Command::Policies => {
            let policies: Vec<PolicyInfo> =
                engine.config().policies().map(PolicyInfo::from).collect();
            print_json(&policies)
        }
    }
}

async fn run_server(engine: LoanEngine, addr: SocketAddr) -> Result<(), CliError> {
    let app = create_router(AppState::new(engine));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(addr = %addr, "loan engine listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn run_score(engine: &LoanEngine, args: ScoreArgs) -> Result<(), CliError> {
    let mut profile = ApplicantProfile::new(args.income, args.loan_amount, args.credit_history)
        .with_coapplicant_income(args.coapplicant_income);
    profile.education = args.education;
    profile.marital_status = args.marital_status;

    let result = engine.evaluate_application(&profile, &args.policy)?;
    print_json(&result)
}

fn run_emi(engine: &LoanEngine, args: EmiArgs) -> Result<(), CliError> {
    let places = engine.config().amortization().display_decimal_places;
    let terms = LoanTerms::new(args.principal, args.rate, args.tenure);

    let result = engine.calculate_installment(terms.principal, terms.annual_rate_percent, terms.tenure_years)?;
    let schedule = if args.schedule {
        Some(
            engine
                .repayment_schedule(&terms)?
                .iter()
                .map(|entry| entry.rounded(places))
                .collect(),
        )
    } else {
        None
    };

    print_json(&EmiResponse {
        summary: result.rounded(places),
        schedule,
    })
}
