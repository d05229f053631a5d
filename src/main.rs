use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use loanmatch::config::AppConfig;
use loanmatch::error::AppError;
use loanmatch::matching::{
    matching_router, BorrowerProfile, Catalogue, EmploymentType, Recommendation,
    RecommendationEngine, RecommendationService, ScoringPolicy,
};
use loanmatch::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Loan Offer Advisor",
    about = "Rank lender offers against a borrower's loan request",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a one-shot ranked recommendation table for a borrower
    Recommend(RecommendArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Borrower credit score (300-900)
    #[arg(long)]
    credit_score: u16,
    /// Gross monthly income
    #[arg(long)]
    monthly_income: f64,
    /// Borrower age in years
    #[arg(long)]
    age: u8,
    /// Employment category (salaried, self_employed, business, student, retired)
    #[arg(long, value_parser = parse_employment)]
    employment: EmploymentType,
    /// Requested loan amount
    #[arg(long)]
    amount: f64,
    /// Requested repayment term in months
    #[arg(long)]
    term_months: u32,
    /// Stated loan purpose
    #[arg(long, default_value = "")]
    purpose: String,
    /// Optional lender catalogue CSV (defaults to the bundled catalogue)
    #[arg(long)]
    catalogue: Option<PathBuf>,
    /// Limit output to the top N offers
    #[arg(long)]
    top: Option<usize>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Recommend(args) => run_recommendation(args),
    }
}

fn parse_employment(raw: &str) -> Result<EmploymentType, String> {
    EmploymentType::parse(raw).ok_or_else(|| {
        format!("'{raw}' is not one of salaried, self_employed, business, student, retired")
    })
}

fn load_catalogue(path: Option<&PathBuf>) -> Result<Catalogue, AppError> {
    match path {
        Some(path) => Ok(Catalogue::from_path(path)?),
        None => Ok(Catalogue::bundled()),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let catalogue = load_catalogue(config.catalogue.path.as_ref())?;
    info!(offers = catalogue.offers().len(), "lender catalogue loaded");

    let service = Arc::new(RecommendationService::new(
        Arc::new(catalogue),
        ScoringPolicy::default(),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(matching_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan offer advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_recommendation(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        credit_score,
        monthly_income,
        age,
        employment,
        amount,
        term_months,
        purpose,
        catalogue,
        top,
    } = args;

    let profile = BorrowerProfile {
        credit_score,
        monthly_income,
        age,
        employment_type: employment,
        requested_amount: amount,
        requested_term_months: term_months,
        purpose,
    };

    let catalogue = load_catalogue(catalogue.as_ref())?;
    let engine = RecommendationEngine::default();
    let recommendations = engine.recommend(&profile, catalogue.offers())?;

    render_recommendations(&profile, &recommendations, top);
    Ok(())
}

fn render_recommendations(
    profile: &BorrowerProfile,
    recommendations: &[Recommendation],
    top: Option<usize>,
) {
    println!("Loan offer recommendations");
    println!(
        "Borrower: credit {}, income {:.0}/month, age {}, {}",
        profile.credit_score,
        profile.monthly_income,
        profile.age,
        profile.employment_type.label()
    );
    println!(
        "Request: {:.0} over {} months",
        profile.requested_amount, profile.requested_term_months
    );

    let shown = top.unwrap_or(recommendations.len());
    for (rank, recommendation) in recommendations.iter().take(shown).enumerate() {
        let offer = &recommendation.offer;
        println!(
            "\n{}. {} ({}) — score {}, {}",
            rank + 1,
            offer.name,
            offer.category.label(),
            recommendation.match_score,
            recommendation.verdict.label()
        );
        println!(
            "   {:.2}% p.a. | EMI {:.0} | total interest {:.0} | {}",
            offer.interest_rate_annual_percent,
            recommendation.estimated_emi,
            recommendation.total_interest,
            offer.processing_time_label
        );
        for reason in &recommendation.reasons {
            println!("   - {reason}");
        }
    }

    if shown < recommendations.len() {
        println!("\n... and {} more offers", recommendations.len() - shown);
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
