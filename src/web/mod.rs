// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::resolver::ResolverRoots;
use crate::core::{
    ChatCompletionClient, ConfigManager, LocalDocumentStore, ResumeAnalyzer, ScoringDriver,
    SourceResolver, SqliteProfileStore,
};
use crate::types::{InterviewOpening, InterviewReply, ScoringResult};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/analyze", data = "<request>")]
pub async fn analyze_resume(
    request: Json<StandardRequest<AnalyzeRequest>>,
    analyzer: &State<Arc<ResumeAnalyzer>>,
) -> Result<Json<DataResponse<ScoringResult>>, ApiError> {
    handlers::analyze_resume_handler(request, analyzer).await
}

#[post("/interview/start", data = "<request>")]
pub async fn start_interview(
    request: Json<StandardRequest<StartInterviewRequest>>,
    analyzer: &State<Arc<ResumeAnalyzer>>,
) -> Result<Json<DataResponse<InterviewOpening>>, ApiError> {
    handlers::start_interview_handler(request, analyzer).await
}

#[post("/interview/continue", data = "<request>")]
pub async fn continue_interview(
    request: Json<StandardRequest<ContinueInterviewRequest>>,
    analyzer: &State<Arc<ResumeAnalyzer>>,
) -> Result<Json<DataResponse<InterviewReply>>, ApiError> {
    handlers::continue_interview_handler(request, analyzer).await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Endpoint not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path and method".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body does not match the expected shape".to_string(),
        "UNPROCESSABLE_REQUEST".to_string(),
        vec![
            "Verify all required fields are present".to_string(),
            "Check field types against the API documentation".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

fn mount(rocket: Rocket<Build>, analyzer: Arc<ResumeAnalyzer>) -> Rocket<Build> {
    rocket
        .attach(Cors)
        .manage(analyzer)
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                analyze_resume,
                start_interview,
                continue_interview,
                health,
                options,
            ],
        )
}

/// Rocket instance with default settings, used by tests and embedders
pub fn build_rocket(analyzer: Arc<ResumeAnalyzer>) -> Rocket<Build> {
    mount(rocket::build(), analyzer)
}

/// Wire the production collaborators and serve until shutdown
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    config.ensure_directories().await?;

    let profiles = match SqliteProfileStore::open(&config.storage.database_path).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize database: {:#}", e);
            return Err(e);
        }
    };

    if config.generation.api_key.is_none() {
        warn!("No generation API key configured; scoring calls will be rejected upstream");
    }
    let client = ChatCompletionClient::new(&config.generation)?;

    let resolver = SourceResolver::new(
        Arc::new(LocalDocumentStore),
        Arc::new(profiles),
        ResolverRoots {
            uploads_root: config.storage.uploads_root.clone(),
            service_root: config.storage.service_root.clone(),
        },
    );
    let driver = ScoringDriver::new(Arc::new(client), config.generation.clone());
    let analyzer = Arc::new(ResumeAnalyzer::new(resolver, driver));

    info!("Starting resume analysis API server");
    info!("Database: {}", config.storage.database_path.display());
    info!("Uploads: {}", config.storage.uploads_root.display());
    info!("Model: {} via {}", config.generation.model, config.generation.api_base_url);
    info!("Server: http://0.0.0.0:{}", config.server.port);

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", config.server.port));

    mount(rocket::custom(figment), analyzer)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server stopped with an error: {}", e))?;

    Ok(())
}
