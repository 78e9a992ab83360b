use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::analytics::{self, PlanSummary};
use crate::config::{ConfigError, CurriculumConfig};
use crate::planner::{self, CompletedSet, FeasibilityPolicy, MarksTable, RangeWarning};
use crate::report;

#[derive(Deserialize)]
pub struct RequiredRequest {
    pub target: f64,
}

#[derive(Serialize)]
pub struct RequiredResponse {
    pub target: f64,
    pub required: MarksTable,
}

#[derive(Deserialize)]
pub struct PlanRequest {
    pub target: f64,
    #[serde(default)]
    pub current_marks: MarksTable,
    #[serde(default)]
    pub completed: CompletedSet,
    #[serde(default)]
    pub policy: FeasibilityPolicy,
}

#[derive(Serialize)]
pub struct PlanResponse {
    pub target: f64,
    pub required: MarksTable,
    pub adjusted: MarksTable,
    pub feasible: bool,
    pub warnings: Vec<RangeWarning>,
    pub summary: PlanSummary,
    pub generated_at: DateTime<Utc>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/config", web::get().to(get_config))
        .route("/required", web::post().to(required_marks))
        .route("/plan", web::post().to(plan))
        .route("/gradesheet", web::post().to(gradesheet));
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("SGPA Planner API is running!")
}

async fn get_config(config: web::Data<CurriculumConfig>) -> HttpResponse {
    HttpResponse::Ok().json(config.as_ref())
}

async fn required_marks(
    req: web::Json<RequiredRequest>,
    config: web::Data<CurriculumConfig>,
) -> HttpResponse {
    match planner::compute_required(req.target, &config) {
        Ok(required) => HttpResponse::Ok().json(RequiredResponse {
            target: req.target,
            required,
        }),
        Err(err) => config_error_response(err),
    }
}

async fn plan(req: web::Json<PlanRequest>, config: web::Data<CurriculumConfig>) -> HttpResponse {
    match build_plan(&req, &config) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => config_error_response(err),
    }
}

async fn gradesheet(
    req: web::Json<PlanRequest>,
    config: web::Data<CurriculumConfig>,
) -> HttpResponse {
    match build_plan(&req, &config) {
        Ok(response) => {
            let sheet =
                report::gradesheet(&config, &req.current_marks, &response.adjusted, req.target);
            HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .body(sheet)
        }
        Err(err) => config_error_response(err),
    }
}

fn build_plan(req: &PlanRequest, config: &CurriculumConfig) -> Result<PlanResponse, ConfigError> {
    let warnings = planner::check_ranges(req.target, &req.current_marks, config);
    for warning in &warnings {
        warn!(%warning, "input outside documented range");
    }

    let required = planner::compute_required(req.target, config)?;
    let adjustment = planner::adjust(
        config,
        &req.current_marks,
        &required,
        &req.completed,
        req.policy,
    )?;
    let summary = analytics::plan_summary(config, &req.current_marks, &adjustment.adjusted);

    Ok(PlanResponse {
        target: req.target,
        required,
        adjusted: adjustment.adjusted,
        feasible: adjustment.feasible,
        warnings,
        summary,
        generated_at: Utc::now(),
    })
}

fn config_error_response(err: ConfigError) -> HttpResponse {
    match err {
        ConfigError::UnknownSubject(_) | ConfigError::UnknownComponent { .. } => {
            HttpResponse::UnprocessableEntity()
                .json(serde_json::json!({ "error": err.to_string() }))
        }
        _ => {
            error!(%err, "curriculum configuration is broken");
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": err.to_string() }))
        }
    }
}
