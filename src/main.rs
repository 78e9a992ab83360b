use actix_web::{web, App, HttpServer};
use std::error::Error;
use tracing::{error, info};

use sgpa_planner::api;
use sgpa_planner::config::{ConfigError, CurriculumConfig};
use sgpa_planner::logging;

const CURRICULUM_PATH: &str = "config/curriculum.json";

fn load_curriculum() -> Result<CurriculumConfig, ConfigError> {
    match CurriculumConfig::from_json_file(CURRICULUM_PATH) {
        Ok(config) => {
            info!(path = CURRICULUM_PATH, "loaded curriculum file");
            Ok(config)
        }
        Err(ConfigError::Io(_)) => {
            info!("no curriculum file found, using the built-in table");
            Ok(CurriculumConfig::default_table())
        }
        Err(err) => {
            // A present-but-broken curriculum is fatal, not something to
            // paper over with defaults.
            error!(%err, path = CURRICULUM_PATH, "curriculum file rejected");
            Err(err)
        }
    }
}

async fn start_api(config: CurriculumConfig) -> std::io::Result<()> {
    let config_data = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .configure(api::configure)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let config = load_curriculum()?;
    info!(
        subjects = config.subjects.len(),
        total_credits = config.total_credits(),
        "curriculum ready"
    );

    info!("starting SGPA Planner API on http://127.0.0.1:8080");
    start_api(config).await?;

    Ok(())
}
