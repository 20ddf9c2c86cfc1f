use actix_web::{web, App, HttpServer};
use backend::infra::db::{connect_db, db_url};
use backend::middleware::cors::cors_middleware;
use backend::middleware::edge_gate::EdgeGate;
use backend::middleware::request_trace::RequestTrace;
use backend::routes;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use migration::migrate_up;
use tracing::info;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    let security_config = match SecurityConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load security config: {e}");
            std::process::exit(1);
        }
    };

    let database_url = match db_url() {
        Ok(url) => url,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let db = match connect_db(&database_url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate_up(&db).await {
        eprintln!("Failed to run migrations: {e}");
        std::process::exit(1);
    }

    let app_state = AppState::new(db, security_config);
    let data = web::Data::new(app_state);

    info!(host = %host, port, "starting backend");

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(EdgeGate)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
