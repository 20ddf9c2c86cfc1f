use actix_web::web;

pub mod auth;
pub mod dashboard;
pub mod tasks;

/// Configure application routes for the server and for in-process tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(crate::health::configure_routes);

    // Auth routes: /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    // Task routes: /api/tasks/**
    cfg.service(web::scope("/api/tasks").configure(tasks::configure_routes));

    // Dashboard aggregates: /api/dashboard
    cfg.service(web::scope("/api/dashboard").configure(dashboard::configure_routes));
}
