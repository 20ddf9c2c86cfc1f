//! End-to-end task CRUD and dashboard aggregates over a migrated SQLite
//! database and real SeaORM stores.

mod common;

use actix_web::cookie::Cookie;
use actix_web::{test, web, App};
use backend::routes;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use common::set_cookie_value;
use sea_orm::{ConnectOptions, Database};
use serde_json::json;

async fn sqlite_state() -> AppState {
    // Single connection so the in-memory database is shared across queries
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts).await.expect("sqlite connect");
    migration::migrate_up(&db).await.expect("migrations");
    AppState::new(db, SecurityConfig::default())
}

/// Register a user over HTTP and return their access-token cookie value.
async fn register_and_get_access<S, B>(app: &S, name: &str, email: &str) -> String
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": "correct horse battery"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    set_cookie_value(&resp, "access_token").expect("access cookie set")
}

#[actix_web::test]
async fn task_lifecycle_create_update_delete() {
    let state = sqlite_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;
    let access = register_and_get_access(&app, "Ada", "ada@example.com").await;

    // Create
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .cookie(Cookie::new("access_token", access.clone()))
        .set_json(json!({
            "title": "Write report",
            "description": "Q3 numbers",
            "priority": "HIGH"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let created: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(created["title"], "Write report");
    assert_eq!(created["status"], "TODO");
    assert_eq!(created["priority"], "HIGH");
    let task_id = created["id"].as_str().unwrap().to_string();

    // Read back
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{task_id}"))
        .cookie(Cookie::new("access_token", access.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    // Partial update: move to DONE, clear the description with explicit null
    let req = test::TestRequest::patch()
        .uri(&format!("/api/tasks/{task_id}"))
        .cookie(Cookie::new("access_token", access.clone()))
        .set_json(json!({ "status": "DONE", "description": null }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let updated: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(updated["status"], "DONE");
    assert!(updated["description"].is_null());
    assert_eq!(updated["title"], "Write report");

    // Delete, then the task is gone
    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{task_id}"))
        .cookie(Cookie::new("access_token", access.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{task_id}"))
        .cookie(Cookie::new("access_token", access.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "TASK_NOT_FOUND");
}

#[actix_web::test]
async fn task_list_filters_by_status_and_search() {
    let state = sqlite_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;
    let access = register_and_get_access(&app, "Ada", "ada@example.com").await;

    for (title, status) in [
        ("Write report", "TODO"),
        ("Review report", "DONE"),
        ("Plan offsite", "TODO"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .cookie(Cookie::new("access_token", access.clone()))
            .set_json(json!({ "title": title, "status": status }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 201);
    }

    let req = test::TestRequest::get()
        .uri("/api/tasks?status=TODO")
        .cookie(Cookie::new("access_token", access.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/tasks?search=report")
        .cookie(Cookie::new("access_token", access.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/tasks?status=TODO&search=report")
        .cookie(Cookie::new("access_token", access.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Write report");
}

#[actix_web::test]
async fn tasks_are_isolated_per_user() {
    let state = sqlite_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;
    let ada = register_and_get_access(&app, "Ada", "ada@example.com").await;
    let bob = register_and_get_access(&app, "Bob", "bob@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .cookie(Cookie::new("access_token", ada.clone()))
        .set_json(json!({ "title": "Ada's secret task" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let created: serde_json::Value = test::read_body_json(resp).await;
    let task_id = created["id"].as_str().unwrap().to_string();

    // Bob sees an empty list and cannot address Ada's task by id.
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .cookie(Cookie::new("access_token", bob.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{task_id}"))
        .cookie(Cookie::new("access_token", bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn dashboard_counts_by_status_and_overdue() {
    let state = sqlite_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;
    let access = register_and_get_access(&app, "Ada", "ada@example.com").await;

    for (title, status, due) in [
        ("Overdue todo", "TODO", Some("2020-01-01T00:00:00Z")),
        ("Future todo", "TODO", Some("2099-01-01T00:00:00Z")),
        ("Doing it", "IN_PROGRESS", None),
        ("Shipped late but shipped", "DONE", Some("2020-01-01T00:00:00Z")),
    ] {
        let mut body = json!({ "title": title, "status": status });
        if let Some(due) = due {
            body["due_date"] = json!(due);
        }
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .cookie(Cookie::new("access_token", access.clone()))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 201);
    }

    let req = test::TestRequest::get()
        .uri("/api/dashboard")
        .cookie(Cookie::new("access_token", access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let stats: serde_json::Value = test::read_body_json(resp).await;

    assert_eq!(stats["total"], 4);
    assert_eq!(stats["todo"], 2);
    assert_eq!(stats["in_progress"], 1);
    assert_eq!(stats["done"], 1);
    // Done tasks never count as overdue
    assert_eq!(stats["overdue"], 1);
}

#[actix_web::test]
async fn tasks_require_authentication() {
    let state = sqlite_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/tasks").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}
