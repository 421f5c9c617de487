use std::net::SocketAddr;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use chrono::Local;
use tower_http::services::ServeDir;

use day_planner::AppState;
use day_planner::store::{JsonFileStore, ScheduleStore};
use day_planner::{routes_schedule, routes_tasks};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("day_planner=info".parse().expect("static directive")),
        )
        .init();

    let data_dir = std::env::var("DAY_PLANNER_DATA").unwrap_or_else(|_| "data".to_string());
    let kv = JsonFileStore::new(&data_dir);
    let store = ScheduleStore::open(Box::new(kv), Local::now().date_naive());
    let state = AppState::new(store);

    let api = Router::new()
        // day view
        .route("/day", get(routes_schedule::get_day))
        // tasks
        .route(
            "/tasks",
            get(routes_tasks::get_tasks).post(routes_tasks::create_task),
        )
        .route(
            "/tasks/:id",
            put(routes_tasks::update_task).delete(routes_tasks::delete_task),
        )
        .route("/tasks/:id/toggle", post(routes_tasks::toggle_task))
        // schedule
        .route("/schedule", post(routes_schedule::place_task))
        .route("/appointments", post(routes_schedule::add_appointment))
        .route(
            "/schedule/:id/delete-request",
            post(routes_schedule::request_delete),
        )
        .route("/schedule/:id", delete(routes_schedule::confirm_delete))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api)
        .nest_service("/", ServeDir::new("static"));

    let addr: SocketAddr = std::env::var("DAY_PLANNER_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .expect("invalid bind address");

    tracing::info!(%addr, %data_dir, "day planner listening");

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind failed");

    axum::serve(listener, app).await.expect("server error");
}
