//! REST backend: `/api/tasks` routes over the task state.

use axum::{
    extract::{Json, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::models::{Deletion, NewTask, StatusUpdate, Task};

pub use error::ServiceError;
pub use state::{StateError, TaskState};

mod error;
pub mod state;
pub mod store;

type Result<T> = std::result::Result<T, ServiceError>;

/// Builds the task routes. `cors_origin` of `None` allows any origin.
pub fn service(state: TaskState, cors_origin: Option<HeaderValue>) -> Router {
    let allow_origin = match cors_origin {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_tasks(State(state): State<TaskState>) -> Result<Json<Vec<Task>>> {
    Ok(Json(state.list_tasks().await?))
}

async fn create_task(
    State(state): State<TaskState>,
    Json(task): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>)> {
    Ok((StatusCode::CREATED, Json(state.create_task(task).await?)))
}

async fn get_task(
    Path(task_id): Path<Uuid>,
    State(state): State<TaskState>,
) -> Result<Json<Task>> {
    Ok(Json(state.read_task(&task_id).await?))
}

async fn update_task(
    Path(task_id): Path<Uuid>,
    State(state): State<TaskState>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Task>> {
    Ok(Json(state.update_status(&task_id, update.status).await?))
}

async fn delete_task(
    Path(task_id): Path<Uuid>,
    State(state): State<TaskState>,
) -> Result<Json<Deletion>> {
    Ok(Json(state.delete_task(&task_id).await?))
}
