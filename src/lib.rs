pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use state::AppState;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{require_admin, require_user};

/// Assembles the full router. Each route group carries its own auth layer,
/// so the policy a request passes is decided by the group it matched.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .merge(login_routes())
        // Authenticated
        .merge(proyecto_routes(&state))
        .merge(tarea_routes(&state))
        .merge(usuario_routes(&state))
        // Admin-only catalogs
        .merge(rol_routes(&state))
        .merge(estado_proyecto_routes(&state))
        .merge(estado_tarea_routes(&state))
        .merge(categoria_tarea_routes(&state))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn login_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::auth;

    Router::new().route("/login", post(auth::login))
}

fn rol_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::post;
    use handlers::roles;

    Router::new()
        .route("/roles", post(roles::create).get(roles::list))
        .route(
            "/roles/:rol_id",
            get(roles::get).put(roles::update).delete(roles::delete),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

fn estado_proyecto_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::post;
    use handlers::estados_proyecto;

    Router::new()
        .route(
            "/estados-proyecto",
            post(estados_proyecto::create).get(estados_proyecto::list),
        )
        .route(
            "/estados-proyecto/:estado_id",
            get(estados_proyecto::get)
                .put(estados_proyecto::update)
                .delete(estados_proyecto::delete),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

fn estado_tarea_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::post;
    use handlers::estados_tarea;

    Router::new()
        .route(
            "/estados-tarea",
            post(estados_tarea::create).get(estados_tarea::list),
        )
        .route(
            "/estados-tarea/:estado_id",
            get(estados_tarea::get)
                .put(estados_tarea::update)
                .delete(estados_tarea::delete),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

fn categoria_tarea_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::post;
    use handlers::categorias_tarea;

    Router::new()
        .route(
            "/categorias-tarea",
            post(categorias_tarea::create).get(categorias_tarea::list),
        )
        .route(
            "/categorias-tarea/:categoria_id",
            get(categorias_tarea::get)
                .put(categorias_tarea::update)
                .delete(categorias_tarea::delete),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

fn proyecto_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::{post, put};
    use handlers::proyectos;

    let autenticadas = Router::new()
        .route("/proyectos", post(proyectos::create).get(proyectos::list))
        .route(
            "/proyectos/:proyecto_id",
            get(proyectos::get).put(proyectos::update),
        )
        .route("/proyectos/:proyecto_id/tareas", get(proyectos::tareas))
        .route_layer(from_fn_with_state(state.clone(), require_user));

    let administrativas = Router::new()
        .route(
            "/proyectos/:proyecto_id/deactivate",
            put(proyectos::deactivate),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    autenticadas.merge(administrativas)
}

fn tarea_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::{post, put};
    use handlers::tareas;

    let autenticadas = Router::new()
        .route("/tareas", post(tareas::create).get(tareas::list))
        .route("/tareas/:tarea_id", get(tareas::get).put(tareas::update))
        .route_layer(from_fn_with_state(state.clone(), require_user));

    let administrativas = Router::new()
        .route("/tareas/:tarea_id/deactivate", put(tareas::deactivate))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    autenticadas.merge(administrativas)
}

fn usuario_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::post;
    use handlers::usuarios;

    let administrativas = Router::new()
        .route("/usuarios", post(usuarios::create).get(usuarios::list))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    // GET/PUT enforce owner-or-admin themselves; DELETE re-checks admin
    // inside the handler because it shares the path with them.
    let propias = Router::new()
        .route(
            "/usuarios/:usuario_id",
            get(usuarios::get)
                .put(usuarios::update)
                .delete(usuarios::delete),
        )
        .route_layer(from_fn_with_state(state.clone(), require_user));

    administrativas.merge(propias)
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Bienvenido al Sistema de Gestión de Tareas API",
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "sgt-api",
                "database": "connected",
                "timestamp": now,
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "service": "sgt-api",
                "database": "disconnected",
                "timestamp": now,
                "error": e.to_string(),
            })),
        ),
    }
}

/// Readiness stays 200 either way; orchestration reads the flags.
async fn ready(State(state): State<AppState>) -> Json<Value> {
    let conectado = state.store.ping().await.is_ok();
    let (status, database) = if conectado {
        ("ready", "connected")
    } else {
        ("not_ready", "disconnected")
    };

    Json(json!({ "status": status, "database": database }))
}
