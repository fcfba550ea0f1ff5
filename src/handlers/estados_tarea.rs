use axum::extract::{Path, Query, State};
use axum::Json;
use mongodb::bson::doc;
use serde_json::{json, Value};

use super::{parse_object_id, Paginacion};
use crate::db::pipelines;
use crate::error::ApiError;
use crate::models::{EstadoTarea, EstadoTareaDoc};
use crate::state::AppState;

const DUPLICADO: &str = "Task state with this name already exists";

pub async fn create(
    State(state): State<AppState>,
    Json(mut estado): Json<EstadoTarea>,
) -> Result<Json<EstadoTarea>, ApiError> {
    estado.normalize();

    let repo = state.store.repository::<EstadoTareaDoc>();
    let id = repo
        .insert_unique(
            &EstadoTareaDoc::from(estado.clone()),
            doc! { "nombre_estado": &estado.nombre_estado },
            DUPLICADO,
        )
        .await?;

    estado.id = Some(id.to_hex());
    Ok(Json(estado))
}

pub async fn list(
    State(state): State<AppState>,
    Query(paginacion): Query<Paginacion>,
) -> Result<Json<Vec<EstadoTarea>>, ApiError> {
    let repo = state.store.repository::<EstadoTareaDoc>();
    let docs: Vec<EstadoTareaDoc> = repo
        .aggregate(pipelines::listado_alfabetico("nombre_estado"))
        .await?;

    Ok(Json(
        paginacion.aplicar(docs.into_iter().map(EstadoTarea::from).collect()),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(estado_id): Path<String>,
) -> Result<Json<EstadoTarea>, ApiError> {
    let id = parse_object_id(&estado_id)?;
    let doc = state
        .store
        .repository::<EstadoTareaDoc>()
        .fetch_404(id)
        .await?;
    Ok(Json(EstadoTarea::from(doc)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(estado_id): Path<String>,
    Json(mut estado): Json<EstadoTarea>,
) -> Result<Json<EstadoTarea>, ApiError> {
    let id = parse_object_id(&estado_id)?;
    estado.normalize();

    let repo = state.store.repository::<EstadoTareaDoc>();
    let filtro = doc! { "nombre_estado": &estado.nombre_estado, "_id": { "$ne": id } };
    repo.replace_fields_unique(id, &EstadoTareaDoc::from(estado), filtro, DUPLICADO)
        .await?;

    Ok(Json(EstadoTarea::from(repo.fetch_404(id).await?)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(estado_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_object_id(&estado_id)?;
    state
        .store
        .repository::<EstadoTareaDoc>()
        .delete_by_id(id)
        .await?;
    Ok(Json(json!({ "message": "Task state deleted successfully" })))
}
