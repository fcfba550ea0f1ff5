use axum::extract::{Path, Query, State};
use axum::Json;
use mongodb::bson::doc;
use serde_json::{json, Value};

use super::{parse_object_id, Paginacion};
use crate::db::pipelines;
use crate::error::ApiError;
use crate::models::{EstadoProyecto, EstadoProyectoDoc};
use crate::state::AppState;

const DUPLICADO: &str = "Project state with this name already exists";

pub async fn create(
    State(state): State<AppState>,
    Json(mut estado): Json<EstadoProyecto>,
) -> Result<Json<EstadoProyecto>, ApiError> {
    estado.normalize();

    let repo = state.store.repository::<EstadoProyectoDoc>();
    let id = repo
        .insert_unique(
            &EstadoProyectoDoc::from(estado.clone()),
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
) -> Result<Json<Vec<EstadoProyecto>>, ApiError> {
    let repo = state.store.repository::<EstadoProyectoDoc>();
    let docs: Vec<EstadoProyectoDoc> = repo
        .aggregate(pipelines::listado_alfabetico("nombre_estado"))
        .await?;

    Ok(Json(
        paginacion.aplicar(docs.into_iter().map(EstadoProyecto::from).collect()),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(estado_id): Path<String>,
) -> Result<Json<EstadoProyecto>, ApiError> {
    let id = parse_object_id(&estado_id)?;
    let doc = state
        .store
        .repository::<EstadoProyectoDoc>()
        .fetch_404(id)
        .await?;
    Ok(Json(EstadoProyecto::from(doc)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(estado_id): Path<String>,
    Json(mut estado): Json<EstadoProyecto>,
) -> Result<Json<EstadoProyecto>, ApiError> {
    let id = parse_object_id(&estado_id)?;
    estado.normalize();

    let repo = state.store.repository::<EstadoProyectoDoc>();
    let filtro = doc! { "nombre_estado": &estado.nombre_estado, "_id": { "$ne": id } };
    repo.replace_fields_unique(id, &EstadoProyectoDoc::from(estado), filtro, DUPLICADO)
        .await?;

    Ok(Json(EstadoProyecto::from(repo.fetch_404(id).await?)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(estado_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_object_id(&estado_id)?;
    state
        .store
        .repository::<EstadoProyectoDoc>()
        .delete_by_id(id)
        .await?;
    Ok(Json(json!({ "message": "Project state deleted successfully" })))
}
