use axum::extract::{Path, Query, State};
use axum::Json;
use mongodb::bson::doc;

use super::{parse_object_id, Paginacion};
use crate::db::{pipelines, StoreError, StoredEntity};
use crate::error::ApiError;
use crate::models::tarea::TAREA_DESACTIVADA;
use crate::models::{Tarea, TareaDetalle, TareaDetalleDoc, TareaDoc};
use crate::state::AppState;

/// Tasks carry no uniqueness rule; two tasks may share an activity name.
pub async fn create(
    State(state): State<AppState>,
    Json(mut tarea): Json<Tarea>,
) -> Result<Json<Tarea>, ApiError> {
    tarea.normalize();
    tarea.validate()?;

    let repo = state.store.repository::<TareaDoc>();
    let id = repo.insert(&TareaDoc::from(tarea.clone())).await?;

    tarea.id = Some(id.to_hex());
    Ok(Json(tarea))
}

pub async fn list(
    State(state): State<AppState>,
    Query(paginacion): Query<Paginacion>,
) -> Result<Json<Vec<TareaDetalle>>, ApiError> {
    let repo = state.store.repository::<TareaDoc>();
    let docs: Vec<TareaDetalleDoc> = repo.aggregate(pipelines::tareas_detalle()).await?;

    Ok(Json(
        paginacion.aplicar(docs.into_iter().map(TareaDetalle::from).collect()),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(tarea_id): Path<String>,
) -> Result<Json<TareaDetalle>, ApiError> {
    let id = parse_object_id(&tarea_id)?;
    let repo = state.store.repository::<TareaDoc>();
    let detalle: TareaDetalleDoc = repo
        .aggregate_one(pipelines::tarea_detalle(id))
        .await?
        .ok_or(StoreError::NotFound(TareaDoc::LABEL))?;

    Ok(Json(TareaDetalle::from(detalle)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(tarea_id): Path<String>,
    Json(mut tarea): Json<Tarea>,
) -> Result<Json<Tarea>, ApiError> {
    let id = parse_object_id(&tarea_id)?;
    tarea.normalize();
    tarea.validate()?;
    tarea.touch();

    let update = TareaDoc::from(tarea)
        .update_document()
        .map_err(StoreError::from)?;

    let repo = state.store.repository::<TareaDoc>();
    repo.update_by_id(id, update).await?;

    Ok(Json(Tarea::from(repo.fetch_404(id).await?)))
}

/// Soft delete: the state reference is replaced by the sentinel.
pub async fn deactivate(
    State(state): State<AppState>,
    Path(tarea_id): Path<String>,
) -> Result<Json<Tarea>, ApiError> {
    let id = parse_object_id(&tarea_id)?;
    let repo = state.store.repository::<TareaDoc>();
    repo.update_by_id(id, doc! { "$set": { "estado_tarea": TAREA_DESACTIVADA } })
        .await?;

    Ok(Json(Tarea::from(repo.fetch_404(id).await?)))
}
