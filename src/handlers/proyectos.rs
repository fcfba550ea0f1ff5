use axum::extract::{Path, Query, State};
use axum::Json;
use mongodb::bson::doc;

use super::{parse_object_id, Paginacion};
use crate::db::{pipelines, StoreError, StoredEntity};
use crate::error::ApiError;
use crate::models::proyecto::PROYECTO_DESACTIVADO;
use crate::models::{Proyecto, ProyectoDetalle, ProyectoDetalleDoc, ProyectoDoc, TareaDetalle, TareaDetalleDoc, TareaDoc};
use crate::state::AppState;

const DUPLICADO: &str = "Project with this name already exists";

pub async fn create(
    State(state): State<AppState>,
    Json(mut proyecto): Json<Proyecto>,
) -> Result<Json<Proyecto>, ApiError> {
    proyecto.normalize();

    let repo = state.store.repository::<ProyectoDoc>();
    let id = repo
        .insert_unique(
            &ProyectoDoc::from(proyecto.clone()),
            doc! { "nombre_proyecto": &proyecto.nombre_proyecto },
            DUPLICADO,
        )
        .await?;

    proyecto.id = Some(id.to_hex());
    Ok(Json(proyecto))
}

/// Listing is the enriched shape; the state name rides along.
pub async fn list(
    State(state): State<AppState>,
    Query(paginacion): Query<Paginacion>,
) -> Result<Json<Vec<ProyectoDetalle>>, ApiError> {
    let repo = state.store.repository::<ProyectoDoc>();
    let docs: Vec<ProyectoDetalleDoc> = repo.aggregate(pipelines::proyectos_detalle()).await?;

    Ok(Json(
        paginacion.aplicar(docs.into_iter().map(ProyectoDetalle::from).collect()),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(proyecto_id): Path<String>,
) -> Result<Json<ProyectoDetalle>, ApiError> {
    let id = parse_object_id(&proyecto_id)?;
    let repo = state.store.repository::<ProyectoDoc>();
    let detalle: ProyectoDetalleDoc = repo
        .aggregate_one(pipelines::proyecto_detalle(id))
        .await?
        .ok_or(StoreError::NotFound(ProyectoDoc::LABEL))?;

    Ok(Json(ProyectoDetalle::from(detalle)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(proyecto_id): Path<String>,
    Json(mut proyecto): Json<Proyecto>,
) -> Result<Json<Proyecto>, ApiError> {
    let id = parse_object_id(&proyecto_id)?;
    proyecto.normalize();
    proyecto.touch();

    let repo = state.store.repository::<ProyectoDoc>();
    let filtro = doc! { "nombre_proyecto": &proyecto.nombre_proyecto, "_id": { "$ne": id } };
    repo.replace_fields_unique(id, &ProyectoDoc::from(proyecto), filtro, DUPLICADO)
        .await?;

    Ok(Json(Proyecto::from(repo.fetch_404(id).await?)))
}

/// Soft delete: the state reference is replaced by the sentinel, everything
/// else stays untouched.
pub async fn deactivate(
    State(state): State<AppState>,
    Path(proyecto_id): Path<String>,
) -> Result<Json<Proyecto>, ApiError> {
    let id = parse_object_id(&proyecto_id)?;
    let repo = state.store.repository::<ProyectoDoc>();
    repo.update_by_id(id, doc! { "$set": { "estado": PROYECTO_DESACTIVADO } })
        .await?;

    Ok(Json(Proyecto::from(repo.fetch_404(id).await?)))
}

/// GET /proyectos/:proyecto_id/tareas. The project's tasks, enriched and
/// newest first. A project with no tasks (or an unknown id) yields an empty
/// list rather than an error.
pub async fn tareas(
    State(state): State<AppState>,
    Path(proyecto_id): Path<String>,
    Query(paginacion): Query<Paginacion>,
) -> Result<Json<Vec<TareaDetalle>>, ApiError> {
    let id = parse_object_id(&proyecto_id)?;
    let repo = state.store.repository::<TareaDoc>();
    let docs: Vec<TareaDetalleDoc> = repo.aggregate(pipelines::tareas_de_proyecto(id)).await?;

    Ok(Json(
        paginacion.aplicar(docs.into_iter().map(TareaDetalle::from).collect()),
    ))
}
