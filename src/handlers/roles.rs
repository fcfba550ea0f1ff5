use axum::extract::{Path, Query, State};
use axum::Json;
use mongodb::bson::doc;
use serde_json::{json, Value};

use super::{parse_object_id, Paginacion};
use crate::db::pipelines;
use crate::error::ApiError;
use crate::models::{Rol, RolDoc};
use crate::state::AppState;

const DUPLICADO: &str = "Rol with this name already exists";

pub async fn create(
    State(state): State<AppState>,
    Json(mut rol): Json<Rol>,
) -> Result<Json<Rol>, ApiError> {
    rol.normalize();

    let repo = state.store.repository::<RolDoc>();
    let id = repo
        .insert_unique(
            &RolDoc::from(rol.clone()),
            doc! { "nombre_rol": &rol.nombre_rol },
            DUPLICADO,
        )
        .await?;

    rol.id = Some(id.to_hex());
    Ok(Json(rol))
}

pub async fn list(
    State(state): State<AppState>,
    Query(paginacion): Query<Paginacion>,
) -> Result<Json<Vec<Rol>>, ApiError> {
    let repo = state.store.repository::<RolDoc>();
    let docs: Vec<RolDoc> = repo
        .aggregate(pipelines::listado_alfabetico("nombre_rol"))
        .await?;

    Ok(Json(paginacion.aplicar(docs.into_iter().map(Rol::from).collect())))
}

pub async fn get(
    State(state): State<AppState>,
    Path(rol_id): Path<String>,
) -> Result<Json<Rol>, ApiError> {
    let id = parse_object_id(&rol_id)?;
    let doc = state.store.repository::<RolDoc>().fetch_404(id).await?;
    Ok(Json(Rol::from(doc)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(rol_id): Path<String>,
    Json(mut rol): Json<Rol>,
) -> Result<Json<Rol>, ApiError> {
    let id = parse_object_id(&rol_id)?;
    rol.normalize();

    let repo = state.store.repository::<RolDoc>();
    let filtro = doc! { "nombre_rol": &rol.nombre_rol, "_id": { "$ne": id } };
    repo.replace_fields_unique(id, &RolDoc::from(rol), filtro, DUPLICADO)
        .await?;

    Ok(Json(Rol::from(repo.fetch_404(id).await?)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(rol_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_object_id(&rol_id)?;
    state.store.repository::<RolDoc>().delete_by_id(id).await?;
    Ok(Json(json!({ "message": "Rol deleted successfully" })))
}
