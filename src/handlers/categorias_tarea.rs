use axum::extract::{Path, Query, State};
use axum::Json;
use mongodb::bson::doc;
use serde_json::{json, Value};

use super::{parse_object_id, Paginacion};
use crate::db::pipelines;
use crate::error::ApiError;
use crate::models::{CategoriaTarea, CategoriaTareaDoc};
use crate::state::AppState;

const DUPLICADO: &str = "Task category with this name already exists";

pub async fn create(
    State(state): State<AppState>,
    Json(mut categoria): Json<CategoriaTarea>,
) -> Result<Json<CategoriaTarea>, ApiError> {
    categoria.normalize();

    let repo = state.store.repository::<CategoriaTareaDoc>();
    let id = repo
        .insert_unique(
            &CategoriaTareaDoc::from(categoria.clone()),
            doc! { "nombre_categoria": &categoria.nombre_categoria },
            DUPLICADO,
        )
        .await?;

    categoria.id = Some(id.to_hex());
    Ok(Json(categoria))
}

pub async fn list(
    State(state): State<AppState>,
    Query(paginacion): Query<Paginacion>,
) -> Result<Json<Vec<CategoriaTarea>>, ApiError> {
    let repo = state.store.repository::<CategoriaTareaDoc>();
    let docs: Vec<CategoriaTareaDoc> = repo
        .aggregate(pipelines::listado_alfabetico("nombre_categoria"))
        .await?;

    Ok(Json(
        paginacion.aplicar(docs.into_iter().map(CategoriaTarea::from).collect()),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(categoria_id): Path<String>,
) -> Result<Json<CategoriaTarea>, ApiError> {
    let id = parse_object_id(&categoria_id)?;
    let doc = state
        .store
        .repository::<CategoriaTareaDoc>()
        .fetch_404(id)
        .await?;
    Ok(Json(CategoriaTarea::from(doc)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(categoria_id): Path<String>,
    Json(mut categoria): Json<CategoriaTarea>,
) -> Result<Json<CategoriaTarea>, ApiError> {
    let id = parse_object_id(&categoria_id)?;
    categoria.normalize();

    let repo = state.store.repository::<CategoriaTareaDoc>();
    let filtro = doc! { "nombre_categoria": &categoria.nombre_categoria, "_id": { "$ne": id } };
    repo.replace_fields_unique(id, &CategoriaTareaDoc::from(categoria), filtro, DUPLICADO)
        .await?;

    Ok(Json(CategoriaTarea::from(repo.fetch_404(id).await?)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(categoria_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_object_id(&categoria_id)?;
    state
        .store
        .repository::<CategoriaTareaDoc>()
        .delete_by_id(id)
        .await?;
    Ok(Json(json!({ "message": "Task category deleted successfully" })))
}
