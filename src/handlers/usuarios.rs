use axum::extract::{Extension, Path, Query, State};
use axum::Json;
use mongodb::bson::doc;
use serde_json::{json, Value};

use super::{parse_object_id, Paginacion};
use crate::db::{pipelines, StoreError, StoredEntity};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::{validar_password, ModelError, Usuario, UsuarioDoc, UsuarioSalida, UsuarioSalidaDoc};
use crate::state::AppState;

const EMAIL_DUPLICADO: &str = "User with this email already exists";
const UID_DUPLICADO: &str = "User with this Firebase UID already exists";

/// POST /usuarios (admin). The provider account is created first; if local
/// persistence then fails for any reason, the provider account is deleted
/// again so the two systems stay consistent.
pub async fn create(
    State(state): State<AppState>,
    Json(mut usuario): Json<Usuario>,
) -> Result<Json<Usuario>, ApiError> {
    usuario.normalize();

    let password = usuario
        .password
        .clone()
        .ok_or(ModelError::MissingField("password"))?;
    validar_password(&password)?;

    let remoto = state
        .identity
        .create_user(&usuario.email, &password)
        .await
        .map_err(|err| err.into_api("Error al registrar usuario en firebase"))?;
    usuario.firebase_uid = Some(remoto.uid.clone());

    let repo = state.store.repository::<UsuarioDoc>();
    let persistido = async {
        if repo.exists(doc! { "email": &usuario.email }).await? {
            return Err(StoreError::Duplicate(EMAIL_DUPLICADO));
        }
        if repo.exists(doc! { "firebase_uid": &remoto.uid }).await? {
            return Err(StoreError::Duplicate(UID_DUPLICADO));
        }
        repo.insert(&UsuarioDoc::from(usuario.clone())).await
    }
    .await;

    match persistido {
        Ok(id) => {
            usuario.id = Some(id.to_hex());
            usuario.password = None;
            Ok(Json(usuario))
        }
        Err(err) => {
            if let Err(rollback) = state.identity.delete_user(&remoto.id_token).await {
                tracing::error!("provider rollback failed for {}: {}", usuario.email, rollback);
            }
            Err(err.into())
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(paginacion): Query<Paginacion>,
) -> Result<Json<Vec<UsuarioSalida>>, ApiError> {
    let repo = state.store.repository::<UsuarioDoc>();
    let docs: Vec<UsuarioSalidaDoc> = repo.aggregate(pipelines::usuarios_con_rol()).await?;

    Ok(Json(
        paginacion.aplicar(docs.into_iter().map(UsuarioSalida::from).collect()),
    ))
}

/// GET /usuarios/:usuario_id. Own profile, or any profile for admins.
pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(usuario_id): Path<String>,
) -> Result<Json<UsuarioSalida>, ApiError> {
    if !current.is_admin && current.id != usuario_id {
        return Err(ApiError::forbidden("No tienes permiso para ver este usuario."));
    }

    let id = parse_object_id(&usuario_id)?;
    let repo = state.store.repository::<UsuarioDoc>();
    let salida: UsuarioSalidaDoc = repo
        .aggregate_one(pipelines::usuario_con_rol(id))
        .await?
        .ok_or(StoreError::NotFound(UsuarioDoc::LABEL))?;

    Ok(Json(UsuarioSalida::from(salida)))
}

/// PUT /usuarios/:usuario_id. Own profile, or any profile for admins.
/// Non-admins cannot reassign their role or their provider uid.
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(usuario_id): Path<String>,
    Json(mut usuario): Json<Usuario>,
) -> Result<Json<Usuario>, ApiError> {
    if !current.is_admin && current.id != usuario_id {
        return Err(ApiError::forbidden(
            "No tienes permiso para actualizar este usuario.",
        ));
    }

    let id = parse_object_id(&usuario_id)?;
    let repo = state.store.repository::<UsuarioDoc>();
    let almacenado = repo.fetch_404(id).await?;

    if !current.is_admin {
        if usuario.rol != almacenado.rol {
            return Err(ApiError::forbidden("No tienes permiso para cambiar tu rol."));
        }
        if usuario.firebase_uid.is_some() && usuario.firebase_uid != almacenado.firebase_uid {
            return Err(ApiError::forbidden(
                "No tienes permiso para cambiar tu Firebase UID.",
            ));
        }
    }

    // An omitted uid keeps the stored one; nothing may blank it out.
    if usuario.firebase_uid.is_none() {
        usuario.firebase_uid = almacenado.firebase_uid.clone();
    }

    usuario.normalize();
    let filtro = doc! { "email": &usuario.email, "_id": { "$ne": id } };
    repo.replace_fields_unique(id, &UsuarioDoc::from(usuario), filtro, EMAIL_DUPLICADO)
        .await?;

    Ok(Json(Usuario::from(repo.fetch_404(id).await?)))
}

/// DELETE /usuarios/:usuario_id. The route group is user-gated because it
/// shares the path with GET/PUT, so the admin check lives here.
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(usuario_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    current.ensure_admin()?;

    let id = parse_object_id(&usuario_id)?;
    state
        .store
        .repository::<UsuarioDoc>()
        .delete_by_id(id)
        .await?;

    Ok(Json(json!({ "message": "User deleted successfully" })))
}
