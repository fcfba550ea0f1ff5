use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::pipelines;
use crate::error::ApiError;
use crate::models::{normalize_name, UsuarioDoc, UsuarioSalidaDoc};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credenciales {
    pub email: String,
    pub password: String,
}

/// POST /login. Credentials are verified by the identity provider; the
/// session token handed back is this API's own, not the provider's. The
/// role name travels in the claims so the gate never has to hit the store.
pub async fn login(
    State(state): State<AppState>,
    Json(credenciales): Json<Credenciales>,
) -> Result<Json<Value>, ApiError> {
    let email = normalize_name(&credenciales.email);

    state
        .identity
        .sign_in(&email, &credenciales.password)
        .await
        .map_err(|err| err.into_api("Error al autenticar usuario"))?;

    let usuario: UsuarioSalidaDoc = state
        .store
        .repository::<UsuarioDoc>()
        .aggregate_one(pipelines::usuario_por_email(&email))
        .await?
        .ok_or_else(|| ApiError::not_found("Usuario no encontrado en la base de datos"))?;

    let token = state.codec.issue(
        &usuario.id.to_hex(),
        &usuario.email,
        &usuario.nombre,
        usuario.nombre_rol.as_deref().unwrap_or_default(),
    )?;

    Ok(Json(json!({
        "message": "Usuario Autenticado correctamente",
        "idToken": token,
    })))
}
