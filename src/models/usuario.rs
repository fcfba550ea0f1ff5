use chrono::{DateTime, Utc};
use mongodb::bson;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::{normalize_name, ModelError};
use crate::db::{entity_ref, StoredEntity};

/// User as it travels over the API. The password is write-only: accepted on
/// requests, never serialized back out, never persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firebase_uid: Option<String>,
    pub email: String,
    pub nombre: String,
    pub rol: String,
    #[serde(default = "Utc::now")]
    pub fecha_registro: DateTime<Utc>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl Usuario {
    pub fn normalize(&mut self) {
        self.email = normalize_name(&self.email);
        self.nombre = self.nombre.trim().to_string();
    }
}

/// Password policy for provider-backed accounts.
pub fn validar_password(password: &str) -> Result<(), ModelError> {
    const ESPECIALES: &str = "!@#$%^&*?";

    let largo = password.chars().count();
    if !(8..=64).contains(&largo) {
        return Err(ModelError::InvalidField {
            field: "password",
            message: "must be between 8 and 64 characters",
        });
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ModelError::InvalidField {
            field: "password",
            message: "must contain an uppercase letter",
        });
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ModelError::InvalidField {
            field: "password",
            message: "must contain a digit",
        });
    }
    if !password.chars().any(|c| ESPECIALES.contains(c)) {
        return Err(ModelError::InvalidField {
            field: "password",
            message: "must contain one of !@#$%^&*?",
        });
    }
    Ok(())
}

/// Persisted shape. Credentials live in the identity provider, so there is
/// no password field here at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsuarioDoc {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firebase_uid: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default, with = "entity_ref")]
    pub rol: String,
    pub fecha_registro: bson::DateTime,
}

impl StoredEntity for UsuarioDoc {
    const COLLECTION: &'static str = "usuarios";
    const LABEL: &'static str = "User";
}

impl From<Usuario> for UsuarioDoc {
    fn from(usuario: Usuario) -> Self {
        Self {
            id: None,
            firebase_uid: usuario.firebase_uid,
            email: usuario.email,
            nombre: usuario.nombre,
            rol: usuario.rol,
            fecha_registro: bson::DateTime::from_chrono(usuario.fecha_registro),
        }
    }
}

impl From<UsuarioDoc> for Usuario {
    fn from(doc: UsuarioDoc) -> Self {
        Self {
            id: doc.id.map(|oid| oid.to_hex()),
            firebase_uid: doc.firebase_uid,
            email: doc.email,
            nombre: doc.nombre,
            rol: doc.rol,
            fecha_registro: doc.fecha_registro.to_chrono(),
            password: None,
        }
    }
}

/// Read shape produced by the role lookup pipeline.
#[derive(Debug, Deserialize)]
pub struct UsuarioSalidaDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub firebase_uid: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default, with = "entity_ref")]
    pub rol: String,
    #[serde(default)]
    pub nombre_rol: Option<String>,
    pub fecha_registro: bson::DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsuarioSalida {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firebase_uid: Option<String>,
    pub email: String,
    pub nombre: String,
    pub rol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_rol: Option<String>,
    pub fecha_registro: DateTime<Utc>,
}

impl From<UsuarioSalidaDoc> for UsuarioSalida {
    fn from(doc: UsuarioSalidaDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            firebase_uid: doc.firebase_uid,
            email: doc.email,
            nombre: doc.nombre,
            rol: doc.rol,
            nombre_rol: doc.nombre_rol,
            fecha_registro: doc.fecha_registro.to_chrono(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::to_document;

    fn usuario() -> Usuario {
        Usuario {
            id: None,
            firebase_uid: None,
            email: " Ana@Example.COM ".to_string(),
            nombre: " Ana ".to_string(),
            rol: ObjectId::new().to_hex(),
            fecha_registro: Utc::now(),
            password: Some("Secreta1!".to_string()),
        }
    }

    #[test]
    fn test_normalize_lowercases_email() {
        let mut usuario = usuario();
        usuario.normalize();
        assert_eq!(usuario.email, "ana@example.com");
        assert_eq!(usuario.nombre, "Ana");
    }

    #[test]
    fn test_password_is_never_serialized() {
        let value = serde_json::to_value(usuario()).unwrap();
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_password_is_never_persisted() {
        let document = to_document(&UsuarioDoc::from(usuario())).unwrap();
        assert!(!document.contains_key("password"));
    }

    #[test]
    fn test_password_policy() {
        assert!(validar_password("Secreta1!").is_ok());
        assert!(validar_password("corta1!").is_err());
        assert!(validar_password("sinmayuscula1!").is_err());
        assert!(validar_password("SinDigito!!").is_err());
        assert!(validar_password("SinEspecial11").is_err());

        let larga = format!("A1!{}", "a".repeat(62));
        assert!(validar_password(&larga).is_err());
    }

    #[test]
    fn test_create_payload_accepts_password() {
        let usuario: Usuario = serde_json::from_str(
            r#"{
                "email": "ana@example.com",
                "nombre": "Ana",
                "rol": "65a1b2c3d4e5f6a7b8c9d0e1",
                "password": "Secreta1!"
            }"#,
        )
        .unwrap();
        assert_eq!(usuario.password.as_deref(), Some("Secreta1!"));
        assert!(usuario.firebase_uid.is_none());
    }
}
