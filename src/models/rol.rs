use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::normalize_name;
use crate::db::StoredEntity;

/// Role catalog entry as it travels over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rol {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nombre_rol: String,
}

impl Rol {
    pub fn normalize(&mut self) {
        self.nombre_rol = normalize_name(&self.nombre_rol);
    }
}

/// Persisted shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolDoc {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub nombre_rol: String,
}

impl StoredEntity for RolDoc {
    const COLLECTION: &'static str = "roles";
    const LABEL: &'static str = "Rol";
}

impl From<Rol> for RolDoc {
    fn from(rol: Rol) -> Self {
        Self {
            id: None,
            nombre_rol: rol.nombre_rol,
        }
    }
}

impl From<RolDoc> for Rol {
    fn from(doc: RolDoc) -> Self {
        Self {
            id: doc.id.map(|oid| oid.to_hex()),
            nombre_rol: doc.nombre_rol,
        }
    }
}
