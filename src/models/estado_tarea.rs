use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::normalize_name;
use crate::db::StoredEntity;

/// Task lifecycle state catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstadoTarea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nombre_estado: String,
    #[serde(default)]
    pub descripcion: String,
}

impl EstadoTarea {
    pub fn normalize(&mut self) {
        self.nombre_estado = normalize_name(&self.nombre_estado);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstadoTareaDoc {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub nombre_estado: String,
    #[serde(default)]
    pub descripcion: String,
}

impl StoredEntity for EstadoTareaDoc {
    const COLLECTION: &'static str = "estados_tarea";
    const LABEL: &'static str = "Task state";
}

impl From<EstadoTarea> for EstadoTareaDoc {
    fn from(estado: EstadoTarea) -> Self {
        Self {
            id: None,
            nombre_estado: estado.nombre_estado,
            descripcion: estado.descripcion,
        }
    }
}

impl From<EstadoTareaDoc> for EstadoTarea {
    fn from(doc: EstadoTareaDoc) -> Self {
        Self {
            id: doc.id.map(|oid| oid.to_hex()),
            nombre_estado: doc.nombre_estado,
            descripcion: doc.descripcion,
        }
    }
}
