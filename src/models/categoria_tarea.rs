use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::normalize_name;
use crate::db::StoredEntity;

/// Task category catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriaTarea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nombre_categoria: String,
    #[serde(default)]
    pub descripcion: String,
}

impl CategoriaTarea {
    pub fn normalize(&mut self) {
        self.nombre_categoria = normalize_name(&self.nombre_categoria);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriaTareaDoc {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub nombre_categoria: String,
    #[serde(default)]
    pub descripcion: String,
}

impl StoredEntity for CategoriaTareaDoc {
    const COLLECTION: &'static str = "categorias_tarea";
    const LABEL: &'static str = "Task category";
}

impl From<CategoriaTarea> for CategoriaTareaDoc {
    fn from(categoria: CategoriaTarea) -> Self {
        Self {
            id: None,
            nombre_categoria: categoria.nombre_categoria,
            descripcion: categoria.descripcion,
        }
    }
}

impl From<CategoriaTareaDoc> for CategoriaTarea {
    fn from(doc: CategoriaTareaDoc) -> Self {
        Self {
            id: doc.id.map(|oid| oid.to_hex()),
            nombre_categoria: doc.nombre_categoria,
            descripcion: doc.descripcion,
        }
    }
}
