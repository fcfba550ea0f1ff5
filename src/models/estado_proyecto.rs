use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::normalize_name;
use crate::db::StoredEntity;

/// Project lifecycle state catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstadoProyecto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nombre_estado: String,
    #[serde(default)]
    pub descripcion: String,
}

impl EstadoProyecto {
    pub fn normalize(&mut self) {
        self.nombre_estado = normalize_name(&self.nombre_estado);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstadoProyectoDoc {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub nombre_estado: String,
    #[serde(default)]
    pub descripcion: String,
}

impl StoredEntity for EstadoProyectoDoc {
    const COLLECTION: &'static str = "estados_proyecto";
    const LABEL: &'static str = "Project state";
}

impl From<EstadoProyecto> for EstadoProyectoDoc {
    fn from(estado: EstadoProyecto) -> Self {
        Self {
            id: None,
            nombre_estado: estado.nombre_estado,
            descripcion: estado.descripcion,
        }
    }
}

impl From<EstadoProyectoDoc> for EstadoProyecto {
    fn from(doc: EstadoProyectoDoc) -> Self {
        Self {
            id: doc.id.map(|oid| oid.to_hex()),
            nombre_estado: doc.nombre_estado,
            descripcion: doc.descripcion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_only_touches_the_name() {
        let mut estado = EstadoProyecto {
            id: None,
            nombre_estado: " En Progreso ".to_string(),
            descripcion: " Sigue Activo ".to_string(),
        };
        estado.normalize();
        assert_eq!(estado.nombre_estado, "en progreso");
        assert_eq!(estado.descripcion, " Sigue Activo ");
    }
}
