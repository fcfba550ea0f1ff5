use chrono::{DateTime, Utc};
use mongodb::bson;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::db::{entity_ref, StoredEntity};

/// `estado` value a deactivated project carries instead of a state ref.
pub const PROYECTO_DESACTIVADO: &str = "desactivado";

/// Project as it travels over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proyecto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nombre_proyecto: String,
    #[serde(default)]
    pub observaciones: String,
    #[serde(default = "Utc::now")]
    pub fecha_creacion: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub fecha_actualizacion: DateTime<Utc>,
    #[serde(default)]
    pub estado: String,
}

impl Proyecto {
    /// Project names keep their case; uniqueness is compared trimmed only.
    pub fn normalize(&mut self) {
        self.nombre_proyecto = self.nombre_proyecto.trim().to_string();
    }

    /// Stamp a mutation.
    pub fn touch(&mut self) {
        self.fecha_actualizacion = Utc::now();
    }
}

/// Persisted shape. `estado` references `estados_proyecto._id` unless the
/// project has been deactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProyectoDoc {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub nombre_proyecto: String,
    #[serde(default)]
    pub observaciones: String,
    pub fecha_creacion: bson::DateTime,
    pub fecha_actualizacion: bson::DateTime,
    #[serde(default, with = "entity_ref")]
    pub estado: String,
}

impl StoredEntity for ProyectoDoc {
    const COLLECTION: &'static str = "proyectos";
    const LABEL: &'static str = "Project";
}

impl From<Proyecto> for ProyectoDoc {
    fn from(proyecto: Proyecto) -> Self {
        Self {
            id: None,
            nombre_proyecto: proyecto.nombre_proyecto,
            observaciones: proyecto.observaciones,
            fecha_creacion: bson::DateTime::from_chrono(proyecto.fecha_creacion),
            fecha_actualizacion: bson::DateTime::from_chrono(proyecto.fecha_actualizacion),
            estado: proyecto.estado,
        }
    }
}

impl From<ProyectoDoc> for Proyecto {
    fn from(doc: ProyectoDoc) -> Self {
        Self {
            id: doc.id.map(|oid| oid.to_hex()),
            nombre_proyecto: doc.nombre_proyecto,
            observaciones: doc.observaciones,
            fecha_creacion: doc.fecha_creacion.to_chrono(),
            fecha_actualizacion: doc.fecha_actualizacion.to_chrono(),
            estado: doc.estado,
        }
    }
}

/// Read shape produced by the state lookup pipeline.
#[derive(Debug, Deserialize)]
pub struct ProyectoDetalleDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub nombre_proyecto: String,
    #[serde(default)]
    pub observaciones: String,
    pub fecha_creacion: bson::DateTime,
    pub fecha_actualizacion: bson::DateTime,
    #[serde(default, with = "entity_ref")]
    pub estado: String,
    #[serde(default)]
    pub nombre_estado: Option<String>,
    #[serde(default)]
    pub descripcion_estado: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProyectoDetalle {
    pub id: String,
    pub nombre_proyecto: String,
    pub observaciones: String,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
    pub estado: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_estado: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion_estado: Option<String>,
}

impl From<ProyectoDetalleDoc> for ProyectoDetalle {
    fn from(doc: ProyectoDetalleDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            nombre_proyecto: doc.nombre_proyecto,
            observaciones: doc.observaciones,
            fecha_creacion: doc.fecha_creacion.to_chrono(),
            fecha_actualizacion: doc.fecha_actualizacion.to_chrono(),
            estado: doc.estado,
            nombre_estado: doc.nombre_estado,
            descripcion_estado: doc.descripcion_estado,
        }
    }
}
