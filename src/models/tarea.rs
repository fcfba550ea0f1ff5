use chrono::{DateTime, Utc};
use mongodb::bson;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, to_document, Document};
use serde::{Deserialize, Serialize};

use super::ModelError;
use crate::db::{entity_ref, StoredEntity};

/// `estado_tarea` value a deactivated task carries instead of a state ref.
pub const TAREA_DESACTIVADA: &str = "desactivada";

/// Task as it travels over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tarea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub id_proyecto: String,
    pub actividad: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<DateTime<Utc>>,
    #[serde(default)]
    pub avance: f64,
    #[serde(default)]
    pub importancia: i32,
    #[serde(default)]
    pub dificultad: String,
    #[serde(default)]
    pub estado_tarea: String,
    #[serde(default)]
    pub categoria_tarea: String,
    #[serde(default = "Utc::now")]
    pub fecha_creacion: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub fecha_actualizacion: DateTime<Utc>,
}

impl Tarea {
    pub fn normalize(&mut self) {
        self.actividad = self.actividad.trim().to_string();
    }

    /// Stamp a mutation.
    pub fn touch(&mut self) {
        self.fecha_actualizacion = Utc::now();
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !(0.0..=100.0).contains(&self.avance) {
            return Err(ModelError::InvalidField {
                field: "avance",
                message: "must be between 0 and 100",
            });
        }
        if self.importancia < 0 {
            return Err(ModelError::InvalidField {
                field: "importancia",
                message: "must be zero or greater",
            });
        }
        Ok(())
    }
}

/// Persisted shape. The three references join against their collections'
/// `_id`; a deactivated task holds the sentinel string instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TareaDoc {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, with = "entity_ref")]
    pub id_proyecto: String,
    #[serde(default)]
    pub actividad: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<bson::DateTime>,
    #[serde(default)]
    pub avance: f64,
    #[serde(default)]
    pub importancia: i32,
    #[serde(default)]
    pub dificultad: String,
    #[serde(default, with = "entity_ref")]
    pub estado_tarea: String,
    #[serde(default, with = "entity_ref")]
    pub categoria_tarea: String,
    pub fecha_creacion: bson::DateTime,
    pub fecha_actualizacion: bson::DateTime,
}

impl TareaDoc {
    /// Update document for a full-field replace. A cleared `fecha_fin` is
    /// `$unset` so a stale end date does not linger in storage.
    pub fn update_document(&self) -> Result<Document, bson::ser::Error> {
        let mut fields = to_document(self)?;
        fields.remove("_id");

        let mut update = doc! { "$set": fields };
        if self.fecha_fin.is_none() {
            update.insert("$unset", doc! { "fecha_fin": "" });
        }
        Ok(update)
    }
}

impl StoredEntity for TareaDoc {
    const COLLECTION: &'static str = "tareas";
    const LABEL: &'static str = "Tarea";
}

impl From<Tarea> for TareaDoc {
    fn from(tarea: Tarea) -> Self {
        Self {
            id: None,
            id_proyecto: tarea.id_proyecto,
            actividad: tarea.actividad,
            fecha_fin: tarea.fecha_fin.map(bson::DateTime::from_chrono),
            avance: tarea.avance,
            importancia: tarea.importancia,
            dificultad: tarea.dificultad,
            estado_tarea: tarea.estado_tarea,
            categoria_tarea: tarea.categoria_tarea,
            fecha_creacion: bson::DateTime::from_chrono(tarea.fecha_creacion),
            fecha_actualizacion: bson::DateTime::from_chrono(tarea.fecha_actualizacion),
        }
    }
}

impl From<TareaDoc> for Tarea {
    fn from(doc: TareaDoc) -> Self {
        Self {
            id: doc.id.map(|oid| oid.to_hex()),
            id_proyecto: doc.id_proyecto,
            actividad: doc.actividad,
            fecha_fin: doc.fecha_fin.map(|fecha| fecha.to_chrono()),
            avance: doc.avance,
            importancia: doc.importancia,
            dificultad: doc.dificultad,
            estado_tarea: doc.estado_tarea,
            categoria_tarea: doc.categoria_tarea,
            fecha_creacion: doc.fecha_creacion.to_chrono(),
            fecha_actualizacion: doc.fecha_actualizacion.to_chrono(),
        }
    }
}

/// Read shape produced by the three-way lookup pipeline.
#[derive(Debug, Deserialize)]
pub struct TareaDetalleDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, with = "entity_ref")]
    pub id_proyecto: String,
    #[serde(default)]
    pub nombre_proyecto: Option<String>,
    #[serde(default)]
    pub actividad: String,
    #[serde(default)]
    pub fecha_fin: Option<bson::DateTime>,
    #[serde(default)]
    pub avance: f64,
    #[serde(default)]
    pub importancia: i32,
    #[serde(default)]
    pub dificultad: String,
    #[serde(default, with = "entity_ref")]
    pub estado_tarea: String,
    #[serde(default)]
    pub nombre_estado_tarea: Option<String>,
    #[serde(default, with = "entity_ref")]
    pub categoria_tarea: String,
    #[serde(default)]
    pub nombre_categoria_tarea: Option<String>,
    pub fecha_creacion: bson::DateTime,
    pub fecha_actualizacion: bson::DateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct TareaDetalle {
    pub id: String,
    pub id_proyecto: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_proyecto: Option<String>,
    pub actividad: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<DateTime<Utc>>,
    pub avance: f64,
    pub importancia: i32,
    pub dificultad: String,
    pub estado_tarea: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_estado_tarea: Option<String>,
    pub categoria_tarea: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_categoria_tarea: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl From<TareaDetalleDoc> for TareaDetalle {
    fn from(doc: TareaDetalleDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            id_proyecto: doc.id_proyecto,
            nombre_proyecto: doc.nombre_proyecto,
            actividad: doc.actividad,
            fecha_fin: doc.fecha_fin.map(|fecha| fecha.to_chrono()),
            avance: doc.avance,
            importancia: doc.importancia,
            dificultad: doc.dificultad,
            estado_tarea: doc.estado_tarea,
            nombre_estado_tarea: doc.nombre_estado_tarea,
            categoria_tarea: doc.categoria_tarea,
            nombre_categoria_tarea: doc.nombre_categoria_tarea,
            fecha_creacion: doc.fecha_creacion.to_chrono(),
            fecha_actualizacion: doc.fecha_actualizacion.to_chrono(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    fn tarea() -> Tarea {
        Tarea {
            id: None,
            id_proyecto: ObjectId::new().to_hex(),
            actividad: "Diseñar el esquema".to_string(),
            fecha_fin: Some(Utc::now()),
            avance: 25.0,
            importancia: 3,
            dificultad: "media".to_string(),
            estado_tarea: ObjectId::new().to_hex(),
            categoria_tarea: ObjectId::new().to_hex(),
            fecha_creacion: Utc::now(),
            fecha_actualizacion: Utc::now(),
        }
    }

    #[test]
    fn test_validate_ranges() {
        let mut tarea = tarea();
        assert!(tarea.validate().is_ok());

        tarea.avance = 150.0;
        assert_eq!(
            tarea.validate(),
            Err(ModelError::InvalidField {
                field: "avance",
                message: "must be between 0 and 100",
            })
        );

        tarea.avance = 100.0;
        tarea.importancia = -1;
        assert!(tarea.validate().is_err());
    }

    #[test]
    fn test_update_document_unsets_cleared_end_date() {
        let mut tarea = tarea();
        tarea.fecha_fin = None;
        let update = TareaDoc::from(tarea).update_document().unwrap();

        assert!(!update.get_document("$set").unwrap().contains_key("fecha_fin"));
        assert!(update
            .get_document("$unset")
            .unwrap()
            .contains_key("fecha_fin"));
    }

    #[test]
    fn test_update_document_sets_present_end_date() {
        let update = TareaDoc::from(tarea()).update_document().unwrap();

        assert!(update.get_document("$set").unwrap().contains_key("fecha_fin"));
        assert!(update.get_document("$unset").is_err());
    }

    #[test]
    fn test_references_stored_as_object_ids() {
        let tarea = tarea();
        let proyecto_ref = tarea.id_proyecto.clone();
        let document = to_document(&TareaDoc::from(tarea)).unwrap();

        assert_eq!(
            document.get("id_proyecto"),
            Some(&Bson::ObjectId(ObjectId::parse_str(&proyecto_ref).unwrap()))
        );
        assert!(matches!(document.get("estado_tarea"), Some(Bson::ObjectId(_))));
    }

    #[test]
    fn test_deactivation_sentinel_stays_a_string() {
        let mut tarea = tarea();
        tarea.estado_tarea = TAREA_DESACTIVADA.to_string();
        let document = to_document(&TareaDoc::from(tarea)).unwrap();

        assert_eq!(
            document.get("estado_tarea"),
            Some(&Bson::String(TAREA_DESACTIVADA.to_string()))
        );
    }

    #[test]
    fn test_create_payload_defaults() {
        let tarea: Tarea = serde_json::from_str(
            r#"{ "id_proyecto": "65a1b2c3d4e5f6a7b8c9d0e1", "actividad": "Revisar PRs" }"#,
        )
        .unwrap();

        assert_eq!(tarea.avance, 0.0);
        assert_eq!(tarea.importancia, 0);
        assert!(tarea.fecha_fin.is_none());
        assert!(tarea.estado_tarea.is_empty());
    }
}
