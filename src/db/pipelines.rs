//! Aggregation pipelines behind the enriched read endpoints.
//!
//! Every `$lookup`/`$unwind` pair preserves documents whose reference does
//! not resolve (`preserveNullAndEmptyArrays`), so entities pointing at a
//! deleted or sentinel reference still appear in listings, just without the
//! joined display name. Point lookups carry `$limit: 1` right after their
//! `$match` so the joins run on at most one document.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};

/// Lookup tables (roles, states, categories) list in alphabetical order.
pub fn listado_alfabetico(campo: &str) -> Vec<Document> {
    let mut orden = Document::new();
    orden.insert(campo, 1);
    vec![doc! { "$sort": orden }]
}

/// Tareas joined with project, state and category display names.
pub fn tareas_detalle() -> Vec<Document> {
    let mut pipeline = tarea_lookups();
    pipeline.push(doc! { "$sort": { "fecha_creacion": -1 } });
    pipeline
}

pub fn tarea_detalle(id: ObjectId) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": { "_id": id } }, doc! { "$limit": 1 }];
    pipeline.extend(tarea_lookups());
    pipeline
}

/// Tareas of one project, newest first. The caller already knows which
/// project these belong to, so only state and category names are joined.
pub fn tareas_de_proyecto(proyecto_id: ObjectId) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": { "id_proyecto": proyecto_id } }];
    pipeline.extend(estado_categoria_lookups());
    pipeline.push(doc! { "$project": tarea_projection() });
    pipeline.push(doc! { "$sort": { "fecha_creacion": -1 } });
    pipeline
}

/// Proyectos joined with their state name and description.
pub fn proyectos_detalle() -> Vec<Document> {
    let mut pipeline = proyecto_lookups();
    pipeline.push(doc! { "$sort": { "fecha_creacion": -1 } });
    pipeline
}

pub fn proyecto_detalle(id: ObjectId) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": { "_id": id } }, doc! { "$limit": 1 }];
    pipeline.extend(proyecto_lookups());
    pipeline
}

/// Usuarios joined with their role name, newest registration first. The
/// projection is a whitelist, so nothing beyond the listed fields can leak
/// out of the collection.
pub fn usuarios_con_rol() -> Vec<Document> {
    let mut pipeline = usuario_lookups();
    pipeline.push(doc! { "$sort": { "fecha_registro": -1 } });
    pipeline
}

pub fn usuario_con_rol(id: ObjectId) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": { "_id": id } }, doc! { "$limit": 1 }];
    pipeline.extend(usuario_lookups());
    pipeline
}

/// Login path: the claims carry the role name, not the reference.
pub fn usuario_por_email(email: &str) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": { "email": email } }, doc! { "$limit": 1 }];
    pipeline.extend(usuario_lookups());
    pipeline
}

fn tarea_lookups() -> Vec<Document> {
    let mut proyeccion = tarea_projection();
    proyeccion.insert("nombre_proyecto", "$proyecto_info.nombre_proyecto");

    let mut pipeline = vec![
        doc! { "$lookup": {
            "from": "proyectos",
            "localField": "id_proyecto",
            "foreignField": "_id",
            "as": "proyecto_info",
        }},
        doc! { "$unwind": { "path": "$proyecto_info", "preserveNullAndEmptyArrays": true } },
    ];
    pipeline.extend(estado_categoria_lookups());
    pipeline.push(doc! { "$project": proyeccion });
    pipeline
}

fn estado_categoria_lookups() -> Vec<Document> {
    vec![
        doc! { "$lookup": {
            "from": "estados_tarea",
            "localField": "estado_tarea",
            "foreignField": "_id",
            "as": "estado_info",
        }},
        doc! { "$unwind": { "path": "$estado_info", "preserveNullAndEmptyArrays": true } },
        doc! { "$lookup": {
            "from": "categorias_tarea",
            "localField": "categoria_tarea",
            "foreignField": "_id",
            "as": "categoria_info",
        }},
        doc! { "$unwind": { "path": "$categoria_info", "preserveNullAndEmptyArrays": true } },
    ]
}

fn tarea_projection() -> Document {
    doc! {
        "id_proyecto": 1,
        "actividad": 1,
        "fecha_fin": 1,
        "avance": 1,
        "importancia": 1,
        "dificultad": 1,
        "estado_tarea": 1,
        "categoria_tarea": 1,
        "fecha_creacion": 1,
        "fecha_actualizacion": 1,
        "nombre_estado_tarea": "$estado_info.nombre_estado",
        "nombre_categoria_tarea": "$categoria_info.nombre_categoria",
    }
}

fn proyecto_lookups() -> Vec<Document> {
    vec![
        doc! { "$lookup": {
            "from": "estados_proyecto",
            "localField": "estado",
            "foreignField": "_id",
            "as": "estado_info",
        }},
        doc! { "$unwind": { "path": "$estado_info", "preserveNullAndEmptyArrays": true } },
        doc! { "$project": {
            "nombre_proyecto": 1,
            "observaciones": 1,
            "fecha_creacion": 1,
            "fecha_actualizacion": 1,
            "estado": 1,
            "nombre_estado": "$estado_info.nombre_estado",
            "descripcion_estado": "$estado_info.descripcion",
        }},
    ]
}

fn usuario_lookups() -> Vec<Document> {
    vec![
        doc! { "$lookup": {
            "from": "roles",
            "localField": "rol",
            "foreignField": "_id",
            "as": "rol_info",
        }},
        doc! { "$unwind": { "path": "$rol_info", "preserveNullAndEmptyArrays": true } },
        doc! { "$project": {
            "firebase_uid": 1,
            "email": 1,
            "nombre": 1,
            "rol": 1,
            "nombre_rol": "$rol_info.nombre_rol",
            "fecha_registro": 1,
        }},
    ]
}
