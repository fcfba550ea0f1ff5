// Route handlers, one module per resource.
//
// Policy tiers: public (/, /health, /ready, /login) → authenticated
// (proyectos, tareas, own profile) → admin (catalogs, user administration).
// The tier is enforced by the middleware layered on each route group in
// lib.rs, not inside the handlers.
pub mod auth;
pub mod categorias_tarea;
pub mod estados_proyecto;
pub mod estados_tarea;
pub mod proyectos;
pub mod roles;
pub mod tareas;
pub mod usuarios;

use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

use crate::error::ApiError;

/// Windowing for list endpoints, applied after the query materializes.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Paginacion {
    pub skip: usize,
    pub limit: usize,
}

impl Default for Paginacion {
    fn default() -> Self {
        Self { skip: 0, limit: 50 }
    }
}

impl Paginacion {
    /// `limit` is clamped to 1..=100; a `skip` past the end yields nothing.
    pub fn aplicar<T>(&self, items: Vec<T>) -> Vec<T> {
        let limit = self.limit.clamp(1, 100);
        items.into_iter().skip(self.skip).take(limit).collect()
    }
}

/// Path ids must parse as ObjectIds before they reach the store.
pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::bad_request(format!("Invalid id: {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let items: Vec<i32> = (0..200).collect();
        let page = Paginacion::default().aplicar(items);
        assert_eq!(page.len(), 50);
        assert_eq!(page[0], 0);
    }

    #[test]
    fn test_skip_and_limit() {
        let items: Vec<i32> = (0..200).collect();
        let page = Paginacion { skip: 10, limit: 5 }.aplicar(items);
        assert_eq!(page, vec![10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_limit_is_clamped() {
        let items: Vec<i32> = (0..500).collect();
        assert_eq!(Paginacion { skip: 0, limit: 400 }.aplicar(items.clone()).len(), 100);
        assert_eq!(Paginacion { skip: 0, limit: 0 }.aplicar(items).len(), 1);
    }

    #[test]
    fn test_skip_past_the_end() {
        let items: Vec<i32> = (0..3).collect();
        assert!(Paginacion { skip: 10, limit: 50 }.aplicar(items).is_empty());
    }

    #[test]
    fn test_invalid_object_id_is_a_bad_request() {
        let err = parse_object_id("no-es-un-id").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
