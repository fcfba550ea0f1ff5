pub mod categoria_tarea;
pub mod estado_proyecto;
pub mod estado_tarea;
pub mod proyecto;
pub mod rol;
pub mod tarea;
pub mod usuario;

pub use categoria_tarea::{CategoriaTarea, CategoriaTareaDoc};
pub use estado_proyecto::{EstadoProyecto, EstadoProyectoDoc};
pub use estado_tarea::{EstadoTarea, EstadoTareaDoc};
pub use proyecto::{Proyecto, ProyectoDetalle, ProyectoDetalleDoc, ProyectoDoc};
pub use rol::{Rol, RolDoc};
pub use tarea::{Tarea, TareaDetalle, TareaDetalleDoc, TareaDoc};
pub use usuario::{validar_password, Usuario, UsuarioDoc, UsuarioSalida, UsuarioSalidaDoc};

use thiserror::Error;

/// Field-level validation failures raised before anything touches storage.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("{field}: {message}")]
    InvalidField {
        field: &'static str,
        message: &'static str,
    },
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Uniqueness normalization for catalog names: trim and lowercase. Two names
/// that normalize to the same string are the same name.
pub(crate) fn normalize_name(value: &str) -> String {
    value.trim().to_lowercase()
}
