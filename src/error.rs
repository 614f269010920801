//! # Errores del Servidor
//! src/error.rs
//!
//! Dos familias bien separadas:
//!
//! - [`StartupError`]: fallas al crear el socket de escucha o el pool. Son
//!   fatales y abortan el arranque.
//! - [`RequestError`]: fallas al atender una conexión. Siempre se convierten
//!   en una respuesta HTTP de error y nunca salen del handler.

use crate::http::{ParseError, StatusCode};
use std::io;
use std::net::SocketAddr;

/// Error fatal durante el arranque
#[derive(Debug)]
pub enum StartupError {
    /// `host:port` no resuelve a ninguna dirección
    InvalidAddress { address: String, source: io::Error },

    /// No se pudo crear el socket
    SocketCreation(io::Error),

    /// No se pudo hacer bind (puerto ocupado, permisos...)
    Bind { address: SocketAddr, source: io::Error },

    /// No se pudo poner el socket en modo listen
    Listen(io::Error),

    /// No se pudo crear algún thread del pool
    WorkerSpawn(io::Error),
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::InvalidAddress { address, source } => {
                write!(f, "invalid listen address {}: {}", address, source)
            }
            StartupError::SocketCreation(e) => write!(f, "socket creation failed: {}", e),
            StartupError::Bind { address, source } => {
                write!(f, "bind to {} failed: {}", address, source)
            }
            StartupError::Listen(e) => write!(f, "listen failed: {}", e),
            StartupError::WorkerSpawn(e) => write!(f, "could not start worker pool: {}", e),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::InvalidAddress { source, .. } => Some(source),
            StartupError::SocketCreation(e) => Some(e),
            StartupError::Bind { source, .. } => Some(source),
            StartupError::Listen(e) => Some(e),
            StartupError::WorkerSpawn(e) => Some(e),
        }
    }
}

/// Error al atender un request
#[derive(Debug)]
pub enum RequestError {
    /// Request line vacía o inválida
    Malformed(ParseError),

    /// Método distinto de GET
    UnsupportedMethod(String),

    /// El archivo no existe
    NotFound,

    /// El path resuelto queda fuera del document root
    Forbidden,

    /// El path apunta a un directorio
    IsDirectory,

    /// El archivo existe pero no se pudo leer
    ReadFailure(io::Error),

    /// Cualquier otra falla inesperada dentro del handler
    Internal(String),
}

impl RequestError {
    /// Código HTTP con el que se responde este error
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::Malformed(_) => StatusCode::BadRequest,
            RequestError::UnsupportedMethod(_) => StatusCode::MethodNotAllowed,
            RequestError::Forbidden => StatusCode::Forbidden,
            RequestError::NotFound | RequestError::IsDirectory => StatusCode::NotFound,
            RequestError::ReadFailure(_) | RequestError::Internal(_) => {
                StatusCode::InternalServerError
            }
        }
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Malformed(e) => write!(f, "malformed request: {}", e),
            RequestError::UnsupportedMethod(m) => write!(f, "unsupported method: {}", m),
            RequestError::NotFound => write!(f, "file not found"),
            RequestError::Forbidden => write!(f, "path escapes document root"),
            RequestError::IsDirectory => write!(f, "path is a directory"),
            RequestError::ReadFailure(e) => write!(f, "could not read file: {}", e),
            RequestError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Malformed(e) => Some(e),
            RequestError::ReadFailure(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for RequestError {
    fn from(e: ParseError) -> Self {
        RequestError::Malformed(e)
    }
}
