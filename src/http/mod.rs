//! # Módulo HTTP
//!
//! Subconjunto mínimo de HTTP/1.1 para servir archivos estáticos:
//!
//! - Parsing de la request line y los headers
//! - Construcción y escritura de responses
//! - Códigos de estado
//! - Content-Type por extensión
//!
//! No hay keep-alive, chunked encoding ni cuerpos de request: un request por
//! conexión y después se cierra.

pub mod mime;     // Tabla extensión → Content-Type
pub mod request;  // Parsing de HTTP requests
pub mod response; // Construcción y escritura de HTTP responses
pub mod status;   // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
