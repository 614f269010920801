//! # Tipos de Contenido
//! src/http/mime.rs
//!
//! Tabla fija extensión → Content-Type. La comparación es por sufijo exacto
//! (sensible a mayúsculas) sobre el path del archivo.

use std::path::Path;

/// Content-Type cuando ninguna extensión coincide
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

const CONTENT_TYPES: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".htm", "text/html"),
    (".css", "text/css"),
    (".js", "application/javascript"),
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".gif", "image/gif"),
    (".svg", "image/svg+xml"),
    (".ico", "image/x-icon"),
    (".json", "application/json"),
    (".xml", "application/xml"),
    (".pdf", "application/pdf"),
    (".txt", "text/plain"),
];

/// Infiere el Content-Type de un archivo por su sufijo
///
/// # Ejemplo
/// ```
/// use std::path::Path;
/// use static_server::http::mime::content_type_for;
///
/// assert_eq!(content_type_for(Path::new("Pub/index.html")), "text/html");
/// assert_eq!(content_type_for(Path::new("Pub/data.bin")), "text/plain");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    let path = path.to_string_lossy();

    CONTENT_TYPES
        .iter()
        .find(|(suffix, _)| path.ends_with(suffix))
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
