//! # Handler de Conexiones
//! src/server/handler.rs
//!
//! Atiende una conexión completa dentro de un worker:
//!
//! ```text
//! leer ─► parsear ─► ¿GET? ─► resolver path ─► ¿existe / no es dir? ─► leer archivo ─► responder
//!            │          │            │                   │                   │
//!            └── 400    └── 405      ├── 404             └── 404             └── 500
//!                                    └── 403 (fuera del root)
//! ```
//!
//! El path se resuelve sin query string (`/app.js?v=2` sirve `app.js`) y con
//! los `%XX` decodificados.
//!
//! Cada error se convierte acá en una respuesta HTTP. Nada se propaga al pool
//! y el stream se cierra al salir de [`handle_connection`], sea cual sea la
//! rama tomada.

use crate::config::Config;
use crate::error::RequestError;
use crate::http::mime::content_type_for;
use crate::http::{Request, Response, StatusCode};
use std::borrow::Cow;
use std::fs;
use std::io::{Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Lo que un worker necesita para atender conexiones. Se comparte entre
/// todos los workers detrás de un `Arc`.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    document_root: PathBuf,
    buffer_size: usize,
    confine_to_root: bool,
}

impl HandlerContext {
    pub fn new(document_root: impl Into<PathBuf>, buffer_size: usize, confine_to_root: bool) -> Self {
        Self {
            document_root: document_root.into(),
            buffer_size,
            confine_to_root,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.document_root, config.buffer_size, !config.unconfined)
    }

    pub fn document_root(&self) -> &Path {
        &self.document_root
    }

    /// Mapea el path del request a un archivo bajo el document root
    ///
    /// Se descarta el query string y se decodifican los `%XX`. `/` es
    /// `/index.html`. Para el resto se quita la `/` inicial y se hace join con
    /// el root, sin tratar `..` de forma especial. Con la restricción activa,
    /// el resultado canonicalizado tiene que quedar dentro del root
    /// canonicalizado; si no, es 403.
    pub fn resolve(&self, request_path: &str) -> Result<PathBuf, RequestError> {
        let without_query = request_path
            .split_once('?')
            .map_or(request_path, |(path, _)| path);

        // Un %XX que no forma UTF-8 válido deja el path como llegó
        let decoded = urlencoding::decode(without_query).unwrap_or(Cow::Borrowed(without_query));

        let relative = match decoded.as_ref() {
            "/" => "index.html",
            other => other.strip_prefix('/').unwrap_or(other),
        };

        let candidate = self.document_root.join(relative);

        if self.confine_to_root {
            let root = self
                .document_root
                .canonicalize()
                .map_err(|_| RequestError::NotFound)?;
            let real = candidate.canonicalize().map_err(|_| RequestError::NotFound)?;

            if !real.starts_with(&root) {
                warn!(path = request_path, "path escapes document root");
                return Err(RequestError::Forbidden);
            }
        }

        Ok(candidate)
    }
}

/// Atiende una conexión: una lectura, una respuesta, cierre
///
/// Retorna el código que se le envió al cliente.
pub fn handle_connection<S: Read + Write>(mut stream: S, context: &HandlerContext) -> StatusCode {
    let mut buffer = vec![0u8; context.buffer_size];

    let response = match stream.read(&mut buffer) {
        Ok(n) => respond(&buffer[..n], context),
        Err(e) => {
            warn!(error = %e, "could not read request");
            Response::error(StatusCode::InternalServerError)
        }
    };

    if let Err(e) = response.write_to(&mut stream) {
        // No se reintenta: el cliente probablemente ya cerró
        debug!(error = %e, "could not write response");
    }

    response.status()
    // `stream` se cierra acá
}

/// Produce la respuesta para los bytes de un request
///
/// Es el único punto donde se atrapan fallas: los errores esperados llegan
/// como `Err` y cualquier panic se convierte en 500. Deja una línea `info!`
/// por request con método, path y código.
pub fn respond(raw: &[u8], context: &HandlerContext) -> Response {
    let mut request_line = None;

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<Response, RequestError> {
        let request = Request::parse(raw)?;
        request_line = Some(format!("{} {}", request.method(), request.path()));
        serve(&request, context)
    }));

    let response = match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            match e.status() {
                StatusCode::InternalServerError => error!(error = %e, "request failed"),
                _ => debug!(error = %e, "request rejected"),
            }
            Response::error(e.status())
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            let e = RequestError::Internal(message);
            error!(error = %e, "handler panicked");
            Response::error(e.status())
        }
    };

    // Un request que no se pudo parsear se loguea como "-"
    info!(
        "{} {}",
        request_line.as_deref().unwrap_or("-"),
        response.status().as_u16()
    );

    response
}

fn serve(request: &Request, context: &HandlerContext) -> Result<Response, RequestError> {
    if !request.is_get() {
        return Err(RequestError::UnsupportedMethod(request.method().to_string()));
    }

    let path = context.resolve(request.path())?;

    let metadata = fs::metadata(&path).map_err(|_| RequestError::NotFound)?;
    if metadata.is_dir() {
        return Err(RequestError::IsDirectory);
    }

    let body = fs::read(&path).map_err(RequestError::ReadFailure)?;

    Ok(Response::new(StatusCode::Ok)
        .with_content_type(content_type_for(&path))
        .with_body_bytes(body))
}
