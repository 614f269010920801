//! # Construcción y Escritura de Respuestas
//! src/http/response.rs
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 12\r\n
//! Connection: close\r\n
//! Server: static_server/0.1.0\r\n
//! \r\n
//! <h1>hi</h1>
//! ```
//!
//! Los headers son fijos y siempre van en ese orden. Nunca hay keep-alive.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use static_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_content_type("text/plain")
//!     .with_body_bytes(b"hola".to_vec());
//!
//! let mut wire = Vec::new();
//! response.write_to(&mut wire).unwrap();
//! assert!(wire.ends_with(b"\r\n\r\nhola"));
//! ```

use super::mime::DEFAULT_CONTENT_TYPE;
use super::StatusCode;
use std::io::{self, Write};

/// Versión que va en la status line
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Valor del header `Server`
pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Una respuesta completa. Se construye una vez por request y se descarta
/// después de escribirla.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    content_type: String,
    body: Vec<u8>,
}

impl Response {
    /// Respuesta vacía con `text/plain`
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            body: Vec::new(),
        }
    }

    /// Cambia el Content-Type
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }

    /// Establece el cuerpo. El Content-Length se calcula al serializar.
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Página HTML de error para un código dado
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::NotFound);
    /// assert_eq!(response.body(), b"<html><body><h1>404 Not Found</h1></body></html>");
    /// ```
    pub fn error(status: StatusCode) -> Self {
        let page = format!("<html><body><h1>{}</h1></body></html>", status);
        Self::new(status)
            .with_content_type("text/html")
            .with_body_bytes(page.into_bytes())
    }

    /// Serializa la status line y los headers, incluida la línea vacía final
    pub fn head_bytes(&self) -> Vec<u8> {
        format!(
            "{} {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             Server: {}\r\n\
             \r\n",
            HTTP_VERSION,
            self.status,
            self.content_type,
            self.body.len(),
            SERVER_NAME,
        )
        .into_bytes()
    }

    /// Escribe la respuesta en el stream
    ///
    /// Headers y body van en dos escrituras separadas. Como la conexión se
    /// cierra después, no hay riesgo de mezclarse con otro request.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.head_bytes())?;

        if !self.body.is_empty() {
            writer.write_all(&self.body)?;
        }

        writer.flush()
    }

    /// Código de estado
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Content-Type que se va a enviar
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Cuerpo de la respuesta
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
