//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser de una sola pasada sobre el buffer leído de la conexión.
//!
//! ## Formato aceptado
//!
//! ```text
//! GET /index.html HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! User-Agent: curl/8.5.0\r\n
//! \r\n
//! ```
//!
//! 1. **Request Line**: `METHOD PATH VERSION` separados por espacios (los
//!    espacios extra se ignoran)
//! 2. **Headers**: `Name: Value`, uno por línea, hasta la primera línea vacía
//! 3. **Body**: se ignora, el servidor no acepta cuerpos
//!
//! Se toleran tanto `\r\n` como `\n` solo.
//!
//! ## Limitación conocida
//!
//! El servidor hace una única lectura de tamaño fijo por conexión. Un request
//! cuyos headers no caben en ese buffer se parsea hasta el punto de corte, así
//! que el último header puede quedar truncado.

use std::collections::HashMap;

/// Request HTTP parseado. Inmutable una vez construido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Método tal como llegó (ej: "GET", "POST", "FOO")
    method: String,

    /// Path solicitado, siempre empieza con `/`
    path: String,

    /// Versión HTTP (ej: "HTTP/1.1"), puede venir vacía
    version: String,

    /// Headers con el nombre en minúsculas. Si un nombre se repite gana la
    /// última aparición.
    headers: HashMap<String, String>,
}

/// Errores de parsing. Todos terminan en un 400 Bad Request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No llegó ningún byte útil
    Empty,

    /// La request line no tiene método
    MissingMethod,

    /// El path falta o no empieza con `/`
    InvalidTarget(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "Empty request"),
            ParseError::MissingMethod => write!(f, "Missing method in request line"),
            ParseError::InvalidTarget(t) => write!(f, "Invalid request target: {:?}", t),
        }
    }
}

impl std::error::Error for ParseError {}

impl Request {
    /// Parsea un request desde los bytes leídos del socket
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use static_server::http::Request;
    ///
    /// let raw = b"GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.path(), "/index.html");
    /// assert_eq!(request.header("HOST"), Some("localhost"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Bytes inválidos en UTF-8 se reemplazan; no abortan el parsing
        let text = String::from_utf8_lossy(buffer);

        if text.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let mut lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line));

        // 1. Request line
        let request_line = lines.next().unwrap_or_default();
        let mut parts = request_line.split_whitespace();

        let method = parts.next().unwrap_or_default();
        if method.is_empty() {
            return Err(ParseError::MissingMethod);
        }

        let path = parts.next().unwrap_or_default();
        if !path.starts_with('/') {
            return Err(ParseError::InvalidTarget(path.to_string()));
        }

        let version = parts.next().unwrap_or_default();

        // 2. Headers hasta la línea vacía
        let headers = Self::parse_headers(lines);

        Ok(Request {
            method: method.to_string(),
            path: path.to_string(),
            version: version.to_string(),
            headers,
        })
    }

    /// Parsea las líneas de headers
    ///
    /// Una línea sin `:` se salta; no es error.
    fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> HashMap<String, String> {
        let mut headers = HashMap::new();

        for line in lines {
            if line.is_empty() {
                break;
            }

            let Some((name, value)) = line.split_once(':') else {
                continue;
            };

            let name = trim_horizontal(name);
            if name.is_empty() {
                continue;
            }

            headers.insert(name.to_ascii_lowercase(), trim_horizontal(value).to_string());
        }

        headers
    }

    /// Método HTTP tal como llegó
    pub fn method(&self) -> &str {
        &self.method
    }

    /// `true` si el método es exactamente `GET`
    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Path solicitado
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Todos los headers (nombres en minúsculas)
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Busca un header ignorando mayúsculas/minúsculas en el nombre
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }
}

/// Recorta espacios y tabs, no otros caracteres de control
fn trim_horizontal(s: &str) -> &str {
    s.trim_matches(|c| c == ' ' || c == '\t')
}
