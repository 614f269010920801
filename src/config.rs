//! # Configuración del Servidor
//! src/config.rs
//!
//! Argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./static_server 8080 ./Pub --workers 16 --read-timeout-ms 30000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=9000 DOCUMENT_ROOT=/srv/www ./static_server
//! ```

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Tope del buffer de lectura. Se reserva entero por conexión.
pub const MAX_BUFFER_SIZE: usize = 1024 * 1024;

/// Configuración del servidor de archivos estáticos
#[derive(Debug, Clone, Parser, Serialize)]
#[command(name = "static_server")]
#[command(about = "Servidor HTTP/1.1 de archivos estáticos con pool fijo de workers")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(default_value_t = 8080, env = "HTTP_PORT")]
    pub port: u16,

    /// Directorio raíz desde donde se sirven los archivos
    #[arg(default_value = "./Pub", env = "DOCUMENT_ROOT")]
    pub document_root: PathBuf,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Número de workers que atienden conexiones
    #[arg(short, long, default_value_t = 10, env = "WORKERS")]
    pub workers: usize,

    /// Tamaño del buffer de lectura por conexión (se hace una sola lectura)
    #[arg(long = "buffer-size", default_value_t = 4096, env = "BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Timeout de lectura/escritura por conexión en milisegundos (0 = sin timeout)
    #[arg(long = "read-timeout-ms", default_value_t = 0, env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Sirve paths fuera del document root (join sin verificar `..`)
    #[arg(long, env = "UNCONFINED")]
    pub unconfined: bool,

    /// Nivel de log: error, warn, info, debug, trace
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    /// Imprime la configuración efectiva en JSON y termina
    #[arg(long = "print-config")]
    #[serde(skip)]
    pub print_config: bool,
}

impl Config {
    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use static_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout por conexión, `None` si está deshabilitado
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    /// Nivel de log parseado
    pub fn level(&self) -> Result<tracing::Level, String> {
        self.log_level
            .parse()
            .map_err(|_| format!("Invalid log level: {}", self.log_level))
    }

    /// Valida la configuración
    ///
    /// Un document root inexistente no es error: el servidor arranca y
    /// responde 404 a todo.
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }

        if self.buffer_size == 0 {
            return Err("Buffer size must be >= 1".to_string());
        }

        if self.buffer_size > MAX_BUFFER_SIZE {
            return Err(format!(
                "Buffer size must be <= {} bytes, got {}",
                MAX_BUFFER_SIZE, self.buffer_size
            ));
        }

        self.level()?;

        if !self.document_root.is_dir() {
            warn!(
                root = %self.document_root.display(),
                "document root does not exist or is not a directory"
            );
        }

        Ok(())
    }

    /// Configuración efectiva en JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Loguea un resumen de la configuración
    pub fn print_summary(&self) {
        info!("address:        {}", self.address());
        info!("document root:  {}", self.document_root.display());
        info!("workers:        {}", self.workers);
        info!("buffer size:    {} bytes", self.buffer_size);
        match self.read_timeout() {
            Some(timeout) => info!("read timeout:   {} ms", timeout.as_millis()),
            None => info!("read timeout:   disabled"),
        }
        if self.unconfined {
            warn!("root confinement disabled: '..' in paths can escape the document root");
        }
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            document_root: PathBuf::from("./Pub"),
            host: "127.0.0.1".to_string(),
            workers: 10,
            buffer_size: 4096,
            read_timeout_ms: 0,
            unconfined: false,
            log_level: "info".to_string(),
            print_config: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.document_root, PathBuf::from("./Pub"));
        assert_eq!(config.workers, 10);
        assert_eq!(config.buffer_size, 4096);
        assert!(config.read_timeout().is_none());
        assert!(!config.unconfined);
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "0.0.0.0".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_positional_arguments() {
        let config = Config::try_parse_from(["static_server", "9090", "/srv/www"]).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.document_root, PathBuf::from("/srv/www"));
    }

    #[test]
    fn test_options() {
        let config = Config::try_parse_from([
            "static_server",
            "--workers",
            "3",
            "--read-timeout-ms",
            "1500",
            "--unconfined",
        ])
        .unwrap();

        assert_eq!(config.workers, 3);
        assert_eq!(config.read_timeout(), Some(Duration::from_millis(1500)));
        assert!(config.unconfined);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Config::try_parse_from(["static_server", "http"]).is_err());
        assert!(Config::try_parse_from(["static_server", "70000"]).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut config = Config::default();
        config.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_buffer() {
        let mut config = Config::default();
        config.buffer_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_buffer_size() {
        let mut config = Config::default();

        config.buffer_size = MAX_BUFFER_SIZE;
        assert!(config.validate().is_ok());

        config.buffer_size = MAX_BUFFER_SIZE + 1;
        assert!(config.validate().is_err());

        config.buffer_size = usize::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let mut config = Config::default();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        config.log_level = "debug".to_string();
        assert_eq!(config.level(), Ok(tracing::Level::DEBUG));
    }

    #[test]
    fn test_to_json() {
        let json = Config::default().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["port"], 8080);
        assert_eq!(value["workers"], 10);
        assert_eq!(value["document_root"], "./Pub");
        assert!(value.get("print_config").is_none());
    }
}
