//! # Static Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo de archivos estáticos: un request por conexión,
//! atendido por un pool fijo de workers.
//!
//! ## Arquitectura
//!
//! - `config`: argumentos CLI y variables de entorno
//! - `error`: errores de arranque y de request
//! - `http`: parsing de requests, escritura de responses, status codes, MIME
//! - `server`: accept loop y handler de conexiones
//! - `workers`: pool fijo de threads con cola FIFO
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use static_server::config::Config;
//! use static_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(&config).expect("Error al iniciar servidor");
//! server.run();
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod server;
pub mod workers;
