//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! - `tcp`: socket de escucha, accept loop y apagado
//! - `handler`: lo que hace un worker con cada conexión
//!
//! ```text
//! accept ─► pool.submit ─► worker ─► handle_connection ─► close
//! ```

pub mod handler;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use handler::HandlerContext;
pub use tcp::{Server, ShutdownHandle};
