//! # Workers
//! src/workers/mod.rs
//!
//! Pool fijo de threads que desacopla la aceptación de conexiones del
//! procesamiento de requests.
//!
//! - `queue`: cola FIFO con `Mutex` + `Condvar`
//! - `pool`: los threads que consumen la cola

pub mod pool;
pub mod queue;

pub use pool::WorkerPool;
pub use queue::{Job, SubmitError, WorkQueue};
