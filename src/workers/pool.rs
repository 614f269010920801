//! # Pool Fijo de Workers
//! src/workers/pool.rs
//!
//! `n` threads de larga vida que consumen la misma [`WorkQueue`]. El pool no
//! sabe nada de sockets: solo ejecuta closures.
//!
//! ## Ciclo de vida
//!
//! ```text
//! new(n) ──► workers esperando en la cola
//!   │
//!   ├─ submit(job) ──► cola FIFO ──► algún worker libre lo ejecuta
//!   │
//!   └─ shutdown() ──► cola cerrada ──► los workers vacían la cola y terminan
//! ```
//!
//! Si el pool se destruye sin `shutdown()` la cola se cierra igual, pero no se
//! espera a los workers.

use super::queue::{Job, SubmitError, WorkQueue};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Un thread del pool
struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
}

/// Pool de tamaño fijo
pub struct WorkerPool {
    queue: Arc<WorkQueue>,
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Crea el pool y arranca `size` workers
    ///
    /// # Errores
    ///
    /// `InvalidInput` si `size` es 0, o el error del sistema si no se pudo
    /// crear algún thread.
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::workers::WorkerPool;
    /// use std::sync::mpsc;
    ///
    /// let pool = WorkerPool::new(2).unwrap();
    /// let (tx, rx) = mpsc::channel();
    /// pool.submit(move || tx.send(42).unwrap()).unwrap();
    /// assert_eq!(rx.recv().unwrap(), 42);
    /// pool.shutdown();
    /// ```
    pub fn new(size: usize) -> io::Result<Self> {
        if size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "worker pool needs at least one worker",
            ));
        }

        let mut pool = Self {
            queue: Arc::new(WorkQueue::new()),
            workers: Vec::with_capacity(size),
        };

        for id in 0..size {
            let queue = Arc::clone(&pool.queue);

            // Si falla a mitad de camino, el Drop del pool cierra la cola y
            // los workers ya creados terminan solos.
            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || Self::worker_loop(id, queue))?;

            pool.workers.push(Worker {
                id,
                handle: Some(handle),
            });
        }

        Ok(pool)
    }

    /// Loop principal del worker: esperar, ejecutar, repetir
    fn worker_loop(id: usize, queue: Arc<WorkQueue>) {
        debug!(worker = id, "worker started");

        while let Some(job) = queue.pop() {
            job();
        }

        debug!(worker = id, "worker stopped");
    }

    /// Encola trabajo para el próximo worker libre
    ///
    /// Nunca bloquea (la cola no tiene límite). Después de `shutdown` el job
    /// se rechaza y vuelve dentro del error.
    pub fn submit<F>(&self, job: F) -> Result<(), SubmitError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit_boxed(Box::new(job))
    }

    /// Igual que [`submit`](Self::submit) para un job ya empaquetado
    pub fn submit_boxed(&self, job: Job) -> Result<(), SubmitError> {
        self.queue.push(job)
    }

    /// Deja de aceptar trabajo, espera a que se vacíe la cola y a que
    /// terminen todos los workers
    pub fn shutdown(mut self) {
        self.queue.close();

        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    tracing::error!(worker = worker.id, "worker panicked");
                }
            }
        }
    }

    /// Cantidad de workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Jobs encolados que todavía no empezó ningún worker
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.queue.close();
    }
}
