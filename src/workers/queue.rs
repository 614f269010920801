//! # Cola de Trabajo
//! src/workers/queue.rs
//!
//! Cola FIFO thread-safe de unidades de trabajo. Un único `Mutex` protege
//! tanto los items como la bandera de cierre, y un `Condvar` despierta a los
//! workers que esperan.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Unidad de trabajo diferida
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Error al encolar trabajo
pub enum SubmitError {
    /// La cola ya se cerró; se devuelve el job sin ejecutar
    ShutDown(Job),
}

impl std::fmt::Debug for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::ShutDown(_) => f.write_str("ShutDown(..)"),
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::ShutDown(_) => write!(f, "worker pool is shut down"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Estado protegido por el mutex
struct QueueState {
    jobs: VecDeque<Job>,
    closed: bool,
}

/// Cola FIFO con espera bloqueante
pub struct WorkQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl WorkQueue {
    /// Crea una cola vacía y abierta
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    // Los jobs corren fuera del lock, así que un panic dentro de un job no
    // puede dejar el estado a medias.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola un job al final
    ///
    /// Despierta a un solo worker. Si la cola está cerrada el job se devuelve.
    pub fn push(&self, job: Job) -> Result<(), SubmitError> {
        let mut state = self.lock();

        if state.closed {
            return Err(SubmitError::ShutDown(job));
        }

        state.jobs.push_back(job);
        drop(state);

        self.available.notify_one();
        Ok(())
    }

    /// Saca el siguiente job, bloqueando hasta que haya uno
    ///
    /// Retorna `None` solo cuando la cola está cerrada y vacía: los jobs ya
    /// encolados se entregan aunque se haya pedido el cierre.
    pub fn pop(&self) -> Option<Job> {
        let mut state = self.lock();

        loop {
            if let Some(job) = state.jobs.pop_front() {
                return Some(job);
            }

            if state.closed {
                return None;
            }

            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Cierra la cola y despierta a todos los que esperan
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_all();
    }

    /// `true` si ya se llamó a `close`
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Cantidad de jobs esperando
    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    fn recording_job(log: &Arc<Mutex<Vec<usize>>>, n: usize) -> Job {
        let log = Arc::clone(log);
        Box::new(move || log.lock().unwrap().push(n))
    }

    #[test]
    fn test_fifo_order() {
        let queue = WorkQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for n in 0..5 {
            queue.push(recording_job(&log, n)).unwrap();
        }
        assert_eq!(queue.len(), 5);

        for _ in 0..5 {
            let job = queue.pop().unwrap();
            job();
        }
        assert!(queue.is_empty());

        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_push_after_close_is_rejected() {
        let queue = WorkQueue::new();
        queue.close();

        let result = queue.push(Box::new(|| {}));
        assert!(matches!(result, Err(SubmitError::ShutDown(_))));
        assert!(queue.is_empty());
        assert!(queue.is_closed());
    }

    #[test]
    fn test_pop_drains_before_returning_none() {
        let queue = WorkQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        queue.push(recording_job(&log, 1)).unwrap();
        queue.push(recording_job(&log, 2)).unwrap();
        queue.close();

        while let Some(job) = queue.pop() {
            job();
        }

        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_close_wakes_blocked_pop() {
        let queue = Arc::new(WorkQueue::new());

        let waiter = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop().is_none())
        };

        thread::sleep(Duration::from_millis(50));
        queue.close();

        assert!(waiter.join().unwrap());
    }

    #[test]
    fn test_push_wakes_blocked_pop() {
        let queue = Arc::new(WorkQueue::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let waiter = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                if let Some(job) = queue.pop() {
                    job();
                }
            })
        };

        thread::sleep(Duration::from_millis(50));
        queue.push(recording_job(&log, 7)).unwrap();
        waiter.join().unwrap();

        assert_eq!(*log.lock().unwrap(), vec![7]);
    }
}
