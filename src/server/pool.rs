//! # Pool de Workers
//! src/server/pool.rs
//!
//! Número fijo de threads que comparten una sola cola. Cada worker:
//!
//! ```text
//! Idle (bloqueado en dequeue) → Serving (request + response) → Idle
//!                    └── QueueClosed → Stopped
//! ```
//!
//! Un request fallido nunca termina el worker: se registra, se cierra la
//! conexión y se vuelve a `dequeue`.

use super::connection::{handle_connection, ServeContext};
use crate::error::{Result, ServerError};
use crate::queue::ConnectionQueue;
use std::io::{Read, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info};

pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Inicia `size` workers sobre `queue`
    ///
    /// Si algún thread no puede crearse, la cola se cierra, los workers ya
    /// iniciados se esperan y se retorna `WorkerSpawn`.
    pub fn spawn<C>(size: usize, queue: Arc<ConnectionQueue<C>>, ctx: Arc<ServeContext>) -> Result<Self>
    where
        C: Read + Write + Send + 'static,
    {
        let mut handles = Vec::with_capacity(size);

        for index in 0..size {
            let queue_worker = Arc::clone(&queue);
            let ctx_worker = Arc::clone(&ctx);

            let spawned = thread::Builder::new()
                .name(format!("worker-{}", index))
                .spawn(move || worker_loop(index, &queue_worker, &ctx_worker));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    queue.shutdown();
                    WorkerPool { handles }.join();
                    return Err(ServerError::WorkerSpawn { index, source });
                }
            }
        }

        info!("Started {} workers", size);

        Ok(Self { handles })
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Espera a que todos los workers lleguen a `Stopped`
    ///
    /// Retorna cuántos terminaron limpiamente (sin pánico).
    pub fn join(self) -> usize {
        let mut stopped = 0;

        for handle in self.handles {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            match handle.join() {
                Ok(()) => stopped += 1,
                Err(_) => error!("{} panicked", name),
            }
        }

        stopped
    }
}

/// Loop principal del worker
fn worker_loop<C: Read + Write>(index: usize, queue: &ConnectionQueue<C>, ctx: &ServeContext) {
    debug!("Worker {} started", index);

    // Esperar por una conexión; QueueClosed es la única salida
    while let Ok(conn) = queue.dequeue() {
        ctx.metrics.worker_busy();
        let start = Instant::now();

        let outcome = handle_connection(conn, ctx);

        ctx.metrics.record(&outcome, start.elapsed());
        ctx.metrics.worker_idle();
    }

    debug!("Worker {} stopped", index);
}
