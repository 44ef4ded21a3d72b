//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor concurrente:
//! 1. `tcp`: el acceptor y la coordinación del apagado
//! 2. `pool`: el pool fijo de workers que drena la cola
//! 3. `connection`: lo que hace un worker con cada conexión
//!
//! ```text
//! accept → enqueue → ConnectionQueue → dequeue (worker) → respond → close
//! ```

pub mod connection;
pub mod pool;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::{handle_connection, Outcome, ServeContext};
pub use pool::WorkerPool;
pub use tcp::{Server, ShutdownHandle};
