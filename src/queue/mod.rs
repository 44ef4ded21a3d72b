//! # Cola de Conexiones
//! src/queue/mod.rs
//!
//! Buffer circular de capacidad fija compartido entre el acceptor y los
//! workers. El acceptor encola sockets aceptados; cada worker desencola el
//! más antiguo. Cuando la cola está llena el acceptor se bloquea
//! (backpressure) en lugar de descartar conexiones.

pub mod connection_queue;

pub use connection_queue::{ConnectionQueue, QueueStats};
