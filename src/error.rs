//! # Errores del Servidor
//! src/error.rs
//!
//! Taxonomía única de errores. Los errores por conexión (`MalformedRequest`,
//! `EmptyRequest`, `Io`, `PeerReset`) nunca terminan un worker; los de arranque
//! (`InvalidCapacity`, `InvalidConfig`, `WorkerSpawn`, `Signal`) abortan el
//! proceso.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// La cola fue cerrada y ya no tiene conexiones pendientes
    #[error("connection queue is closed")]
    QueueClosed,

    /// Request line ilegible o incompleta
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// El cliente cerró sin enviar un solo byte
    #[error("connection closed before any bytes arrived")]
    EmptyRequest,

    /// El cliente reseteó la conexión (esperado durante el shutdown)
    #[error("connection reset by peer")]
    PeerReset,

    /// Error de I/O real en `op` (read, write, stat, open, bind...)
    #[error("I/O error during {op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("queue capacity must be >= 1")]
    InvalidCapacity,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn worker {index}: {source}")]
    WorkerSpawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl ServerError {
    /// Clasifica un `io::Error` producido durante `op`.
    ///
    /// Los resets del cliente se separan del resto para no reportarlos
    /// como errores en el log.
    pub fn io(op: &'static str, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => ServerError::PeerReset,
            _ => ServerError::Io { op, source },
        }
    }

    pub fn is_peer_reset(&self) -> bool {
        matches!(self, ServerError::PeerReset)
    }

    /// Errores que deben abortar el arranque del servidor
    pub fn is_fatal(&self) -> bool {
        match self {
            ServerError::InvalidCapacity
            | ServerError::InvalidConfig(_)
            | ServerError::WorkerSpawn { .. }
            | ServerError::Signal(_) => true,
            ServerError::Io { op, .. } => *op == "bind",
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_kinds_are_peer_reset() {
        for kind in [
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted,
            io::ErrorKind::BrokenPipe,
        ] {
            let err = ServerError::io("write", io::Error::from(kind));
            assert!(err.is_peer_reset(), "{:?} should be a peer reset", kind);
        }
    }

    #[test]
    fn test_other_kinds_are_io() {
        let err = ServerError::io("read", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(!err.is_peer_reset());
        assert!(matches!(err, ServerError::Io { op: "read", .. }));
        assert!(err.to_string().contains("during read"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(ServerError::InvalidCapacity.is_fatal());
        assert!(ServerError::InvalidConfig("x".into()).is_fatal());
        assert!(ServerError::io("bind", io::Error::from(io::ErrorKind::AddrInUse)).is_fatal());
        assert!(!ServerError::io("open", io::Error::from(io::ErrorKind::PermissionDenied)).is_fatal());
        assert!(!ServerError::QueueClosed.is_fatal());
        assert!(!ServerError::MalformedRequest("x".into()).is_fatal());
        assert!(!ServerError::EmptyRequest.is_fatal());
        assert!(!ServerError::PeerReset.is_fatal());
    }
}
