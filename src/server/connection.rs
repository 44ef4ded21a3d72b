//! # Atención de una Conexión
//! src/server/connection.rs
//!
//! Lo que hace un worker con cada conexión desencolada:
//!
//! ```text
//! read_request → resolve_resource → ResponseWriter::respond → close
//! ```
//!
//! Ningún error sale de aquí: todo se traduce a un `Outcome` que el worker
//! registra antes de soltar (y así cerrar) la conexión.

use crate::error::ServerError;
use crate::http::{read_request, resolve_resource, Response, ResponseWriter, StatusCode};
use crate::metrics::MetricsCollector;
use std::io::{Read, Write};
use tracing::{debug, error, warn};

/// Estado inmutable compartido por todos los workers
#[derive(Clone)]
pub struct ServeContext {
    /// Raíz del directorio servido (se concatena con el recurso)
    pub serve_dir: String,

    /// Tope del buffer de lectura del request
    pub max_request_bytes: usize,

    /// Permitir segmentos `..` en el recurso
    pub allow_traversal: bool,

    pub metrics: MetricsCollector,
}

impl ServeContext {
    pub fn new(serve_dir: impl Into<String>) -> Self {
        Self {
            serve_dir: serve_dir.into(),
            max_request_bytes: 8192,
            allow_traversal: false,
            metrics: MetricsCollector::new(),
        }
    }
}

/// Resultado de atender una conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Respuesta completa enviada
    Served { status: StatusCode, bytes: u64 },

    /// Request ilegible; si `bytes > 0` se alcanzó a enviar un 400.
    /// Un cliente que cerró sin enviar nada queda con `bytes == 0`.
    Malformed { bytes: u64 },

    /// Error de I/O real (lectura, stat, open, escritura)
    Failed { bytes: u64 },

    /// El cliente reseteó la conexión a mitad de camino
    PeerReset { bytes: u64 },
}

impl Outcome {
    pub fn bytes_sent(&self) -> u64 {
        match *self {
            Outcome::Served { bytes, .. }
            | Outcome::Malformed { bytes }
            | Outcome::Failed { bytes }
            | Outcome::PeerReset { bytes } => bytes,
        }
    }

    /// Código de estado que llegó al cliente, si hubo uno
    pub fn status(&self) -> Option<StatusCode> {
        match *self {
            Outcome::Served { status, .. } => Some(status),
            Outcome::Malformed { bytes } if bytes > 0 => Some(StatusCode::BadRequest),
            _ => None,
        }
    }
}

/// Atiende una conexión completa
///
/// La conexión se consume: se cierra al salir de esta función, en todos
/// los caminos.
pub fn handle_connection<C: Read + Write>(mut conn: C, ctx: &ServeContext) -> Outcome {
    let request = match read_request(&mut conn, ctx.max_request_bytes) {
        Ok(request) => request,
        Err(ServerError::EmptyRequest) => {
            // Nadie pidió nada: se cierra sin responder
            debug!("Connection closed before any bytes arrived");
            return Outcome::Malformed { bytes: 0 };
        }
        Err(ServerError::MalformedRequest(reason)) => {
            debug!("Malformed request: {}", reason);
            return reject_malformed(conn);
        }
        Err(e) => return failure_outcome(e, 0),
    };

    debug!("{} {}", request.method, request.resource_path);

    let mut writer = ResponseWriter::new(&mut conn);

    let result = match resolve_resource(&ctx.serve_dir, &request.resource_path, ctx.allow_traversal) {
        Some(path) => writer.respond(&path),
        None => {
            warn!("Rejected traversal attempt: {}", request.resource_path);
            writer.send(Response::empty(StatusCode::NotFound))
        }
    };

    let bytes = writer.bytes_written();
    match result {
        Ok(status) => Outcome::Served { status, bytes },
        Err(e) => failure_outcome(e, bytes),
    }
}

/// Envía un 400 a un request ilegible (si el cliente sigue ahí)
fn reject_malformed<C: Write>(mut conn: C) -> Outcome {
    let mut writer = ResponseWriter::new(&mut conn);

    if let Err(e) = writer.send(Response::empty(StatusCode::BadRequest)) {
        debug!("Could not send 400 response: {}", e);
    }

    Outcome::Malformed {
        bytes: writer.bytes_written(),
    }
}

fn failure_outcome(err: ServerError, bytes: u64) -> Outcome {
    if err.is_peer_reset() {
        // Esperado durante el shutdown: no es un error
        debug!("Peer reset the connection");
        Outcome::PeerReset { bytes }
    } else {
        error!("Connection error: {}", err);
        Outcome::Failed { bytes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{self, Cursor};

    /// Conexión en memoria: lee de `input`, escribe en `output`
    struct MemoryConn {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl MemoryConn {
        fn new(request: &[u8]) -> Self {
            Self {
                input: Cursor::new(request.to_vec()),
                output: Vec::new(),
            }
        }
    }

    impl Read for MemoryConn {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MemoryConn {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn context_with(files: &[(&str, &[u8])]) -> (tempfile::TempDir, ServeContext) {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        let ctx = ServeContext::new(dir.path().to_str().unwrap());
        (dir, ctx)
    }

    #[test]
    fn test_serves_existing_file() {
        let (_dir, ctx) = context_with(&[("index.html", b"0123456789")]);
        let mut conn = MemoryConn::new(b"GET /index.html HTTP/1.0\r\n\r\n");

        let outcome = handle_connection(&mut conn, &ctx);

        assert_eq!(outcome.status(), Some(StatusCode::Ok));
        assert_eq!(
            conn.output,
            b"HTTP/1.0 200 OK\r\nContent-Type: text/html\r\nContent-Length: 10\r\n\r\n0123456789"
                .to_vec()
        );
    }

    #[test]
    fn test_missing_file_gets_404() {
        let (_dir, ctx) = context_with(&[]);
        let mut conn = MemoryConn::new(b"GET /missing.txt HTTP/1.0\r\n\r\n");

        let outcome = handle_connection(&mut conn, &ctx);

        assert_eq!(outcome.status(), Some(StatusCode::NotFound));
        assert_eq!(
            conn.output,
            b"HTTP/1.0 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_vec()
        );
    }

    #[test]
    fn test_malformed_request_gets_400() {
        let (_dir, ctx) = context_with(&[]);
        let mut conn = MemoryConn::new(b"GET\r\n\r\n");

        let outcome = handle_connection(&mut conn, &ctx);

        assert!(matches!(outcome, Outcome::Malformed { .. }));
        assert_eq!(
            conn.output,
            b"HTTP/1.0 400 Bad Request\r\nContent-Length: 0\r\n\r\n".to_vec()
        );
    }

    #[test]
    fn test_silent_close_gets_no_response() {
        let (_dir, ctx) = context_with(&[]);
        let mut conn = MemoryConn::new(b"");

        let outcome = handle_connection(&mut conn, &ctx);

        assert_eq!(outcome, Outcome::Malformed { bytes: 0 });
        assert_eq!(outcome.status(), None);
        assert!(conn.output.is_empty());

        ctx.metrics.record(&outcome, std::time::Duration::from_micros(1));
        let snapshot = ctx.metrics.snapshot();
        assert_eq!(snapshot.responses_with(400), 0);
        assert_eq!(snapshot.malformed_requests, 1);
    }

    #[test]
    fn test_traversal_rejected_with_404() {
        let (dir, ctx) = context_with(&[]);
        let inner = dir.path().join("www");
        fs::create_dir(&inner).unwrap();
        fs::write(dir.path().join("secret.txt"), b"top secret").unwrap();

        let ctx = ServeContext {
            serve_dir: inner.to_str().unwrap().to_string(),
            ..ctx
        };
        let mut conn = MemoryConn::new(b"GET /../secret.txt HTTP/1.0\r\n\r\n");

        let outcome = handle_connection(&mut conn, &ctx);

        assert_eq!(outcome.status(), Some(StatusCode::NotFound));
        assert!(!String::from_utf8_lossy(&conn.output).contains("top secret"));
    }

    #[test]
    fn test_traversal_allowed_when_configured() {
        let (dir, ctx) = context_with(&[]);
        let inner = dir.path().join("www");
        fs::create_dir(&inner).unwrap();
        fs::write(dir.path().join("secret.txt"), b"top secret").unwrap();

        let ctx = ServeContext {
            serve_dir: inner.to_str().unwrap().to_string(),
            allow_traversal: true,
            ..ctx
        };
        let mut conn = MemoryConn::new(b"GET /../secret.txt HTTP/1.0\r\n\r\n");

        assert_eq!(handle_connection(&mut conn, &ctx).status(), Some(StatusCode::Ok));
        assert!(conn.output.ends_with(b"top secret"));
    }

    #[test]
    fn test_outcome_accessors() {
        assert_eq!(Outcome::Malformed { bytes: 0 }.status(), None);
        assert_eq!(Outcome::PeerReset { bytes: 3 }.bytes_sent(), 3);
        assert_eq!(Outcome::Failed { bytes: 0 }.status(), None);
    }
}
