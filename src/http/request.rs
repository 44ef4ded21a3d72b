//! # Lectura de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Lee bytes de la conexión hasta tener el header completo y extrae el
//! recurso pedido.
//!
//! ## Formato de un Request HTTP/1.0
//!
//! ```text
//! GET /index.html HTTP/1.0\r\n
//! Host: localhost:8080\r\n
//! \r\n
//! ```
//!
//! Solo se usa el segundo token (el recurso). El método se acepta sin
//! validar: cualquier primer token sirve.

use crate::error::{Result, ServerError};
use std::io::{ErrorKind, Read};

/// Tamaño de cada lectura del socket
const READ_CHUNK: usize = 512;

/// Separador entre headers y body
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Request line parseada
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// Primer token (GET, HEAD...). No se usa para decidir la respuesta.
    pub method: String,

    /// Segundo token, sin `\r`/`\n` al final (ej: "/index.html")
    pub resource_path: String,
}

impl RequestLine {
    /// Parsea los bytes acumulados de un request
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use file_server::http::RequestLine;
    ///
    /// let line = RequestLine::parse(b"GET /index.html HTTP/1.0\r\n\r\n").unwrap();
    /// assert_eq!(line.resource_path, "/index.html");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        let mut tokens = buffer
            .split(|b| b.is_ascii_whitespace())
            .filter(|token| !token.is_empty());

        let method = tokens
            .next()
            .ok_or_else(|| ServerError::MalformedRequest("empty request".to_string()))?;
        let resource = tokens
            .next()
            .ok_or_else(|| ServerError::MalformedRequest("missing resource path".to_string()))?;

        let method = String::from_utf8_lossy(method).into_owned();
        let resource_path = std::str::from_utf8(resource)
            .map_err(|_| ServerError::MalformedRequest("resource path is not UTF-8".to_string()))?
            .trim_end_matches(['\r', '\n'])
            .to_string();

        Ok(Self {
            method,
            resource_path,
        })
    }
}

/// Lee de `conn` hasta encontrar `\r\n\r\n`, hasta que el cliente cierre,
/// o hasta acumular `max_bytes`, y luego parsea la request line.
///
/// Un cliente que cierra sin enviar nada produce `EmptyRequest`; cualquier
/// otro request ilegible produce `MalformedRequest`.
pub fn read_request<R: Read>(conn: &mut R, max_bytes: usize) -> Result<RequestLine> {
    let buffer = read_header_bytes(conn, max_bytes)?;

    if buffer.is_empty() {
        return Err(ServerError::EmptyRequest);
    }

    RequestLine::parse(&buffer)
}

/// Acumula bytes en un buffer que crece según lo recibido
fn read_header_bytes<R: Read>(conn: &mut R, max_bytes: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    while buffer.len() < max_bytes {
        let want = READ_CHUNK.min(max_bytes - buffer.len());

        let bytes_read = match conn.read(&mut chunk[..want]) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ServerError::io("read", e)),
        };

        if bytes_read == 0 {
            // El cliente cerró antes de tiempo
            break;
        }

        // El terminador puede quedar partido entre dos lecturas
        let search_from = buffer.len().saturating_sub(HEADER_TERMINATOR.len() - 1);
        buffer.extend_from_slice(&chunk[..bytes_read]);

        if find_headers_end(&buffer[search_from..]).is_some() {
            break;
        }
    }

    Ok(buffer)
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}
