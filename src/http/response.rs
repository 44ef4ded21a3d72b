//! # Construcción de Respuestas HTTP
//!
//! Este módulo arma la respuesta HTTP/1.0 para un archivo del directorio
//! servido. El header se serializa completo en memoria; el body se envía
//! después, directo desde el archivo abierto (ver `writer`).
//!
//! ## Formato de una respuesta HTTP/1.0
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 10\r\n
//! \r\n
//! <10 bytes del archivo>
//! ```
//!
//! Para un archivo inexistente:
//!
//! ```text
//! HTTP/1.0 404 Not Found\r\n
//! Content-Length: 0\r\n
//! \r\n
//! ```

use super::mime::mime_type;
use super::StatusCode;
use crate::error::{Result, ServerError};
use std::fs::{self, File};
use std::io::ErrorKind;

/// Origen del cuerpo de la respuesta
#[derive(Debug)]
pub enum BodySource {
    /// Sin body (Content-Length: 0)
    Empty,

    /// Archivo abierto en modo lectura y su tamaño según `stat`
    File { file: File, len: u64 },
}

/// Representa una respuesta HTTP/1.0 lista para enviar
#[derive(Debug)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers en el orden en que se escriben al socket
    headers: Vec<(String, String)>,

    body: BodySource,
}

impl Response {
    /// Respuesta sin body: solo status line y `Content-Length: 0`
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::http::{Response, StatusCode};
    ///
    /// let response = Response::empty(StatusCode::NotFound);
    /// assert_eq!(
    ///     response.head_bytes(),
    ///     b"HTTP/1.0 404 Not Found\r\nContent-Length: 0\r\n\r\n"
    /// );
    /// ```
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: BodySource::Empty,
        }
        .with_header("Content-Length", "0")
    }

    /// Construye la respuesta para `resolved_path`
    ///
    /// - No existe → 404 sin body.
    /// - Existe pero no es un archivo regular (ej: directorio) → 404.
    /// - Otro fallo de `stat`, o `open` falla después de un `stat`
    ///   exitoso → `ServerError::Io`.
    pub fn for_file(resolved_path: &str) -> Result<Self> {
        let metadata = match fs::metadata(resolved_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(Self::empty(StatusCode::NotFound));
            }
            Err(e) => return Err(ServerError::io("stat", e)),
        };

        if !metadata.is_file() {
            return Ok(Self::empty(StatusCode::NotFound));
        }

        let file = File::open(resolved_path).map_err(|e| ServerError::io("open", e))?;
        let len = metadata.len();

        let mut response = Self {
            status: StatusCode::Ok,
            headers: Vec::new(),
            body: BodySource::File { file, len },
        };

        if let Some(mime) = mime_type(resolved_path) {
            response.add_header("Content-Type", mime);
        }
        response.add_header("Content-Length", &len.to_string());

        Ok(response)
    }

    /// Agrega un header al final de la lista
    fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Serializa status line + headers + línea vacía
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut result = format!("HTTP/1.0 {}\r\n", self.status).into_bytes();

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        // Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        result
    }

    /// Separa el header serializado del body para enviarlos
    pub(crate) fn into_parts(self) -> (StatusCode, Vec<u8>, BodySource) {
        let head = self.head_bytes();
        (self.status, head, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
        response
            .headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_empty_response_framing() {
        let response = Response::empty(StatusCode::BadRequest);
        let text = String::from_utf8(response.head_bytes()).unwrap();
        assert_eq!(text, "HTTP/1.0 400 Bad Request\r\nContent-Length: 0\r\n\r\n");
        assert!(matches!(response.body, BodySource::Empty));
    }

    #[test]
    fn test_found_file_headers_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, b"0123456789").unwrap();

        let response = Response::for_file(path.to_str().unwrap()).unwrap();

        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(
            response.head_bytes(),
            b"HTTP/1.0 200 OK\r\nContent-Type: text/html\r\nContent-Length: 10\r\n\r\n"
        );
        assert!(matches!(response.body, BodySource::File { len: 10, .. }));
    }

    #[test]
    fn test_unknown_extension_omits_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, b"abc").unwrap();

        let response = Response::for_file(path.to_str().unwrap()).unwrap();

        assert_eq!(header(&response, "Content-Type"), None);
        assert_eq!(header(&response, "Content-Length"), Some("3"));
        assert_eq!(response.headers.len(), 1);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let response = Response::for_file(path.to_str().unwrap()).unwrap();

        assert_eq!(response.status, StatusCode::NotFound);
        assert_eq!(
            response.head_bytes(),
            b"HTTP/1.0 404 Not Found\r\nContent-Length: 0\r\n\r\n"
        );
    }

    #[test]
    fn test_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let response = Response::for_file(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(response.status, StatusCode::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_stat_failure_other_than_missing_is_io_error() {
        // Un componente intermedio que es archivo → ENOTDIR, no ENOENT
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();
        let bogus = format!("{}/child.txt", file.to_str().unwrap());

        let result = Response::for_file(&bogus);
        assert!(matches!(result, Err(ServerError::Io { op: "stat", .. })));
    }
}
