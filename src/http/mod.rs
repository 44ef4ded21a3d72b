//! # Módulo HTTP
//!
//! Subconjunto mínimo de HTTP/1.0 para servir archivos estáticos:
//!
//! - Lectura de la request line (solo se usa el recurso)
//! - Resolución del recurso a un path del directorio servido
//! - Construcción del header de respuesta
//! - Envío del header y del archivo en bloques
//!
//! ## Especificación HTTP/1.0
//!
//! El protocolo HTTP/1.0 (RFC 1945) es más simple que HTTP/1.1:
//! - No requiere el header `Host`
//! - No tiene chunked transfer encoding
//! - No mantiene conexiones persistentes: una respuesta por conexión
//!
//! ### Formato de Request
//!
//! ```text
//! GET /index.html HTTP/1.0\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 10\r\n
//! \r\n
//! <body>
//! ```

pub mod mime;
pub mod request;
pub mod resolve;
pub mod response;
pub mod status;
pub mod writer;

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{read_request, RequestLine};
pub use resolve::resolve_resource;
pub use response::{BodySource, Response};
pub use status::StatusCode;
pub use writer::ResponseWriter;
