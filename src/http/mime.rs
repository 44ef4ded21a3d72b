//! # Tipos MIME
//! src/http/mime.rs
//!
//! Tabla fija extensión → Content-Type. Una extensión desconocida no es un
//! error: la respuesta simplemente se envía sin `Content-Type`.

use std::path::Path;

const MIME_TABLE: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("pdf", "application/pdf"),
    ("mp3", "audio/mpeg"),
];

/// Busca el tipo MIME según la extensión del último componente del path
///
/// # Ejemplo
/// ```
/// use file_server::http::mime::mime_type;
///
/// assert_eq!(mime_type("/srv/www/index.html"), Some("text/html"));
/// assert_eq!(mime_type("/srv/www/archive.tar.xz"), None);
/// ```
pub fn mime_type(path: &str) -> Option<&'static str> {
    let extension = Path::new(path).extension()?.to_str()?;

    MIME_TABLE
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| *mime)
}
