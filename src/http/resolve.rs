//! # Resolución de Recursos
//! src/http/resolve.rs
//!
//! El path del archivo es la concatenación literal del directorio servido
//! con el recurso pedido. Lo único que se agrega es el rechazo opcional de
//! segmentos `..`.

/// Concatena `serve_dir` con `resource_path`
///
/// Retorna `None` cuando `allow_traversal` es `false` y el recurso contiene
/// un segmento `..`.
///
/// # Ejemplo
/// ```
/// use file_server::http::resolve_resource;
///
/// assert_eq!(
///     resolve_resource("/srv/www", "/index.html", false).as_deref(),
///     Some("/srv/www/index.html")
/// );
/// assert_eq!(resolve_resource("/srv/www", "/../etc/passwd", false), None);
/// ```
pub fn resolve_resource(serve_dir: &str, resource_path: &str, allow_traversal: bool) -> Option<String> {
    if !allow_traversal && has_parent_segment(resource_path) {
        return None;
    }

    Some(format!("{}{}", serve_dir, resource_path))
}

fn has_parent_segment(resource_path: &str) -> bool {
    resource_path.split(['/', '\\']).any(|segment| segment == "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_concatenation() {
        assert_eq!(
            resolve_resource("files", "/a/b.txt", false).as_deref(),
            Some("files/a/b.txt")
        );
        // Sin normalizar: ni barras dobles ni `.` se tocan
        assert_eq!(
            resolve_resource("files/", "/./x", false).as_deref(),
            Some("files//./x")
        );
    }

    #[test]
    fn test_parent_segments_rejected() {
        assert_eq!(resolve_resource("files", "/../secret", false), None);
        assert_eq!(resolve_resource("files", "/a/../../secret", false), None);
        assert_eq!(resolve_resource("files", "/a/..", false), None);
        assert_eq!(resolve_resource("files", "/a\\..\\b", false), None);
    }

    #[test]
    fn test_dots_inside_names_are_fine() {
        assert!(resolve_resource("files", "/..hidden", false).is_some());
        assert!(resolve_resource("files", "/v1..2/notes.txt", false).is_some());
    }

    #[test]
    fn test_traversal_allowed_when_configured() {
        assert_eq!(
            resolve_resource("files", "/../secret", true).as_deref(),
            Some("files/../secret")
        );
    }
}
