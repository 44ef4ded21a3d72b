//! # Envío de Respuestas
//! src/http/writer.rs
//!
//! Escribe el header completo y luego transmite el archivo en bloques de
//! 512 bytes. Ninguna llamada a `write` se asume completa: cada bloque se
//! reintenta hasta que `total_written` alcanza lo leído.
//!
//! El body enviado mide exactamente el `Content-Length` anunciado: si el
//! archivo creció después del `stat` se corta ahí, y si se achicó la
//! respuesta termina en error de lectura.
//!
//! El archivo se cierra al soltar `BodySource` (una sola vez, en cualquier
//! camino de salida).

use super::response::{BodySource, Response};
use super::StatusCode;
use crate::error::{Result, ServerError};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use tracing::debug;

/// Tamaño de cada bloque leído del archivo
pub const CHUNK_SIZE: usize = 512;

/// Escritor de respuestas sobre una conexión
pub struct ResponseWriter<W: Write> {
    conn: W,

    /// Bytes enviados (header + body)
    written: u64,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(conn: W) -> Self {
        Self { conn, written: 0 }
    }

    /// Responde con el archivo en `resolved_path`
    ///
    /// Si `stat`/`open` fallan por algo distinto de "no existe", se intenta
    /// enviar un 500 antes de propagar el error.
    pub fn respond(&mut self, resolved_path: &str) -> Result<StatusCode> {
        match Response::for_file(resolved_path) {
            Ok(response) => self.send(response),
            Err(e) => {
                if !e.is_peer_reset() {
                    if let Err(send_err) = self.send(Response::empty(StatusCode::InternalServerError)) {
                        debug!("Could not send 500 response: {}", send_err);
                    }
                }
                Err(e)
            }
        }
    }

    /// Envía una respuesta ya construida
    pub fn send(&mut self, response: Response) -> Result<StatusCode> {
        let (status, head, body) = response.into_parts();

        self.write_fully(&head)?;

        if let BodySource::File { mut file, len } = body {
            self.stream_file(&mut file, len)?;
        }

        self.conn.flush().map_err(|e| ServerError::io("flush", e))?;

        Ok(status)
    }

    /// Transmite exactamente `len` bytes del archivo en bloques de `CHUNK_SIZE`
    fn stream_file(&mut self, file: &mut File, len: u64) -> Result<()> {
        let mut buffer = [0u8; CHUNK_SIZE];
        let mut body = file.take(len);
        let mut sent: u64 = 0;

        loop {
            let bytes_read = match body.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ServerError::io("read", e)),
            };

            self.write_fully(&buffer[..bytes_read])?;
            sent += bytes_read as u64;
        }

        if sent < len {
            // El archivo se achicó entre el stat y la lectura
            return Err(ServerError::io(
                "read",
                std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("file ended after {} of {} bytes", sent, len),
                ),
            ));
        }

        Ok(())
    }

    /// Escribe `buf` completo, acumulando escrituras parciales
    fn write_fully(&mut self, buf: &[u8]) -> Result<()> {
        let mut total_written = 0;

        while total_written < buf.len() {
            match self.conn.write(&buf[total_written..]) {
                Ok(0) => {
                    return Err(ServerError::io(
                        "write",
                        std::io::Error::from(ErrorKind::WriteZero),
                    ));
                }
                Ok(n) => {
                    total_written += n;
                    self.written += n as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ServerError::io("write", e)),
            }
        }

        Ok(())
    }

    /// Bytes enviados hasta ahora
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.conn
    }
}
