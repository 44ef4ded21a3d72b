//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Contadores del servidor de archivos:
//! - Conexiones atendidas y respuestas por código de estado
//! - Bytes enviados
//! - Requests malformados, errores de I/O y resets del cliente
//! - Latencias por conexión (p50, p99)
//! - Workers ocupados

pub mod collector;

pub use collector::{MetricsCollector, MetricsSnapshot};
