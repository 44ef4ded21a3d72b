//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta los resultados de cada conexión. Compartido por todos los
//! workers; cada registro toma el mutex una sola vez.

use crate::server::Outcome;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Máximo de latencias a guardar (para calcular percentiles)
const MAX_LATENCIES: usize = 10_000;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
#[derive(Default)]
struct MetricsData {
    connections: u64,
    status_codes: BTreeMap<u16, u64>,
    bytes_sent: u64,
    malformed_requests: u64,
    io_errors: u64,
    peer_resets: u64,

    /// Latencias registradas (en microsegundos)
    latencies: VecDeque<u64>,

    busy_workers: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData::default())),
            start_time: Instant::now(),
        }
    }

    fn data(&self) -> MutexGuard<'_, MetricsData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registra el resultado de una conexión
    pub fn record(&self, outcome: &Outcome, latency: Duration) {
        let mut data = self.data();

        data.connections += 1;
        data.bytes_sent += outcome.bytes_sent();

        if let Some(status) = outcome.status() {
            *data.status_codes.entry(status.as_u16()).or_insert(0) += 1;
        }

        match outcome {
            Outcome::Malformed { .. } => data.malformed_requests += 1,
            Outcome::Failed { .. } => data.io_errors += 1,
            Outcome::PeerReset { .. } => data.peer_resets += 1,
            Outcome::Served { .. } => {}
        }

        // Si tenemos demasiadas latencias, eliminar las más antiguas
        if data.latencies.len() >= MAX_LATENCIES {
            data.latencies.pop_front();
        }
        data.latencies.push_back(latency.as_micros() as u64);
    }

    pub fn worker_busy(&self) {
        self.data().busy_workers += 1;
    }

    pub fn worker_idle(&self) {
        let mut data = self.data();
        data.busy_workers = data.busy_workers.saturating_sub(1);
    }

    /// Obtiene un snapshot de las métricas
    pub fn snapshot(&self) -> MetricsSnapshot {
        let data = self.data();
        let (p50, p99) = percentiles(&data.latencies);

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            connections: data.connections,
            status_codes: data.status_codes.clone(),
            bytes_sent: data.bytes_sent,
            malformed_requests: data.malformed_requests,
            io_errors: data.io_errors,
            peer_resets: data.peer_resets,
            busy_workers: data.busy_workers,
            latency_p50_us: p50,
            latency_p99_us: p99,
        }
    }

    /// Snapshot serializado como JSON
    pub fn to_json(&self) -> String {
        self.snapshot().to_json()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn percentiles(latencies: &VecDeque<u64>) -> (u64, u64) {
    if latencies.is_empty() {
        return (0, 0);
    }

    let mut sorted: Vec<u64> = latencies.iter().copied().collect();
    sorted.sort_unstable();

    let len = sorted.len();
    (sorted[len * 50 / 100], sorted[len * 99 / 100])
}

/// Snapshot de métricas (para uso externo)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub connections: u64,
    pub status_codes: BTreeMap<u16, u64>,
    pub bytes_sent: u64,
    pub malformed_requests: u64,
    pub io_errors: u64,
    pub peer_resets: u64,
    pub busy_workers: u64,
    pub latency_p50_us: u64,
    pub latency_p99_us: u64,
}

impl MetricsSnapshot {
    /// Respuestas enviadas con `status`
    pub fn responses_with(&self, status: u16) -> u64 {
        self.status_codes.get(&status).copied().unwrap_or(0)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
