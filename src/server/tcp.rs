//! # Servidor TCP con Pool de Workers
//! src/server/tcp.rs
//!
//! El thread que llama a `run` es el acceptor: acepta conexiones y las
//! encola. Los workers las atienden. Al recibir la señal de apagado:
//!
//! 1. El acceptor deja de aceptar.
//! 2. Se llama `shutdown()` sobre la cola una sola vez.
//! 3. Se espera a que todos los workers terminen de drenarla.
//! 4. Recién entonces se libera la cola.

use super::connection::ServeContext;
use super::pool::WorkerPool;
use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::queue::ConnectionQueue;
use std::io::{self, ErrorKind};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Pausa tras un error de `accept` (ej: EMFILE) antes de reintentar
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Servidor HTTP/1.0 de archivos estáticos
pub struct Server {
    config: Config,
    listener: TcpListener,
    shutdown: ShutdownHandle,
    metrics: MetricsCollector,
}

impl Server {
    /// Valida la configuración y abre el socket de escucha
    pub fn bind(config: Config) -> Result<Self> {
        config.validate()?;

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|e| ServerError::io("bind", e))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::io("bind", e))?;

        info!("Listening on {}", local_addr);

        Ok(Self {
            config,
            listener,
            shutdown: ShutdownHandle::new(local_addr),
            metrics: MetricsCollector::new(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| ServerError::io("local_addr", e))
    }

    /// Handle para pedir el apagado desde otro thread (o un signal handler)
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Corre el acceptor hasta que se dispare el `ShutdownHandle`
    ///
    /// Retorna las métricas finales después de drenar la cola.
    pub fn run(self) -> Result<MetricsSnapshot> {
        let queue = Arc::new(ConnectionQueue::<TcpStream>::new(self.config.queue_capacity)?);

        let ctx = Arc::new(ServeContext {
            serve_dir: self.config.serve_dir.clone(),
            max_request_bytes: self.config.max_request_bytes,
            allow_traversal: self.config.allow_path_traversal,
            metrics: self.metrics.clone(),
        });

        let pool = WorkerPool::spawn(self.config.workers, Arc::clone(&queue), ctx)?;

        self.accept_loop(&queue);

        // Cerrar la cola una sola vez y drenar lo pendiente
        let stats = queue.stats();
        info!(
            queued = stats.length,
            capacity = stats.capacity,
            "Shutting down: draining queued connections"
        );
        queue.shutdown();

        let workers = pool.size();
        let stopped = pool.join();
        info!("{} of {} workers stopped", stopped, workers);

        match Arc::try_unwrap(queue) {
            Ok(queue) => {
                let leftovers = queue.teardown();
                if !leftovers.is_empty() {
                    warn!("{} connections were never served", leftovers.len());
                }
            }
            Err(_) => warn!("Connection queue still shared at teardown"),
        }

        Ok(self.metrics.snapshot())
    }

    fn accept_loop(&self, queue: &ConnectionQueue<TcpStream>) {
        for stream in self.listener.incoming() {
            if self.shutdown.is_triggered() {
                // Puede ser la conexión de despertar; se cierra al soltarla
                break;
            }

            match stream {
                Ok(stream) => {
                    let peer = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());
                    debug!("Accepted connection from {}", peer);

                    // Bloquea si la cola está llena
                    if queue.enqueue(stream).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    if let Some(pause) = accept_backoff(&e) {
                        error!("Failed to accept connection: {}", e);
                        thread::sleep(pause);
                    }
                }
            }
        }

        debug!("Acceptor stopped");
    }
}

/// Cuánto esperar antes de volver a `accept()` después de `err`
///
/// `Interrupted` se reintenta en el acto; cualquier otro error suele
/// persistir (sin descriptores libres, por ejemplo) y se espera un poco.
fn accept_backoff(err: &io::Error) -> Option<Duration> {
    match err.kind() {
        ErrorKind::Interrupted => None,
        _ => Some(ACCEPT_ERROR_BACKOFF),
    }
}

/// Señal de apagado compartida entre el signal handler y el acceptor
#[derive(Clone)]
pub struct ShutdownHandle {
    triggered: Arc<AtomicBool>,

    /// Dirección propia del listener, para despertar a `accept()`
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    fn new(listen_addr: SocketAddr) -> Self {
        Self {
            triggered: Arc::new(AtomicBool::new(false)),
            wake_addr: loopback_for(listen_addr),
        }
    }

    /// Pide el apagado. Idempotente.
    ///
    /// El acceptor está bloqueado en `accept()`: se le abre una conexión
    /// propia para que despierte y vea la bandera.
    pub fn trigger(&self) {
        if self.triggered.swap(true, Ordering::SeqCst) {
            return;
        }

        info!("Shutdown requested");

        if let Err(e) = TcpStream::connect_timeout(&self.wake_addr, Duration::from_secs(1)) {
            debug!("Wake-up connection failed: {}", e);
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}

/// Un listener en 0.0.0.0 / :: se alcanza por loopback
fn loopback_for(addr: SocketAddr) -> SocketAddr {
    let ip = match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, addr.port())
}
