//! # Cola Acotada Thread-Safe
//! src/queue/connection_queue.rs
//!
//! Implementa el ring buffer con semántica bloqueante productor/consumidor.
//!
//! ## Reglas
//!
//! - `enqueue` bloquea mientras `len == capacity` y la cola sigue abierta.
//! - `dequeue` bloquea mientras `len == 0` y la cola sigue abierta.
//! - `shutdown` despierta a todos (broadcast en ambas condvars).
//! - Después del shutdown `dequeue` sigue entregando lo que quedó en el
//!   buffer; solo una cola vacía *y* cerrada retorna `QueueClosed`.

use crate::error::{Result, ServerError};
use serde::Serialize;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Estado protegido por el mutex
struct RingState<T> {
    slots: Vec<Option<T>>,
    read_idx: usize,
    write_idx: usize,
    length: usize,
    shutdown: bool,
}

impl<T> RingState<T> {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn is_full(&self) -> bool {
        self.length == self.capacity()
    }

    fn push(&mut self, item: T) {
        let idx = self.write_idx;
        self.slots[idx] = Some(item);
        self.write_idx = (idx + 1) % self.capacity();
        self.length += 1;
    }

    fn pop(&mut self) -> Option<T> {
        let idx = self.read_idx;
        let item = self.slots[idx].take()?;
        self.read_idx = (idx + 1) % self.capacity();
        self.length -= 1;
        Some(item)
    }
}

/// Cola FIFO acotada con cierre cooperativo
pub struct ConnectionQueue<T> {
    state: Mutex<RingState<T>>,

    /// Señalada cuando se libera un slot
    not_full: Condvar,

    /// Señalada cuando llega un elemento nuevo
    not_empty: Condvar,
}

impl<T> ConnectionQueue<T> {
    /// Crea una cola vacía con capacidad fija
    ///
    /// La capacidad nunca cambia después de la construcción.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ServerError::InvalidCapacity);
        }

        let slots = (0..capacity).map(|_| None).collect();

        Ok(Self {
            state: Mutex::new(RingState {
                slots,
                read_idx: 0,
                write_idx: 0,
                length: 0,
                shutdown: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        })
    }

    // Ninguna sección crítica puede entrar en pánico a mitad de una
    // mutación, así que un mutex envenenado sigue siendo consistente.
    fn lock(&self) -> MutexGuard<'_, RingState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola un elemento, bloqueando mientras la cola esté llena
    ///
    /// Si la cola se cierra mientras se espera, retorna `QueueClosed` sin
    /// insertar; el elemento se descarta (para un socket, se cierra).
    pub fn enqueue(&self, item: T) -> Result<()> {
        let mut state = self.lock();

        while state.is_full() && !state.shutdown {
            state = self
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        if state.shutdown {
            return Err(ServerError::QueueClosed);
        }

        state.push(item);

        // Despertar a un worker esperando
        self.not_empty.notify_one();

        Ok(())
    }

    /// Desencola el elemento más antiguo, bloqueando mientras esté vacía
    ///
    /// Retorna `QueueClosed` solo cuando la cola está vacía y cerrada.
    pub fn dequeue(&self) -> Result<T> {
        let mut state = self.lock();

        while state.length == 0 && !state.shutdown {
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        // Solo salir si no queda trabajo
        let item = state.pop().ok_or(ServerError::QueueClosed)?;

        self.not_full.notify_one();

        Ok(item)
    }

    /// Cierra la cola y despierta a todos los threads bloqueados
    ///
    /// Idempotente: llamarla varias veces equivale a llamarla una vez.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        state.shutdown = true;

        // Pueden haber varios threads estacionados en cada condvar
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Libera la cola y retorna los elementos que quedaron en el buffer
    ///
    /// Consume la cola: solo el dueño único puede llamarla, por lo que ningún
    /// thread puede seguir bloqueado en `enqueue`/`dequeue`.
    pub fn teardown(self) -> Vec<T> {
        let mut state = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let mut remaining = Vec::with_capacity(state.length);
        while let Some(item) = state.pop() {
            remaining.push(item);
        }
        remaining
    }

    /// Número de elementos en el buffer
    pub fn len(&self) -> usize {
        self.lock().length
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn is_shutdown(&self) -> bool {
        self.lock().shutdown
    }

    /// Obtiene estadísticas de la cola
    pub fn stats(&self) -> QueueStats {
        let state = self.lock();

        QueueStats {
            length: state.length,
            capacity: state.capacity(),
            shutdown: state.shutdown,
        }
    }
}

/// Estadísticas de la cola
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub length: usize,
    pub capacity: usize,
    pub shutdown: bool,
}
