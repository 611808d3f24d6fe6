//! Single-writer shared ownership of a transfer function.
//!
//! The editor keeps the [`SharedTransferFunction`] and is the only writer.
//! Histogram, overlay, and preview charts get [`TransferFunctionView`]s,
//! which can only read.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::curve::TransferFunction;

/// Writer handle over a transfer function.
#[derive(Debug, Default)]
pub struct SharedTransferFunction {
    inner: Arc<RwLock<TransferFunction>>,
}

impl SharedTransferFunction {
    pub fn new(function: TransferFunction) -> Self {
        Self {
            inner: Arc::new(RwLock::new(function)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, TransferFunction> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, TransferFunction> {
        self.inner.write()
    }

    /// A read-only handle for a rendering consumer.
    pub fn view(&self) -> TransferFunctionView {
        TransferFunctionView {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Replace the whole function, e.g. when a preset is picked.
    ///
    /// Subscribers registered on the previous function are moved over.
    pub fn replace(&self, function: TransferFunction) {
        let mut guard = self.inner.write();
        let previous = std::mem::replace(&mut *guard, function);
        guard.adopt_subscribers(previous);
        guard.modified();
        guard.opacity_modified();
    }
}

/// Read-only handle over a shared transfer function.
#[derive(Debug, Clone)]
pub struct TransferFunctionView {
    inner: Arc<RwLock<TransferFunction>>,
}

impl TransferFunctionView {
    pub fn read(&self) -> RwLockReadGuard<'_, TransferFunction> {
        self.inner.read()
    }

    /// RGBA at `x`, through the finalized table when it is current.
    pub fn map_value(&self, x: f64) -> [f64; 4] {
        let function = self.inner.read();
        match function.lookup_table() {
            Some(table) if !function.is_stale() => table.map(x),
            _ => function.map_value(x),
        }
    }
}
