//! Observable property cells and the change-notification hub.
//!
//! Each stateful entity declares its attributes as [`Observable`] fields and
//! writes them through a shared [`PropertyStore`]. The store only notifies
//! when a write actually changes the value, so bindings never see a
//! notification for a no-op write.

use std::fmt;

use derive_more::{Display, Error};
use tokio::sync::mpsc;
use tracing::{instrument, trace};

/// Failure reading an observable cell.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum StoreError {
    /// The cell was read before its first write.
    #[display("property {key} was read before it was ever set")]
    UninitializedKey {
        /// Name of the offending property.
        key: String,
    },
}

/// A single named attribute value.
///
/// The key is fixed when the cell is declared; only the value changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observable<K, T> {
    key: K,
    value: Option<T>,
}

impl<K: Copy + fmt::Display, T> Observable<K, T> {
    /// Declares a cell with no value yet.
    pub fn unset(key: K) -> Self {
        Self { key, value: None }
    }

    /// Declares a cell holding `value` without notifying anyone.
    ///
    /// For cells of an entity that is being created and has no bindings yet.
    pub fn with_value(key: K, value: T) -> Self {
        Self {
            key,
            value: Some(value),
        }
    }

    /// Key notifications for this cell are published under.
    pub fn key(&self) -> K {
        self.key
    }

    /// Returns the value, or [`StoreError::UninitializedKey`] before the first write.
    pub fn try_get(&self) -> Result<&T, StoreError> {
        self.value.as_ref().ok_or_else(|| StoreError::UninitializedKey {
            key: self.key.to_string(),
        })
    }

    /// Returns the value.
    ///
    /// # Panics
    ///
    /// Panics if the cell was never written. Every entity writes its cells
    /// during construction, so this indicates a broken invariant.
    pub fn get(&self) -> &T {
        match self.try_get() {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

/// Fan-out of property-change notifications to every subscriber.
#[derive(Debug)]
pub struct PropertyStore<K> {
    subscribers: Vec<mpsc::UnboundedSender<K>>,
}

impl<K> Default for PropertyStore<K> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<K: Copy + fmt::Debug + fmt::Display> PropertyStore<K> {
    /// Creates a store with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a notification stream that receives the key of every change.
    #[instrument(skip(self))]
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<K> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        trace!(subscribers = self.subscribers.len(), "Subscriber added");
        rx
    }

    /// Writes `value` into `cell`, notifying subscribers if it changed.
    ///
    /// Returns whether the value changed.
    pub fn set<T: PartialEq>(&mut self, cell: &mut Observable<K, T>, value: T) -> bool {
        if cell.value.as_ref() == Some(&value) {
            return false;
        }
        cell.value = Some(value);
        self.notify(cell.key);
        true
    }

    /// Publishes `key` to every live subscriber.
    ///
    /// Used directly only for collection membership changes, which have no
    /// single cell to compare.
    pub fn notify(&mut self, key: K) {
        trace!(property = %key, "Property changed");
        self.subscribers.retain(|tx| tx.send(key).is_ok());
    }
}
