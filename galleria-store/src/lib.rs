//! Galleria content store — the in-memory album model and its disk
//! reconciliation.
//!
//! Public API surface:
//! - [`store::Store`] — load, queries, edit operations
//! - [`reconcile`] — `Store::save` (ordered, rename/collision-safe)
//! - [`order`] — `Store::move_up` / `Store::move_down`
//! - [`error`] — [`StoreError`]

pub mod error;
pub mod order;
pub mod reconcile;
pub mod store;

pub use error::StoreError;
pub use store::Store;
