//! Dataset loading, cross-referencing, and snapshot state.

pub mod index;
pub mod loader;
pub mod state;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use index::CrossIndex;
pub use loader::{DatasetLoader, Snapshot};
pub use state::SnapshotSlot;
pub use sync::{DatasetSync, LoadEvent};
