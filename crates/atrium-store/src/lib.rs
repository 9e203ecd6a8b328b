//! Read-only record store for Atrium applications.
//!
//! Records are loaded once at startup, either from the built-in demo seed or a
//! JSON seed file, and never change afterwards. The "list all" path strips the
//! per-record detail block; the "get one" path returns it.

mod error;
mod record;
mod store;

pub use error::{StoreError, StoreResult};
pub use record::{Record, RecordDetails};
pub use store::RecordStore;
