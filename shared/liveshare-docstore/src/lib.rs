//! Liveshare Document Store
//!
//! Document-collection client speaking the PostgreSQL wire protocol.
//! Each collection is a table of JSONB documents keyed by id, offering the
//! handful of document operations the services need: insert-one, sorted and
//! limited find, delete-many and count.

mod collection;
mod error;
mod pool;
mod types;

pub use collection::Collection;
pub use error::{DocStoreError, Result};
pub use pool::{DocStorePool, PoolConfig};
pub use types::*;
