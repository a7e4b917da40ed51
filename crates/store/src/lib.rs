//! `buildledger-store` — the entity store.
//!
//! [`Tables`] holds one map per entity and owns referential integrity:
//! inserts check foreign keys, deletes cascade transitively (or refuse, for
//! materials still referenced by job lines). [`InMemoryStore`] wraps the
//! tables in a single `RwLock` and exposes a `transaction` closure so each
//! lifecycle operation runs as one atomic read-modify-write.

pub mod memory;
pub mod tables;

pub use memory::InMemoryStore;
pub use tables::Tables;
