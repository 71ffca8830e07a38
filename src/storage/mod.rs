//! In-memory columnar storage: the two relations the engine answers from.

pub mod columnar;
pub mod store;

pub use columnar::Table;
pub use store::{Relation, StoreStatus, TabularStore};
