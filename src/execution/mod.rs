//! Query execution: aggregate evaluation over the columnar store.

pub mod executor;
pub mod result;

pub use executor::QueryExecutor;
pub use result::{ResultTable, Value};
