//! Query planning: declarative aggregate specs derived from intents.

pub mod builder;
pub mod plan;

pub use builder::PlanBuilder;
pub use plan::{QueryPlan, QuerySpec};
