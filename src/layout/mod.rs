//! Layout algorithms for the table.
//!
//! This module handles:
//! - Distributing container width over flexible and fixed columns
//! - Settling section heights from surface measurements
//! - Detecting a header hidden through its ancestry

mod ancestry;
mod distributor;
mod resolver;

pub use ancestry::hidden_by_ancestor;
pub use distributor::{distribute, WidthDistribution};
pub use resolver::{
    update_scroll_y, AbortReason, HeightResolver, ResolveContext, ResolveOutcome, ResolverPhase,
};
