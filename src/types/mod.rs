//! Data types for columns, heights, and layout state.

mod column;
mod height;
mod state;

pub use column::*;
pub use height::*;
pub use state::*;
