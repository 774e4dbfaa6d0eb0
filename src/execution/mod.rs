//! Execution
//!
//! Turns validated suggestions into filesystem changes: planning the action,
//! resolving name conflicts, and applying the move.

pub mod executor;
pub mod io;
pub mod planner;
pub mod resolver;

pub use executor::ActionExecutor;
pub use planner::ActionPlanner;
pub use resolver::ConflictResolver;
