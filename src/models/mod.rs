pub mod action;
pub mod file;
pub mod report;
pub mod suggestion;

pub use action::*;
pub use file::*;
pub use report::*;
pub use suggestion::*;
