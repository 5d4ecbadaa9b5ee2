pub mod document;
pub mod report;
pub mod roster;

pub use document::*;
pub use report::*;
pub use roster::*;
