pub mod change;
pub mod roster;
pub mod speaker;

pub use change::*;
pub use roster::*;
pub use speaker::*;
