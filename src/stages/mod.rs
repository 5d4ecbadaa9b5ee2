pub mod stage0_uppercase;
pub mod stage1_resolve;
pub mod stage2_reconcile;
pub mod stage3_render;

pub use stage0_uppercase::*;
pub use stage1_resolve::*;
pub use stage2_reconcile::*;
pub use stage3_render::*;
