//! Dense in-place Cholesky factorizations.

mod engine;
mod settings;
pub use engine::*;
pub use settings::*;
