//! Layout engine: turns statements into a positioned scene
//!
//! The [`Layouter`] walks the statements once, in order. It keeps the
//! vertical [`Cursor`](crate::geometry::Cursor), the participant
//! [`Registry`], the [`ActivationTracker`], the [`FrameStack`] and the
//! [`GapTracker`] as its own state and appends nodes to the scene as
//! statements are processed. The first invalid statement aborts the run.

mod activation;
mod config;
mod frame;
mod gaps;
mod interpreter;
mod registry;

pub use activation::ActivationTracker;
pub use config::LayoutConfig;
pub use frame::{ClosedFrame, FrameStack};
pub use gaps::GapTracker;
pub use interpreter::Layouter;
pub use registry::{Lane, Participant, Registry};

use crate::ast::Statement;
use crate::error::LayoutError;
use crate::scene::Scene;

/// Lay out statements with the default configuration
pub fn layout(statements: &[Statement]) -> Result<Scene, LayoutError> {
    layout_with_config(statements, LayoutConfig::default())
}

/// Lay out statements with a custom configuration
pub fn layout_with_config(
    statements: &[Statement],
    config: LayoutConfig,
) -> Result<Scene, LayoutError> {
    Layouter::new(config).run(statements)
}
