pub mod geometry;
pub mod state;

pub use geometry::Rect;
pub use state::{GameSession, Phase, TickOutcome};
