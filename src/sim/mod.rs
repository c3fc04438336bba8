/// Quarter-hour slot clock.
pub mod clock;
pub mod engine;
/// Night discharge planning.
pub mod plan;
/// Slot expansion and day/night classification.
pub mod slots;
pub mod summary;
pub mod types;

pub use engine::{Engine, simulate};
