//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod interaction;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use interaction::in_contact_range;
pub use spawn::spawn;
pub use state::{
    Bullet, BulletPool, FrameEvents, GameEvent, GameOverReason, GamePhase, GameState, Pursuit,
    Ride, SceneryKind, SceneryObject,
};
pub use tick::{TickInput, tick};
