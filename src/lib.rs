//! Sleigh Chase - An endless snowy runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, pursuit, scenery pool, interactions)
//! - `render`: Frame renderer turning state into draw commands
//! - `hud`: Read-only UI snapshot for the presentation layer
//! - `settings`: Player preferences

pub mod hud;
pub mod render;
pub mod settings;
pub mod sim;

pub use hud::{HudSnapshot, StatusTone};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the simulation (tab resume, debugger pauses)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Lane half-width the player can steer across
    pub const LANE_HALF_WIDTH: f32 = 10.0;
    /// Lateral steering speed (units/s)
    pub const STEER_SPEED: f32 = 25.0;

    /// Jump launch velocity
    pub const JUMP_VELOCITY: f32 = 12.0;
    /// Constant downward acceleration while airborne
    pub const GRAVITY: f32 = 30.0;

    /// Unmodified forward scroll rate
    pub const BASE_SPEED: f32 = 25.0;
    /// Rate at which speed relaxes back toward the baseline (units/s²)
    pub const SPEED_RELAX_RATE: f32 = 2.0;
    /// Speed after picking up the sled
    pub const SLED_SPEED: f32 = 30.0;
    /// Speed after grabbing a star
    pub const STAR_SPEED: f32 = 50.0;
    /// Speed after crashing into something
    pub const CRASH_SPEED: f32 = 10.0;
    /// Speed above which the HUD shows the turbo tag
    pub const TURBO_SPEED: f32 = 30.0;

    /// Pursuit proximity at which the bear catches the player
    pub const BEAR_CATCH_PROXIMITY: f32 = 100.0;
    /// Proximity when a chase begins
    pub const BEAR_START_PROXIMITY: f32 = 20.0;
    /// Proximity added when running into a second bear mid-chase
    pub const BEAR_RAM_PROXIMITY: f32 = 50.0;
    /// Proximity gained per unit of speed deficit per second
    pub const BEAR_GAIN_FACTOR: f32 = 1.5;
    /// Proximity lost per second while keeping pace
    pub const BEAR_FALLOFF_RATE: f32 = 2.0;
    /// Chase duration after which the bear may give up
    pub const BEAR_GIVE_UP_TIME: f32 = 10.0;
    /// The bear only gives up when further away than this
    pub const BEAR_GIVE_UP_PROXIMITY: f32 = 80.0;

    /// Number of scenery slots, fixed for the whole run
    pub const SCENERY_COUNT: usize = 60;
    /// Scenery crossing this depth is recycled
    pub const RECYCLE_Z: f32 = 15.0;
    /// Recycled scenery lands in `[RESPAWN_Z_NEAR - RESPAWN_Z_SPREAD, RESPAWN_Z_NEAR)`
    pub const RESPAWN_Z_NEAR: f32 = -250.0;
    pub const RESPAWN_Z_SPREAD: f32 = 50.0;
    /// Initial fill lands in `(INITIAL_Z_NEAR - INITIAL_Z_SPREAD, INITIAL_Z_NEAR]`
    pub const INITIAL_Z_NEAR: f32 = -50.0;
    pub const INITIAL_Z_SPREAD: f32 = 350.0;
    /// Walking bears turn around past this lateral offset
    pub const BEAR_WANDER_LIMIT: f32 = 15.0;

    /// Contact window in front of/behind the player
    pub const CONTACT_Z_MIN: f32 = -4.0;
    pub const CONTACT_Z_MAX: f32 = 2.0;
    /// Lateral contact half-width
    pub const CONTACT_HALF_WIDTH: f32 = 2.0;
    /// Below this height the player can still hit ground obstacles
    pub const JUMP_CLEARANCE: f32 = 1.0;

    /// Bullet pool capacity
    pub const BULLET_CAPACITY: usize = 16;
    /// Minimum time between shots
    pub const FIRE_INTERVAL: f32 = 0.3;
    /// Bullet travel speed (toward -z)
    pub const BULLET_SPEED: f32 = 60.0;
    /// Bullets die past this depth
    pub const BULLET_MAX_DEPTH: f32 = -200.0;
    /// Muzzle offset from the player
    pub const BULLET_SPAWN_HEIGHT: f32 = 1.5;
    pub const BULLET_SPAWN_Z: f32 = -3.0;
    /// Planar radius for a bullet to take out a snowman
    pub const BULLET_HIT_RADIUS: f32 = 2.0;
}

/// Sanitize a frame delta before it reaches the simulation
///
/// Zero, negative and oversized deltas are clamped into `[0, MAX_FRAME_DT]`.
/// A non-finite delta means the caller's clock is broken and is fatal.
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    assert!(dt.is_finite(), "non-finite frame delta: {dt}");
    dt.clamp(0.0, consts::MAX_FRAME_DT)
}

/// Distance between two points on the ground plane, given as (x, z)
#[inline]
pub fn planar_distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(-1.0), 0.0);
        assert_eq!(clamp_dt(0.0), 0.0);
        assert_eq!(clamp_dt(0.016), 0.016);
        assert_eq!(clamp_dt(5.0), consts::MAX_FRAME_DT);
    }

    #[test]
    #[should_panic(expected = "non-finite")]
    fn test_clamp_dt_rejects_nan() {
        clamp_dt(f32::NAN);
    }

    #[test]
    fn test_planar_distance() {
        let d = planar_distance(Vec2::new(3.0, 0.0), Vec2::new(0.0, 4.0));
        assert!((d - 5.0).abs() < 1e-6);
    }
}
