//! Procedural scenery generation
//!
//! Spawning is a fixed sequence of draws from the run's RNG, so a given
//! seed always produces the same course. Gameplay objects come from a
//! priority-ordered cascade over a single roll: rules are tried top to
//! bottom and the first match wins.

use rand::Rng;

use super::state::{SceneryKind, SceneryObject};
use crate::consts::{
    INITIAL_Z_NEAR, INITIAL_Z_SPREAD, RESPAWN_Z_NEAR, RESPAWN_Z_SPREAD, SCENERY_COUNT,
};

/// A decoration is placed when the side roll exceeds this (60% of spawns)
pub const DECORATION_ROLL: f32 = 0.4;
/// Decorations sit this far off the lane on either side
pub const DECORATION_MIN_OFFSET: f32 = 12.0;
pub const DECORATION_OFFSET_SPREAD: f32 = 25.0;
/// Gameplay objects spread across this width, centred on the lane
pub const GAMEPLAY_SPREAD: f32 = 16.0;

/// Cascade thresholds, checked in this order
pub const SLED_THRESHOLD: f32 = 0.96;
pub const POWERUP_THRESHOLD: f32 = 0.94;
pub const WALKING_BEAR_THRESHOLD: f32 = 0.90;
pub const VILLAIN_THRESHOLD: f32 = 0.82;
pub const ROCK_THRESHOLD: f32 = 0.55;
pub const GIFT_THRESHOLD: f32 = 0.40;

/// Walking bear drift speed range
pub const BEAR_DRIFT_MIN: f32 = 3.0;
pub const BEAR_DRIFT_SPREAD: f32 = 4.0;

/// Size of rare items
pub const SPECIAL_SCALE: f32 = 1.5;
/// Ordinary objects are sized in `[SCALE_MIN, SCALE_MIN + SCALE_SPREAD)`
pub const SCALE_MIN: f32 = 0.8;
pub const SCALE_SPREAD: f32 = 0.4;

/// Which sled state a cascade rule requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SledGate {
    Any,
    Without,
    With,
}

impl SledGate {
    fn allows(self, has_sled: bool) -> bool {
        match self {
            SledGate::Any => true,
            SledGate::Without => !has_sled,
            SledGate::With => has_sled,
        }
    }
}

/// What a matching cascade rule produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameplayPick {
    Sled,
    /// Star or shoot power-up, decided by a second coin flip
    SledPowerup,
    WalkingBear,
    Plain(SceneryKind),
}

/// One step of the cascade: matches when the gate allows and `roll > threshold`
#[derive(Debug, Clone, Copy)]
struct CascadeRule {
    gate: SledGate,
    threshold: f32,
    pick: GameplayPick,
}

impl CascadeRule {
    fn matches(&self, roll: f32, has_sled: bool) -> bool {
        self.gate.allows(has_sled) && roll > self.threshold
    }
}

/// The gameplay ladder. Order matters: later rules are only reachable when
/// every earlier one fails.
const GAMEPLAY_CASCADE: [CascadeRule; 7] = [
    CascadeRule {
        gate: SledGate::Without,
        threshold: SLED_THRESHOLD,
        pick: GameplayPick::Sled,
    },
    CascadeRule {
        gate: SledGate::With,
        threshold: POWERUP_THRESHOLD,
        pick: GameplayPick::SledPowerup,
    },
    CascadeRule {
        gate: SledGate::Any,
        threshold: WALKING_BEAR_THRESHOLD,
        pick: GameplayPick::WalkingBear,
    },
    CascadeRule {
        gate: SledGate::Any,
        threshold: VILLAIN_THRESHOLD,
        pick: GameplayPick::Plain(SceneryKind::Villain),
    },
    CascadeRule {
        gate: SledGate::Any,
        threshold: ROCK_THRESHOLD,
        pick: GameplayPick::Plain(SceneryKind::Rock),
    },
    CascadeRule {
        gate: SledGate::Any,
        threshold: GIFT_THRESHOLD,
        pick: GameplayPick::Plain(SceneryKind::Gift),
    },
    CascadeRule {
        gate: SledGate::Any,
        threshold: f32::NEG_INFINITY,
        pick: GameplayPick::Plain(SceneryKind::Rock),
    },
];

/// Walk the cascade for one roll in `[0, 1)`
pub fn pick_gameplay(roll: f32, has_sled: bool) -> GameplayPick {
    GAMEPLAY_CASCADE
        .iter()
        .find(|rule| rule.matches(roll, has_sled))
        .map(|rule| rule.pick)
        // The last rule always matches
        .unwrap_or(GameplayPick::Plain(SceneryKind::Rock))
}

fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random::<f32>() > 0.5
}

/// Generate a fresh scenery descriptor at depth `z`
pub fn spawn<R: Rng + ?Sized>(z: f32, has_sled: bool, rng: &mut R) -> SceneryObject {
    let roll: f32 = rng.random();
    let mut dx = 0.0;
    let mut is_special = false;

    let (kind, x) = if rng.random::<f32>() > DECORATION_ROLL {
        let kind = if coin_flip(rng) {
            SceneryKind::Tree
        } else {
            SceneryKind::Hill
        };
        let side = if coin_flip(rng) { 1.0 } else { -1.0 };
        let x = side * (DECORATION_MIN_OFFSET + rng.random::<f32>() * DECORATION_OFFSET_SPREAD);
        (kind, x)
    } else {
        let x = (rng.random::<f32>() - 0.5) * GAMEPLAY_SPREAD;
        let kind = match pick_gameplay(roll, has_sled) {
            GameplayPick::Sled => {
                is_special = true;
                SceneryKind::SledPickup
            }
            GameplayPick::SledPowerup => {
                is_special = true;
                if coin_flip(rng) {
                    SceneryKind::StarPowerup
                } else {
                    SceneryKind::ShootPowerup
                }
            }
            GameplayPick::WalkingBear => {
                let dir = if rng.random::<f32>() < 0.5 { 1.0 } else { -1.0 };
                dx = dir * (BEAR_DRIFT_MIN + rng.random::<f32>() * BEAR_DRIFT_SPREAD);
                SceneryKind::WalkingBear
            }
            GameplayPick::Plain(kind) => kind,
        };
        (kind, x)
    };

    let scale = if is_special {
        SPECIAL_SCALE
    } else {
        SCALE_MIN + rng.random::<f32>() * SCALE_SPREAD
    };

    SceneryObject {
        x,
        z,
        kind,
        scale,
        active: true,
        rot: rng.random::<f32>() * std::f32::consts::PI,
        dx,
        is_special,
    }
}

/// Depth for a recycled slot, in `[RESPAWN_Z_NEAR - RESPAWN_Z_SPREAD, RESPAWN_Z_NEAR)`
pub fn respawn_depth<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(RESPAWN_Z_NEAR - RESPAWN_Z_SPREAD..RESPAWN_Z_NEAR)
}

/// Fill the pool at the start of a run (no sled yet)
pub fn initial_scenery<R: Rng + ?Sized>(rng: &mut R) -> Vec<SceneryObject> {
    (0..SCENERY_COUNT)
        .map(|_| {
            let z = INITIAL_Z_NEAR - rng.random::<f32>() * INITIAL_Z_SPREAD;
            spawn(z, false, rng)
        })
        .collect()
}
