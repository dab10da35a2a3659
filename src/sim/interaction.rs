//! Pickup, combat and collision rules
//!
//! Evaluated once per scenery slot per step, right after the slot moves.
//! Every rule is guarded by `active`, so a consumed object can never fire
//! twice before its slot is recycled.

use super::state::{
    FrameEvents, GameEvent, GameOverReason, GameState, Pursuit, Ride, SceneryKind, SceneryObject,
};
use crate::consts::*;
use crate::planar_distance;

/// Whether an object sits in the window where it can touch the player
#[inline]
pub fn in_contact_range(obj: &SceneryObject, player_x: f32) -> bool {
    obj.z > CONTACT_Z_MIN && obj.z < CONTACT_Z_MAX && (obj.x - player_x).abs() < CONTACT_HALF_WIDTH
}

/// Apply every rule relevant to scenery slot `index`
pub fn resolve(state: &mut GameState, index: usize, events: &mut FrameEvents) {
    let kind = state.scenery[index].kind;

    if kind.is_pickup() {
        collect_pickup(state, index, events);
    }
    if kind == SceneryKind::Villain {
        shoot_down(state, index, events);
    }
    if kind.is_ground_hazard() {
        collide(state, index, events);
    }
}

fn collect_pickup(state: &mut GameState, index: usize, events: &mut FrameEvents) {
    let obj = state.scenery[index];
    if !obj.active || !in_contact_range(&obj, state.player_x) {
        return;
    }

    let collected = match (obj.kind, state.ride) {
        (SceneryKind::Gift, _) => {
            state.score += 1;
            events.push(GameEvent::GiftCollected);
            true
        }
        (SceneryKind::SledPickup, Ride::OnFoot) => {
            log::info!("Sled acquired");
            state.ride = Ride::Sled { can_shoot: false };
            state.speed = SLED_SPEED;
            events.push(GameEvent::SledAcquired);
            true
        }
        (SceneryKind::StarPowerup, Ride::Sled { .. }) => {
            state.speed = STAR_SPEED;
            state.score += 2;
            events.push(GameEvent::StarCollected);
            true
        }
        (SceneryKind::ShootPowerup, Ride::Sled { .. }) => {
            log::info!("Ice balls unlocked");
            state.ride = Ride::Sled { can_shoot: true };
            state.score += 2;
            events.push(GameEvent::ShootUnlocked);
            true
        }
        // Wrong mode for this item: leave it on the course
        _ => false,
    };

    if collected {
        state.scenery[index].active = false;
    }
}

/// Ice balls take out snowmen anywhere on the course
fn shoot_down(state: &mut GameState, index: usize, events: &mut FrameEvents) {
    let target = state.scenery[index];
    if !target.active {
        return;
    }

    let hit = state
        .bullets
        .iter_active_mut()
        .find(|b| planar_distance(b.ground_pos(), target.ground_pos()) < BULLET_HIT_RADIUS);

    if let Some(bullet) = hit {
        bullet.active = false;
        state.scenery[index].active = false;
        state.score += 1;
        events.push(GameEvent::SnowmanShot);
    }
}

fn collide(state: &mut GameState, index: usize, events: &mut FrameEvents) {
    let obj = state.scenery[index];
    if !obj.active || !in_contact_range(&obj, state.player_x) {
        return;
    }
    // Airborne players clear ground obstacles
    if state.player_y >= JUMP_CLEARANCE {
        return;
    }

    match obj.kind {
        SceneryKind::Rock | SceneryKind::Hill => {
            state.score = state.score.saturating_sub(1);
            state.speed = CRASH_SPEED;
            state.scenery[index].active = false;
            events.push(GameEvent::Crashed(obj.kind));
        }
        SceneryKind::Villain => match state.ride {
            Ride::Sled { .. } => {
                log::info!("Snowman knocked the sled out");
                state.ride = Ride::OnFoot;
                state.speed = CRASH_SPEED;
                state.scenery[index].active = false;
                events.push(GameEvent::SledLost);
            }
            Ride::OnFoot => {
                events.push(state.end_run(GameOverReason::HitSnowman));
            }
        },
        SceneryKind::WalkingBear => {
            // The course bear leaves the scenery and becomes the pursuer
            state.scenery[index].active = false;
            match state.pursuit {
                Pursuit::Idle => {
                    log::info!("A bear is giving chase");
                    state.pursuit = Pursuit::Chasing {
                        proximity: BEAR_START_PROXIMITY,
                        timer: 0.0,
                    };
                    events.push(GameEvent::ChaseStarted);
                }
                Pursuit::Chasing { proximity, timer } => {
                    let proximity = (proximity + BEAR_RAM_PROXIMITY).min(BEAR_CATCH_PROXIMITY);
                    state.pursuit = Pursuit::Chasing { proximity, timer };
                    events.push(GameEvent::BearRammed);
                    if proximity >= BEAR_CATCH_PROXIMITY {
                        events.push(state.end_run(GameOverReason::CaughtByBear));
                    }
                }
            }
        }
        _ => {}
    }
}
