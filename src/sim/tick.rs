//! Per-frame simulation step
//!
//! Advances player kinematics, speed, pursuit, projectiles and the scenery
//! pool by one delta, resolving interactions as each object moves.

use glam::Vec3;

use super::interaction;
use super::spawn;
use super::state::{
    FrameEvents, GameEvent, GameOverReason, GamePhase, GameState, Pursuit, SceneryKind,
};
use crate::clamp_dt;
use crate::consts::*;

/// Logical key state sampled once at the start of a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Held state; the jump itself fires on the press edge
    pub jump: bool,
    pub fire: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> FrameEvents {
    let mut events = FrameEvents::default();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                events.push(GameEvent::Paused);
                return events;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                events.push(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return events;
    }

    let dt = clamp_dt(dt);
    if dt == 0.0 {
        // Nothing moves in a zero-length step; keep the jump edge for the next one
        return events;
    }
    state.time += dt;

    steer(state, input, dt);
    jump(state, input, dt, &mut events);
    relax_speed(state, dt);

    if let Some(reason) = update_pursuit(state, dt, &mut events) {
        events.push(state.end_run(reason));
        return events;
    }

    fire(state, input, &mut events);
    state.bullets.advance(dt);
    advance_scenery(state, dt, &mut events);

    state.debug_check_invariants();
    events
}

fn steer(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.left {
        state.player_x -= STEER_SPEED * dt;
    }
    if input.right {
        state.player_x += STEER_SPEED * dt;
    }
    state.player_x = state.player_x.clamp(-LANE_HALF_WIDTH, LANE_HALF_WIDTH);
}

fn jump(state: &mut GameState, input: &TickInput, dt: f32, events: &mut FrameEvents) {
    let pressed = input.jump && !state.jump_held;
    state.jump_held = input.jump;

    if pressed && !state.is_jumping {
        state.y_velocity = JUMP_VELOCITY;
        state.is_jumping = true;
        events.push(GameEvent::Jumped);
    }

    if state.is_jumping {
        state.player_y += state.y_velocity * dt;
        state.y_velocity -= GRAVITY * dt;
        if state.player_y <= 0.0 {
            state.player_y = 0.0;
            state.y_velocity = 0.0;
            state.is_jumping = false;
        }
    }
}

/// Pull speed back toward the baseline after boosts and crashes
fn relax_speed(state: &mut GameState, dt: f32) {
    if state.speed < state.base_speed && !state.ride.has_sled() {
        state.speed = (state.speed + SPEED_RELAX_RATE * dt).min(state.base_speed);
    } else if state.speed > state.base_speed {
        state.speed = (state.speed - SPEED_RELAX_RATE * dt).max(state.base_speed);
    }
}

/// Run the chase for one step. Returns a reason if the bear caught up.
fn update_pursuit(
    state: &mut GameState,
    dt: f32,
    events: &mut FrameEvents,
) -> Option<GameOverReason> {
    let relative_speed = state.speed - state.base_speed;

    let Pursuit::Chasing { proximity, timer } = &mut state.pursuit else {
        return None;
    };

    *timer += dt;
    if relative_speed < 0.0 {
        // Slower than baseline: the bear gains ground
        *proximity += relative_speed.abs() * BEAR_GAIN_FACTOR * dt;
    } else {
        *proximity = (*proximity - BEAR_FALLOFF_RATE * dt).max(0.0);
    }

    if *proximity >= BEAR_CATCH_PROXIMITY {
        *proximity = BEAR_CATCH_PROXIMITY;
        return Some(GameOverReason::CaughtByBear);
    }

    if *timer > BEAR_GIVE_UP_TIME && *proximity < BEAR_GIVE_UP_PROXIMITY {
        log::info!("Bear gave up after {:.1}s", *timer);
        state.pursuit = Pursuit::Idle;
        events.push(GameEvent::ChaseEnded);
    }

    None
}

fn fire(state: &mut GameState, input: &TickInput, events: &mut FrameEvents) {
    if !input.fire || !state.ride.can_shoot() {
        return;
    }
    if state.time - state.last_shot_time <= FIRE_INTERVAL {
        return;
    }

    let muzzle = Vec3::new(
        state.player_x,
        state.player_y + BULLET_SPAWN_HEIGHT,
        BULLET_SPAWN_Z,
    );
    match state.bullets.fire(muzzle) {
        Some(_) => {
            state.last_shot_time = state.time;
            events.push(GameEvent::ShotFired);
        }
        None => log::debug!("Bullet pool exhausted, shot dropped"),
    }
}

/// Scroll every slot toward the camera, recycle the ones that pass it and
/// resolve interactions for each object after it moves.
fn advance_scenery(state: &mut GameState, dt: f32, events: &mut FrameEvents) {
    for index in 0..state.scenery.len() {
        let obj = &mut state.scenery[index];
        obj.z += state.speed * dt;
        obj.rot += dt;

        if obj.kind == SceneryKind::WalkingBear && obj.active {
            obj.x += obj.dx * dt;
            if obj.x.abs() > BEAR_WANDER_LIMIT {
                obj.dx = -obj.dx;
            }
        }

        if obj.z > RECYCLE_Z {
            let z = spawn::respawn_depth(&mut state.rng);
            let fresh = spawn::spawn(z, state.ride.has_sled(), &mut state.rng);
            state.scenery[index].respawn_from(fresh);
            log::trace!("Recycled slot {} as {:?}", index, fresh.kind);
        }

        interaction::resolve(state, index, events);
        if state.is_over() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Ride, SceneryObject};

    /// A state with the whole course parked far away so nothing interferes
    fn quiet_state() -> GameState {
        let mut state = GameState::new(12345);
        for obj in &mut state.scenery {
            obj.z = -290.0;
            obj.kind = SceneryKind::Tree;
            obj.x = 30.0;
            obj.dx = 0.0;
        }
        state
    }

    fn place(state: &mut GameState, kind: SceneryKind, x: f32, z: f32) {
        state.scenery[0] = SceneryObject {
            x,
            z,
            kind,
            scale: 1.0,
            active: true,
            rot: 0.0,
            dx: 0.0,
            is_special: false,
        };
    }

    #[test]
    fn test_steering_clamped() {
        let mut state = quiet_state();
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.player_x, LANE_HALF_WIDTH);

        let input = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.1);
        assert!((state.player_x - (LANE_HALF_WIDTH - STEER_SPEED * 0.1)).abs() < 1e-4);
    }

    #[test]
    fn test_jump_arc_and_landing() {
        let mut state = quiet_state();
        let hold = TickInput {
            jump: true,
            ..Default::default()
        };
        let events = tick(&mut state, &hold, SIM_DT);
        assert!(events.contains(GameEvent::Jumped));
        assert!(state.is_jumping);
        assert!(state.player_y > 0.0);

        // Airtime is roughly 2 * v / g = 0.8s
        let mut peak: f32 = 0.0;
        for _ in 0..120 {
            tick(&mut state, &hold, SIM_DT);
            peak = peak.max(state.player_y);
        }
        assert!(!state.is_jumping);
        assert_eq!(state.player_y, 0.0);
        assert!(peak > 2.0 && peak < 2.5, "peak {peak}");
    }

    #[test]
    fn test_holding_jump_does_not_rejump() {
        let mut state = quiet_state();
        let hold = TickInput {
            jump: true,
            ..Default::default()
        };
        for _ in 0..150 {
            tick(&mut state, &hold, SIM_DT);
        }
        assert!(!state.is_jumping);

        // Release then press again
        tick(&mut state, &TickInput::default(), SIM_DT);
        let events = tick(&mut state, &hold, SIM_DT);
        assert!(events.contains(GameEvent::Jumped));
    }

    #[test]
    fn test_speed_recovers_on_foot() {
        let mut state = quiet_state();
        state.speed = CRASH_SPEED;
        tick(&mut state, &TickInput::default(), 0.1);
        assert!((state.speed - (CRASH_SPEED + SPEED_RELAX_RATE * 0.1)).abs() < 1e-4);

        for _ in 0..200 {
            relax_speed(&mut state, 0.1);
        }
        assert_eq!(state.speed, BASE_SPEED);
    }

    #[test]
    fn test_speed_boost_decays_to_baseline() {
        let mut state = quiet_state();
        state.ride = Ride::Sled { can_shoot: false };
        state.speed = STAR_SPEED;
        for _ in 0..400 {
            relax_speed(&mut state, 0.1);
        }
        assert_eq!(state.speed, BASE_SPEED);
    }

    #[test]
    fn test_slow_sled_does_not_recover() {
        let mut state = quiet_state();
        state.ride = Ride::Sled { can_shoot: false };
        state.speed = 20.0;
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.speed, 20.0);
    }

    #[test]
    fn test_chase_gains_when_slow() {
        let mut state = quiet_state();
        state.ride = Ride::Sled { can_shoot: false };
        state.speed = 15.0;
        state.pursuit = Pursuit::Chasing {
            proximity: 20.0,
            timer: 0.0,
        };
        tick(&mut state, &TickInput::default(), 0.1);
        // 10 units of deficit * 1.5 * 0.1s
        assert!((state.pursuit.proximity() - 21.5).abs() < 1e-4);
    }

    #[test]
    fn test_chase_falls_off_at_pace() {
        let mut state = quiet_state();
        state.pursuit = Pursuit::Chasing {
            proximity: 0.1,
            timer: 0.0,
        };
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.pursuit.proximity(), 0.0);
        assert!(state.pursuit.is_chasing());
    }

    #[test]
    fn test_bear_gives_up() {
        let mut state = quiet_state();
        state.pursuit = Pursuit::Chasing {
            proximity: 50.0,
            timer: 10.0,
        };
        let events = tick(&mut state, &TickInput::default(), 0.05);
        assert!(events.contains(GameEvent::ChaseEnded));
        assert_eq!(state.pursuit, Pursuit::Idle);
        assert_eq!(state.pursuit.proximity(), 0.0);
        assert_eq!(state.pursuit.timer(), 0.0);
    }

    #[test]
    fn test_bear_keeps_chasing_when_close() {
        let mut state = quiet_state();
        state.pursuit = Pursuit::Chasing {
            proximity: 85.0,
            timer: 12.0,
        };
        tick(&mut state, &TickInput::default(), 0.05);
        assert!(state.pursuit.is_chasing());
    }

    #[test]
    fn test_bear_catches_slow_player() {
        let mut state = quiet_state();
        state.ride = Ride::Sled { can_shoot: false };
        state.speed = 5.0;
        state.pursuit = Pursuit::Chasing {
            proximity: 99.0,
            timer: 1.0,
        };
        let events = tick(&mut state, &TickInput::default(), 0.1);
        assert!(state.is_over());
        assert_eq!(state.game_over_reason, Some(GameOverReason::CaughtByBear));
        assert!(events.contains(GameEvent::GameOver(GameOverReason::CaughtByBear)));
        assert_eq!(state.pursuit.proximity(), BEAR_CATCH_PROXIMITY);
    }

    #[test]
    fn test_fire_rate_limited() {
        let mut state = quiet_state();
        state.ride = Ride::Sled { can_shoot: true };
        let input = TickInput {
            fire: true,
            ..Default::default()
        };

        // The first shot waits until the clock passes the interval
        let mut shots = 0;
        for _ in 0..120 {
            let events = tick(&mut state, &input, SIM_DT);
            shots += events.iter().filter(|e| **e == GameEvent::ShotFired).count();
        }
        // One second of holding fire: shots at ~0.3s, ~0.6s, ~0.9s
        assert_eq!(shots, 3);
        assert_eq!(state.bullets.active_count(), 3);
    }

    #[test]
    fn test_no_fire_without_unlock() {
        let mut state = quiet_state();
        state.ride = Ride::Sled { can_shoot: false };
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.bullets.active_count(), 0);
    }

    #[test]
    fn test_bullet_spawns_at_muzzle() {
        let mut state = quiet_state();
        state.ride = Ride::Sled { can_shoot: true };
        state.player_x = 4.0;
        state.time = 1.0;
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        let bullet = state.bullets.iter_active().next().copied().unwrap();
        assert_eq!(bullet.x, 4.0);
        assert_eq!(bullet.y, BULLET_SPAWN_HEIGHT);
        // Already advanced once this step
        assert!((bullet.z - (BULLET_SPAWN_Z - BULLET_SPEED * SIM_DT)).abs() < 1e-4);
    }

    #[test]
    fn test_scenery_scrolls_and_recycles() {
        let mut state = quiet_state();
        place(&mut state, SceneryKind::Tree, 30.0, RECYCLE_Z - 0.1);
        tick(&mut state, &TickInput::default(), 0.1);
        let obj = state.scenery[0];
        assert!(obj.z < -240.0, "slot not recycled: z = {}", obj.z);
        assert!(obj.active);
        assert_eq!(state.scenery.len(), SCENERY_COUNT);
    }

    #[test]
    fn test_consumed_slot_keeps_scrolling_until_recycled() {
        let mut state = quiet_state();
        place(&mut state, SceneryKind::Gift, 0.0, 0.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.scenery[0].active);
        assert_eq!(state.score, 1);

        // Carried past the camera and brought back as a live object
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 0.1);
        }
        assert!(state.scenery[0].active);
        assert!(state.scenery[0].z < -200.0);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_walking_bear_drifts_and_turns() {
        let mut state = quiet_state();
        place(&mut state, SceneryKind::WalkingBear, 14.9, -100.0);
        state.scenery[0].dx = 5.0;
        tick(&mut state, &TickInput::default(), 0.1);
        assert!(state.scenery[0].x > BEAR_WANDER_LIMIT);
        assert_eq!(state.scenery[0].dx, -5.0);
    }

    #[test]
    fn test_pause_freezes_state() {
        let mut state = quiet_state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let events = tick(&mut state, &pause, SIM_DT);
        assert!(events.contains(GameEvent::Paused));
        assert_eq!(state.phase, GamePhase::Paused);

        let before = state.scenery[0].z;
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.scenery[0].z, before);

        let events = tick(&mut state, &pause, SIM_DT);
        assert!(events.contains(GameEvent::Resumed));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_game_over_stops_simulation() {
        let mut state = quiet_state();
        state.end_run(GameOverReason::HitSnowman);
        let before = state.time;
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.time, before);
    }

    #[test]
    fn test_degenerate_dt_is_harmless() {
        let mut state = quiet_state();
        let z = state.scenery[0].z;
        tick(&mut state, &TickInput::default(), -1.0);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.scenery[0].z, z);

        // A huge gap is capped at one max frame
        tick(&mut state, &TickInput::default(), 30.0);
        assert!((state.scenery[0].z - (z + BASE_SPEED * MAX_FRAME_DT)).abs() < 1e-3);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..300 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time, state2.time);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.scenery, state2.scenery);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn input_strategy() -> impl Strategy<Value = TickInput> {
            (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
                |(left, right, jump, fire)| TickInput {
                    left,
                    right,
                    jump,
                    fire,
                    pause: false,
                },
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(48))]

            #[test]
            fn prop_invariants_hold(
                seed in any::<u64>(),
                steps in prop::collection::vec((input_strategy(), 0.0f32..0.25), 1..300),
            ) {
                let mut state = GameState::new(seed);
                for (input, dt) in &steps {
                    tick(&mut state, input, *dt);

                    prop_assert!(state.player_x.abs() <= LANE_HALF_WIDTH);
                    prop_assert!(state.player_y >= 0.0);
                    let proximity = state.pursuit.proximity();
                    prop_assert!((0.0..=BEAR_CATCH_PROXIMITY).contains(&proximity));
                    if !state.pursuit.is_chasing() {
                        prop_assert_eq!(proximity, 0.0);
                    }
                    if proximity >= BEAR_CATCH_PROXIMITY {
                        prop_assert!(state.is_over());
                    }
                    prop_assert_eq!(state.scenery.len(), SCENERY_COUNT);
                    prop_assert!(state.bullets.active_count() <= BULLET_CAPACITY);
                    prop_assert!(state.speed >= 0.0);

                    if state.is_over() {
                        break;
                    }
                }
            }
        }
    }
}
