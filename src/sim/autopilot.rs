//! Autopilot - a simple driver for demos and soak runs
//!
//! Looks a short way down the lane, hops over hazards it can't steer
//! around and drifts toward pickups the current ride can use.

use super::state::{GameState, SceneryKind, SceneryObject};
use super::tick::TickInput;
use crate::consts::*;

/// How far ahead the autopilot looks
const LOOKAHEAD_Z: f32 = -40.0;
/// Lateral margin kept from hazards when steering
const DODGE_MARGIN: f32 = 2.5;
/// Jump when the hazard enters the contact window within this many seconds
const JUMP_LEAD: std::ops::Range<f32> = 0.08..0.25;
/// Fire when a snowman is this close to the shooting line
const AIM_TOLERANCE: f32 = 1.5;
const FIRE_RANGE_Z: f32 = -80.0;

fn wants(state: &GameState, obj: &SceneryObject) -> bool {
    match obj.kind {
        SceneryKind::Gift => true,
        SceneryKind::SledPickup => !state.ride.has_sled(),
        SceneryKind::StarPowerup => state.ride.has_sled(),
        SceneryKind::ShootPowerup => state.ride.has_sled() && !state.ride.can_shoot(),
        _ => false,
    }
}

/// Seconds until `obj` reaches the near edge of the contact window
fn time_to_contact(state: &GameState, obj: &SceneryObject) -> f32 {
    if state.speed <= 0.0 {
        return f32::INFINITY;
    }
    (CONTACT_Z_MIN - obj.z) / state.speed
}

/// Produce this step's input for the current state
pub fn autopilot_input(state: &GameState) -> TickInput {
    let mut input = TickInput::default();

    let ahead = move || {
        state
            .scenery
            .iter()
            .filter(|o| o.active && o.z > LOOKAHEAD_Z && o.z < CONTACT_Z_MAX)
    };

    // Closest hazard in (or about to enter) our column
    let threat = ahead()
        .filter(|o| o.kind.is_ground_hazard())
        .filter(|o| (o.x - state.player_x).abs() < DODGE_MARGIN)
        .max_by(|a, b| a.z.total_cmp(&b.z));

    if let Some(threat) = threat {
        let lead = time_to_contact(state, threat);
        if JUMP_LEAD.contains(&lead) && !state.is_jumping {
            // Jump fires on the press edge
            input.jump = !state.jump_held;
        }
        // Sidestep toward the roomier side of the lane
        if threat.x >= state.player_x && state.player_x > -LANE_HALF_WIDTH + DODGE_MARGIN {
            input.left = true;
        } else if state.player_x < LANE_HALF_WIDTH - DODGE_MARGIN {
            input.right = true;
        } else {
            input.left = true;
        }
    } else if let Some(target) = ahead()
        .filter(|o| wants(state, o))
        .max_by(|a, b| a.z.total_cmp(&b.z))
    {
        let dx = target.x - state.player_x;
        if dx < -0.5 {
            input.left = true;
        } else if dx > 0.5 {
            input.right = true;
        }
    }

    if state.ride.can_shoot() {
        input.fire = state.scenery.iter().any(|o| {
            o.active
                && o.kind == SceneryKind::Villain
                && o.z > FIRE_RANGE_Z
                && o.z < CONTACT_Z_MIN
                && (o.x - state.player_x).abs() < AIM_TOLERANCE
        });
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Ride;
    use crate::sim::tick::tick;

    fn lone(kind: SceneryKind, x: f32, z: f32) -> GameState {
        let mut state = GameState::new(31337);
        for obj in &mut state.scenery {
            obj.z = -290.0;
            obj.x = 30.0;
            obj.kind = SceneryKind::Tree;
        }
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
        state
    }

    #[test]
    fn test_jumps_rock_dead_ahead() {
        let mut state = lone(SceneryKind::Rock, 0.0, -6.5);
        let input = autopilot_input(&state);
        assert!(input.jump);

        // Whichever way it dodges, the rock must not be hit
        for _ in 0..120 {
            let input = autopilot_input(&state);
            let events = tick(&mut state, &input, SIM_DT);
            assert!(!events.hit());
        }
        assert_eq!(state.speed, BASE_SPEED);
    }

    #[test]
    fn test_steers_toward_gift() {
        let state = lone(SceneryKind::Gift, 5.0, -20.0);
        let input = autopilot_input(&state);
        assert!(input.right);
        assert!(!input.left);
    }

    #[test]
    fn test_fires_at_snowman_in_line() {
        let mut state = lone(SceneryKind::Villain, 0.5, -50.0);
        state.ride = Ride::Sled { can_shoot: true };
        assert!(autopilot_input(&state).fire);

        state.ride = Ride::Sled { can_shoot: false };
        assert!(!autopilot_input(&state).fire);
    }

    #[test]
    fn test_soak_run_keeps_invariants() {
        let mut state = GameState::new(2025);
        for _ in 0..(120 * 60) {
            let input = autopilot_input(&state);
            tick(&mut state, &input, SIM_DT);
            if state.is_over() {
                break;
            }
        }
        assert!(state.time > 0.0);
        assert!(state.player_x.abs() <= LANE_HALF_WIDTH);
        assert_eq!(state.scenery.len(), SCENERY_COUNT);
    }
}
