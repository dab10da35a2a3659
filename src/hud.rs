//! Read-only HUD snapshot derived from the game state

use crate::consts::TURBO_SPEED;
use crate::sim::{GamePhase, GameState, Ride};

/// Color class of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Neutral,
    Sled,
    Danger,
}

impl StatusTone {
    pub fn css_color(&self) -> &'static str {
        match self {
            StatusTone::Neutral => "#aaa",
            StatusTone::Sled => "#00ffff",
            StatusTone::Danger => "#ff5555",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub score: u32,
    pub status: String,
    pub tone: StatusTone,
    pub paused: bool,
    /// Reason text once the run has ended
    pub game_over: Option<&'static str>,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let chased = state.pursuit.is_chasing();

        let status = match state.ride {
            Ride::Sled { can_shoot } => {
                let power = if can_shoot { "ICE" } else { "NONE" };
                let mut text = format!("SLED (POWER: {power})");
                if state.speed > TURBO_SPEED {
                    text.push_str(" [TURBO]");
                }
                text
            }
            Ride::OnFoot if chased => "ON FOOT [RUN! BEAR BEHIND!]".to_string(),
            Ride::OnFoot => "ON FOOT".to_string(),
        };

        let tone = if chased {
            StatusTone::Danger
        } else if state.ride.has_sled() {
            StatusTone::Sled
        } else {
            StatusTone::Neutral
        };

        Self {
            score: state.score,
            status,
            tone,
            paused: state.phase == GamePhase::Paused,
            game_over: state.game_over_reason.map(|r| r.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameOverReason, Pursuit};

    #[test]
    fn test_on_foot_status() {
        let mut state = GameState::new(1);
        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.status, "ON FOOT");
        assert_eq!(hud.tone, StatusTone::Neutral);
        assert_eq!(hud.game_over, None);

        state.pursuit = Pursuit::Chasing { proximity: 30.0, timer: 1.0 };
        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.status, "ON FOOT [RUN! BEAR BEHIND!]");
        assert_eq!(hud.tone, StatusTone::Danger);
    }

    #[test]
    fn test_sled_status_replaces_chase_text() {
        let mut state = GameState::new(1);
        state.ride = Ride::Sled { can_shoot: false };
        state.speed = 30.0;
        assert_eq!(HudSnapshot::from_state(&state).status, "SLED (POWER: NONE)");

        state.ride = Ride::Sled { can_shoot: true };
        state.speed = 31.0;
        state.pursuit = Pursuit::Chasing { proximity: 10.0, timer: 0.0 };
        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.status, "SLED (POWER: ICE) [TURBO]");
        // Danger still wins the color
        assert_eq!(hud.tone, StatusTone::Danger);
        assert_eq!(hud.tone.css_color(), "#ff5555");
    }

    #[test]
    fn test_game_over_reason() {
        let mut state = GameState::new(1);
        state.score = 7;
        state.end_run(GameOverReason::HitSnowman);
        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.score, 7);
        assert_eq!(hud.game_over, Some("hit by the evil snowman"));
    }
}
