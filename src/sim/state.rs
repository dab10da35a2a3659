//! Game state and core simulation types
//!
//! Everything the step function mutates lives here, owned by `GameState`
//! and passed around by exclusive reference.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::spawn;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended, see `GameState::game_over_reason`
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Pursuit proximity reached the catch threshold
    CaughtByBear,
    /// Ran into a snowman without a sled
    HitSnowman,
}

impl GameOverReason {
    pub fn message(&self) -> &'static str {
        match self {
            GameOverReason::CaughtByBear => "bear caught you because you were too slow",
            GameOverReason::HitSnowman => "hit by the evil snowman",
        }
    }
}

/// Scenery object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneryKind {
    #[default]
    Tree,
    Hill,
    Rock,
    Gift,
    /// The evil snowman
    Villain,
    WalkingBear,
    SledPickup,
    StarPowerup,
    ShootPowerup,
}

impl SceneryKind {
    /// Collected on contact
    pub fn is_pickup(&self) -> bool {
        matches!(
            self,
            SceneryKind::Gift
                | SceneryKind::SledPickup
                | SceneryKind::StarPowerup
                | SceneryKind::ShootPowerup
        )
    }

    /// Collides with a grounded player
    pub fn is_ground_hazard(&self) -> bool {
        matches!(
            self,
            SceneryKind::Rock | SceneryKind::Hill | SceneryKind::Villain | SceneryKind::WalkingBear
        )
    }
}

/// One slot of the scenery pool
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneryObject {
    pub x: f32,
    pub z: f32,
    pub kind: SceneryKind,
    pub scale: f32,
    /// Cleared once consumed; stays cleared until the slot is recycled
    pub active: bool,
    /// Spin angle for items that turn in place
    pub rot: f32,
    /// Lateral drift velocity (walking bears only)
    pub dx: f32,
    /// Rare item that also gets a point light
    pub is_special: bool,
}

impl SceneryObject {
    /// Overwrite this slot with a freshly generated descriptor
    pub fn respawn_from(&mut self, fresh: SceneryObject) {
        *self = SceneryObject {
            active: true,
            rot: 0.0,
            ..fresh
        };
    }

    /// Position on the ground plane as (x, z)
    pub fn ground_pos(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

/// An ice ball fired from the sled
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub active: bool,
}

impl Bullet {
    pub fn ground_pos(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

/// Fixed-capacity recycled bullet storage, indexed by slot
#[derive(Debug, Clone)]
pub struct BulletPool {
    slots: [Bullet; BULLET_CAPACITY],
}

impl Default for BulletPool {
    fn default() -> Self {
        Self {
            slots: [Bullet::default(); BULLET_CAPACITY],
        }
    }
}

impl BulletPool {
    /// Place a bullet in the first free slot. Returns `None` if every slot is in flight.
    pub fn fire(&mut self, pos: Vec3) -> Option<usize> {
        let slot = self.slots.iter().position(|b| !b.active)?;
        self.slots[slot] = Bullet {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            active: true,
        };
        Some(slot)
    }

    /// Move every live bullet downrange, retiring the ones past the far limit
    pub fn advance(&mut self, dt: f32) {
        for bullet in self.slots.iter_mut().filter(|b| b.active) {
            bullet.z -= BULLET_SPEED * dt;
            if bullet.z < BULLET_MAX_DEPTH {
                bullet.active = false;
            }
        }
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Bullet> {
        self.slots.iter().filter(|b| b.active)
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut Bullet> {
        self.slots.iter_mut().filter(|b| b.active)
    }

    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

/// How the player is travelling. Exactly one mode at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ride {
    #[default]
    OnFoot,
    Sled {
        /// Ice ball launcher unlocked
        can_shoot: bool,
    },
}

impl Ride {
    pub fn has_sled(&self) -> bool {
        matches!(self, Ride::Sled { .. })
    }

    pub fn can_shoot(&self) -> bool {
        matches!(self, Ride::Sled { can_shoot: true })
    }
}

/// Pursuit sub-state. Proximity only exists while a chase is running.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Pursuit {
    #[default]
    Idle,
    Chasing {
        /// 0 = far behind, `BEAR_CATCH_PROXIMITY` = caught
        proximity: f32,
        /// Seconds since the chase began
        timer: f32,
    },
}

impl Pursuit {
    pub fn is_chasing(&self) -> bool {
        matches!(self, Pursuit::Chasing { .. })
    }

    pub fn proximity(&self) -> f32 {
        match self {
            Pursuit::Idle => 0.0,
            Pursuit::Chasing { proximity, .. } => *proximity,
        }
    }

    pub fn timer(&self) -> f32 {
        match self {
            Pursuit::Idle => 0.0,
            Pursuit::Chasing { timer, .. } => *timer,
        }
    }
}

/// Things that happened during one step, for feedback and presentation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Jumped,
    ShotFired,
    GiftCollected,
    SledAcquired,
    StarCollected,
    ShootUnlocked,
    SnowmanShot,
    /// Ran into a rock or hill
    Crashed(SceneryKind),
    /// Snowman knocked the player off the sled
    SledLost,
    ChaseStarted,
    /// Ran into a second bear mid-chase
    BearRammed,
    ChaseEnded,
    Paused,
    Resumed,
    GameOver(GameOverReason),
}

impl GameEvent {
    /// Whether this event flashes the screen
    pub fn is_hit(&self) -> bool {
        matches!(
            self,
            GameEvent::Crashed(_)
                | GameEvent::SledLost
                | GameEvent::ChaseStarted
                | GameEvent::BearRammed
        )
    }
}

/// Events produced by one step (or several substeps folded together)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameEvents {
    events: Vec<GameEvent>,
}

impl FrameEvents {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Fold another step's events into this frame
    pub fn extend(&mut self, other: FrameEvents) {
        self.events.extend(other.events);
    }

    /// This frame took a hit
    pub fn hit(&self) -> bool {
        self.events.iter().any(GameEvent::is_hit)
    }

    pub fn contains(&self, event: GameEvent) -> bool {
        self.events.contains(&event)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Random source for scenery generation
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Set once when the run ends
    pub game_over_reason: Option<GameOverReason>,
    /// Simulated seconds of play
    pub time: f32,
    /// Baseline forward scroll rate
    pub base_speed: f32,
    /// Current forward scroll rate
    pub speed: f32,
    pub score: u32,
    /// Lateral position, clamped to the lane
    pub player_x: f32,
    /// Height above the snow
    pub player_y: f32,
    pub y_velocity: f32,
    pub is_jumping: bool,
    /// Jump input as sampled last step (for edge detection)
    pub jump_held: bool,
    pub ride: Ride,
    /// Simulation time of the last shot
    pub last_shot_time: f32,
    pub pursuit: Pursuit,
    /// Scenery pool, always `SCENERY_COUNT` slots
    pub scenery: Vec<SceneryObject>,
    pub bullets: BulletPool,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let scenery = spawn::initial_scenery(&mut rng);

        Self {
            seed,
            rng,
            phase: GamePhase::Playing,
            game_over_reason: None,
            time: 0.0,
            base_speed: BASE_SPEED,
            speed: BASE_SPEED,
            score: 0,
            player_x: 0.0,
            player_y: 0.0,
            y_velocity: 0.0,
            is_jumping: false,
            jump_held: false,
            ride: Ride::OnFoot,
            last_shot_time: 0.0,
            pursuit: Pursuit::Idle,
            scenery,
            bullets: BulletPool::default(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Enter the terminal phase
    pub fn end_run(&mut self, reason: GameOverReason) -> GameEvent {
        log::info!(
            "Game over after {:.1}s with score {}: {}",
            self.time,
            self.score,
            reason.message()
        );
        self.phase = GamePhase::GameOver;
        self.game_over_reason = Some(reason);
        GameEvent::GameOver(reason)
    }

    /// Invariants that must hold between steps. Violations mean a logic bug.
    pub fn debug_check_invariants(&self) {
        debug_assert!(
            (-LANE_HALF_WIDTH..=LANE_HALF_WIDTH).contains(&self.player_x),
            "player_x out of lane: {}",
            self.player_x
        );
        debug_assert!(self.player_y >= 0.0, "player below ground: {}", self.player_y);
        debug_assert!(
            (0.0..=BEAR_CATCH_PROXIMITY).contains(&self.pursuit.proximity()),
            "pursuit proximity out of range: {}",
            self.pursuit.proximity()
        );
        debug_assert!(self.speed >= 0.0 && self.speed.is_finite(), "bad speed: {}", self.speed);
        debug_assert_eq!(self.scenery.len(), SCENERY_COUNT, "scenery pool resized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.scenery.len(), SCENERY_COUNT);
        assert!(state.scenery.iter().all(|o| o.active));
        assert_eq!(state.speed, BASE_SPEED);
        assert_eq!(state.ride, Ride::OnFoot);
        assert!(!state.pursuit.is_chasing());
        assert_eq!(state.bullets.active_count(), 0);
        state.debug_check_invariants();
    }

    #[test]
    fn test_bullet_pool_recycles_slots() {
        let mut pool = BulletPool::default();
        for _ in 0..BULLET_CAPACITY {
            assert!(pool.fire(Vec3::new(0.0, 1.5, -3.0)).is_some());
        }
        assert_eq!(pool.fire(Vec3::ZERO), None);

        // Run them all past the far limit
        for _ in 0..10 {
            pool.advance(1.0);
        }
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.fire(Vec3::ZERO), Some(0));
        assert_eq!(pool.capacity(), BULLET_CAPACITY);
    }

    #[test]
    fn test_bullet_retires_past_far_limit() {
        let mut pool = BulletPool::default();
        pool.fire(Vec3::new(0.0, 0.0, BULLET_MAX_DEPTH + 1.0));
        pool.advance(0.01);
        assert_eq!(pool.active_count(), 1);
        pool.advance(0.1);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_respawn_overwrites_in_place() {
        let mut obj = SceneryObject {
            x: 3.0,
            z: 16.0,
            kind: SceneryKind::Gift,
            scale: 1.0,
            active: false,
            rot: 4.0,
            dx: 0.0,
            is_special: false,
        };
        obj.respawn_from(SceneryObject {
            x: -1.0,
            z: -260.0,
            kind: SceneryKind::WalkingBear,
            scale: 0.9,
            active: true,
            rot: 2.5,
            dx: 4.0,
            is_special: false,
        });
        assert!(obj.active);
        assert_eq!(obj.kind, SceneryKind::WalkingBear);
        assert_eq!(obj.z, -260.0);
        assert_eq!(obj.dx, 4.0);
        assert_eq!(obj.rot, 0.0);
    }

    #[test]
    fn test_pursuit_accessors() {
        assert_eq!(Pursuit::Idle.proximity(), 0.0);
        let chase = Pursuit::Chasing {
            proximity: 42.0,
            timer: 3.0,
        };
        assert!(chase.is_chasing());
        assert_eq!(chase.proximity(), 42.0);
        assert_eq!(chase.timer(), 3.0);
    }

    #[test]
    fn test_ride_flags() {
        assert!(!Ride::OnFoot.has_sled());
        assert!(!Ride::OnFoot.can_shoot());
        assert!(Ride::Sled { can_shoot: false }.has_sled());
        assert!(!Ride::Sled { can_shoot: false }.can_shoot());
        assert!(Ride::Sled { can_shoot: true }.can_shoot());
    }

    #[test]
    fn test_frame_events_hit() {
        let mut events = FrameEvents::default();
        events.push(GameEvent::GiftCollected);
        assert!(!events.hit());
        events.push(GameEvent::Crashed(SceneryKind::Rock));
        assert!(events.hit());
    }
}
