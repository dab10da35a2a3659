//! Frame assembly: camera, lights, backdrop and every entity's model
//!
//! Reads the simulation state and produces a [`Frame`]. Nothing here feeds
//! back into the simulation.

use glam::{Mat4, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::{FRAC_PI_2, PI};

use super::models::{self, Compose, Painter};
use super::palette::{self, Rgba};
use super::{DrawCommand, RenderSink};
use crate::consts::BEAR_CATCH_PROXIMITY;
use crate::settings::Settings;
use crate::sim::{FrameEvents, GameState, Ride, SceneryKind, SceneryObject};

/// Vertical field of view
pub const FOV_Y: f32 = 60.0 * PI / 180.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 400.0;
/// Point the camera always looks at
pub const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 3.0, -10.0);

/// Special items inside this depth window get a point light
const ITEM_LIGHT_Z: (f32, f32) = (-60.0, 20.0);
const ITEM_LIGHT_HEIGHT: f32 = 1.5;

/// Chasing bear sits this far behind the player at zero proximity
const CHASER_MAX_BEHIND: f32 = 8.0;
const CHASER_SIDE_OFFSET: f32 = 3.0;
const CHASER_TURN: f32 = 0.3;

const BULLET_RADIUS: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Fixed chase camera; pulls back and up while sledding
    pub fn for_ride(ride: Ride) -> Self {
        let (height, distance) = if ride.has_sled() { (8.0, 16.0) } else { (6.0, 14.0) };
        Self {
            eye: Vec3::new(0.0, height, distance),
            target: CAMERA_TARGET,
            fov_y: FOV_Y,
            near: Z_NEAR,
            far: Z_FAR,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
}

impl PointLight {
    /// Parked below the ground, contributes nothing
    pub const OFF: Self = Self {
        position: Vec3::new(0.0, -100.0, 0.0),
        color: [0.0; 3],
    };

    pub fn is_off(&self) -> bool {
        self.color == [0.0; 3]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLights {
    /// Direction towards the moon
    pub moon_dir: Vec3,
    /// Reindeer nose glow
    pub nose: PointLight,
    /// Up to two lights on nearby special pickups, nearest first
    pub items: [PointLight; 2],
}

impl SceneLights {
    pub fn gather(state: &GameState, max_items: usize) -> Self {
        let nose_height = if state.ride.has_sled() { 1.5 } else { 1.0 };
        let nose = PointLight {
            position: Vec3::new(state.player_x, state.player_y + nose_height, -5.0),
            color: if state.ride.has_sled() { palette::NOSE_GLOW } else { [0.0; 3] },
        };

        let mut visible: Vec<&SceneryObject> = state
            .scenery
            .iter()
            .filter(|o| o.active && o.is_special && o.z > ITEM_LIGHT_Z.0 && o.z < ITEM_LIGHT_Z.1)
            .collect();
        visible.sort_by(|a, b| a.z.abs().total_cmp(&b.z.abs()));

        let mut items = [PointLight::OFF; 2];
        for (slot, obj) in items.iter_mut().zip(visible.iter().take(max_items)) {
            let color = if obj.kind == SceneryKind::ShootPowerup { palette::ICE } else { palette::GOLD };
            *slot = PointLight {
                position: Vec3::new(obj.x, ITEM_LIGHT_HEIGHT, obj.z),
                color: palette::light(color),
            };
        }

        Self {
            moon_dir: Vec3::new(0.2, 0.5, 1.0).normalize(),
            nose,
            items,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropStar {
    pub pos: Vec3,
    pub size: f32,
}

/// Static sky and ground, generated once per session
#[derive(Debug, Clone)]
pub struct Backdrop {
    stars: Vec<BackdropStar>,
}

impl Backdrop {
    pub fn new(seed: u64, count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| {
                let x = (rng.random::<f32>() - 0.5) * 400.0;
                let y = 50.0 + rng.random::<f32>() * 100.0;
                let z = -100.0 - rng.random::<f32>() * 200.0;
                let size = 0.5 + rng.random::<f32>() * 0.5;
                BackdropStar {
                    pos: Vec3::new(x, y, z),
                    size,
                }
            })
            .collect();
        Self { stars }
    }

    pub fn stars(&self) -> &[BackdropStar] {
        &self.stars
    }

    fn draw(&self, p: &mut Painter, t: f32, terrain: bool) {
        use super::Primitive::{Cube, Sphere, Terrain};

        let moon = Mat4::from_translation(Vec3::new(20.0, 30.0, -100.0)).scaled_uniform(8.0);
        p.glow(Sphere, moon, palette::MOON, 1.0);

        for star in &self.stars {
            let twinkle = 0.8 + (t * 5.0 + star.pos.x).sin() * 0.2;
            let m = Mat4::from_translation(star.pos).scaled_uniform(star.size);
            p.glow(Cube, m, palette::STAR, twinkle);
        }

        if terrain {
            p.ground(Terrain, Mat4::from_translation(Vec3::new(0.0, -10.0, -250.0)), palette::MOUNTAIN_ROCK);
        }

        let floor = Mat4::from_translation(Vec3::new(0.0, -1.0, -50.0)).scaled(24.0, 1.0, 400.0);
        p.solid(Cube, floor, palette::SNOW);
        for x in [-62.0, 62.0] {
            let bank = Mat4::from_translation(Vec3::new(x, -1.0, -50.0)).scaled(100.0, 1.0, 400.0);
            p.solid(Cube, bank, palette::DEEP_SNOW);
        }
    }
}

/// Everything the host needs to draw one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub camera: Camera,
    pub lights: SceneLights,
    pub clear_color: Rgba,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn submit(&self, sink: &mut dyn RenderSink) {
        for cmd in &self.commands {
            sink.draw(cmd);
        }
    }
}

pub struct FrameRenderer {
    backdrop: Backdrop,
    settings: Settings,
}

impl FrameRenderer {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self {
            backdrop: Backdrop::new(seed, settings.quality.star_count()),
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap preferences; regenerates the sky when the star count changes
    pub fn apply_settings(&mut self, seed: u64, settings: &Settings) {
        if settings.quality.star_count() != self.backdrop.stars.len() {
            self.backdrop = Backdrop::new(seed, settings.quality.star_count());
        }
        self.settings = settings.clone();
    }

    pub fn build(&self, state: &GameState, events: &FrameEvents) -> Frame {
        let clear_color = if events.hit() && self.settings.effective_hit_flash() {
            palette::HIT_FLASH
        } else {
            palette::BACKGROUND
        };

        let mut commands = Vec::with_capacity(256);
        self.draw_world(state, &mut commands);

        Frame {
            camera: Camera::for_ride(state.ride),
            lights: SceneLights::gather(state, self.settings.quality.item_lights()),
            clear_color,
            commands,
        }
    }

    fn draw_world(&self, state: &GameState, sink: &mut dyn RenderSink) {
        let now = state.time;
        // Idle-only animation clock, frozen under reduced motion
        let idle = if self.settings.animate_idle() { now } else { 0.0 };
        let mut p = Painter::new(sink);

        self.backdrop.draw(&mut p, idle, self.settings.quality.terrain_enabled());

        if state.pursuit.is_chasing() {
            draw_chaser(&mut p, state, now);
        }
        draw_player(&mut p, state, now, idle);

        for bullet in state.bullets.iter_active() {
            let m = Mat4::from_translation(Vec3::new(bullet.x, bullet.y, bullet.z));
            models::ice_ball(&mut p, m, BULLET_RADIUS);
        }

        for obj in state.scenery.iter().filter(|o| o.active) {
            draw_scenery(&mut p, obj, now, idle);
        }
    }
}

/// Bear trailing the player from the opposite side
fn draw_chaser(p: &mut Painter, state: &GameState, now: f32) {
    let behind = CHASER_MAX_BEHIND - state.pursuit.proximity() / BEAR_CATCH_PROXIMITY * CHASER_MAX_BEHIND;
    let side = if state.player_x > 0.0 { -1.0 } else { 1.0 };
    let m = Mat4::from_translation(Vec3::new(state.player_x + side * CHASER_SIDE_OFFSET, 0.0, behind))
        .rotated_y(PI)
        .rotated_y(side * CHASER_TURN);
    models::polar_bear(p, m, (now * 20.0).sin());
}

fn draw_player(p: &mut Painter, state: &GameState, now: f32, idle: f32) {
    let mut group = Mat4::from_translation(Vec3::new(state.player_x, state.player_y, 0.0));
    if state.is_jumping {
        group = group.rotated_x(-0.2);
    }

    match state.ride {
        Ride::Sled { .. } => {
            models::sled(p, group);
            models::santa_seated(p, group.translated(0.0, 0.5, 0.5).rotated_y(PI));
            models::reindeer(p, group.translated(0.0, 0.0, -4.5), (now * 15.0).sin());
            for x in [0.5, -0.5] {
                let rein = group.translated(x, 1.0, -2.0).rotated_x(FRAC_PI_2).scaled(0.05, 4.0, 0.05);
                p.solid(super::Primitive::Cylinder, rein, palette::GOLD);
            }
        }
        Ride::OnFoot => {
            let santa = group
                .rotated_y(PI)
                .rotated_z((idle * 10.0).sin() * 0.05)
                .scaled_uniform(0.5);
            models::santa_walking(p, santa, (now * 15.0).sin(), idle.sin() * 0.1);
        }
    }
}

fn draw_scenery(p: &mut Painter, obj: &SceneryObject, now: f32, idle: f32) {
    let base = Mat4::from_translation(Vec3::new(obj.x, 0.0, obj.z));
    match obj.kind {
        SceneryKind::Gift => {
            let m = base
                .rotated_y(idle * 2.0)
                .translated(0.0, 0.5 + (idle * 3.0).sin() * 0.2, 0.0);
            models::gift(p, m);
        }
        SceneryKind::SledPickup => {
            let m = base.rotated_y(obj.rot).translated(0.0, 1.0, 0.0);
            models::sled(p, m.scaled_uniform(0.8));
        }
        SceneryKind::StarPowerup => {
            let pulse = 1.0 + (idle * 5.0).sin() * 0.2;
            let m = base
                .rotated_y(obj.rot * 2.0)
                .scaled_uniform(pulse)
                .translated(0.0, 1.5, 0.0);
            models::star(p, m);
        }
        SceneryKind::ShootPowerup => {
            let m = base.translated(0.0, 1.5 + (idle * 4.0).sin() * 0.3, 0.0);
            models::ice_ball(p, m, 0.8);
        }
        SceneryKind::Villain => models::snowman(p, base, obj.scale),
        SceneryKind::Tree => models::tree(p, base, obj.scale),
        SceneryKind::Rock => models::rock(p, base, obj.scale),
        SceneryKind::Hill => models::hill(p, base),
        SceneryKind::WalkingBear => {
            let facing = if obj.dx > 0.0 { FRAC_PI_2 } else { -FRAC_PI_2 };
            models::polar_bear(p, base.rotated_y(facing), (now * 15.0).sin());
        }
    }
}
