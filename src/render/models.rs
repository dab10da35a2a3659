//! Hierarchical character and prop models
//!
//! Every model takes a parent transform and emits its parts relative to it.
//! Child transforms compose on the right (`parent * local`) so offsets are
//! expressed in the parent's local frame.

use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

use super::palette::{self, Rgba};
use super::{DrawCommand, Primitive, RenderSink, TERRAIN_SHADING};

/// Right-multiplying transform helpers
pub trait Compose {
    fn translated(self, x: f32, y: f32, z: f32) -> Mat4;
    fn scaled(self, x: f32, y: f32, z: f32) -> Mat4;
    fn rotated_x(self, angle: f32) -> Mat4;
    fn rotated_y(self, angle: f32) -> Mat4;
    fn rotated_z(self, angle: f32) -> Mat4;

    fn scaled_uniform(self, s: f32) -> Mat4
    where
        Self: Sized,
    {
        self.scaled(s, s, s)
    }
}

impl Compose for Mat4 {
    fn translated(self, x: f32, y: f32, z: f32) -> Mat4 {
        self * Mat4::from_translation(Vec3::new(x, y, z))
    }

    fn scaled(self, x: f32, y: f32, z: f32) -> Mat4 {
        self * Mat4::from_scale(Vec3::new(x, y, z))
    }

    fn rotated_x(self, angle: f32) -> Mat4 {
        self * Mat4::from_rotation_x(angle)
    }

    fn rotated_y(self, angle: f32) -> Mat4 {
        self * Mat4::from_rotation_y(angle)
    }

    fn rotated_z(self, angle: f32) -> Mat4 {
        self * Mat4::from_rotation_z(angle)
    }
}

/// Writes model parts into a sink
pub struct Painter<'a> {
    sink: &'a mut dyn RenderSink,
    parts: usize,
}

impl<'a> Painter<'a> {
    pub fn new(sink: &'a mut dyn RenderSink) -> Self {
        Self { sink, parts: 0 }
    }

    /// Parts emitted so far
    pub fn parts(&self) -> usize {
        self.parts
    }

    fn emit(&mut self, primitive: Primitive, world: Mat4, color: Rgba, emissive: f32, terrain: f32) {
        self.parts += 1;
        self.sink.draw(&DrawCommand {
            primitive,
            world,
            color,
            emissive,
            terrain,
        });
    }

    /// Lit, non-emissive part
    pub fn solid(&mut self, primitive: Primitive, world: Mat4, color: Rgba) {
        self.emit(primitive, world, color, 0.0, 0.0);
    }

    /// Self-lit part
    pub fn glow(&mut self, primitive: Primitive, world: Mat4, color: Rgba, emissive: f32) {
        self.emit(primitive, world, color, emissive, 0.0);
    }

    /// Part shaded with the terrain material
    pub fn ground(&mut self, primitive: Primitive, world: Mat4, color: Rgba) {
        self.emit(primitive, world, color, 0.0, TERRAIN_SHADING);
    }

    fn cube(&mut self, world: Mat4, color: Rgba) {
        self.solid(Primitive::Cube, world, color);
    }
}

/// Polar bear on all fours; `run` swings the legs
pub fn polar_bear(p: &mut Painter, m: Mat4, run: f32) {
    use palette::{BEAR_FUR, BEAR_NOSE};

    let torso = m.translated(0.0, 1.2, 0.0);
    p.cube(torso.scaled(1.8, 1.5, 2.5), BEAR_FUR);

    let head = torso.translated(0.0, 0.8, 1.2);
    p.cube(head.scaled(1.0, 1.0, 1.2), BEAR_FUR);

    let snout = head.translated(0.0, -0.2, 0.6);
    p.cube(snout.scaled(0.6, 0.5, 0.4), BEAR_FUR);
    p.cube(snout.translated(0.0, 0.2, 0.25).scaled(0.2, 0.2, 0.1), BEAR_NOSE);

    for ear_x in [0.4, -0.4] {
        p.cube(head.translated(ear_x, 0.6, 0.0).scaled(0.2, 0.2, 0.1), BEAR_FUR);
    }

    // (x, z, swing direction)
    const LEGS: [(f32, f32, f32); 4] = [(0.5, 0.8, 1.0), (-0.5, 0.8, -1.0), (0.5, -0.8, -1.0), (-0.5, -0.8, 1.0)];
    for (x, z, dir) in LEGS {
        let leg = torso.translated(x, -0.8, z).rotated_x(dir * run);
        p.cube(leg.scaled(0.5, 1.2, 0.5), BEAR_FUR);
    }
}

/// Wrapped present with a gold ribbon cross
pub fn gift(p: &mut Painter, m: Mat4) {
    p.cube(m, palette::GIFT_RED);
    p.cube(m.scaled(1.1, 0.2, 1.1), palette::GOLD);
    p.cube(m.scaled(0.2, 1.1, 1.1), palette::GOLD);
}

/// Three-ball snowman with a top hat, scaled by `s`
pub fn snowman(p: &mut Painter, m: Mat4, s: f32) {
    use palette::{BLACK, CARROT, SNOW};

    p.solid(Primitive::Sphere, m.translated(0.0, 1.0 * s, 0.0).scaled_uniform(2.0 * s), SNOW);
    p.solid(Primitive::Sphere, m.translated(0.0, 1.2 * s, 0.95 * s).scaled_uniform(0.15 * s), BLACK);

    p.solid(Primitive::Sphere, m.translated(0.0, 2.6 * s, 0.0).scaled_uniform(1.5 * s), SNOW);
    // Coal buttons
    for (y, z) in [(2.6, 0.7), (3.0, 0.6)] {
        p.solid(Primitive::Sphere, m.translated(0.0, y * s, z * s).scaled_uniform(0.15 * s), BLACK);
    }

    let head = m.translated(0.0, 3.8 * s, 0.0);
    p.solid(Primitive::Sphere, head.scaled_uniform(1.0 * s), SNOW);
    for eye_x in [0.2, -0.2] {
        p.solid(Primitive::Sphere, head.translated(eye_x * s, 0.1 * s, 0.45 * s).scaled_uniform(0.1 * s), BLACK);
    }

    let nose = head.translated(0.0, 0.0, 0.4 * s).rotated_x(FRAC_PI_2);
    p.solid(Primitive::Cone, nose.scaled(0.15 * s, 0.8 * s, 0.15 * s), CARROT);

    p.solid(Primitive::Cylinder, head.translated(0.0, 0.45 * s, 0.0).scaled(1.2 * s, 0.1 * s, 1.2 * s), BLACK);
    p.solid(Primitive::Cylinder, head.translated(0.0, 0.8 * s, 0.0).scaled(0.7 * s, 0.8 * s, 0.7 * s), BLACK);
}

pub fn tree(p: &mut Painter, m: Mat4, s: f32) {
    p.cube(m.translated(0.0, 1.0 * s, 0.0).scaled(0.6 * s, 2.0 * s, 0.6 * s), palette::WOOD);
    for (y, size) in [(2.0, 2.5), (3.5, 2.0), (4.8, 1.5)] {
        p.solid(Primitive::Cone, m.translated(0.0, y * s, 0.0).scaled_uniform(size * s), palette::LEAF);
    }
}

pub fn rock(p: &mut Painter, m: Mat4, s: f32) {
    p.cube(m.translated(0.0, 0.5 * s, 0.0).scaled(2.0 * s, 1.0 * s, 1.5 * s), palette::ROCK);
}

pub fn hill(p: &mut Painter, m: Mat4) {
    p.ground(Primitive::Hill, m, palette::MOUNTAIN_ROCK);
}

/// Red sled with gold runners, a seat and a sack of presents
pub fn sled(p: &mut Painter, m: Mat4) {
    use palette::{GOLD, RED, SEAT};

    for x in [1.2, -1.2] {
        let runner = m.translated(x, -0.5, 0.0).rotated_x(FRAC_PI_2);
        p.solid(Primitive::Cylinder, runner.scaled(0.2, 4.0, 0.2), GOLD);
    }

    p.cube(m.scaled(2.5, 0.2, 3.0), RED);
    for x in [1.1, -1.1] {
        p.cube(m.translated(x, 0.5, 0.0).scaled(0.2, 1.0, 3.0), RED);
    }

    let front = m.translated(0.0, 0.5, -1.5).rotated_x(-0.5);
    p.cube(front.scaled(2.4, 0.8, 0.2), RED);
    p.cube(m.translated(0.0, 0.8, 1.5).scaled(2.4, 1.5, 0.2), RED);

    p.cube(m.translated(0.0, 0.4, 0.5).scaled(2.2, 0.4, 1.0), SEAT);
    p.cube(m.translated(0.0, 1.0, 1.0).scaled(1.5, 1.5, 1.0), GOLD);
}

/// Full-size Santa on foot. `walk` in [-1, 1] drives the limbs, `sway` twists the torso.
pub fn santa_walking(p: &mut Painter, m: Mat4, walk: f32, sway: f32) {
    use palette::{GOLD, SANTA_BELT, SANTA_BOOT, SANTA_RED, SANTA_WHITE, SKIN};

    let torso = m.translated(0.0, 2.0 + walk.abs() * 0.2, 0.0).rotated_y(sway);
    p.cube(torso.scaled(1.5, 2.0, 1.0), SANTA_RED);
    p.cube(torso.translated(0.0, -0.2, 0.0).scaled(1.6, 0.4, 1.1), SANTA_BELT);
    p.cube(torso.translated(0.0, -0.2, 0.6).scaled(0.5, 0.5, 0.1), GOLD);
    p.cube(torso.translated(0.0, 0.2, 0.55).scaled(0.3, 1.6, 0.1), SANTA_WHITE);

    let head = torso.translated(0.0, 1.5, 0.0);
    p.cube(head, SKIN);
    p.cube(head.translated(0.0, -0.3, 0.4).scaled(0.8, 0.6, 0.4), SANTA_WHITE);

    let hat = head.translated(0.0, 0.6, 0.0);
    p.cube(hat.scaled(1.1, 0.6, 1.1), SANTA_RED);
    p.cube(hat.translated(0.6, 0.3, 0.0).scaled_uniform(0.3), SANTA_WHITE);

    // Arms swing opposite to the legs on the same side
    for (x, swing) in [(1.0, -walk), (-1.0, walk)] {
        let arm = torso.translated(x, 0.8, 0.0).rotated_x(swing);
        p.cube(arm.translated(0.0, -0.6, 0.0).scaled(0.4, 1.2, 0.4), SANTA_RED);
    }
    for (x, swing) in [(0.5, walk), (-0.5, -walk)] {
        let leg = torso.translated(x, -1.0, 0.0).rotated_x(swing);
        p.cube(leg.translated(0.0, -0.8, 0.0).scaled(0.5, 1.5, 0.5), SANTA_BOOT);
    }
}

/// Compact seated Santa for the sled
pub fn santa_seated(p: &mut Painter, m: Mat4) {
    use palette::{BLACK, GOLD, RED, SKIN, WHITE};

    let torso = m.translated(0.0, 0.8, 0.0);
    p.cube(torso.scaled(1.2, 1.4, 0.8), RED);
    p.cube(m.translated(0.0, 0.6, 0.1).scaled(1.25, 0.3, 0.85), BLACK);
    p.cube(m.translated(0.0, 0.6, 0.55).scaled(0.3, 0.3, 0.1), GOLD);

    let head = m.translated(0.0, 1.8, 0.0);
    p.cube(head.scaled_uniform(0.7), SKIN);
    p.cube(head.translated(0.0, -0.2, 0.3).scaled(0.7, 0.6, 0.3), WHITE);

    let hat = head.translated(0.0, 0.4, 0.0);
    p.cube(hat.scaled(0.8, 0.5, 0.8), RED);
    p.cube(hat.translated(0.4, 0.3, 0.0).scaled_uniform(0.2), WHITE);

    for x in [0.7, -0.7] {
        p.cube(torso.translated(x, 0.2, 0.2).scaled(0.3, 0.8, 0.3), RED);
    }
}

/// Reindeer facing -z with a glowing nose; `run` swings the legs
pub fn reindeer(p: &mut Painter, m: Mat4, run: f32) {
    use palette::{ANTLER, FUR_DARK, FUR_LIGHT, REINDEER_NOSE};

    let torso = m.translated(0.0, 1.0, 0.0);
    p.cube(torso.scaled(0.8, 0.8, 1.8), FUR_LIGHT);

    let neck = torso.translated(0.0, 0.6, -0.8).rotated_x(-0.5);
    p.cube(neck.scaled(0.5, 1.0, 0.5), FUR_LIGHT);

    let head = neck.translated(0.0, 0.6, -0.2);
    p.cube(head.scaled(0.6, 0.5, 0.8), FUR_LIGHT);
    p.glow(Primitive::Cube, head.translated(0.0, 0.0, -0.45).scaled_uniform(0.2), REINDEER_NOSE, 1.0);
    for x in [0.3, -0.3] {
        p.cube(head.translated(x, 0.5, 0.0).scaled(0.1, 0.6, 0.1), ANTLER);
    }

    // (x, z, swing direction); front legs at -z
    const LEGS: [(f32, f32, f32); 4] = [(0.3, -0.7, 1.0), (-0.3, -0.7, -1.0), (0.3, 0.7, -1.0), (-0.3, 0.7, 1.0)];
    for (x, z, dir) in LEGS {
        let leg = torso.translated(x, -0.6, z).rotated_x(dir * run);
        p.cube(leg.translated(0.0, -0.4, 0.0).scaled(0.25, 1.0, 0.25), FUR_DARK);
    }
}

/// Ice ball projectile
pub fn ice_ball(p: &mut Painter, m: Mat4, radius: f32) {
    p.glow(Primitive::Sphere, m.scaled_uniform(radius), palette::ICE, 1.0);
}

pub fn star(p: &mut Painter, m: Mat4) {
    p.glow(Primitive::Star, m, palette::STAR, 1.0);
}
