//! Rendering transform pipeline
//!
//! Turns a [`GameState`](crate::sim::GameState) into a flat list of draw
//! commands: one primitive kind, world transform, color and material flags
//! each. Rasterizing them is left to a [`RenderSink`].

pub mod instance;
pub mod models;
pub mod palette;
pub mod scene;

use glam::Mat4;

pub use instance::{FrameUniformsRaw, InstanceBatch, InstanceRaw};
pub use palette::Rgba;
pub use scene::{Backdrop, Camera, Frame, FrameRenderer, PointLight, SceneLights};

/// Unit meshes the host knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Primitive {
    Cube = 0,
    Sphere = 1,
    Cone = 2,
    Cylinder = 3,
    /// Distant mountain range
    Terrain = 4,
    /// Rolling snow mound
    Hill = 5,
    Star = 6,
}

impl Primitive {
    pub fn id(self) -> u32 {
        self as u32
    }
}

/// One primitive to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub primitive: Primitive,
    pub world: Mat4,
    pub color: Rgba,
    /// 0 = lit, 1 = fully self-lit
    pub emissive: f32,
    /// Terrain noise shading weight, 0 for plain props
    pub terrain: f32,
}

/// Terrain weight used by mountains and hills
pub const TERRAIN_SHADING: f32 = 2.0;

/// Consumer of draw commands
pub trait RenderSink {
    fn draw(&mut self, command: &DrawCommand);
}

impl RenderSink for Vec<DrawCommand> {
    fn draw(&mut self, command: &DrawCommand) {
        self.push(*command);
    }
}
