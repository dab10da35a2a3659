//! Flat per-frame buffers for the graphics host
//!
//! The host receives one byte slice of instances and one uniform block per
//! frame instead of a call per primitive.

use bytemuck::{Pod, Zeroable};

use super::scene::Frame;
use super::{DrawCommand, RenderSink};

/// One draw command, laid out for a vertex-instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceRaw {
    /// Column-major world matrix
    pub world: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub emissive: f32,
    pub terrain: f32,
    pub primitive: u32,
    pub _pad: u32,
}

impl From<&DrawCommand> for InstanceRaw {
    fn from(cmd: &DrawCommand) -> Self {
        Self {
            world: cmd.world.to_cols_array_2d(),
            color: cmd.color,
            emissive: cmd.emissive,
            terrain: cmd.terrain,
            primitive: cmd.primitive.id(),
            _pad: 0,
        }
    }
}

/// Sink that packs commands straight into instance records
#[derive(Debug, Default)]
pub struct InstanceBatch {
    pub instances: Vec<InstanceRaw>,
}

impl InstanceBatch {
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl RenderSink for InstanceBatch {
    fn draw(&mut self, command: &DrawCommand) {
        self.instances.push(command.into());
    }
}

/// Per-frame uniforms: camera, lights and clear color
///
/// Vec3 values are padded to vec4 for std140 compatibility.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniformsRaw {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub moon_dir: [f32; 4],
    pub nose_pos: [f32; 4],
    pub nose_color: [f32; 4],
    pub item_pos: [[f32; 4]; 2],
    pub item_color: [[f32; 4]; 2],
    pub clear_color: [f32; 4],
}

impl FrameUniformsRaw {
    pub fn new(frame: &Frame, aspect: f32) -> Self {
        let pad = |v: glam::Vec3| [v.x, v.y, v.z, 0.0];
        let rgb = |c: [f32; 3]| [c[0], c[1], c[2], 0.0];
        let lights = &frame.lights;
        Self {
            view_proj: frame.camera.view_projection(aspect).to_cols_array_2d(),
            eye: pad(frame.camera.eye),
            moon_dir: pad(lights.moon_dir),
            nose_pos: pad(lights.nose.position),
            nose_color: rgb(lights.nose.color),
            item_pos: [pad(lights.items[0].position), pad(lights.items[1].position)],
            item_color: [rgb(lights.items[0].color), rgb(lights.items[1].color)],
            clear_color: frame.clear_color,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
