use bytemuck::{Pod, Zeroable};
use glam::{vec4, Mat4, UVec2, Vec3, Vec4, Vec4Swizzles};

/// Per-camera uniform read by every kernel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    /// Camera-to-world transform of the current frame.
    pub curr_xform: Mat4,

    /// Camera-to-world transform of the previous frame; equal to
    /// `curr_xform` on the first frame.
    pub prev_xform: Mat4,

    pub curr_origin: Vec4,
    pub prev_origin: Vec4,

    /// x, y - viewport size in pixels; z - zoom; w - aspect ratio.
    pub screen: Vec4,
}

impl CameraUniform {
    pub fn new(
        curr: (Mat4, Vec3),
        prev: (Mat4, Vec3),
        size: UVec2,
        zoom: f32,
        aspect_ratio: f32,
    ) -> Self {
        Self {
            curr_xform: curr.0,
            prev_xform: prev.0,
            curr_origin: curr.1.extend(1.0),
            prev_origin: prev.1.extend(1.0),
            screen: vec4(size.x as f32, size.y as f32, zoom, aspect_ratio),
        }
    }

    pub fn screen_size(&self) -> UVec2 {
        self.screen.xy().as_uvec2()
    }

    pub fn zoom(&self) -> f32 {
        self.screen.z
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.screen.w
    }

    /// Given a pixel, returns its index into screen-space structures (e.g.
    /// reservoir buffers).
    pub fn screen_to_idx(&self, pos: UVec2) -> usize {
        (pos.y * (self.screen.x as u32) + pos.x) as usize
    }
}
