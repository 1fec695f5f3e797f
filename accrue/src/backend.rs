use std::fmt;

use accrue_gpu::{Kernel, KernelParam, ParamBlock};
use derivative::Derivative;
use glam::UVec2;

use crate::{AccelerationStructure, PixelFormat, Result};

/// GPU the engine records its work on.
///
/// The engine never talks to a graphics API directly - it allocates resources
/// and dispatches kernels through this trait, which keeps the frame logic
/// independent of the API (and testable without one).
pub trait Backend {
    type Texture: fmt::Debug;
    type Buffer: fmt::Debug;

    /// Environment map sampled by rays that escape the scene; cloned into
    /// [`Settings`](crate::Settings) so it must be a cheap handle.
    type Environment: Clone + fmt::Debug;

    /// Surface a camera resolves into.
    type Target: fmt::Debug;

    type AccelerationStructure: AccelerationStructure + fmt::Debug;

    /// Returns whether this backend can trace rays at all.
    fn supports_ray_tracing(&self) -> bool;

    fn create_texture(
        &mut self,
        label: &str,
        desc: &TextureDescriptor,
    ) -> Self::Texture;

    fn create_buffer(
        &mut self,
        label: &str,
        size: usize,
        usage: BufferUsage,
    ) -> Self::Buffer;

    fn write_buffer(&mut self, buffer: &Self::Buffer, data: &[u8]);

    /// Records a kernel dispatch.
    ///
    /// Fails with [`Error::MissingResource`](crate::Error::MissingResource)
    /// when the kernel is not known to the backend.
    fn dispatch(&mut self, invocation: &RenderPassInvocation<'_, Self>)
        -> Result<()>;

    /// Records clearing the target to given color.
    fn clear(&mut self, target: &Self::Target, color: Color);
}

/// Normalized description of a texture the engine allocates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub sample_count: u32,
    pub mip_level_count: u32,
    pub storage: bool,
    pub depth: bool,
}

impl TextureDescriptor {
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Storage,
    Uniform,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const MAGENTA: Self = Self::rgb(1.0, 0.0, 1.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// GPU resource bound to a kernel.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub enum Resource<'a, B>
where
    B: Backend + ?Sized,
{
    Texture(&'a B::Texture),
    Buffer(&'a B::Buffer),
    Environment(&'a B::Environment),
    AccelerationStructure(
        #[derivative(Debug = "ignore")] &'a B::AccelerationStructure,
    ),
    Target(&'a B::Target),
}

impl<'a, B> Clone for Resource<'a, B>
where
    B: Backend + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, B> Copy for Resource<'a, B> where B: Backend + ?Sized {}

/// Everything a single kernel dispatch needs; lives only while the dispatch
/// is being recorded.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct RenderPassInvocation<'a, B>
where
    B: Backend + ?Sized,
{
    pub label: &'static str,
    pub kernel: Kernel,

    /// Size of the dispatch, in pixels.
    pub size: UVec2,

    pub params: ParamBlock,
    pub resources: Vec<(KernelParam, Resource<'a, B>)>,
}

impl<'a, B> RenderPassInvocation<'a, B>
where
    B: Backend + ?Sized,
{
    pub fn new(label: &'static str, kernel: Kernel, size: UVec2) -> Self {
        Self {
            label,
            kernel,
            size,
            params: Default::default(),
            resources: Default::default(),
        }
    }

    pub fn int(mut self, param: KernelParam, value: impl TryInto<i32>) -> Self {
        self.params
            .set_int(param, value.try_into().unwrap_or(i32::MAX));
        self
    }

    pub fn float(mut self, param: KernelParam, value: f32) -> Self {
        self.params.set_float(param, value);
        self
    }

    pub fn bind(
        mut self,
        param: KernelParam,
        resource: Resource<'a, B>,
    ) -> Self {
        debug_assert!(
            !param.is_scalar(),
            "{} is not a resource parameter",
            param.name()
        );

        self.resources.push((param, resource));
        self
    }

    /// Returns the resource bound under given parameter, if any.
    pub fn resource(&self, param: KernelParam) -> Option<Resource<'a, B>> {
        self.resources
            .iter()
            .find(|(p, _)| *p == param)
            .map(|(_, resource)| *resource)
    }
}
