use std::hash::{Hash, Hasher};
use std::mem;

use accrue_gpu::{CameraUniform, ReservoirLayout};
use fxhash::FxHasher;
use log::{debug, info};

use crate::{
    Backend, BufferUsage, Camera, CameraDescriptor, CameraTransform, Error,
    PixelFormat, ReservoirBuffers, Result, TextureDescriptor,
};

/// Returns the descriptor of an accumulation texture backing given camera
/// target: same size, single-sampled, RGBA32F, writable from kernels, no mips
/// and no depth.
pub fn accumulation_descriptor(camera: &CameraDescriptor) -> TextureDescriptor {
    TextureDescriptor {
        width: camera.width,
        height: camera.height,
        format: PixelFormat::Rgba32Float,
        sample_count: 1,
        mip_level_count: 1,
        storage: true,
        depth: false,
    }
}

/// Hashes the accumulation texture's descriptor together with the format of
/// the target it's resolved into, so that changing either invalidates the
/// accumulated samples.
fn descriptor_key(desc: &TextureDescriptor, target: PixelFormat) -> u64 {
    let mut hasher = FxHasher::default();

    desc.hash(&mut hasher);
    target.hash(&mut hasher);
    hasher.finish()
}

/// Outcome of [`AccumulationState::update()`].
#[derive(Debug)]
pub struct AccumulationUpdate<'a, T> {
    pub texture: &'a T,
    pub reallocated: bool,
}

/// Everything a camera keeps between frames: accumulated radiance, how many
/// samples it holds, where the camera was last frame, and its reservoirs.
#[derive(Debug)]
pub struct AccumulationState<B>
where
    B: Backend,
{
    texture: Option<B::Texture>,
    descriptor_key: Option<u64>,
    step: u32,
    prev_transform: Option<CameraTransform>,
    reservoirs: ReservoirBuffers<B>,
    camera: Option<B::Buffer>,
    has_samples: bool,
    frame: u32,
}

impl<B> AccumulationState<B>
where
    B: Backend,
{
    pub fn new(layout: ReservoirLayout) -> Self {
        Self {
            texture: None,
            descriptor_key: None,
            step: 0,
            prev_transform: None,
            reservoirs: ReservoirBuffers::new(layout),
            camera: None,
            has_samples: false,
            frame: 0,
        }
    }

    /// Makes sure the accumulation texture matches given camera target,
    /// reallocating it (and dropping all accumulated samples) if it doesn't.
    ///
    /// A descriptor that cannot back a texture is rejected without touching
    /// any state.
    pub fn update(
        &mut self,
        backend: &mut B,
        camera: &CameraDescriptor,
    ) -> Result<AccumulationUpdate<'_, B::Texture>> {
        if !camera.is_ready() {
            return Err(Error::InvalidDescriptor {
                width: camera.width,
                height: camera.height,
                format: camera.format,
            });
        }

        let desc = accumulation_descriptor(camera);
        let key = descriptor_key(&desc, camera.format);

        if self.descriptor_key.is_some_and(|curr| curr != key) {
            debug!("Accumulation texture is stale; invalidating");

            self.invalidate();
        }

        let reallocated = self.texture.is_none();

        if reallocated {
            info!(
                "Allocating accumulation texture; size={}x{}",
                desc.width, desc.height
            );

            self.texture =
                Some(backend.create_texture("accrue_accumulation", &desc));

            self.descriptor_key = Some(key);
        }

        let texture = self
            .texture
            .as_ref()
            .ok_or(Error::UninitializedResource("accumulation texture"))?;

        Ok(AccumulationUpdate {
            texture,
            reallocated,
        })
    }

    /// Releases the accumulation texture and forgets all accumulated samples.
    pub fn invalidate(&mut self) {
        self.texture = None;
        self.descriptor_key = None;
        self.step = 0;
        self.has_samples = false;
    }

    /// Uploads the camera uniform for the current frame, allocating its
    /// buffer on first use.
    pub fn write_camera(
        &mut self,
        backend: &mut B,
        camera: &Camera,
    ) -> &B::Buffer {
        let curr = camera.transform;
        let prev = self.prev_transform.unwrap_or(curr);

        let uniform = CameraUniform::new(
            (curr.xform, curr.position),
            (prev.xform, prev.position),
            camera.descriptor.size(),
            camera.zoom(),
            camera.aspect_ratio(),
        );

        let buffer = self.camera.get_or_insert_with(|| {
            backend.create_buffer(
                "accrue_camera",
                mem::size_of::<CameraUniform>(),
                BufferUsage::Uniform,
            )
        });

        backend.write_buffer(buffer, bytemuck::bytes_of(&uniform));

        buffer
    }

    pub fn texture(&self) -> Option<&B::Texture> {
        self.texture.as_ref()
    }

    pub fn camera(&self) -> Option<&B::Buffer> {
        self.camera.as_ref()
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn set_step(&mut self, step: u32) {
        self.step = step;
    }

    pub fn prev_transform(&self) -> Option<&CameraTransform> {
        self.prev_transform.as_ref()
    }

    pub fn set_prev_transform(&mut self, transform: CameraTransform) {
        self.prev_transform = Some(transform);
    }

    /// Forgets where the camera was, so that the next frame counts as motion.
    pub fn forget_transform(&mut self) {
        self.prev_transform = None;
    }

    pub fn release_camera(&mut self) {
        self.camera = None;
    }

    pub fn reservoirs(&self) -> &ReservoirBuffers<B> {
        &self.reservoirs
    }

    pub fn reservoirs_mut(&mut self) -> &mut ReservoirBuffers<B> {
        &mut self.reservoirs
    }

    /// Returns how many frames this camera has rendered.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn finish_frame(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    /// Returns whether the accumulation texture holds at least one sample.
    pub fn has_samples(&self) -> bool {
        self.texture.is_some() && self.has_samples
    }

    pub fn mark_traced(&mut self) {
        self.has_samples = true;
    }

    /// Marks the accumulation texture as holding nothing worth resolving,
    /// without releasing it.
    pub fn discard_samples(&mut self) {
        self.has_samples = false;
        self.step = 0;
    }
}
