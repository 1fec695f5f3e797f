//! [`Backend`] recording the engine's work into wgpu command encoders.

mod bind_group;
mod bindable;
mod buffer;
mod pipelines;
mod shaders;
mod texture;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use accrue_gpu::{Kernel, KernelParam};
use log::{debug, info};

use self::bind_group::*;
pub use self::bindable::*;
pub use self::buffer::*;
use self::pipelines::*;
pub use self::shaders::*;
pub use self::texture::*;
use crate::{
    AccelerationStructure, Backend, BufferUsage, Color, Error,
    RenderPassInvocation, Resource, Result, TextureDescriptor,
};

/// wgpu-based backend.
///
/// The acceleration structure is provided by the host and bound to the ray
/// generation kernel as-is (e.g. a BVH stored in storage buffers), which is
/// why it has to be [`Bindable`].
///
/// Commands are recorded into a single encoder until [`Self::submit()`] gets
/// called; submitting is also the point after which released resources are
/// no longer referenced by any pending work.
pub struct WgpuBackend<A> {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    shaders: Shaders,
    pipelines: Pipelines,
    sampler: wgpu::Sampler,
    encoder: Option<wgpu::CommandEncoder>,
    _structure: PhantomData<fn() -> A>,
}

impl<A> WgpuBackend<A> {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        shaders: Shaders,
    ) -> Self {
        info!("Initializing wgpu backend");

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("accrue_target_sampler"),
            ..Default::default()
        });

        Self {
            device,
            queue,
            shaders,
            pipelines: Default::default(),
            sampler,
            encoder: None,
            _structure: PhantomData,
        }
    }

    /// Returns features the device must be created with for this backend to
    /// be able to trace rays.
    pub fn required_features() -> wgpu::Features {
        wgpu::Features::PUSH_CONSTANTS
            | wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES
    }

    /// Returns limits the device must be created with.
    pub fn required_limits() -> wgpu::Limits {
        wgpu::Limits {
            max_push_constant_size: 128,
            ..Default::default()
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn shaders_mut(&mut self) -> &mut Shaders {
        &mut self.shaders
    }

    /// Submits everything recorded so far.
    pub fn submit(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.queue.submit(Some(encoder.finish()));
        }
    }

    fn encoder(&mut self) -> &mut wgpu::CommandEncoder {
        self.encoder.get_or_insert_with(|| {
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("accrue_encoder"),
                })
        })
    }
}

impl<A> fmt::Debug for WgpuBackend<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WgpuBackend")
            .field("shaders", &self.shaders)
            .field("pipelines", &self.pipelines.len())
            .field("recording", &self.encoder.is_some())
            .finish()
    }
}

impl<A> Backend for WgpuBackend<A>
where
    A: AccelerationStructure + Bindable + fmt::Debug,
{
    type Texture = Texture;
    type Buffer = GpuBuffer;
    type Environment = EnvironmentMap;
    type Target = RenderTarget;
    type AccelerationStructure = A;

    fn supports_ray_tracing(&self) -> bool {
        self.device.features().contains(Self::required_features())
    }

    fn create_texture(
        &mut self,
        label: &str,
        desc: &TextureDescriptor,
    ) -> Self::Texture {
        Texture::new(&self.device, label, desc)
    }

    fn create_buffer(
        &mut self,
        label: &str,
        size: usize,
        usage: BufferUsage,
    ) -> Self::Buffer {
        GpuBuffer::new(&self.device, label, size, usage)
    }

    fn write_buffer(&mut self, buffer: &Self::Buffer, data: &[u8]) {
        self.queue.write_buffer(buffer.buffer(), 0, data);
    }

    fn dispatch(
        &mut self,
        invocation: &RenderPassInvocation<'_, Self>,
    ) -> Result<()> {
        let kernel = invocation.kernel;
        let mut bind_group = BindGroupBuilder::new(kernel.label());
        let mut target = None;

        for (param, resource) in &invocation.resources {
            let binding = param.slot();

            let entries = match (*param, *resource) {
                // Raster kernels render into their output instead of binding
                // it
                (KernelParam::Output, Resource::Target(output))
                    if !kernel.is_compute() =>
                {
                    target = Some(output);
                    continue;
                }

                (KernelParam::Output, Resource::Texture(tex)) => {
                    tex.bind_writable(binding)
                }

                (_, Resource::Texture(tex)) => tex.bind_readable(binding),
                (_, Resource::Buffer(buf)) => buf.bind(binding),
                (_, Resource::Environment(env)) => env.bind(binding),
                (_, Resource::AccelerationStructure(structure)) => {
                    structure.bind(binding)
                }
                (_, Resource::Target(input)) => {
                    input.bind_readable(binding, &self.sampler)
                }
            };

            bind_group.add(entries);
        }

        if !kernel.is_compute() && target.is_none() {
            return Err(Error::missing("resolve target"));
        }

        let pipeline = self.pipelines.get_or_create(
            &self.device,
            &self.shaders,
            kernel,
            bind_group.layouts(),
            target.map(|target| target.format()),
        )?;

        let bind_group =
            bind_group.build(&self.device, &pipeline.bind_group_layout);

        let label = invocation.label;
        let params = invocation.params.as_bytes();

        let encoder = self.encoder.get_or_insert_with(|| {
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("accrue_encoder"),
                })
        });

        match (&pipeline.pipeline, target) {
            (Pipeline::Compute(pipeline), _) => {
                let (x, y) =
                    Kernel::workgroups(invocation.size.x, invocation.size.y);

                let mut pass =
                    encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                        label: Some(label),
                        timestamp_writes: None,
                    });

                pass.set_pipeline(pipeline);
                pass.set_push_constants(0, params);
                pass.set_bind_group(0, &bind_group, &[]);
                pass.dispatch_workgroups(x, y, 1);
            }

            (Pipeline::Render(pipeline), Some(target)) => {
                let mut pass =
                    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some(label),
                        color_attachments: &[Some(
                            wgpu::RenderPassColorAttachment {
                                view: target.view(),
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            },
                        )],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });

                pass.set_pipeline(pipeline);
                pass.set_push_constants(
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    0,
                    params,
                );
                pass.set_bind_group(0, &bind_group, &[]);
                pass.draw(0..3, 0..1);
            }

            (Pipeline::Render(_), None) => {
                return Err(Error::missing("resolve target"));
            }
        }

        Ok(())
    }

    fn clear(&mut self, target: &Self::Target, color: Color) {
        debug!("Clearing target; color={color:?}");

        let encoder = self.encoder();

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("accrue_clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: color.r,
                        g: color.g,
                        b: color.b,
                        a: color.a,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
    }
}
