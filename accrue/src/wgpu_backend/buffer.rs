use log::info;

use super::Bindable;
use crate::BufferUsage;

/// Buffer that exists only in VRAM; written through the queue.
#[derive(Debug)]
pub struct GpuBuffer {
    buffer: wgpu::Buffer,
    usage: BufferUsage,
}

impl GpuBuffer {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        size: usize,
        usage: BufferUsage,
    ) -> Self {
        let size = pad_size(size);

        info!("Allocating buffer `{label}`; usage={usage:?}, size={size}");

        let usages = match usage {
            BufferUsage::Storage => wgpu::BufferUsages::STORAGE,
            BufferUsage::Uniform => wgpu::BufferUsages::UNIFORM,
        };

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            usage: usages | wgpu::BufferUsages::COPY_DST,
            size: size as _,
            mapped_at_creation: false,
        });

        Self { buffer, usage }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }
}

impl Bindable for GpuBuffer {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'_>)> {
        let ty = match self.usage {
            BufferUsage::Storage => {
                wgpu::BufferBindingType::Storage { read_only: false }
            }
            BufferUsage::Uniform => wgpu::BufferBindingType::Uniform,
        };

        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT
                | wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        vec![(layout, self.buffer.as_entire_binding())]
    }
}

/// Pads given size to a multiple of 32 bytes and at least 32 bytes, so that a
/// zero-sized viewport still gets a bindable buffer.
fn pad_size(size: usize) -> usize {
    ((size + 31) & !31).max(32)
}
