use std::sync::Arc;

use glam::{uvec2, UVec2};
use log::debug;

use super::Bindable;
use crate::{PixelFormat, TextureDescriptor};

/// Maps a host pixel format into its wgpu counterpart.
pub fn texture_format(format: PixelFormat) -> Option<wgpu::TextureFormat> {
    Some(match format {
        PixelFormat::Undefined => return None,
        PixelFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
        PixelFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
        PixelFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
        PixelFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
        PixelFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
        PixelFormat::Rgba32Float => wgpu::TextureFormat::Rgba32Float,
    })
}

/// Texture allocated by the engine, e.g. the accumulation texture.
#[derive(Debug)]
pub struct Texture {
    tex: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    format: wgpu::TextureFormat,
}

impl Texture {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        desc: &TextureDescriptor,
    ) -> Self {
        debug!("Allocating texture `{label}`; desc={desc:?}");

        let format = if desc.depth {
            wgpu::TextureFormat::Depth32Float
        } else {
            texture_format(desc.format)
                .unwrap_or(wgpu::TextureFormat::Rgba32Float)
        };

        let mut usage = wgpu::TextureUsages::TEXTURE_BINDING;

        if desc.storage {
            usage |= wgpu::TextureUsages::STORAGE_BINDING;
        }

        if desc.depth {
            usage |= wgpu::TextureUsages::RENDER_ATTACHMENT;
        }

        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label}_tex")),
            size: wgpu::Extent3d {
                width: desc.width.max(1),
                height: desc.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: desc.mip_level_count.max(1),
            sample_count: desc.sample_count.max(1),
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });

        let view = tex.create_view(&Default::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label}_sampler")),
            ..Default::default()
        });

        Self {
            tex,
            view,
            sampler,
            format,
        }
    }

    pub fn size(&self) -> UVec2 {
        uvec2(self.tex.width(), self.tex.height())
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Binds this texture for sampling: the texture itself at `binding` and
    /// its sampler at `binding + 1`.
    pub fn bind_readable(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'_>)> {
        bind_sampled(binding, &self.view, &self.sampler)
    }

    /// Binds this texture for random writes.
    pub fn bind_writable(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'_>)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT
                | wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::ReadWrite,
                format: self.format,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
            count: None,
        };

        vec![(layout, wgpu::BindingResource::TextureView(&self.view))]
    }
}

/// Environment map sampled by rays escaping the scene; cheap to clone.
#[derive(Clone, Debug)]
pub struct EnvironmentMap {
    view: Arc<wgpu::TextureView>,
    sampler: Arc<wgpu::Sampler>,
}

impl EnvironmentMap {
    pub fn new(view: wgpu::TextureView, sampler: wgpu::Sampler) -> Self {
        Self {
            view: Arc::new(view),
            sampler: Arc::new(sampler),
        }
    }
}

impl Bindable for EnvironmentMap {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'_>)> {
        bind_sampled(binding, &self.view, &self.sampler)
    }
}

/// Host-owned texture view a camera gets resolved into.
///
/// Also used for other host-provided per-camera inputs, e.g. motion vectors.
#[derive(Debug)]
pub struct RenderTarget {
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
}

impl RenderTarget {
    pub fn new(view: wgpu::TextureView, format: wgpu::TextureFormat) -> Self {
        Self { view, format }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Binds this target for sampling with given sampler.
    pub fn bind_readable<'a>(
        &'a self,
        binding: u32,
        sampler: &'a wgpu::Sampler,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'a>)> {
        bind_sampled(binding, &self.view, sampler)
    }
}

fn bind_sampled<'a>(
    binding: u32,
    view: &'a wgpu::TextureView,
    sampler: &'a wgpu::Sampler,
) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'a>)> {
    let tex_layout = wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT | wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
        },
        count: None,
    };

    let sampler_layout = wgpu::BindGroupLayoutEntry {
        binding: binding + 1,
        visibility: wgpu::ShaderStages::FRAGMENT | wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
        count: None,
    };

    vec![
        (tex_layout, wgpu::BindingResource::TextureView(view)),
        (sampler_layout, wgpu::BindingResource::Sampler(sampler)),
    ]
}
