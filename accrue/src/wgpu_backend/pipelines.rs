use std::mem;
use std::ops::Range;

use accrue_gpu::{Kernel, ParamBlock};
use fxhash::FxHashMap;
use log::debug;

use super::Shaders;
use crate::Result;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct PipelineKey {
    kernel: Kernel,
    entries: Vec<wgpu::BindGroupLayoutEntry>,
    format: Option<wgpu::TextureFormat>,
}

#[derive(Debug)]
pub enum Pipeline {
    Compute(wgpu::ComputePipeline),
    Render(wgpu::RenderPipeline),
}

#[derive(Debug)]
pub struct CachedPipeline {
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub pipeline: Pipeline,
}

/// Pipelines built so far, keyed by kernel and the shape of its bindings.
///
/// The same kernel can be dispatched with different bindings (e.g. temporal
/// reuse with and without motion vectors) and resolved into targets of
/// different formats, so each combination gets its own pipeline.
#[derive(Debug, Default)]
pub struct Pipelines {
    pipelines: FxHashMap<PipelineKey, CachedPipeline>,
}

impl Pipelines {
    pub fn get_or_create(
        &mut self,
        device: &wgpu::Device,
        shaders: &Shaders,
        kernel: Kernel,
        entries: Vec<wgpu::BindGroupLayoutEntry>,
        format: Option<wgpu::TextureFormat>,
    ) -> Result<&CachedPipeline> {
        let key = PipelineKey {
            kernel,
            entries,
            format,
        };

        if !self.pipelines.contains_key(&key) {
            let pipeline = Self::create(device, shaders, &key)?;

            self.pipelines.insert(key.clone(), pipeline);
        }

        Ok(&self.pipelines[&key])
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    fn create(
        device: &wgpu::Device,
        shaders: &Shaders,
        key: &PipelineKey,
    ) -> Result<CachedPipeline> {
        let (module, entry_point) = shaders.get(key.kernel)?;
        let label = key.kernel.label();

        debug!("Initializing pipeline: {label}:{entry_point}");

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("accrue_{label}_bg_layout")),
                entries: &key.entries,
            });

        let stages = if key.kernel.is_compute() {
            wgpu::ShaderStages::COMPUTE
        } else {
            wgpu::ShaderStages::VERTEX_FRAGMENT
        };

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("accrue_{label}_pipeline_layout")),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[wgpu::PushConstantRange {
                    stages,
                    range: Range {
                        start: 0,
                        end: mem::size_of::<ParamBlock>() as u32,
                    },
                }],
            });

        let pipeline_label = format!("accrue_{label}_pipeline");

        let pipeline = if let Some(format) = key.format {
            let vs_entry_point = format!("{entry_point}_vs");
            let fs_entry_point = format!("{entry_point}_fs");

            let pipeline = device.create_render_pipeline(
                &wgpu::RenderPipelineDescriptor {
                    label: Some(&pipeline_label),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module,
                        entry_point: Some(&vs_entry_point),
                        compilation_options: Default::default(),
                        buffers: &[],
                    },
                    primitive: wgpu::PrimitiveState::default(),
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    fragment: Some(wgpu::FragmentState {
                        module,
                        entry_point: Some(&fs_entry_point),
                        compilation_options: Default::default(),
                        targets: &[Some(wgpu::ColorTargetState {
                            format,
                            blend: Some(wgpu::BlendState::REPLACE),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                    }),
                    multiview: None,
                    cache: None,
                },
            );

            Pipeline::Render(pipeline)
        } else {
            let pipeline = device.create_compute_pipeline(
                &wgpu::ComputePipelineDescriptor {
                    label: Some(&pipeline_label),
                    layout: Some(&pipeline_layout),
                    module,
                    entry_point: Some(entry_point),
                    compilation_options: wgpu::PipelineCompilationOptions {
                        zero_initialize_workgroup_memory: false,
                        ..Default::default()
                    },
                    cache: None,
                },
            );

            Pipeline::Compute(pipeline)
        };

        Ok(CachedPipeline {
            bind_group_layout,
            pipeline,
        })
    }
}
