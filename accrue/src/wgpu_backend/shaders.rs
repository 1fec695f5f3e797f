use accrue_gpu::Kernel;
use fxhash::FxHashMap;
use log::debug;

use crate::{Error, Result};

/// Compiled kernels, keyed by what they implement.
///
/// A compute kernel is a single entry point; [`Kernel::Resolve`] is a raster
/// kernel whose entry point `name` expands into `name_vs` and `name_fs`.
#[derive(Debug, Default)]
pub struct Shaders {
    kernels: FxHashMap<Kernel, (wgpu::ShaderModule, &'static str)>,
}

impl Shaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        kernel: Kernel,
        module: wgpu::ShaderModule,
        entry_point: &'static str,
    ) {
        debug!("Registering kernel: {}:{entry_point}", kernel.label());

        self.kernels.insert(kernel, (module, entry_point));
    }

    /// Compiles given source and registers it as given kernel.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        kernel: Kernel,
        source: wgpu::ShaderSource<'_>,
        entry_point: &'static str,
    ) {
        let label = format!("accrue_{}_shader", kernel.label());

        let module =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&label),
                source,
            });

        self.insert(kernel, module, entry_point);
    }

    pub fn get(
        &self,
        kernel: Kernel,
    ) -> Result<(&wgpu::ShaderModule, &'static str)> {
        self.kernels
            .get(&kernel)
            .map(|(module, entry_point)| (module, *entry_point))
            .ok_or_else(|| Error::missing(format!("{} kernel", kernel.label())))
    }

    pub fn contains(&self, kernel: Kernel) -> bool {
        self.kernels.contains_key(&kernel)
    }
}
