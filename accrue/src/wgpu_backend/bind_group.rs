use log::trace;

/// Collects layout entries and resources of a single bind group.
pub struct BindGroupBuilder<'a> {
    label: String,
    layouts: Vec<wgpu::BindGroupLayoutEntry>,
    resources: Vec<wgpu::BindGroupEntry<'a>>,
}

impl<'a> BindGroupBuilder<'a> {
    pub fn new(label: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            layouts: Default::default(),
            resources: Default::default(),
        }
    }

    pub fn add(
        &mut self,
        items: Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'a>)>,
    ) {
        for (layout, resource) in items {
            self.resources.push(wgpu::BindGroupEntry {
                binding: layout.binding,
                resource,
            });

            self.layouts.push(layout);
        }
    }

    /// Returns layout entries sorted by binding; identifies the pipeline
    /// layout this bind group is compatible with.
    pub fn layouts(&self) -> Vec<wgpu::BindGroupLayoutEntry> {
        let mut layouts = self.layouts.clone();

        layouts.sort_by_key(|layout| layout.binding);
        layouts
    }

    pub fn build(
        self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        let label = format!("accrue_{}_bg", self.label);

        trace!("Creating bind group `{label}`; entries={}", self.layouts.len());

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&label),
            layout,
            entries: &self.resources,
        })
    }
}
