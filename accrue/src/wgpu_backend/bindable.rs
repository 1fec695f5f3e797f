/// Object that can be attached to a kernel, e.g. a buffer or a texture.
///
/// Returned entries must start at `binding` and occupy as many consecutive
/// bindings as the corresponding [`KernelParam`](accrue_gpu::KernelParam)
/// reserves.
pub trait Bindable {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'_>)>;
}
