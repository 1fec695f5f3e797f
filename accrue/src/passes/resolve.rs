use accrue_gpu::{Kernel, KernelParam};

use crate::{
    Backend, Error, PassContext, RenderPassInvocation, Resource, Result,
};

/// Draws the accumulated radiance into the camera's target.
#[derive(Debug)]
pub struct ResolvePass {
    label: &'static str,
}

impl ResolvePass {
    pub fn new() -> Self {
        Self {
            label: "accrue_resolve_pass",
        }
    }

    pub fn run<B>(
        &self,
        ctxt: &PassContext<'_, B>,
        backend: &mut B,
    ) -> Result<()>
    where
        B: Backend,
    {
        let source = ctxt
            .state
            .texture()
            .ok_or(Error::UninitializedResource("accumulation texture"))?;

        let invocation = RenderPassInvocation::<B>::new(
            self.label,
            Kernel::Resolve,
            ctxt.camera.descriptor.size(),
        )
        .float(KernelParam::Ratio, ctxt.ratio)
        .int(KernelParam::DebugMode, ctxt.settings.debug)
        .bind(KernelParam::Source, Resource::Texture(source))
        .bind(KernelParam::Output, Resource::Target(ctxt.target));

        backend.dispatch(&invocation)
    }
}
