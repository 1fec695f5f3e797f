use accrue_gpu::{Kernel, KernelParam};
use rand::Rng;

use crate::{
    Backend, Error, PassContext, RenderPassInvocation, Resource, Result,
};

/// Merges each pixel's reservoir with reservoirs of randomly picked
/// neighbours.
#[derive(Debug)]
pub struct SpatialReusePass {
    label: &'static str,
}

impl SpatialReusePass {
    pub fn new() -> Self {
        Self {
            label: "accrue_spatial_reuse_pass",
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
        let camera = ctxt
            .state
            .camera()
            .ok_or(Error::UninitializedResource("camera"))?;

        let output = ctxt
            .state
            .texture()
            .ok_or(Error::UninitializedResource("accumulation texture"))?;

        let reservoirs = ctxt.state.reservoirs();
        let size = ctxt.camera.descriptor.size();

        let invocation = RenderPassInvocation::<B>::new(
            self.label,
            Kernel::SpatialReuse,
            size,
        )
        .int(KernelParam::ConvergenceStep, ctxt.step)
        .int(KernelParam::FrameIndex, ctxt.state.frame())
        .int(KernelParam::Seed, rand::thread_rng().gen::<i32>())
        .int(KernelParam::ReservoirStride, reservoirs.layout().stride())
        .int(KernelParam::Width, size.x)
        .int(KernelParam::Height, size.y)
        .bind(KernelParam::Camera, Resource::Buffer(camera))
        .bind(KernelParam::Output, Resource::Texture(output))
        .bind(
            KernelParam::CurrReservoirs,
            Resource::Buffer(reservoirs.current()?),
        )
        .bind(
            KernelParam::PrevReservoirs,
            Resource::Buffer(reservoirs.previous()?),
        );

        backend.dispatch(&invocation)
    }
}
