use accrue_gpu::{Kernel, KernelParam};
use rand::Rng;

use crate::{
    Backend, Error, PassContext, RenderPassInvocation, Resource, Result,
};

/// Merges each pixel's fresh reservoir with its (reprojected) reservoir from
/// the previous frame.
#[derive(Debug)]
pub struct TemporalReusePass {
    label: &'static str,
}

impl TemporalReusePass {
    pub fn new() -> Self {
        Self {
            label: "accrue_temporal_reuse_pass",
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

        let mut invocation = RenderPassInvocation::<B>::new(
            self.label,
            Kernel::TemporalReuse,
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

        // Without motion vectors the kernel reuses the same pixel from the
        // previous frame
        if let Some(motion_vectors) = ctxt.motion_vectors {
            invocation = invocation.bind(
                KernelParam::MotionVectors,
                Resource::Target(motion_vectors),
            );
        }

        backend.dispatch(&invocation)
    }
}
