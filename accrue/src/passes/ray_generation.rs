use accrue_gpu::{Kernel, KernelParam};
use rand::Rng;

use crate::{
    Backend, Error, PassContext, RenderPassInvocation, Resource, Result,
};

/// Traces one sample per pixel, adding it to the accumulation texture and
/// writing the pixel's initial reservoir.
#[derive(Debug)]
pub struct RayGenerationPass {
    label: &'static str,
}

impl RayGenerationPass {
    pub fn new() -> Self {
        Self {
            label: "accrue_ray_generation_pass",
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
        let environment = ctxt
            .settings
            .environment
            .as_ref()
            .ok_or_else(|| Error::missing("environment texture"))?;

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
            Kernel::RayGeneration,
            size,
        )
        .int(
            KernelParam::BounceCountOpaque,
            ctxt.settings.bounce_count_opaque,
        )
        .int(
            KernelParam::BounceCountTransparent,
            ctxt.settings.bounce_count_transparent,
        )
        .int(KernelParam::ConvergenceStep, ctxt.step)
        .int(KernelParam::FrameIndex, ctxt.state.frame())
        .int(KernelParam::MaxSamples, ctxt.settings.max_samples)
        .int(KernelParam::Seed, rand::thread_rng().gen::<i32>())
        .int(KernelParam::ReservoirStride, reservoirs.layout().stride())
        .int(KernelParam::Width, size.x)
        .int(KernelParam::Height, size.y)
        .float(KernelParam::Zoom, ctxt.camera.zoom())
        .float(KernelParam::AspectRatio, ctxt.camera.aspect_ratio())
        .bind(KernelParam::Camera, Resource::Buffer(camera))
        .bind(
            KernelParam::AccelStruct,
            Resource::AccelerationStructure(ctxt.structure),
        )
        .bind(KernelParam::EnvTex, Resource::Environment(environment))
        .bind(KernelParam::Output, Resource::Texture(output))
        .bind(
            KernelParam::CurrReservoirs,
            Resource::Buffer(reservoirs.current()?),
        );

        backend.dispatch(&invocation)
    }
}
