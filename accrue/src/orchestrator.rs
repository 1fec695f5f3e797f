use log::{debug, error, trace, warn};

use crate::{
    AccumulationState, Backend, CameraFrame, CameraId, CameraPasses,
    ClearMode, Color, ConvergenceController, EngineConfig, Error,
    PassContext, Result, Settings,
};

/// State a camera's frame goes through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameStage {
    Idle,
    AccelerationRefreshed,
    Traced,
    TemporalReused,
    SpatialReused,
    Resolved,

    /// The target got cleared to a sentinel color instead of being resolved;
    /// terminal.
    Cleared,
}

/// What happened to a single camera during a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub camera: CameraId,

    /// Stages visited, in order; always starts with [`FrameStage::Idle`].
    pub stages: Vec<FrameStage>,

    /// Convergence step stored after this frame.
    pub step: u32,

    /// Convergence ratio the target got resolved with.
    pub ratio: f32,

    /// How many times the reservoir buffers got swapped.
    pub swaps: u32,

    /// Why this frame got degraded, if it did.
    pub error: Option<Error>,
}

impl FrameReport {
    fn new(camera: CameraId) -> Self {
        Self {
            camera,
            stages: vec![FrameStage::Idle],
            step: 0,
            ratio: 0.0,
            swaps: 0,
            error: None,
        }
    }

    /// Report of a camera the path tracer didn't touch this frame.
    pub(crate) fn inactive(camera: CameraId) -> Self {
        Self::new(camera)
    }

    /// Returns whether this camera got skipped, i.e. whether nothing was
    /// recorded for it.
    pub fn is_inactive(&self) -> bool {
        self.stages == [FrameStage::Idle] && self.error.is_none()
    }

    pub fn visited(&self, stage: FrameStage) -> bool {
        self.stages.contains(&stage)
    }

    /// Returns the last stage visited.
    pub fn stage(&self) -> FrameStage {
        self.stages.last().copied().unwrap_or(FrameStage::Idle)
    }

    fn enter(&mut self, stage: FrameStage) {
        trace!("Camera {}: entering {stage:?}", self.camera);

        self.stages.push(stage);
    }

    fn degrade(&mut self, err: Error) {
        match &err {
            Error::UninitializedResource(what) => {
                debug_assert!(false, "{what} used before allocation");
                error!("Camera {}: {err}", self.camera);
            }

            // Latched errors get reported once, when they're detected;
            // zero-sized targets (e.g. minimized windows) are skipped
            // silently
            err if err.is_latched()
                || matches!(err, Error::InvalidDescriptor { .. }) =>
            {
                debug!("Camera {}: {err}", self.camera);
            }

            _ => {
                warn!("Camera {}: {err}", self.camera);
            }
        }

        self.error = Some(err);
    }
}

/// Records the passes of a single camera, driving its state machine:
///
/// ```text
/// Idle -> AccelerationRefreshed -> Traced? -> TemporalReused?
///      -> SpatialReused? -> Resolved
/// ```
///
/// ... where any stage can bail out into `Cleared`.
#[derive(Debug)]
pub struct FrameOrchestrator {
    passes: CameraPasses,
    controller: ConvergenceController,
    clear_mode: ClearMode,
    unsupported_color: Color,
    failure_color: Color,
}

impl FrameOrchestrator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            passes: CameraPasses::new(),
            controller: ConvergenceController::new(config.motion),
            clear_mode: config.clear_mode,
            unsupported_color: config.unsupported_color,
            failure_color: config.failure_color,
        }
    }

    pub fn controller(&self) -> &ConvergenceController {
        &self.controller
    }

    /// Records a frame for given camera.
    ///
    /// `refreshed` is the outcome of this frame's acceleration structure
    /// refresh, shared by all cameras.
    #[allow(clippy::too_many_arguments)]
    pub fn run<B>(
        &self,
        backend: &mut B,
        refreshed: &Result<()>,
        structure: &B::AccelerationStructure,
        state: &mut AccumulationState<B>,
        settings: &Settings<B>,
        frame: &CameraFrame<'_, B>,
    ) -> FrameReport
    where
        B: Backend,
    {
        let mut report = FrameReport::new(frame.id);

        if let Err(err) = refreshed {
            let color = if let Error::UnsupportedHardware = err {
                self.unsupported_color
            } else {
                self.failure_color
            };

            backend.clear(frame.target, color);

            report.degrade(err.clone());
            report.enter(FrameStage::Cleared);
            report.step = state.step();

            return report;
        }

        report.enter(FrameStage::AccelerationRefreshed);

        let camera = &frame.camera;

        let reallocated = match state.update(backend, &camera.descriptor) {
            Ok(update) => update.reallocated,

            Err(err) => {
                // There's nothing sensible to clear, so the target is left
                // as-is
                report.degrade(err);
                report.step = state.step();

                return report;
            }
        };

        state.write_camera(backend, camera);

        state.reservoirs_mut().ensure_allocated(
            backend,
            camera.descriptor.width,
            camera.descriptor.height,
        );

        if settings.clear_reservoirs {
            match self.clear_mode {
                ClearMode::Swap => {
                    debug!("Camera {}: clearing reservoirs (swap)", frame.id);

                    state.reservoirs_mut().swap();
                    report.swaps += 1;
                }

                ClearMode::Recreate => {
                    debug!(
                        "Camera {}: clearing reservoirs (recreate)",
                        frame.id
                    );

                    state.reservoirs_mut().recreate(
                        backend,
                        camera.descriptor.width,
                        camera.descriptor.height,
                    );
                }
            }
        }

        let prev_step = state.step();

        // A fresh accumulation texture holds no samples, so the frame starts
        // from scratch even if the camera didn't move
        let prev_transform = if reallocated {
            None
        } else {
            state.prev_transform()
        };

        let convergence = self.controller.advance(
            prev_transform,
            &camera.transform,
            settings.accumulation,
            prev_step,
            settings.max_samples,
        );

        trace!("Camera {}: {convergence:?}", frame.id);

        state.set_step(convergence.step);
        state.set_prev_transform(camera.transform);

        let mut ratio = convergence.ratio;
        let mut traced = false;

        if convergence.trace {
            let ctxt =
                Self::context(state, settings, structure, frame, ratio);

            match self.passes.ray_generation.run(&ctxt, backend) {
                Ok(()) => {
                    traced = true;
                }

                Err(err) => {
                    report.degrade(err);

                    // No sample got added, so the step goes back to where it
                    // was - unless the camera moved, in which case whatever
                    // got accumulated so far is stale
                    if convergence.step == 0 {
                        state.discard_samples();
                    } else {
                        state.set_step(prev_step);
                    }

                    ratio = ConvergenceController::convergence_ratio(
                        state.step(),
                        settings.max_samples,
                    );
                }
            }
        }

        if traced {
            state.mark_traced();
            report.enter(FrameStage::Traced);

            if settings.restir {
                self.reuse(
                    backend,
                    structure,
                    state,
                    settings,
                    frame,
                    ratio,
                    &mut report,
                );
            }
        }

        if state.has_samples() {
            let ctxt =
                Self::context(state, settings, structure, frame, ratio);

            match self.passes.resolve.run(&ctxt, backend) {
                Ok(()) => {
                    report.enter(FrameStage::Resolved);
                }
                Err(err) => {
                    backend.clear(frame.target, self.failure_color);

                    report.degrade(err);
                    report.enter(FrameStage::Cleared);
                }
            }
        } else {
            backend.clear(frame.target, self.failure_color);
            report.enter(FrameStage::Cleared);
        }

        state.finish_frame();

        report.step = state.step();
        report.ratio = ratio;
        report
    }

    /// Runs temporal and then spatial reuse, swapping the reservoirs after
    /// each; stops at the first pass that fails.
    #[allow(clippy::too_many_arguments)]
    fn reuse<B>(
        &self,
        backend: &mut B,
        structure: &B::AccelerationStructure,
        state: &mut AccumulationState<B>,
        settings: &Settings<B>,
        frame: &CameraFrame<'_, B>,
        ratio: f32,
        report: &mut FrameReport,
    ) where
        B: Backend,
    {
        let temporal = {
            let ctxt =
                Self::context(state, settings, structure, frame, ratio);

            self.passes.temporal_reuse.run(&ctxt, backend)
        };

        if let Err(err) = temporal {
            report.degrade(err);
            return;
        }

        state.reservoirs_mut().swap();
        report.swaps += 1;
        report.enter(FrameStage::TemporalReused);

        let spatial = {
            let ctxt =
                Self::context(state, settings, structure, frame, ratio);

            self.passes.spatial_reuse.run(&ctxt, backend)
        };

        if let Err(err) = spatial {
            report.degrade(err);
            return;
        }

        state.reservoirs_mut().swap();
        report.swaps += 1;
        report.enter(FrameStage::SpatialReused);
    }

    fn context<'a, B>(
        state: &'a AccumulationState<B>,
        settings: &'a Settings<B>,
        structure: &'a B::AccelerationStructure,
        frame: &'a CameraFrame<'_, B>,
        ratio: f32,
    ) -> PassContext<'a, B>
    where
        B: Backend,
    {
        PassContext {
            camera: &frame.camera,
            state,
            settings,
            structure,
            target: frame.target,
            motion_vectors: frame.motion_vectors,
            step: state.step(),
            ratio,
        }
    }
}
