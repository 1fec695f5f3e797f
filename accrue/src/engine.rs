use log::{debug, info, warn};

use crate::utils::measure;
use crate::{
    AccelerationStructureGateway, Backend, Camera, CameraHistories,
    CameraHistory, CameraId, EngineConfig, FrameOrchestrator, FrameReport,
    SettingsProvider,
};

/// A single camera to be rendered this frame.
pub struct CameraFrame<'a, B>
where
    B: Backend,
{
    pub id: CameraId,
    pub camera: Camera,
    pub target: &'a B::Target,

    /// Per-pixel screen-space motion, used by temporal reuse to find each
    /// pixel's previous reservoir.
    pub motion_vectors: Option<&'a B::Target>,
}

impl<'a, B> CameraFrame<'a, B>
where
    B: Backend,
{
    pub fn new(id: CameraId, camera: Camera, target: &'a B::Target) -> Self {
        Self {
            id,
            camera,
            target,
            motion_vectors: None,
        }
    }

    pub fn with_motion_vectors(mut self, vectors: &'a B::Target) -> Self {
        self.motion_vectors = Some(vectors);
        self
    }
}

/// Progressive path tracer.
///
/// Owns everything that persists between frames - the acceleration structure
/// and per-camera histories - and records each frame's passes through given
/// [`Backend`].
#[derive(Debug)]
pub struct Engine<B>
where
    B: Backend,
{
    config: EngineConfig,
    gateway: AccelerationStructureGateway<B::AccelerationStructure>,
    orchestrator: FrameOrchestrator,
    cameras: CameraHistories<B>,
}

impl<B> Engine<B>
where
    B: Backend,
{
    pub fn new(
        structure: B::AccelerationStructure,
        config: EngineConfig,
    ) -> Self {
        info!("Initializing; config={config:?}");

        Self {
            gateway: AccelerationStructureGateway::new(
                structure,
                config.culling,
            ),
            orchestrator: FrameOrchestrator::new(&config),
            cameras: Default::default(),
            config,
        }
    }

    /// Records a frame for all given cameras, returning a report per camera
    /// (in the same order).
    ///
    /// Errors never escape this function - a camera that couldn't be rendered
    /// gets its target cleared to one of the sentinel colors instead and the
    /// error is returned in its report.
    pub fn render<'a>(
        &mut self,
        backend: &mut B,
        settings: &impl SettingsProvider<B>,
        frames: impl IntoIterator<Item = CameraFrame<'a, B>>,
    ) -> Vec<FrameReport>
    where
        B: 'a,
    {
        let settings = settings.settings().sanitized();

        let frames: Vec<_> = frames.into_iter().collect();

        let active: Vec<bool> = frames
            .iter()
            .map(|frame| settings.is_active(frame.camera.kind))
            .collect();

        if !active.iter().any(|active| *active) {
            debug!("No active cameras; skipping frame");

            return frames
                .iter()
                .map(|frame| FrameReport::inactive(frame.id))
                .collect();
        }

        let layout = self.config.reservoir_layout;

        measure("frame", || {
            let refreshed =
                self.gateway.refresh(backend.supports_ray_tracing());

            if let Err(err) = &refreshed {
                if !err.is_latched() {
                    warn!("Couldn't refresh acceleration structure: {err}");
                }
            }

            frames
                .iter()
                .zip(active)
                .map(|(frame, active)| {
                    if !active {
                        return FrameReport::inactive(frame.id);
                    }

                    let state = self.cameras.get_or_create(frame.id, layout);

                    self.orchestrator.run(
                        backend,
                        &refreshed,
                        self.gateway.structure(),
                        state,
                        &settings,
                        frame,
                    )
                })
                .collect()
        })
    }

    /// Releases everything kept for given camera; returns whether the camera
    /// was known.
    pub fn release_camera(&mut self, id: CameraId) -> bool {
        self.cameras.remove(id)
    }

    /// Drops camera's accumulated samples and reservoirs, so that its next
    /// frame starts from scratch.
    pub fn reset_camera(&mut self, id: CameraId) {
        if let Some(camera) = self.cameras.get_mut(id) {
            debug!("Resetting camera: {id}");

            camera.reset();
        }
    }

    /// Reallocates camera's reservoirs at given size.
    ///
    /// Reservoirs don't follow viewport changes on their own, so hosts should
    /// call this after resizing a camera for good.
    pub fn recreate_reservoirs(
        &mut self,
        backend: &mut B,
        id: CameraId,
        width: u32,
        height: u32,
    ) {
        if let Some(camera) = self.cameras.get_mut(id) {
            camera.reservoirs_mut().recreate(backend, width, height);
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cameras(&self) -> &CameraHistories<B> {
        &self.cameras
    }

    pub fn acceleration_structure(&self) -> &B::AccelerationStructure {
        self.gateway.structure()
    }

    pub fn acceleration_structure_mut(
        &mut self,
    ) -> &mut B::AccelerationStructure {
        self.gateway.structure_mut()
    }

    /// Returns how many instances passed culling during the last frame.
    pub fn instances(&self) -> usize {
        self.gateway.instances()
    }

    /// Returns whether the backend turned out not to support ray tracing.
    pub fn is_unsupported(&self) -> bool {
        self.gateway.is_unsupported()
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec3, Mat4};

    use super::*;
    use crate::testing::{
        count_warnings, MockAccelerationStructure, MockBackend,
    };
    use crate::{
        CameraDescriptor, CameraKind, CameraKinds, CameraTransform, ClearMode,
        Color, Error,
        FrameStage, InstanceInfo, Kernel, KernelParam, MaterialCategory,
        MotionTest, PixelFormat, Settings, ShadowCastingMode,
    };

    const MAIN: CameraId = CameraId::new(1);

    fn camera_at(x: f32) -> Camera {
        sized_camera_at(x, 16, 9)
    }

    fn sized_camera_at(x: f32, width: u32, height: u32) -> Camera {
        Camera::new(
            CameraTransform::new(Mat4::from_translation(vec3(x, 0.0, 0.0))),
            CameraDescriptor::new(width, height, PixelFormat::Bgra8UnormSrgb),
            60.0,
        )
    }

    fn engine() -> Engine<MockBackend> {
        engine_with(EngineConfig::default())
    }

    fn engine_with(config: EngineConfig) -> Engine<MockBackend> {
        let instances = vec![
            InstanceInfo {
                category: MaterialCategory::Opaque,
                shadow_casting: ShadowCastingMode::On,
                layer: 0,
            },
            InstanceInfo {
                category: MaterialCategory::Transparent,
                shadow_casting: ShadowCastingMode::On,
                layer: 0,
            },
        ];

        Engine::new(MockAccelerationStructure::new(instances), config)
    }

    fn settings() -> Settings<MockBackend> {
        Settings::default().with_environment("sky")
    }

    fn render(
        engine: &mut Engine<MockBackend>,
        backend: &mut MockBackend,
        settings: &Settings<MockBackend>,
        camera: Camera,
    ) -> FrameReport {
        let frame = CameraFrame::new(MAIN, camera, &"main");
        let mut reports = engine.render(backend, settings, [frame]);

        assert_eq!(1, reports.len());

        reports.remove(0)
    }

    #[test]
    fn static_camera_converges() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings().with_max_samples(4);

        let mut steps = Vec::new();

        for frame in 0..6 {
            let report =
                render(&mut target, &mut backend, &settings, camera_at(0.0));

            let (kernels, clears) = backend.take_frame();

            steps.push(report.step);
            assert!(clears.is_empty());
            assert_eq!(FrameStage::Resolved, report.stage());

            if frame < 4 {
                assert_eq!(
                    vec![Kernel::RayGeneration, Kernel::Resolve],
                    kernels
                );
                assert!(report.visited(FrameStage::Traced));
            } else {
                assert_eq!(vec![Kernel::Resolve], kernels);
                assert!(!report.visited(FrameStage::Traced));
                assert_eq!(1.0, report.ratio);
            }
        }

        assert_eq!(vec![0, 1, 2, 3, 3, 3], steps);
        assert_eq!(6, target.cameras().get(MAIN).unwrap().frame());
    }

    #[test]
    fn moving_camera_resets_convergence() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings();

        let steps: Vec<_> = [0.0, 0.0, 1.0, 1.0, 1.0]
            .into_iter()
            .map(|x| {
                render(&mut target, &mut backend, &settings, camera_at(x)).step
            })
            .collect();

        assert_eq!(vec![0, 1, 0, 1, 2], steps);

        // Step is what ray generation got told
        let traced: Vec<_> = backend
            .dispatches
            .iter()
            .filter(|dispatch| dispatch.kernel == Kernel::RayGeneration)
            .map(|dispatch| dispatch.params.int(KernelParam::ConvergenceStep))
            .collect();

        assert_eq!(vec![0, 1, 0, 1, 2], traced);
    }

    #[test]
    fn resizing_resets_convergence() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings();

        let steps: Vec<_> = [(16, 9), (16, 9), (32, 18), (32, 18)]
            .into_iter()
            .map(|(width, height)| {
                let camera = sized_camera_at(0.0, width, height);

                render(&mut target, &mut backend, &settings, camera).step
            })
            .collect();

        assert_eq!(vec![0, 1, 0, 1], steps);
        assert_eq!(2, backend.textures.len());

        // Reservoirs (and camera uniform) are kept as they were
        assert_eq!(3, backend.buffers.len());
        assert_eq!(1, backend.released());
    }

    #[test]
    fn reuse_swaps_twice() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings().with_restir(true);

        let report =
            render(&mut target, &mut backend, &settings, camera_at(0.0));

        assert_eq!(
            vec![
                FrameStage::Idle,
                FrameStage::AccelerationRefreshed,
                FrameStage::Traced,
                FrameStage::TemporalReused,
                FrameStage::SpatialReused,
                FrameStage::Resolved,
            ],
            report.stages
        );

        assert_eq!(2, report.swaps);

        assert_eq!(
            vec![
                Kernel::RayGeneration,
                Kernel::TemporalReuse,
                Kernel::SpatialReuse,
                Kernel::Resolve,
            ],
            backend.kernels()
        );

        // Two swaps bring the designation back to where it started
        let reservoirs = target.cameras().get(MAIN).unwrap().reservoirs();

        assert_eq!(0, reservoirs.current_index());

        // Ray generation writes into the current buffer, temporal reuse
        // reads it back as the previous one after the swap
        let ray_generation = &backend.dispatches[0];
        let temporal = &backend.dispatches[1];
        let spatial = &backend.dispatches[2];

        assert_eq!(
            ray_generation.resource(KernelParam::CurrReservoirs),
            temporal.resource(KernelParam::CurrReservoirs)
        );

        assert_eq!(
            temporal.resource(KernelParam::CurrReservoirs),
            spatial.resource(KernelParam::PrevReservoirs)
        );
    }

    #[test]
    fn reuse_is_skipped_when_not_tracing() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings().with_restir(true).with_max_samples(1);

        render(&mut target, &mut backend, &settings, camera_at(0.0));
        backend.take_frame();

        let report =
            render(&mut target, &mut backend, &settings, camera_at(0.0));

        assert_eq!(0, report.swaps);
        assert_eq!(vec![Kernel::Resolve], backend.kernels());
    }

    #[test]
    fn clear_request_swaps_once() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings().with_clear_reservoirs(true);

        for expected in [1, 0, 1] {
            let report =
                render(&mut target, &mut backend, &settings, camera_at(0.0));

            assert_eq!(1, report.swaps);

            assert_eq!(
                expected,
                target
                    .cameras()
                    .get(MAIN)
                    .unwrap()
                    .reservoirs()
                    .current_index()
            );
        }

        // Together with reuse, that's three swaps per frame
        let report = render(
            &mut target,
            &mut backend,
            &settings.with_restir(true),
            camera_at(0.0),
        );

        assert_eq!(3, report.swaps);

        // Swapping never reallocates anything
        assert_eq!(3, backend.buffers.len());
    }

    #[test]
    fn clear_request_recreates_reservoirs() {
        let mut backend = MockBackend::new();

        let mut target = engine_with(
            EngineConfig::default().with_clear_mode(ClearMode::Recreate),
        );

        render(&mut target, &mut backend, &settings(), camera_at(0.0));

        // camera uniform + reservoirs
        assert_eq!(3, backend.buffers.len());

        let report = render(
            &mut target,
            &mut backend,
            &settings().with_clear_reservoirs(true),
            camera_at(0.0),
        );

        assert_eq!(0, report.swaps);
        assert_eq!(5, backend.buffers.len());
        assert_eq!(2, backend.released());
        assert_eq!(1, report.step);
    }

    #[test]
    fn unsupported_hardware_is_latched() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings();

        backend.ray_tracing = false;

        for _ in 0..2 {
            let report =
                render(&mut target, &mut backend, &settings, camera_at(0.0));

            assert_eq!(Some(Error::UnsupportedHardware), report.error);
            assert_eq!(FrameStage::Cleared, report.stage());
            assert_eq!((vec![], vec![Color::MAGENTA]), backend.take_frame());

            // Once reported, the backend is not asked again
            backend.ray_tracing = true;
        }

        assert!(target.is_unsupported());
        assert!(backend.textures.is_empty());
        assert_eq!(0, target.acceleration_structure().builds);
    }

    #[test]
    fn unsupported_hardware_is_reported_once() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings();

        backend.ray_tracing = false;

        let warnings = count_warnings(|| {
            for _ in 0..5 {
                render(&mut target, &mut backend, &settings, camera_at(0.0));
            }
        });

        assert_eq!(1, warnings);
        assert_eq!(vec![Color::MAGENTA; 5], backend.clears);
    }

    #[test]
    fn zero_sized_targets_are_skipped_silently() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings();

        let warnings = count_warnings(|| {
            for _ in 0..3 {
                let report = render(
                    &mut target,
                    &mut backend,
                    &settings,
                    sized_camera_at(0.0, 0, 0),
                );

                assert!(report.error.is_some());
            }
        });

        assert_eq!(0, warnings);
        assert!(backend.clears.is_empty());
    }

    #[test]
    fn build_failure_is_transient() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings();

        render(&mut target, &mut backend, &settings, camera_at(0.0));
        backend.take_frame();

        target.acceleration_structure_mut().fail_next_build = true;

        let report =
            render(&mut target, &mut backend, &settings, camera_at(0.0));

        assert!(matches!(report.error, Some(Error::BuildFailure(_))));
        assert_eq!(FrameStage::Cleared, report.stage());
        assert_eq!(0, report.step);
        assert_eq!((vec![], vec![Color::BLACK]), backend.take_frame());

        let report =
            render(&mut target, &mut backend, &settings, camera_at(0.0));

        assert_eq!(None, report.error);
        assert_eq!(1, report.step);
        assert!(!target.is_unsupported());

        assert_eq!(
            (vec![Kernel::RayGeneration, Kernel::Resolve], vec![]),
            backend.take_frame()
        );
    }

    #[test]
    fn missing_environment_rolls_step_back() {
        let mut backend = MockBackend::new();
        let mut target = engine();

        for _ in 0..2 {
            render(&mut target, &mut backend, &settings(), camera_at(0.0));
        }

        backend.take_frame();

        let report = render(
            &mut target,
            &mut backend,
            &Settings::default(),
            camera_at(0.0),
        );

        assert!(matches!(report.error, Some(Error::MissingResource(_))));
        assert_eq!(1, report.step);
        assert_eq!(FrameStage::Resolved, report.stage());
        assert_eq!((vec![Kernel::Resolve], vec![]), backend.take_frame());

        let report =
            render(&mut target, &mut backend, &settings(), camera_at(0.0));

        assert_eq!(2, report.step);
    }

    #[test]
    fn missing_environment_without_samples_clears() {
        let mut backend = MockBackend::new();
        let mut target = engine();

        let report = render(
            &mut target,
            &mut backend,
            &Settings::default(),
            camera_at(0.0),
        );

        assert!(matches!(report.error, Some(Error::MissingResource(_))));
        assert_eq!(0, report.step);
        assert_eq!(FrameStage::Cleared, report.stage());
        assert_eq!((vec![], vec![Color::BLACK]), backend.take_frame());
    }

    #[test]
    fn missing_kernel_stops_reuse() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings().with_restir(true);

        backend.missing_kernels = vec![Kernel::SpatialReuse];

        let report =
            render(&mut target, &mut backend, &settings, camera_at(0.0));

        assert!(matches!(report.error, Some(Error::MissingResource(_))));
        assert_eq!(1, report.swaps);
        assert!(report.visited(FrameStage::TemporalReused));
        assert!(!report.visited(FrameStage::SpatialReused));
        assert_eq!(FrameStage::Resolved, report.stage());
    }

    #[test]
    fn invalid_descriptor_skips_frame() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings();

        render(&mut target, &mut backend, &settings, camera_at(0.0));
        backend.take_frame();

        let report = render(
            &mut target,
            &mut backend,
            &settings,
            sized_camera_at(0.0, 0, 9),
        );

        assert!(matches!(
            report.error,
            Some(Error::InvalidDescriptor { .. })
        ));
        assert_eq!(0, report.step);
        assert_eq!((vec![], vec![]), backend.take_frame());

        let report =
            render(&mut target, &mut backend, &settings, camera_at(0.0));

        assert_eq!(1, report.step);
        assert_eq!(1, backend.textures.len());
    }

    #[test]
    fn jittered_camera_converges_with_tolerance() {
        let jitter = [0.0, 1e-5, -1e-5, 2e-5];

        let steps = |config: EngineConfig| {
            let mut backend = MockBackend::new();
            let mut target = engine_with(config);

            jitter
                .iter()
                .map(|x| {
                    let camera = camera_at(*x);

                    render(&mut target, &mut backend, &settings(), camera).step
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(vec![0, 0, 0, 0], steps(EngineConfig::default()));

        assert_eq!(
            vec![0, 1, 2, 3],
            steps(
                EngineConfig::default().with_motion(MotionTest::Tolerance(1e-3))
            )
        );
    }

    #[test]
    fn accumulation_can_be_disabled() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings().with_accumulation(false);

        for _ in 0..3 {
            let report =
                render(&mut target, &mut backend, &settings, camera_at(0.0));

            assert_eq!(0, report.step);
            assert!(report.visited(FrameStage::Traced));
        }
    }

    #[test]
    fn inactive_cameras_are_untouched() {
        let mut backend = MockBackend::new();
        let mut target = engine();

        let report = render(
            &mut target,
            &mut backend,
            &settings(),
            camera_at(0.0).with_kind(CameraKind::SceneView),
        );

        assert!(report.is_inactive());

        let report = render(
            &mut target,
            &mut backend,
            &settings().with_enable(false),
            camera_at(0.0),
        );

        assert!(report.is_inactive());
        assert!(backend.dispatches.is_empty());
        assert!(backend.clears.is_empty());
        assert!(backend.textures.is_empty());
        assert!(target.cameras().is_empty());
        assert_eq!(0, target.acceleration_structure().builds);
    }

    #[test]
    fn cameras_share_acceleration_structure() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings().with_active_cameras(CameraKinds::ALL);

        let game = CameraFrame::new(CameraId::new(1), camera_at(0.0), &"game");

        let preview = CameraFrame::new(
            CameraId::new(2),
            camera_at(1.0).with_kind(CameraKind::Preview),
            &"preview",
        );

        let reports = target.render(&mut backend, &settings, [game, preview]);

        assert_eq!(2, reports.len());
        assert_eq!(CameraId::new(1), reports[0].camera);
        assert_eq!(CameraId::new(2), reports[1].camera);
        assert_eq!(1, target.acceleration_structure().builds);
        assert_eq!(2, target.cameras().len());
        assert_eq!(2, backend.textures.len());

        // Default policy skips transparent geometry
        assert_eq!(1, target.instances());
    }

    #[test]
    fn kernel_parameters() {
        let mut backend = MockBackend::new();
        let mut target = engine();

        let settings = settings()
            .with_bounce_counts(500, 3)
            .with_max_samples(64)
            .with_debug(2);

        render(&mut target, &mut backend, &settings, camera_at(0.0));
        render(&mut target, &mut backend, &settings, camera_at(0.0));

        let ray_generation = &backend.dispatches[2];
        let resolve = &backend.dispatches[3];

        assert_eq!(Kernel::RayGeneration, ray_generation.kernel);
        assert_eq!(glam::uvec2(16, 9), ray_generation.size);

        let params = &ray_generation.params;

        assert_eq!(100, params.int(KernelParam::BounceCountOpaque));
        assert_eq!(3, params.int(KernelParam::BounceCountTransparent));
        assert_eq!(1, params.int(KernelParam::ConvergenceStep));
        assert_eq!(1, params.int(KernelParam::FrameIndex));
        assert_eq!(64, params.int(KernelParam::MaxSamples));
        assert_eq!(18, params.int(KernelParam::ReservoirStride));
        assert_eq!(16, params.int(KernelParam::Width));
        assert_eq!(9, params.int(KernelParam::Height));

        approx::assert_relative_eq!(
            16.0 / 9.0,
            params.float(KernelParam::AspectRatio)
        );

        assert_eq!(
            Some("env:sky"),
            ray_generation.resource(KernelParam::EnvTex)
        );

        assert_eq!(
            Some("as"),
            ray_generation.resource(KernelParam::AccelStruct)
        );

        assert!(ray_generation
            .resource(KernelParam::Output)
            .unwrap()
            .starts_with("accrue_accumulation#"));

        assert!(ray_generation
            .resource(KernelParam::CurrReservoirs)
            .unwrap()
            .starts_with("accrue_reservoirs_"));

        assert_eq!(Kernel::Resolve, resolve.kernel);
        assert_eq!(2, resolve.params.int(KernelParam::DebugMode));
        assert_eq!(1.0 / 64.0, resolve.params.float(KernelParam::Ratio));
        assert_eq!(Some("target:main"), resolve.resource(KernelParam::Output));

        assert_eq!(
            ray_generation.resource(KernelParam::Output),
            resolve.resource(KernelParam::Source)
        );
    }

    #[test]
    fn motion_vectors_are_forwarded() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings().with_restir(true);

        let frame = CameraFrame::new(MAIN, camera_at(0.0), &"main")
            .with_motion_vectors(&"motion");

        target.render(&mut backend, &settings, [frame]);

        let temporal = &backend.dispatches[1];

        assert_eq!(Kernel::TemporalReuse, temporal.kernel);

        assert_eq!(
            Some("target:motion"),
            temporal.resource(KernelParam::MotionVectors)
        );
    }

    #[test]
    fn release_camera() {
        let mut backend = MockBackend::new();
        let mut target = engine();

        render(&mut target, &mut backend, &settings(), camera_at(0.0));

        assert!(target.release_camera(MAIN));
        assert!(!target.release_camera(MAIN));

        // accumulation texture + camera uniform + two reservoir buffers
        assert_eq!(4, backend.released());

        // Camera gets recreated from scratch on its next frame
        let report =
            render(&mut target, &mut backend, &settings(), camera_at(0.0));

        assert_eq!(0, report.step);
    }

    #[test]
    fn reset_camera() {
        let mut backend = MockBackend::new();
        let mut target = engine();
        let settings = settings();

        for _ in 0..3 {
            render(&mut target, &mut backend, &settings, camera_at(0.0));
        }

        target.reset_camera(MAIN);

        let report =
            render(&mut target, &mut backend, &settings, camera_at(0.0));

        assert_eq!(0, report.step);
        assert_eq!(2, backend.textures.len());
    }

    #[test]
    fn recreate_reservoirs() {
        let mut backend = MockBackend::new();
        let mut target = engine();

        render(&mut target, &mut backend, &settings(), camera_at(0.0));
        target.recreate_reservoirs(&mut backend, MAIN, 32, 18);

        let reservoirs = target.cameras().get(MAIN).unwrap().reservoirs();

        assert_eq!(glam::uvec2(32, 18), reservoirs.size());
        assert_eq!(2, backend.released());
    }
}
