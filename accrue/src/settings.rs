use derivative::Derivative;
use log::warn;

use crate::{Backend, CameraKind, CameraKinds};

pub const MIN_BOUNCE_COUNT: u32 = 1;
pub const MAX_BOUNCE_COUNT: u32 = 100;

/// Per-frame knobs of the path tracer, usually driven by the host's UI.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct Settings<B>
where
    B: Backend,
{
    /// When disabled, cameras are left untouched.
    pub enable: bool,

    /// Environment map sampled by rays escaping the scene; tracing is skipped
    /// until one is provided.
    pub environment: Option<B::Environment>,

    /// Kinds of cameras the path tracer renders into.
    pub active_cameras: CameraKinds,

    pub bounce_count_opaque: u32,
    pub bounce_count_transparent: u32,

    /// Number of samples after which the image is considered converged.
    pub max_samples: u32,

    /// Whether samples are accumulated across frames while the camera stays
    /// still; when disabled, every frame starts from scratch.
    pub accumulation: bool,

    /// Whether temporal and spatial reservoir reuse passes run.
    pub restir: bool,

    /// One-shot request to reset the reservoirs; see
    /// [`ClearMode`](crate::ClearMode).
    pub clear_reservoirs: bool,

    /// Debug visualization mode forwarded to the resolve kernel (0 = off).
    pub debug: u32,
}

impl<B> Settings<B>
where
    B: Backend,
{
    pub fn with_enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }

    pub fn with_environment(mut self, environment: B::Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_active_cameras(
        mut self,
        kinds: impl Into<CameraKinds>,
    ) -> Self {
        self.active_cameras = kinds.into();
        self
    }

    /// Sets both bounce counts at once.
    pub fn with_bounce_count(mut self, count: u32) -> Self {
        self.bounce_count_opaque = count;
        self.bounce_count_transparent = count;
        self
    }

    pub fn with_bounce_counts(mut self, opaque: u32, transparent: u32) -> Self {
        self.bounce_count_opaque = opaque;
        self.bounce_count_transparent = transparent;
        self
    }

    pub fn with_max_samples(mut self, max_samples: u32) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn with_accumulation(mut self, accumulation: bool) -> Self {
        self.accumulation = accumulation;
        self
    }

    pub fn with_restir(mut self, restir: bool) -> Self {
        self.restir = restir;
        self
    }

    pub fn with_clear_reservoirs(mut self, clear: bool) -> Self {
        self.clear_reservoirs = clear;
        self
    }

    pub fn with_debug(mut self, debug: u32) -> Self {
        self.debug = debug;
        self
    }

    pub fn is_active(&self, kind: CameraKind) -> bool {
        self.enable && self.active_cameras.contains(kind)
    }

    /// Returns a copy of these settings with out-of-range values clamped.
    pub fn sanitized(&self) -> Self {
        let mut this = self.clone();

        this.bounce_count_opaque =
            clamp_bounce_count("opaque", this.bounce_count_opaque);

        this.bounce_count_transparent =
            clamp_bounce_count("transparent", this.bounce_count_transparent);

        if this.max_samples == 0 {
            warn!("max_samples must be at least 1; clamping");

            this.max_samples = 1;
        }

        this
    }
}

fn clamp_bounce_count(kind: &str, count: u32) -> u32 {
    let clamped = count.clamp(MIN_BOUNCE_COUNT, MAX_BOUNCE_COUNT);

    if clamped != count {
        warn!(
            "{kind} bounce count must be within \
             {MIN_BOUNCE_COUNT}..={MAX_BOUNCE_COUNT}; clamping {count} to \
             {clamped}"
        );
    }

    clamped
}

impl<B> Default for Settings<B>
where
    B: Backend,
{
    fn default() -> Self {
        Self {
            enable: true,
            environment: None,
            active_cameras: CameraKinds::default(),
            bounce_count_opaque: 8,
            bounce_count_transparent: 8,
            max_samples: 2048,
            accumulation: true,
            restir: false,
            clear_reservoirs: false,
            debug: 0,
        }
    }
}

/// Source of [`Settings`] consulted once per frame.
///
/// Implemented for `Settings` itself; hosts can implement it on whatever
/// holds their configuration (e.g. a volume stack) to avoid copying it into
/// the engine every frame.
pub trait SettingsProvider<B>
where
    B: Backend,
{
    fn settings(&self) -> Settings<B>;
}

impl<B> SettingsProvider<B> for Settings<B>
where
    B: Backend,
{
    fn settings(&self) -> Settings<B> {
        self.clone()
    }
}

impl<B, F> SettingsProvider<B> for F
where
    B: Backend,
    F: Fn() -> Settings<B>,
{
    fn settings(&self) -> Settings<B> {
        self()
    }
}
