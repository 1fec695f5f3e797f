use accrue_gpu::ReservoirLayout;

use crate::{Color, InstanceCullingPolicy, MotionTest};

/// What a request to clear the reservoirs actually does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClearMode {
    /// Flips the current and previous reservoir buffers once, without
    /// touching their contents.
    ///
    /// Repeated requests alternate which physical buffer is current; that's
    /// how hosts built against the swap behavior expect it to work.
    #[default]
    Swap,

    /// Releases both reservoir buffers and allocates them again at the
    /// current viewport size.
    Recreate,
}

/// Engine-wide configuration, fixed at construction.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub culling: InstanceCullingPolicy,
    pub reservoir_layout: ReservoirLayout,
    pub clear_mode: ClearMode,
    pub motion: MotionTest,

    /// Color a target is cleared to when the hardware cannot trace rays.
    pub unsupported_color: Color,

    /// Color a target is cleared to when a frame couldn't be rendered for a
    /// transient reason (e.g. failed acceleration structure build).
    pub failure_color: Color,
}

impl EngineConfig {
    pub fn with_culling(mut self, culling: InstanceCullingPolicy) -> Self {
        self.culling = culling;
        self
    }

    pub fn with_reservoir_layout(mut self, layout: ReservoirLayout) -> Self {
        self.reservoir_layout = layout;
        self
    }

    pub fn with_clear_mode(mut self, mode: ClearMode) -> Self {
        self.clear_mode = mode;
        self
    }

    pub fn with_motion(mut self, motion: MotionTest) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_sentinel_colors(
        mut self,
        unsupported: Color,
        failure: Color,
    ) -> Self {
        self.unsupported_color = unsupported;
        self.failure_color = failure;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            culling: Default::default(),
            reservoir_layout: Default::default(),
            clear_mode: Default::default(),
            motion: Default::default(),
            unsupported_color: Color::MAGENTA,
            failure_color: Color::BLACK,
        }
    }
}
