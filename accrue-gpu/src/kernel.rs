use crate::TILE_SIZE;

/// Kernels dispatched by the engine, in the order a frame runs them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kernel {
    /// Traces new paths, accumulating radiance and seeding the current
    /// reservoirs.
    RayGeneration,

    /// Reuses reservoirs of the previous frame.
    TemporalReuse,

    /// Reuses reservoirs of neighbouring pixels.
    SpatialReuse,

    /// Blits the accumulated radiance onto the camera's target; the only
    /// raster kernel.
    Resolve,
}

impl Kernel {
    pub fn label(self) -> &'static str {
        match self {
            Kernel::RayGeneration => "ray_generation",
            Kernel::TemporalReuse => "temporal_reuse",
            Kernel::SpatialReuse => "spatial_reuse",
            Kernel::Resolve => "resolve",
        }
    }

    pub fn is_compute(self) -> bool {
        self != Kernel::Resolve
    }

    /// Returns the number of workgroups needed to cover a viewport of given
    /// size.
    pub fn workgroups(width: u32, height: u32) -> (u32, u32) {
        (width.div_ceil(TILE_SIZE), height.div_ceil(TILE_SIZE))
    }
}
