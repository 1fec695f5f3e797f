use std::mem;

/// Layout of a single per-pixel reservoir record.
///
/// Kernels and the engine must agree on the stride; it is picked once, when
/// the engine is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReservoirLayout {
    /// Sample position, normal and radiance, plus weights - 15 lanes.
    Compact,

    /// [`Self::Compact`] extended with the sample's source normal - 18 lanes.
    #[default]
    Extended,
}

impl ReservoirLayout {
    /// Returns the number of `f32` lanes in a record.
    pub fn stride(self) -> usize {
        match self {
            ReservoirLayout::Compact => 15,
            ReservoirLayout::Extended => 18,
        }
    }

    /// Returns the size of a record, in bytes.
    pub fn record_size(self) -> usize {
        self.stride() * mem::size_of::<f32>()
    }

    /// Returns the size of a buffer holding one record per pixel, in bytes.
    pub fn buffer_size(self, width: u32, height: u32) -> usize {
        (width as usize) * (height as usize) * self.record_size()
    }
}
