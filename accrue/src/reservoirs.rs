use accrue_gpu::ReservoirLayout;
use glam::{uvec2, UVec2};
use log::{debug, info};

use crate::{Backend, BufferUsage, DoubleBuffered, Error, Result};

/// Double-buffered per-pixel reservoir storage used for ReSTIR reuse.
///
/// Unlike the accumulation texture, reservoirs are not reallocated when the
/// viewport gets resized - temporal history survives resolution changes until
/// [`Self::recreate()`] is called explicitly.
#[derive(Debug)]
pub struct ReservoirBuffers<B>
where
    B: Backend,
{
    layout: ReservoirLayout,
    buffers: Option<DoubleBuffered<B::Buffer>>,
    size: UVec2,
    alternate: bool,
}

impl<B> ReservoirBuffers<B>
where
    B: Backend,
{
    pub fn new(layout: ReservoirLayout) -> Self {
        Self {
            layout,
            buffers: None,
            size: UVec2::ZERO,
            alternate: false,
        }
    }

    /// Allocates both buffers, unless they are already allocated (at any
    /// size); returns whether an allocation happened.
    pub fn ensure_allocated(
        &mut self,
        backend: &mut B,
        width: u32,
        height: u32,
    ) -> bool {
        if self.buffers.is_some() {
            if self.size != uvec2(width, height) {
                debug!(
                    "Keeping reservoirs at {} (viewport is {width}x{height})",
                    self.size
                );
            }

            return false;
        }

        self.allocate(backend, width, height);

        true
    }

    /// Releases both buffers (if allocated) and allocates them again at given
    /// size, dropping all reservoir history.
    pub fn recreate(&mut self, backend: &mut B, width: u32, height: u32) {
        self.release();
        self.allocate(backend, width, height);
    }

    /// Flips which buffer is current.
    pub fn swap(&mut self) {
        self.alternate = !self.alternate;
    }

    pub fn current(&self) -> Result<&B::Buffer> {
        self.buffers
            .as_ref()
            .map(|buffers| buffers.curr(self.alternate))
            .ok_or(Error::UninitializedResource("reservoirs"))
    }

    pub fn previous(&self) -> Result<&B::Buffer> {
        self.buffers
            .as_ref()
            .map(|buffers| buffers.past(self.alternate))
            .ok_or(Error::UninitializedResource("reservoirs"))
    }

    pub fn is_allocated(&self) -> bool {
        self.buffers.is_some()
    }

    /// Returns the index (0 or 1) of the buffer that's currently current.
    pub fn current_index(&self) -> usize {
        self.alternate as usize
    }

    /// Returns the viewport size buffers were allocated for.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn layout(&self) -> ReservoirLayout {
        self.layout
    }

    pub fn release(&mut self) {
        if self.buffers.take().is_some() {
            info!("Releasing reservoirs; size={}x{}", self.size.x, self.size.y);
        }

        self.size = UVec2::ZERO;
    }

    fn allocate(&mut self, backend: &mut B, width: u32, height: u32) {
        let size = self.layout.buffer_size(width, height);

        info!(
            "Allocating reservoirs; size={width}x{height}, stride={}, bytes={size}",
            self.layout.stride()
        );

        let a = backend.create_buffer(
            "accrue_reservoirs_a",
            size,
            BufferUsage::Storage,
        );

        let b = backend.create_buffer(
            "accrue_reservoirs_b",
            size,
            BufferUsage::Storage,
        );

        self.buffers = Some(DoubleBuffered::new(a, b));
        self.size = uvec2(width, height);
    }
}
