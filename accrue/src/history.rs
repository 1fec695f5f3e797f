use accrue_gpu::ReservoirLayout;
use fxhash::FxHashMap;
use log::info;

use crate::{AccumulationState, Backend, CameraId, ReservoirBuffers};

/// Lifecycle shared by everything a camera keeps between frames.
pub trait CameraHistory {
    /// Forgets all history, so that the next frame starts from scratch.
    fn reset(&mut self);

    /// Releases all GPU resources.
    fn dispose(&mut self);
}

impl<B> CameraHistory for ReservoirBuffers<B>
where
    B: Backend,
{
    fn reset(&mut self) {
        // Reservoirs are reallocated lazily, so releasing them is the only
        // way to drop their contents without knowing the viewport
        self.release();
    }

    fn dispose(&mut self) {
        self.release();
    }
}

impl<B> CameraHistory for AccumulationState<B>
where
    B: Backend,
{
    fn reset(&mut self) {
        self.invalidate();
        self.forget_transform();
        self.reservoirs_mut().reset();
    }

    fn dispose(&mut self) {
        self.reset();
        self.release_camera();
    }
}

/// Per-camera records, keyed by the camera's identity.
///
/// Records are created on the first frame a camera gets rendered and live
/// until the camera is removed (or the arena is dropped); dropping a record
/// releases its GPU resources.
#[derive(Debug)]
pub struct CameraHistories<B>
where
    B: Backend,
{
    cameras: FxHashMap<CameraId, AccumulationState<B>>,
}

impl<B> CameraHistories<B>
where
    B: Backend,
{
    pub fn get_or_create(
        &mut self,
        id: CameraId,
        layout: ReservoirLayout,
    ) -> &mut AccumulationState<B> {
        self.cameras.entry(id).or_insert_with(|| {
            info!("Creating camera: {id}");

            AccumulationState::new(layout)
        })
    }

    pub fn get(&self, id: CameraId) -> Option<&AccumulationState<B>> {
        self.cameras.get(&id)
    }

    pub fn get_mut(
        &mut self,
        id: CameraId,
    ) -> Option<&mut AccumulationState<B>> {
        self.cameras.get_mut(&id)
    }

    pub fn contains(&self, id: CameraId) -> bool {
        self.cameras.contains_key(&id)
    }

    /// Removes camera's record, releasing its resources; returns whether the
    /// camera was known.
    pub fn remove(&mut self, id: CameraId) -> bool {
        if let Some(mut camera) = self.cameras.remove(&id) {
            info!("Deleting camera: {id}");

            camera.dispose();
            true
        } else {
            false
        }
    }

    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (CameraId, &AccumulationState<B>)> + '_ {
        self.cameras.iter().map(|(id, camera)| (*id, camera))
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}

impl<B> Default for CameraHistories<B>
where
    B: Backend,
{
    fn default() -> Self {
        Self {
            cameras: Default::default(),
        }
    }
}
