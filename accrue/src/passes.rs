use log::debug;

use crate::{AccumulationState, Backend, Camera, Settings};

macro_rules! passes {
    ([ $( $name:ident => $class:ident, )* ]) => {
        $( mod $name; )*
        $( pub use self::$name::*; )*

        /// Kernels a camera goes through each frame, in recording order.
        #[derive(Debug)]
        pub struct CameraPasses {
            $( pub $name: $class, )*
        }

        impl CameraPasses {
            pub fn new() -> Self {
                debug!("Initializing camera passes");

                Self {
                    $( $name: $class::new(), )*
                }
            }
        }

        impl Default for CameraPasses {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

passes!([
    ray_generation => RayGenerationPass,
    temporal_reuse => TemporalReusePass,
    spatial_reuse => SpatialReusePass,
    resolve => ResolvePass,
]);

/// Everything a pass reads while being recorded for a single camera.
pub struct PassContext<'a, B>
where
    B: Backend,
{
    pub camera: &'a Camera,
    pub state: &'a AccumulationState<B>,
    pub settings: &'a Settings<B>,
    pub structure: &'a B::AccelerationStructure,
    pub target: &'a B::Target,
    pub motion_vectors: Option<&'a B::Target>,

    /// Convergence step of the current frame.
    pub step: u32,

    /// Convergence ratio of the current frame, in 0..=1.
    pub ratio: f32,
}
