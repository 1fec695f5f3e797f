//! Data shared between accrue's host-side engine and its kernels: the kernel
//! parameter registry, the scalar parameter block, the camera uniform and the
//! reservoir record layout.

#![allow(clippy::len_without_is_empty)]

mod camera;
mod kernel;
mod params;
mod reservoir;

pub use self::camera::*;
pub use self::kernel::*;
pub use self::params::*;
pub use self::reservoir::*;

/// Kernels work on 8x8 tiles of pixels.
pub const TILE_SIZE: u32 = 8;
