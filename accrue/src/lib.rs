//! Progressive path tracer core: temporal accumulation with convergence
//! tracking, double-buffered ReSTIR reservoirs and per-camera orchestration
//! of the ray generation, reuse and resolve kernels.
//!
//! The engine is API-agnostic - it talks to the GPU through [`Backend`],
//! with [`WgpuBackend`] being the bundled implementation.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::new_without_default)]

mod acceleration;
mod accumulation;
mod backend;
mod camera;
mod config;
mod convergence;
mod double_buffered;
mod engine;
mod error;
mod history;
mod orchestrator;
mod passes;
mod reservoirs;
mod settings;
mod utils;
mod wgpu_backend;

#[cfg(test)]
mod testing;

pub use accrue_gpu as gpu;
pub use accrue_gpu::{Kernel, KernelParam, ParamBlock, ReservoirLayout};

pub use self::acceleration::*;
pub use self::accumulation::*;
pub use self::backend::*;
pub use self::camera::*;
pub use self::config::*;
pub use self::convergence::*;
pub(crate) use self::double_buffered::*;
pub use self::engine::*;
pub use self::error::*;
pub use self::history::*;
pub use self::orchestrator::*;
pub use self::passes::*;
pub use self::reservoirs::*;
pub use self::settings::*;
pub use self::wgpu_backend::*;
