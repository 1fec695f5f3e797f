use log::{debug, warn};

use crate::{Error, Result};

/// Spatial index over the scene's geometry, owned by the host.
///
/// The engine only drives its per-frame lifecycle (see
/// [`AccelerationStructureGateway::refresh()`]); registering renderable
/// instances and building the structure itself is up to the implementation.
pub trait AccelerationStructure {
    /// Removes all instances registered during the previous frame.
    fn clear_instances(&mut self);

    /// Registers all renderable instances accepted by given policy, returning
    /// how many got registered.
    fn cull_instances(&mut self, policy: &InstanceCullingPolicy) -> usize;

    /// Builds (or rebuilds) the structure from the registered instances.
    fn build(&mut self) -> Result<(), String>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialCategory {
    Opaque,
    Transparent,
    AlphaTested,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShadowCastingMode {
    Off,
    On,
    TwoSided,
    ShadowsOnly,
}

impl ShadowCastingMode {
    fn bit(self) -> u32 {
        match self {
            ShadowCastingMode::Off => 1 << 0,
            ShadowCastingMode::On => 1 << 1,
            ShadowCastingMode::TwoSided => 1 << 2,
            ShadowCastingMode::ShadowsOnly => 1 << 3,
        }
    }
}

/// How sub-meshes of given material category take part in ray tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubMeshFlags {
    Disabled,
    Enabled,

    /// Enabled, but any-hit kernels are skipped - the cheapest option for
    /// geometry that never discards hits.
    ClosestHitOnly,
}

impl SubMeshFlags {
    pub fn is_enabled(self) -> bool {
        self != SubMeshFlags::Disabled
    }
}

/// Renderable instance, as seen by the culling policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceInfo {
    pub category: MaterialCategory,
    pub shadow_casting: ShadowCastingMode,
    pub layer: u32,
}

/// Describes which instances participate in ray tracing; fixed when the
/// engine is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceCullingPolicy {
    pub opaque: SubMeshFlags,
    pub transparent: SubMeshFlags,
    pub alpha_tested: SubMeshFlags,

    /// Bitmask of accepted [`ShadowCastingMode`]s.
    pub shadow_casting_modes: u32,

    /// Bitmask of accepted layers (bit `n` = layer `n`).
    pub layer_mask: u32,

    /// Mask written into each accepted instance; kernels use it to filter
    /// instances when tracing.
    pub instance_mask: u8,
}

impl InstanceCullingPolicy {
    pub fn with_shadow_casting(mut self, mode: ShadowCastingMode) -> Self {
        self.shadow_casting_modes |= mode.bit();
        self
    }

    pub fn without_shadow_casting(mut self, mode: ShadowCastingMode) -> Self {
        self.shadow_casting_modes &= !mode.bit();
        self
    }

    pub fn flags(&self, category: MaterialCategory) -> SubMeshFlags {
        match category {
            MaterialCategory::Opaque => self.opaque,
            MaterialCategory::Transparent => self.transparent,
            MaterialCategory::AlphaTested => self.alpha_tested,
        }
    }

    pub fn accepts(&self, instance: &InstanceInfo) -> bool {
        let layer_bit = 1u32.checked_shl(instance.layer).unwrap_or(0);

        self.flags(instance.category).is_enabled()
            && self.shadow_casting_modes & instance.shadow_casting.bit() > 0
            && self.layer_mask & layer_bit > 0
    }
}

impl Default for InstanceCullingPolicy {
    fn default() -> Self {
        Self {
            opaque: SubMeshFlags::ClosestHitOnly,
            transparent: SubMeshFlags::Disabled,
            alpha_tested: SubMeshFlags::Enabled,
            shadow_casting_modes: 0,
            layer_mask: u32::MAX,
            instance_mask: 1 << 0,
        }
        .with_shadow_casting(ShadowCastingMode::Off)
        .with_shadow_casting(ShadowCastingMode::On)
        .with_shadow_casting(ShadowCastingMode::TwoSided)
    }
}

/// Wraps the host's acceleration structure into a single per-frame refresh.
#[derive(Debug)]
pub struct AccelerationStructureGateway<A> {
    structure: A,
    policy: InstanceCullingPolicy,
    unsupported: bool,
    instances: usize,
}

impl<A> AccelerationStructureGateway<A>
where
    A: AccelerationStructure,
{
    pub fn new(structure: A, policy: InstanceCullingPolicy) -> Self {
        Self {
            structure,
            policy,
            unsupported: false,
            instances: 0,
        }
    }

    /// Rebuilds the structure for the current frame; must be called once per
    /// frame, before any rays get traced.
    ///
    /// Lack of ray-tracing support is checked only once - after it's been
    /// reported, all subsequent calls fail immediately.
    pub fn refresh(&mut self, supports_ray_tracing: bool) -> Result<()> {
        if self.unsupported {
            return Err(Error::UnsupportedHardware);
        }

        if !supports_ray_tracing {
            warn!("Ray tracing is not supported on this device");

            self.unsupported = true;
            return Err(Error::UnsupportedHardware);
        }

        self.structure.clear_instances();
        self.instances = self.structure.cull_instances(&self.policy);

        debug!("Building acceleration structure; instances={}", self.instances);

        self.structure.build().map_err(Error::BuildFailure)
    }

    pub fn is_unsupported(&self) -> bool {
        self.unsupported
    }

    /// Returns how many instances passed culling during the last refresh.
    pub fn instances(&self) -> usize {
        self.instances
    }

    pub fn policy(&self) -> &InstanceCullingPolicy {
        &self.policy
    }

    pub fn structure(&self) -> &A {
        &self.structure
    }

    pub fn structure_mut(&mut self) -> &mut A {
        &mut self.structure
    }
}
