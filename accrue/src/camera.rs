use std::fmt;

use glam::{uvec2, Mat4, UVec2, Vec3};

/// Identity of a camera, as assigned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(u64);

impl CameraId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraKind {
    Game,
    SceneView,
    Preview,
    Reflection,
}

impl CameraKind {
    fn bit(self) -> u32 {
        match self {
            CameraKind::Game => 1 << 0,
            CameraKind::SceneView => 1 << 1,
            CameraKind::Preview => 1 << 2,
            CameraKind::Reflection => 1 << 3,
        }
    }
}

/// Set of [`CameraKind`]s; used to select which cameras get path-traced.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraKinds(u32);

impl CameraKinds {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    pub fn with(self, kind: CameraKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub fn contains(self, kind: CameraKind) -> bool {
        self.0 & kind.bit() > 0
    }
}

impl Default for CameraKinds {
    fn default() -> Self {
        Self::NONE.with(CameraKind::Game)
    }
}

impl From<CameraKind> for CameraKinds {
    fn from(kind: CameraKind) -> Self {
        Self::NONE.with(kind)
    }
}

impl fmt::Debug for CameraKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds = [
            CameraKind::Game,
            CameraKind::SceneView,
            CameraKind::Preview,
            CameraKind::Reflection,
        ];

        f.debug_set()
            .entries(kinds.into_iter().filter(|kind| self.contains(*kind)))
            .finish()
    }
}

/// Pixel format of a camera's target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    #[default]
    Undefined,
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Rgba16Float,
    Rgba32Float,
}

/// Describes the color target a camera renders into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CameraDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub sample_count: u32,
}

impl CameraDescriptor {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            sample_count: 1,
        }
    }

    pub fn size(&self) -> UVec2 {
        uvec2(self.width, self.height)
    }

    /// Returns whether this descriptor can back an accumulation texture.
    pub fn is_ready(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.format != PixelFormat::Undefined
    }
}

/// Placement of a camera in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraTransform {
    /// Camera-to-world matrix.
    pub xform: Mat4,
    pub position: Vec3,
}

impl CameraTransform {
    pub fn new(xform: Mat4) -> Self {
        Self {
            xform,
            position: xform.w_axis.truncate(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub transform: CameraTransform,
    pub descriptor: CameraDescriptor,

    /// Vertical field of view, in degrees.
    pub fov: f32,

    pub kind: CameraKind,
}

impl Camera {
    pub fn new(
        transform: CameraTransform,
        descriptor: CameraDescriptor,
        fov: f32,
    ) -> Self {
        Self {
            transform,
            descriptor,
            fov,
            kind: CameraKind::Game,
        }
    }

    pub fn with_kind(mut self, kind: CameraKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the tangent of half of the vertical field of view - the
    /// distance of the image plane's edge from its center.
    pub fn zoom(&self) -> f32 {
        (self.fov.to_radians() * 0.5).tan()
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.descriptor.height == 0 {
            1.0
        } else {
            self.descriptor.width as f32 / self.descriptor.height as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn kinds() {
        let target = CameraKinds::default();

        assert!(target.contains(CameraKind::Game));
        assert!(!target.contains(CameraKind::SceneView));

        let target = target.with(CameraKind::SceneView);

        assert!(target.contains(CameraKind::SceneView));
        assert!(!CameraKinds::NONE.contains(CameraKind::Game));
        assert!(CameraKinds::ALL.contains(CameraKind::Reflection));
        assert_eq!("{Game, SceneView}", format!("{target:?}"));
    }

    #[test]
    fn descriptor_readiness() {
        let desc = |width, height, format| {
            CameraDescriptor::new(width, height, format).is_ready()
        };

        assert!(desc(4, 4, PixelFormat::Rgba8Unorm));
        assert!(!desc(0, 4, PixelFormat::Rgba8Unorm));
        assert!(!desc(4, 0, PixelFormat::Rgba8Unorm));
        assert!(!desc(4, 4, PixelFormat::Undefined));
    }

    #[test]
    fn projection() {
        let camera = Camera::new(
            CameraTransform::new(Mat4::from_translation(vec3(1.0, 2.0, 3.0))),
            CameraDescriptor::new(200, 100, PixelFormat::Rgba8Unorm),
            90.0,
        );

        assert!((camera.zoom() - 1.0).abs() < 1e-6);
        assert_eq!(2.0, camera.aspect_ratio());
        assert_eq!(vec3(1.0, 2.0, 3.0), camera.transform.position);
    }
}
