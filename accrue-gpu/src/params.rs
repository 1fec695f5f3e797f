use bytemuck::{Pod, Zeroable};

/// Number of 32-bit lanes in [`ParamBlock`].
///
/// The block is uploaded as push constants, so it must stay within the
/// 128-byte minimum guaranteed by most adapters.
pub const PARAM_LANES: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Int,
    Float,
    Resource,
}

macro_rules! kernel_params {
    ([ $( $variant:ident => ($name:literal, $kind:ident, $slot:literal), )* ]) => {
        /// Stable key of a value handed to a kernel.
        ///
        /// Scalar parameters live in [`ParamBlock`] under lane `slot()`;
        /// resource parameters are bound at binding `slot()` of the kernel's
        /// only bind group. `name()` is the identifier kernel authors see and
        /// must not change between kernel versions.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum KernelParam {
            $( $variant, )*
        }

        impl KernelParam {
            pub const ALL: &'static [KernelParam] = &[
                $( KernelParam::$variant, )*
            ];

            pub const fn name(self) -> &'static str {
                match self {
                    $( KernelParam::$variant => $name, )*
                }
            }

            pub const fn kind(self) -> ParamKind {
                match self {
                    $( KernelParam::$variant => ParamKind::$kind, )*
                }
            }

            pub const fn slot(self) -> u32 {
                match self {
                    $( KernelParam::$variant => $slot, )*
                }
            }
        }
    };
}

kernel_params!([
    BounceCountOpaque => ("g_BounceCountOpaque", Int, 0),
    BounceCountTransparent => ("g_BounceCountTransparent", Int, 1),
    ConvergenceStep => ("g_ConvergenceStep", Int, 2),
    FrameIndex => ("g_FrameIndex", Int, 3),
    MaxSamples => ("g_MaxSamples", Int, 4),
    Zoom => ("g_Zoom", Float, 5),
    AspectRatio => ("g_AspectRatio", Float, 6),
    Ratio => ("g_Ratio", Float, 7),
    DebugMode => ("g_DebugMode", Int, 8),
    Seed => ("g_Seed", Int, 9),
    ReservoirStride => ("g_ReservoirStride", Int, 10),
    Width => ("g_Width", Int, 11),
    Height => ("g_Height", Int, 12),
    Camera => ("g_Camera", Resource, 0),
    AccelStruct => ("g_AccelStruct", Resource, 1),
    EnvTex => ("g_EnvTex", Resource, 2),
    Output => ("g_Output", Resource, 4),
    CurrReservoirs => ("g_CurrReservoirs", Resource, 5),
    PrevReservoirs => ("g_PrevReservoirs", Resource, 6),
    MotionVectors => ("g_MotionVectors", Resource, 7),
    Source => ("g_Source", Resource, 9),
]);

impl KernelParam {
    /// Returns how many consecutive bindings this parameter occupies.
    ///
    /// Sampled textures take two: the texture itself and its sampler.
    pub const fn binding_count(self) -> u32 {
        match self {
            KernelParam::EnvTex
            | KernelParam::MotionVectors
            | KernelParam::Source => 2,
            _ => 1,
        }
    }

    pub fn is_scalar(self) -> bool {
        self.kind() != ParamKind::Resource
    }
}

/// Scalar parameters of a single dispatch, laid out the way kernels read
/// them from push constants.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParamBlock {
    lanes: [u32; PARAM_LANES],
}

impl ParamBlock {
    pub fn set_int(&mut self, param: KernelParam, value: i32) {
        debug_assert_eq!(
            ParamKind::Int,
            param.kind(),
            "{} is not an integer parameter",
            param.name()
        );

        self.lanes[param.slot() as usize] = value as u32;
    }

    pub fn set_float(&mut self, param: KernelParam, value: f32) {
        debug_assert_eq!(
            ParamKind::Float,
            param.kind(),
            "{} is not a float parameter",
            param.name()
        );

        self.lanes[param.slot() as usize] = value.to_bits();
    }

    pub fn int(&self, param: KernelParam) -> i32 {
        self.lanes[param.slot() as usize] as i32
    }

    pub fn float(&self, param: KernelParam) -> f32 {
        f32::from_bits(self.lanes[param.slot() as usize])
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
