//! Runtime element tags and statically typed tensor elements.
//!
//! A host tensor reports its element type as an [`ElementType`] tag. Only two
//! tags are dispatchable: [`ElementType::Float32`] (full precision) and
//! [`ElementType::Float16`] (half precision). The matching Rust types, `f32` and
//! [`half::f16`], implement [`Element`] so typed execution routines can be
//! written once and instantiated per type tuple.

use core::convert::TryFrom;
use core::fmt;
use core::ops::{Add, Mul};

use half::f16;

/// Element type tag carried by a host tensor.
///
/// The discriminants are stable so hosts can pass tags across an FFI or
/// serialization boundary as a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementType {
    /// IEEE 754 binary32.
    Float32 = 0,
    /// IEEE 754 binary16.
    Float16 = 1,
    /// Brain float (8-bit exponent, 7-bit mantissa).
    BFloat16 = 2,
    /// IEEE 754 binary64.
    Float64 = 3,
    /// Signed 8-bit integer.
    Int8 = 4,
    /// Unsigned 8-bit integer.
    UInt8 = 5,
    /// Signed 32-bit integer.
    Int32 = 6,
    /// Signed 64-bit integer.
    Int64 = 7,
    /// Boolean.
    Bool = 8,
}

impl ElementType {
    /// The dispatchable precision of this tag, if any.
    ///
    /// Returns `None` for every tag the fully connected dispatchers reject.
    #[must_use]
    pub const fn precision(self) -> Option<Precision> {
        match self {
            Self::Float32 => Some(Precision::Full),
            Self::Float16 => Some(Precision::Half),
            _ => None,
        }
    }

    /// Short lowercase name, as used in log fields and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Float32 => "float32",
            Self::Float16 => "float16",
            Self::BFloat16 => "bfloat16",
            Self::Float64 => "float64",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for ElementType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Float32),
            1 => Ok(Self::Float16),
            2 => Ok(Self::BFloat16),
            3 => Ok(Self::Float64),
            4 => Ok(Self::Int8),
            5 => Ok(Self::UInt8),
            6 => Ok(Self::Int32),
            7 => Ok(Self::Int64),
            8 => Ok(Self::Bool),
            _ => Err(()),
        }
    }
}

/// Floating-point width of a dispatched operand or accumulator.
///
/// Ordered so that `Half < Full`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precision {
    /// 16-bit storage or math.
    Half,
    /// 32-bit storage or math.
    Full,
}

impl Precision {
    /// The element tag used to store values of this precision.
    #[must_use]
    pub const fn element_type(self) -> ElementType {
        match self {
            Self::Half => ElementType::Float16,
            Self::Full => ElementType::Float32,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Half => f.write_str("half"),
            Self::Full => f.write_str("full"),
        }
    }
}

/// A scalar type a typed execution routine can be instantiated with.
///
/// Conversions go through `f32`, which represents every `f16` exactly.
pub trait Element:
    Copy + Default + Send + Sync + fmt::Debug + Add<Output = Self> + Mul<Output = Self> + 'static
{
    /// Precision of this type.
    const PRECISION: Precision;
    /// Runtime tag matching this type.
    const TYPE: ElementType;

    /// Convert from `f32`, rounding to nearest.
    fn from_f32(x: f32) -> Self;

    /// Widen to `f32`.
    fn into_f32(self) -> f32;

    /// Convert into another element type via `f32`.
    #[must_use]
    fn cast<U: Element>(self) -> U {
        U::from_f32(self.into_f32())
    }
}

impl Element for f32 {
    const PRECISION: Precision = Precision::Full;
    const TYPE: ElementType = ElementType::Float32;

    fn from_f32(x: f32) -> Self {
        x
    }

    fn into_f32(self) -> f32 {
        self
    }
}

impl Element for f16 {
    const PRECISION: Precision = Precision::Half;
    const TYPE: ElementType = ElementType::Float16;

    fn from_f32(x: f32) -> Self {
        f16::from_f32(x)
    }

    fn into_f32(self) -> f32 {
        f16::to_f32(self)
    }
}
