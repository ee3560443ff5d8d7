//! The closed set of type instantiations a fully connected kernel can run with.
//!
//! Each instantiation is a zero-sized marker type implementing [`ForwardTypes`]
//! or [`BackwardTypes`], whose associated types name the element type of every
//! operand role. A kernel exposes one generic routine over these traits; the
//! dispatchers pick a marker and the compiler checks each branch.
//!
//! | Marker            | Data roles | Math |
//! |-------------------|------------|------|
//! | [`Fp32`] / [`Fp32Grad`]            | `f32` | `f32` |
//! | [`Fp16Fp32Math`] / [`Fp16Fp32MathGrad`] | `f16` | `f32` |
//! | [`Fp16`] / [`Fp16Grad`]            | `f16` | `f16` |

use half::f16;

use crate::dtype::{Element, Precision};

/// Element types of a forward pass: `Y = X · W + B`, accumulated in `Math`.
pub trait ForwardTypes: 'static {
    /// Input activations.
    type X: Element;
    /// Weights.
    type W: Element;
    /// Bias.
    type B: Element;
    /// Output.
    type Y: Element;
    /// Accumulation type.
    type Math: Element;

    /// Per-role precisions of this instantiation.
    #[must_use]
    fn signature() -> ForwardSignature {
        ForwardSignature {
            x: <Self::X as Element>::PRECISION,
            w: <Self::W as Element>::PRECISION,
            b: <Self::B as Element>::PRECISION,
            y: <Self::Y as Element>::PRECISION,
            math: <Self::Math as Element>::PRECISION,
        }
    }
}

/// Element types of a backward pass.
pub trait BackwardTypes: 'static {
    /// Forward input activations.
    type X: Element;
    /// Weights.
    type W: Element;
    /// Upstream gradient.
    type DY: Element;
    /// Bias.
    type B: Element;
    /// Gradient w.r.t. the input.
    type DX: Element;
    /// Gradient w.r.t. the weights.
    type DW: Element;
    /// Gradient w.r.t. the bias.
    type DB: Element;
    /// Accumulation type.
    type Math: Element;

    /// Per-role precisions of this instantiation.
    #[must_use]
    fn signature() -> BackwardSignature {
        BackwardSignature {
            x: <Self::X as Element>::PRECISION,
            w: <Self::W as Element>::PRECISION,
            dy: <Self::DY as Element>::PRECISION,
            b: <Self::B as Element>::PRECISION,
            dx: <Self::DX as Element>::PRECISION,
            dw: <Self::DW as Element>::PRECISION,
            db: <Self::DB as Element>::PRECISION,
            math: <Self::Math as Element>::PRECISION,
        }
    }
}

macro_rules! forward_types {
    ($(#[$doc:meta])* $name:ident: data = $data:ty, math = $math:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl ForwardTypes for $name {
            type X = $data;
            type W = $data;
            type B = $data;
            type Y = $data;
            type Math = $math;
        }
    };
}

macro_rules! backward_types {
    ($(#[$doc:meta])* $name:ident: data = $data:ty, math = $math:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl BackwardTypes for $name {
            type X = $data;
            type W = $data;
            type DY = $data;
            type B = $data;
            type DX = $data;
            type DW = $data;
            type DB = $data;
            type Math = $math;
        }
    };
}

forward_types!(
    /// Full-precision forward pass.
    Fp32: data = f32, math = f32
);
forward_types!(
    /// Half-precision storage, full-precision accumulation.
    Fp16Fp32Math: data = f16, math = f32
);
forward_types!(
    /// Half-precision storage and accumulation.
    Fp16: data = f16, math = f16
);

backward_types!(
    /// Full-precision gradient pass.
    Fp32Grad: data = f32, math = f32
);
backward_types!(
    /// Half-precision gradients, full-precision accumulation.
    Fp16Fp32MathGrad: data = f16, math = f32
);
backward_types!(
    /// Half-precision gradients and accumulation.
    Fp16Grad: data = f16, math = f16
);

/// Precision of each forward role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForwardSignature {
    /// Input activations.
    pub x: Precision,
    /// Weights.
    pub w: Precision,
    /// Bias.
    pub b: Precision,
    /// Output.
    pub y: Precision,
    /// Accumulation.
    pub math: Precision,
}

impl ForwardSignature {
    /// Precisions of the data roles, in `X, W, B, Y` order.
    #[must_use]
    pub const fn data(&self) -> [Precision; 4] {
        [self.x, self.w, self.b, self.y]
    }

    /// Whether `math` is at least as wide as the narrowest data role.
    #[must_use]
    pub fn accumulates_safely(&self) -> bool {
        self.data().iter().any(|p| self.math >= *p)
    }
}

/// Precision of each backward role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackwardSignature {
    /// Forward input activations.
    pub x: Precision,
    /// Weights.
    pub w: Precision,
    /// Upstream gradient.
    pub dy: Precision,
    /// Bias.
    pub b: Precision,
    /// Input gradient.
    pub dx: Precision,
    /// Weight gradient.
    pub dw: Precision,
    /// Bias gradient.
    pub db: Precision,
    /// Accumulation.
    pub math: Precision,
}

impl BackwardSignature {
    /// Precisions of the data roles, in `X, W, dY, B, dX, dW, dB` order.
    #[must_use]
    pub const fn data(&self) -> [Precision; 7] {
        [self.x, self.w, self.dy, self.b, self.dx, self.dw, self.db]
    }

    /// Whether `math` is at least as wide as the narrowest data role.
    #[must_use]
    pub fn accumulates_safely(&self) -> bool {
        self.data().iter().any(|p| self.math >= *p)
    }
}
