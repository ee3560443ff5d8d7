//! Backward (gradient) dispatcher.
//!
//! Same decision tree as [`super::forward`], applied across the eight roles of
//! a gradient pass: `X, W, dY, B` in, `dX, dW, dB` out, plus `Math`.

use tracing::info;

use super::FALLBACK_MESSAGE;
use crate::device::CapabilityProvider;
use crate::dtype::ElementType;
use crate::error::DispatchError;
use crate::types::{BackwardSignature, BackwardTypes, Fp16Fp32MathGrad, Fp16Grad, Fp32Grad};

/// The backward type tuples a dispatch can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackwardInstantiation {
    /// Everything in `f32`. See [`Fp32Grad`].
    Full,
    /// `f16` operands and gradients accumulated in `f32`. See [`Fp16Fp32MathGrad`].
    HalfFullMath,
    /// Everything in `f16`. See [`Fp16Grad`].
    Half,
}

impl BackwardInstantiation {
    /// Per-role precisions of this instantiation.
    #[must_use]
    pub fn signature(self) -> BackwardSignature {
        match self {
            Self::Full => Fp32Grad::signature(),
            Self::HalfFullMath => Fp16Fp32MathGrad::signature(),
            Self::Half => Fp16Grad::signature(),
        }
    }
}

/// The dispatcher's view of a gradient operator.
pub trait FcBackward {
    /// Error type of the typed routine. Dispatch failures convert into it.
    type Error: From<DispatchError>;

    /// Element type of input 0 (`X`).
    fn input_type(&self) -> ElementType;

    /// Device the operator runs on.
    fn device_index(&self) -> usize {
        0
    }

    /// Runs the gradient pass with the element types of `T`.
    ///
    /// # Errors
    ///
    /// Whatever the host kernel reports; the dispatcher passes it through.
    fn run_with_types<T: BackwardTypes>(&mut self) -> Result<bool, Self::Error>;
}

/// Chooses the backward instantiation for one call.
///
/// # Errors
///
/// - [`DispatchError::UnsupportedType`] if `input` is neither `float32` nor `float16`
/// - whatever the provider returns for `device_index`
pub fn select_backward<P: CapabilityProvider + ?Sized>(
    input: ElementType,
    reduced_precision: bool,
    caps: &P,
    device_index: usize,
) -> Result<BackwardInstantiation, DispatchError> {
    match input {
        ElementType::Float32 => Ok(BackwardInstantiation::Full),
        ElementType::Float16 if !reduced_precision => Ok(BackwardInstantiation::HalfFullMath),
        ElementType::Float16 => {
            let capability = caps.query(device_index)?;
            if capability.supports_half_compute() {
                Ok(BackwardInstantiation::Half)
            } else {
                info!(
                    device = device_index,
                    revision = capability.major_revision,
                    "{FALLBACK_MESSAGE}"
                );
                Ok(BackwardInstantiation::HalfFullMath)
            }
        }
        found => Err(DispatchError::UnsupportedType { found }),
    }
}

/// Selects an instantiation for `op` and runs it.
///
/// # Errors
///
/// Selection failures converted into `Op::Error` (and `op` is not run), or
/// the typed routine's own error.
pub fn dispatch_backward<Op, P>(
    reduced_precision: bool,
    op: &mut Op,
    caps: &P,
) -> Result<bool, Op::Error>
where
    Op: FcBackward,
    P: CapabilityProvider + ?Sized,
{
    match select_backward(op.input_type(), reduced_precision, caps, op.device_index())? {
        BackwardInstantiation::Full => op.run_with_types::<Fp32Grad>(),
        BackwardInstantiation::HalfFullMath => op.run_with_types::<Fp16Fp32MathGrad>(),
        BackwardInstantiation::Half => op.run_with_types::<Fp16Grad>(),
    }
}
