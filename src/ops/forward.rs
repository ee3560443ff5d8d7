//! Forward dispatcher.
//!
//! Given the runtime element type of input 0 and the operator's precision
//! flag, picks one [`ForwardInstantiation`] and runs the operator's typed
//! routine with the matching marker type.
//!
//! # Example
//!
//! ```rust
//! use fc_dispatch::device::FixedCapability;
//! use fc_dispatch::dtype::ElementType;
//! use fc_dispatch::error::DispatchError;
//! use fc_dispatch::ops::forward::{dispatch_forward, FcForward};
//! use fc_dispatch::types::ForwardTypes;
//! use fc_dispatch::Precision;
//!
//! struct Probe(Option<Precision>);
//!
//! impl FcForward for Probe {
//!     type Error = DispatchError;
//!
//!     fn input_type(&self) -> ElementType {
//!         ElementType::Float16
//!     }
//!
//!     fn run_with_types<T: ForwardTypes>(&mut self) -> Result<bool, Self::Error> {
//!         self.0 = Some(T::signature().math);
//!         Ok(true)
//!     }
//! }
//!
//! let mut op = Probe(None);
//! dispatch_forward(true, &mut op, &FixedCapability::new(5, 0))?;
//! assert_eq!(op.0, Some(Precision::Full));
//! # Ok::<(), DispatchError>(())
//! ```

use tracing::info;

use super::FALLBACK_MESSAGE;
use crate::device::CapabilityProvider;
use crate::dtype::ElementType;
use crate::error::DispatchError;
use crate::types::{ForwardSignature, ForwardTypes, Fp16, Fp16Fp32Math, Fp32};

/// The forward type tuples a dispatch can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForwardInstantiation {
    /// Everything in `f32`. See [`Fp32`].
    Full,
    /// `f16` operands accumulated in `f32`. See [`Fp16Fp32Math`].
    HalfFullMath,
    /// Everything in `f16`. See [`Fp16`].
    Half,
}

impl ForwardInstantiation {
    /// Per-role precisions of this instantiation.
    #[must_use]
    pub fn signature(self) -> ForwardSignature {
        match self {
            Self::Full => Fp32::signature(),
            Self::HalfFullMath => Fp16Fp32Math::signature(),
            Self::Half => Fp16::signature(),
        }
    }
}

/// The dispatcher's view of a forward operator.
pub trait FcForward {
    /// Error type of the typed routine. Dispatch failures convert into it.
    type Error: From<DispatchError>;

    /// Element type of input 0 (`X`).
    fn input_type(&self) -> ElementType;

    /// Device the operator runs on.
    fn device_index(&self) -> usize {
        0
    }

    /// Runs the forward pass with the element types of `T`.
    ///
    /// # Errors
    ///
    /// Whatever the host kernel reports; the dispatcher passes it through.
    fn run_with_types<T: ForwardTypes>(&mut self) -> Result<bool, Self::Error>;
}

/// Chooses the forward instantiation for one call.
///
/// The device is only queried when `input` is half precision and
/// `reduced_precision` is set. When that device cannot accelerate half
/// precision, a single `INFO` event is emitted and accumulation is promoted to
/// full precision.
///
/// # Errors
///
/// - [`DispatchError::UnsupportedType`] if `input` is neither `float32` nor `float16`
/// - whatever the provider returns for `device_index`
pub fn select_forward<P: CapabilityProvider + ?Sized>(
    input: ElementType,
    reduced_precision: bool,
    caps: &P,
    device_index: usize,
) -> Result<ForwardInstantiation, DispatchError> {
    match input {
        ElementType::Float32 => Ok(ForwardInstantiation::Full),
        ElementType::Float16 if !reduced_precision => Ok(ForwardInstantiation::HalfFullMath),
        ElementType::Float16 => {
            let capability = caps.query(device_index)?;
            if capability.supports_half_compute() {
                Ok(ForwardInstantiation::Half)
            } else {
                info!(
                    device = device_index,
                    revision = capability.major_revision,
                    "{FALLBACK_MESSAGE}"
                );
                Ok(ForwardInstantiation::HalfFullMath)
            }
        }
        found => Err(DispatchError::UnsupportedType { found }),
    }
}

/// Selects an instantiation for `op` and runs it.
///
/// Returns the typed routine's result unchanged.
///
/// # Errors
///
/// Selection failures (see [`select_forward`]) converted into `Op::Error`, in
/// which case `op` is not run; otherwise the typed routine's own error.
pub fn dispatch_forward<Op, P>(
    reduced_precision: bool,
    op: &mut Op,
    caps: &P,
) -> Result<bool, Op::Error>
where
    Op: FcForward,
    P: CapabilityProvider + ?Sized,
{
    match select_forward(op.input_type(), reduced_precision, caps, op.device_index())? {
        ForwardInstantiation::Full => op.run_with_types::<Fp32>(),
        ForwardInstantiation::HalfFullMath => op.run_with_types::<Fp16Fp32Math>(),
        ForwardInstantiation::Half => op.run_with_types::<Fp16>(),
    }
}
