//! Error type shared by the dispatchers, the binding table and configuration.

use crate::dtype::ElementType;

/// Failures raised by this crate.
///
/// Execution failures reported by a host kernel are *not* represented here;
/// they travel in the operator's own error type untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The primary input has an element type no instantiation covers.
    #[error("unsupported input element type: {found}")]
    UnsupportedType {
        /// Tag reported by input 0.
        found: ElementType,
    },
    /// The capability provider knows no device with this index.
    #[error("no device with index {index}")]
    DeviceUnavailable {
        /// Requested device index.
        index: usize,
    },
    /// No binding exists for this operator name and engine.
    #[error("no fully connected operator `{name}` registered for engine `{engine}`")]
    UnknownOperator {
        /// Requested operator name.
        name: String,
        /// Requested engine name.
        engine: String,
    },
    /// A forward binding was invoked through the backward entry point, or vice versa.
    #[error("operator `{name}` was invoked in the wrong direction")]
    DirectionMismatch {
        /// Name of the binding.
        name: &'static str,
    },
    /// An operator argument could not be parsed.
    #[error("invalid value for operator argument `{key}`")]
    InvalidArgument {
        /// Argument key.
        key: String,
    },
    /// The configuration parsed but failed validation.
    #[error("invalid operator configuration")]
    InvalidConfig,
}
