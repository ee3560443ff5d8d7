//! # `fc_dispatch`
//!
//! Precision- and capability-aware dispatch for fully connected operators
//! running on an accelerator device.
//!
//! A fully connected operator computes `Y = X · Wᵀ + B` (or `X · W + B` with
//! untransposed weights) and its gradients. The math itself lives in a host
//! kernel; this crate decides *which* typed instantiation of that kernel runs:
//! the element type of every operand and the accumulation type, chosen from
//! the runtime type of the input, the operator's precision policy, the engine
//! it was registered under and whether the device can do fast FP16 math.
//!
//! ## Modules
//!
//! - [`dtype`] — runtime element tags and the [`dtype::Element`] trait
//! - [`types`] — the closed set of forward/backward type instantiations
//! - [`device`] — device capability descriptors and providers
//! - [`config`] — operator configuration and argument parsing
//! - [`ops`] — the forward/backward dispatchers, the binding table and operator instances
//! - [`error`] — the crate error type
//!
//! ## Example
//!
//! ```rust
//! use fc_dispatch::device::FixedCapability;
//! use fc_dispatch::dtype::ElementType;
//! use fc_dispatch::error::DispatchError;
//! use fc_dispatch::ops::forward::{select_forward, ForwardInstantiation};
//!
//! let pascal = FixedCapability::new(6, 0);
//! let inst = select_forward(ElementType::Float16, true, &pascal, 0)?;
//! assert_eq!(inst, ForwardInstantiation::Half);
//! # Ok::<(), DispatchError>(())
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]
#![deny(unsafe_code)]
#![forbid(missing_docs)]

pub mod config;
pub mod device;
pub mod dtype;
pub mod error;
pub mod ops;
pub mod types;

pub use config::FcConfig;
pub use device::{CapabilityProvider, DeviceCapability, MIN_HALF_PRECISION_HW_REVISION};
pub use dtype::{Element, ElementType, Precision};
pub use error::DispatchError;
