//! # Fully Connected Dispatch Layer
//!
//! This module decides which typed instantiation of a fully connected kernel
//! runs for a given call, then runs it.
//!
//! ## Submodules
//!
//! - [`forward`] — forward dispatcher (`X, W, B → Y`)
//! - [`backward`] — gradient dispatcher (`X, W, dY → dX, dW, dB`)
//! - [`binding`] — static table mapping operator name × engine to a dispatcher
//! - [`operator`] — operator instances that own a config, a binding and a host kernel
//!
//! ## Decision Table
//!
//! | Input   | Reduced precision | Device ≥ rev. 6 | Data | Math |
//! |---------|-------------------|-----------------|------|------|
//! | float32 | any               | not queried     | full | full |
//! | float16 | no                | not queried     | half | full |
//! | float16 | yes               | yes             | half | half |
//! | float16 | yes               | no              | half | full (logged) |
//! | other   | any               | not queried     | `UnsupportedType` | |
//!
//! Forward and backward apply the same table; only the number of roles differs.
//! The `HighThroughput` engine always dispatches with reduced precision off.
//!
//! ## Notes
//!
//! - Dispatchers keep no state between calls; every call is resolved from scratch
//! - The device is queried only on the reduced-precision half path
//! - Kernel failures are returned as-is, never retried

pub mod backward;
pub mod binding;
pub mod forward;
pub mod operator;

/// Message logged at `INFO` when reduced precision was requested on a device
/// that cannot accelerate it.
pub const FALLBACK_MESSAGE: &str = "device does not support FP16 computation, falling back to FP32";
