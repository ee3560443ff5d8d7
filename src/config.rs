//! Operator configuration.
//!
//! An [`FcConfig`] is fixed when the graph is built and read (never written)
//! by the dispatchers on every run. Hosts either build one directly or parse
//! it from the string arguments attached to an operator definition:
//!
//! | Argument          | Values                         | Default   |
//! |-------------------|--------------------------------|-----------|
//! | `float16_compute` | `0`, `1`, `true`, `false`      | `false`   |
//! | `engine`          | `""`, `DEFAULT`, `TENSORCORE`  | `DEFAULT` |
//! | `device_id`       | device ordinal                 | `0`       |
//!
//! Other keys are ignored so the same argument list can feed several layers.
//!
//! # Example
//!
//! ```rust
//! use fc_dispatch::config::FcConfig;
//! use fc_dispatch::ops::binding::Engine;
//!
//! let config = FcConfig::from_args([("float16_compute", "1"), ("engine", "TENSORCORE")])?;
//! assert!(config.reduced_precision);
//! assert_eq!(config.engine, Engine::HighThroughput);
//! # Ok::<(), fc_dispatch::DispatchError>(())
//! ```

use briny::prelude::*;

use crate::error::DispatchError;
use crate::ops::binding::Engine;

/// Upper bound (exclusive) on device ordinals a config may name.
pub const MAX_DEVICES: usize = 16;

/// Configuration of one fully connected operator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FcConfig {
    /// Request half-precision accumulation when inputs are half precision.
    pub reduced_precision: bool,
    /// Engine the operator is registered under.
    pub engine: Engine,
    /// Device the operator runs on.
    pub device_index: usize,
}

impl Validate for FcConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.device_index >= MAX_DEVICES {
            return Err(ValidationError);
        }
        Ok(())
    }
}

impl FcConfig {
    /// Default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reduced_precision: false,
            engine: Engine::Default,
            device_index: 0,
        }
    }

    /// Sets the precision flag.
    #[must_use]
    pub const fn with_reduced_precision(mut self, reduced_precision: bool) -> Self {
        self.reduced_precision = reduced_precision;
        self
    }

    /// Sets the engine.
    #[must_use]
    pub const fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    /// Sets the device ordinal.
    #[must_use]
    pub const fn with_device(mut self, device_index: usize) -> Self {
        self.device_index = device_index;
        self
    }

    /// Checks the configuration and returns it unchanged if valid.
    ///
    /// # Errors
    ///
    /// [`DispatchError::InvalidConfig`] if the device ordinal is out of range.
    pub fn validated(self) -> Result<Self, DispatchError> {
        let trusted = TrustedData::new(self).map_err(|_| DispatchError::InvalidConfig)?;
        Ok(trusted.into_inner())
    }

    /// Parses a configuration from operator arguments.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::InvalidArgument`] if a recognized key has a malformed value
    /// - [`DispatchError::InvalidConfig`] if the result fails validation
    pub fn from_args<'a, I>(args: I) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::new();
        for (key, value) in args {
            match key {
                "float16_compute" => {
                    config.reduced_precision = parse_flag(value).ok_or_else(|| invalid(key))?;
                }
                "engine" => {
                    config.engine = Engine::from_name(value).ok_or_else(|| invalid(key))?;
                }
                "device_id" => {
                    config.device_index = value.trim().parse().map_err(|_| invalid(key))?;
                }
                _ => {}
            }
        }
        config.validated()
    }
}

fn invalid(key: &str) -> DispatchError {
    DispatchError::InvalidArgument {
        key: key.to_owned(),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "True" => Some(true),
        "0" | "false" | "False" => Some(false),
        _ => None,
    }
}
