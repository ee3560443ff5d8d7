//! Device capability descriptors and providers.
//!
//! The dispatchers only need one fact about a device: whether it can run
//! half-precision math fast. That fact is derived from the device's major
//! hardware revision, compared against [`MIN_HALF_PRECISION_HW_REVISION`].
//!
//! Capabilities are obtained through a [`CapabilityProvider`] passed in by the
//! caller, never from process-wide state, so dispatch can be tested against a
//! fixed answer and hosts are free to cache (or not) however they like.
//!
//! # Providers
//!
//! - [`FixedCapability`] — the same answer for every device index
//! - [`DeviceTable`] — one answer per device index
//! - [`wgpu::WgpuCapabilities`] *(feature `wgpu`)* — probes real adapters

#[cfg(feature = "wgpu")]
pub mod wgpu;

use crate::error::DispatchError;

/// Lowest major hardware revision with fast half-precision arithmetic.
pub const MIN_HALF_PRECISION_HW_REVISION: u32 = 6;

/// Hardware revision of one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceCapability {
    /// Major revision; the only part that matters for dispatch.
    pub major_revision: u32,
    /// Minor revision.
    pub minor_revision: u32,
}

impl DeviceCapability {
    /// Creates a descriptor from a `major.minor` revision.
    #[must_use]
    pub const fn new(major_revision: u32, minor_revision: u32) -> Self {
        Self {
            major_revision,
            minor_revision,
        }
    }

    /// Whether the device accelerates half-precision arithmetic.
    #[must_use]
    pub const fn supports_half_compute(&self) -> bool {
        self.major_revision >= MIN_HALF_PRECISION_HW_REVISION
    }
}

/// Source of device capability descriptors.
///
/// A query is synchronous and cheap but not free; callers should not assume
/// two answers for the same index are equal unless the provider says so.
pub trait CapabilityProvider {
    /// Describes the device at `device_index`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::DeviceUnavailable`] if no such device exists.
    fn query(&self, device_index: usize) -> Result<DeviceCapability, DispatchError>;
}

impl<P: CapabilityProvider + ?Sized> CapabilityProvider for &P {
    fn query(&self, device_index: usize) -> Result<DeviceCapability, DispatchError> {
        (**self).query(device_index)
    }
}

/// Reports the same capability for every device index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedCapability(pub DeviceCapability);

impl FixedCapability {
    /// Shorthand for `FixedCapability(DeviceCapability::new(major, minor))`.
    #[must_use]
    pub const fn new(major_revision: u32, minor_revision: u32) -> Self {
        Self(DeviceCapability::new(major_revision, minor_revision))
    }
}

impl CapabilityProvider for FixedCapability {
    fn query(&self, _device_index: usize) -> Result<DeviceCapability, DispatchError> {
        Ok(self.0)
    }
}

/// Per-device capabilities indexed by device ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceTable {
    devices: Vec<DeviceCapability>,
}

impl DeviceTable {
    /// Creates a table where device `i` is `devices[i]`.
    #[must_use]
    pub fn new(devices: impl Into<Vec<DeviceCapability>>) -> Self {
        Self {
            devices: devices.into(),
        }
    }

    /// Number of known devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the table knows no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl CapabilityProvider for DeviceTable {
    fn query(&self, device_index: usize) -> Result<DeviceCapability, DispatchError> {
        self.devices
            .get(device_index)
            .copied()
            .ok_or(DispatchError::DeviceUnavailable {
                index: device_index,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert!(!DeviceCapability::new(5, 9).supports_half_compute());
        assert!(DeviceCapability::new(6, 0).supports_half_compute());
        assert!(DeviceCapability::new(8, 6).supports_half_compute());
    }

    #[test]
    fn table_rejects_missing_devices() {
        let table = DeviceTable::new([DeviceCapability::new(5, 2), DeviceCapability::new(7, 0)]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.query(1), Ok(DeviceCapability::new(7, 0)));
        assert_eq!(
            table.query(2),
            Err(DispatchError::DeviceUnavailable { index: 2 })
        );
    }

    #[test]
    fn fixed_ignores_index() {
        let fixed = FixedCapability::new(6, 1);
        assert_eq!(fixed.query(0), fixed.query(15));
    }
}
