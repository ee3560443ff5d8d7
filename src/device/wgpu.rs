//! Capability provider backed by `wgpu` adapters.
//!
//! WebGPU does not expose a hardware revision, only feature bits. An adapter
//! with [`wgpu::Features::SHADER_F16`] is reported at
//! [`MIN_HALF_PRECISION_HW_REVISION`]; any other adapter one revision below it.
//!
//! Adapters are enumerated once per process (via `lazy_static`) and indexed in
//! enumeration order. If enumeration finds nothing, the default adapter is
//! requested instead (resolved synchronously with `pollster`).

use super::{CapabilityProvider, DeviceCapability, MIN_HALF_PRECISION_HW_REVISION};
use crate::error::DispatchError;

/// What was learned about one adapter.
#[derive(Debug, Clone)]
pub struct AdapterCapability {
    /// Adapter name as reported by the driver.
    pub name: String,
    /// Graphics API backing the adapter.
    pub backend: wgpu::Backend,
    /// Whether `SHADER_F16` is available.
    pub shader_f16: bool,
}

impl AdapterCapability {
    fn probe(adapter: &wgpu::Adapter) -> Self {
        let info = adapter.get_info();
        Self {
            name: info.name,
            backend: info.backend,
            shader_f16: adapter.features().contains(wgpu::Features::SHADER_F16),
        }
    }

    /// The synthetic revision reported for this adapter.
    #[must_use]
    pub const fn capability(&self) -> DeviceCapability {
        if self.shader_f16 {
            DeviceCapability::new(MIN_HALF_PRECISION_HW_REVISION, 0)
        } else {
            DeviceCapability::new(MIN_HALF_PRECISION_HW_REVISION - 1, 0)
        }
    }
}

fn probe_adapters() -> Vec<AdapterCapability> {
    let instance = wgpu::Instance::default();
    let adapters: Vec<AdapterCapability> = instance
        .enumerate_adapters(wgpu::Backends::all())
        .iter()
        .map(AdapterCapability::probe)
        .collect();
    if !adapters.is_empty() {
        return adapters;
    }

    match pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default())) {
        Ok(adapter) => vec![AdapterCapability::probe(&adapter)],
        Err(_) => Vec::new(),
    }
}

lazy_static::lazy_static! {
    static ref ADAPTERS: Vec<AdapterCapability> = probe_adapters();
}

/// Reports capabilities of the adapters visible to `wgpu`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WgpuCapabilities;

impl WgpuCapabilities {
    /// All adapters found by the one-time probe.
    #[must_use]
    pub fn adapters(&self) -> &'static [AdapterCapability] {
        &ADAPTERS
    }
}

impl CapabilityProvider for WgpuCapabilities {
    fn query(&self, device_index: usize) -> Result<DeviceCapability, DispatchError> {
        self.adapters()
            .get(device_index)
            .map(AdapterCapability::capability)
            .ok_or(DispatchError::DeviceUnavailable {
                index: device_index,
            })
    }
}
