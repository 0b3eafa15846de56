//! Interrupt-controller capabilities this PLIC variant does not wire up.
//!
//! Generic callers probe these and fall back to legacy wired interrupts on
//! [`AxError::Unsupported`].

use axerrno::{AxError, AxResult};
use log::warn;

use crate::handler::HandlerEntry;
use crate::Vector;

/// Doorbell address and payload a device writes to raise an MSI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MsiTarget {
    pub address: u64,
    pub data: u16,
}

/// PCI legacy interrupts are wired straight to PLIC sources.
pub const fn pci_interrupt_to_vector(pci_int: u32) -> Vector {
    Vector::new(pci_int)
}

pub fn allocate_interrupts(count: usize, align_log2: u32, use_msi: bool) -> AxResult<Vector> {
    warn!(
        "plic: cannot allocate {} interrupts (align 2^{}, msi = {})",
        count, align_log2, use_msi
    );
    Err(AxError::Unsupported)
}

pub fn compute_msi_target(vector: Vector, cpu: usize, edge: bool) -> AxResult<MsiTarget> {
    warn!(
        "plic: no MSI target for {} on cpu {} (edge = {})",
        vector, cpu, edge
    );
    Err(AxError::Unsupported)
}

pub fn register_msi_handler(vector: Vector, _handler: HandlerEntry, edge: bool) -> AxResult {
    warn!("plic: MSI handler for {} rejected (edge = {})", vector, edge);
    Err(AxError::Unsupported)
}
