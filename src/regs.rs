//! Collaborators consumed by the driver: 32-bit register access and the
//! platform hooks (current hart, statistics, tracing).

use memory_addr::VirtAddr;

use crate::Vector;

/// Word-sized access to the PLIC register file.
///
/// Register accesses cannot fail. Reads of the claim/complete register have
/// side effects, so implementations must not cache or elide them.
pub trait RegisterAccess {
    fn read_word(&self, addr: VirtAddr) -> u32;
    fn write_word(&self, addr: VirtAddr, val: u32);
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &T {
    fn read_word(&self, addr: VirtAddr) -> u32 {
        (**self).read_word(addr)
    }

    fn write_word(&self, addr: VirtAddr, val: u32) {
        (**self).write_word(addr, val)
    }
}

/// Volatile access to a memory-mapped PLIC.
#[derive(Debug)]
pub struct Mmio {
    _priv: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Every address produced by the [`RegisterLayout`](crate::RegisterLayout)
    /// this is paired with must be mapped, device memory of a PLIC.
    pub const unsafe fn new() -> Self {
        Self { _priv: () }
    }
}

impl RegisterAccess for Mmio {
    fn read_word(&self, addr: VirtAddr) -> u32 {
        // SAFETY: guaranteed by the contract of `Mmio::new`.
        unsafe { core::ptr::read_volatile(addr.as_usize() as *const u32) }
    }

    fn write_word(&self, addr: VirtAddr, val: u32) {
        // SAFETY: guaranteed by the contract of `Mmio::new`.
        unsafe { core::ptr::write_volatile(addr.as_usize() as *mut u32, val) }
    }
}

/// Kernel services the dispatcher relies on.
///
/// Only [`current_hart`](IrqPlatform::current_hart) is required; the
/// statistics and trace hooks default to no-ops.
pub trait IrqPlatform {
    fn current_hart(&self) -> usize;

    /// Bumps the kernel's interrupt counter.
    fn irq_observed(&self) {}

    fn irq_enter(&self, _vector: Vector) {}

    fn irq_exit(&self, _vector: Vector) {}
}

impl<T: IrqPlatform + ?Sized> IrqPlatform for &T {
    fn current_hart(&self) -> usize {
        (**self).current_hart()
    }

    fn irq_observed(&self) {
        (**self).irq_observed()
    }

    fn irq_enter(&self, vector: Vector) {
        (**self).irq_enter(vector)
    }

    fn irq_exit(&self, vector: Vector) {
        (**self).irq_exit(vector)
    }
}

/// Single-hart platform, or a hart whose id is known statically.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedHart(pub usize);

impl IrqPlatform for FixedHart {
    fn current_hart(&self) -> usize {
        self.0
    }
}

/// Reads the hart id from `mhartid`. Only usable from M-mode.
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct MHartId;

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
impl IrqPlatform for MHartId {
    fn current_hart(&self) -> usize {
        riscv::register::mhartid::read()
    }
}
