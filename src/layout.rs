//! Address arithmetic for the PLIC register map.

use memory_addr::VirtAddr;

use crate::Vector;
use crate::consts::{
    BITS_PER_WORD, CONTEXT_CLAIM_OFFSET, CONTEXT_ENABLE_STRIDE, CONTEXT_PER_HART,
    CONTEXT_STRIDE, PLIC_ENABLE_BEGIN, PLIC_PENDING_BEGIN, PLIC_PRIO_BEGIN,
    PLIC_THRESHOLD_CLAIM_BEGIN,
};

/// Maps a hart id to the PLIC context that delivers its interrupts.
pub type ContextMap = fn(usize) -> usize;

/// M-mode context of `hart` on a two-contexts-per-hart wiring (QEMU `virt`).
pub const fn machine_context(hart: usize) -> usize {
    hart * CONTEXT_PER_HART
}

/// S-mode context of `hart` on a two-contexts-per-hart wiring (QEMU `virt`).
pub const fn supervisor_context(hart: usize) -> usize {
    hart * CONTEXT_PER_HART + 1
}

/// Register addresses of one PLIC instance.
///
/// Every method is pure arithmetic. The base, the strides and the context map
/// are fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct RegisterLayout {
    base: VirtAddr,
    enable_stride: usize,
    context_stride: usize,
    context_of: ContextMap,
}

impl RegisterLayout {
    pub const fn new(base: VirtAddr, context_of: ContextMap) -> Self {
        Self {
            base,
            enable_stride: CONTEXT_ENABLE_STRIDE,
            context_stride: CONTEXT_STRIDE,
            context_of,
        }
    }

    /// Overrides the per-context strides of the enable and threshold/claim
    /// blocks, for chips that do not follow the PLIC 1.0 spacing.
    pub const fn with_strides(mut self, enable_stride: usize, context_stride: usize) -> Self {
        self.enable_stride = enable_stride;
        self.context_stride = context_stride;
        self
    }

    pub const fn base(&self) -> VirtAddr {
        self.base
    }

    pub fn context(&self, hart: usize) -> usize {
        (self.context_of)(hart)
    }

    pub fn priority(&self, vector: Vector) -> VirtAddr {
        self.at(PLIC_PRIO_BEGIN + 4 * vector.as_usize())
    }

    pub fn pending(&self, vector: Vector) -> VirtAddr {
        self.at(PLIC_PENDING_BEGIN + 4 * (vector.as_usize() / BITS_PER_WORD))
    }

    pub fn enable(&self, vector: Vector, hart: usize) -> VirtAddr {
        self.at(
            PLIC_ENABLE_BEGIN
                + self.enable_stride * self.context(hart)
                + 4 * (vector.as_usize() / BITS_PER_WORD),
        )
    }

    pub fn threshold(&self, hart: usize) -> VirtAddr {
        self.at(PLIC_THRESHOLD_CLAIM_BEGIN + self.context_stride * self.context(hart))
    }

    /// Reading claims, writing completes.
    pub fn claim_complete(&self, hart: usize) -> VirtAddr {
        self.at(
            PLIC_THRESHOLD_CLAIM_BEGIN
                + self.context_stride * self.context(hart)
                + CONTEXT_CLAIM_OFFSET,
        )
    }

    fn at(&self, offset: usize) -> VirtAddr {
        VirtAddr::from_usize(self.base.as_usize() + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: usize = 0x0c00_0000;

    fn layout() -> RegisterLayout {
        RegisterLayout::new(VirtAddr::from_usize(BASE), supervisor_context)
    }

    #[test]
    fn priority_and_pending_follow_vector() {
        let l = layout();
        assert_eq!(l.priority(Vector::new(10)).as_usize(), BASE + 40);
        assert_eq!(l.pending(Vector::new(31)).as_usize(), BASE + 0x1000);
        assert_eq!(l.pending(Vector::new(32)).as_usize(), BASE + 0x1004);
    }

    #[test]
    fn enable_bank_is_per_context() {
        let l = layout();
        // hart 1 -> S-mode context 3
        assert_eq!(
            l.enable(Vector::new(33), 1).as_usize(),
            BASE + 0x2000 + 3 * 0x80 + 4
        );
        assert_eq!(l.enable(Vector::new(5), 0).as_usize(), BASE + 0x2080);
    }

    #[test]
    fn threshold_and_claim_share_context_block() {
        let l = RegisterLayout::new(VirtAddr::from_usize(BASE), machine_context);
        assert_eq!(l.threshold(2).as_usize(), BASE + 0x20_0000 + 4 * 0x1000);
        assert_eq!(l.claim_complete(2).as_usize(), BASE + 0x20_0000 + 4 * 0x1000 + 4);
    }

    #[test]
    fn custom_strides() {
        let l = layout().with_strides(0x100, 0x2000);
        assert_eq!(l.enable(Vector::new(1), 0).as_usize(), BASE + 0x2000 + 0x100);
        assert_eq!(l.threshold(0).as_usize(), BASE + 0x20_0000 + 0x2000);
    }
}
