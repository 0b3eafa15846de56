//! A PLIC modelled as a register file, for exercising the driver without
//! hardware.
//!
//! Claim semantics follow PLIC 1.0: the claim register returns the enabled,
//! pending source with the highest priority above the context threshold
//! (lowest id wins ties), clears its pending bit and keeps it in service until
//! its id is written back to the same register.

use log::trace;
use memory_addr::VirtAddr;
use spin::Mutex;

use crate::consts::*;
use crate::regs::RegisterAccess;

pub const MAX_HARTS: usize = 8;
pub const MAX_CONTEXTS: usize = MAX_HARTS * CONTEXT_PER_HART;
pub const SIM_MAX_IRQ: usize = 511;

const WORDS: usize = (SIM_MAX_IRQ + BITS_PER_WORD) / BITS_PER_WORD;

pub struct SimPlic {
    base: usize,
    inner: Mutex<SimPlicInner>,
}

struct SimPlicInner {
    prio: [u32; SIM_MAX_IRQ + 1],
    pending: [u32; WORDS],
    in_service: [u32; WORDS],
    enable: [[u32; WORDS]; MAX_CONTEXTS],
    threshold: [u32; MAX_CONTEXTS],
    claimed: [u32; MAX_CONTEXTS],
    claim_reads: [usize; MAX_CONTEXTS],
    completions: [usize; MAX_CONTEXTS],
    last_completed: [Option<u32>; MAX_CONTEXTS],
}

fn index_and_bit(irq: usize) -> (usize, u32) {
    (irq / BITS_PER_WORD, (irq % BITS_PER_WORD) as u32)
}

fn test_bit(words: &[u32], irq: usize) -> bool {
    let (index, bit) = index_and_bit(irq);
    words.get(index).is_some_and(|w| w & (1 << bit) != 0)
}

fn assign_bit(words: &mut [u32], irq: usize, set: bool) {
    let (index, bit) = index_and_bit(irq);
    if let Some(w) = words.get_mut(index) {
        if set {
            *w |= 1 << bit;
        } else {
            *w &= !(1 << bit);
        }
    }
}

impl SimPlicInner {
    fn claim(&mut self, ctx: usize) -> u32 {
        if ctx >= MAX_CONTEXTS {
            return 0;
        }
        self.claim_reads[ctx] += 1;
        let threshold = self.threshold[ctx];
        let mut best_irq = 0;
        let mut best_prio = 0;

        for irq in 1..=SIM_MAX_IRQ {
            let prio = self.prio[irq];
            if prio > threshold
                && prio > best_prio
                && test_bit(&self.pending, irq)
                && !test_bit(&self.in_service, irq)
                && test_bit(&self.enable[ctx], irq)
            {
                best_irq = irq;
                best_prio = prio;
            }
        }

        if best_irq != 0 {
            assign_bit(&mut self.pending, best_irq, false);
            assign_bit(&mut self.in_service, best_irq, true);
            self.claimed[ctx] = best_irq as u32;
        }
        best_irq as u32
    }

    fn complete(&mut self, ctx: usize, irq: u32) {
        if ctx >= MAX_CONTEXTS {
            return;
        }
        self.completions[ctx] += 1;
        self.last_completed[ctx] = Some(irq);
        // A completion for a source not enabled on this context is ignored.
        if test_bit(&self.enable[ctx], irq as usize) {
            assign_bit(&mut self.in_service, irq as usize, false);
        }
        if self.claimed[ctx] == irq {
            self.claimed[ctx] = 0;
        }
    }
}

impl SimPlic {
    pub fn new(base: usize) -> Self {
        Self {
            base,
            inner: Mutex::new(SimPlicInner {
                prio: [0; SIM_MAX_IRQ + 1],
                pending: [0; WORDS],
                in_service: [0; WORDS],
                enable: [[0; WORDS]; MAX_CONTEXTS],
                threshold: [0; MAX_CONTEXTS],
                claimed: [0; MAX_CONTEXTS],
                claim_reads: [0; MAX_CONTEXTS],
                completions: [0; MAX_CONTEXTS],
                last_completed: [None; MAX_CONTEXTS],
            }),
        }
    }

    pub fn base(&self) -> VirtAddr {
        VirtAddr::from_usize(self.base)
    }

    /// Asserts the interrupt line of source `irq`.
    pub fn raise(&self, irq: usize) {
        assign_bit(&mut self.inner.lock().pending, irq, true);
    }

    pub fn is_pending(&self, irq: usize) -> bool {
        test_bit(&self.inner.lock().pending, irq)
    }

    pub fn is_in_service(&self, irq: usize) -> bool {
        test_bit(&self.inner.lock().in_service, irq)
    }

    pub fn set_prio(&self, irq: usize, prio: u32) {
        if let Some(p) = self.inner.lock().prio.get_mut(irq) {
            *p = prio;
        }
    }

    pub fn prio(&self, irq: usize) -> u32 {
        self.inner.lock().prio.get(irq).copied().unwrap_or(0)
    }

    pub fn is_enabled(&self, context: usize, irq: usize) -> bool {
        self.inner
            .lock()
            .enable
            .get(context)
            .is_some_and(|words| test_bit(words, irq))
    }

    pub fn enable_word(&self, context: usize, word: usize) -> u32 {
        let inner = self.inner.lock();
        inner
            .enable
            .get(context)
            .and_then(|words| words.get(word))
            .copied()
            .unwrap_or(0)
    }

    pub fn set_enable_word(&self, context: usize, word: usize, val: u32) {
        let mut inner = self.inner.lock();
        if let Some(w) = inner.enable.get_mut(context).and_then(|words| words.get_mut(word)) {
            *w = val;
        }
    }

    pub fn threshold(&self, context: usize) -> u32 {
        self.inner.lock().threshold.get(context).copied().unwrap_or(0)
    }

    pub fn set_threshold(&self, context: usize, threshold: u32) {
        if let Some(t) = self.inner.lock().threshold.get_mut(context) {
            *t = threshold;
        }
    }

    /// Number of times `context`'s claim register was read.
    pub fn claim_reads(&self, context: usize) -> usize {
        self.inner.lock().claim_reads.get(context).copied().unwrap_or(0)
    }

    /// Number of writes to `context`'s complete register.
    pub fn completions(&self, context: usize) -> usize {
        self.inner.lock().completions.get(context).copied().unwrap_or(0)
    }

    pub fn last_completed(&self, context: usize) -> Option<u32> {
        self.inner.lock().last_completed.get(context).copied().flatten()
    }

    fn offset(&self, addr: VirtAddr) -> usize {
        addr.as_usize().wrapping_sub(self.base)
    }
}

impl RegisterAccess for SimPlic {
    fn read_word(&self, addr: VirtAddr) -> u32 {
        let offset = self.offset(addr);
        let mut inner = self.inner.lock();
        let val = if (PLIC_PRIO_BEGIN..=PLIC_PRIO_END).contains(&offset) {
            let irq = (offset - PLIC_PRIO_BEGIN) / 4;
            inner.prio.get(irq).copied().unwrap_or(0)
        } else if (PLIC_PENDING_BEGIN..=PLIC_PENDING_END).contains(&offset) {
            let word = (offset - PLIC_PENDING_BEGIN) / 4;
            inner.pending.get(word).copied().unwrap_or(0)
        } else if (PLIC_ENABLE_BEGIN..=PLIC_ENABLE_END).contains(&offset) {
            let ctx = (offset - PLIC_ENABLE_BEGIN) / CONTEXT_ENABLE_STRIDE;
            let word = ((offset - PLIC_ENABLE_BEGIN) % CONTEXT_ENABLE_STRIDE) / 4;
            inner
                .enable
                .get(ctx)
                .and_then(|words| words.get(word))
                .copied()
                .unwrap_or(0)
        } else if (PLIC_THRESHOLD_CLAIM_BEGIN..=PLIC_THRESHOLD_CLAIM_END).contains(&offset) {
            let ctx = (offset - PLIC_THRESHOLD_CLAIM_BEGIN) / CONTEXT_STRIDE;
            let local = (offset - PLIC_THRESHOLD_CLAIM_BEGIN) % CONTEXT_STRIDE;
            match local {
                0 => inner.threshold.get(ctx).copied().unwrap_or(0),
                CONTEXT_CLAIM_OFFSET => inner.claim(ctx),
                _ => 0,
            }
        } else {
            0
        };
        trace!("sim plic: read {:#x} -> {:#x}", offset, val);
        val
    }

    fn write_word(&self, addr: VirtAddr, val: u32) {
        let offset = self.offset(addr);
        trace!("sim plic: write {:#x} <- {:#x}", offset, val);
        let mut inner = self.inner.lock();
        if (PLIC_PRIO_BEGIN..=PLIC_PRIO_END).contains(&offset) {
            let irq = (offset - PLIC_PRIO_BEGIN) / 4;
            if let Some(p) = inner.prio.get_mut(irq) {
                *p = val;
            }
        } else if (PLIC_ENABLE_BEGIN..=PLIC_ENABLE_END).contains(&offset) {
            let ctx = (offset - PLIC_ENABLE_BEGIN) / CONTEXT_ENABLE_STRIDE;
            let word = ((offset - PLIC_ENABLE_BEGIN) % CONTEXT_ENABLE_STRIDE) / 4;
            if let Some(w) = inner.enable.get_mut(ctx).and_then(|words| words.get_mut(word)) {
                *w = val;
            }
        } else if (PLIC_THRESHOLD_CLAIM_BEGIN..=PLIC_THRESHOLD_CLAIM_END).contains(&offset) {
            let ctx = (offset - PLIC_THRESHOLD_CLAIM_BEGIN) / CONTEXT_STRIDE;
            let local = (offset - PLIC_THRESHOLD_CLAIM_BEGIN) % CONTEXT_STRIDE;
            match local {
                0 => {
                    if let Some(t) = inner.threshold.get_mut(ctx) {
                        *t = val;
                    }
                }
                CONTEXT_CLAIM_OFFSET => inner.complete(ctx, val),
                _ => {}
            }
        }
        // pending bits are read-only
    }
}
