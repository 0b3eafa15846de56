use axerrno::{AxError, AxResult};
use log::{info, trace};

use crate::consts::{DEFAULT_PRIORITY, DEFAULT_THRESHOLD};
use crate::layout::RegisterLayout;
use crate::regs::RegisterAccess;
use crate::Vector;

/// Hardware view of the controller: enable banks, priorities, thresholds and
/// the claim/complete register, for a PLIC wired with `N` sources.
pub struct MaskController<R, const N: usize> {
    regs: R,
    layout: RegisterLayout,
}

impl<R, const N: usize> MaskController<R, N> {
    pub const fn new(regs: R, layout: RegisterLayout) -> Self {
        Self { regs, layout }
    }

    pub const fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    pub const fn regs(&self) -> &R {
        &self.regs
    }

    fn check(vector: Vector) -> AxResult<Vector> {
        if vector.is_valid_source(N) {
            Ok(vector)
        } else {
            Err(AxError::InvalidInput)
        }
    }
}

impl<R: RegisterAccess, const N: usize> MaskController<R, N> {
    /// Masks every source on `hart`, gives each the default priority and opens
    /// the hart's threshold. Only `hart`'s enable bank is touched.
    pub fn initialize_hart(&self, hart: usize) {
        for raw in 1..N as u32 {
            let vector = Vector::new(raw);
            self.update_enable(hart, vector, false);
            self.regs
                .write_word(self.layout.priority(vector), DEFAULT_PRIORITY);
        }
        self.regs
            .write_word(self.layout.threshold(hart), DEFAULT_THRESHOLD);
        info!(
            "plic: hart {} (context {}) initialized, {} sources masked",
            hart,
            self.layout.context(hart),
            N.saturating_sub(1)
        );
    }

    pub fn mask(&self, hart: usize, vector: Vector) -> AxResult {
        let vector = Self::check(vector)?;
        self.update_enable(hart, vector, false);
        Ok(())
    }

    pub fn unmask(&self, hart: usize, vector: Vector) -> AxResult {
        let vector = Self::check(vector)?;
        self.update_enable(hart, vector, true);
        Ok(())
    }

    pub fn is_enabled(&self, hart: usize, vector: Vector) -> AxResult<bool> {
        let vector = Self::check(vector)?;
        let word = self.regs.read_word(self.layout.enable(vector, hart));
        Ok(word & vector.bit_mask() != 0)
    }

    pub fn is_pending(&self, vector: Vector) -> AxResult<bool> {
        let vector = Self::check(vector)?;
        let word = self.regs.read_word(self.layout.pending(vector));
        Ok(word & vector.bit_mask() != 0)
    }

    pub fn priority(&self, vector: Vector) -> AxResult<u32> {
        let vector = Self::check(vector)?;
        Ok(self.regs.read_word(self.layout.priority(vector)))
    }

    pub fn threshold(&self, hart: usize) -> u32 {
        self.regs.read_word(self.layout.threshold(hart))
    }

    /// Side-effecting read: a non-zero result is in service on `hart` until
    /// completed.
    pub(crate) fn claim(&self, hart: usize) -> Vector {
        let vector = Vector::new(self.regs.read_word(self.layout.claim_complete(hart)));
        trace!("plic: hart {} claimed {}", hart, vector);
        vector
    }

    pub(crate) fn complete(&self, hart: usize, vector: Vector) {
        self.regs
            .write_word(self.layout.claim_complete(hart), vector.as_u32());
        trace!("plic: hart {} completed {}", hart, vector);
    }

    fn update_enable(&self, hart: usize, vector: Vector, enabled: bool) {
        let addr = self.layout.enable(vector, hart);
        let cur = self.regs.read_word(addr);
        let new = if enabled {
            cur | vector.bit_mask()
        } else {
            cur & !vector.bit_mask()
        };
        self.regs.write_word(addr, new);
    }
}
