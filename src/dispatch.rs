use axerrno::AxResult;
use log::{trace, warn};

use crate::consts::PLIC_MAX_SOURCES;
use crate::handler::{HandlerEntry, HandlerTable, RescheduleHint};
use crate::layout::RegisterLayout;
use crate::mask::MaskController;
use crate::regs::{IrqPlatform, RegisterAccess};
use crate::Vector;

/// PLIC driver for a controller wired with `N` sources (`NUM_IRQS`).
///
/// Boot sequence, per hart: [`initialize_all`](Plic::initialize_all). Then,
/// once: [`register_handler`](Plic::register_handler) for every source,
/// [`activate`](Plic::activate), and [`unmask`](Plic::unmask) the sources
/// in use. Every external-interrupt trap calls [`dispatch`](Plic::dispatch)
/// exactly once.
pub struct Plic<R, P, const N: usize> {
    masks: MaskController<R, N>,
    handlers: HandlerTable<N>,
    platform: P,
}

impl<R, P, const N: usize> Plic<R, P, N> {
    pub const fn new(regs: R, layout: RegisterLayout, platform: P) -> Self {
        const {
            assert!(N > 0 && N <= PLIC_MAX_SOURCES, "NUM_IRQS out of range");
        }
        Self {
            masks: MaskController::new(regs, layout),
            handlers: HandlerTable::new(),
            platform,
        }
    }

    pub const fn masks(&self) -> &MaskController<R, N> {
        &self.masks
    }

    pub const fn handlers(&self) -> &HandlerTable<N> {
        &self.handlers
    }

    pub const fn platform(&self) -> &P {
        &self.platform
    }

    /// See [`HandlerTable::register_handler`] for the fatal cases.
    pub fn register_handler(&self, vector: Vector, handler: HandlerEntry) {
        self.handlers.register_handler(vector, handler);
    }

    pub fn activate(&self) {
        self.handlers.activate();
    }
}

impl<R: RegisterAccess, P: IrqPlatform, const N: usize> Plic<R, P, N> {
    /// Masks every source on the calling hart and opens its threshold.
    ///
    /// Each hart calls this during its own bring-up; other harts' enable
    /// banks are left alone.
    pub fn initialize_all(&self) {
        self.masks.initialize_hart(self.platform.current_hart());
    }

    pub fn mask(&self, vector: Vector) -> AxResult {
        self.masks.mask(self.platform.current_hart(), vector)
    }

    pub fn unmask(&self, vector: Vector) -> AxResult {
        self.masks.unmask(self.platform.current_hart(), vector)
    }

    /// Claims the highest-priority pending source for the calling hart.
    ///
    /// Returns `None` when nothing is pending; no completion is owed then.
    pub fn claim(&self) -> Option<ClaimedIrq<'_, R, N>> {
        let hart = self.platform.current_hart();
        let vector = self.masks.claim(hart);
        if vector.is_none() {
            return None;
        }
        Some(ClaimedIrq {
            masks: &self.masks,
            hart,
            vector,
        })
    }

    /// Services one external-interrupt trap on the calling hart.
    pub fn dispatch(&self) -> RescheduleHint {
        let Some(claimed) = self.claim() else {
            // spurious trap, or another hart got there first
            return RescheduleHint::NoReschedule;
        };
        let vector = claimed.vector();

        self.platform.irq_observed();
        self.platform.irq_enter(vector);

        let hint = match self.handlers.lookup(vector) {
            Some(handler) => handler.handle(),
            None => {
                if vector.as_usize() >= N {
                    warn!("plic: claimed {} beyond NUM_IRQS = {}", vector, N);
                } else {
                    trace!("plic: no handler for {}", vector);
                }
                RescheduleHint::NoReschedule
            }
        };

        claimed.complete();
        self.platform.irq_exit(vector);
        hint
    }
}

/// A source claimed on one hart and not yet completed.
///
/// The hardware will not deliver this source again until
/// [`complete`](ClaimedIrq::complete) is called. Dropping the token without
/// completing leaves the source in service.
#[must_use = "a claimed interrupt stays in service until completed"]
pub struct ClaimedIrq<'a, R: RegisterAccess, const N: usize> {
    masks: &'a MaskController<R, N>,
    hart: usize,
    vector: Vector,
}

impl<R: RegisterAccess, const N: usize> ClaimedIrq<'_, R, N> {
    pub fn vector(&self) -> Vector {
        self.vector
    }

    pub fn hart(&self) -> usize {
        self.hart
    }

    /// Writes the claimed value back unchanged, ending the in-service state.
    pub fn complete(self) {
        self.masks.complete(self.hart, self.vector);
    }
}
