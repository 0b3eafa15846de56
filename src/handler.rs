use core::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use spin::RwLock;

use crate::Vector;

/// Outcome of servicing an interrupt, telling the scheduler whether to
/// reconsider the running task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[must_use]
pub enum RescheduleHint {
    #[default]
    NoReschedule,
    Reschedule,
}

/// Something that services an interrupt vector.
pub trait InterruptHandler: Sync {
    fn handle(&self) -> RescheduleHint;
}

/// A plain function paired with the context it is invoked with.
pub struct ContextHandler<C: 'static> {
    func: fn(&C) -> RescheduleHint,
    context: C,
}

impl<C: 'static> ContextHandler<C> {
    pub const fn new(func: fn(&C) -> RescheduleHint, context: C) -> Self {
        Self { func, context }
    }

    pub const fn context(&self) -> &C {
        &self.context
    }
}

impl<C: Sync + 'static> InterruptHandler for ContextHandler<C> {
    fn handle(&self) -> RescheduleHint {
        (self.func)(&self.context)
    }
}

pub type HandlerEntry = &'static dyn InterruptHandler;

/// Vector-indexed handler slots for a controller wired with `N` sources.
///
/// Handlers are registered during single-threaded boot, then the table is
/// frozen with [`activate`](HandlerTable::activate). After activation the
/// table is read-only and lookups never contend.
pub struct HandlerTable<const N: usize> {
    slots: RwLock<[Option<HandlerEntry>; N]>,
    active: AtomicBool,
}

impl<const N: usize> HandlerTable<N> {
    pub const fn new() -> Self {
        Self {
            slots: RwLock::new([None; N]),
            active: AtomicBool::new(false),
        }
    }

    /// Stores `handler` for `vector`, replacing any earlier one.
    ///
    /// # Panics
    ///
    /// If `vector` is `0` or not below `N`, or if the table was already
    /// activated. Nothing is written in either case.
    pub fn register_handler(&self, vector: Vector, handler: HandlerEntry) {
        assert!(
            vector.as_usize() < N,
            "plic: vector {} out of range (NUM_IRQS = {})",
            vector.as_u32(),
            N
        );
        assert!(!vector.is_none(), "plic: vector 0 is reserved");
        assert!(
            !self.is_active(),
            "plic: handler for {} registered after activation",
            vector
        );
        debug!("plic: register handler for {}", vector);
        self.slots.write()[vector.as_usize()] = Some(handler);
    }

    /// The handler registered for `vector`, if any. Vectors beyond the table
    /// have none.
    pub fn lookup(&self, vector: Vector) -> Option<HandlerEntry> {
        self.slots.read().get(vector.as_usize()).copied().flatten()
    }

    /// Freezes the table. Further registration is a fatal error.
    pub fn activate(&self) {
        if !self.active.swap(true, Ordering::AcqRel) {
            debug!("plic: handler table activated");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl<const N: usize> Default for HandlerTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
