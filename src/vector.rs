use core::fmt;

use crate::consts::BITS_PER_WORD;

/// Identifier of one external interrupt source.
///
/// The value `0` is reserved by the PLIC: it is what the claim register reads
/// when nothing is pending, and it never owns a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Vector(u32);

impl Vector {
    /// "No interrupt pending".
    pub const NONE: Self = Self(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Whether this is a real source of a controller wired for `num_irqs`
    /// sources, i.e. it lies in `[1, num_irqs)`.
    pub const fn is_valid_source(self, num_irqs: usize) -> bool {
        !self.is_none() && self.as_usize() < num_irqs
    }

    /// Index of the 32-bit bank holding this vector's bit, and the bit
    /// position inside it.
    pub const fn bank_and_bit(self) -> (usize, u32) {
        (
            self.as_usize() / BITS_PER_WORD,
            (self.as_usize() % BITS_PER_WORD) as u32,
        )
    }

    pub(crate) const fn bit_mask(self) -> u32 {
        1 << self.bank_and_bit().1
    }
}

impl From<u32> for Vector {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<Vector> for u32 {
    fn from(vector: Vector) -> Self {
        vector.0
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "irq#{}", self.0)
    }
}
