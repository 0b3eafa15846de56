/// Number of interrupt sources addressable by a PLIC 1.0 register map,
/// including the reserved source 0.
pub const PLIC_MAX_SOURCES: usize = 1024;

/// Priority written to every source during hart initialization.
/// Any non-zero value lets the source through a threshold of 0.
pub const DEFAULT_PRIORITY: u32 = 1;

/// Threshold written during hart initialization: accept any non-zero priority.
pub const DEFAULT_THRESHOLD: u32 = 0;

pub const BITS_PER_WORD: usize = 32;

/// Each hart owns 2 contexts: M-mode + S-mode.
pub const CONTEXT_PER_HART: usize = 2;

/// Size of one context's enable block: 32 words, 1024 bits.
pub const CONTEXT_ENABLE_STRIDE: usize = 0x80;

/// Size of one context's threshold + claim/complete block.
pub const CONTEXT_STRIDE: usize = 0x1000;

pub const PLIC_PRIO_BEGIN: usize = 0x0000;
pub const PLIC_PRIO_END: usize = 0x0FFF;

pub const PLIC_PENDING_BEGIN: usize = 0x1000;
pub const PLIC_PENDING_END: usize = 0x1FFF;

pub const PLIC_ENABLE_BEGIN: usize = 0x2000;
pub const PLIC_ENABLE_END: usize = 0x1f_ffff;

pub const PLIC_THRESHOLD_CLAIM_BEGIN: usize = 0x20_0000;
pub const PLIC_THRESHOLD_CLAIM_END: usize = 0x3f_ffff;

/// Offset of the claim/complete register inside a context block.
pub const CONTEXT_CLAIM_OFFSET: usize = 4;
