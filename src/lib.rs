//! Driver core for a RISC-V Platform-Level Interrupt Controller.
//!
//! Handlers are registered per source, sources are masked and unmasked per
//! hart, and every external-interrupt trap runs the claim, dispatch and
//! complete handshake through [`Plic::dispatch`].

#![no_std]

pub mod consts;
mod dispatch;
mod handler;
pub mod layout;
mod mask;
pub mod msi;
mod regs;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
mod vector;

pub use dispatch::{ClaimedIrq, Plic};
pub use handler::{ContextHandler, HandlerEntry, HandlerTable, InterruptHandler, RescheduleHint};
pub use layout::RegisterLayout;
pub use mask::MaskController;
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub use regs::MHartId;
pub use regs::{FixedHart, IrqPlatform, Mmio, RegisterAccess};
pub use vector::Vector;
