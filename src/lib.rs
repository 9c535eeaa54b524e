//! genteel-vdp - the register, DMA and FIFO core of the Sega VDP family
//!
//! Covers the TMS9918, the Master System and Game Gear VDPs and the
//! Mega Drive VDP. Pixel output is left to the host; this crate keeps the
//! video memories, timing and status the way the CPU sees them.

pub mod memory;
pub mod state;
pub mod vdp;

pub use memory::{DmaBus, Memory, OpenBus};
pub use state::SaveState;
pub use vdp::{Vdp, VdpVariant};
