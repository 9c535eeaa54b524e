//! Mode 5 write FIFO.
//!
//! The VDP buffers up to four data port writes during active display and
//! drains one entry per access slot. A fifth write halts the CPU until the
//! oldest entry has been processed.

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::status::Status;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fifo {
    count: u8,
    last_write: u64,
    #[serde(skip, default = "default_latency")]
    latency: u64,
}

fn default_latency() -> u64 {
    FIFO_LATENCY_H32
}

impl Default for Fifo {
    fn default() -> Self {
        Self::new()
    }
}

impl Fifo {
    pub fn new() -> Self {
        Self {
            count: 0,
            last_write: 0,
            latency: FIFO_LATENCY_H32,
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn last_write(&self) -> u64 {
        self.last_write
    }

    pub fn latency(&self) -> u64 {
        self.latency
    }

    /// Slot latency depends on the display width and on whether the
    /// current target is VRAM (byte-wide accesses take two slots).
    pub fn set_latency(&mut self, h40: bool, vram_target: bool) {
        let base = if h40 { FIFO_LATENCY_H40 } else { FIFO_LATENCY_H32 };
        self.latency = if vram_target { base * 2 } else { base };
    }

    /// Retire the entries processed since the last write.
    pub fn update(&mut self, cycles: u64, status: &mut Status) {
        if self.count == 0 {
            return;
        }

        let reads = cycles.saturating_sub(self.last_write) / self.latency;
        if reads == 0 {
            return;
        }

        status.remove(Status::FIFO_FULL);
        if reads >= self.count as u64 {
            self.count = 0;
            status.insert(Status::FIFO_EMPTY);
        } else {
            self.count -= reads as u8;
        }
        self.last_write += reads * self.latency;
    }

    /// Queue one write. Returns the timestamp the CPU is held until when the
    /// queue was already full.
    pub fn note_write(&mut self, cycles: u64, status: &mut Status) -> Option<u64> {
        self.update(cycles, status);
        status.remove(Status::FIFO_EMPTY);

        if self.count < FIFO_DEPTH {
            if self.count == 0 {
                self.last_write = cycles;
            }
            self.count += 1;
            if self.count == FIFO_DEPTH {
                status.insert(Status::FIFO_FULL);
            }
            None
        } else {
            self.last_write += self.latency;
            Some(self.last_write.max(cycles))
        }
    }

    pub fn restore(&mut self, count: u8, last_write: u64) {
        self.count = count.min(FIFO_DEPTH);
        self.last_write = last_write;
    }
}
