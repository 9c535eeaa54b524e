//! HV counter.
//!
//! The horizontal counter is not linear: it counts through the active area,
//! then jumps backwards into the blanking range. Both sequences are expanded
//! at compile time into per-master-clock lookup tables.

use super::constants::*;
use super::Vdp;

const LINE_LEN: usize = CYCLES_PER_LINE as usize;

const fn build_hc_table(active_end: u8, blank_start: u8) -> [u8; LINE_LEN] {
    let count = (active_end as usize + 1) + (0x100 - blank_start as usize);
    let mut table = [0u8; LINE_LEN];
    let mut i = 0;
    while i < LINE_LEN {
        let step = i * count / LINE_LEN;
        table[i] = if step <= active_end as usize {
            step as u8
        } else {
            (blank_start as usize + step - active_end as usize - 1) as u8
        };
        i += 1;
    }
    table
}

/// H32 / Mode 4 / TMS: 0x00-0x93, then 0xE9-0xFF
static HC_H32: [u8; LINE_LEN] = build_hc_table(0x93, 0xE9);
/// H40: 0x00-0xB6, then 0xE4-0xFF
static HC_H40: [u8; LINE_LEN] = build_hc_table(0xB6, 0xE4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HcTable {
    H32,
    H40,
}

impl HcTable {
    #[inline(always)]
    pub fn lookup(self, cycles: u64) -> u8 {
        let pos = (cycles % CYCLES_PER_LINE) as usize;
        match self {
            Self::H32 => HC_H32[pos],
            Self::H40 => HC_H40[pos],
        }
    }

    /// The HBlank flag is raised shortly before the counter jumps.
    pub fn in_hblank(self, hc: u8) -> bool {
        match self {
            Self::H32 => hc >= 0x93 || hc < 0x05,
            Self::H40 => hc >= 0xB3 || hc < 0x06,
        }
    }
}

/// Last V counter value before the jump back, keyed by active height and PAL.
fn vc_max(height: u16, pal: bool) -> i32 {
    match (height, pal) {
        (240, false) => 0x106,
        (240, true) => 0x10A,
        (224, false) => 0xEA,
        (224, true) => 0x102,
        (_, false) => 0xDA,
        (_, true) => 0xF2,
    }
}

impl Vdp {
    pub fn lines_per_frame(&self) -> u64 {
        if self.is_pal {
            LINES_PAL
        } else {
            LINES_NTSC
        }
    }

    pub fn read_h_counter(&self, cycles: u64) -> u8 {
        match self.hv_latch {
            Some(latched) => latched as u8,
            None => self.display.hc_table.lookup(cycles),
        }
    }

    pub fn read_v_counter(&self, cycles: u64) -> u8 {
        match self.hv_latch {
            Some(latched) if self.mode5_enabled() => (latched >> 8) as u8,
            _ => self.live_v_counter(cycles),
        }
    }

    /// HV counter as returned by a 68k read: V in the high byte, H in the low.
    pub fn read_hv_counter(&self, cycles: u64) -> u16 {
        match self.hv_latch {
            // Mode 5 freezes both counters
            Some(latched) if self.mode5_enabled() => latched,
            // Mode 4 only freezes H
            Some(latched) => ((self.live_v_counter(cycles) as u16) << 8) | (latched & 0x00FF),
            None => self.live_hv_counter(cycles),
        }
    }

    pub fn latch_hv_counter(&mut self, cycles: u64) {
        let value = self.live_hv_counter(cycles);
        log::trace!("HV counter latched at {value:04X}");
        self.hv_latch = Some(value);
    }

    pub fn release_hv_latch(&mut self) {
        self.hv_latch = None;
    }

    pub fn is_hv_latched(&self) -> bool {
        self.hv_latch.is_some()
    }

    fn live_hv_counter(&self, cycles: u64) -> u16 {
        ((self.live_v_counter(cycles) as u16) << 8) | (self.display.hc_table.lookup(cycles) as u16)
    }

    fn live_v_counter(&self, cycles: u64) -> u8 {
        let lines = self.lines_per_frame();
        let line = ((cycles / CYCLES_PER_LINE) % lines) as i32;

        let mut vc = line - 1;
        if vc > vc_max(self.display.height, self.is_pal) {
            vc -= lines as i32;
        }

        if self.display.interlace {
            let shifted = (vc << self.display.im2 as u32) as u32;
            // Bit 8 is reported in bit 0
            return ((shifted & 0xFE) | ((shifted >> 8) & 1)) as u8;
        }
        vc as u8
    }

    pub(crate) fn in_hblank(&self, cycles: u64) -> bool {
        let table = self.display.hc_table;
        table.in_hblank(table.lookup(cycles))
    }
}
