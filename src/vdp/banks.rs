//! Video memories and the renderer-facing dirty tile tracking.

use super::constants::*;

/// Location of the sprite attribute table and the slice of it mirrored
/// into the internal SAT cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SatWindow {
    pub base: u16,
    pub base_mask: u16,
    pub addr_mask: u16,
}

impl SatWindow {
    pub fn new(reg5: u8, h40: bool) -> Self {
        let (base_mask, addr_mask) = if h40 { (0xFC00, 0x03FF) } else { (0xFE00, 0x01FF) };
        Self {
            base: ((reg5 as u16) << 9) & base_mask,
            base_mask,
            addr_mask,
        }
    }

    #[inline(always)]
    pub fn contains(&self, addr: u16) -> bool {
        (addr & self.base_mask) == self.base
    }
}

impl Default for SatWindow {
    fn default() -> Self {
        Self::new(0, false)
    }
}

#[derive(Debug, Clone)]
pub struct MemoryBanks {
    pub vram: Vec<u8>,
    pub cram: Vec<u8>,
    pub vsram: Vec<u8>,
    pub sat: Vec<u8>,
    /// Per tile bitmask of modified 4-byte rows.
    tile_dirty: Vec<u8>,
    dirty_list: Vec<u16>,
}

impl Default for MemoryBanks {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBanks {
    pub fn new() -> Self {
        Self {
            vram: vec![0; VRAM_SIZE],
            cram: vec![0; CRAM_SIZE],
            vsram: vec![0; VSRAM_SIZE],
            sat: vec![0; SAT_SIZE],
            tile_dirty: vec![0; NUM_TILES],
            dirty_list: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.vram.fill(0);
        self.cram.fill(0);
        self.vsram.fill(0);
        self.sat.fill(0);
        self.tile_dirty.fill(0);
        self.dirty_list.clear();
    }

    #[inline(always)]
    pub fn mark_dirty(&mut self, addr: u16) {
        let name = (addr >> 5) as usize;
        if self.tile_dirty[name] == 0 {
            self.dirty_list.push(name as u16);
        }
        self.tile_dirty[name] |= 1 << ((addr >> 2) & 7);
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty_list.clear();
        for name in 0..NUM_TILES {
            self.tile_dirty[name] = 0xFF;
            self.dirty_list.push(name as u16);
        }
    }

    /// Drain the modified tiles as `(tile index, row mask)` pairs.
    pub fn take_dirty_tiles(&mut self) -> Vec<(u16, u8)> {
        let list = std::mem::take(&mut self.dirty_list);
        list.into_iter()
            .map(|name| {
                let rows = std::mem::take(&mut self.tile_dirty[name as usize]);
                (name, rows)
            })
            .collect()
    }

    /// Write one VRAM byte, skipping identical values.
    #[inline(always)]
    pub fn write_vram_byte(&mut self, addr: u16, value: u8) {
        let idx = addr as usize;
        if self.vram[idx] != value {
            self.vram[idx] = value;
            self.mark_dirty(addr);
        }
    }

    /// Write a big-endian VRAM word at an even address, skipping identical data.
    pub fn write_vram_word(&mut self, addr: u16, value: u16) {
        let idx = (addr & 0xFFFE) as usize;
        let [hi, lo] = value.to_be_bytes();
        if self.vram[idx] != hi || self.vram[idx + 1] != lo {
            self.vram[idx] = hi;
            self.vram[idx + 1] = lo;
            self.mark_dirty(addr & 0xFFFE);
        }
    }

    pub fn read_vram_word(&self, addr: u16) -> u16 {
        let idx = (addr & 0xFFFE) as usize;
        u16::from_be_bytes([self.vram[idx], self.vram[idx + 1]])
    }

    /// Mirror a VRAM byte into the SAT cache if it falls inside the table.
    #[inline(always)]
    pub fn update_sat_byte(&mut self, window: &SatWindow, addr: u16, value: u8) {
        if window.contains(addr) {
            self.sat[(addr & window.addr_mask) as usize] = value;
        }
    }

    pub fn update_sat_word(&mut self, window: &SatWindow, addr: u16, value: u16) {
        let addr = addr & 0xFFFE;
        if window.contains(addr) {
            let idx = (addr & window.addr_mask) as usize;
            let [hi, lo] = value.to_be_bytes();
            self.sat[idx] = hi;
            self.sat[idx + 1] = lo;
        }
    }

    /// Reload the SAT cache from VRAM after the table moved.
    pub fn rebuild_sat(&mut self, window: &SatWindow) {
        let len = window.addr_mask as usize + 1;
        let base = window.base as usize;
        self.sat[..len].copy_from_slice(&self.vram[base..base + len]);
    }

    /// CRAM entries are stored as little-endian 16-bit values, one per colour.
    pub fn cram_entry(&self, index: usize) -> u16 {
        let idx = (index & 0x3F) * 2;
        u16::from_le_bytes([self.cram[idx], self.cram[idx + 1]])
    }

    /// Returns true when the stored entry changed.
    pub fn set_cram_entry(&mut self, index: usize, value: u16) -> bool {
        let idx = (index & 0x3F) * 2;
        let [lo, hi] = value.to_le_bytes();
        if self.cram[idx] == lo && self.cram[idx + 1] == hi {
            return false;
        }
        self.cram[idx] = lo;
        self.cram[idx + 1] = hi;
        true
    }

    pub fn read_vsram_word(&self, addr: u16) -> u16 {
        let idx = (addr & 0x7E) as usize;
        u16::from_be_bytes([self.vsram[idx], self.vsram[idx + 1]])
    }

    pub fn write_vsram_word(&mut self, addr: u16, value: u16) {
        let idx = (addr & 0x7E) as usize;
        let [hi, lo] = value.to_be_bytes();
        self.vsram[idx] = hi;
        self.vsram[idx + 1] = lo;
    }
}

/// Pack a Mode 5 bus colour (`----BBB-GGG-RRR-`) into 9-bit CRAM (`BBBGGGRRR`).
#[inline(always)]
pub fn pack_cram_color(value: u16) -> u16 {
    ((value & 0x0E00) >> 3) | ((value & 0x00E0) >> 2) | ((value & 0x000E) >> 1)
}

/// Expand a 9-bit CRAM colour back to its bus representation.
#[inline(always)]
pub fn unpack_cram_color(value: u16) -> u16 {
    ((value & 0x01C0) << 3) | ((value & 0x0038) << 2) | ((value & 0x0007) << 1)
}
