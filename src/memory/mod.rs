//! 68k-side memory as seen by the VDP's bus DMA.
//!
//! The VDP reads source words from the 68k bus while a 68k-to-VDP transfer
//! is running. Hosts plug their bus in through [`DmaBus`]; [`Memory`] is a
//! flat cartridge + work RAM implementation used by tests and tools.

/// Source of words for 68k bus DMA.
pub trait DmaBus {
    /// Read a big-endian word from the linear ROM/RAM space.
    fn read_word(&mut self, address: u32) -> u16;

    /// Read from the 0xA00000-0xBFFFFF window (Z80 area and I/O chip).
    /// Without a Z80 owning the bus the lines float high.
    fn read_io_word(&mut self, address: u32) -> u16 {
        let _ = address;
        0xFFFF
    }
}

/// Open bus: every read returns 0xFFFF.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenBus;

impl DmaBus for OpenBus {
    fn read_word(&mut self, _address: u32) -> u16 {
        0xFFFF
    }
}

pub const WORK_RAM_SIZE: usize = 0x10000;

pub struct Memory {
    /// Cartridge space mapped from 0x000000
    pub rom: Vec<u8>,
    /// 64KB work RAM mirrored through 0xE00000-0xFFFFFF
    pub work_ram: Vec<u8>,
}

impl Memory {
    pub fn new(rom: Vec<u8>) -> Self {
        Self {
            rom,
            work_ram: vec![0; WORK_RAM_SIZE],
        }
    }

    pub fn write_word(&mut self, address: u32, value: u16) {
        let address = address & 0xFF_FFFE;
        let [hi, lo] = value.to_be_bytes();
        if address >= 0xE0_0000 {
            let idx = (address & 0xFFFF) as usize;
            self.work_ram[idx] = hi;
            self.work_ram[idx + 1] = lo;
        } else if (address as usize) + 1 < self.rom.len() {
            self.rom[address as usize] = hi;
            self.rom[address as usize + 1] = lo;
        }
    }
}

impl DmaBus for Memory {
    fn read_word(&mut self, address: u32) -> u16 {
        let address = address & 0xFF_FFFE;
        if address >= 0xE0_0000 {
            let idx = (address & 0xFFFF) as usize;
            return u16::from_be_bytes([self.work_ram[idx], self.work_ram[idx + 1]]);
        }

        let idx = address as usize;
        if idx + 1 < self.rom.len() {
            u16::from_be_bytes([self.rom[idx], self.rom[idx + 1]])
        } else {
            0xFFFF
        }
    }
}
