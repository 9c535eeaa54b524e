use serde::{Deserialize, Serialize};

use super::constants::*;
use super::status::Status;
use super::Vdp;
use crate::memory::{DmaBus, OpenBus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DmaKind {
    /// 68k bus to VRAM, CRAM or VSRAM (destination from the code register)
    VBusToVram,
    VramFill,
    VramCopy,
}

/// A transfer in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmaRequest {
    pub kind: DmaKind,
    /// Programmed length, 1..=0x10000
    pub length: u32,
    pub remaining: u32,
    /// Word address for bus transfers, byte address for copies
    pub source: u16,
}

impl DmaRequest {
    /// The 68k loses the bus for the whole transfer.
    pub fn freezes_cpu(&self) -> bool {
        self.kind == DmaKind::VBusToVram
    }
}

pub trait DmaOps {
    fn dma_mode(&self) -> u8;
    fn dma_source(&self) -> u32;
    fn dma_length(&self) -> u32;
    fn dma_source_transfer(&self) -> u32;
    fn is_dma_transfer(&self) -> bool;
    fn is_dma_fill(&self) -> bool;
    fn dma_enabled(&self) -> bool;
    fn dma_in_progress(&self) -> bool;
    fn advance_dma<B: DmaBus + ?Sized>(&mut self, cycles: u64, bus: &mut B) -> u64;
}

impl DmaOps for Vdp {
    fn dma_mode(&self) -> u8 {
        self.registers[REG_DMA_SRC_HI] & DMA_MODE_MASK
    }

    fn dma_source(&self) -> u32 {
        ((self.registers[REG_DMA_SRC_MID] as u32) << 8) | (self.registers[REG_DMA_SRC_LO] as u32)
    }

    /// Programmed length; zero stands for 0x10000.
    fn dma_length(&self) -> u32 {
        let length =
            ((self.registers[REG_DMA_LEN_HI] as u32) << 8) | (self.registers[REG_DMA_LEN_LO] as u32);
        if length == 0 {
            0x10000
        } else {
            length
        }
    }

    /// Byte address on the 68k bus of the next source word.
    fn dma_source_transfer(&self) -> u32 {
        ((self.registers[REG_DMA_SRC_HI] as u32 & 0x7F) << 17) | (self.dma_source() << 1)
    }

    fn is_dma_transfer(&self) -> bool {
        (self.registers[REG_DMA_SRC_HI] & 0x80) == 0
    }

    fn is_dma_fill(&self) -> bool {
        self.dma_mode() == DMA_MODE_FILL
    }

    fn dma_enabled(&self) -> bool {
        self.mode5_enabled() && (self.registers[REG_MODE2] & MODE2_DMA_ENABLE) != 0
    }

    fn dma_in_progress(&self) -> bool {
        self.dma.is_some()
    }

    /// Run the DMA for the rest of the current line (or the rest of VBlank).
    /// Returns the timestamp at which the CPU may resume.
    fn advance_dma<B: DmaBus + ?Sized>(&mut self, cycles: u64, bus: &mut B) -> u64 {
        let (kind, remaining, source) = match self.dma.as_ref() {
            Some(dma) => (dma.kind, dma.remaining, dma.source),
            None => panic!("advance_dma called at cycle {cycles} with no DMA in flight"),
        };

        let (units, dma_cycles) = self.dma_step(kind, remaining, cycles);

        self.status.insert(Status::DMA_BUSY);
        self.dma_end_cycles = cycles + dma_cycles;
        let resume = if kind == DmaKind::VBusToVram {
            cycles + dma_cycles
        } else {
            cycles
        };

        if units == 0 {
            return resume;
        }

        log::trace!("DMA {kind:?}: {units} units at {cycles}, {} left", remaining - units);
        let source = match kind {
            DmaKind::VBusToVram => self.dma_bus_transfer(units, source, bus),
            DmaKind::VramFill => {
                self.dma_fill(units);
                source
            }
            DmaKind::VramCopy => self.dma_copy(units, source),
        };

        let done = match self.dma.as_mut() {
            Some(dma) => {
                dma.remaining -= units;
                dma.source = source;
                dma.remaining == 0
            }
            None => false,
        };
        if done {
            self.finish_dma(self.dma_end_cycles);
        }
        resume
    }
}

impl Vdp {
    pub fn dma_kind(&self) -> Option<DmaKind> {
        self.dma.as_ref().map(|dma| dma.kind)
    }

    /// Units left in the transfer in flight, 0 when idle.
    pub fn dma_remaining(&self) -> u32 {
        self.dma.as_ref().map_or(0, |dma| dma.remaining)
    }

    /// Decode register 23 after a command word with CD5 set.
    pub(crate) fn trigger_dma(&mut self, cycles: u64) -> u64 {
        match self.dma_mode() {
            DMA_MODE_FILL => {
                // Started by the next data port write
                self.fill_armed = true;
                cycles
            }
            DMA_MODE_COPY => {
                self.begin_dma(DmaKind::VramCopy);
                self.advance_dma(cycles, &mut OpenBus)
            }
            _ => {
                // The host moves the data with its bus through advance_dma at
                // this same timestamp; the 68k is held until the first step ends.
                self.begin_dma(DmaKind::VBusToVram);
                let length = self.dma_length();
                let (_, dma_cycles) = self.dma_step(DmaKind::VBusToVram, length, cycles);
                self.dma_end_cycles = cycles + dma_cycles;
                cycles + dma_cycles
            }
        }
    }

    /// Units moved and cycles spent by one step starting at `cycles`.
    /// A step runs to the end of the line, or to the end of the frame in VBlank.
    fn dma_step(&self, kind: DmaKind, remaining: u32, cycles: u64) -> (u32, u64) {
        let blanked = self.status.contains(Status::VBLANK) || !self.display_enabled();
        let mut rate = DMA_TIMING[blanked as usize][self.display.h40 as usize] as u64;
        // Two accesses per unit: word writes to VRAM, and copy read+write
        let vram_target = (self.command.code & CODE_TARGET_MASK) == VRAM_WRITE;
        if (kind == DmaKind::VBusToVram && vram_target) || kind == DmaKind::VramCopy {
            rate >>= 1;
        }

        let end = if self.status.contains(Status::VBLANK) {
            let frame = CYCLES_PER_LINE * self.lines_per_frame();
            (cycles / frame + 1) * frame
        } else {
            (cycles / CYCLES_PER_LINE + 1) * CYCLES_PER_LINE
        };

        let dma_cycles = end - cycles;
        let units = (dma_cycles * rate / CYCLES_PER_LINE) as u32;
        if remaining <= units {
            (remaining, remaining as u64 * CYCLES_PER_LINE / rate)
        } else {
            (units, dma_cycles)
        }
    }

    pub(crate) fn start_fill(&mut self, cycles: u64) -> u64 {
        self.begin_dma(DmaKind::VramFill);
        self.advance_dma(cycles, &mut OpenBus)
    }

    fn begin_dma(&mut self, kind: DmaKind) {
        let length = self.dma_length();
        log::debug!(
            "DMA {kind:?} started: length {length:#X}, source {:#06X}, destination {:04X} (code {:02X})",
            self.dma_source(),
            self.command.address,
            self.command.code
        );
        self.dma = Some(DmaRequest {
            kind,
            length,
            remaining: length,
            source: self.dma_source() as u16,
        });
        self.status.insert(Status::DMA_BUSY);
    }

    fn finish_dma(&mut self, cycles: u64) {
        let Some(dma) = self.dma.take() else {
            return;
        };

        // Source registers advance by the transfer length, length registers count down to 0
        let end = (self.dma_source() as u16).wrapping_add(dma.length as u16);
        self.registers[REG_DMA_SRC_LO] = end as u8;
        self.registers[REG_DMA_SRC_MID] = (end >> 8) as u8;
        self.registers[REG_DMA_LEN_LO] = 0;
        self.registers[REG_DMA_LEN_HI] = 0;
        log::debug!("DMA {:?} finished, {:#X} units", dma.kind, dma.length);

        // Replayed in order; a replay that starts another bus DMA queues the rest again
        for value in std::mem::take(&mut self.deferred_control) {
            self.write_control(value, cycles);
        }
    }

    fn dma_bus_transfer<B: DmaBus + ?Sized>(&mut self, units: u32, source: u16, bus: &mut B) -> u16 {
        let window = (self.registers[REG_DMA_SRC_HI] as u32 & 0x7F) << 17;
        // 0xA00000-0xBFFFFF: Z80 and I/O area
        let io = (self.registers[REG_DMA_SRC_HI] >> 4) == 5;
        let mut address = window | ((source as u32) << 1);

        for _ in 0..units {
            let word = if io {
                bus.read_io_word(address)
            } else {
                bus.read_word(address)
            };
            // Source wraps inside a 128KB window
            address = window | (address.wrapping_add(2) & 0x1FFFF);
            self.bus_write(word);
        }

        ((address >> 1) & 0xFFFF) as u16
    }

    fn dma_fill(&mut self, units: u32) {
        let inc = self.auto_increment() as u16;
        let mut addr = self.command.address;

        match self.command.code & CODE_TARGET_MASK {
            VRAM_WRITE => {
                let data = (self.last_data_write >> 8) as u8;
                for _ in 0..units {
                    self.banks.update_sat_byte(&self.display.sat, addr ^ 1, data);
                    self.banks.write_vram_byte(addr ^ 1, data);
                    addr = addr.wrapping_add(inc);
                }
            }
            CRAM_WRITE => {
                let color = super::banks::pack_cram_color(self.last_data_write);
                let border = self.border_index();
                let mut touched_border = false;
                for _ in 0..units {
                    let index = ((addr >> 1) & 0x3F) as usize;
                    if self.banks.set_cram_entry(index, color) && index == border {
                        touched_border = true;
                    }
                    addr = addr.wrapping_add(inc);
                }
                if touched_border {
                    self.refresh_backdrop();
                }
            }
            VSRAM_WRITE => {
                for _ in 0..units {
                    self.banks.write_vsram_word(addr, self.last_data_write);
                    addr = addr.wrapping_add(inc);
                }
            }
            _ => addr = addr.wrapping_add(inc.wrapping_mul(units as u16)),
        }

        self.command.address = addr;
    }

    fn dma_copy(&mut self, units: u32, source: u16) -> u16 {
        let inc = self.auto_increment() as u16;
        let mut addr = self.command.address;
        let mut source = source;

        if (self.command.code & 0x1E) == CODE_VRAM_COPY {
            for _ in 0..units {
                let data = self.banks.vram[source as usize];
                self.banks.update_sat_byte(&self.display.sat, addr, data);
                self.banks.write_vram_byte(addr, data);
                source = source.wrapping_add(1);
                addr = addr.wrapping_add(inc);
            }
        } else {
            // Invalid target: the length still runs out
            source = source.wrapping_add(units as u16);
            addr = addr.wrapping_add(inc.wrapping_mul(units as u16));
        }

        self.command.address = addr;
        source
    }
}
