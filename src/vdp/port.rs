//! Control and data port protocols.
//!
//! The Mega Drive speaks a two-word command protocol from the 68k; the
//! Master System, Game Gear and TMS9918 use a byte latch on the Z80 side.
//! Every entry point takes the CPU's current master-clock timestamp and
//! writes return the timestamp at which the CPU may continue.

use super::banks::{pack_cram_color, unpack_cram_color};
use super::constants::*;
use super::dma::DmaOps;
use super::registers::Protocol;
use super::status::Status;
use super::Vdp;

impl Vdp {
    pub fn write_control(&mut self, value: u16, cycles: u64) -> u64 {
        log::trace!("VDP control write {value:04X} at {cycles}");

        let resume = match self.protocol() {
            Protocol::Word => self.write_control_word(value, cycles),
            Protocol::Sms | Protocol::GameGear => {
                self.write_control_sms(value as u8, cycles);
                cycles
            }
            Protocol::Tms => {
                self.write_control_tms(value as u8, cycles);
                cycles
            }
        };

        self.update_fifo_latency();
        resume
    }

    fn write_control_word(&mut self, value: u16, cycles: u64) -> u64 {
        if !self.command.pending {
            // The bus belongs to the DMA; every word lands once it is over
            if self.dma.as_ref().is_some_and(|dma| dma.freezes_cpu()) {
                log::debug!("Control write {value:04X} deferred until DMA completes");
                self.deferred_control.push(value);
                return cycles;
            }

            if (value & 0xC000) == 0x8000 {
                self.write_register(((value >> 8) & 0x1F) as usize, value as u8, cycles);
            } else {
                self.command.pending = true;
            }

            self.command.address = self.command.address_high | (value & 0x3FFF);
            self.command.code = (self.command.code & 0x3C) | ((value >> 14) & 0x03) as u8;
            return cycles;
        }

        // Second word of command
        self.command.pending = false;
        self.command.address_high = (value & 0x0003) << 14;
        self.command.address = self.command.address_high | (self.command.address & 0x3FFF);
        self.command.code = (self.command.code & 0x03) | ((value >> 2) & 0x3C) as u8;

        if (self.command.code & 0x01) == 0 {
            self.prefetch();
        }

        if (self.command.code & CODE_DMA) != 0 && self.dma_enabled() {
            return self.trigger_dma(cycles);
        }
        cycles
    }

    fn write_control_sms(&mut self, value: u8, cycles: u64) {
        if !self.command.pending {
            self.command.address = (self.command.address & 0x3F00) | value as u16;
            self.command.latch = value;
            self.command.pending = true;
            return;
        }

        self.command.pending = false;
        self.command.code = value >> 6;
        self.command.address = (((value as u16) << 8) | self.command.latch as u16) & BYTE_ADDRESS_MASK;

        match self.command.code {
            0 => {
                self.prefetch();
                self.command.address = (self.command.address + 1) & BYTE_ADDRESS_MASK;
            }
            2 => self.write_register((value & 0x0F) as usize, self.command.latch, cycles),
            _ => {}
        }
    }

    fn write_control_tms(&mut self, value: u8, cycles: u64) {
        if !self.command.pending {
            self.command.latch = value;
            self.command.pending = true;
            return;
        }

        self.command.pending = false;
        self.command.code = value >> 6;
        self.command.address = (((value as u16) << 8) | self.command.latch as u16) & BYTE_ADDRESS_MASK;

        if self.command.code == 0 {
            self.prefetch();
            self.command.address = (self.command.address + 1) & BYTE_ADDRESS_MASK;
        } else if (self.command.code & 0x02) != 0 {
            self.write_register((value & 0x07) as usize, self.command.latch, cycles);
        }
    }

    pub fn write_data(&mut self, value: u16, cycles: u64) -> u64 {
        self.command.pending = false;
        log::trace!("VDP data write {value:04X} at address {:04X}", self.command.address);

        match self.protocol() {
            Protocol::Word => self.write_data_word(value, cycles),
            protocol => {
                self.write_data_byte(protocol, value as u8);
                cycles
            }
        }
    }

    fn write_data_word(&mut self, value: u16, cycles: u64) -> u64 {
        let mut resume = cycles;

        // Writes are queued while the VDP is busy fetching the display
        if self.mode5_enabled() && self.in_active_display() {
            if let Some(stall) = self.fifo.note_write(cycles, &mut self.status) {
                log::trace!("FIFO full, CPU held until {stall}");
                resume = stall;
            }
        }

        // An armed fill takes its value from this write and starts at the
        // command address
        if self.fill_armed {
            self.fill_armed = false;
            self.last_data_write = value;
            return self.start_fill(resume);
        }

        self.bus_write(value);
        resume
    }

    /// Internal bus write shared by the data port and 68k bus DMA.
    pub(crate) fn bus_write(&mut self, value: u16) {
        let addr = self.command.address;
        self.last_data_write = value;

        match self.command.code & CODE_TARGET_MASK {
            VRAM_WRITE => {
                let data = if (addr & 1) != 0 { value.swap_bytes() } else { value };
                self.banks.update_sat_word(&self.display.sat, addr, data);
                self.banks.write_vram_word(addr, data);
            }
            CRAM_WRITE => {
                let index = ((addr >> 1) & 0x3F) as usize;
                if self.banks.set_cram_entry(index, pack_cram_color(value)) && index == self.border_index() {
                    self.refresh_backdrop();
                }
            }
            VSRAM_WRITE => self.banks.write_vsram_word(addr, value),
            code => log::debug!("Data write with code {code:02X} ignored"),
        }

        self.command.address = addr.wrapping_add(self.auto_increment() as u16);
    }

    fn write_data_byte(&mut self, protocol: Protocol, value: u8) {
        let addr = self.command.address;

        if self.command.code == 3 && protocol != Protocol::Tms {
            let updated = match protocol {
                Protocol::GameGear => {
                    if (addr & 1) == 0 {
                        self.gg_cram_latch = value;
                        None
                    } else {
                        let color = (((value as u16) << 8) | self.gg_cram_latch as u16) & 0x0FFF;
                        let index = ((addr >> 1) & 0x1F) as usize;
                        self.banks.set_cram_entry(index, color).then_some(index)
                    }
                }
                _ => {
                    let index = (addr & 0x1F) as usize;
                    self.banks.set_cram_entry(index, (value & 0x3F) as u16).then_some(index)
                }
            };
            if updated == Some(self.border_index()) {
                self.refresh_backdrop();
            }
        } else {
            let index = self.byte_vram_index(addr);
            self.banks.write_vram_byte(index, value);
        }

        // Data writes also load the read buffer
        self.command.read_buffer = value as u16;
        self.command.address = addr.wrapping_add(1) & BYTE_ADDRESS_MASK;
    }

    pub fn read_data(&mut self) -> u16 {
        self.command.pending = false;
        let value = self.command.read_buffer;

        match self.protocol() {
            Protocol::Word => {
                self.command.address = self.command.address.wrapping_add(self.auto_increment() as u16);
                self.prefetch();
            }
            _ => {
                self.prefetch();
                self.command.address = (self.command.address + 1) & BYTE_ADDRESS_MASK;
            }
        }

        log::trace!("VDP data read {value:04X}");
        value
    }

    /// Refill the read buffer from the current address.
    fn prefetch(&mut self) {
        let addr = self.command.address;
        self.command.read_buffer = match self.protocol() {
            Protocol::Word => match self.command.code & CODE_TARGET_MASK {
                VRAM_READ => self.banks.read_vram_word(addr),
                VSRAM_READ => self.banks.read_vsram_word(addr),
                CRAM_READ => unpack_cram_color(self.banks.cram_entry((addr >> 1) as usize)),
                // Undocumented: a single byte, low half of the bus
                VRAM_READ_8BIT => self.banks.vram[(addr ^ 1) as usize] as u16,
                _ => self.command.read_buffer,
            },
            _ => self.banks.vram[self.byte_vram_index(addr) as usize] as u16,
        };
    }

    /// VRAM index for byte protocols. The TMS9918 in 4K mode scrambles the
    /// row/column address lines.
    fn byte_vram_index(&self, addr: u16) -> u16 {
        let index = addr & BYTE_ADDRESS_MASK;
        if self.protocol() == Protocol::Tms && (self.registers[REG_MODE2] & MODE2_TMS_16K) == 0 {
            (index & 0x203F) | ((index >> 6) & 0x0040) | ((index << 1) & 0x1F80)
        } else {
            index
        }
    }

    /// Status read. Clears the pending flag and the read-and-clear bits.
    pub fn read_control(&mut self, cycles: u64) -> u16 {
        self.fifo.update(cycles, &mut self.status);

        if self.dma.is_none() && cycles >= self.dma_end_cycles {
            self.status.remove(Status::DMA_BUSY);
        }

        self.status.set(Status::HBLANK, self.in_hblank(cycles));

        let mut value = self.status.take_for_read();
        self.command.pending = false;

        if self.mode5_enabled() && !self.display_enabled() {
            value.insert(Status::VBLANK);
        }

        log::trace!("VDP status read {:04X} at {cycles}", value.bits());
        match self.protocol() {
            Protocol::Word => value.bits(),
            _ => value.bits() & 0x00E0,
        }
    }

    pub(crate) fn update_fifo_latency(&mut self) {
        let vram_target = (self.command.code & CODE_TARGET_MASK) < 0x03;
        self.fifo.set_latency(self.display.h40, vram_target);
    }
}
