//! Console variants, rendering modes and the register write path.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::banks::SatWindow;
use super::constants::*;
use super::hvc::HcTable;
use super::Vdp;

/// The chip revision being emulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VdpVariant {
    /// TMS9918A as found in the SG-1000
    Tms9918,
    /// Master System (315-5124)
    Sms1,
    /// Master System II (315-5246)
    Sms2,
    /// Game Gear (315-5378)
    GameGear,
    /// Mega Drive (315-5313)
    #[default]
    MegaDrive,
}

/// Bus protocol spoken on the control/data ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// 68k two-word commands
    Word,
    Sms,
    /// SMS protocol with 16-bit CRAM writes through a byte latch
    GameGear,
    Tms,
}

impl VdpVariant {
    pub fn protocol(self) -> Protocol {
        match self {
            Self::MegaDrive => Protocol::Word,
            Self::Sms1 | Self::Sms2 => Protocol::Sms,
            Self::GameGear => Protocol::GameGear,
            Self::Tms9918 => Protocol::Tms,
        }
    }

    /// 224 and 240 line Mode 4 displays
    pub fn has_extended_heights(self) -> bool {
        matches!(self, Self::Sms2 | Self::GameGear | Self::MegaDrive)
    }
}

impl Display for VdpVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tms9918 => write!(f, "Tms9918"),
            Self::Sms1 => write!(f, "Sms1"),
            Self::Sms2 => write!(f, "Sms2"),
            Self::GameGear => write!(f, "GameGear"),
            Self::MegaDrive => write!(f, "MegaDrive"),
        }
    }
}

impl FromStr for VdpVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tms9918" => Ok(Self::Tms9918),
            "Sms1" => Ok(Self::Sms1),
            "Sms2" => Ok(Self::Sms2),
            "GameGear" => Ok(Self::GameGear),
            "MegaDrive" => Ok(Self::MegaDrive),
            _ => Err(format!("invalid VDP variant string: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TmsMode {
    Graphics1,
    Graphics2,
    Text,
    Multicolor,
}

/// Rasterizer selection, resolved whenever a mode bit changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Tms(TmsMode),
    Mode4,
    Mode5,
    Mode5Interlaced,
}

/// State derived from the register file. Never saved; always rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub render_mode: RenderMode,
    pub width: u16,
    pub height: u16,
    pub h40: bool,
    pub interlace: bool,
    /// Interlace mode 2 (double resolution)
    pub im2: bool,
    pub hc_table: HcTable,
    pub sat: SatWindow,
}

impl DisplayConfig {
    pub fn resolve(variant: VdpVariant, regs: &[u8; NUM_REGISTERS]) -> Self {
        let mode5 = variant == VdpVariant::MegaDrive && (regs[REG_MODE2] & MODE2_M5) != 0;
        let m1 = (regs[REG_MODE2] & MODE2_DMA_ENABLE) != 0;
        let m2 = (regs[REG_MODE1] & MODE1_HV_LATCH) != 0;
        let m3 = (regs[REG_MODE2] & MODE2_V30_MODE) != 0;
        let m4 = (regs[REG_MODE1] & MODE1_M4) != 0;

        if mode5 {
            let h40 = (regs[REG_MODE4] & MODE4_H40) != 0;
            let interlace = (regs[REG_MODE4] & MODE4_INTERLACE) != 0;
            let im2 = (regs[REG_MODE4] & MODE4_INTERLACE_MASK) == MODE4_INTERLACE_MASK;
            return Self {
                render_mode: if im2 { RenderMode::Mode5Interlaced } else { RenderMode::Mode5 },
                width: if h40 { 320 } else { 256 },
                height: if m3 { 240 } else { 224 },
                h40,
                interlace,
                im2,
                hc_table: if h40 { HcTable::H40 } else { HcTable::H32 },
                sat: SatWindow::new(regs[REG_SPRITE_TABLE], h40),
            };
        }

        let render_mode = match variant {
            VdpVariant::Tms9918 => RenderMode::Tms(tms_mode(m1, m2, m3)),
            VdpVariant::MegaDrive if !m4 => {
                log::debug!("Mode 4 bit clear on Mega Drive VDP, rendering as Mode 4");
                RenderMode::Mode4
            }
            _ if m4 => RenderMode::Mode4,
            _ => RenderMode::Tms(tms_mode(m1, m2, m3)),
        };

        let height = if render_mode == RenderMode::Mode4 && variant.has_extended_heights() && m2 {
            if m1 {
                224
            } else if m3 && variant != VdpVariant::MegaDrive {
                240
            } else {
                192
            }
        } else {
            192
        };

        Self {
            render_mode,
            width: 256,
            height,
            h40: false,
            interlace: false,
            im2: false,
            hc_table: HcTable::H32,
            sat: SatWindow::default(),
        }
    }
}

fn tms_mode(m1: bool, m2: bool, m3: bool) -> TmsMode {
    match (m1, m2, m3) {
        (true, _, _) => TmsMode::Text,
        (false, true, _) => TmsMode::Graphics2,
        (false, false, true) => TmsMode::Multicolor,
        (false, false, false) => TmsMode::Graphics1,
    }
}

/// Address/code latches shared by every port protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub address: u16,
    pub code: u8,
    pub pending: bool,
    /// A15-A14 from the second word of a 68k command
    pub address_high: u16,
    /// First byte of a byte-protocol command
    pub latch: u8,
    pub read_buffer: u16,
}

impl Vdp {
    /// Write an internal register and apply its side effects.
    pub fn write_register(&mut self, index: usize, value: u8, cycles: u64) {
        let index = index & (NUM_REGISTERS - 1);

        if !self.mode5_enabled() && (REG_MODE3..=REG_DMA_SRC_HI).contains(&index) {
            log::trace!("Register {index} write ignored outside Mode 5");
            return;
        }

        let changed = self.registers[index] ^ value;
        self.registers[index] = value;
        log::trace!("Register {index} set to {value:02X}");

        match index {
            REG_MODE1 => {
                if (changed & MODE1_HV_LATCH) != 0 && self.mode5_enabled() {
                    if (value & MODE1_HV_LATCH) != 0 {
                        self.latch_hv_counter(cycles);
                    } else {
                        self.release_hv_latch();
                    }
                }
                if (changed & (MODE1_M4 | MODE1_HV_LATCH)) != 0 {
                    self.refresh_display();
                }
            }
            REG_MODE2 => {
                if (changed & (MODE2_M5 | MODE2_V30_MODE | MODE2_DMA_ENABLE)) != 0 {
                    self.refresh_display();
                }
            }
            REG_SPRITE_TABLE | REG_MODE4 => self.refresh_display(),
            REG_BG_COLOR => self.refresh_backdrop(),
            _ => {}
        }
    }

    /// Re-derive everything that depends on mode bits.
    pub(crate) fn refresh_display(&mut self) {
        let previous = self.display;
        self.display = DisplayConfig::resolve(self.variant, &self.registers);

        if previous.render_mode != self.display.render_mode {
            log::debug!(
                "Render mode {:?} -> {:?} ({}x{})",
                previous.render_mode,
                self.display.render_mode,
                self.display.width,
                self.display.height
            );
        }
        if previous.sat != self.display.sat {
            self.banks.rebuild_sat(&self.display.sat);
        }
        self.update_fifo_latency();
        self.refresh_backdrop();
    }

    /// Colour index used for the border and transparent pixels.
    pub fn border_index(&self) -> usize {
        let reg = self.registers[REG_BG_COLOR] as usize;
        match self.display.render_mode {
            RenderMode::Mode5 | RenderMode::Mode5Interlaced => reg & 0x3F,
            RenderMode::Mode4 => 0x10 | (reg & 0x0F),
            RenderMode::Tms(_) => reg & 0x0F,
        }
    }

    pub(crate) fn refresh_backdrop(&mut self) {
        self.backdrop = match self.display.render_mode {
            // TMS colours come from a fixed palette; publish the index itself
            RenderMode::Tms(_) => self.border_index() as u16,
            _ => self.banks.cram_entry(self.border_index()),
        };
    }

    pub fn mode5_enabled(&self) -> bool {
        self.variant == VdpVariant::MegaDrive && (self.registers[REG_MODE2] & MODE2_M5) != 0
    }

    /// Mode 5 palette select; when clear only the low bit of each component is used.
    pub fn full_palette(&self) -> bool {
        (self.registers[REG_MODE1] & MODE1_M4) != 0
    }
}
