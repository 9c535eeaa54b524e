pub mod constants;
pub use constants::*;

pub mod banks;
pub use banks::MemoryBanks;

pub mod dma;
pub use dma::{DmaKind, DmaOps, DmaRequest};

pub mod fifo;
pub mod hvc;
pub mod port;

pub mod registers;
pub use registers::{Command, DisplayConfig, Protocol, RenderMode, TmsMode, VdpVariant};

pub mod state;
pub use state::VdpState;

pub mod status;
pub use status::Status;

use fifo::Fifo;

/// Sega Video Display Processor (VDP)
#[derive(Debug, Clone)]
pub struct Vdp {
    pub(crate) variant: VdpVariant,
    pub(crate) registers: [u8; NUM_REGISTERS],
    pub(crate) banks: MemoryBanks,
    pub(crate) status: Status,
    pub(crate) command: Command,
    pub(crate) fifo: Fifo,

    pub(crate) dma: Option<DmaRequest>,
    /// A fill waits for the data port write that supplies its value
    pub(crate) fill_armed: bool,
    pub(crate) dma_end_cycles: u64,
    /// Control word held back while a 68k bus DMA owns the bus
    pub(crate) deferred_control: Vec<u16>,
    pub(crate) last_data_write: u16,

    pub(crate) hv_latch: Option<u16>,
    pub(crate) gg_cram_latch: u8,
    pub(crate) is_pal: bool,

    pub(crate) display: DisplayConfig,
    /// Colour of the border entry in the current mode's CRAM format
    pub(crate) backdrop: u16,
}

impl Default for Vdp {
    fn default() -> Self {
        Self::new(VdpVariant::default())
    }
}

impl Vdp {
    pub fn new(variant: VdpVariant) -> Self {
        let registers = [0; NUM_REGISTERS];
        let mut vdp = Self {
            variant,
            registers,
            banks: MemoryBanks::new(),
            status: Status::power_on(false),
            command: Command::default(),
            fifo: Fifo::new(),
            dma: None,
            fill_armed: false,
            dma_end_cycles: 0,
            deferred_control: Vec::new(),
            last_data_write: 0,
            hv_latch: None,
            gg_cram_latch: 0,
            is_pal: false,
            display: DisplayConfig::resolve(variant, &registers),
            backdrop: 0,
        };
        vdp.refresh_display();
        vdp
    }

    /// Zero all state, keeping the variant and video standard.
    pub fn reset(&mut self) {
        let is_pal = self.is_pal;
        *self = Self::new(self.variant);
        self.set_pal(is_pal);
        log::debug!("VDP reset ({})", self.variant);
    }

    pub fn variant(&self) -> VdpVariant {
        self.variant
    }

    pub fn protocol(&self) -> Protocol {
        self.variant.protocol()
    }

    pub fn set_pal(&mut self, is_pal: bool) {
        self.is_pal = is_pal;
        self.status.set(Status::PAL, is_pal);
    }

    pub fn is_pal(&self) -> bool {
        self.is_pal
    }

    pub fn registers(&self) -> &[u8; NUM_REGISTERS] {
        &self.registers
    }

    pub fn vram(&self) -> &[u8] {
        &self.banks.vram
    }

    pub fn cram(&self) -> &[u8] {
        &self.banks.cram
    }

    pub fn vsram(&self) -> &[u8] {
        &self.banks.vsram
    }

    /// Internal copy of the sprite attribute table
    pub fn sat(&self) -> &[u8] {
        &self.banks.sat
    }

    pub fn take_dirty_tiles(&mut self) -> Vec<(u16, u8)> {
        self.banks.take_dirty_tiles()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn is_control_pending(&self) -> bool {
        self.command.pending
    }

    pub fn control_address(&self) -> u16 {
        self.command.address
    }

    pub fn control_code(&self) -> u8 {
        self.command.code
    }

    pub fn dma_request(&self) -> Option<&DmaRequest> {
        self.dma.as_ref()
    }

    pub fn fifo_count(&self) -> u8 {
        self.fifo.count()
    }

    pub fn fifo_latency(&self) -> u64 {
        self.fifo.latency()
    }

    pub fn render_mode(&self) -> RenderMode {
        self.display.render_mode
    }

    pub fn display_width(&self) -> u16 {
        self.display.width
    }

    pub fn display_height(&self) -> u16 {
        self.display.height
    }

    pub fn backdrop(&self) -> u16 {
        self.backdrop
    }

    pub fn auto_increment(&self) -> u8 {
        self.registers[REG_AUTO_INC]
    }

    pub fn display_enabled(&self) -> bool {
        (self.registers[REG_MODE2] & MODE2_DISPLAY_ENABLE) != 0
    }

    pub fn vint_enabled(&self) -> bool {
        (self.registers[REG_MODE2] & MODE2_VINT_ENABLE) != 0
    }

    pub fn hint_enabled(&self) -> bool {
        (self.registers[REG_MODE1] & MODE1_HINT_ENABLE) != 0
    }

    pub fn h40_mode(&self) -> bool {
        self.display.h40
    }

    pub fn sprite_table_address(&self) -> u16 {
        self.display.sat.base
    }

    pub(crate) fn in_active_display(&self) -> bool {
        !self.status.contains(Status::VBLANK) && self.display_enabled()
    }

    pub fn set_vblank(&mut self, active: bool) {
        if active {
            self.status.insert(Status::VBLANK | Status::VINT_PENDING);
        } else {
            self.status.remove(Status::VBLANK);
        }
    }

    pub fn vblank_pending(&self) -> bool {
        self.status.contains(Status::VINT_PENDING) && self.vint_enabled()
    }

    pub fn set_odd_field(&mut self, odd: bool) {
        self.status.set(Status::ODD_FIELD, odd);
    }

    pub fn flag_sprite_collision(&mut self) {
        self.status.insert(Status::SPRITE_COLLISION);
    }

    pub fn flag_sprite_overflow(&mut self) {
        self.status.insert(Status::SPRITE_OVERFLOW);
    }
}


#[cfg(test)]
mod tests_byte_protocol;



#[cfg(test)]
mod tests_fifo;


#[cfg(test)]
mod tests_properties;


#[cfg(test)]
mod bench_dma;
