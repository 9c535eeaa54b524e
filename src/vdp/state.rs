//! Save states.
//!
//! Only primary state is captured. Everything derived from the register
//! file (render mode, HC table, SAT cache, backdrop, FIFO latency) is rebuilt
//! on load from the restored register file.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constants::*;
use super::dma::DmaRequest;
use super::registers::{Command, VdpVariant};
use super::status::Status;
use super::Vdp;
use crate::state::SaveState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VdpState {
    pub variant: VdpVariant,
    pub registers: Vec<u8>,
    pub vram: Vec<u8>,
    pub cram: Vec<u8>,
    pub vsram: Vec<u8>,
    pub command: Command,
    pub status: u16,
    pub dma: Option<DmaRequest>,
    pub fill_armed: bool,
    pub dma_end_cycles: u64,
    pub deferred_control: Vec<u16>,
    pub last_data_write: u16,
    pub fifo_count: u8,
    pub fifo_last_write: u64,
    pub hv_latch: Option<u16>,
    pub gg_cram_latch: u8,
    pub is_pal: bool,
}

fn check_len<E: serde::de::Error>(name: &str, bank: &[u8], expected: usize) -> Result<(), E> {
    if bank.len() != expected {
        return Err(E::custom(format!(
            "{name} is {} bytes, expected {expected}",
            bank.len()
        )));
    }
    Ok(())
}

impl VdpState {
    /// Size checks, run before anything is touched.
    fn validate<E: serde::de::Error>(&self) -> Result<(), E> {
        check_len("register file", &self.registers, NUM_REGISTERS)?;
        check_len("VRAM", &self.vram, VRAM_SIZE)?;
        check_len("CRAM", &self.cram, CRAM_SIZE)?;
        check_len("VSRAM", &self.vsram, VSRAM_SIZE)
    }
}

impl Vdp {
    pub fn save_state(&self) -> VdpState {
        VdpState {
            variant: self.variant,
            registers: self.registers.to_vec(),
            vram: self.banks.vram.clone(),
            cram: self.banks.cram.clone(),
            vsram: self.banks.vsram.clone(),
            command: self.command.clone(),
            status: self.status.bits(),
            dma: self.dma.clone(),
            fill_armed: self.fill_armed,
            dma_end_cycles: self.dma_end_cycles,
            deferred_control: self.deferred_control.clone(),
            last_data_write: self.last_data_write,
            fifo_count: self.fifo.count(),
            fifo_last_write: self.fifo.last_write(),
            hv_latch: self.hv_latch,
            gg_cram_latch: self.gg_cram_latch,
            is_pal: self.is_pal,
        }
    }

    /// Restore a snapshot. The core is left untouched when the snapshot is
    /// malformed.
    pub fn load_state(&mut self, state: &VdpState) -> serde_json::Result<()> {
        state.validate::<serde_json::Error>()?;

        let mut vdp = Vdp::new(state.variant);
        vdp.banks.vram.copy_from_slice(&state.vram);
        vdp.banks.cram.copy_from_slice(&state.cram);
        vdp.banks.vsram.copy_from_slice(&state.vsram);

        // Raw register bytes, bypassing the Mode 5 gate
        vdp.registers.copy_from_slice(&state.registers);
        vdp.refresh_display();
        vdp.banks.rebuild_sat(&vdp.display.sat);

        vdp.command = state.command.clone();
        vdp.status = Status::from_bits_truncate(state.status);
        vdp.dma = state.dma.clone();
        vdp.fill_armed = state.fill_armed;
        vdp.dma_end_cycles = state.dma_end_cycles;
        vdp.deferred_control = state.deferred_control.clone();
        vdp.last_data_write = state.last_data_write;
        vdp.fifo.restore(state.fifo_count, state.fifo_last_write);
        vdp.hv_latch = state.hv_latch;
        vdp.gg_cram_latch = state.gg_cram_latch;
        vdp.is_pal = state.is_pal;
        vdp.update_fifo_latency();
        vdp.banks.mark_all_dirty();

        *self = vdp;
        log::debug!("VDP state restored ({})", self.variant);
        Ok(())
    }

    pub fn serialize(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.save_state())
    }

    pub fn deserialize(&mut self, data: &[u8]) -> serde_json::Result<()> {
        let state: VdpState = serde_json::from_slice(data)?;
        self.load_state(&state)
    }
}

impl SaveState for Vdp {
    fn read_state(&self) -> Value {
        match serde_json::to_value(self.save_state()) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Error serializing VDP state: {e}");
                Value::Null
            }
        }
    }

    fn write_state(&mut self, state: &Value) {
        let result = VdpState::deserialize(state).and_then(|state| self.load_state(&state));
        if let Err(e) = result {
            log::warn!("Error deserializing VDP state: {e}");
        }
    }
}
