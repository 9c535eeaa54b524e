#![no_main]
use libfuzzer_sys::fuzz_target;
use genteel_vdp::vdp::DmaOps;
use genteel_vdp::{Memory, Vdp, VdpVariant};

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }

    let mut vdp = Vdp::new(VdpVariant::MegaDrive);
    let mut memory = Memory::new(data.to_vec());
    // Mode 5 with DMA and display enabled so the FIFO is active
    vdp.write_control(0x8154, 0);
    vdp.write_control(0x8F00 | data[4] as u16, 0);

    // First 4 bytes set up the command
    let ctrl1 = ((data[0] as u16) << 8) | (data[1] as u16);
    let ctrl2 = ((data[2] as u16) << 8) | (data[3] as u16);
    let mut cycles = vdp.write_control(ctrl1, 0);
    cycles = vdp.write_control(ctrl2, cycles);

    // Remaining bytes are data port writes
    for chunk in data[5..].chunks(2) {
        let value = if chunk.len() == 2 {
            ((chunk[0] as u16) << 8) | (chunk[1] as u16)
        } else {
            chunk[0] as u16
        };

        cycles = vdp.write_data(value, cycles) + 16;
        while vdp.dma_in_progress() {
            cycles = vdp.advance_dma(cycles, &mut memory).max(cycles + 1);
        }
    }

    // Also try reading, and round-trip the state
    let _ = vdp.read_data();
    if let Ok(state) = vdp.serialize() {
        let mut restored = Vdp::default();
        assert!(restored.deserialize(&state).is_ok());
        assert_eq!(restored.save_state(), vdp.save_state());
    }
});
