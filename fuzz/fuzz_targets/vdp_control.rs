#![no_main]
use libfuzzer_sys::fuzz_target;
use genteel_vdp::vdp::DmaOps;
use genteel_vdp::{OpenBus, Vdp, VdpVariant};

const VARIANTS: [VdpVariant; 5] = [
    VdpVariant::Tms9918,
    VdpVariant::Sms1,
    VdpVariant::Sms2,
    VdpVariant::GameGear,
    VdpVariant::MegaDrive,
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, data)) = data.split_first() else {
        return;
    };
    let mut vdp = Vdp::new(VARIANTS[selector as usize % VARIANTS.len()]);
    let mut cycles = 0u64;

    // Each pair of bytes is a control port write
    for chunk in data.chunks(2) {
        let value = if chunk.len() == 2 {
            ((chunk[0] as u16) << 8) | (chunk[1] as u16)
        } else {
            chunk[0] as u16
        };

        cycles = vdp.write_control(value, cycles) + 8;
        while vdp.dma_in_progress() {
            cycles = vdp.advance_dma(cycles, &mut OpenBus).max(cycles + 1);
        }
    }

    // Read status and counters to exercise those paths
    let _ = vdp.read_control(cycles);
    let _ = vdp.read_hv_counter(cycles);
});
