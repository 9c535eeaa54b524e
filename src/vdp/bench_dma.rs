use super::*;
use crate::memory::{Memory, OpenBus};
use std::time::Instant;

#[test]
fn bench_dma_fill_performance() {
    let mut vdp = Vdp::new(VdpVariant::MegaDrive);
    vdp.write_control(0x8114, 0); // Mode 5, DMA enabled
    vdp.write_control(0x8F01, 0);

    let start = Instant::now();
    let iterations = 100;

    for i in 0..iterations {
        // Full 64KB fill, driven line by line like a host would
        vdp.write_control(0x93FF, 0);
        vdp.write_control(0x94FF, 0);
        vdp.write_control(0x9780, 0);
        vdp.write_control(0x4000, 0);
        vdp.write_control(0x0080, 0);
        vdp.write_data((i as u16) << 8, 0);

        let mut cycles = 0;
        while vdp.dma_in_progress() {
            cycles += CYCLES_PER_LINE;
            vdp.advance_dma(cycles, &mut OpenBus);
        }
    }

    let duration = start.elapsed();
    println!("DMA Fill ({} iterations) took: {:?}", iterations, duration);
}

#[test]
fn bench_dma_68k_transfer_performance() {
    let rom: Vec<u8> = (0..0x20000).map(|i| (i * 7) as u8).collect();
    let mut memory = Memory::new(rom);
    let mut vdp = Vdp::new(VdpVariant::MegaDrive);
    vdp.write_control(0x8114, 0);
    vdp.write_control(0x8F02, 0);
    vdp.set_vblank(true);

    let start = Instant::now();
    let iterations = 1000;

    for _ in 0..iterations {
        // 8KB of tiles per transfer
        vdp.write_control(0x9300, 0);
        vdp.write_control(0x9410, 0);
        vdp.write_control(0x4000, 0);
        vdp.write_control(0x0080, 0);
        vdp.advance_dma(0, &mut memory);
    }

    let duration = start.elapsed();
    println!("68k DMA ({} iterations) took: {:?}", iterations, duration);
    assert!(!vdp.dma_in_progress());
}
