use genteel_vdp::vdp::{DmaOps, CYCLES_PER_LINE};
use genteel_vdp::{Memory, Vdp, VdpVariant};
use std::time::Instant;

fn main() {
    env_logger::init();

    let variant = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<VdpVariant>())
        .transpose()
        .unwrap_or_else(|e| {
            eprintln!("{e}");
            std::process::exit(2);
        })
        .unwrap_or_default();

    let rom: Vec<u8> = (0..0x40000).map(|i| (i % 251) as u8).collect();
    let mut memory = Memory::new(rom);
    let mut vdp = Vdp::new(variant);

    let start = Instant::now();
    let frames = 1000u64;
    let lines_per_frame = vdp.lines_per_frame();

    for frame in 0..frames {
        let frame_start = frame * lines_per_frame * CYCLES_PER_LINE;
        match variant {
            VdpVariant::MegaDrive => run_mode5_frame(&mut vdp, &mut memory, frame_start),
            _ => run_byte_frame(&mut vdp, frame_start),
        }
    }

    let duration = start.elapsed();
    println!("Variant: {variant}");
    println!("Time for {} frames: {:?}", frames, duration);
    println!("FPS: {}", frames as f64 / duration.as_secs_f64());
}

/// One frame of a typical game loop: VBlank DMA, then port traffic.
fn run_mode5_frame(vdp: &mut Vdp, memory: &mut Memory, start: u64) {
    if start == 0 {
        for word in [0x8004, 0x8174, 0x8C81, 0x8578, 0x8F02] {
            vdp.write_control(word, 0);
        }
    }

    vdp.set_vblank(true);
    vdp.write_control(0x9300, start);
    vdp.write_control(0x9410, start);
    vdp.write_control(0x9500, start);
    vdp.write_control(0x9600, start);
    vdp.write_control(0x9700, start);
    vdp.write_control(0x4000, start);
    vdp.write_control(0x0080, start);
    let mut cycles = start;
    while vdp.dma_in_progress() {
        cycles = vdp.advance_dma(cycles, memory);
    }
    vdp.read_control(cycles);
    vdp.set_vblank(false);

    vdp.write_control(0x7C00, cycles);
    vdp.write_control(0x0003, cycles);
    for i in 0..320u16 {
        cycles = vdp.write_data(i, cycles) + 40;
    }
    let _ = vdp.read_hv_counter(cycles);
}

fn run_byte_frame(vdp: &mut Vdp, start: u64) {
    vdp.write_control(0x00, start);
    vdp.write_control(0x40, start);
    for i in 0..0x4000u16 {
        vdp.write_data(i & 0xFF, start);
    }
    vdp.set_vblank(true);
    vdp.read_control(start);
    vdp.set_vblank(false);
}
