use super::*;

/// Mode 5, display on, active area, VRAM write at 0.
fn active_vdp() -> Vdp {
    let mut vdp = Vdp::new(VdpVariant::MegaDrive);
    vdp.write_control(0x8144, 0);
    vdp.write_control(0x8F02, 0);
    vdp.write_control(0x4000, 0);
    vdp.write_control(0x0000, 0);
    vdp
}

#[test]
fn test_fifo_saturation_stalls_cpu() {
    let mut vdp = active_vdp();
    let latency = vdp.fifo_latency();
    assert_eq!(latency, FIFO_LATENCY_H32 * 2, "VRAM target takes two slots");

    for i in 0..4 {
        assert_eq!(vdp.write_data(i, 0), 0, "Write {i} fits in the FIFO");
    }
    assert_eq!(vdp.fifo_count(), 4);
    assert_ne!(vdp.read_control(0) & Status::FIFO_FULL.bits(), 0);

    let resume = vdp.write_data(0xFFFF, 0);
    assert!(resume >= latency, "Fifth write stalls until a slot frees up");

    // All five writes still land in VRAM
    assert_eq!(vdp.banks.read_vram_word(8), 0xFFFF);
}

#[test]
fn test_fifo_drains_between_writes() {
    let mut vdp = active_vdp();
    let latency = vdp.fifo_latency();

    let mut cycles = 0;
    for i in 0..16 {
        assert_eq!(vdp.write_data(i, cycles), cycles);
        cycles += latency;
    }
    assert!(vdp.fifo_count() <= 1);
}

#[test]
fn test_fifo_empty_after_latency() {
    let mut vdp = active_vdp();
    for i in 0..4 {
        vdp.write_data(i, 0);
    }
    let status = vdp.read_control(10 * vdp.fifo_latency());
    assert_ne!(status & Status::FIFO_EMPTY.bits(), 0);
    assert_eq!(status & Status::FIFO_FULL.bits(), 0);
    assert_eq!(vdp.fifo_count(), 0);
}

#[test]
fn test_fifo_bypassed_in_vblank() {
    let mut vdp = active_vdp();
    vdp.set_vblank(true);
    for i in 0..10 {
        assert_eq!(vdp.write_data(i, 0), 0);
    }
    assert_eq!(vdp.fifo_count(), 0);
}

#[test]
fn test_fifo_latency_follows_target_and_width() {
    let mut vdp = active_vdp();
    assert_eq!(vdp.fifo_latency(), FIFO_LATENCY_H32 * 2);

    // CRAM write
    vdp.write_control(0xC000, 0);
    vdp.write_control(0x0000, 0);
    assert_eq!(vdp.fifo_latency(), FIFO_LATENCY_H32);

    vdp.write_control(0x8C81, 0);
    vdp.write_control(0xC000, 0);
    vdp.write_control(0x0000, 0);
    assert_eq!(vdp.fifo_latency(), FIFO_LATENCY_H40);

    vdp.write_control(0x4000, 0);
    vdp.write_control(0x0000, 0);
    assert_eq!(vdp.fifo_latency(), FIFO_LATENCY_H40 * 2);
}
