use super::*;

/// Issue a two-byte command on the control port.
fn command(vdp: &mut Vdp, first: u8, second: u8) {
    vdp.write_control(first as u16, 0);
    vdp.write_control(second as u16, 0);
}

#[test]
fn test_sms_vram_write_and_read() {
    let mut vdp = Vdp::new(VdpVariant::Sms1);

    command(&mut vdp, 0x00, 0x40);
    assert_eq!(vdp.control_code(), 1);
    vdp.write_data(0xAB, 0);
    vdp.write_data(0xCD, 0);
    assert_eq!(&vdp.vram()[0..2], &[0xAB, 0xCD]);
    assert_eq!(vdp.control_address(), 0x0002);

    // Read setup prefetches and steps past the first byte
    command(&mut vdp, 0x00, 0x00);
    assert_eq!(vdp.control_address(), 0x0001);
    assert_eq!(vdp.read_data(), 0xAB);
    assert_eq!(vdp.read_data(), 0xCD);
    assert_eq!(vdp.read_data(), 0x00);
}

#[test]
fn test_sms_first_byte_updates_low_address() {
    let mut vdp = Vdp::new(VdpVariant::Sms2);
    command(&mut vdp, 0x00, 0x41);
    assert_eq!(vdp.control_address(), 0x0100);

    vdp.write_control(0x55, 0);
    assert!(vdp.is_control_pending());
    assert_eq!(vdp.control_address(), 0x0155);
}

#[test]
fn test_sms_register_write() {
    let mut vdp = Vdp::new(VdpVariant::Sms1);
    command(&mut vdp, 0x26, 0x81);
    assert_eq!(vdp.registers()[1], 0x26);
    assert!(!vdp.is_control_pending());

    // Index is masked to 4 bits
    command(&mut vdp, 0xFF, 0x98);
    assert_eq!(vdp.registers()[8], 0xFF);
}

#[test]
fn test_sms_address_wraps_at_16k() {
    let mut vdp = Vdp::new(VdpVariant::Sms1);
    command(&mut vdp, 0xFF, 0x7F);
    assert_eq!(vdp.control_address(), 0x3FFF);
    vdp.write_data(0x11, 0);
    vdp.write_data(0x22, 0);
    assert_eq!(vdp.vram()[0x3FFF], 0x11);
    assert_eq!(vdp.vram()[0x0000], 0x22);
}

#[test]
fn test_sms_cram_and_backdrop() {
    let mut vdp = Vdp::new(VdpVariant::Sms1);
    command(&mut vdp, 0x04, 0x80); // Mode 4
    assert_eq!(vdp.render_mode(), RenderMode::Mode4);
    command(&mut vdp, 0x03, 0x87); // Border colour 3 of the sprite palette

    command(&mut vdp, 0x05, 0xC0);
    vdp.write_data(0x3F, 0);
    assert_eq!(vdp.cram()[10], 0x3F);
    assert_eq!(vdp.control_address(), 0x0006);

    command(&mut vdp, 0x13, 0xC0);
    vdp.write_data(0xEA, 0);
    // Only 6 bits of colour
    assert_eq!(vdp.backdrop(), 0x2A);
}

#[test]
fn test_sms_status_byte() {
    let mut vdp = Vdp::new(VdpVariant::Sms1);
    vdp.set_vblank(true);
    vdp.flag_sprite_overflow();
    vdp.flag_sprite_collision();

    assert_eq!(vdp.read_control(0), 0xE0);
    assert_eq!(vdp.read_control(0), 0x00);
}

#[test]
fn test_sms_mode4_heights() {
    let mut vdp = Vdp::new(VdpVariant::Sms2);
    command(&mut vdp, 0x06, 0x80); // M4 | M2
    assert_eq!(vdp.display_height(), 192);
    command(&mut vdp, 0x10, 0x81); // M1
    assert_eq!(vdp.display_height(), 224);
    command(&mut vdp, 0x08, 0x81); // M3
    assert_eq!(vdp.display_height(), 240);
}

#[test]
fn test_game_gear_cram_latch() {
    let mut vdp = Vdp::new(VdpVariant::GameGear);
    command(&mut vdp, 0x00, 0xC0);

    vdp.write_data(0x34, 0);
    // Even byte only latches
    assert_eq!(&vdp.cram()[0..2], &[0x00, 0x00]);

    vdp.write_data(0x12, 0);
    // 12-bit colour from the pair
    assert_eq!(&vdp.cram()[0..2], &[0x34, 0x02]);
    assert_eq!(vdp.control_address(), 0x0002);
}

#[test]
fn test_tms_first_byte_only_latches() {
    let mut vdp = Vdp::new(VdpVariant::Tms9918);
    command(&mut vdp, 0x00, 0x41);
    assert_eq!(vdp.control_address(), 0x0100);

    vdp.write_control(0x55, 0);
    assert!(vdp.is_control_pending());
    assert_eq!(vdp.control_address(), 0x0100);
}

#[test]
fn test_tms_register_write() {
    let mut vdp = Vdp::new(VdpVariant::Tms9918);
    // Index is masked to 3 bits
    command(&mut vdp, 0xF1, 0x8F);
    assert_eq!(vdp.registers()[7], 0xF1);
    assert_eq!(vdp.render_mode(), RenderMode::Tms(TmsMode::Graphics1));
    assert_eq!(vdp.backdrop(), 0x01);
}

#[test]
fn test_tms_4k_address_scramble() {
    let mut vdp = Vdp::new(VdpVariant::Tms9918);

    command(&mut vdp, 0x40, 0x40);
    vdp.write_data(0x99, 0);
    assert_eq!(vdp.vram()[0x0080], 0x99);
    assert_eq!(vdp.vram()[0x0040], 0x00);

    // 16K mode uses the address as is
    command(&mut vdp, 0x80, 0x81);
    command(&mut vdp, 0x40, 0x40);
    vdp.write_data(0x77, 0);
    assert_eq!(vdp.vram()[0x0040], 0x77);
}

#[test]
fn test_byte_protocol_ignores_extended_registers() {
    let mut vdp = Vdp::new(VdpVariant::Sms1);
    command(&mut vdp, 0x81, 0x8C);
    assert_eq!(vdp.registers()[12], 0x00);
}
