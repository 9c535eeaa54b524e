//! VDP Property-Based Tests
//!
//! Uses proptest for property testing of the port protocols.

use super::*;
use crate::memory::OpenBus;
use proptest::prelude::*;

fn any_variant() -> impl Strategy<Value = VdpVariant> {
    prop_oneof![
        Just(VdpVariant::Tms9918),
        Just(VdpVariant::Sms1),
        Just(VdpVariant::Sms2),
        Just(VdpVariant::GameGear),
        Just(VdpVariant::MegaDrive),
    ]
}

#[derive(Debug, Clone)]
enum PortOp {
    Control(u16),
    Data(u16),
    ReadData,
    ReadStatus,
}

fn any_port_op() -> impl Strategy<Value = PortOp> {
    prop_oneof![
        any::<u16>().prop_map(PortOp::Control),
        any::<u16>().prop_map(PortOp::Data),
        Just(PortOp::ReadData),
        Just(PortOp::ReadStatus),
    ]
}

fn any_dma_kind() -> impl Strategy<Value = DmaKind> {
    prop_oneof![
        Just(DmaKind::VBusToVram),
        Just(DmaKind::VramFill),
        Just(DmaKind::VramCopy),
    ]
}

proptest! {
    /// With Mode 5 on every register reads back what was written
    #[test]
    fn register_round_trip_mode5(index in 0usize..NUM_REGISTERS, value in 0u8..=0xFF) {
        prop_assume!(index != REG_MODE2);
        let mut vdp = Vdp::new(VdpVariant::MegaDrive);
        vdp.write_control(0x8104, 0);

        vdp.write_control(0x8000 | ((index as u16) << 8) | value as u16, 0);
        prop_assert_eq!(vdp.registers()[index], value);
    }

    /// Without Mode 5, registers 11-23 ignore writes
    #[test]
    fn register_gating_outside_mode5(index in 0usize..NUM_REGISTERS, value in 0u8..=0xFF) {
        let mut vdp = Vdp::new(VdpVariant::MegaDrive);
        vdp.write_register(index, value, 0);

        let expected = if (REG_MODE3..=REG_DMA_SRC_HI).contains(&index) { 0 } else { value };
        prop_assert_eq!(vdp.registers()[index], expected);
    }

    /// A register write never leaves a command half-latched
    #[test]
    fn register_write_never_sets_pending(index in 0u16..32, value in 0u16..=0xFF) {
        let mut vdp = Vdp::new(VdpVariant::MegaDrive);
        vdp.write_control(0x8000 | (index << 8) | value, 0);
        prop_assert!(!vdp.is_control_pending());
    }

    /// Two command words always OR their address halves together
    #[test]
    fn two_word_command_address(first in 0u16..0x8000, second in 0u16..=0xFFFF) {
        let mut vdp = Vdp::new(VdpVariant::MegaDrive);
        vdp.write_control(first, 0);
        prop_assert!(vdp.is_control_pending());
        // Keep CD5 clear so no DMA can start
        let second = second & !0x0080;
        vdp.write_control(second, 0);

        prop_assert!(!vdp.is_control_pending());
        prop_assert_eq!(vdp.control_address(), ((second & 3) << 14) | (first & 0x3FFF));
    }

    /// The backdrop always follows the CRAM entry picked by register 7
    #[test]
    fn backdrop_tracks_cram(index in 0u16..64, color in 0u16..=0x0FFF) {
        let mut vdp = Vdp::new(VdpVariant::MegaDrive);
        vdp.write_control(0x8104, 0);
        vdp.write_control(0x8700 | index, 0);

        let addr = index * 2;
        vdp.write_control(0xC000 | addr, 0);
        vdp.write_control(0x0000, 0);
        vdp.write_data(color, 0);

        prop_assert_eq!(vdp.backdrop(), banks::pack_cram_color(color));
    }

    /// Arbitrary port traffic never panics and keeps the core consistent
    #[test]
    fn random_port_traffic(variant in any_variant(), ops in prop::collection::vec(any_port_op(), 0..64)) {
        let mut vdp = Vdp::new(variant);
        let mut cycles = 0u64;

        for op in ops {
            cycles += 100;
            let resume = match op {
                PortOp::Control(value) => vdp.write_control(value, cycles),
                PortOp::Data(value) => vdp.write_data(value, cycles),
                PortOp::ReadData => {
                    vdp.read_data();
                    cycles
                }
                PortOp::ReadStatus => {
                    vdp.read_control(cycles);
                    cycles
                }
            };
            prop_assert!(resume >= cycles);
            cycles = resume;

            while vdp.dma_in_progress() {
                cycles = vdp.advance_dma(cycles, &mut OpenBus).max(cycles + 1);
            }
        }

        prop_assert!(vdp.fifo_count() <= FIFO_DEPTH);
        prop_assert_eq!(vdp.vram().len(), VRAM_SIZE);
        if variant.protocol() != Protocol::Word {
            prop_assert!(vdp.control_address() <= BYTE_ADDRESS_MASK);
        }
    }

    /// Given enough lines at the blanked rate every transfer finishes
    #[test]
    fn dma_completes_with_enough_cycles(kind in any_dma_kind(), length in 1u32..=0x10000) {
        let mut vdp = Vdp::new(VdpVariant::MegaDrive);
        vdp.write_control(0x8114, 0); // Display off, DMA on
        vdp.write_control(0x8F02, 0);
        vdp.write_control(0x9300 | (length & 0xFF) as u16, 0);
        vdp.write_control(0x9400 | ((length >> 8) & 0xFF) as u16, 0);

        let mode = match kind {
            DmaKind::VBusToVram => 0x9700,
            DmaKind::VramFill => 0x9780,
            DmaKind::VramCopy => 0x97C0,
        };
        vdp.write_control(mode, 0);
        vdp.write_control(0x4000, 0);
        vdp.write_control(if kind == DmaKind::VramCopy { 0x00C0 } else { 0x0080 }, 0);
        if kind == DmaKind::VramFill {
            vdp.write_data(0x5A00, 0);
        }

        // Fill and copy ran their first line already; bus DMA waits for the host
        let rate = match kind {
            DmaKind::VramFill => DMA_TIMING[1][0],
            _ => DMA_TIMING[1][0] / 2,
        } as u64;
        let deadline = (length as u64 / rate + 2) * CYCLES_PER_LINE;
        let mut cycles = if kind == DmaKind::VBusToVram { 0 } else { CYCLES_PER_LINE };
        while vdp.dma_in_progress() && cycles < deadline {
            vdp.advance_dma(cycles, &mut OpenBus);
            cycles += CYCLES_PER_LINE;
        }

        prop_assert!(!vdp.dma_in_progress());
        prop_assert_eq!(vdp.dma_remaining(), 0);
        prop_assert_eq!(vdp.registers()[REG_DMA_LEN_LO], 0);
        prop_assert_eq!(vdp.registers()[REG_DMA_LEN_HI], 0);
    }
}
