// VDP Control Codes (bits 0-3 of the code register)
pub const VRAM_READ: u8 = 0x00;
pub const VRAM_WRITE: u8 = 0x01;
pub const CRAM_WRITE: u8 = 0x03;
pub const VSRAM_READ: u8 = 0x04;
pub const VSRAM_WRITE: u8 = 0x05;
pub const CRAM_READ: u8 = 0x08;
pub const VRAM_READ_8BIT: u8 = 0x0C;

// Code register bits
pub const CODE_TARGET_MASK: u8 = 0x0F;
pub const CODE_DMA: u8 = 0x20;
pub const CODE_VRAM_COPY: u8 = 0x10;

// Register indices
pub const REG_MODE1: usize = 0;
pub const REG_MODE2: usize = 1;
pub const REG_PLANE_A: usize = 2;
pub const REG_PLANE_B: usize = 4;
pub const REG_SPRITE_TABLE: usize = 5;
pub const REG_BG_COLOR: usize = 7;
pub const REG_MODE3: usize = 11;
pub const REG_MODE4: usize = 12;
pub const REG_HSCROLL: usize = 13;
pub const REG_AUTO_INC: usize = 15;
pub const REG_DMA_LEN_LO: usize = 19;
pub const REG_DMA_LEN_HI: usize = 20;
pub const REG_DMA_SRC_LO: usize = 21;
pub const REG_DMA_SRC_MID: usize = 22;
pub const REG_DMA_SRC_HI: usize = 23;

// Mode bits
pub const MODE1_HV_LATCH: u8 = 0x02; // M2 in Mode 4 / TMS
pub const MODE1_M4: u8 = 0x04; // palette select in Mode 5
pub const MODE1_HINT_ENABLE: u8 = 0x10;
pub const MODE2_M5: u8 = 0x04;
pub const MODE2_V30_MODE: u8 = 0x08; // M3 in Mode 4 / TMS
pub const MODE2_DMA_ENABLE: u8 = 0x10; // M1 in Mode 4 / TMS
pub const MODE2_VINT_ENABLE: u8 = 0x20;
pub const MODE2_DISPLAY_ENABLE: u8 = 0x40;
pub const MODE2_TMS_16K: u8 = 0x80;
pub const MODE4_H40: u8 = 0x01;
pub const MODE4_INTERLACE: u8 = 0x02;
pub const MODE4_INTERLACE_MASK: u8 = 0x06;

// DMA Modes (register 23 bits 7-6)
pub const DMA_MODE_MASK: u8 = 0xC0;
pub const DMA_MODE_FILL: u8 = 0x80;
pub const DMA_MODE_COPY: u8 = 0xC0;

/// Bytes (or words for 68k bus transfers) moved per line, indexed by
/// `[blanked][h40]`.
pub const DMA_TIMING: [[u32; 2]; 2] = [[16, 18], [167, 205]];

// Timing, in master clocks
pub const CYCLES_PER_LINE: u64 = 3420;
pub const LINES_NTSC: u64 = 262;
pub const LINES_PAL: u64 = 313;

/// FIFO slot latency in H40 mode
pub const FIFO_LATENCY_H40: u64 = 190;
/// FIFO slot latency in H32 mode
pub const FIFO_LATENCY_H32: u64 = 214;
pub const FIFO_DEPTH: u8 = 4;

// Memory sizes
pub const VRAM_SIZE: usize = 0x10000;
pub const CRAM_SIZE: usize = 128;
pub const VSRAM_SIZE: usize = 128;
pub const SAT_SIZE: usize = 0x400;
pub const NUM_TILES: usize = VRAM_SIZE / 32;

pub const NUM_REGISTERS: usize = 32;

/// Byte protocols only decode 14 address bits.
pub const BYTE_ADDRESS_MASK: u16 = 0x3FFF;
