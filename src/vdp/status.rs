use bitflags::bitflags;

bitflags! {
    /// VDP status word.
    ///
    /// The layout is the one returned by a 68k status read; byte protocols
    /// only expose the low byte, where bits 5-7 carry the same meaning.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Status: u16 {
        const PAL = 1 << 0;
        const DMA_BUSY = 1 << 1;
        const HBLANK = 1 << 2;
        const VBLANK = 1 << 3;
        const ODD_FIELD = 1 << 4;
        const SPRITE_COLLISION = 1 << 5;
        const SPRITE_OVERFLOW = 1 << 6;
        const VINT_PENDING = 1 << 7;
        const FIFO_FULL = 1 << 8;
        const FIFO_EMPTY = 1 << 9;
    }
}

impl Status {
    /// Bits cleared as a side effect of a control port read.
    pub const READ_CLEAR: Status = Status::VINT_PENDING
        .union(Status::SPRITE_COLLISION)
        .union(Status::SPRITE_OVERFLOW);

    /// Status after power-on: FIFO empty, everything else clear.
    pub fn power_on(pal: bool) -> Self {
        let mut status = Status::FIFO_EMPTY;
        status.set(Status::PAL, pal);
        status
    }

    /// Snapshot returned to the CPU, clearing the read-and-clear bits.
    pub fn take_for_read(&mut self) -> Status {
        let value = *self;
        self.remove(Status::READ_CLEAR);
        value
    }
}
