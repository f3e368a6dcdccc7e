//! 6809 memory access helpers and addressing modes.
//!
//! Words are big-endian. Direct addresses take their high byte from DP.
//! Indexed addressing uses a postbyte:
//!
//! | Postbyte  | Form        | Extra cycles |
//! |-----------|-------------|--------------|
//! | 0RRnnnnn  | n5,R        | 1            |
//! | 1RRi0000  | ,R+         | 2            |
//! | 1RRi0001  | ,R++        | 3            |
//! | 1RRi0010  | ,-R         | 2            |
//! | 1RRi0011  | ,--R        | 3            |
//! | 1RRi0100  | ,R          | 0            |
//! | 1RRi0101  | B,R         | 1            |
//! | 1RRi0110  | A,R         | 1            |
//! | 1RRi1000  | n8,R        | 1            |
//! | 1RRi1001  | n16,R       | 4            |
//! | 1RRi1011  | D,R         | 4            |
//! | 1xxi1100  | n8,PCR      | 1            |
//! | 1xxi1101  | n16,PCR     | 5            |
//! | 1xx11111  | [n16]       | 5            |
//! | 1xx01111  | n16         | 2            |
//!
//! The last row is undefined on the 6809. It is decoded as a plain
//! extended address, the indirect form minus the memory read.
//!
//! RR selects X, Y, U or S. When `i` is set the effective address is read
//! from memory, costing 3 more cycles.

use emu_core::Bus;

use crate::M6809;

/// Operand addressing mode of a memory-reference instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Immediate,
    Direct,
    Indexed,
    Extended,
}

impl Mode {
    /// Mode encoded in bits 5-4 of opcodes $80-$FF.
    pub(crate) const fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 4) & 0x03 {
            0 => Self::Immediate,
            1 => Self::Direct,
            2 => Self::Indexed,
            _ => Self::Extended,
        }
    }
}

/// Which stack a push or pull uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stack {
    S,
    U,
}

impl M6809 {
    pub(crate) fn fetch(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    pub(crate) fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let high = self.fetch(bus);
        let low = self.fetch(bus);
        u16::from_be_bytes([high, low])
    }

    pub(crate) fn read_word(bus: &mut impl Bus, addr: u16) -> u16 {
        let high = bus.read(addr);
        let low = bus.read(addr.wrapping_add(1));
        u16::from_be_bytes([high, low])
    }

    pub(crate) fn write_word(bus: &mut impl Bus, addr: u16, value: u16) {
        let [high, low] = value.to_be_bytes();
        bus.write(addr, high);
        bus.write(addr.wrapping_add(1), low);
    }

    fn stack_pointer(&mut self, stack: Stack) -> &mut u16 {
        match stack {
            Stack::S => &mut self.regs.s,
            Stack::U => &mut self.regs.u,
        }
    }

    pub(crate) fn push8(&mut self, bus: &mut impl Bus, stack: Stack, value: u8) {
        let sp = self.stack_pointer(stack);
        *sp = sp.wrapping_sub(1);
        let addr = *sp;
        bus.write(addr, value);
    }

    pub(crate) fn push16(&mut self, bus: &mut impl Bus, stack: Stack, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.push8(bus, stack, low);
        self.push8(bus, stack, high);
    }

    pub(crate) fn pull8(&mut self, bus: &mut impl Bus, stack: Stack) -> u8 {
        let sp = self.stack_pointer(stack);
        let addr = *sp;
        *sp = sp.wrapping_add(1);
        bus.read(addr)
    }

    pub(crate) fn pull16(&mut self, bus: &mut impl Bus, stack: Stack) -> u16 {
        let high = self.pull8(bus, stack);
        let low = self.pull8(bus, stack);
        u16::from_be_bytes([high, low])
    }

    /// PSHS/PSHU. Returns the number of bytes pushed.
    ///
    /// Order is PC, U/S, Y, X, DP, B, A, CC so that CC ends up on top.
    pub(crate) fn push_registers(&mut self, bus: &mut impl Bus, stack: Stack, mask: u8) -> u32 {
        let mut bytes = 0;
        if mask & 0x80 != 0 {
            self.push16(bus, stack, self.regs.pc);
            bytes += 2;
        }
        if mask & 0x40 != 0 {
            let other = match stack {
                Stack::S => self.regs.u,
                Stack::U => self.regs.s,
            };
            self.push16(bus, stack, other);
            bytes += 2;
        }
        if mask & 0x20 != 0 {
            self.push16(bus, stack, self.regs.y);
            bytes += 2;
        }
        if mask & 0x10 != 0 {
            self.push16(bus, stack, self.regs.x);
            bytes += 2;
        }
        if mask & 0x08 != 0 {
            self.push8(bus, stack, self.regs.dp);
            bytes += 1;
        }
        if mask & 0x04 != 0 {
            self.push8(bus, stack, self.regs.b);
            bytes += 1;
        }
        if mask & 0x02 != 0 {
            self.push8(bus, stack, self.regs.a);
            bytes += 1;
        }
        if mask & 0x01 != 0 {
            self.push8(bus, stack, self.regs.cc);
            bytes += 1;
        }
        bytes
    }

    /// PULS/PULU. Returns the number of bytes pulled.
    pub(crate) fn pull_registers(&mut self, bus: &mut impl Bus, stack: Stack, mask: u8) -> u32 {
        let mut bytes = 0;
        if mask & 0x01 != 0 {
            self.regs.cc = self.pull8(bus, stack);
            bytes += 1;
        }
        if mask & 0x02 != 0 {
            self.regs.a = self.pull8(bus, stack);
            bytes += 1;
        }
        if mask & 0x04 != 0 {
            self.regs.b = self.pull8(bus, stack);
            bytes += 1;
        }
        if mask & 0x08 != 0 {
            self.regs.dp = self.pull8(bus, stack);
            bytes += 1;
        }
        if mask & 0x10 != 0 {
            self.regs.x = self.pull16(bus, stack);
            bytes += 2;
        }
        if mask & 0x20 != 0 {
            self.regs.y = self.pull16(bus, stack);
            bytes += 2;
        }
        if mask & 0x40 != 0 {
            let value = self.pull16(bus, stack);
            match stack {
                Stack::S => self.regs.u = value,
                Stack::U => {
                    self.regs.s = value;
                    self.lines.nmi_armed = true;
                }
            }
            bytes += 2;
        }
        if mask & 0x80 != 0 {
            self.regs.pc = self.pull16(bus, stack);
            bytes += 2;
        }
        bytes
    }

    pub(crate) fn addr_direct(&mut self, bus: &mut impl Bus) -> u16 {
        let low = self.fetch(bus);
        u16::from_be_bytes([self.regs.dp, low])
    }

    fn index_register(&mut self, code: u8) -> &mut u16 {
        match code & 0x03 {
            0 => &mut self.regs.x,
            1 => &mut self.regs.y,
            2 => &mut self.regs.u,
            _ => &mut self.regs.s,
        }
    }

    /// Decode an indexed postbyte. Returns the effective address and the
    /// extra cycles from the postbyte table.
    pub(crate) fn addr_indexed(&mut self, bus: &mut impl Bus) -> (u16, u32) {
        let post = self.fetch(bus);
        let rr = post >> 5;

        if post & 0x80 == 0 {
            // 5-bit signed offset, never indirect
            let offset = ((post << 3) as i8) >> 3;
            let base = *self.index_register(rr);
            return (base.wrapping_add(offset as u16), 1);
        }

        let (ea, cycles) = match post & 0x0F {
            0x0 => {
                let reg = self.index_register(rr);
                let ea = *reg;
                *reg = reg.wrapping_add(1);
                (ea, 2)
            }
            0x1 => {
                let reg = self.index_register(rr);
                let ea = *reg;
                *reg = reg.wrapping_add(2);
                (ea, 3)
            }
            0x2 => {
                let reg = self.index_register(rr);
                *reg = reg.wrapping_sub(1);
                (*reg, 2)
            }
            0x3 => {
                let reg = self.index_register(rr);
                *reg = reg.wrapping_sub(2);
                (*reg, 3)
            }
            0x4 => (*self.index_register(rr), 0),
            0x5 => {
                let offset = self.regs.b as i8;
                (self.index_register(rr).wrapping_add(offset as u16), 1)
            }
            0x6 => {
                let offset = self.regs.a as i8;
                (self.index_register(rr).wrapping_add(offset as u16), 1)
            }
            0x8 => {
                let offset = self.fetch(bus) as i8;
                (self.index_register(rr).wrapping_add(offset as u16), 1)
            }
            0x9 => {
                let offset = self.fetch_word(bus);
                (self.index_register(rr).wrapping_add(offset), 4)
            }
            0xB => {
                let offset = self.regs.d();
                (self.index_register(rr).wrapping_add(offset), 4)
            }
            0xC => {
                let offset = self.fetch(bus) as i8;
                (self.regs.pc.wrapping_add(offset as u16), 1)
            }
            0xD => {
                let offset = self.fetch_word(bus);
                (self.regs.pc.wrapping_add(offset), 5)
            }
            // $9F/$BF/$DF/$FF are [n16]; the undefined non-indirect
            // forms fall through to a direct 16-bit address
            0xF => (self.fetch_word(bus), 2),
            // Undefined postbytes ($7, $A, $E): treated as ,R
            _ => (*self.index_register(rr), 0),
        };

        if post & 0x10 != 0 {
            (Self::read_word(bus, ea), cycles + 3)
        } else {
            (ea, cycles)
        }
    }

    /// Effective address for a memory operand. The returned cycles are the
    /// mode's share of the instruction cost: direct 2, indexed 2 + postbyte
    /// extras, extended 3.
    pub(crate) fn operand_address(&mut self, bus: &mut impl Bus, mode: Mode) -> (u16, u32) {
        match mode {
            Mode::Direct => (self.addr_direct(bus), 2),
            Mode::Indexed => {
                let (ea, extra) = self.addr_indexed(bus);
                (ea, 2 + extra)
            }
            Mode::Extended | Mode::Immediate => (self.fetch_word(bus), 3),
        }
    }

    /// 8-bit operand value; immediate operands cost no mode cycles.
    pub(crate) fn read_operand8(&mut self, bus: &mut impl Bus, mode: Mode) -> (u8, u32) {
        if mode == Mode::Immediate {
            return (self.fetch(bus), 0);
        }
        let (addr, cycles) = self.operand_address(bus, mode);
        (bus.read(addr), cycles)
    }

    /// 16-bit operand value; immediate operands cost no mode cycles.
    pub(crate) fn read_operand16(&mut self, bus: &mut impl Bus, mode: Mode) -> (u16, u32) {
        if mode == Mode::Immediate {
            return (self.fetch_word(bus), 0);
        }
        let (addr, cycles) = self.operand_address(bus, mode);
        (Self::read_word(bus, addr), cycles)
    }
}
