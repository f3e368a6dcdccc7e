//! 6809 fetch-decode-execute loop.
//!
//! Opcodes $80-$FF share a layout: bit 6 selects A or B (or the 16-bit
//! register pair), bits 5-4 select the addressing mode, and the low nibble
//! selects the operation. Read-modify-write operations on memory ($00-$0F,
//! $60-$7F) and on the accumulators ($40-$5F) share the low-nibble
//! operation table too.

use emu_core::{Bus, Cpu, Observable, Ticks, Value};

use crate::addressing::{Mode, Stack};
use crate::alu::{self, AluResult};
use crate::registers::{CC_C, CC_E, CC_F, CC_H, CC_I, CC_N, CC_V, CC_Z, Registers};
use crate::vectors;

/// Idle state entered by SYNC or CWAI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitState {
    #[default]
    Running,
    /// SYNC: waiting for any interrupt line, masked or not.
    Sync,
    /// CWAI: entire state already stacked, waiting for an unmasked interrupt.
    Cwai,
}

/// Interrupt inputs as seen at the last instruction boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterruptLines {
    /// IRQ input (level).
    pub irq: bool,
    /// FIRQ input (level).
    pub firq: bool,
    /// NMI edge latched and not yet serviced.
    pub nmi_pending: bool,
    /// NMI is ignored after reset until S has been loaded.
    pub nmi_armed: bool,
}

/// Motorola 6809 CPU.
pub struct M6809 {
    pub regs: Registers,
    pub(crate) lines: InterruptLines,
    wait: WaitState,
    cycles: Ticks,
}

impl M6809 {
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            lines: InterruptLines::default(),
            wait: WaitState::Running,
            cycles: Ticks::ZERO,
        }
    }

    /// Drive the FIRQ line (level sensitive).
    pub fn set_firq(&mut self, asserted: bool) {
        self.lines.firq = asserted;
    }

    /// Interrupt inputs and NMI latch.
    #[must_use]
    pub fn lines(&self) -> InterruptLines {
        self.lines
    }

    #[must_use]
    pub fn wait_state(&self) -> WaitState {
        self.wait
    }

    /// Cycles executed since power-on.
    #[must_use]
    pub fn total_cycles(&self) -> Ticks {
        self.cycles
    }

    /// Replace the complete CPU state, e.g. from a snapshot.
    pub fn restore(&mut self, regs: Registers, lines: InterruptLines, wait: WaitState, cycles: Ticks) {
        self.regs = regs;
        self.lines = lines;
        self.wait = wait;
        self.cycles = cycles;
    }

    fn set_s(&mut self, value: u16) {
        self.regs.s = value;
        self.lines.nmi_armed = true;
    }

    fn cpu_step(&mut self, bus: &mut impl Bus) -> u32 {
        if self.wait == WaitState::Sync {
            let any = self.lines.irq || self.lines.firq || self.lines.nmi_pending;
            if !any {
                return 1;
            }
            self.wait = WaitState::Running;
        }

        if let Some(cycles) = self.service_interrupts(bus) {
            return cycles;
        }

        if self.wait == WaitState::Cwai {
            return 1;
        }

        let opcode = self.fetch(bus);
        self.execute(bus, opcode)
    }

    /// Acknowledge the highest-priority unmasked interrupt, if any.
    /// Priority: NMI, FIRQ, IRQ.
    fn service_interrupts(&mut self, bus: &mut impl Bus) -> Option<u32> {
        if self.lines.nmi_pending && self.lines.nmi_armed {
            self.lines.nmi_pending = false;
            return Some(self.enter_interrupt(bus, vectors::NMI, true, CC_I | CC_F));
        }
        if self.lines.firq && !self.regs.flag(CC_F) {
            return Some(self.enter_interrupt(bus, vectors::FIRQ, false, CC_I | CC_F));
        }
        if self.lines.irq && !self.regs.flag(CC_I) {
            return Some(self.enter_interrupt(bus, vectors::IRQ, true, CC_I));
        }
        None
    }

    fn enter_interrupt(&mut self, bus: &mut impl Bus, vector: u16, entire: bool, mask: u8) -> u32 {
        let cycles = if self.wait == WaitState::Cwai {
            // CWAI already stacked everything with E set
            self.wait = WaitState::Running;
            7
        } else if entire {
            self.regs.cc |= CC_E;
            self.push_registers(bus, Stack::S, 0xFF);
            19
        } else {
            self.regs.cc &= !CC_E;
            self.push_registers(bus, Stack::S, 0x81);
            10
        };
        self.regs.cc |= mask;
        self.regs.pc = Self::read_word(bus, vector);
        cycles
    }

    /// SWI/SWI2/SWI3: stack entire state and jump through `vector`.
    fn software_interrupt(&mut self, bus: &mut impl Bus, vector: u16, mask: u8) {
        self.regs.cc |= CC_E;
        self.push_registers(bus, Stack::S, 0xFF);
        self.regs.cc |= mask;
        self.regs.pc = Self::read_word(bus, vector);
    }

    fn illegal(&self, opcode: u16, cycles: u32) -> u32 {
        log::trace!(
            "illegal opcode ${opcode:02X} at ${:04X}",
            self.regs.pc.wrapping_sub(1)
        );
        cycles
    }

    /// Branch condition for the low nibble of $20-$2F (and $1021-$102F).
    fn condition(&self, code: u8) -> bool {
        let c = self.regs.flag(CC_C);
        let z = self.regs.flag(CC_Z);
        let n = self.regs.flag(CC_N);
        let v = self.regs.flag(CC_V);
        match code & 0x0F {
            0x0 => true,        // BRA
            0x1 => false,       // BRN
            0x2 => !(c || z),   // BHI
            0x3 => c || z,      // BLS
            0x4 => !c,          // BCC/BHS
            0x5 => c,           // BCS/BLO
            0x6 => !z,          // BNE
            0x7 => z,           // BEQ
            0x8 => !v,          // BVC
            0x9 => v,           // BVS
            0xA => !n,          // BPL
            0xB => n,           // BMI
            0xC => n == v,      // BGE
            0xD => n != v,      // BLT
            0xE => !z && n == v, // BGT
            _ => z || n != v,   // BLE
        }
    }

    fn accumulator(&self, use_b: bool) -> u8 {
        if use_b { self.regs.b } else { self.regs.a }
    }

    fn set_accumulator(&mut self, use_b: bool, value: u8) {
        if use_b {
            self.regs.b = value;
        } else {
            self.regs.a = value;
        }
    }

    /// Shared read-modify-write operation table ($x0-$xF of $00, $40-$70).
    /// Returns `None` for the undefined slots; TST and CLR return the value
    /// to write back (TST writes nothing, signalled by `write = false`).
    fn modify(&mut self, op: u8, value: u8) -> Option<(u8, bool)> {
        let cc = self.regs.cc;
        let AluResult { value, cc } = match op & 0x0F {
            0x0 => alu::neg8(cc, value),
            0x3 => alu::com8(cc, value),
            0x4 => alu::lsr8(cc, value),
            0x6 => alu::ror8(cc, value),
            0x7 => alu::asr8(cc, value),
            0x8 => alu::asl8(cc, value),
            0x9 => alu::rol8(cc, value),
            0xA => alu::dec8(cc, value),
            0xC => alu::inc8(cc, value),
            0xD => {
                self.regs.cc = alu::logic8(cc, value);
                return Some((value, false));
            }
            0xF => {
                self.regs.cc = alu::clr(cc);
                return Some((0, true));
            }
            _ => return None,
        };
        self.regs.cc = cc;
        Some((value, true))
    }

    fn execute(&mut self, bus: &mut impl Bus, opcode: u8) -> u32 {
        match opcode {
            // =================================================================
            // Memory read-modify-write: direct, indexed, extended
            // =================================================================
            0x00..=0x0F | 0x60..=0x7F => {
                let mode = match opcode >> 4 {
                    0x0 => Mode::Direct,
                    0x6 => Mode::Indexed,
                    _ => Mode::Extended,
                };
                if opcode & 0x0F == 0x0E {
                    // JMP: dir 3, idx 3+, ext 4
                    let (addr, cycles) = self.operand_address(bus, mode);
                    self.regs.pc = addr;
                    return 1 + cycles;
                }
                if matches!(opcode & 0x0F, 0x1 | 0x2 | 0x5 | 0xB) {
                    return self.illegal(u16::from(opcode), 2);
                }
                // NEG..CLR: dir 6, idx 6+, ext 7
                let (addr, cycles) = self.operand_address(bus, mode);
                let value = bus.read(addr);
                if let Some((result, write)) = self.modify(opcode, value)
                    && write
                {
                    bus.write(addr, result);
                }
                4 + cycles
            }

            // =================================================================
            // Prefixes and miscellaneous inherent
            // =================================================================
            0x10 => {
                let op = self.fetch(bus);
                self.execute_page2(bus, op)
            }
            0x11 => {
                let op = self.fetch(bus);
                self.execute_page3(bus, op)
            }
            // NOP
            0x12 => 2,
            // SYNC
            0x13 => {
                self.wait = WaitState::Sync;
                4
            }
            // LBRA
            0x16 => {
                let offset = self.fetch_word(bus);
                self.regs.pc = self.regs.pc.wrapping_add(offset);
                5
            }
            // LBSR
            0x17 => {
                let offset = self.fetch_word(bus);
                self.push16(bus, Stack::S, self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(offset);
                9
            }
            // DAA
            0x19 => {
                let r = alu::daa(self.regs.cc, self.regs.a);
                self.regs.a = r.value;
                self.regs.cc = r.cc;
                2
            }
            // ORCC #
            0x1A => {
                let value = self.fetch(bus);
                self.regs.cc |= value;
                3
            }
            // ANDCC #
            0x1C => {
                let value = self.fetch(bus);
                self.regs.cc &= value;
                3
            }
            // SEX
            0x1D => {
                self.regs.a = if self.regs.b & 0x80 != 0 { 0xFF } else { 0x00 };
                let d = self.regs.d();
                self.regs.set_flag(CC_N, d & 0x8000 != 0);
                self.regs.set_flag(CC_Z, d == 0);
                2
            }
            // EXG
            0x1E => {
                let post = self.fetch(bus);
                let (r1, r2) = (post >> 4, post & 0x0F);
                let v1 = self.regs.by_code(r1);
                let v2 = self.regs.by_code(r2);
                self.regs.set_by_code(r1, v2);
                self.regs.set_by_code(r2, v1);
                if r1 == 0x4 || r2 == 0x4 {
                    self.lines.nmi_armed = true;
                }
                8
            }
            // TFR
            0x1F => {
                let post = self.fetch(bus);
                let (src, dst) = (post >> 4, post & 0x0F);
                let value = self.regs.by_code(src);
                self.regs.set_by_code(dst, value);
                if dst == 0x4 {
                    self.lines.nmi_armed = true;
                }
                6
            }

            // =================================================================
            // Short branches (3 cycles, taken or not)
            // =================================================================
            0x20..=0x2F => {
                let offset = self.fetch(bus) as i8;
                if self.condition(opcode) {
                    self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
                }
                3
            }

            // =================================================================
            // LEA, stack, returns
            // =================================================================
            0x30 => {
                let (ea, extra) = self.addr_indexed(bus);
                self.regs.x = ea;
                self.regs.set_flag(CC_Z, ea == 0);
                4 + extra
            }
            0x31 => {
                let (ea, extra) = self.addr_indexed(bus);
                self.regs.y = ea;
                self.regs.set_flag(CC_Z, ea == 0);
                4 + extra
            }
            0x32 => {
                let (ea, extra) = self.addr_indexed(bus);
                self.set_s(ea);
                4 + extra
            }
            0x33 => {
                let (ea, extra) = self.addr_indexed(bus);
                self.regs.u = ea;
                4 + extra
            }
            // PSHS
            0x34 => {
                let mask = self.fetch(bus);
                5 + self.push_registers(bus, Stack::S, mask)
            }
            // PULS
            0x35 => {
                let mask = self.fetch(bus);
                5 + self.pull_registers(bus, Stack::S, mask)
            }
            // PSHU
            0x36 => {
                let mask = self.fetch(bus);
                5 + self.push_registers(bus, Stack::U, mask)
            }
            // PULU
            0x37 => {
                let mask = self.fetch(bus);
                5 + self.pull_registers(bus, Stack::U, mask)
            }
            // RTS
            0x39 => {
                self.regs.pc = self.pull16(bus, Stack::S);
                5
            }
            // ABX
            0x3A => {
                self.regs.x = self.regs.x.wrapping_add(u16::from(self.regs.b));
                3
            }
            // RTI
            0x3B => {
                self.regs.cc = self.pull8(bus, Stack::S);
                if self.regs.flag(CC_E) {
                    self.pull_registers(bus, Stack::S, 0xFE);
                    15
                } else {
                    self.regs.pc = self.pull16(bus, Stack::S);
                    6
                }
            }
            // CWAI #
            0x3C => {
                let mask = self.fetch(bus);
                self.regs.cc &= mask;
                self.regs.cc |= CC_E;
                self.push_registers(bus, Stack::S, 0xFF);
                self.wait = WaitState::Cwai;
                20
            }
            // MUL
            0x3D => {
                let r = alu::mul(self.regs.cc, self.regs.a, self.regs.b);
                self.regs.set_d(r.value);
                self.regs.cc = r.cc;
                11
            }
            // SWI
            0x3F => {
                self.software_interrupt(bus, vectors::SWI, CC_I | CC_F);
                19
            }

            // =================================================================
            // Inherent accumulator operations: $4x on A, $5x on B
            // =================================================================
            0x40..=0x5F => {
                let use_b = opcode & 0x10 != 0;
                let value = self.accumulator(use_b);
                match self.modify(opcode, value) {
                    Some((result, _)) => {
                        self.set_accumulator(use_b, result);
                        2
                    }
                    None => self.illegal(u16::from(opcode), 2),
                }
            }

            // =================================================================
            // Accumulator and 16-bit register operations, all modes
            // =================================================================
            0x80..=0xFF => self.execute_register_op(bus, opcode),

            _ => self.illegal(u16::from(opcode), 2),
        }
    }

    /// Opcodes $80-$FF. Cycle costs are expressed as a base plus the
    /// mode's share from `operand_address` (immediate 0, direct 2, indexed
    /// 2 + extras, extended 3).
    fn execute_register_op(&mut self, bus: &mut impl Bus, opcode: u8) -> u32 {
        let use_b = opcode & 0x40 != 0;
        let mode = Mode::from_opcode(opcode);
        let immediate = mode == Mode::Immediate;

        match opcode & 0x0F {
            // SUB, CMP, SBC
            0x0 | 0x1 | 0x2 => {
                let (m, cycles) = self.read_operand8(bus, mode);
                let borrow = opcode & 0x0F == 0x2 && self.regs.flag(CC_C);
                let r = alu::sub8(self.regs.cc, self.accumulator(use_b), m, borrow);
                self.regs.cc = r.cc;
                if opcode & 0x0F != 0x1 {
                    self.set_accumulator(use_b, r.value);
                }
                2 + cycles
            }
            // SUBD (A side) / ADDD (B side)
            0x3 => {
                let (m, cycles) = self.read_operand16(bus, mode);
                let d = self.regs.d();
                let r = if use_b {
                    alu::add16(self.regs.cc, d, m)
                } else {
                    alu::sub16(self.regs.cc, d, m)
                };
                self.regs.set_d(r.value);
                self.regs.cc = r.cc;
                4 + cycles
            }
            // AND
            0x4 => {
                let (m, cycles) = self.read_operand8(bus, mode);
                let value = self.accumulator(use_b) & m;
                self.set_accumulator(use_b, value);
                self.regs.cc = alu::logic8(self.regs.cc, value);
                2 + cycles
            }
            // BIT
            0x5 => {
                let (m, cycles) = self.read_operand8(bus, mode);
                let value = self.accumulator(use_b) & m;
                self.regs.cc = alu::logic8(self.regs.cc, value);
                2 + cycles
            }
            // LD
            0x6 => {
                let (m, cycles) = self.read_operand8(bus, mode);
                self.set_accumulator(use_b, m);
                self.regs.cc = alu::logic8(self.regs.cc, m);
                2 + cycles
            }
            // ST
            0x7 => {
                if immediate {
                    return self.illegal(u16::from(opcode), 2);
                }
                let (addr, cycles) = self.operand_address(bus, mode);
                let value = self.accumulator(use_b);
                bus.write(addr, value);
                self.regs.cc = alu::logic8(self.regs.cc, value);
                2 + cycles
            }
            // EOR
            0x8 => {
                let (m, cycles) = self.read_operand8(bus, mode);
                let value = self.accumulator(use_b) ^ m;
                self.set_accumulator(use_b, value);
                self.regs.cc = alu::logic8(self.regs.cc, value);
                2 + cycles
            }
            // ADC, ADD
            0x9 | 0xB => {
                let (m, cycles) = self.read_operand8(bus, mode);
                let carry = opcode & 0x0F == 0x9 && self.regs.flag(CC_C);
                let r = alu::add8(self.regs.cc, self.accumulator(use_b), m, carry);
                self.set_accumulator(use_b, r.value);
                self.regs.cc = r.cc;
                2 + cycles
            }
            // OR
            0xA => {
                let (m, cycles) = self.read_operand8(bus, mode);
                let value = self.accumulator(use_b) | m;
                self.set_accumulator(use_b, value);
                self.regs.cc = alu::logic8(self.regs.cc, value);
                2 + cycles
            }
            // CMPX (A side) / LDD (B side)
            0xC => {
                let (m, cycles) = self.read_operand16(bus, mode);
                if use_b {
                    self.regs.set_d(m);
                    self.regs.cc = alu::logic16(self.regs.cc, m);
                    3 + cycles
                } else {
                    self.regs.cc = alu::sub16(self.regs.cc, self.regs.x, m).cc;
                    4 + cycles
                }
            }
            // BSR / JSR (A side), STD (B side)
            0xD => {
                if use_b {
                    if immediate {
                        return self.illegal(u16::from(opcode), 2);
                    }
                    let (addr, cycles) = self.operand_address(bus, mode);
                    let d = self.regs.d();
                    Self::write_word(bus, addr, d);
                    self.regs.cc = alu::logic16(self.regs.cc, d);
                    3 + cycles
                } else if immediate {
                    // BSR
                    let offset = self.fetch(bus) as i8;
                    self.push16(bus, Stack::S, self.regs.pc);
                    self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
                    7
                } else {
                    let (addr, cycles) = self.operand_address(bus, mode);
                    self.push16(bus, Stack::S, self.regs.pc);
                    self.regs.pc = addr;
                    5 + cycles
                }
            }
            // LDX (A side) / LDU (B side)
            0xE => {
                let (m, cycles) = self.read_operand16(bus, mode);
                if use_b {
                    self.regs.u = m;
                } else {
                    self.regs.x = m;
                }
                self.regs.cc = alu::logic16(self.regs.cc, m);
                3 + cycles
            }
            // STX (A side) / STU (B side)
            _ => {
                if immediate {
                    return self.illegal(u16::from(opcode), 2);
                }
                let (addr, cycles) = self.operand_address(bus, mode);
                let value = if use_b { self.regs.u } else { self.regs.x };
                Self::write_word(bus, addr, value);
                self.regs.cc = alu::logic16(self.regs.cc, value);
                3 + cycles
            }
        }
    }

    /// $10 prefix: long branches, SWI2, CMPD, CMPY, LDY/STY, LDS/STS.
    /// Costs one cycle more than the unprefixed equivalents.
    fn execute_page2(&mut self, bus: &mut impl Bus, opcode: u8) -> u32 {
        let mode = Mode::from_opcode(opcode);
        match opcode {
            // LBRN..LBLE: 5 cycles, 6 when taken
            0x21..=0x2F => {
                let offset = self.fetch_word(bus);
                if self.condition(opcode) {
                    self.regs.pc = self.regs.pc.wrapping_add(offset);
                    6
                } else {
                    5
                }
            }
            // SWI2
            0x3F => {
                self.software_interrupt(bus, vectors::SWI2, 0);
                20
            }
            // CMPD
            0x83 | 0x93 | 0xA3 | 0xB3 => {
                let (m, cycles) = self.read_operand16(bus, mode);
                self.regs.cc = alu::sub16(self.regs.cc, self.regs.d(), m).cc;
                5 + cycles
            }
            // CMPY
            0x8C | 0x9C | 0xAC | 0xBC => {
                let (m, cycles) = self.read_operand16(bus, mode);
                self.regs.cc = alu::sub16(self.regs.cc, self.regs.y, m).cc;
                5 + cycles
            }
            // LDY
            0x8E | 0x9E | 0xAE | 0xBE => {
                let (m, cycles) = self.read_operand16(bus, mode);
                self.regs.y = m;
                self.regs.cc = alu::logic16(self.regs.cc, m);
                4 + cycles
            }
            // STY
            0x9F | 0xAF | 0xBF => {
                let (addr, cycles) = self.operand_address(bus, mode);
                Self::write_word(bus, addr, self.regs.y);
                self.regs.cc = alu::logic16(self.regs.cc, self.regs.y);
                4 + cycles
            }
            // LDS
            0xCE | 0xDE | 0xEE | 0xFE => {
                let (m, cycles) = self.read_operand16(bus, mode);
                self.set_s(m);
                self.regs.cc = alu::logic16(self.regs.cc, m);
                4 + cycles
            }
            // STS
            0xDF | 0xEF | 0xFF => {
                let (addr, cycles) = self.operand_address(bus, mode);
                Self::write_word(bus, addr, self.regs.s);
                self.regs.cc = alu::logic16(self.regs.cc, self.regs.s);
                4 + cycles
            }
            _ => self.illegal(0x1000 | u16::from(opcode), 3),
        }
    }

    /// $11 prefix: SWI3, CMPU, CMPS.
    fn execute_page3(&mut self, bus: &mut impl Bus, opcode: u8) -> u32 {
        let mode = Mode::from_opcode(opcode);
        match opcode {
            // SWI3
            0x3F => {
                self.software_interrupt(bus, vectors::SWI3, 0);
                20
            }
            // CMPU
            0x83 | 0x93 | 0xA3 | 0xB3 => {
                let (m, cycles) = self.read_operand16(bus, mode);
                self.regs.cc = alu::sub16(self.regs.cc, self.regs.u, m).cc;
                5 + cycles
            }
            // CMPS
            0x8C | 0x9C | 0xAC | 0xBC => {
                let (m, cycles) = self.read_operand16(bus, mode);
                self.regs.cc = alu::sub16(self.regs.cc, self.regs.s, m).cc;
                5 + cycles
            }
            _ => self.illegal(0x1100 | u16::from(opcode), 3),
        }
    }
}

impl Default for M6809 {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu for M6809 {
    type Registers = Registers;

    fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let cycles = self.cpu_step(bus);
        self.cycles += cycles;
        cycles
    }

    fn pc(&self) -> u32 {
        u32::from(self.regs.pc)
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.wait != WaitState::Running
    }

    fn set_irq(&mut self, asserted: bool) {
        self.lines.irq = asserted;
    }

    fn nmi(&mut self) {
        if self.lines.nmi_armed {
            self.lines.nmi_pending = true;
        }
    }

    fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.regs = Registers::new();
        self.lines = InterruptLines::default();
        self.wait = WaitState::Running;
        self.regs.pc = Self::read_word(bus, vectors::RESET);
    }
}

impl Observable for M6809 {
    fn query(&self, path: &str) -> Option<Value> {
        let cc = self.regs.cc;
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "b" => Some(self.regs.b.into()),
            "d" => Some(self.regs.d().into()),
            "dp" => Some(self.regs.dp.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "u" => Some(self.regs.u.into()),
            "s" => Some(self.regs.s.into()),
            "cc" => Some(cc.into()),
            "cc.c" => Some((cc & CC_C != 0).into()),
            "cc.v" => Some((cc & CC_V != 0).into()),
            "cc.z" => Some((cc & CC_Z != 0).into()),
            "cc.n" => Some((cc & CC_N != 0).into()),
            "cc.i" => Some((cc & CC_I != 0).into()),
            "cc.h" => Some((cc & CC_H != 0).into()),
            "cc.f" => Some((cc & CC_F != 0).into()),
            "cc.e" => Some((cc & CC_E != 0).into()),
            "irq" => Some(self.lines.irq.into()),
            "firq" => Some(self.lines.firq.into()),
            "cycles" => Some(self.cycles.get().into()),
            "halted" => Some(self.is_halted().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc", "a", "b", "d", "dp", "x", "y", "u", "s", "cc", "cc.c", "cc.v", "cc.z", "cc.n",
            "cc.i", "cc.h", "cc.f", "cc.e", "irq", "firq", "cycles", "halted",
        ]
    }
}
