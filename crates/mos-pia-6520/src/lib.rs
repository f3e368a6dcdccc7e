//! MOS 6520 / Motorola MC6821 Peripheral Interface Adapter (PIA).
//!
//! Two 8-bit ports, each with a data direction register, a control
//! register, an edge-sensitive interrupt input (CA1/CB1) and a second
//! control line (CA2/CB2) that is either an interrupt input or an output.
//!
//! # Registers (RS1, RS0)
//!
//! | Reg | CRx bit 2 = 1 | CRx bit 2 = 0 |
//! |-----|---------------|---------------|
//! | 0   | Port A data   | DDRA          |
//! | 1   | CRA           | CRA           |
//! | 2   | Port B data   | DDRB          |
//! | 3   | CRB           | CRB           |
//!
//! # Control register
//!
//! | Bit | Meaning |
//! |-----|---------|
//! | 7   | C1 interrupt flag (read only) |
//! | 6   | C2 interrupt flag (read only, input mode) |
//! | 5   | C2 direction (1 = output) |
//! | 4   | C2 input: active edge (1 = rising). Output: 1 = manual |
//! | 3   | C2 input: interrupt enable. Manual output: C2 level |
//! | 2   | Data register select (1 = port, 0 = DDR) |
//! | 1   | C1 active edge (1 = rising) |
//! | 0   | C1 interrupt enable |
//!
//! Reading a port data register clears both interrupt flags of that side.

const CR_C1_IRQ_ENABLE: u8 = 0x01;
const CR_C1_RISING: u8 = 0x02;
const CR_DATA_SELECT: u8 = 0x04;
const CR_C2_IRQ_ENABLE: u8 = 0x08;
const CR_C2_RISING: u8 = 0x10;
const CR_C2_OUTPUT: u8 = 0x20;
const CR_IRQ2_FLAG: u8 = 0x40;
const CR_IRQ1_FLAG: u8 = 0x80;

/// One side (A or B) of the PIA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PiaPort {
    /// Output register.
    pub output: u8,
    /// Data direction register (1 = output).
    pub ddr: u8,
    /// Control register, including the two interrupt flags in bits 7-6.
    pub control: u8,
    /// Last level seen on C1 (for edge detection).
    pub c1: bool,
    /// Last level seen on C2 when it is an input.
    pub c2: bool,
}

impl PiaPort {
    fn set_c1(&mut self, state: bool) {
        let rising = self.control & CR_C1_RISING != 0;
        let triggered = if rising {
            !self.c1 && state
        } else {
            self.c1 && !state
        };
        if triggered {
            self.control |= CR_IRQ1_FLAG;
        }
        self.c1 = state;
    }

    #[cfg(test)]
    fn set_c2(&mut self, state: bool) {
        if self.control & CR_C2_OUTPUT != 0 {
            return;
        }
        let rising = self.control & CR_C2_RISING != 0;
        let triggered = if rising {
            !self.c2 && state
        } else {
            self.c2 && !state
        };
        if triggered {
            self.control |= CR_IRQ2_FLAG;
        }
        self.c2 = state;
    }

    fn irq(&self) -> bool {
        let c1 = self.control & CR_IRQ1_FLAG != 0 && self.control & CR_C1_IRQ_ENABLE != 0;
        let c2 = self.control & CR_IRQ2_FLAG != 0
            && self.control & CR_C2_IRQ_ENABLE != 0
            && self.control & CR_C2_OUTPUT == 0;
        c1 || c2
    }

    /// Level driven on C2 in manual output mode. Inputs and handshake
    /// modes read as high (pulled up).
    fn c2_output(&self) -> bool {
        let manual = CR_C2_OUTPUT | CR_C2_RISING;
        if self.control & manual == manual {
            self.control & CR_C2_IRQ_ENABLE != 0
        } else {
            true
        }
    }

    fn write_control(&mut self, value: u8) {
        self.control = (self.control & (CR_IRQ1_FLAG | CR_IRQ2_FLAG)) | (value & 0x3F);
        if value & CR_C2_OUTPUT != 0 {
            self.control &= !CR_IRQ2_FLAG;
        }
    }
}

/// MOS 6520 / MC6821 PIA.
pub struct Pia6520 {
    a: PiaPort,
    b: PiaPort,
    /// Levels presented on the port A pins by external hardware.
    pub input_a: u8,
    /// Levels presented on the port B pins by external hardware.
    pub input_b: u8,
}

impl Pia6520 {
    /// Create a PIA in its reset state (all lines inputs, interrupts off).
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: PiaPort::default(),
            b: PiaPort::default(),
            input_a: 0xFF,
            input_b: 0xFF,
        }
    }

    /// Clear all registers, as the RESET pin does.
    pub fn reset(&mut self) {
        self.a = PiaPort::default();
        self.b = PiaPort::default();
    }

    /// Read a register, clearing interrupt flags on a port data read.
    pub fn read(&mut self, reg: u8) -> u8 {
        let value = self.peek(reg);
        match reg & 0x03 {
            0 if self.a.control & CR_DATA_SELECT != 0 => {
                self.a.control &= !(CR_IRQ1_FLAG | CR_IRQ2_FLAG);
            }
            2 if self.b.control & CR_DATA_SELECT != 0 => {
                self.b.control &= !(CR_IRQ1_FLAG | CR_IRQ2_FLAG);
            }
            _ => {}
        }
        value
    }

    /// Read a register without side effects.
    #[must_use]
    pub fn peek(&self, reg: u8) -> u8 {
        match reg & 0x03 {
            0 => {
                if self.a.control & CR_DATA_SELECT != 0 {
                    self.read_port_a()
                } else {
                    self.a.ddr
                }
            }
            1 => self.a.control,
            2 => {
                if self.b.control & CR_DATA_SELECT != 0 {
                    self.read_port_b()
                } else {
                    self.b.ddr
                }
            }
            _ => self.b.control,
        }
    }

    /// Write a register.
    pub fn write(&mut self, reg: u8, value: u8) {
        match reg & 0x03 {
            0 => {
                if self.a.control & CR_DATA_SELECT != 0 {
                    self.a.output = value;
                } else {
                    self.a.ddr = value;
                }
            }
            1 => self.a.write_control(value),
            2 => {
                if self.b.control & CR_DATA_SELECT != 0 {
                    self.b.output = value;
                } else {
                    self.b.ddr = value;
                }
            }
            _ => self.b.write_control(value),
        }
    }

    /// Drive the CA1 input. Sets the flag on the configured edge.
    pub fn set_ca1(&mut self, state: bool) {
        self.a.set_c1(state);
    }

    /// Drive the CB1 input. Sets the flag on the configured edge.
    pub fn set_cb1(&mut self, state: bool) {
        self.b.set_c1(state);
    }

    // The Dragon drives every C2 line as an output, so nothing outside the
    // chip's own tests feeds C2 input edges.

    /// Drive CA2 when it is configured as an input.
    #[cfg(test)]
    pub fn set_ca2(&mut self, state: bool) {
        self.a.set_c2(state);
    }

    /// Drive CB2 when it is configured as an input.
    #[cfg(test)]
    pub fn set_cb2(&mut self, state: bool) {
        self.b.set_c2(state);
    }

    /// IRQA output (active when asserted).
    #[must_use]
    pub fn irq_a(&self) -> bool {
        self.a.irq()
    }

    /// IRQB output (active when asserted).
    #[must_use]
    pub fn irq_b(&self) -> bool {
        self.b.irq()
    }

    /// Level on CA2 as seen by external hardware.
    #[must_use]
    pub fn ca2_output(&self) -> bool {
        self.a.c2_output()
    }

    /// Level on CB2 as seen by external hardware.
    #[must_use]
    pub fn cb2_output(&self) -> bool {
        self.b.c2_output()
    }

    /// Port A output value (bits configured as inputs read 0).
    #[must_use]
    pub fn port_a_output(&self) -> u8 {
        self.a.output & self.a.ddr
    }

    /// Port B output value (bits configured as inputs read 0).
    #[must_use]
    pub fn port_b_output(&self) -> u8 {
        self.b.output & self.b.ddr
    }

    /// Port B direction register.
    #[must_use]
    pub fn ddr_b(&self) -> u8 {
        self.b.ddr
    }

    /// Control register A (diagnostic use).
    #[must_use]
    pub fn cra(&self) -> u8 {
        self.a.control
    }

    /// Control register B (diagnostic use).
    #[must_use]
    pub fn crb(&self) -> u8 {
        self.b.control
    }

    /// Both port states, for snapshots.
    #[must_use]
    pub fn state(&self) -> (PiaPort, PiaPort) {
        (self.a, self.b)
    }

    /// Restore both port states from a snapshot.
    pub fn restore(&mut self, a: PiaPort, b: PiaPort) {
        self.a = a;
        self.b = b;
    }

    // --- Internal helpers ---

    fn read_port_a(&self) -> u8 {
        (self.a.output & self.a.ddr) | (self.input_a & !self.a.ddr)
    }

    fn read_port_b(&self) -> u8 {
        (self.b.output & self.b.ddr) | (self.input_b & !self.b.ddr)
    }
}

impl Default for Pia6520 {
    fn default() -> Self {
        Self::new()
    }
}
