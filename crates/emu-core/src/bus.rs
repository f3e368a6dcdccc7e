//! Memory and I/O bus interface.

/// Memory and I/O bus interface.
///
/// The CPU reaches memory and peripherals only through this trait. The bus
/// decodes each address and routes it to the owning device.
pub trait Bus {
    /// Read a byte. May have device side effects (e.g. clearing an
    /// interrupt flag).
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte.
    fn write(&mut self, address: u16, value: u8);

    /// Read a byte without side effects.
    fn peek(&self, address: u16) -> u8;
}

/// Flat 64K RAM bus for CPU tests.
pub struct SimpleBus {
    memory: Box<[u8; 0x1_0000]>,
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            memory: Box::new([0; 0x1_0000]),
        }
    }

    /// Copy `data` into memory starting at `address` (wrapping at $FFFF).
    pub fn load(&mut self, address: u16, data: &[u8]) {
        let mut addr = address;
        for &byte in data {
            self.memory[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    /// Store a big-endian word, e.g. an interrupt vector.
    pub fn load_word(&mut self, address: u16, value: u16) {
        self.load(address, &value.to_be_bytes());
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, address: u16) -> u8 {
        self.memory[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.memory[address as usize] = value;
    }

    fn peek(&self, address: u16) -> u8 {
        self.memory[address as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_wraps_at_top_of_memory() {
        let mut bus = SimpleBus::new();
        bus.load(0xFFFF, &[0x12, 0x34]);
        assert_eq!(bus.peek(0xFFFF), 0x12);
        assert_eq!(bus.peek(0x0000), 0x34);
    }

    #[test]
    fn load_word_is_big_endian() {
        let mut bus = SimpleBus::new();
        bus.load_word(0xFFFE, 0xA027);
        assert_eq!(bus.read(0xFFFE), 0xA0);
        assert_eq!(bus.read(0xFFFF), 0x27);
    }
}
