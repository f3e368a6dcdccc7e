//! Cartridge port ROM with bank switching.
//!
//! The cartridge window is `$C000-$FEFF`. Images larger than 16K are split
//! into 16K banks; writing `v` to `$FF40` selects bank `v mod count`.

use log::debug;

use crate::error::{DragonError, Result};

/// Bytes per cartridge bank.
pub const BANK_SIZE: usize = 0x4000;

/// Largest bank count the 8-bit bank register can address.
pub const MAX_BANKS: usize = 256;

/// Cartridge ROM image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    data: Vec<u8>,
    bank_count: usize,
    bank: usize,
    autostart: bool,
}

impl Cartridge {
    /// Wrap a cartridge image.
    ///
    /// `autostart` models the CART line being wired to a clock, which
    /// makes BASIC jump into the cartridge at power-on.
    pub fn new(data: Vec<u8>, autostart: bool) -> Result<Self> {
        if data.is_empty() {
            return Err(DragonError::invalid_image("cartridge", "image is empty"));
        }
        let bank_count = data.len().div_ceil(BANK_SIZE);
        if bank_count > MAX_BANKS {
            return Err(DragonError::invalid_image(
                "cartridge",
                format!("{} bytes needs {bank_count} banks (max {MAX_BANKS})", data.len()),
            ));
        }
        Ok(Self {
            data,
            bank_count,
            bank: 0,
            autostart,
        })
    }

    /// Byte at `offset` inside the selected bank. Bytes past the end of a
    /// short image read as `$FF`.
    #[must_use]
    pub fn read(&self, offset: u16) -> u8 {
        let index = self.bank * BANK_SIZE + usize::from(offset) % BANK_SIZE;
        self.data.get(index).copied().unwrap_or(0xFF)
    }

    /// Handle a write to the bank register.
    pub fn select(&mut self, value: u8) {
        let bank = usize::from(value) % self.bank_count;
        if bank != self.bank {
            debug!("cartridge bank {} -> {bank}", self.bank);
        }
        self.bank = bank;
    }

    /// Currently selected bank, always in `[0, bank_count)`.
    #[must_use]
    pub fn bank(&self) -> usize {
        self.bank
    }

    #[must_use]
    pub fn bank_count(&self) -> usize {
        self.bank_count
    }

    #[must_use]
    pub fn autostart(&self) -> bool {
        self.autostart
    }

    /// Restore a bank index from a snapshot, masked like a register write.
    pub(crate) fn set_bank(&mut self, bank: usize) {
        self.bank = bank % self.bank_count;
    }
}
