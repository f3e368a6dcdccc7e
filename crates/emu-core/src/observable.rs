//! State inspection by dotted path.
//!
//! The CPU and the machine answer queries such as `cpu.cc.z`, `sam.base`
//! or `memory.$0400`. A query reads state; it never clocks a chip or
//! clears a flag.

use std::fmt;

/// Result of a state query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    /// A byte: a register, a memory cell or a control register.
    U8(u8),
    /// An address or a 16-bit register.
    U16(u16),
    /// A counter (cycles, frames).
    U64(u64),
    /// A mode name.
    String(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "${v:02X}"),
            Value::U16(v) => write!(f, "${v:04X}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

/// A component whose state can be inspected.
pub trait Observable {
    /// Look up one property. Paths are dot-separated, for example `pc`,
    /// `cc.z` or `memory.$0400`. Unknown paths give `None`.
    fn query(&self, path: &str) -> Option<Value>;

    /// Every path `query` understands. Placeholders are written in angle
    /// brackets (`memory.<address>`).
    fn query_paths(&self) -> &'static [&'static str];
}

/// Parse the address part of a `memory.<address>` path.
///
/// Accepts `0x0400`, `$0400` or decimal `1024`.
#[must_use]
pub fn parse_address(text: &str) -> Option<u16> {
    if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix('$'))
    {
        u16::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}
