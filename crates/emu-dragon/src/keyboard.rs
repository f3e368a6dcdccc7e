//! Dragon keyboard matrix.
//!
//! 7 rows × 8 columns. PIA0 port B drives the columns (a 0 strobes a
//! column) and PIA0 port A bits 0-6 read the rows back, active low.
//!
//! | Row (PA) | Col 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 |
//! |----------|-------|---|---|---|---|---|---|---|
//! | 0 | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 |
//! | 1 | 8 | 9 | : | ; | , | - | . | / |
//! | 2 | @ | A | B | C | D | E | F | G |
//! | 3 | H | I | J | K | L | M | N | O |
//! | 4 | P | Q | R | S | T | U | V | W |
//! | 5 | X | Y | Z | Up | Down | Left | Right | Space |
//! | 6 | Enter | Clear | Break | | | | | Shift |

/// Number of matrix rows.
pub const ROWS: usize = 7;

/// Keyboard switch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardMatrix {
    /// Bit `c` of `rows[r]` set = key at (row r, column c) held.
    rows: [u8; ROWS],
}

impl KeyboardMatrix {
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: [0; ROWS] }
    }

    /// Set or clear a key. `row` is 0-6, `col` is 0-7.
    pub fn set_key(&mut self, row: usize, col: u8, pressed: bool) {
        if row < ROWS && col < 8 {
            if pressed {
                self.rows[row] |= 1 << col;
            } else {
                self.rows[row] &= !(1 << col);
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, row: usize, col: u8) -> bool {
        row < ROWS && col < 8 && self.rows[row] & (1 << col) != 0
    }

    /// Read the rows for a column strobe.
    ///
    /// `strobe` is the level on PIA0 port B; each 0 bit selects a column.
    /// Held keys connect their row and column, so with several keys down
    /// current can reach rows through other columns ("ghosting"). The
    /// result follows every path through shared rows and columns.
    ///
    /// Returns bits 0-6 active low (0 = some key in that row connects to a
    /// strobed column). Bit 7 is left high for the joystick comparator.
    #[must_use]
    pub fn read(&self, strobe: u8) -> u8 {
        let mut cols = !strobe;
        let mut active_rows: u8 = 0;

        loop {
            let mut rows = active_rows;
            for (r, &keys) in self.rows.iter().enumerate() {
                if keys & cols != 0 {
                    rows |= 1 << r;
                }
            }

            let mut new_cols = cols;
            for (r, &keys) in self.rows.iter().enumerate() {
                if rows & (1 << r) != 0 {
                    new_cols |= keys;
                }
            }

            if rows == active_rows && new_cols == cols {
                break;
            }
            active_rows = rows;
            cols = new_cols;
        }

        !active_rows
    }

    /// Release all keys.
    pub fn release_all(&mut self) {
        self.rows = [0; ROWS];
    }

    /// Keys held in either matrix.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut rows = self.rows;
        for (row, extra) in rows.iter_mut().zip(other.rows) {
            *row |= extra;
        }
        Self { rows }
    }

    /// Raw row bits, for snapshots.
    #[must_use]
    pub fn rows(&self) -> [u8; ROWS] {
        self.rows
    }

    #[must_use]
    pub const fn from_rows(rows: [u8; ROWS]) -> Self {
        Self { rows }
    }
}
