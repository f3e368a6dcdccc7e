//! Input handling for the Dragon.
//!
//! Three layers:
//! 1. `DragonKey`: logical key names mapped to the 7×8 keyboard matrix.
//! 2. `HostInput`: the level state a host submits before each frame
//!    (held keys, a touch point, joystick positions).
//! 3. `InputQueue`: key changes scheduled by frame number, for scripted
//!    sequences and typed text.

use std::collections::BTreeMap;

use crate::joystick::JoystickState;
use crate::keyboard::KeyboardMatrix;

/// Logical key on the Dragon keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragonKey {
    // Row 0
    N0,
    N1,
    N2,
    N3,
    N4,
    N5,
    N6,
    N7,
    // Row 1
    N8,
    N9,
    Colon,
    Semicolon,
    Comma,
    Minus,
    Period,
    Slash,
    // Row 2
    At,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    // Row 3
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    // Row 4
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    // Row 5
    X,
    Y,
    Z,
    Up,
    Down,
    Left,
    Right,
    Space,
    // Row 6
    Enter,
    Clear,
    Break,
    Shift,
}

impl DragonKey {
    /// Every key, in matrix order.
    pub const ALL: [Self; 52] = [
        Self::N0,
        Self::N1,
        Self::N2,
        Self::N3,
        Self::N4,
        Self::N5,
        Self::N6,
        Self::N7,
        Self::N8,
        Self::N9,
        Self::Colon,
        Self::Semicolon,
        Self::Comma,
        Self::Minus,
        Self::Period,
        Self::Slash,
        Self::At,
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
        Self::J,
        Self::K,
        Self::L,
        Self::M,
        Self::N,
        Self::O,
        Self::P,
        Self::Q,
        Self::R,
        Self::S,
        Self::T,
        Self::U,
        Self::V,
        Self::W,
        Self::X,
        Self::Y,
        Self::Z,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Space,
        Self::Enter,
        Self::Clear,
        Self::Break,
        Self::Shift,
    ];

    /// Return the (row, column) pair for this key in the keyboard matrix.
    #[must_use]
    pub const fn matrix(self) -> (usize, u8) {
        match self {
            Self::Enter => (6, 0),
            Self::Clear => (6, 1),
            Self::Break => (6, 2),
            Self::Shift => (6, 7),
            // The first 48 keys fill rows 0-5 in order
            key => {
                let index = key as usize;
                (index / 8, (index % 8) as u8)
            }
        }
    }

    /// Legend printed on the key cap.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::N0 => "0",
            Self::N1 => "1",
            Self::N2 => "2",
            Self::N3 => "3",
            Self::N4 => "4",
            Self::N5 => "5",
            Self::N6 => "6",
            Self::N7 => "7",
            Self::N8 => "8",
            Self::N9 => "9",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Minus => "-",
            Self::Period => ".",
            Self::Slash => "/",
            Self::At => "@",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
            Self::I => "I",
            Self::J => "J",
            Self::K => "K",
            Self::L => "L",
            Self::M => "M",
            Self::N => "N",
            Self::O => "O",
            Self::P => "P",
            Self::Q => "Q",
            Self::R => "R",
            Self::S => "S",
            Self::T => "T",
            Self::U => "U",
            Self::V => "V",
            Self::W => "W",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Space => "SPACE",
            Self::Enter => "ENTER",
            Self::Clear => "CLEAR",
            Self::Break => "BREAK",
            Self::Shift => "SHIFT",
        }
    }
}

/// Input state submitted by the host before a frame.
///
/// Everything here is level-triggered: a key stays down for as long as it
/// appears in `keys`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInput {
    /// Physical or mapped keys currently held.
    pub keys: Vec<DragonKey>,
    /// Touch point on the keyboard screen, if the stylus is down.
    pub touch: Option<(u16, u16)>,
    /// Right (0) and left (1) joystick.
    pub joysticks: [JoystickState; 2],
}

impl HostInput {
    /// Key matrix for the held keys, without any touch key.
    #[must_use]
    pub fn matrix(&self) -> KeyboardMatrix {
        let mut matrix = KeyboardMatrix::new();
        for key in &self.keys {
            let (row, col) = key.matrix();
            matrix.set_key(row, col, true);
        }
        matrix
    }
}

/// One key going down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChange {
    pub key: DragonKey,
    pub pressed: bool,
}

/// Frames a typed character is held down.
const TYPE_HOLD_FRAMES: u64 = 3;
/// Frames between typed characters, so a repeated letter is seen as two
/// presses by the BASIC keyboard scan.
const TYPE_GAP_FRAMES: u64 = 3;

/// Key changes scheduled by frame number.
///
/// The machine drains every change due at or before the current frame
/// before the frame runs. Changes landing on the same frame apply in the
/// order they were scheduled.
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    by_frame: BTreeMap<u64, Vec<KeyChange>>,
}

impl InputQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a single key change on `frame`.
    pub fn schedule(&mut self, frame: u64, key: DragonKey, pressed: bool) {
        self.by_frame
            .entry(frame)
            .or_default()
            .push(KeyChange { key, pressed });
    }

    /// Hold `key` from `at_frame` for `hold_frames` frames.
    pub fn enqueue_key(&mut self, key: DragonKey, at_frame: u64, hold_frames: u64) {
        self.schedule(at_frame, key, true);
        self.schedule(at_frame + hold_frames, key, false);
    }

    /// Type `text` starting at `start_frame`, one character at a time with
    /// SHIFT held alongside where needed. Characters the keyboard cannot
    /// produce are skipped. Returns the first frame after the last release
    /// gap.
    pub fn enqueue_text(&mut self, text: &str, start_frame: u64) -> u64 {
        let mut frame = start_frame;
        for chord in text.chars().map(char_to_keys).filter(|c| !c.is_empty()) {
            for key in chord {
                self.enqueue_key(key, frame, TYPE_HOLD_FRAMES);
            }
            frame += TYPE_HOLD_FRAMES + TYPE_GAP_FRAMES;
        }
        frame
    }

    /// Apply every change due at or before `frame` to `keyboard`.
    pub fn process(&mut self, frame: u64, keyboard: &mut KeyboardMatrix) {
        let later = self.by_frame.split_off(&frame.saturating_add(1));
        let due = std::mem::replace(&mut self.by_frame, later);
        for change in due.into_values().flatten() {
            let (row, col) = change.key.matrix();
            keyboard.set_key(row, col, change.pressed);
        }
    }

    /// Frame of the earliest pending change.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.by_frame.keys().next().copied()
    }

    /// Pending key changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_frame.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_frame.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_frame.clear();
    }
}

/// Map a character to the Dragon keys needed to type it.
///
/// Returns 1 key for plain characters, 2 for SHIFT combinations and none
/// for characters the keyboard cannot produce.
#[must_use]
pub fn char_to_keys(ch: char) -> Vec<DragonKey> {
    use DragonKey as K;

    let plain = match ch.to_ascii_uppercase() {
        '0' => Some(K::N0),
        '1' => Some(K::N1),
        '2' => Some(K::N2),
        '3' => Some(K::N3),
        '4' => Some(K::N4),
        '5' => Some(K::N5),
        '6' => Some(K::N6),
        '7' => Some(K::N7),
        '8' => Some(K::N8),
        '9' => Some(K::N9),
        ':' => Some(K::Colon),
        ';' => Some(K::Semicolon),
        ',' => Some(K::Comma),
        '-' => Some(K::Minus),
        '.' => Some(K::Period),
        '/' => Some(K::Slash),
        '@' => Some(K::At),
        ' ' => Some(K::Space),
        '\n' | '\r' => Some(K::Enter),
        // A-Z are contiguous from row 2 column 1 onwards
        c @ 'A'..='Z' => Some(K::ALL[17 + (c as usize - 'A' as usize)]),
        _ => None,
    };
    if let Some(key) = plain {
        return vec![key];
    }

    let shifted = match ch {
        '!' => K::N1,
        '"' => K::N2,
        '#' => K::N3,
        '$' => K::N4,
        '%' => K::N5,
        '&' => K::N6,
        '\'' => K::N7,
        '(' => K::N8,
        ')' => K::N9,
        '*' => K::Colon,
        '+' => K::Semicolon,
        '<' => K::Comma,
        '=' => K::Minus,
        '>' => K::Period,
        '?' => K::Slash,
        _ => return Vec::new(),
    };
    vec![K::Shift, shifted]
}
