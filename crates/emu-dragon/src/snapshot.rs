//! Machine snapshots.
//!
//! # Layout (little-endian)
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0      | 4    | Magic `DRGS` |
//! | 4      | 2    | Version (1) |
//! | 6      | 1    | Model (0 = Dragon 32, 1 = Dragon 64) |
//! | 7      | 1    | Reserved (0) |
//! | 8      | 2    | Section count |
//! | 10     | ...  | Sections |
//!
//! Each section is a 4-byte tag, a `u32` payload length and the payload.
//! Sections appear exactly once, in this order:
//!
//! | Tag    | Payload |
//! |--------|---------|
//! | `CPU ` | Registers, interrupt lines, wait state, cycle count |
//! | `SAM ` | Control register |
//! | `PIA0` | Both ports and the input pins |
//! | `PIA1` | Both ports and the input pins |
//! | `MEM ` | ROM bank, cartridge bank, RAM |
//! | `KBD ` | Host and scripted key matrices |
//! | `JOY ` | Both joysticks |
//! | `VID ` | Frame counters, beam row and the displayed frame |
//! | `SND ` | Audio source levels and PSG state |
//! | `SCHD` | Frame cycle carry, sample remainder, CART line |
//!
//! Loading decodes and checks the whole image before touching the machine,
//! so a rejected snapshot leaves it exactly as it was. Pending input queue
//! events are not part of a snapshot.

use emu_core::Ticks;
use log::info;
use mos_pia_6520::PiaPort;
use motorola_6809::{InterruptLines, Registers, WaitState};
use motorola_6847::PALETTE;
use ti_sn76489::Sn76489State;

use crate::bus::AudioLevels;
use crate::config::{CYCLES_PER_LINE, DragonModel};
use crate::dragon::Dragon;
use crate::error::{DragonError, Result};
use crate::joystick::JoystickState;
use crate::keyboard::{KeyboardMatrix, ROWS};
use crate::sound::SoundState;
use crate::video::{FRAME_HEIGHT, FRAME_WIDTH};

pub const MAGIC: [u8; 4] = *b"DRGS";
pub const VERSION: u16 = 1;

const HEADER_LEN: usize = 10;

const TAG_CPU: [u8; 4] = *b"CPU ";
const TAG_SAM: [u8; 4] = *b"SAM ";
const TAG_PIA0: [u8; 4] = *b"PIA0";
const TAG_PIA1: [u8; 4] = *b"PIA1";
const TAG_MEM: [u8; 4] = *b"MEM ";
const TAG_KBD: [u8; 4] = *b"KBD ";
const TAG_JOY: [u8; 4] = *b"JOY ";
const TAG_VID: [u8; 4] = *b"VID ";
const TAG_SND: [u8; 4] = *b"SND ";
const TAG_SCHD: [u8; 4] = *b"SCHD";

const SECTION_ORDER: [[u8; 4]; 10] = [
    TAG_CPU, TAG_SAM, TAG_PIA0, TAG_PIA1, TAG_MEM, TAG_KBD, TAG_JOY, TAG_VID, TAG_SND, TAG_SCHD,
];

const CPU_LEN: usize = 27;
const PIA_LEN: usize = 12;
const SND_LEN: usize = 38;
const FRAME_LEN: usize = FRAME_WIDTH * FRAME_HEIGHT;
const VID_LEN: usize = 18 + FRAME_LEN;

/// Serialise the complete machine state.
#[must_use]
pub fn save(dragon: &Dragon) -> Vec<u8> {
    let mut out = Writer::default();
    out.bytes(&MAGIC);
    out.u16(VERSION);
    out.u8(dragon.model().id());
    out.u8(0);
    out.u16(SECTION_ORDER.len() as u16);

    let bus = dragon.bus();

    out.section(TAG_CPU, |w| {
        let cpu = dragon.cpu();
        let r = cpu.regs;
        w.bytes(&[r.a, r.b, r.dp, r.cc]);
        for word in [r.x, r.y, r.u, r.s, r.pc] {
            w.u16(word);
        }
        let lines = cpu.lines();
        w.bool(lines.irq);
        w.bool(lines.firq);
        w.bool(lines.nmi_pending);
        w.bool(lines.nmi_armed);
        w.u8(match cpu.wait_state() {
            WaitState::Running => 0,
            WaitState::Sync => 1,
            WaitState::Cwai => 2,
        });
        w.u64(cpu.total_cycles().get());
    });

    out.section(TAG_SAM, |w| w.u16(bus.sam.register()));

    for (tag, pia) in [(TAG_PIA0, &bus.pia0), (TAG_PIA1, &bus.pia1)] {
        out.section(tag, |w| {
            let (a, b) = pia.state();
            for port in [a, b] {
                w.bytes(&[port.output, port.ddr, port.control]);
                w.bool(port.c1);
                w.bool(port.c2);
            }
            w.u8(pia.input_a);
            w.u8(pia.input_b);
        });
    }

    out.section(TAG_MEM, |w| {
        w.u8(bus.rom_bank() as u8);
        w.bool(bus.cartridge.is_some());
        w.u8(bus.cartridge.as_ref().map_or(0, |c| c.bank() as u8));
        w.bytes(bus.ram());
    });

    out.section(TAG_KBD, |w| {
        let (host, scripted) = dragon.key_state();
        w.bytes(&host.rows());
        w.bytes(&scripted.rows());
    });

    out.section(TAG_JOY, |w| {
        for stick in bus.joysticks() {
            w.u8(stick.x);
            w.u8(stick.y);
            w.bool(stick.fire);
        }
    });

    out.section(TAG_VID, |w| {
        w.u64(dragon.frame_count());
        w.u64(dragon.video().frame_count());
        w.u16(dragon.video().row());
        w.bytes(dragon.frame().pixels());
    });

    out.section(TAG_SND, |w| {
        let state = dragon.sound().state();
        let levels = state.levels;
        w.u8(levels.dac);
        w.bool(levels.single_bit);
        w.bool(levels.enabled);
        w.u8(levels.mux);
        let psg = state.psg;
        for period in psg.periods {
            w.u16(period);
        }
        w.bytes(&psg.attenuation);
        w.u8(psg.noise_control);
        w.u8(psg.latched);
        for counter in psg.counters {
            w.u16(counter);
        }
        for output in psg.outputs {
            w.bool(output);
        }
        w.u16(psg.lfsr);
        w.u64(psg.remainder);
    });

    out.section(TAG_SCHD, |w| {
        let (carry, remainder, cart_line) = dragon.timing_state();
        w.u32(carry);
        w.u64(remainder);
        w.bool(cart_line);
    });

    info!("snapshot saved ({} bytes)", out.0.len());
    out.0
}

/// Restore a snapshot made by [`save`].
///
/// Errors with [`DragonError::SnapshotFormatMismatch`] for a foreign
/// magic, version or model and [`DragonError::SnapshotCorrupt`] for a
/// damaged image. On error the machine is unchanged.
pub fn load(dragon: &mut Dragon, data: &[u8]) -> Result<()> {
    let staged = decode(dragon, data)?;
    apply(dragon, staged);
    info!("snapshot loaded ({} bytes)", data.len());
    Ok(())
}

/// Everything in a snapshot, decoded and checked.
struct Staged {
    regs: Registers,
    lines: InterruptLines,
    wait: WaitState,
    cycles: u64,
    sam: u16,
    pias: [(PiaPort, PiaPort, u8, u8); 2],
    cart_bank: Option<usize>,
    ram: Vec<u8>,
    host_keys: KeyboardMatrix,
    scripted_keys: KeyboardMatrix,
    joysticks: [JoystickState; 2],
    frame_count: u64,
    video_frames: u64,
    video_row: u16,
    picture: Vec<u8>,
    sound: SoundState,
    carry: u32,
    sample_remainder: u64,
    cart_line: bool,
}

fn corrupt(reason: impl Into<String>) -> DragonError {
    DragonError::SnapshotCorrupt(reason.into())
}

fn decode(dragon: &Dragon, data: &[u8]) -> Result<Staged> {
    if data.len() >= MAGIC.len() && data[..MAGIC.len()] != MAGIC {
        return Err(DragonError::SnapshotFormatMismatch(
            "not a Dragon snapshot (bad magic)".into(),
        ));
    }
    let mut r = Reader::new(data);
    let header = r.take(HEADER_LEN).map_err(|_| corrupt("truncated header"))?;
    let mut h = Reader::new(&header[MAGIC.len()..]);

    let version = h.u16()?;
    if version != VERSION {
        return Err(DragonError::SnapshotFormatMismatch(format!(
            "version {version}, expected {VERSION}"
        )));
    }
    let model_id = h.u8()?;
    let model = DragonModel::from_id(model_id).ok_or_else(|| {
        DragonError::SnapshotFormatMismatch(format!("unknown model {model_id}"))
    })?;
    if model != dragon.model() {
        return Err(DragonError::SnapshotFormatMismatch(format!(
            "snapshot is for a {}, machine is a {}",
            model.name(),
            dragon.model().name()
        )));
    }
    h.u8()?;
    let count = h.u16()?;
    if usize::from(count) != SECTION_ORDER.len() {
        return Err(corrupt(format!(
            "{count} sections, expected {}",
            SECTION_ORDER.len()
        )));
    }

    let mut sections = Vec::with_capacity(SECTION_ORDER.len());
    for expected in SECTION_ORDER {
        let tag = r.take(4)?;
        if tag != expected {
            return Err(corrupt(format!(
                "expected section {:?}, found {:?}",
                String::from_utf8_lossy(&expected),
                String::from_utf8_lossy(tag)
            )));
        }
        let len = r.u32()? as usize;
        let payload = r.take(len).map_err(|_| {
            corrupt(format!(
                "section {:?} declares {len} bytes, {} left",
                String::from_utf8_lossy(&expected),
                r.remaining()
            ))
        })?;
        sections.push(payload);
    }
    if r.remaining() != 0 {
        return Err(corrupt(format!("{} trailing bytes", r.remaining())));
    }

    let [cpu, sam, pia0, pia1, mem, kbd, joy, vid, snd, schd] = sections[..] else {
        return Err(corrupt("section table"));
    };

    let mut c = Reader::section(cpu, CPU_LEN, "CPU")?;
    let regs = Registers {
        a: c.u8()?,
        b: c.u8()?,
        dp: c.u8()?,
        cc: c.u8()?,
        x: c.u16()?,
        y: c.u16()?,
        u: c.u16()?,
        s: c.u16()?,
        pc: c.u16()?,
    };
    let lines = InterruptLines {
        irq: c.bool()?,
        firq: c.bool()?,
        nmi_pending: c.bool()?,
        nmi_armed: c.bool()?,
    };
    let wait = match c.u8()? {
        0 => WaitState::Running,
        1 => WaitState::Sync,
        2 => WaitState::Cwai,
        other => return Err(corrupt(format!("wait state {other}"))),
    };
    let cycles = c.u64()?;

    let sam = Reader::section(sam, 2, "SAM")?.u16()?;

    let mut pias = [(PiaPort::default(), PiaPort::default(), 0xFF, 0xFF); 2];
    for (slot, (payload, name)) in pias.iter_mut().zip([(pia0, "PIA0"), (pia1, "PIA1")]) {
        let mut p = Reader::section(payload, PIA_LEN, name)?;
        let a = p.pia_port()?;
        let b = p.pia_port()?;
        *slot = (a, b, p.u8()?, p.u8()?);
    }

    let ram_size = dragon.model().ram_size();
    let mut m = Reader::section(mem, 3 + ram_size, "MEM")?;
    let rom_bank = usize::from(m.u8()?);
    let has_cart = m.bool()?;
    let cart_bank = usize::from(m.u8()?);
    let ram = m.take(ram_size)?.to_vec();

    // The ROM bank is a function of PIA1 port B; the stored value must agree
    let pb = pias[1].1;
    let pb2_low = pb.ddr & 0x04 != 0 && pb.output & pb.ddr & 0x04 == 0;
    let expected_bank = usize::from(dragon.model().rom_banks() > 1 && pb2_low);
    if rom_bank != expected_bank {
        return Err(corrupt(format!(
            "ROM bank {rom_bank} disagrees with PIA1 (bank {expected_bank})"
        )));
    }

    let cart_bank = match (&dragon.bus().cartridge, has_cart) {
        (Some(cart), true) if cart_bank < cart.bank_count() => Some(cart_bank),
        (Some(cart), true) => {
            return Err(corrupt(format!(
                "cartridge bank {cart_bank} of {}",
                cart.bank_count()
            )));
        }
        (None, false) => None,
        (Some(_), false) | (None, true) => {
            return Err(DragonError::SnapshotFormatMismatch(
                "cartridge presence differs from the machine".into(),
            ));
        }
    };

    let mut k = Reader::section(kbd, 2 * ROWS, "KBD")?;
    let host_keys = KeyboardMatrix::from_rows(k.rows()?);
    let scripted_keys = KeyboardMatrix::from_rows(k.rows()?);

    let mut j = Reader::section(joy, 6, "JOY")?;
    let mut joysticks = [JoystickState::default(); 2];
    for stick in &mut joysticks {
        *stick = JoystickState {
            x: j.u8()?,
            y: j.u8()?,
            fire: j.bool()?,
        };
    }

    let mut v = Reader::section(vid, VID_LEN, "VID")?;
    let frame_count = v.u64()?;
    let video_frames = v.u64()?;
    let video_row = v.u16()?;
    if usize::from(video_row) > FRAME_HEIGHT {
        return Err(corrupt(format!("beam row {video_row} past the frame")));
    }
    let picture = v.take(FRAME_LEN)?.to_vec();
    if let Some(&index) = picture.iter().find(|&&i| usize::from(i) >= PALETTE.len()) {
        return Err(corrupt(format!("palette index {index} in frame")));
    }

    let mut s = Reader::section(snd, SND_LEN, "SND")?;
    let levels = AudioLevels {
        dac: s.u8()?,
        single_bit: s.bool()?,
        enabled: s.bool()?,
        mux: s.u8()?,
    };
    let psg = Sn76489State {
        periods: [s.u16()?, s.u16()?, s.u16()?],
        attenuation: [s.u8()?, s.u8()?, s.u8()?, s.u8()?],
        noise_control: s.u8()?,
        latched: s.u8()?,
        counters: [s.u16()?, s.u16()?, s.u16()?, s.u16()?],
        outputs: [s.bool()?, s.bool()?, s.bool()?, s.bool()?],
        lfsr: s.u16()?,
        remainder: s.u64()?,
    };

    let mut t = Reader::section(schd, 13, "SCHD")?;
    let carry = t.u32()?;
    let sample_remainder = t.u64()?;
    let cart_line = t.bool()?;
    // An instruction overruns the frame by less than one scanline
    if carry >= CYCLES_PER_LINE {
        return Err(corrupt(format!("frame cycle carry {carry}")));
    }
    if sample_remainder >= u64::from(dragon.video_standard().cpu_hz()) {
        return Err(corrupt(format!("sample remainder {sample_remainder}")));
    }

    Ok(Staged {
        regs,
        lines,
        wait,
        cycles,
        sam,
        pias,
        cart_bank,
        ram,
        host_keys,
        scripted_keys,
        joysticks,
        frame_count,
        video_frames,
        video_row,
        picture,
        sound: SoundState { levels, psg },
        carry,
        sample_remainder,
        cart_line,
    })
}

fn apply(dragon: &mut Dragon, s: Staged) {
    dragon
        .cpu_mut()
        .restore(s.regs, s.lines, s.wait, Ticks::new(s.cycles));

    let bus = dragon.bus_mut();
    bus.sam.set_register(s.sam);
    for (pia, (a, b, input_a, input_b)) in [&mut bus.pia0, &mut bus.pia1].into_iter().zip(s.pias) {
        pia.restore(a, b);
        pia.input_a = input_a;
        pia.input_b = input_b;
    }
    bus.ram_mut().copy_from_slice(&s.ram);
    if let (Some(cart), Some(bank)) = (&mut bus.cartridge, s.cart_bank) {
        cart.set_bank(bank);
    }
    bus.set_joysticks(s.joysticks);
    bus.take_audio_log();
    bus.set_audio_clock(0);

    dragon.sound_mut().restore(&s.sound);
    dragon
        .video_mut()
        .restore(s.video_frames, s.video_row, &s.picture);
    dragon.restore_machine_state(
        s.frame_count,
        (s.host_keys, s.scripted_keys),
        (s.carry, s.sample_remainder, s.cart_line),
    );
}

#[derive(Default)]
struct Writer(Vec<u8>);

impl Writer {
    fn u8(&mut self, value: u8) {
        self.0.push(value);
    }

    fn bool(&mut self, value: bool) {
        self.0.push(u8::from(value));
    }

    fn u16(&mut self, value: u16) {
        self.0.extend_from_slice(&value.to_le_bytes());
    }

    fn u32(&mut self, value: u32) {
        self.0.extend_from_slice(&value.to_le_bytes());
    }

    fn u64(&mut self, value: u64) {
        self.0.extend_from_slice(&value.to_le_bytes());
    }

    fn bytes(&mut self, data: &[u8]) {
        self.0.extend_from_slice(data);
    }

    /// Write a tagged section, back-patching its length.
    fn section(&mut self, tag: [u8; 4], body: impl FnOnce(&mut Self)) {
        self.bytes(&tag);
        let len_at = self.0.len();
        self.u32(0);
        body(self);
        let len = (self.0.len() - len_at - 4) as u32;
        self.0[len_at..len_at + 4].copy_from_slice(&len.to_le_bytes());
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Reader over a section payload that must be exactly `len` bytes.
    fn section(payload: &'a [u8], len: usize, name: &str) -> Result<Self> {
        if payload.len() != len {
            return Err(corrupt(format!(
                "section {name} is {} bytes, expected {len}",
                payload.len()
            )));
        }
        Ok(Self::new(payload))
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(corrupt("unexpected end of data"));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn bool(&mut self) -> Result<bool> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(corrupt(format!("flag byte {other:#04X}"))),
        }
    }

    fn u16(&mut self) -> Result<u16> {
        self.array().map(u16::from_le_bytes)
    }

    fn u32(&mut self) -> Result<u32> {
        self.array().map(u32::from_le_bytes)
    }

    fn u64(&mut self) -> Result<u64> {
        self.array().map(u64::from_le_bytes)
    }

    fn rows(&mut self) -> Result<[u8; ROWS]> {
        self.array()
    }

    fn pia_port(&mut self) -> Result<PiaPort> {
        Ok(PiaPort {
            output: self.u8()?,
            ddr: self.u8()?,
            control: self.u8()?,
            c1: self.bool()?,
            c2: self.bool()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DragonConfig;
    use emu_core::Bus;

    fn make_dragon() -> Dragon {
        let mut rom = vec![0x12; 0x4000];
        // LDA #1; STA $0400; INC $0400; BRA *-3
        rom[..9].copy_from_slice(&[0x86, 0x01, 0xB7, 0x04, 0x00, 0x7C, 0x04, 0x00, 0x20]);
        rom[9] = 0xFB;
        rom[0x3FFE] = 0x80;
        rom[0x3FFF] = 0x00;
        Dragon::new(DragonConfig::new(DragonModel::Dragon32, rom)).expect("valid ROM")
    }

    /// Offset of a section's payload in a saved image.
    fn payload_at(data: &[u8], tag: [u8; 4]) -> usize {
        let mut pos = HEADER_LEN;
        loop {
            if data[pos..pos + 4] == tag {
                return pos + 8;
            }
            let len = &data[pos + 4..pos + 8];
            pos += 8 + u32::from_le_bytes([len[0], len[1], len[2], len[3]]) as usize;
        }
    }

    #[test]
    fn header_layout() {
        let dragon = make_dragon();
        let data = save(&dragon);
        assert_eq!(&data[..4], b"DRGS");
        assert_eq!(u16::from_le_bytes([data[4], data[5]]), VERSION);
        assert_eq!(data[6], DragonModel::Dragon32.id());
        assert_eq!(u16::from_le_bytes([data[8], data[9]]), 10);
        assert_eq!(&data[10..14], b"CPU ");
        assert_eq!(
            u32::from_le_bytes([data[14], data[15], data[16], data[17]]) as usize,
            CPU_LEN
        );
    }

    #[test]
    fn round_trip_restores_state() {
        let mut dragon = make_dragon();
        dragon.run_frames(3);
        let data = save(&dragon);
        let pc = dragon.cpu().regs.pc;
        let counter = dragon.bus().peek(0x0400);

        dragon.run_frames(2);
        assert_ne!(dragon.bus().peek(0x0400), counter);

        load(&mut dragon, &data).expect("snapshot loads");
        assert_eq!(dragon.cpu().regs.pc, pc);
        assert_eq!(dragon.bus().peek(0x0400), counter);
        assert_eq!(dragon.frame_count(), 3);
        assert_eq!(save(&dragon), data);
    }

    #[test]
    fn bad_magic_is_format_mismatch() {
        let mut dragon = make_dragon();
        let mut data = save(&dragon);
        data[0] = b'X';
        assert!(matches!(
            load(&mut dragon, &data),
            Err(DragonError::SnapshotFormatMismatch(_))
        ));
    }

    #[test]
    fn future_version_is_format_mismatch() {
        let mut dragon = make_dragon();
        let mut data = save(&dragon);
        data[4] = 2;
        assert!(matches!(
            load(&mut dragon, &data),
            Err(DragonError::SnapshotFormatMismatch(_))
        ));
    }

    #[test]
    fn other_model_is_format_mismatch() {
        let mut dragon = make_dragon();
        let mut data = save(&dragon);
        data[6] = DragonModel::Dragon64.id();
        assert!(matches!(
            load(&mut dragon, &data),
            Err(DragonError::SnapshotFormatMismatch(_))
        ));
    }

    #[test]
    fn truncation_is_corrupt() {
        let mut dragon = make_dragon();
        let data = save(&dragon);
        for len in [6, HEADER_LEN + 2, data.len() / 2, data.len() - 1] {
            assert!(
                matches!(
                    load(&mut dragon, &data[..len]),
                    Err(DragonError::SnapshotCorrupt(_))
                ),
                "length {len}"
            );
        }
    }

    #[test]
    fn trailing_bytes_are_corrupt() {
        let mut dragon = make_dragon();
        let mut data = save(&dragon);
        data.push(0);
        assert!(matches!(
            load(&mut dragon, &data),
            Err(DragonError::SnapshotCorrupt(_))
        ));
    }

    #[test]
    fn oversized_section_length_is_corrupt() {
        let mut dragon = make_dragon();
        let mut data = save(&dragon);
        data[14..18].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            load(&mut dragon, &data),
            Err(DragonError::SnapshotCorrupt(_))
        ));
    }

    #[test]
    fn swapped_section_is_corrupt() {
        let mut dragon = make_dragon();
        let mut data = save(&dragon);
        // Rename the CPU section
        data[10..14].copy_from_slice(b"SAM ");
        assert!(matches!(
            load(&mut dragon, &data),
            Err(DragonError::SnapshotCorrupt(_))
        ));
    }

    #[test]
    fn displayed_frame_is_saved() {
        let mut dragon = make_dragon();
        dragon.run_frame();
        let data = save(&dragon);
        let at = payload_at(&data, TAG_VID) + 18;
        assert_eq!(&data[at..at + FRAME_LEN], dragon.frame().pixels());
    }

    #[test]
    fn unknown_palette_index_is_corrupt() {
        let mut dragon = make_dragon();
        let mut data = save(&dragon);
        let at = payload_at(&data, TAG_VID) + 18;
        data[at + 100] = PALETTE.len() as u8;
        assert!(matches!(
            load(&mut dragon, &data),
            Err(DragonError::SnapshotCorrupt(_))
        ));
    }

    #[test]
    fn frame_carry_of_a_scanline_is_corrupt() {
        let mut dragon = make_dragon();
        let mut data = save(&dragon);
        let at = payload_at(&data, TAG_SCHD);
        data[at..at + 4].copy_from_slice(&CYCLES_PER_LINE.to_le_bytes());
        assert!(matches!(
            load(&mut dragon, &data),
            Err(DragonError::SnapshotCorrupt(_))
        ));
    }
}
