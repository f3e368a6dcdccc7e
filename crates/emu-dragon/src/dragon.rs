//! Top-level Dragon system.
//!
//! One frame is 312 (PAL) or 262 (NTSC) scanlines of 57 CPU cycles. The CPU
//! runs instruction by instruction; whenever it crosses into a new
//! scanline the machine paints that line, pulses HSYNC into PIA0 CA1 and
//! at the bottom of the active area drops FSYNC on PIA0 CB1, raising it
//! again at the end of the frame. Cycles an instruction runs past the end
//! of the frame are carried into the next one.

use emu_core::{Cpu, Observable, Value, parse_address};
use log::{debug, info};
use motorola_6809::M6809;

use crate::bus::DragonBus;
use crate::config::{CYCLES_PER_LINE, DragonConfig, DragonModel, VideoStandard};
use crate::error::{DragonError, Result};
use crate::input::{DragonKey, HostInput, InputQueue};
use crate::keyboard::KeyboardMatrix;
use crate::overlay::KeyboardOverlay;
use crate::sound::SoundGenerator;
use crate::video::{
    ACTIVE_END_LINE, FIRST_VISIBLE_LINE, FRAME_HEIGHT, FrameBuffer, VideoController,
};

/// What one frame produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOutput {
    /// CPU cycles executed during the frame.
    pub cycles: u32,
    /// Audio for the frame, mono at the configured sample rate.
    pub samples: Vec<i16>,
}

/// Dragon 32/64 system.
pub struct Dragon {
    cpu: M6809,
    bus: DragonBus,
    video: VideoController,
    sound: SoundGenerator,
    standard: VideoStandard,
    sample_rate: u32,
    /// Completed frame counter.
    frame_count: u64,
    /// Timed input event queue for scripted key sequences.
    input_queue: InputQueue,
    /// Keys held by the input queue.
    scripted_keys: KeyboardMatrix,
    /// Keys held by the host.
    host_keys: KeyboardMatrix,
    /// Cycles the last instruction of the previous frame ran into this one.
    cycle_carry: u32,
    /// Fractional samples owed, in units of 1 / cpu_hz.
    sample_remainder: u64,
    /// Level driven onto PIA1 CB1 by an autostart cartridge.
    cart_line: bool,
}

impl Dragon {
    /// Build a machine and reset it.
    ///
    /// Fails if the BASIC ROM is the wrong size for the model or its reset
    /// vector does not point into ROM or cartridge space.
    pub fn new(config: DragonConfig) -> Result<Self> {
        let DragonConfig {
            model,
            video_standard,
            basic_rom,
            cartridge,
            sample_rate,
        } = config;

        if basic_rom.len() != model.rom_size() {
            return Err(DragonError::invalid_image(
                "BASIC ROM",
                format!(
                    "{} bytes, {} expects {}",
                    basic_rom.len(),
                    model.name(),
                    model.rom_size()
                ),
            ));
        }
        let vector = u16::from_be_bytes([basic_rom[0x3FFE], basic_rom[0x3FFF]]);
        if !(0x8000..0xFF00).contains(&vector) {
            return Err(DragonError::invalid_image(
                "BASIC ROM",
                format!("reset vector ${vector:04X} is outside ROM"),
            ));
        }
        if sample_rate == 0 {
            return Err(DragonError::invalid_image("audio", "sample rate is zero"));
        }

        info!(
            "{} ({:?}, {} Hz CPU, {} cycles/frame, cartridge: {})",
            model.name(),
            video_standard,
            video_standard.cpu_hz(),
            video_standard.cycles_per_frame(),
            cartridge
                .as_ref()
                .map_or_else(|| "none".to_string(), |c| format!("{} banks", c.bank_count())),
        );

        let mut dragon = Self {
            cpu: M6809::new(),
            bus: DragonBus::new(model, basic_rom, cartridge),
            video: VideoController::new(),
            sound: SoundGenerator::new(sample_rate),
            standard: video_standard,
            sample_rate,
            frame_count: 0,
            input_queue: InputQueue::new(),
            scripted_keys: KeyboardMatrix::new(),
            host_keys: KeyboardMatrix::new(),
            cycle_carry: 0,
            sample_remainder: 0,
            cart_line: false,
        };
        dragon.reset();
        Ok(dragon)
    }

    /// Press the reset button: chips reset, RAM kept.
    pub fn reset(&mut self) {
        self.bus.reset();
        // FSYNC idles high between the end of one active area and the next
        self.bus.pia0.set_cb1(true);
        self.cpu.reset(&mut self.bus);
        self.sound.reset(self.bus.audio_levels());
        self.cycle_carry = 0;
        self.sample_remainder = 0;
        self.cart_line = false;
        info!("reset, PC=${:04X}", self.cpu.regs.pc);
    }

    /// Run one complete frame.
    ///
    /// Processes input queue events due this frame, runs the CPU for the
    /// frame's cycle budget, then generates the frame's audio.
    pub fn run_frame(&mut self) -> FrameOutput {
        self.input_queue
            .process(self.frame_count, &mut self.scripted_keys);
        self.bus
            .set_keyboard(self.host_keys.union(&self.scripted_keys));

        let start = self.cycle_carry;
        let mut cycle = start;

        for line in 0..self.standard.lines_per_frame() {
            self.begin_line(line);
            let line_end = (u32::from(line) + 1) * CYCLES_PER_LINE;
            while cycle < line_end {
                self.update_interrupts();
                self.bus.set_audio_clock(cycle - start);
                cycle += self.cpu.step(&mut self.bus);
            }
        }

        // Frame end: FSYNC rises
        self.bus.pia0.set_cb1(true);
        self.update_interrupts();

        let ran = cycle - start;
        self.bus.set_audio_clock(ran);
        self.cycle_carry = cycle - self.standard.cycles_per_frame();

        let owed = self.samples_owed(ran);
        let samples = self.sound.generate_samples(&mut self.bus, owed);
        self.video.end_frame();
        self.frame_count += 1;

        FrameOutput {
            cycles: ran,
            samples,
        }
    }

    /// Run `frames` frames, discarding their output.
    pub fn run_frames(&mut self, frames: u64) {
        for _ in 0..frames {
            self.run_frame();
        }
    }

    /// Samples due for `cycles` CPU cycles, keeping the remainder so the
    /// long-run rate is exact.
    fn samples_owed(&mut self, cycles: u32) -> usize {
        let cpu_hz = u64::from(self.standard.cpu_hz());
        let owed = u64::from(cycles) * u64::from(self.sample_rate) + self.sample_remainder;
        self.sample_remainder = owed % cpu_hz;
        (owed / cpu_hz) as usize
    }

    fn begin_line(&mut self, line: u16) {
        // HSYNC pulse; either edge setting sees one edge per line
        self.bus.pia0.set_ca1(false);
        self.bus.pia0.set_ca1(true);

        if line == ACTIVE_END_LINE {
            self.bus.pia0.set_cb1(false);
        }

        if self.bus.cartridge.as_ref().is_some_and(|c| c.autostart()) {
            self.cart_line = !self.cart_line;
            self.bus.pia1.set_cb1(self.cart_line);
        }

        let row = line.wrapping_sub(FIRST_VISIBLE_LINE);
        if usize::from(row) < FRAME_HEIGHT {
            self.video.render_line(&self.bus, usize::from(row));
        }
    }

    /// PIA0 drives IRQ, PIA1 drives FIRQ.
    fn update_interrupts(&mut self) {
        let irq = self.bus.pia0.irq_a() || self.bus.pia0.irq_b();
        let firq = self.bus.pia1.irq_a() || self.bus.pia1.irq_b();
        self.cpu.set_irq(irq);
        self.cpu.set_firq(firq);
    }

    /// Apply a host input snapshot: held keys plus any touched overlay
    /// key, and both joysticks.
    pub fn apply_input(&mut self, input: &HostInput, overlay: &KeyboardOverlay) {
        let mut keys = input.matrix();
        if let Some((x, y)) = input.touch
            && let Some(key) = overlay.hit_test(x, y)
        {
            debug!("touch ({x}, {y}) -> {}", key.label());
            let (row, col) = key.matrix();
            keys.set_key(row, col, true);
        }
        self.host_keys = keys;
        self.bus.set_joysticks(input.joysticks);
        self.bus
            .set_keyboard(self.host_keys.union(&self.scripted_keys));
    }

    /// Last completed frame.
    #[must_use]
    pub fn frame(&self) -> &FrameBuffer {
        self.video.frame()
    }

    #[must_use]
    pub fn cpu(&self) -> &M6809 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut M6809 {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &DragonBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut DragonBus {
        &mut self.bus
    }

    #[must_use]
    pub fn video(&self) -> &VideoController {
        &self.video
    }

    #[must_use]
    pub fn sound(&self) -> &SoundGenerator {
        &self.sound
    }

    #[must_use]
    pub fn model(&self) -> DragonModel {
        self.bus.model()
    }

    #[must_use]
    pub fn video_standard(&self) -> VideoStandard {
        self.standard
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Completed frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Mutable reference to the timed input queue.
    pub fn input_queue(&mut self) -> &mut InputQueue {
        &mut self.input_queue
    }

    /// Press a key immediately (stays pressed until released).
    pub fn press_key(&mut self, key: DragonKey) {
        let (row, col) = key.matrix();
        self.host_keys.set_key(row, col, true);
        self.bus
            .set_keyboard(self.host_keys.union(&self.scripted_keys));
    }

    pub fn release_key(&mut self, key: DragonKey) {
        let (row, col) = key.matrix();
        self.host_keys.set_key(row, col, false);
        self.bus
            .set_keyboard(self.host_keys.union(&self.scripted_keys));
    }

    /// Release every host and scripted key.
    pub fn release_all_keys(&mut self) {
        self.host_keys.release_all();
        self.scripted_keys.release_all();
        self.bus.set_keyboard(KeyboardMatrix::new());
    }

    // --- Snapshot plumbing ---

    pub(crate) fn timing_state(&self) -> (u32, u64, bool) {
        (self.cycle_carry, self.sample_remainder, self.cart_line)
    }

    pub(crate) fn key_state(&self) -> (KeyboardMatrix, KeyboardMatrix) {
        (self.host_keys, self.scripted_keys)
    }

    pub(crate) fn sound_mut(&mut self) -> &mut SoundGenerator {
        &mut self.sound
    }

    pub(crate) fn video_mut(&mut self) -> &mut VideoController {
        &mut self.video
    }

    pub(crate) fn restore_machine_state(
        &mut self,
        frame_count: u64,
        keys: (KeyboardMatrix, KeyboardMatrix),
        timing: (u32, u64, bool),
    ) {
        self.frame_count = frame_count;
        (self.host_keys, self.scripted_keys) = keys;
        (self.cycle_carry, self.sample_remainder, self.cart_line) = timing;
        self.bus
            .set_keyboard(self.host_keys.union(&self.scripted_keys));
    }
}

impl Observable for Dragon {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("sam.") {
            let sam = &self.bus.sam;
            match rest {
                "register" => Some(sam.register().into()),
                "mode" => Some(sam.vdg_mode().into()),
                "base" => Some(sam.display_base().into()),
                "page" => Some(sam.page().into()),
                "rate" => Some(sam.rate().into()),
                "size" => Some(sam.memory_size().into()),
                "all_ram" => Some(sam.all_ram().into()),
                _ => None,
            }
        } else if let Some(rest) = path.strip_prefix("pia0.") {
            pia_query(&self.bus.pia0, rest)
        } else if let Some(rest) = path.strip_prefix("pia1.") {
            match rest {
                "dac" => Some(self.bus.audio_levels().dac.into()),
                _ => pia_query(&self.bus.pia1, rest),
            }
        } else if let Some(rest) = path.strip_prefix("video.") {
            let mode = VideoController::mode(&self.bus);
            match rest {
                "mode" => Some(
                    mode.graphics_mode()
                        .map_or_else(|| "alpha".to_string(), |g| format!("{g:?}"))
                        .into(),
                ),
                "css" => Some(mode.css.into()),
                "frame_count" => Some(self.video.frame_count().into()),
                "row" => Some(self.video.row().into()),
                _ => None,
            }
        } else if let Some(rest) = path.strip_prefix("memory.") {
            parse_address(rest).map(|addr| Value::U8(emu_core::Bus::peek(&self.bus, addr)))
        } else {
            match path {
                "frame_count" => Some(self.frame_count.into()),
                "rom_bank" => Some((self.bus.rom_bank() as u8).into()),
                "cartridge.bank" => self
                    .bus
                    .cartridge
                    .as_ref()
                    .map(|c| Value::U8(c.bank() as u8)),
                _ => self.cpu.query(path),
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<6809_paths>",
            "sam.register",
            "sam.mode",
            "sam.base",
            "sam.page",
            "sam.rate",
            "sam.size",
            "sam.all_ram",
            "pia0.cra",
            "pia0.crb",
            "pia0.irq_a",
            "pia0.irq_b",
            "pia1.cra",
            "pia1.crb",
            "pia1.irq_a",
            "pia1.irq_b",
            "pia1.dac",
            "video.mode",
            "video.css",
            "video.frame_count",
            "video.row",
            "memory.<address>",
            "frame_count",
            "rom_bank",
            "cartridge.bank",
        ]
    }
}

fn pia_query(pia: &mos_pia_6520::Pia6520, path: &str) -> Option<Value> {
    match path {
        "cra" => Some(pia.cra().into()),
        "crb" => Some(pia.crb().into()),
        "irq_a" => Some(pia.irq_a().into()),
        "irq_b" => Some(pia.irq_b().into()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ROM that spins at $8000: BRA *.
    fn spin_rom() -> Vec<u8> {
        let mut rom = vec![0x12; 0x4000]; // NOP fill
        rom[0] = 0x20;
        rom[1] = 0xFE;
        rom[0x3FFE] = 0x80;
        rom[0x3FFF] = 0x00;
        rom
    }

    fn make_dragon() -> Dragon {
        Dragon::new(DragonConfig::new(DragonModel::Dragon32, spin_rom())).expect("valid ROM")
    }

    #[test]
    fn reset_loads_vector() {
        let dragon = make_dragon();
        assert_eq!(dragon.cpu().regs.pc, 0x8000);
    }

    #[test]
    fn wrong_rom_size_rejected() {
        let err = Dragon::new(DragonConfig::new(DragonModel::Dragon64, spin_rom()));
        assert!(matches!(err, Err(DragonError::InvalidImage { .. })));
    }

    #[test]
    fn bad_reset_vector_rejected() {
        let mut rom = spin_rom();
        rom[0x3FFE] = 0x04;
        let err = Dragon::new(DragonConfig::new(DragonModel::Dragon32, rom));
        assert!(matches!(err, Err(DragonError::InvalidImage { .. })));
    }

    #[test]
    fn frame_runs_budget_and_carries_overshoot() {
        let mut dragon = make_dragon();
        let mut total = 0u64;
        for _ in 0..10 {
            let out = dragon.run_frame();
            // BRA is 3 cycles, so no frame overshoots by more than 2
            assert!(out.cycles.abs_diff(17_784) <= 2, "{}", out.cycles);
            total += u64::from(out.cycles);
        }
        let (carry, _, _) = dragon.timing_state();
        assert_eq!(total, 10 * 17_784 + u64::from(carry));
        assert_eq!(dragon.frame_count(), 10);
    }

    #[test]
    fn sample_count_tracks_rate_exactly() {
        let mut dragon = make_dragon();
        let mut samples = 0usize;
        let mut cycles = 0u64;
        for _ in 0..50 {
            let out = dragon.run_frame();
            samples += out.samples.len();
            cycles += u64::from(out.cycles);
        }
        let expected = cycles * 44_100 / 888_625;
        assert_eq!(samples as u64, expected);
    }

    #[test]
    fn fsync_and_hsync_flags_set_each_frame() {
        let mut dragon = make_dragon();
        assert_eq!(dragon.bus().pia0.crb() & 0x80, 0, "no edge at reset");
        dragon.run_frame();
        assert_ne!(dragon.bus().pia0.cra() & 0x80, 0, "HSYNC flag");
        assert_ne!(
            dragon.bus().pia0.crb() & 0x80,
            0,
            "first frame sees the FSYNC falling edge"
        );
    }

    #[test]
    fn touch_presses_overlay_key() {
        let mut dragon = make_dragon();
        let overlay = KeyboardOverlay::default();
        let region = overlay.regions()[0];
        let input = HostInput {
            touch: Some((region.x + 1, region.y + 1)),
            ..HostInput::default()
        };
        dragon.apply_input(&input, &overlay);
        let (row, col) = region.key.matrix();
        assert!(dragon.bus().keyboard().is_pressed(row, col));

        dragon.apply_input(&HostInput::default(), &overlay);
        assert!(!dragon.bus().keyboard().is_pressed(row, col));
    }

    #[test]
    fn scripted_keys_survive_host_input() {
        let mut dragon = make_dragon();
        let overlay = KeyboardOverlay::default();
        dragon.input_queue().enqueue_key(DragonKey::A, 0, 5);
        dragon.run_frame();
        dragon.apply_input(&HostInput::default(), &overlay);
        assert!(dragon.bus().keyboard().is_pressed(2, 1));
    }

    #[test]
    fn observable_paths() {
        let dragon = make_dragon();
        assert_eq!(dragon.query("cpu.pc"), Some(Value::U16(0x8000)));
        assert_eq!(dragon.query("memory.$8000"), Some(Value::U8(0x20)));
        assert_eq!(dragon.query("video.mode"), Some(Value::String("alpha".into())));
        assert_eq!(dragon.query("frame_count"), Some(Value::U64(0)));
        assert_eq!(dragon.query("sam.base"), Some(Value::U16(0)));
        assert_eq!(dragon.query("nonsense"), None);
    }
}
