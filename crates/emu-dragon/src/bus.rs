//! Dragon bus: address decoding and device routing.
//!
//! Every access goes through a fixed decode table that maps an address
//! range to a device. The SAM map type, the SAM page bit and the selected
//! ROM and cartridge banks then pick the byte within that device.
//!
//! | Range         | Device |
//! |---------------|--------|
//! | `$0000-$7FFF` | RAM (P1 selects the upper 32K of 64K) |
//! | `$8000-$BFFF` | BASIC ROM (RAM in all-RAM mode) |
//! | `$C000-$FEFF` | Cartridge window (RAM in all-RAM mode) |
//! | `$FF00-$FF1F` | PIA0, register = address & 3 |
//! | `$FF20-$FF3F` | PIA1, register = address & 3 |
//! | `$FF40`       | Cartridge bank select |
//! | `$FF41`       | Sound cartridge PSG |
//! | `$FF42-$FFBF` | Unmapped |
//! | `$FFC0-$FFDF` | SAM control bits |
//! | `$FFE0-$FFFF` | Vectors, from ROM `$BFE0-$BFFF` |
//!
//! Writes that change an audio source (DAC, single-bit sound, sound enable,
//! source select, PSG) are logged with the current cycle offset so the
//! sound generator can replay them at the right sample.

use emu_core::Bus;
use log::debug;
use mos_pia_6520::Pia6520;
use motorola_6883::Sam6883;

use crate::cartridge::Cartridge;
use crate::config::DragonModel;
use crate::joystick::{self, JoystickState};
use crate::keyboard::KeyboardMatrix;

/// Device selected by an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Ram,
    Rom,
    Cartridge,
    Pia0,
    Pia1,
    BankSelect,
    Psg,
    Unmapped,
    Sam,
    Vectors,
}

/// Ordered (first, last, device) decode table covering `$0000-$FFFF`.
const DECODE_TABLE: [(u16, u16, Device); 10] = [
    (0x0000, 0x7FFF, Device::Ram),
    (0x8000, 0xBFFF, Device::Rom),
    (0xC000, 0xFEFF, Device::Cartridge),
    (0xFF00, 0xFF1F, Device::Pia0),
    (0xFF20, 0xFF3F, Device::Pia1),
    (0xFF40, 0xFF40, Device::BankSelect),
    (0xFF41, 0xFF41, Device::Psg),
    (0xFF42, 0xFFBF, Device::Unmapped),
    (0xFFC0, 0xFFDF, Device::Sam),
    (0xFFE0, 0xFFFF, Device::Vectors),
];

/// Device for an address, before map-type overrides.
#[must_use]
pub fn decode(addr: u16) -> Device {
    DECODE_TABLE
        .iter()
        .find(|&&(first, last, _)| (first..=last).contains(&addr))
        .map_or(Device::Unmapped, |&(_, _, device)| device)
}

/// Levels of every audio source selector at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioLevels {
    /// 6-bit DAC (PIA1 PA2-PA7).
    pub dac: u8,
    /// PIA1 PB1, when driven as an output.
    pub single_bit: bool,
    /// PIA1 CB2.
    pub enabled: bool,
    /// Source select `(PIA0 CB2 << 1) | PIA0 CA2`: 0 DAC, 1 cassette,
    /// 2 cartridge, 3 none.
    pub mux: u8,
}

/// An audio register change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    Levels(AudioLevels),
    /// Byte written to the PSG data port.
    Psg(u8),
}

/// An audio register change and when it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioWrite {
    /// Cycle offset inside the current frame window.
    pub cycle: u32,
    pub event: AudioEvent,
}

/// The Dragon bus, implementing `emu_core::Bus`.
pub struct DragonBus {
    model: DragonModel,
    ram: Vec<u8>,
    rom: Vec<u8>,
    pub cartridge: Option<Cartridge>,
    pub sam: Sam6883,
    /// Keyboard, joystick comparator, HSYNC/FSYNC; IRQ.
    pub pia0: Pia6520,
    /// DAC, VDG mode, single-bit sound, CART; FIRQ.
    pub pia1: Pia6520,
    keyboard: KeyboardMatrix,
    joysticks: [JoystickState; 2],
    audio_log: Vec<AudioWrite>,
    audio_clock: u32,
}

impl DragonBus {
    /// `rom` must already be validated for `model`.
    #[must_use]
    pub fn new(model: DragonModel, rom: Vec<u8>, cartridge: Option<Cartridge>) -> Self {
        let mut bus = Self {
            model,
            ram: vec![0; model.ram_size()],
            rom,
            cartridge,
            sam: Sam6883::new(),
            pia0: Pia6520::new(),
            pia1: Pia6520::new(),
            keyboard: KeyboardMatrix::new(),
            joysticks: [JoystickState::default(); 2],
            audio_log: Vec::new(),
            audio_clock: 0,
        };
        bus.refresh_inputs();
        bus
    }

    /// Reset the SAM, both PIAs and the cartridge bank. RAM is kept.
    pub fn reset(&mut self) {
        self.sam.reset();
        self.pia0.reset();
        self.pia1.reset();
        if let Some(cart) = &mut self.cartridge {
            cart.set_bank(0);
        }
        self.audio_log.clear();
        self.audio_clock = 0;
        self.refresh_inputs();
    }

    #[must_use]
    pub fn model(&self) -> DragonModel {
        self.model
    }

    /// `true` when the SAM maps RAM over the ROM and cartridge areas.
    /// Needs 64K fitted.
    #[must_use]
    pub fn all_ram(&self) -> bool {
        self.sam.all_ram() && self.model.ram_size() > 0x8000
    }

    /// Active BASIC ROM bank. On the Dragon 64, PIA1 PB2 driven low
    /// selects the second ROM.
    #[must_use]
    pub fn rom_bank(&self) -> usize {
        let pb2_low = self.pia1.ddr_b() & 0x04 != 0 && self.pia1.port_b_output() & 0x04 == 0;
        if self.model.rom_banks() > 1 && pb2_low {
            1
        } else {
            0
        }
    }

    fn ram_index(&self, addr: u16) -> usize {
        let mut index = usize::from(addr);
        if addr < 0x8000 && self.sam.page() && !self.sam.all_ram() {
            index |= 0x8000;
        }
        index & (self.ram.len() - 1)
    }

    fn rom_byte(&self, offset: u16) -> u8 {
        let index = self.rom_bank() * 0x4000 + usize::from(offset & 0x3FFF);
        self.rom.get(index).copied().unwrap_or(0xFF)
    }

    /// Device that actually answers at `addr` given the current map type.
    #[must_use]
    pub fn resolve(&self, addr: u16) -> Device {
        match decode(addr) {
            Device::Rom | Device::Cartridge if self.all_ram() => Device::Ram,
            device => device,
        }
    }

    /// RAM as fitted, for snapshots and tests.
    #[must_use]
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    pub fn ram_mut(&mut self) -> &mut [u8] {
        &mut self.ram
    }

    /// Copy `data` into RAM at `addr`, ignoring the page bit.
    pub fn load_ram(&mut self, addr: u16, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            let index = (usize::from(addr) + i) & (self.ram.len() - 1);
            self.ram[index] = byte;
        }
    }

    #[must_use]
    pub fn keyboard(&self) -> &KeyboardMatrix {
        &self.keyboard
    }

    pub fn set_keyboard(&mut self, keyboard: KeyboardMatrix) {
        self.keyboard = keyboard;
        self.refresh_inputs();
    }

    #[must_use]
    pub fn joysticks(&self) -> &[JoystickState; 2] {
        &self.joysticks
    }

    pub fn set_joysticks(&mut self, joysticks: [JoystickState; 2]) {
        self.joysticks = joysticks;
        self.refresh_inputs();
    }

    /// Recompute the PIA0 port A pins from the keyboard, the fire buttons
    /// and the joystick comparator.
    pub fn refresh_inputs(&mut self) {
        let strobe = self.pia0.port_b_output() | !self.pia0.ddr_b();
        let mut pins = self.keyboard.read(strobe) & !joystick::fire_mask(&self.joysticks);
        let levels = self.audio_levels();
        if !joystick::comparator(&self.joysticks, levels.mux, levels.dac) {
            pins &= 0x7F;
        }
        self.pia0.input_a = pins;
    }

    /// Current audio source levels, derived from the PIA outputs.
    #[must_use]
    pub fn audio_levels(&self) -> AudioLevels {
        AudioLevels {
            dac: self.pia1.port_a_output() >> 2,
            single_bit: self.pia1.port_b_output() & 0x02 != 0,
            enabled: self.pia1.cb2_output(),
            mux: (u8::from(self.pia0.cb2_output()) << 1) | u8::from(self.pia0.ca2_output()),
        }
    }

    /// Set the cycle offset stamped on audio writes.
    pub fn set_audio_clock(&mut self, cycle: u32) {
        self.audio_clock = cycle;
    }

    #[must_use]
    pub fn audio_clock(&self) -> u32 {
        self.audio_clock
    }

    /// Drain the audio writes logged since the last call.
    pub fn take_audio_log(&mut self) -> Vec<AudioWrite> {
        std::mem::take(&mut self.audio_log)
    }

    fn log_audio(&mut self, event: AudioEvent) {
        self.audio_log.push(AudioWrite {
            cycle: self.audio_clock,
            event,
        });
    }
}

impl Bus for DragonBus {
    fn read(&mut self, addr: u16) -> u8 {
        match self.resolve(addr) {
            Device::Pia0 => {
                self.refresh_inputs();
                self.pia0.read((addr & 3) as u8)
            }
            Device::Pia1 => self.pia1.read((addr & 3) as u8),
            _ => self.peek(addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match self.resolve(addr) {
            Device::Ram => {
                let index = self.ram_index(addr);
                self.ram[index] = value;
            }
            Device::Pia0 => {
                let reg = (addr & 3) as u8;
                self.pia0.write(reg, value);
                if reg & 1 != 0 {
                    // CA2/CB2 select the audio source
                    let levels = self.audio_levels();
                    self.log_audio(AudioEvent::Levels(levels));
                }
                self.refresh_inputs();
            }
            Device::Pia1 => {
                let bank = self.rom_bank();
                self.pia1.write((addr & 3) as u8, value);
                let levels = self.audio_levels();
                self.log_audio(AudioEvent::Levels(levels));
                if self.rom_bank() != bank {
                    debug!("BASIC ROM bank {bank} -> {}", self.rom_bank());
                }
                self.refresh_inputs();
            }
            Device::BankSelect => {
                if let Some(cart) = &mut self.cartridge {
                    cart.select(value);
                }
            }
            Device::Psg => self.log_audio(AudioEvent::Psg(value)),
            Device::Sam => self.sam.access(addr),
            Device::Rom | Device::Cartridge | Device::Vectors | Device::Unmapped => {}
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        match self.resolve(addr) {
            Device::Ram => self.ram[self.ram_index(addr)],
            Device::Rom => self.rom_byte(addr - 0x8000),
            Device::Cartridge => self
                .cartridge
                .as_ref()
                .map_or(0xFF, |cart| cart.read(addr - 0xC000)),
            Device::Pia0 => self.pia0.peek((addr & 3) as u8),
            Device::Pia1 => self.pia1.peek((addr & 3) as u8),
            Device::Vectors => self.rom_byte(addr - 0xC000),
            Device::BankSelect | Device::Psg | Device::Unmapped | Device::Sam => 0xFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with_marker(model: DragonModel) -> Vec<u8> {
        let mut rom = vec![0; model.rom_size()];
        for (bank, chunk) in rom.chunks_mut(0x4000).enumerate() {
            chunk[0] = 0xB0 | bank as u8;
            chunk[0x3FFE] = 0xB0 | bank as u8;
        }
        rom
    }

    fn bus32() -> DragonBus {
        DragonBus::new(
            DragonModel::Dragon32,
            rom_with_marker(DragonModel::Dragon32),
            None,
        )
    }

    fn bus64() -> DragonBus {
        DragonBus::new(
            DragonModel::Dragon64,
            rom_with_marker(DragonModel::Dragon64),
            None,
        )
    }

    #[test]
    fn decode_table_covers_every_address() {
        let mut previous_last = None;
        for &(first, last, _) in &DECODE_TABLE {
            match previous_last {
                None => assert_eq!(first, 0),
                Some(prev) => assert_eq!(first, prev + 1),
            }
            previous_last = Some(last);
        }
        assert_eq!(previous_last, Some(0xFFFF));
    }

    #[test]
    fn decode_boundaries() {
        assert_eq!(decode(0x7FFF), Device::Ram);
        assert_eq!(decode(0x8000), Device::Rom);
        assert_eq!(decode(0xFEFF), Device::Cartridge);
        assert_eq!(decode(0xFF1F), Device::Pia0);
        assert_eq!(decode(0xFF23), Device::Pia1);
        assert_eq!(decode(0xFF40), Device::BankSelect);
        assert_eq!(decode(0xFF41), Device::Psg);
        assert_eq!(decode(0xFF42), Device::Unmapped);
        assert_eq!(decode(0xFFC5), Device::Sam);
        assert_eq!(decode(0xFFFE), Device::Vectors);
    }

    #[test]
    fn ram_round_trip_and_rom_read_only() {
        let mut bus = bus32();
        bus.write(0x1234, 0x56);
        assert_eq!(bus.read(0x1234), 0x56);

        bus.write(0x8000, 0x00);
        assert_eq!(bus.read(0x8000), 0xB0);
    }

    #[test]
    fn vectors_mirror_top_of_rom() {
        let mut bus = bus32();
        assert_eq!(bus.read(0xFFFE), 0xB0);
        assert_eq!(bus.peek(0xFFFE), bus.peek(0xBFFE));
    }

    #[test]
    fn unmapped_reads_ff_and_ignores_writes() {
        let mut bus = bus32();
        bus.write(0xFF50, 0x12);
        assert_eq!(bus.read(0xFF50), 0xFF);
        assert_eq!(bus.read(0xC000), 0xFF, "empty cartridge slot");
    }

    #[test]
    fn sam_bits_toggled_by_address() {
        let mut bus = bus32();
        // Set F0 (bit 3): display base $0200
        bus.write(0xFFC7, 0);
        assert_eq!(bus.sam.display_base(), 0x0200);
        bus.write(0xFFC6, 0);
        assert_eq!(bus.sam.display_base(), 0x0000);
    }

    #[test]
    fn cartridge_bank_register_masks() {
        let mut data = vec![0; 4 * 0x4000];
        for (bank, chunk) in data.chunks_mut(0x4000).enumerate() {
            chunk.fill(bank as u8 + 1);
        }
        let cart = Cartridge::new(data, false).expect("valid cartridge");
        let mut bus = DragonBus::new(
            DragonModel::Dragon32,
            rom_with_marker(DragonModel::Dragon32),
            Some(cart),
        );
        bus.write(0xFF40, 7);
        assert_eq!(bus.read(0xC000), 4);
        bus.write(0xFF40, 1);
        assert_eq!(bus.read(0xFEFF), 2);
    }

    #[test]
    fn dragon32_ignores_all_ram_mode() {
        let mut bus = bus32();
        bus.write(0xFFDF, 0); // TY = 1
        assert!(!bus.all_ram());
        assert_eq!(bus.read(0x8000), 0xB0);
    }

    #[test]
    fn dragon64_all_ram_mode() {
        let mut bus = bus64();
        bus.write(0xFFDF, 0);
        assert!(bus.all_ram());
        bus.write(0x9000, 0x42);
        assert_eq!(bus.read(0x9000), 0x42);
        bus.write(0xFFDE, 0);
        assert_eq!(bus.read(0x9000), 0x00);
    }

    #[test]
    fn dragon64_page_bit_selects_upper_ram() {
        let mut bus = bus64();
        bus.write(0x0100, 0x11);
        bus.write(0xFFD5, 0); // P1 = 1
        assert_eq!(bus.read(0x0100), 0x00);
        bus.write(0x0100, 0x22);
        assert_eq!(bus.ram()[0x8100], 0x22);
        bus.write(0xFFD4, 0);
        assert_eq!(bus.read(0x0100), 0x11);
    }

    #[test]
    fn dragon64_rom_bank_follows_pb2() {
        let mut bus = bus64();
        assert_eq!(bus.read(0x8000), 0xB0);
        bus.write(0xFF23, 0x00); // CRB: select DDRB
        bus.write(0xFF22, 0x04); // PB2 output
        bus.write(0xFF23, 0x04); // back to data
        bus.write(0xFF22, 0x00); // PB2 low
        assert_eq!(bus.rom_bank(), 1);
        assert_eq!(bus.read(0x8000), 0xB1);
        assert_eq!(bus.read(0xFFFE), 0xB1);
    }

    #[test]
    fn keyboard_read_through_pia0() {
        let mut bus = bus32();
        let mut kbd = KeyboardMatrix::new();
        kbd.set_key(2, 1, true); // 'A'
        bus.set_keyboard(kbd);

        // PIA0 port B as outputs, strobe column 1
        bus.write(0xFF03, 0x00);
        bus.write(0xFF02, 0xFF);
        bus.write(0xFF03, 0x04);
        bus.write(0xFF02, !0x02);
        // Port A data register
        bus.write(0xFF01, 0x04);
        assert_eq!(bus.read(0xFF00) & 0x7F, 0x7F & !0x04);

        bus.write(0xFF02, !0x01);
        assert_eq!(bus.read(0xFF00) & 0x7F, 0x7F);
    }

    #[test]
    fn joystick_comparator_on_pa7() {
        let mut bus = bus32();
        bus.set_joysticks([
            JoystickState {
                x: 40,
                y: 0,
                fire: true,
            },
            JoystickState::default(),
        ]);
        // Select right X (CA2 and CB2 manual low)
        bus.write(0xFF01, 0x34);
        bus.write(0xFF03, 0x34);
        // DAC as outputs
        bus.write(0xFF21, 0x00);
        bus.write(0xFF20, 0xFC);
        bus.write(0xFF21, 0x04);

        bus.write(0xFF20, 40 << 2);
        assert_eq!(bus.read(0xFF00) & 0x80, 0x80);
        bus.write(0xFF20, 41 << 2);
        assert_eq!(bus.read(0xFF00) & 0x80, 0x00);
        // Fire button pulls PA0 low
        assert_eq!(bus.read(0xFF00) & 0x01, 0x00);
    }

    #[test]
    fn audio_writes_are_logged_with_cycle() {
        let mut bus = bus32();
        bus.set_audio_clock(100);
        bus.write(0xFF41, 0x9F);
        bus.set_audio_clock(250);
        bus.write(0xFF21, 0x00);

        let log = bus.take_audio_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].cycle, 100);
        assert_eq!(log[0].event, AudioEvent::Psg(0x9F));
        assert_eq!(log[1].cycle, 250);
        assert!(bus.take_audio_log().is_empty());
    }

    #[test]
    fn reset_levels_route_nothing() {
        let bus = bus32();
        let levels = bus.audio_levels();
        assert_eq!(levels.dac, 0);
        assert!(!levels.single_bit);
        assert_eq!(levels.mux, 3);
    }
}
