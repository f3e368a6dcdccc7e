//! Frame scheduler: drives a [`Dragon`] one frame per tick.

use log::debug;

use crate::dragon::Dragon;
use crate::error::Result;
use crate::handoff::EmulatorEnd;
use crate::input::HostInput;
use crate::overlay::KeyboardOverlay;
use crate::snapshot;
use crate::video::FrameBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutput {
    /// Number of the frame just completed, counting from 1.
    pub frame_number: u64,
    pub cycles: u32,
    pub samples: Vec<i16>,
}

pub struct FrameScheduler {
    machine: Dragon,
    state: SchedulerState,
    overlay: KeyboardOverlay,
    /// Host input waiting for the next tick.
    pending_input: Option<HostInput>,
    /// A snapshot was loaded while stopped, so `start` must not reset.
    snapshot_loaded: bool,
    handoff: Option<EmulatorEnd>,
}

impl FrameScheduler {
    /// Wrap a machine, stopped, with the default touch keyboard.
    #[must_use]
    pub fn new(machine: Dragon) -> Self {
        Self {
            machine,
            state: SchedulerState::Stopped,
            overlay: KeyboardOverlay::default(),
            pending_input: None,
            snapshot_loaded: false,
            handoff: None,
        }
    }

    #[must_use]
    pub fn with_overlay(mut self, overlay: KeyboardOverlay) -> Self {
        self.overlay = overlay;
        self
    }

    /// Publish every completed frame through a handoff channel.
    pub fn attach_handoff(&mut self, end: EmulatorEnd) {
        self.handoff = Some(end);
    }

    pub fn detach_handoff(&mut self) -> Option<EmulatorEnd> {
        self.handoff.take()
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    fn set_state(&mut self, state: SchedulerState) {
        if self.state != state {
            debug!("scheduler {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Begin running. From Stopped the machine is reset first, unless a
    /// snapshot was loaded since it stopped.
    pub fn start(&mut self) {
        if self.state != SchedulerState::Stopped {
            return;
        }
        if !self.snapshot_loaded {
            self.machine.reset();
        }
        self.snapshot_loaded = false;
        self.set_state(SchedulerState::Running);
    }

    pub fn pause(&mut self) {
        if self.state == SchedulerState::Running {
            self.set_state(SchedulerState::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state == SchedulerState::Paused {
            self.set_state(SchedulerState::Running);
        }
    }

    pub fn stop(&mut self) {
        self.set_state(SchedulerState::Stopped);
    }

    /// Buffer host input for the next tick. A newer submission replaces
    /// one not yet consumed.
    pub fn submit_input(&mut self, input: HostInput) {
        self.pending_input = Some(input);
    }

    /// Run one frame if running; otherwise do nothing and return `None`.
    pub fn tick(&mut self) -> Option<TickOutput> {
        if self.state != SchedulerState::Running {
            return None;
        }
        if let Some(input) = self.pending_input.take() {
            self.machine.apply_input(&input, &self.overlay);
        }

        let output = self.machine.run_frame();
        if let Some(handoff) = &mut self.handoff {
            handoff.publish(self.machine.frame(), &output.samples);
        }

        Some(TickOutput {
            frame_number: self.machine.frame_count(),
            cycles: output.cycles,
            samples: output.samples,
        })
    }

    /// Serialise the machine; see [`snapshot::save`].
    #[must_use]
    pub fn save_snapshot(&self) -> Vec<u8> {
        snapshot::save(&self.machine)
    }

    /// Restore the machine from a snapshot. On error nothing changes.
    pub fn load_snapshot(&mut self, data: &[u8]) -> Result<()> {
        snapshot::load(&mut self.machine, data)?;
        self.pending_input = None;
        if self.state == SchedulerState::Stopped {
            self.snapshot_loaded = true;
        }
        Ok(())
    }

    /// Last completed frame.
    #[must_use]
    pub fn frame(&self) -> &FrameBuffer {
        self.machine.frame()
    }

    #[must_use]
    pub fn overlay(&self) -> &KeyboardOverlay {
        &self.overlay
    }

    #[must_use]
    pub fn machine(&self) -> &Dragon {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Dragon {
        &mut self.machine
    }

    /// Give back the machine.
    #[must_use]
    pub fn into_machine(self) -> Dragon {
        self.machine
    }
}
