//! Frame and audio handoff between the emulation thread and a host.
//!
//! Completed frames travel emulator → host through one SPSC ring and the
//! host hands the buffers back through a second ring, so steady-state
//! publishing does not allocate. Samples go through their own ring. The
//! emulator side never blocks: a frame with no free buffer is dropped, as
//! are samples that do not fit. Both kinds of drop are counted.

use log::warn;
use ringbuf::{
    HeapRb,
    traits::{Consumer, Observer, Producer, Split},
};

use crate::video::FrameBuffer;

/// Emulator side of a handoff channel.
pub struct EmulatorEnd {
    frames: ringbuf::HeapProd<FrameBuffer>,
    free: ringbuf::HeapCons<FrameBuffer>,
    audio: ringbuf::HeapProd<i16>,
    dropped_frames: u64,
    dropped_samples: u64,
}

/// Host side of a handoff channel.
pub struct HostEnd {
    frames: ringbuf::HeapCons<FrameBuffer>,
    free: ringbuf::HeapProd<FrameBuffer>,
    audio: ringbuf::HeapCons<i16>,
}

/// Create a channel with `frame_slots` frame buffers in circulation and
/// room for `audio_capacity` queued samples. Both are at least 1.
#[must_use]
pub fn channel(frame_slots: usize, audio_capacity: usize) -> (EmulatorEnd, HostEnd) {
    let slots = frame_slots.max(1);
    let (frames_tx, frames_rx) = HeapRb::<FrameBuffer>::new(slots).split();
    let (mut free_tx, free_rx) = HeapRb::<FrameBuffer>::new(slots).split();
    for _ in 0..slots {
        let _ = free_tx.try_push(FrameBuffer::new());
    }
    let (audio_tx, audio_rx) = HeapRb::<i16>::new(audio_capacity.max(1)).split();

    (
        EmulatorEnd {
            frames: frames_tx,
            free: free_rx,
            audio: audio_tx,
            dropped_frames: 0,
            dropped_samples: 0,
        },
        HostEnd {
            frames: frames_rx,
            free: free_tx,
            audio: audio_rx,
        },
    )
}

impl EmulatorEnd {
    /// Offer a frame and its samples to the host without blocking.
    pub fn publish(&mut self, frame: &FrameBuffer, samples: &[i16]) {
        match self.free.try_pop() {
            Some(mut buffer) => {
                buffer.copy_from(frame);
                if self.frames.try_push(buffer).is_err() {
                    self.drop_frame();
                }
            }
            None => self.drop_frame(),
        }

        let pushed = self.audio.push_slice(samples);
        let lost = samples.len() - pushed;
        if lost > 0 {
            self.dropped_samples += lost as u64;
            warn!(
                "audio ring full: dropped {lost} samples ({} total)",
                self.dropped_samples
            );
        }
    }

    fn drop_frame(&mut self) {
        self.dropped_frames += 1;
        warn!(
            "no free frame buffer: dropped frame ({} total)",
            self.dropped_frames
        );
    }

    /// Frames dropped because the host had not returned a buffer.
    #[must_use]
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// Samples dropped because the audio ring was full.
    #[must_use]
    pub fn dropped_samples(&self) -> u64 {
        self.dropped_samples
    }
}

impl HostEnd {
    /// Oldest published frame, if any. Hand it back with [`HostEnd::recycle`].
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        self.frames.try_pop()
    }

    /// Newest published frame, recycling any older ones.
    pub fn latest_frame(&mut self) -> Option<FrameBuffer> {
        let mut latest = self.frames.try_pop()?;
        while let Some(newer) = self.frames.try_pop() {
            self.recycle(std::mem::replace(&mut latest, newer));
        }
        Some(latest)
    }

    /// Return a buffer for reuse by the emulator.
    pub fn recycle(&mut self, frame: FrameBuffer) {
        // Only buffers from this channel circulate, so there is always room
        let _ = self.free.try_push(frame);
    }

    /// Move queued samples into `out`; returns how many were written.
    pub fn read_audio(&mut self, out: &mut [i16]) -> usize {
        self.audio.pop_slice(out)
    }

    /// Samples waiting to be read.
    #[must_use]
    pub fn queued_samples(&self) -> usize {
        self.audio.occupied_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_and_samples_reach_the_host() {
        let (mut emu, mut host) = channel(2, 16);
        let frame = FrameBuffer::new();
        emu.publish(&frame, &[1, 2, 3]);

        let received = host.take_frame().expect("frame published");
        assert_eq!(received, frame);
        let mut out = [0; 8];
        assert_eq!(host.read_audio(&mut out), 3);
        assert_eq!(&out[..3], &[1, 2, 3]);
        assert_eq!(emu.dropped_frames(), 0);
    }

    #[test]
    fn frame_dropped_when_host_holds_every_buffer() {
        let (mut emu, mut host) = channel(1, 16);
        let frame = FrameBuffer::new();
        emu.publish(&frame, &[]);
        emu.publish(&frame, &[]);
        assert_eq!(emu.dropped_frames(), 1);

        let held = host.take_frame().expect("first frame");
        emu.publish(&frame, &[]);
        assert_eq!(emu.dropped_frames(), 2);

        host.recycle(held);
        emu.publish(&frame, &[]);
        assert_eq!(emu.dropped_frames(), 2);
        assert!(host.take_frame().is_some());
    }

    #[test]
    fn excess_samples_are_counted() {
        let (mut emu, host) = channel(1, 4);
        emu.publish(&FrameBuffer::new(), &[0; 10]);
        assert_eq!(emu.dropped_samples(), 6);
        assert_eq!(host.queued_samples(), 4);
    }

    #[test]
    fn latest_frame_recycles_older_ones() {
        let (mut emu, mut host) = channel(3, 4);
        let frame = FrameBuffer::new();
        for _ in 0..3 {
            emu.publish(&frame, &[]);
        }
        let latest = host.latest_frame().expect("frames published");
        assert!(host.take_frame().is_none());
        host.recycle(latest);

        for _ in 0..3 {
            emu.publish(&frame, &[]);
        }
        assert_eq!(emu.dropped_frames(), 0);
    }
}
