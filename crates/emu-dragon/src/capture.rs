//! Headless capture: PNG screenshots and WAV audio dumps.

#![allow(clippy::cast_possible_truncation)]

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::error::Result;
use crate::video::FrameBuffer;

/// Save a frame as an RGBA PNG.
pub fn save_screenshot(frame: &FrameBuffer, path: &Path) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        frame.width() as u32,
        frame.height() as u32,
    );
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    // ARGB32 → RGBA bytes
    let mut rgba = Vec::with_capacity(frame.width() * frame.height() * 4);
    for pixel in frame.to_argb() {
        rgba.extend_from_slice(&[
            (pixel >> 16) as u8,
            (pixel >> 8) as u8,
            pixel as u8,
            0xFF,
        ]);
    }

    writer.write_image_data(&rgba)?;
    writer.finish()?;
    Ok(())
}

/// Save mono 16-bit samples as a WAV file.
pub fn save_audio(samples: &[i16], sample_rate: u32, path: &Path) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("emu-dragon-{}-{name}", std::process::id()))
    }

    #[test]
    fn screenshot_is_a_png() {
        let path = temp_path("shot.png");
        save_screenshot(&FrameBuffer::new(), &path).expect("write PNG");
        let bytes = fs::read(&path).expect("read back");
        let _ = fs::remove_file(&path);
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn audio_round_trips_through_wav() {
        let path = temp_path("audio.wav");
        let samples = [0i16, 100, -100, i16::MAX];
        save_audio(&samples, 22_050, &path).expect("write WAV");

        let mut reader = hound::WavReader::open(&path).expect("open WAV");
        assert_eq!(reader.spec().sample_rate, 22_050);
        let read: Vec<i16> = reader
            .samples::<i16>()
            .collect::<std::result::Result<_, _>>()
            .expect("decode WAV");
        let _ = fs::remove_file(&path);
        assert_eq!(read, samples);
    }
}
