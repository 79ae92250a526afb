//! Synthetic capture demo.
//!
//! Stands in for the camera layer: synthesizes a short sequence of timed
//! frames, runs them through the upscaling processor, and logs what comes
//! out. Useful for eyeballing throughput and the skip-frame behavior
//! without camera hardware.

use std::time::{Duration, Instant};

use anyhow::Result;
use framelift_engine::frame::{PixelBuffer, PixelFormat, TimedFrame};
use framelift_engine::logging::{self, LoggingConfig};
use framelift_engine::processor::{FrameProcessor, ProcessorOptions};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 360;
const FRAMES: u32 = 60;

fn main() -> Result<()> {
    logging::init_logging(LoggingConfig::default());

    let mut processor = FrameProcessor::new(ProcessorOptions::default())?;
    let frame_duration = Duration::from_millis(33);

    let mut produced = 0u32;
    let started = Instant::now();

    for index in 0..FRAMES {
        let frame = synth_frame(index, frame_duration)?;
        match processor.process(&frame) {
            Some(out) => {
                produced += 1;
                if let Some(image) = out.image.as_ref() {
                    log::debug!(
                        "frame {index}: {WIDTH}x{HEIGHT} -> {}x{} at pts {:?}",
                        image.width(),
                        image.height(),
                        out.pts,
                    );
                }
            }
            None => log::info!("frame {index}: skipped, consumer holds previous output"),
        }
    }

    let elapsed = started.elapsed();
    let config = processor
        .scaler_config()
        .map(|c| format!("{}x{} -> {}x{}", c.input_width, c.input_height, c.output_width, c.output_height))
        .unwrap_or_else(|| "never configured".into());
    log::info!(
        "processed {produced}/{FRAMES} frames in {elapsed:.2?} ({:.1} fps), scaler {config}",
        produced as f64 / elapsed.as_secs_f64(),
    );

    Ok(())
}

/// A sliding diagonal gradient so consecutive frames differ visibly.
fn synth_frame(index: u32, frame_duration: Duration) -> Result<TimedFrame> {
    let mut pixels = vec![0u8; WIDTH as usize * HEIGHT as usize * 4];
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let i = (y as usize * WIDTH as usize + x as usize) * 4;
            pixels[i] = ((x + index * 4) % 256) as u8;
            pixels[i + 1] = ((y + index * 2) % 256) as u8;
            pixels[i + 2] = ((x + y) % 256) as u8;
            pixels[i + 3] = 255;
        }
    }
    let image = PixelBuffer::tight(PixelFormat::Rgba8, WIDTH, HEIGHT, pixels)?;
    Ok(TimedFrame::new(image, frame_duration * index, frame_duration))
}
