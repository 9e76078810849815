use anyhow::{Context, Result};
use clap::Parser;
use segdec::decoder::{DecoderRegistry, ImageSegmentDecoder, TensorData, TensorDecoder};
use segdec::input::{RawTensorReader, TensorSource};
use segdec::output::{OutputSink, PngSequenceWriter, RawFrameWriter};
use segdec::segmentation::{Mode, TensorInfo, TensorType, TensorsConfig, LABEL_COUNT};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw tensor stream: consecutive frames of little-endian f32 label scores
    #[arg(short, long)]
    input: PathBuf,

    /// Output path for raw RGBA frames (file, pipe or v4l2loopback device)
    #[arg(short, long, required_unless_present = "png_dir")]
    output: Option<PathBuf>,

    /// Write each frame as a PNG into this directory instead
    #[arg(long, conflicts_with = "output")]
    png_dir: Option<PathBuf>,

    /// Decoder mode
    #[arg(short, long, default_value = "tflite")]
    mode: String,

    /// Upstream frame rate numerator
    #[arg(long, default_value_t = 30)]
    fps: i32,

    /// Upstream frame rate denominator
    #[arg(long, default_value_t = 1)]
    fps_den: i32,

    /// Pace output at the upstream frame rate
    #[arg(long)]
    realtime: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("segdec starting");

    let mut registry = DecoderRegistry::new();
    ImageSegmentDecoder::register(&mut registry);
    tracing::debug!(
        "Registered decoders: {:?}",
        registry.names().collect::<Vec<_>>()
    );

    let mut decoder = registry
        .create(ImageSegmentDecoder::NAME)
        .context("Failed to create decoder")?;
    decoder
        .set_option(0, Some(args.mode.as_str()))
        .with_context(|| format!("Failed to select mode {:?}", args.mode))?;

    // Only the tflite contract exists, so the upstream layout is fixed
    let (width, height) = Mode::TfliteSegmentation.dimensions();
    let config = TensorsConfig {
        tensors: vec![TensorInfo::new(
            TensorType::Float32,
            [LABEL_COUNT as u32, width, height, 1],
        )],
        rate_n: args.fps,
        rate_d: args.fps_den,
    };

    let caps = decoder
        .out_caps(&config)
        .context("Failed to describe output format")?;
    tracing::info!("Output caps: {}", caps);

    let frame_len = config.tensors[0].element_count();
    let mut source = RawTensorReader::open(&args.input, frame_len)?;

    let mut sink: Box<dyn OutputSink> = match (&args.output, &args.png_dir) {
        (_, Some(dir)) => Box::new(PngSequenceWriter::new(dir)?),
        (Some(path), None) => Box::new(RawFrameWriter::create(path)?),
        (None, None) => anyhow::bail!("No output given"),
    };

    let frame_duration = match (args.realtime, caps.framerate) {
        (true, Some(rate)) if rate.numerator > 0 => Some(Duration::from_secs_f64(
            rate.denominator as f64 / rate.numerator as f64,
        )),
        _ => None,
    };

    run_pipeline(
        &mut source,
        decoder.as_mut(),
        sink.as_mut(),
        &config,
        (caps.width, caps.height),
        frame_duration,
    )?;

    decoder.exit();
    registry.deregister(ImageSegmentDecoder::NAME);

    Ok(())
}

fn run_pipeline(
    source: &mut dyn TensorSource,
    decoder: &mut dyn TensorDecoder,
    sink: &mut dyn OutputSink,
    config: &TensorsConfig,
    (width, height): (u32, u32),
    frame_duration: Option<Duration>,
) -> Result<()> {
    let mut frame_count = 0u64;
    let mut total_read_time = Duration::ZERO;
    let mut total_decode_time = Duration::ZERO;
    let mut total_output_time = Duration::ZERO;
    let mut frame = Vec::new();

    tracing::info!(
        "Starting decode loop, {} scores per frame",
        source.frame_len()
    );

    loop {
        let loop_start = Instant::now();

        // Read tensor
        let read_start = Instant::now();
        let Some(scores) = source.next_frame().context("Failed to read tensor")? else {
            break;
        };
        total_read_time += read_start.elapsed();

        // Decode
        let decode_start = Instant::now();
        decoder
            .decode(config, &[TensorData::Float32(&scores)], &mut frame)
            .with_context(|| format!("Failed to decode frame {}", frame_count))?;
        total_decode_time += decode_start.elapsed();

        // Output frame
        let output_start = Instant::now();
        sink.write_frame(&frame, width, height)
            .context("Failed to write frame")?;
        total_output_time += output_start.elapsed();

        frame_count += 1;

        // Log stats every 30 frames
        if frame_count % 30 == 0 {
            let avg_read_ms = total_read_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let avg_decode_ms = total_decode_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let avg_output_ms = total_output_time.as_secs_f64() * 1000.0 / frame_count as f64;
            tracing::info!(
                "Frame {}: read={:.1}ms, decode={:.1}ms, output={:.1}ms",
                frame_count,
                avg_read_ms,
                avg_decode_ms,
                avg_output_ms
            );
        }

        // Frame rate limiting
        if let Some(frame_duration) = frame_duration {
            let elapsed = loop_start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            }
        }
    }

    tracing::info!(
        "Decoded {} frames, wrote {}",
        frame_count,
        sink.frames_written()
    );
    Ok(())
}
