use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sonoscope::{AnalysisConfig, AnalysisEngine, LogSink};

#[derive(Parser, Debug)]
#[command(
    name = "sonoscope",
    about = "Block-wise audio feature extraction and classification over WAV files"
)]
struct Cli {
    /// Optional JSON config file; defaults apply when absent
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a WAV file hop by hop and print per-block results
    Analyze {
        /// Input WAV file
        #[arg(long)]
        input: PathBuf,
        /// Emit one JSON object per block instead of a text line
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Load a previously saved training set before analyzing
        #[arg(long)]
        training: Option<PathBuf>,
    },
    /// Print the detected fundamental for each hop of a WAV file
    Pitch {
        /// Input WAV file
        #[arg(long)]
        input: PathBuf,
    },
    /// Print the effective configuration as JSON
    DumpConfig,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AnalysisConfig::load_from_file(path),
        None => AnalysisConfig::default(),
    };

    match cli.command {
        Commands::Analyze {
            input,
            json,
            training,
        } => run_analyze(config, &input, json, training),
        Commands::Pitch { input } => run_pitch(config, &input),
        Commands::DumpConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::from(0))
        }
    }
}

/// Decode a WAV file to mono f32 samples, averaging channels
fn read_wav(path: &PathBuf) -> Result<(Vec<f32>, u32)> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .context("decoding float samples")?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .context("decoding integer samples")?
        }
    };

    let mono: Vec<f32> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    Ok((mono, spec.sample_rate))
}

fn run_analyze(
    mut config: AnalysisConfig,
    input: &PathBuf,
    json: bool,
    training: Option<PathBuf>,
) -> Result<ExitCode> {
    let (samples, sample_rate) = read_wav(input)?;
    config.sample_rate = sample_rate;

    let engine = AnalysisEngine::with_event_sink(config.clone(), std::sync::Arc::new(LogSink))
        .context("building engine")?;
    if let Some(path) = training {
        engine
            .load_training(&path)
            .with_context(|| format!("loading training set {}", path.display()))?;
    }

    let mut offset = 0usize;
    while offset + config.frame_size <= samples.len() {
        let block = &samples[offset..offset + config.frame_size];
        let features = engine.analyze(block);
        let result = engine.classify(&features);

        if json {
            let line = serde_json::json!({
                "offset": offset,
                "features": features,
                "label": result.label,
                "confidence": result.confidence,
            });
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!(
                "{:>10}  centroid {:>8.1} Hz  rms {:>7.4}  pitch {:>7.1} Hz  {:?} ({:.2})",
                offset, features.centroid, features.rms, features.pitch_hz, result.label,
                result.confidence
            );
        }
        offset += config.hop_size;
    }

    let stats = engine.stats();
    eprintln!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(ExitCode::from(0))
}

fn run_pitch(mut config: AnalysisConfig, input: &PathBuf) -> Result<ExitCode> {
    let (samples, sample_rate) = read_wav(input)?;
    config.sample_rate = sample_rate;

    let engine = AnalysisEngine::new(config.clone()).context("building engine")?;
    let mut offset = 0usize;
    while offset + config.frame_size <= samples.len() {
        let block = &samples[offset..offset + config.frame_size];
        let pitch = engine.detect_pitch(block);
        println!("{:>10}  {:>8.2} Hz", offset, pitch);
        offset += config.hop_size;
    }
    Ok(ExitCode::from(0))
}
