use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use lc3_decoder::config::Config;
use lc3_decoder::decoder::Decoder;
use lc3_decoder::engine::liblc3::Liblc3;
use lc3_decoder::logging;
use lc3_decoder::stream::decode_stream;
use lc3_decoder::wav::WavPcmSink;

fn main() -> Result<()> {
    logging::init();
    let params = Params::parse();
    let config = params.config()?;

    let input = File::open(&params.input_path)
        .with_context(|| format!("failed to open input '{}'", params.input_path.display()))?;

    let mut decoder = Decoder::new(Liblc3, config)?;
    let mut sink = WavPcmSink::create(&params.output_path, &config)?;

    let summary = decode_stream(&mut decoder, BufReader::new(input), &mut sink)?;
    sink.finalize()?;

    info!(frames = summary.frames, "decode complete");
    println!(
        "decoded {} frames ({} PCM bytes) into {}",
        summary.frames,
        summary.pcm_bytes,
        params.output_path.display()
    );
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "lc3-decode")]
#[command(about = "Decode a raw stream of mono LC3 blocks into a WAV file")]
struct Params {
    /// Concatenated LC3 blocks, each exactly one frame long.
    #[arg(short = 'i', long = "input")]
    pub input_path: PathBuf,

    /// WAV file to write.
    #[arg(short = 'o', long = "output")]
    pub output_path: PathBuf,

    /// JSON decoder configuration; overrides the individual flags below.
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<PathBuf>,

    #[arg(short = 'r', long = "sample-rate", default_value_t = 16_000)]
    pub sample_rate: u32,

    #[arg(short = 'f', long = "frame-us", default_value_t = 10_000)]
    pub frame_us: u16,

    #[arg(short = 'd', long = "bit-depth", default_value_t = 16)]
    pub bit_depth: u8,

    #[arg(short = 'b', long = "bit-rate", default_value_t = 32_000)]
    pub bit_rate: u32,
}

impl Params {
    fn config(&self) -> Result<Config> {
        if let Some(path) = &self.config_path {
            let file = File::open(path)
                .with_context(|| format!("failed to open config '{}'", path.display()))?;
            return serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("invalid decoder config in '{}'", path.display()));
        }

        Ok(Config::new(
            self.bit_depth,
            lc3_decoder::config::MONO,
            self.sample_rate,
            self.frame_us,
            self.bit_rate,
        )?)
    }
}
