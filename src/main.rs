// SPDX-License-Identifier: MIT
//
// n-shade — generate 10-stop color palettes from a single anchor color.
//
// This is the thin command-line layer over the two library crates:
//
//   n-color   → parsing, gamut mapping, formatting
//   n-palette → pattern learning, palette generation, optical transfer
//
// Three modes:
//
//   generate  one anchor color at one stop → one palette
//   batch     many `color@stop` pairs → many palettes, failures reported
//   transform reference lightness/chroma on a target hue → one color
//
// The pattern is learned from the builtin example palettes unless a JSON
// palette file is given with `--pattern`. Output is a plain listing, or
// JSON with `--json` (to stdout or `--output`).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use n_color::{ColorError, OutputFormat, format_color};
use n_palette::{
    BatchFailure, BatchOptions, BatchPair, BuiltinPalettes, Config, Error, Exporter, GeneratedPalette,
    JsonExporter, JsonPaletteFile, PaletteRequest, PatternSource, SmoothedPattern, StopPosition, generate_batch,
    generate_palette, load_pattern, transform,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Library warnings (skipped examples, failed batch pairs) always show;
/// the binary's own progress shows at info.
const DEFAULT_LOG_FILTER: &str = "warn,n_shade=info";

#[derive(Parser)]
#[command(name = "n-shade")]
#[command(about = "Generate 10-stop color palettes from a single anchor color")]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one palette around an anchor color
    Generate {
        /// Anchor color in any CSS notation
        color: String,

        /// Stop the anchor color sits at (100..1000)
        #[arg(long, default_value_t = 500)]
        stop: u16,

        /// Palette name
        #[arg(long, default_value = "palette")]
        name: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate one palette per `color@stop` pair
    Batch {
        /// Pairs such as `#2D72D2@500`
        #[arg(required = true)]
        pairs: Vec<String>,

        /// Group name; palettes are named `<group>-1`, `<group>-2`, …
        #[arg(long, default_value = "palette")]
        group: String,

        /// Palettes generated at once (1..8)
        #[arg(long)]
        concurrency: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Put a reference color's lightness and chroma on a target's hue
    Transform {
        reference: String,
        target: String,

        /// Output format (hex, rgb, oklch, oklab)
        #[arg(long)]
        format: Option<String>,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Output format (hex, rgb, oklch, oklab)
    #[arg(long)]
    format: Option<String>,

    /// JSON palette file to learn the pattern from (default: builtins)
    #[arg(long)]
    pattern: Option<PathBuf>,

    /// Smoothing strength override (0..1)
    #[arg(long)]
    smoothing: Option<f32>,

    /// Print JSON instead of a listing
    #[arg(long)]
    json: bool,

    /// Write JSON to this file instead of stdout (implies --json)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::from_path(path).with_context(|| format!("reading config {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Command::Generate {
            color,
            stop,
            name,
            output,
        } => {
            let format = output.apply(&mut config)?;
            let pattern = output.load_pattern(&config)?;
            let request = PaletteRequest::new(color, parse_stop(stop)?, format, name);
            let palette = generate_palette(&request, &pattern)?;
            output.emit(&[palette])?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Batch {
            pairs,
            group,
            concurrency,
            output,
        } => {
            let format = output.apply(&mut config)?;
            if let Some(n) = concurrency {
                config.max_concurrency = n;
            }
            let pattern = output.load_pattern(&config)?;
            let pairs = pairs.iter().map(|p| parse_pair(p)).collect::<anyhow::Result<Vec<_>>>()?;
            let options = BatchOptions {
                group_name: group,
                max_concurrency: config.concurrency(),
            };

            let result = generate_batch(&pairs, format, &pattern, &options);
            output.emit(&result.palettes)?;
            for failure in &result.failures {
                eprintln!("skipped {}", describe_failure(failure));
            }
            if result.palettes.is_empty() {
                bail!("no palette could be generated");
            }
            Ok(if result.partial { ExitCode::from(2) } else { ExitCode::SUCCESS })
        }
        Command::Transform {
            reference,
            target,
            format,
        } => {
            if let Some(name) = format {
                config.output_format = parse_format(&name)?;
            }
            let outcome = transform(&reference, &target, &config.viability())?;
            println!("{}", format_color(outcome.color, config.output_format)?);
            if !outcome.viable {
                tracing::warn!(%reference, %target, "transfer is unreliable: reference too light, too dark, or loses too much chroma");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

impl OutputArgs {
    /// Fold CLI overrides into `config`; returns the output format.
    fn apply(&self, config: &mut Config) -> anyhow::Result<OutputFormat> {
        if let Some(name) = &self.format {
            config.output_format = parse_format(name)?;
        }
        if let Some(strength) = self.smoothing {
            config.smoothing_strength = strength;
        }
        Ok(config.output_format)
    }

    fn load_pattern(&self, config: &Config) -> anyhow::Result<SmoothedPattern> {
        let source: Box<dyn PatternSource> = match &self.pattern {
            Some(path) => Box::new(JsonPaletteFile::new(path.clone())),
            None => Box::new(BuiltinPalettes::all()),
        };
        let pattern =
            load_pattern(source.as_ref(), config).with_context(|| format!("learning pattern from {}", source.id()))?;
        Ok(pattern)
    }

    fn emit(&self, palettes: &[GeneratedPalette]) -> anyhow::Result<()> {
        if let Some(path) = &self.output {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            JsonExporter::new(BufWriter::new(file)).export(palettes)?;
            tracing::info!(path = %path.display(), palettes = palettes.len(), "palettes written");
            return Ok(());
        }

        let stdout = io::stdout();
        if self.json {
            JsonExporter::new(stdout.lock()).export(palettes)?;
            return Ok(());
        }

        let mut out = stdout.lock();
        for (i, palette) in palettes.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{} ({} at {})", palette.name, palette.input_color, palette.anchor_stop)?;
            for stop in &palette.stops {
                let marker = if stop.position == palette.anchor_stop { "*" } else { " " };
                writeln!(out, "{marker} {:>4}  {}", stop.position, stop.value)?;
            }
        }
        Ok(())
    }
}

fn parse_format(name: &str) -> Result<OutputFormat, Error> {
    name.parse().map_err(Error::UnknownFormat)
}

fn parse_stop(value: u16) -> anyhow::Result<StopPosition> {
    Ok(StopPosition::try_from(value)?)
}

/// `color@stop`; the stop defaults to 500.
///
/// Only the syntax is checked here. A numeric but invalid stop such as 550
/// is left for the batch to report against its own pair.
fn parse_pair(text: &str) -> anyhow::Result<BatchPair> {
    let Some((color, stop)) = text.rsplit_once('@') else {
        return Ok(BatchPair::new(text, StopPosition::REFERENCE));
    };
    let stop: u16 = stop
        .trim()
        .parse()
        .with_context(|| format!("stop in {text:?} is not a number"))?;
    Ok(BatchPair::new(color.trim(), stop))
}

fn describe_failure(failure: &BatchFailure) -> String {
    let why = match &failure.reason {
        Error::Color(ColorError::Parse { input, .. }) => format!("{input:?} is not a color"),
        Error::Color(ColorError::Conversion {
            from_space,
            to_space,
            reason,
            ..
        }) => format!("cannot convert {from_space} to {to_space}: {reason}"),
        Error::Pattern(err) => format!("pattern: {err}"),
        Error::GenerationInvariant { detail } => format!("internal error: {detail}"),
        Error::UnknownFormat(name) => format!("unknown format {name:?}"),
        Error::Io(err) => format!("i/o: {err}"),
        Error::Json(err) => format!("json: {err}"),
    };
    format!("pair {} ({} @ {}): {why}", failure.index + 1, failure.input, failure.stop)
}
