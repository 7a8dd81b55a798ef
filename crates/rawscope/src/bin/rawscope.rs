//! rawscope command-line interface.
//!
//! Usage: rawscope [--config <json>] [overrides] <infer|inspect|explore>

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use rawscope::{
    inspect_source, run_explorer, run_inspection, ByteOrder, ElementType, EncodingHint, Options,
    RawscopeError, Result, Vec3, VoxelGridSpec,
};

#[derive(Parser)]
#[command(name = "rawscope")]
#[command(version, about = "Inspect and explore headerless raw volume scans")]
struct Cli {
    /// JSON options file; flags below override its fields
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report the voxel encodings consistent with the input size
    Infer,

    /// Write the mid slice, histogram and stretched views as PNGs
    Inspect,

    /// Read slice/level commands from stdin and write a PNG per redraw
    Explore,
}

#[derive(Args)]
struct Overrides {
    /// Raw volume file, or zip archive when --entry is given
    #[arg(long, short, global = true)]
    input: Option<PathBuf>,

    /// Entry name inside the zip archive
    #[arg(long, global = true)]
    entry: Option<String>,

    /// Grid as depth,height,width
    #[arg(long, global = true, value_parser = parse_list::<usize, 3>)]
    dims: Option<[usize; 3]>,

    /// Display-range percentiles as low,high
    #[arg(long, global = true, value_parser = parse_list::<f64, 2>)]
    percentiles: Option<[f64; 2]>,

    /// Initial slice index (default: middle slice)
    #[arg(long, global = true)]
    slice: Option<usize>,

    /// Initial iso-contour threshold in [0, 1]
    #[arg(long, global = true)]
    threshold: Option<f32>,

    /// Byte order of multi-byte elements: native, little, big
    #[arg(long, global = true)]
    byte_order: Option<ByteOrder>,

    /// Element type for two-byte data: int16, uint16
    #[arg(long, global = true, conflicts_with = "expected_range")]
    element_type: Option<ElementType>,

    /// Expected intensity range as min,max; picks the element type that holds it
    #[arg(long, global = true, allow_hyphen_values = true, value_parser = parse_list::<f64, 2>)]
    expected_range: Option<[f64; 2]>,

    /// Directory for rendered images
    #[arg(long, short, global = true)]
    output_dir: Option<PathBuf>,

    /// Color map of the explorer view: gray, inferno, viridis
    #[arg(long, global = true)]
    colormap: Option<String>,

    /// Contour color as r,g,b in [0, 1]
    #[arg(long, global = true, value_parser = parse_list::<f32, 3>)]
    contour_color: Option<[f32; 3]>,

    /// Integer upscaling of rendered slices
    #[arg(long, global = true)]
    scale: Option<u32>,

    /// Keep every explorer frame as a numbered file
    #[arg(long, global = true)]
    keep_frames: bool,
}

impl Overrides {
    fn apply(self, options: &mut Options) -> Result<()> {
        if let Some(input) = self.input {
            options.input = input;
        }
        if let Some(entry) = self.entry {
            options.archive_entry = Some(entry);
        }
        if let Some([depth, height, width]) = self.dims {
            options.dims = VoxelGridSpec::new(depth, height, width)?;
        }
        if let Some([low, high]) = self.percentiles {
            options.percentiles = (low, high);
        }
        if let Some(slice) = self.slice {
            options.initial_slice = Some(slice);
        }
        if let Some(threshold) = self.threshold {
            options.threshold = threshold;
        }
        if let Some(byte_order) = self.byte_order {
            options.byte_order = byte_order;
        }
        if let Some(element_type) = self.element_type {
            options.encoding_hint = EncodingHint::Explicit(element_type);
        }
        if let Some([min, max]) = self.expected_range {
            options.encoding_hint = EncodingHint::ExpectedRange { min, max };
        }
        if let Some(dir) = self.output_dir {
            options.output_dir = dir;
        }
        if let Some(colormap) = self.colormap {
            options.colormap = colormap;
        }
        if let Some(rgb) = self.contour_color {
            options.contour_color = Vec3::from_array(rgb);
        }
        if let Some(scale) = self.scale {
            options.scale = scale;
        }
        if self.keep_frames {
            options.keep_frames = true;
        }
        Ok(())
    }
}

/// Parses exactly `N` comma-separated values.
fn parse_list<T: FromStr, const N: usize>(s: &str) -> std::result::Result<[T; N], String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse().map_err(|_| format!("invalid value '{v}'")))
        .collect::<std::result::Result<Vec<T>, String>>()?;
    values
        .try_into()
        .map_err(|v: Vec<T>| format!("expected {N} comma-separated values, got {}", v.len()))
}

fn main() -> ExitCode {
    rawscope::init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut options = match &cli.config {
        Some(path) => Options::from_json_file(path)?,
        None => Options::default(),
    };
    cli.overrides.apply(&mut options)?;

    match cli.command {
        Command::Infer => infer(&options),
        Command::Inspect => {
            let report = run_inspection(&options)?;
            println!("{}", report.diagnosis);
            println!("Encoding: {}", report.encoding);
            println!("{}", report.stats);
            for path in &report.written {
                println!("wrote {}", path.display());
            }
            Ok(())
        }
        Command::Explore => {
            let stdin = std::io::stdin();
            let summary = run_explorer(&options, stdin.lock(), std::io::stdout())?;
            println!(
                "{} frames, final {}",
                summary.redraws,
                summary.final_state.title()
            );
            Ok(())
        }
    }
}

fn infer(options: &Options) -> Result<()> {
    let source = options.source();
    let diagnosis = inspect_source(source.as_ref(), options.grid())?;
    println!("{diagnosis}");
    match diagnosis.resolve(&options.encoding_hint, options.byte_order) {
        Ok(encoding) => println!("Resolved: {encoding}"),
        Err(RawscopeError::AmbiguousEncoding { .. }) => {
            println!("Resolved: ambiguous; pass --element-type or --expected-range");
        }
        Err(err) => return Err(err),
    }
    Ok(())
}
