use crate::config::load_config;
use crate::ir::parse_family;
use crate::layout::compute_layout;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pedigree-layout", version, about = "Pedigree chart layout engine")]
pub struct Args {
    /// Relations file (.json or .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the layout JSON. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file (objWidth, xSpacing, paperWidth, ...)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Ancestor generations to draw; overrides the config file
    #[arg(short = 'd', long = "depth")]
    pub depth: Option<i32>,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", args.config))?;
    if let Some(depth) = args.depth {
        config.depth = depth;
    }

    let input = read_input(args.input.as_deref())?;
    let family = parse_family(&input)?;
    let layout = compute_layout(&family, &config)?;
    tracing::info!(
        elements = layout.data.len(),
        lines = layout.lines.len(),
        width = layout.width,
        height = layout.height,
        overflow = layout.overflow,
        "layout computed"
    );

    match args.output.as_deref() {
        Some(path) => write_layout_dump(path, &layout, &config, !args.compact)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let dump = LayoutDump::from_layout(&layout, &config);
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            if args.compact {
                serde_json::to_writer(&mut handle, &dump)?;
            } else {
                serde_json::to_writer_pretty(&mut handle, &dump)?;
            }
            writeln!(handle)?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    // A second subscriber (tests, embedding) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
