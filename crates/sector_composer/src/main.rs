//! Sector composer.
//!
//! Splits a CAD scene into the main octree and the highlight tree and writes
//! the result as JSON files ready for a streaming viewer.
//!
//! Input: `{ "primitives": [...] }`, see `sector_splitter::Primitive`.
//! Output: see the `output` module.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use sector_splitter::SceneComposer;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use output::SceneInput;

/// Splits CAD scenes into budgeted, streamable sector trees.
#[derive(Parser, Debug)]
#[command(name = "sector_composer")]
#[command(about = "Splits a primitive list into streamable sector trees")]
struct Args {
	/// Scene JSON with a `primitives` array.
	#[arg(short, long)]
	input: PathBuf,

	/// Output directory.
	#[arg(short, long)]
	output: PathBuf,

	/// Optional TOML file overriding the default tunables.
	#[arg(short, long)]
	config: Option<PathBuf>,
}

fn main() -> Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let args = Args::parse();

	let config = config::load(args.config.as_deref())?;
	let input = SceneInput::load(&args.input)?;
	info!(
		input = %args.input.display(),
		primitives = input.primitives.len(),
		"scene loaded"
	);

	let started = Instant::now();
	let scene = SceneComposer::new(config)
		.compose(input.primitives)
		.context("Composing sector trees")?;
	info!(elapsed_ms = started.elapsed().as_millis() as u64, "composition done");

	let written = output::write_scene(&args.output, &scene)?;
	info!(
		files = written,
		output = %args.output.display(),
		"output written"
	);

	Ok(())
}
