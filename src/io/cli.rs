//! Command-line interface for generating jigsaw track patterns

use crate::algorithm::executor::{GenerationConfig, JigsawGenerator, Phase, render_piece};
use crate::algorithm::renderer::TileGeometry;
use crate::algorithm::solver::ExhaustionPolicy;
use crate::io::configuration::{
    DEFAULT_BORDER_WIDTH, DEFAULT_COLUMNS, DEFAULT_LINE_WIDTH, DEFAULT_OUTPUT, DEFAULT_ROWS,
    DEFAULT_SEED, DEFAULT_SEPARATION, DEFAULT_STUB_LENGTH, MAX_PERMUTATION_ATTEMPTS,
    PERMUTATION_SWAPS,
};
use crate::io::error::{Result, TilingError};
use crate::io::progress::ProgressManager;
use crate::math::color::DEFAULT_PALETTE;
use crate::spatial::canvas::Canvas;
use crate::spatial::ports::Routing;
use clap::Parser;
use log::info;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "jigtile")]
#[command(
    author,
    version,
    about = "Generate a grid of jigsaw tiles whose colored tracks continue across every seam"
)]
/// Command-line arguments for the pattern generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Output PNG path
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Grid width in tiles
    #[arg(short, long, default_value_t = DEFAULT_COLUMNS)]
    pub columns: usize,

    /// Grid height in tiles
    #[arg(short, long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Width of tabs and tracks in pixels
    #[arg(short = 'w', long, default_value_t = DEFAULT_LINE_WIDTH)]
    pub line_width: u32,

    /// Gap between tile edges and lanes in pixels
    #[arg(long, default_value_t = DEFAULT_SEPARATION)]
    pub separation: u32,

    /// Depth of the boundary tabs in pixels
    #[arg(long, default_value_t = DEFAULT_STUB_LENGTH)]
    pub stub_length: u32,

    /// Thickness of the tile border in pixels (0 disables it)
    #[arg(short, long, default_value_t = DEFAULT_BORDER_WIDTH)]
    pub border_width: u32,

    /// Transpositions applied per routing draw
    #[arg(long, default_value_t = PERMUTATION_SWAPS)]
    pub swaps: usize,

    /// Routing draws per tile before giving up
    #[arg(short = 'a', long, default_value_t = MAX_PERMUTATION_ATTEMPTS)]
    pub max_attempts: usize,

    /// Keep a conflicting routing instead of failing when attempts run out
    #[arg(long)]
    pub relax: bool,

    /// Skip the continuity-preserving route shuffle
    #[arg(long)]
    pub no_shuffle: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Overwrite the output even if it exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Read the written PNG back and compare it with the generated canvas
    #[arg(long)]
    pub verify: bool,

    /// Render one piece with the given exits (e.g. 1,2,0,3) instead of a grid
    #[arg(short, long, value_name = "EXITS", value_parser = parse_exits)]
    pub piece: Option<Routing>,
}

impl Cli {
    /// Check if an existing output file should be left alone
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Tile geometry from the size flags
    pub const fn geometry(&self) -> TileGeometry {
        TileGeometry {
            line_width: self.line_width,
            separation: self.separation,
            stub_length: self.stub_length,
            border_width: self.border_width,
        }
    }

    /// Full generation configuration from the flags
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            columns: self.columns,
            rows: self.rows,
            seed: self.seed,
            geometry: self.geometry(),
            palette: DEFAULT_PALETTE.to_vec(),
            permutation_swaps: self.swaps,
            max_attempts: self.max_attempts,
            exhaustion: if self.relax {
                ExhaustionPolicy::Relax
            } else {
                ExhaustionPolicy::Abort
            },
            shuffle: !self.no_shuffle,
        }
    }
}

/// Parse a comma-separated list of four exit ports into a routing
///
/// # Errors
///
/// Returns a message if the list is not a permutation of `0..4`
pub fn parse_exits(value: &str) -> std::result::Result<Routing, String> {
    let parsed = value
        .split(',')
        .map(|part| part.trim().parse::<usize>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("'{value}' is not a list of port numbers: {e}"))?;
    let exits: [usize; 4] = parsed
        .try_into()
        .map_err(|_| format!("'{value}' must name exactly four exits"))?;
    Routing::from_exits(exits).ok_or_else(|| format!("'{value}' is not a permutation of 0,1,2,3"))
}

/// Runs one generation from parsed arguments, with optional progress display
pub struct PatternProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl PatternProcessor {
    /// Create a new processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Generate and write the image described by the arguments
    ///
    /// Returns whether an image was written; an existing output is skipped
    /// unless `--no-skip` is given.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, generation, writing or verification fails
    pub fn process(&mut self) -> Result<bool> {
        let output = self.cli.output.clone();
        if !self.should_write(&output) {
            return Ok(false);
        }

        let start_time = Instant::now();
        let canvas = match self.cli.piece {
            Some(routing) => render_piece(self.cli.geometry(), &routing, &DEFAULT_PALETTE)?,
            None => self.generate()?,
        };

        canvas.write(&output)?;
        info!(
            "Wrote {}x{} image to {} in {:.2?}",
            canvas.width(),
            canvas.height(),
            output.display(),
            start_time.elapsed()
        );

        if self.cli.verify {
            Self::verify(&canvas, &output)?;
            info!("Verified {}", output.display());
        }

        Ok(true)
    }

    fn should_write(&self, output_path: &Path) -> bool {
        if !self.cli.skip_existing() || !output_path.exists() {
            return true;
        }

        // Allow print for user feedback for progress messages
        #[allow(clippy::print_stderr)]
        if !self.cli.quiet {
            eprintln!("Skipping: {} (output exists)", output_path.display());
        }
        false
    }

    fn generate(&mut self) -> Result<Canvas> {
        let config = self.cli.generation_config();
        let total = config.columns.saturating_mul(config.rows);
        let shuffle = config.shuffle;
        let mut generator = JigsawGenerator::new(config)?;

        self.start_phase(Phase::Solve, total);
        generator.solve(|placed| self.advance(placed))?;

        if shuffle {
            self.start_phase(Phase::Shuffle, 0);
            let stats = generator.shuffle()?;
            if let Some(ref pm) = self.progress_manager {
                pm.set_message(format!("{} swaps", stats.swaps));
            }
        }

        self.start_phase(Phase::Render, total);
        let canvas = generator.render(|drawn| self.advance(drawn))?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }
        Ok(canvas)
    }

    fn start_phase(&mut self, phase: Phase, total: usize) {
        if let Some(ref mut pm) = self.progress_manager {
            pm.start_phase(phase, total);
        }
    }

    fn advance(&self, position: usize) {
        if let Some(ref pm) = self.progress_manager {
            pm.set_position(position);
        }
    }

    fn verify(canvas: &Canvas, output_path: &Path) -> Result<()> {
        let mut written = Canvas::new(canvas.width(), canvas.height());
        written.read(output_path)?;

        let differing_pixels = canvas
            .as_image()
            .pixels()
            .zip(written.as_image().pixels())
            .filter(|(expected, found)| expected != found)
            .count();
        if differing_pixels > 0 {
            return Err(TilingError::VerificationFailed {
                path: output_path.to_path_buf(),
                differing_pixels,
            });
        }
        Ok(())
    }
}
