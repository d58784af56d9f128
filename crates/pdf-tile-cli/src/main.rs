use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_tile::layout::GridPosition;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdftile", about = "Tile sewing pattern pages onto one large sheet", version)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trim page margins and tile the pages onto a single sheet
    Tile {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file (defaults to <input>_<PAPER>_no_margins.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        tiling: TilingArgs,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Show page count and page size of a PDF
    Info {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print where every page would be placed, without rendering
    Plan {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        tiling: TilingArgs,
    },
}

/// Tiling options shared by `tile` and `plan`.
/// Flags left unset keep the value from `--config` or the default.
#[derive(Args)]
struct TilingArgs {
    /// First page to extract (1-based)
    #[arg(long)]
    start: Option<usize>,

    /// Last page to extract (inclusive, defaults to the last page)
    #[arg(long)]
    end: Option<usize>,

    /// Margin removed from each side of every page, in cm
    #[arg(long)]
    margin_cm: Option<f32>,

    /// Extra trim added to the margin, in points
    #[arg(long)]
    extra_trim_pt: Option<f32>,

    /// Tile overlap on each side, in mm
    #[arg(long)]
    overlap_mm: Option<f32>,

    /// Grid rows
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns
    #[arg(long)]
    cols: Option<usize>,

    /// Output paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Output orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Scale the grid to fit the sheet
    #[arg(long)]
    fit: bool,

    /// Fraction of the sheet the fitted grid may fill (implies --fit)
    #[arg(long)]
    fill_fraction: Option<f32>,

    /// Cells to fill, in order, as 1-based "row,col;row,col;..."
    #[arg(long, value_parser = parse_cells)]
    cells: Option<CellList>,

    /// Draw a 10 cm calibration square
    #[arg(long)]
    calibration_square: bool,

    /// Load options from a JSON file before applying flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective options to a JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,
}

/// Cells parsed from `--cells`
#[derive(Clone, Debug)]
struct CellList(Vec<GridPosition>);

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A0,
    A1,
    A2,
    A3,
    A4,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PaperArg> for pdf_tile::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A0 => Self::A0,
            PaperArg::A1 => Self::A1,
            PaperArg::A2 => Self::A2,
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
        }
    }
}

impl From<OrientationArg> for pdf_tile::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl TilingArgs {
    /// Build the effective options: config file first, then flags
    async fn to_options(&self) -> Result<pdf_tile::TileOptions> {
        let mut options = match &self.config {
            Some(path) => pdf_tile::TileOptions::load(path)
                .await
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => pdf_tile::TileOptions::default(),
        };

        if let Some(start) = self.start {
            options.page_range.start = start;
        }
        if self.end.is_some() {
            options.page_range.end = self.end;
        }
        if let Some(margin_cm) = self.margin_cm {
            options.margin_cm = margin_cm;
        }
        if let Some(extra_trim_pt) = self.extra_trim_pt {
            options.extra_trim_pt = extra_trim_pt;
        }
        if let Some(overlap_mm) = self.overlap_mm {
            options.overlap_mm = overlap_mm;
        }
        if let Some(rows) = self.rows {
            options.grid.rows = rows;
        }
        if let Some(cols) = self.cols {
            options.grid.cols = cols;
        }
        if let Some(paper) = self.paper {
            options.paper_size = paper.into();
        }
        if let Some(orientation) = self.orientation {
            options.orientation = orientation.into();
        }
        if let Some(fill_fraction) = self.fill_fraction {
            options.scaling = pdf_tile::ScalingMode::Fit { fill_fraction };
        } else if self.fit {
            options.scaling = pdf_tile::ScalingMode::fit();
        }
        if let Some(CellList(cells)) = &self.cells {
            options.cell_order = pdf_tile::CellOrder::Selected(cells.clone());
        }
        if self.calibration_square {
            options.calibration_square = true;
        }

        options.validate()?;

        if let Some(path) = &self.save_config {
            options.save(path).await?;
            log::info!("Saved options to {}", path.display());
        }

        Ok(options)
    }
}

/// Parse 1-based `row,col` pairs separated by `;` into grid positions
fn parse_cells(value: &str) -> Result<CellList> {
    let mut cells = Vec::new();

    for pair in value.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((row, col)) = pair.split_once(',') else {
            bail!("Expected row,col but got '{}'", pair);
        };
        let row: usize = row
            .trim()
            .parse()
            .with_context(|| format!("Invalid row in '{}'", pair))?;
        let col: usize = col
            .trim()
            .parse()
            .with_context(|| format!("Invalid column in '{}'", pair))?;
        if row == 0 || col == 0 {
            bail!("Rows and columns start at 1, got '{}'", pair);
        }
        cells.push(GridPosition::new(row - 1, col - 1));
    }

    if cells.is_empty() {
        bail!("No cells given");
    }
    Ok(CellList(cells))
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn print_statistics(stats: &pdf_tile::TileStatistics) {
    println!("Tiling Statistics:");
    println!("  Source pages: {}", stats.source_pages);
    println!("  Selected pages: {}", stats.selected_pages);
    println!("  Placed pages: {}", stats.placed_pages);
    if stats.dropped_pages > 0 {
        println!("  Pages left out: {}", stats.dropped_pages);
    }
    println!(
        "  Grid cells: {} ({} empty)",
        stats.grid_cells, stats.empty_cells
    );
    println!("  Scale: {:.3}", stats.scale);
    println!(
        "  Cell size: {:.1} x {:.1} mm",
        stats.cell_size_mm.0, stats.cell_size_mm.1
    );
    println!(
        "  Grid size: {:.1} x {:.1} mm",
        stats.grid_size_mm.0, stats.grid_size_mm.1
    );
    println!(
        "  Sheet size: {:.0} x {:.0} mm",
        stats.sheet_size_mm.0, stats.sheet_size_mm.1
    );
}

async fn run_info(input: &Path) -> Result<()> {
    let document = pdf_tile::load_pdf(input).await?;
    let count = pdf_tile::page_count(&document);
    println!("File: {}", input.display());
    println!("  Pages: {}", count);

    if let Some(&page_id) = document.get_pages().values().next() {
        let geometry = pdf_tile::get_page_geometry(&document, page_id)?;
        let (width, height) = geometry.display_size();
        println!(
            "  First page: {:.1} x {:.1} pt ({:.1} x {:.1} mm)",
            width,
            height,
            pdf_tile::constants::pt_to_mm(width),
            pdf_tile::constants::pt_to_mm(height)
        );
        if geometry.rotation.degrees() != 0 {
            println!("  Rotation: {} degrees", geometry.rotation.degrees());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Tile {
            input,
            output,
            tiling,
            stats_only,
        } => {
            let options = tiling.to_options().await?;
            let document = pdf_tile::load_pdf(&input).await?;

            // Plan once, then show statistics
            let plan = pdf_tile::plan(&document, &options)?;
            print_statistics(&pdf_tile::plan_statistics(&plan, &options));

            if stats_only {
                return Ok(());
            }

            let output = output
                .unwrap_or_else(|| pdf_tile::default_output_path(&input, options.paper_size));
            let tiled = pdf_tile::tile_planned(&document, &plan, &options).await?;
            pdf_tile::save_pdf(tiled, &output).await?;
            println!("Tiled → {}", output.display());
        }

        Commands::Info { input } => run_info(&input).await?,

        Commands::Plan { input, tiling } => {
            let options = tiling.to_options().await?;
            let document = pdf_tile::load_pdf(&input).await?;
            let plan = pdf_tile::plan(&document, &options)?;

            println!(
                "{}x{} grid on {} {:?} ({:.0} x {:.0} pt), scale {:.3}",
                plan.layout.rows,
                plan.layout.cols,
                options.paper_size.label(),
                options.orientation,
                plan.sheet_width_pt,
                plan.sheet_height_pt,
                plan.layout.scale
            );
            for placement in &plan.placements {
                println!(
                    "  Page {:>3}: row {}, column {} at ({:.1}, {:.1}) size {:.1} x {:.1} pt",
                    placement.page_number,
                    placement.position.row + 1,
                    placement.position.col + 1,
                    placement.dest_rect.x,
                    placement.dest_rect.y,
                    placement.dest_rect.width,
                    placement.dest_rect.height
                );
            }
            if !plan.dropped_pages.is_empty() {
                println!("  Left out: {:?}", plan.dropped_pages);
            }
        }
    }

    Ok(())
}
