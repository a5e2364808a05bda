use clap::{Parser, Subcommand};
use leaf_scan::{
    color::RgbHistogram, export, load_image, AnalysisConfig, AnalysisError, AnalysisResult,
    LeafAnalyzer, Result, Segmentation,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const HISTOGRAM_WIDTH: u32 = 512;
const HISTOGRAM_HEIGHT: u32 = 200;

#[derive(Parser)]
#[command(name = "leaf-scan")]
#[command(version, about = "Leaf disease and nutrient deficiency screening", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a leaf photo
    Analyze {
        /// Input image (JPG, PNG, BMP, TIFF, WebP)
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Morphological cleanup and texture-gated disease rules
        #[arg(long)]
        refined: bool,

        /// Configuration file (overrides --refined)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write a timestamped CSV record to this directory
        #[arg(short, long, value_name = "DIR")]
        export: Option<PathBuf>,

        /// Write one highlight PNG per band to this directory
        #[arg(long, value_name = "DIR")]
        highlights: Option<PathBuf>,

        /// Write the RGB histogram plot to this file
        #[arg(long, value_name = "FILE")]
        histogram: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Debug logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write a default configuration file
    Config {
        #[arg(value_name = "FILE")]
        output: PathBuf,

        /// Write the refined preset instead of the baseline one
        #[arg(long)]
        refined: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Analyze { verbose: true, .. });
    init_tracing(verbose);

    let result = match cli.command {
        Commands::Analyze {
            image,
            refined,
            config,
            export,
            highlights,
            histogram,
            json,
            verbose: _,
        } => cmd_analyze(AnalyzeArgs {
            image,
            refined,
            config,
            export,
            highlights,
            histogram,
            json,
        }),
        Commands::Config { output, refined } => cmd_config(&output, refined),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "leaf_scan=debug" } else { "leaf_scan=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct AnalyzeArgs {
    image: PathBuf,
    refined: bool,
    config: Option<PathBuf>,
    export: Option<PathBuf>,
    highlights: Option<PathBuf>,
    histogram: Option<PathBuf>,
    json: bool,
}

fn cmd_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None if args.refined => AnalysisConfig::refined(),
        None => AnalysisConfig::baseline(),
    };

    let duplicated = config.segmentation.bands.duplicated_pairs();
    for (a, b) in &duplicated {
        warn!("Bands {} and {} share identical bounds", a, b);
    }

    let analyzer = LeafAnalyzer::from_config(&config)?;
    let image = load_image(&args.image)?;
    let (result, segmentation) = analyzer.analyze_with_segmentation(&image)?;

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| AnalysisError::invalid_input(format!("unserializable result: {}", e)))?;
        println!("{}", json);
    } else {
        print_summary(&result);
    }

    if let Some(dir) = &args.export {
        match export::export_csv(&result, dir, &export::timestamp_now()) {
            Ok(path) => info!("Saved {}", path.display()),
            Err(e) if e.is_recoverable() => warn!("{}", e),
            Err(e) => return Err(e),
        }
    }

    if let Some(dir) = &args.highlights {
        save_highlights(&segmentation, dir)?;
    }

    if let Some(path) = &args.histogram {
        let plot = RgbHistogram::compute(&image).render(HISTOGRAM_WIDTH, HISTOGRAM_HEIGHT);
        plot.save(path)
            .map_err(|e| AnalysisError::export(path, "Failed to write histogram", e))?;
        info!("Saved {}", path.display());
    }

    Ok(())
}

fn save_highlights(segmentation: &Segmentation, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AnalysisError::export(dir, "Failed to create highlight directory", e))?;

    for (band, highlight) in segmentation.highlights()? {
        let path = dir.join(format!("{}.png", band.as_str()));
        highlight
            .save(&path)
            .map_err(|e| AnalysisError::export(&path, "Failed to write highlight", e))?;
    }
    info!("Saved highlights to {}", dir.display());
    Ok(())
}

fn print_summary(result: &AnalysisResult) {
    println!("Color bands:");
    for (band, pct) in result.percentages.iter() {
        println!("  {:<20} {:6.2}%", band.caption(), pct);
    }
    println!();
    println!("Disease probability: {:.2}%", result.disease_probability);
    println!("pH: {}", result.ph_status);

    if let Some(t) = &result.texture {
        println!(
            "Texture: contrast {:.2}, homogeneity {:.3}, energy {:.3}, correlation {:.3}",
            t.contrast, t.homogeneity, t.energy, t.correlation
        );
    }

    println!();
    if result.diagnoses.is_empty() {
        println!("No symptoms detected");
        return;
    }
    for (category, findings) in result.diagnoses.iter() {
        if findings.is_empty() {
            continue;
        }
        println!("{}:", category);
        for finding in findings {
            println!("  - {}: {}", finding.name, finding.description);
            println!("    Recommendation: {}", finding.recommendation);
        }
    }
}

fn cmd_config(output: &Path, refined: bool) -> Result<()> {
    let config = if refined {
        AnalysisConfig::refined()
    } else {
        AnalysisConfig::baseline()
    };
    config.to_json_file(output)?;
    println!("Configuration written to {}", output.display());
    Ok(())
}
