use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser, Debug)]
#[command(name = "targen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a labeled dataset of synthetic detection targets.
    Generate(GenerateArgs),
    /// Render a single sample for quick visual checking.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Directory of background photos (jpg, jpeg, png).
    #[arg(long)]
    backgrounds: PathBuf,

    /// TTF/OTF font used for glyphs.
    #[arg(long)]
    font: PathBuf,

    /// Output directory; receives images/ and labels/ subdirectories.
    #[arg(long)]
    out: PathBuf,

    /// Number of samples to attempt.
    #[arg(long, default_value_t = 100)]
    count: u32,

    /// Run seed. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Also write a JSON manifest of the emitted files.
    #[arg(long)]
    manifest: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Directory of background photos (jpg, jpeg, png).
    #[arg(long)]
    backgrounds: PathBuf,

    /// TTF/OTF font used for glyphs.
    #[arg(long)]
    font: PathBuf,

    /// Output image path (format from the extension).
    #[arg(long)]
    out: PathBuf,

    /// Run seed. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = targen::GenerationConfig {
        backgrounds_dir: args.backgrounds,
        images_dir: args.out.join("images"),
        labels_dir: args.out.join("labels"),
        count: args.count,
        seed,
        manifest_path: args.manifest,
    };

    let mut glyphs = targen::ParleyGlyphSource::from_path(&args.font)?;
    let report = targen::generate_run(&config, &mut glyphs)?;

    eprintln!(
        "wrote {} samples to {} ({} skipped, seed {})",
        report.generated,
        args.out.display(),
        report.skipped.len(),
        seed
    );
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let pool = targen::BackgroundPool::scan(&args.backgrounds)?;
    let mut glyphs = targen::ParleyGlyphSource::from_path(&args.font)?;

    let mut rng = StdRng::seed_from_u64(targen::derive_seed(seed, 0));
    let background = targen::load_background(pool.pick(&mut rng))?;
    let sample = targen::generate_sample(&mut rng, &mut glyphs, &background)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let format = image::ImageFormat::from_path(&args.out)
        .with_context(|| format!("pick image format for '{}'", args.out.display()))?;
    image::save_buffer_with_format(
        &args.out,
        sample.image.as_raw(),
        sample.image.width(),
        sample.image.height(),
        image::ColorType::Rgb8,
        format,
    )
    .with_context(|| format!("write image '{}'", args.out.display()))?;

    for label in &sample.labels {
        println!("{}", label.yolo_line());
    }
    eprintln!(
        "wrote {} ({} + {}, seed {})",
        args.out.display(),
        sample.shape.name(),
        char::from(sample.glyph),
        seed
    );
    Ok(())
}
