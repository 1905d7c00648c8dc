use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let backgrounds = PathBuf::from(args.next().unwrap_or_else(|| "backgrounds".to_string()));
    let font = PathBuf::from(args.next().unwrap_or_else(|| "font.ttf".to_string()));
    let out = PathBuf::from(args.next().unwrap_or_else(|| "dataset".to_string()));

    let config = targen::GenerationConfig {
        backgrounds_dir: backgrounds,
        images_dir: out.join("images"),
        labels_dir: out.join("labels"),
        count: 32,
        seed: 7,
        manifest_path: Some(out.join("manifest.json")),
    };

    let mut glyphs = targen::ParleyGlyphSource::from_path(&font)?;
    let report = targen::generate_run(&config, &mut glyphs)?;

    eprintln!(
        "generated {} samples in {} ({} skipped)",
        report.generated,
        out.display(),
        report.skipped.len()
    );
    for skip in &report.skipped {
        eprintln!("  skipped sample {}: {}", skip.index, skip.reason);
    }
    Ok(())
}
