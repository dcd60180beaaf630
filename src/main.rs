use bg_ingest::{config, ingest, output};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bg-ingest")]
#[command(about = "Add new background images to the store")]
#[command(long_about = "\
Add new background images to the store

Converts every image in the input folder to WebP, writes a 340x170
center-cropped thumbnail, assigns the next free image-<n> id, and appends
a placeholder entry to store/backgrounds.json.

Layout (relative to the current directory):

  input_images/                    # Default input folder (never modified)
  bg-ingest.toml                   # Optional config overrides
  store/
  ├── backgrounds.json             # Manifest
  └── backgrounds/images/
      ├── full/image-<n>.webp      # Full-size, quality 85
      └── thumb/image-<n>.webp     # 340x170 thumbnail

After a run, edit category, name and featured for the new entries.")]
#[command(version)]
struct Cli {
    /// Folder of images to add (relative paths resolve against the current directory)
    input: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let root = std::env::current_dir()?;
    let config = config::load_config(&root)?;
    let layout = config.layout(&root);
    let input = layout.resolve_input(cli.input.as_deref());

    output::print_header(&layout, &input);
    let report = ingest::ingest(&config, &layout, &input, output::print_event)?;
    output::print_report(&report, &config);

    Ok(())
}
