//! Writes a point file for a line of text typed on stdin.

use std::fs::{self, File};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use armscribe::init_logging;
use armscribe_planner::{load_font, write_text_points};
use armscribe_settings::Config;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match Config::locate(config_path.as_deref()) {
        Some(path) => Config::read_from_file(&path)?,
        None => Config::default(),
    };

    print!("Enter the text to convert into 3D points: ");
    io::stdout().flush()?;
    let mut text = String::new();
    io::stdin().lock().read_line(&mut text)?;
    let text = text.trim_end_matches(&['\r', '\n'][..]);

    let font = load_font(&config.glyphs.font_family, config.glyphs.font_path.as_deref())?;

    let output = &config.text.input_path;
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    let written = write_text_points(&font, text, &config.glyphs.layout(), &mut writer)?;
    writer.flush()?;

    info!("{} points written to {}", written, output.display());
    Ok(())
}
