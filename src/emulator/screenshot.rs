// Screenshot functionality
//
// Captures the rendered LCD surface and saves it as a PNG file.

use crate::display::PixelSurface;
use crate::error::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Save a screenshot of the current surface
///
/// Writes `screenshot_<timestamp>.png` into `directory`, creating it if
/// needed. A numeric suffix is added if a file with that name already
/// exists.
///
/// # Returns
///
/// The path of the written file
pub fn save_screenshot(surface: &dyn PixelSurface, directory: &Path) -> Result<PathBuf> {
    fs::create_dir_all(directory)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let mut file_path = directory.join(format!("screenshot_{}.png", timestamp));
    let mut suffix = 1;
    while file_path.exists() {
        file_path = directory.join(format!("screenshot_{}_{}.png", timestamp, suffix));
        suffix += 1;
    }

    let rgb_data = surface_to_rgb(surface);
    save_png(
        &file_path,
        &rgb_data,
        surface.width() as u32,
        surface.height() as u32,
    )?;

    tracing::info!(path = %file_path.display(), "screenshot saved");
    Ok(file_path)
}

/// Convert a surface to packed RGB888
fn surface_to_rgb(surface: &dyn PixelSurface) -> Vec<u8> {
    let mut rgba = vec![0u8; surface.width() * surface.height() * 4];
    surface.write_rgba(&mut rgba);

    rgba.chunks_exact(4)
        .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
        .collect()
}

/// Save RGB data as a PNG file
fn save_png(path: &Path, data: &[u8], width: u32, height: u32) -> Result<()> {
    let file = fs::File::create(path)?;
    let w = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;

    Ok(())
}
