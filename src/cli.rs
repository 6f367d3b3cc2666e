use std::path::Path;

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tripweave_shared::MapImage;

pub mod locate;
pub mod plan;

fn save_image(image: &MapImage, path: &Path) -> Result<()> {
    let bytes = STANDARD
        .decode(&image.data)
        .context("map image is not valid base64")?;
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "map written");

    Ok(())
}
