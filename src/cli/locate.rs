use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tripweave::config::Config;
use tripweave_gemini::GeminiClient;
use tripweave_planner::{TravelService, TripDraft};
use tripweave_shared::{MapImage, MapPoint};

#[tracing::instrument(skip(config))]
pub async fn locate(
    config: Config,
    image: Option<PathBuf>,
    render: Option<String>,
    point: MapPoint,
) -> Result<()> {
    let client = GeminiClient::new(config.gemini.client_config())?;

    let map = match (image, render) {
        (Some(path), _) => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            MapImage::png(STANDARD.encode(bytes))
        }
        (None, Some(region)) => {
            let map = client.render_region_map(&region).await?;
            let dir = &config.output.dir;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;

            let name = region.trim().to_lowercase().replace(char::is_whitespace, "-");
            super::save_image(&map, &dir.join(format!("{name}.{}", map.extension())))?;
            map
        }
        (None, None) => anyhow::bail!("either --image or --render is required"),
    };

    let mut draft = TripDraft::new();
    let destination = draft.add_from_map(&client, &map, point).await?;
    println!("{}", destination.name);

    Ok(())
}
