use std::path::PathBuf;

use anyhow::{bail, Context};
use mapshot::{RenderRequest, StaticMap};

const USAGE: &str = "usage: mapshot-cli <request.json> <output.png>";

/// Render the JSON request in the first argument to the PNG file in the second.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let (input, output) = (PathBuf::from(input), PathBuf::from(output));

    let json = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let request = RenderRequest::from_json(&json)
        .with_context(|| format!("invalid render request in {}", input.display()))?;

    let dims = request.image.dimensions;
    log::info!(
        "rendering {}x{} at z{} with {} layers",
        dims.width,
        dims.height,
        request.map.zoom,
        request.map.layers.len()
    );

    let png = StaticMap::new()
        .render_png(&request)
        .await
        .context("render failed")?;

    std::fs::write(&output, png).with_context(|| format!("failed to write {}", output.display()))?;
    log::info!("wrote {}", output.display());

    Ok(())
}
