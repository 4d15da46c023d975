use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;
use spectag_core::detect::{detect_spots, DetectionConfig};
use spectag_core::io::image_io::save_image;

use super::load_calibration_image;

#[derive(Args)]
pub struct DetectArgs {
    /// Calibration recording (illumination spots)
    pub file: PathBuf,

    /// Minimum accepted region width in pixels
    #[arg(long, default_value = "4")]
    pub min_width: usize,

    /// Save the background-corrected mean image for inspection
    #[arg(long)]
    pub mean_out: Option<PathBuf>,
}

pub fn run(args: &DetectArgs) -> Result<()> {
    let image = load_calibration_image(&args.file)?;

    let config = DetectionConfig {
        min_region_width: args.min_width,
        ..Default::default()
    };
    let regions = detect_spots(&image.mean, &image.std, &config);

    if regions.is_empty() {
        println!("{}", style("no spot regions detected").yellow());
        return Ok(());
    }

    println!("{} regions (ascending x):", regions.len());
    for (order, region) in regions.iter().enumerate() {
        println!(
            "  order {order}: x [{}, {}], y [{}, {}], {}x{} px, mid x {:.1}",
            region.xmin,
            region.xmax,
            region.ymin,
            region.ymax,
            region.width(),
            region.height(),
            region.xmid()
        );
    }

    if let Some(path) = &args.mean_out {
        save_image(&image.mean, path)?;
        println!("Mean image saved to {}", path.display());
    }

    Ok(())
}
