use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;
use spectag_core::calibrate::calibrate;
use spectag_core::detect::{detect_spots, DetectionConfig};

use super::load_calibration_image;

#[derive(Args)]
pub struct CalibrateArgs {
    /// Calibration recording (illumination spots)
    pub file: PathBuf,

    /// Write the calibration as a TOML file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &CalibrateArgs) -> Result<()> {
    let image = load_calibration_image(&args.file)?;

    let config = DetectionConfig::default();
    let regions = detect_spots(&image.mean, &image.std, &config);
    println!("{} spot regions detected", regions.len());

    let calibration = calibrate(&image.mean, &regions)?;

    println!(
        "Pixel reference:      {:.4} ± {:.4} px",
        calibration.px_ref, calibration.px_err
    );
    println!(
        "Wavelength reference: {:.1} ± {:.1} nm",
        calibration.lambda_ref, calibration.lambda_err
    );
    println!(
        "Scale:                {:.4} nm/px",
        style(calibration.factor()).bold()
    );

    if let Some(path) = &args.output {
        fs::write(path, toml::to_string_pretty(&calibration)?)?;
        println!("Calibration saved to {}", path.display());
    }

    Ok(())
}
