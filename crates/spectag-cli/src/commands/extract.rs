use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{ArrayView3, Axis};
use spectag_core::background;
use spectag_core::cube::{RegionKind, RoiCube};
use spectag_core::io::image_io::save_image;
use spectag_core::resample::SplineDegree;
use spectag_core::session::TaggingSession;
use spectag_core::store::FrameStore;

use super::{load_stack, GeometryArgs};

#[derive(Clone, ValueEnum)]
pub enum DegreeArg {
    Linear,
    Cubic,
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Input recording files (pooled into one frame store)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub geometry: GeometryArgs,

    /// Upper wavelength bound for the dispersed streak, nanometers
    #[arg(long, default_value = "700")]
    pub max_wavelength: f64,

    /// Spline interpolation degree
    #[arg(long, value_enum, default_value = "cubic")]
    pub degree: DegreeArg,

    /// Skip the row-linear background subtraction
    #[arg(long)]
    pub keep_background: bool,

    /// Save the spot region's temporal mean as an image
    #[arg(long)]
    pub spot_out: Option<PathBuf>,

    /// Save the streak region's temporal mean as an image
    #[arg(long)]
    pub streak_out: Option<PathBuf>,
}

pub fn run(args: &ExtractArgs) -> Result<()> {
    let mut stacks = Vec::with_capacity(args.files.len());
    for path in &args.files {
        stacks.push(load_stack(path)?);
    }
    let store = FrameStore::compose(stacks)?;
    println!(
        "Composed {} frames at {}x{}",
        store.total_frames(),
        store.width(),
        store.height()
    );

    let geometry = args.geometry.resolve()?;
    let mut session = TaggingSession::new(store, geometry)?;

    let degree = match args.degree {
        DegreeArg::Linear => SplineDegree::Linear,
        DegreeArg::Cubic => SplineDegree::Cubic,
    };

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Resampling [{bar:40}] {pos}%")?
            .progress_chars("=> "),
    );
    let cube = session.roi_cube_with_progress(args.max_wavelength, degree, |progress| {
        pb.set_position((progress * 100.0) as u64);
    })?;
    pb.finish();

    let cube = if args.keep_background {
        cube.clone()
    } else {
        RoiCube {
            data: background::corrected(&cube.data),
            wavelength: cube.wavelength.clone(),
            split: cube.split,
        }
    };

    let (frames, rows, cols) = cube.data.dim();
    println!("Cube: {frames} frames x {rows} rows x {cols} columns");
    println!(
        "Streak spans {:.1}..{:.1} nm over {} columns",
        cube.wavelength[cube.split.min(cols.saturating_sub(1))],
        cube.wavelength[cols - 1],
        cols - cube.split
    );
    report_region("whole", cube.region(RegionKind::Whole));
    report_region("spot", cube.region(RegionKind::Spot));
    report_region("streak", cube.region(RegionKind::Streak));

    if let Some(path) = &args.spot_out {
        let mean = cube
            .region(RegionKind::Spot)
            .mean_axis(Axis(0))
            .ok_or_else(|| anyhow!("empty spot region"))?;
        save_image(&mean, path)?;
        println!("Spot mean saved to {}", path.display());
    }
    if let Some(path) = &args.streak_out {
        let mean = cube
            .region(RegionKind::Streak)
            .mean_axis(Axis(0))
            .ok_or_else(|| anyhow!("empty streak region"))?;
        save_image(&mean, path)?;
        println!("Streak mean saved to {}", path.display());
    }

    Ok(())
}

fn report_region(name: &str, region: ArrayView3<'_, f32>) {
    let count = region.len();
    if count == 0 {
        println!("  {name:<6}  empty");
        return;
    }
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0f64;
    for &v in region.iter() {
        min = min.min(v);
        max = max.max(v);
        sum += v as f64;
    }
    println!(
        "  {name:<6}  mean {:.5}, min {min:.5}, max {max:.5}",
        sum / count as f64
    );
}
