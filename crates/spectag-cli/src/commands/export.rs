use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use spectag_core::descriptor::{export_file_name, Descriptor, ExportFormat, ParticleInfo};
use spectag_core::io::classify_files;

use super::GeometryArgs;

#[derive(Args)]
pub struct ExportArgs {
    /// Source recording files referenced by the descriptor
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub geometry: GeometryArgs,

    /// Particle metadata as key=value (keys: size, material, class, comment)
    #[arg(short, long)]
    pub particle: Vec<String>,

    /// Device identifiers in the optical path
    #[arg(short, long)]
    pub device: Vec<String>,

    /// Operator-incremented object counter
    #[arg(long, default_value = "1")]
    pub counter: u32,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Write TOML instead of JSON
    #[arg(long)]
    pub toml: bool,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    let sources = classify_files(&args.files);
    if sources.is_empty() {
        bail!("no input file classified; nothing to export");
    }

    let mut particle = ParticleInfo::default();
    for entry in &args.particle {
        let (key, value) = entry
            .split_once('=')
            .with_context(|| format!("particle entry '{entry}' is not key=value"))?;
        if !particle.set_aliased(key, value) {
            bail!("unknown particle key '{key}'");
        }
    }

    let mut descriptor = Descriptor::default();
    descriptor.apply_geometry(&args.geometry.resolve()?);
    descriptor.videos = sources.iter().map(|s| s.to_file_record()).collect();
    descriptor.particle = particle;
    descriptor.devices = args.device.clone();

    let mtime = fs::metadata(sources[0].data_path())
        .and_then(|m| m.modified())
        .with_context(|| {
            format!(
                "reading modification time of {}",
                sources[0].data_path().display()
            )
        })?;

    let (format, extension) = if args.toml {
        (ExportFormat::Toml, "toml")
    } else {
        (ExportFormat::Json, "json")
    };
    let path = args
        .out_dir
        .join(export_file_name(mtime, args.counter, extension));

    fs::write(&path, descriptor.serialize(format)?)?;
    println!("Tagged {}", descriptor.particle.describe());
    println!("Descriptor written to {}", path.display());
    Ok(())
}
