use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use spectag_core::io::RawRecording;

#[derive(Args)]
pub struct InfoArgs {
    /// Input recording container
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let recording = RawRecording::open(&args.file)?;
    let header = &recording.header;

    println!("File:           {}", args.file.display());
    println!("Frames:         {}", recording.frame_count());
    println!("Dimensions:     {}x{}", header.width, header.height);
    println!("Binning:        {}", header.binning);
    println!("Kinetic cycle:  {:.6} s", header.frame_interval);
    println!("Exposure:       {:.6} s", header.exposure);
    if header.frame_interval > 0.0 {
        println!("Frame rate:     {:.2} fps", 1.0 / header.frame_interval);
    }

    let bytes = 2 * header.width as usize * header.height as usize * recording.frame_count();
    println!("Data size:      {:.1} MB", bytes as f64 / (1024.0 * 1024.0));

    Ok(())
}
