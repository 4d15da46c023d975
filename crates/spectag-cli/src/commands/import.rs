use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;
use spectag_core::io::RecordingSource;

#[derive(Args)]
pub struct ImportArgs {
    /// Recording files to classify
    pub files: Vec<PathBuf>,
}

pub fn run(args: &ImportArgs) -> Result<()> {
    let mut accepted = 0usize;
    let mut skipped = 0usize;

    for (index, path) in args.files.iter().enumerate() {
        match RecordingSource::classify(path) {
            Ok(RecordingSource::Full { data }) => {
                println!("Video {index}  {}", style("complete recording").green());
                println!("  data & metadata  {}", data.display());
                accepted += 1;
            }
            Ok(RecordingSource::Roi { data, metadata }) => {
                println!("Video {index}  {}", style("ROI + metadata").green());
                println!("  data             {}", data.display());
                println!("  metadata         {}", metadata.display());
                accepted += 1;
            }
            Err(err) => {
                println!("Video {index}  {}", style("skipped").yellow());
                println!("  {err}");
                skipped += 1;
            }
        }
    }

    println!();
    println!("{accepted} accepted, {skipped} skipped");
    Ok(())
}
