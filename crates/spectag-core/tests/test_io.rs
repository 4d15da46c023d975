mod common;

use std::fs::File;
use std::path::PathBuf;

use common::decoded;
use spectag_core::error::SpectagError;
use spectag_core::io::classify::classify_files;
use spectag_core::io::raw::{write_raw, RawRecording};
use spectag_core::io::{RawDecoder, RecordingDecoder, RecordingSource};

#[test]
fn test_raw_container_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample_001_video.dat");

    let rec = decoded(4, 6, 8, |f, r, c| (f * 100 + r * 10 + c) as f32);
    write_raw(&path, &rec).unwrap();

    let reader = RawRecording::open(&path).unwrap();
    assert_eq!(reader.frame_count(), 4);
    assert_eq!(reader.header.width, 8);
    assert_eq!(reader.header.height, 6);
    assert_eq!(reader.header.binning, 1);
    assert!((reader.header.frame_interval - 0.01).abs() < 1e-12);

    let back = reader.decode().unwrap();
    assert_eq!(back.data.dim(), (4, 6, 8));
    for (a, b) in back.data.iter().zip(rec.data.iter()) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn test_zero_frame_count_recovered_from_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roi_module.dat");

    // ROI-mode writers leave the frame-count field unset.
    let mut rec = decoded(5, 4, 4, |f, _, _| f as f32);
    rec.frames = 0;
    write_raw(&path, &rec).unwrap();

    let reader = RawRecording::open(&path).unwrap();
    assert_eq!(reader.frame_count(), 5);
}

#[test]
fn test_truncated_container_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken_video.dat");

    let rec = decoded(3, 8, 8, |_, _, _| 1.0);
    write_raw(&path, &rec).unwrap();
    let full = std::fs::read(&path).unwrap();
    std::fs::write(&path, &full[..full.len() - 10]).unwrap();

    assert!(RawRecording::open(&path).is_err());
}

#[test]
fn test_classification_by_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let touch = |name: &str| {
        let p = dir.path().join(name);
        File::create(&p).unwrap();
        p
    };

    let video = touch("a_video.dat");
    let module = touch("b_module.dat");
    let metadata = touch("b_metadata.dat");
    let orphan = touch("c_module.dat"); // partner missing
    let stray = touch("d_snapshot.dat"); // unknown suffix

    assert_eq!(
        RecordingSource::classify(&video).unwrap(),
        RecordingSource::Full {
            data: video.clone()
        }
    );
    assert_eq!(
        RecordingSource::classify(&module).unwrap(),
        RecordingSource::Roi {
            data: module.clone(),
            metadata: metadata.clone(),
        }
    );
    match RecordingSource::classify(&orphan) {
        Err(SpectagError::MissingMetadata(_)) => {}
        other => panic!("expected MissingMetadata, got {other:?}"),
    }
    match RecordingSource::classify(&stray) {
        Err(SpectagError::UnrecognizedFile(_)) => {}
        other => panic!("expected UnrecognizedFile, got {other:?}"),
    }

    // Batch classification drops the bad items, keeps the rest.
    let batch: Vec<PathBuf> = vec![video, module, orphan, stray];
    let sources = classify_files(&batch);
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].format_code(), 0);
    assert_eq!(sources[1].format_code(), 1);
}

#[test]
fn test_roi_decoder_merges_partner_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("b_module.dat");
    let meta_path = dir.path().join("b_metadata.dat");

    // Data container: frames present, scalars unset.
    let mut data_rec = decoded(3, 4, 4, |f, r, c| (f + r + c) as f32);
    data_rec.binning = 0;
    data_rec.frame_interval = 0.0;
    data_rec.exposure = 0.0;
    write_raw(&data_path, &data_rec).unwrap();

    // Metadata container: scalars only, empty payload.
    let mut meta_rec = decoded(1, 1, 1, |_, _, _| 0.0);
    meta_rec.binning = 2;
    meta_rec.frame_interval = 0.02;
    meta_rec.exposure = 0.015;
    meta_rec.data = ndarray::Array3::zeros((0, 0, 0));
    meta_rec.frames = 0;
    meta_rec.width = 0;
    meta_rec.height = 0;
    write_raw(&meta_path, &meta_rec).unwrap();

    let source = RecordingSource::classify(&data_path).unwrap();
    let merged = RawDecoder.decode(&source).unwrap();

    assert_eq!(merged.frames, 3);
    assert_eq!(merged.binning, 2);
    assert!((merged.frame_interval - 0.02).abs() < 1e-12);
    assert!((merged.exposure - 0.015).abs() < 1e-12);
    assert_eq!(merged.data.dim(), (3, 4, 4));
}

#[test]
fn test_file_records_for_export() {
    let full = RecordingSource::Full {
        data: PathBuf::from("x_video.dat"),
    };
    let record = full.to_file_record();
    assert_eq!(record.format, 0);
    assert_eq!(record.data, record.meta);

    let roi = RecordingSource::Roi {
        data: PathBuf::from("y_module.dat"),
        metadata: PathBuf::from("y_metadata.dat"),
    };
    let record = roi.to_file_record();
    assert_eq!(record.format, 1);
    assert_eq!(record.meta, "y_metadata.dat");
}
