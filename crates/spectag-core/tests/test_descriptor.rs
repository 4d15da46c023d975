use std::time::{Duration, SystemTime};

use spectag_core::descriptor::{
    export_file_name, Descriptor, ExportFormat, ParticleInfo, VideoFileRecord,
};

fn populated() -> Descriptor {
    Descriptor {
        videos: vec![
            VideoFileRecord {
                format: 0,
                data: "run/sample_017_video.dat".into(),
                meta: "run/sample_017_video.dat".into(),
            },
            VideoFileRecord {
                format: 1,
                data: "run/sample_018_module.dat".into(),
                meta: "run/sample_018_metadata.dat".into(),
            },
        ],
        x: 104.5,
        y: 88.25,
        angle: -3.4,
        ref_offset: 41.7,
        ref_wavelength: 532.0,
        roi_width: 21,
        particle: ParticleInfo {
            size: "150 nm".into(),
            material: "polystyrene".into(),
            class: "sphere".into(),
            comment: "dimer candidate".into(),
        },
        devices: vec!["cam-01".into(), "lamp-03".into()],
    }
}

#[test]
fn test_record_round_trip() {
    let descriptor = populated();
    let record = descriptor.to_record().unwrap();
    let restored = Descriptor::from_record(record).unwrap();
    assert_eq!(descriptor, restored);
}

#[test]
fn test_record_key_set() {
    let record = populated().to_record().unwrap();
    let object = record.as_object().unwrap();

    for key in [
        "version",
        "files",
        "0th-order",
        "1st-order",
        "img_width",
        "particle",
        "devices",
    ] {
        assert!(object.contains_key(key), "missing key {key}");
    }
    assert_eq!(object.len(), 7);

    assert_eq!(object["version"], "0.2");
    assert_eq!(object["0th-order"][0], 104.5);
    assert_eq!(object["1st-order"]["ref-offset"], 41.7);
    assert_eq!(object["1st-order"]["ref-wavelength"], 532.0);
    assert_eq!(object["img_width"], 21);
    assert_eq!(object["particle"]["class"], "sphere");
    assert_eq!(object["files"][0]["format"], 0);
    assert_eq!(object["files"][1]["meta"], "run/sample_018_metadata.dat");
}

#[test]
fn test_json_is_pretty_with_two_space_indent() {
    let text = populated().serialize(ExportFormat::Json).unwrap();
    assert!(text.starts_with("{\n  \"version\": \"0.2\""));
    assert!(text.contains("\n  \"0th-order\": ["));
}

#[test]
fn test_toml_serialization_round_trips_values() {
    let text = populated().serialize(ExportFormat::Toml).unwrap();
    assert!(text.contains("version = \"0.2\""));
    assert!(text.contains("img_width = 21"));
}

#[test]
fn test_particle_alias_adapter() {
    let mut particle = ParticleInfo::default();
    assert_eq!(particle.size, "unknown sized");

    assert!(particle.set_aliased("S", "80 nm"));
    assert!(particle.set_aliased("mat", "gold"));
    assert!(particle.set_aliased("TYPE", "rod"));
    assert!(particle.set_aliased("comment", "bright"));
    assert!(!particle.set_aliased("color", "red"));

    assert_eq!(particle.size, "80 nm");
    assert_eq!(particle.material, "gold");
    assert_eq!(particle.class, "rod");
    assert_eq!(particle.describe(), "80 nm gold rod (bright)");
}

#[test]
fn test_export_file_name_pattern() {
    let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let name = export_file_name(mtime, 42, "json");

    // <YYYY-MM-DD>-object<NNNN>.<ext>
    assert!(name.ends_with("-object0042.json"), "got {name}");
    let date = &name[..10];
    assert_eq!(date.len(), 10);
    assert_eq!(&date[4..5], "-");
    assert_eq!(&date[7..8], "-");
}
