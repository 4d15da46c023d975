mod common;

use common::stack;
use spectag_core::calibrate::Calibration;
use spectag_core::cube::RegionKind;
use spectag_core::geometry::GeometryDescriptor;
use spectag_core::resample::SplineDegree;
use spectag_core::session::TaggingSession;
use spectag_core::store::FrameStore;

fn session() -> TaggingSession {
    let store = FrameStore::compose(vec![stack(4, 32, 32, |f, r, c| {
        1.0 + (f + r + c) as f32 * 0.01
    })])
    .unwrap();
    let geometry = GeometryDescriptor {
        center_x: 10.0,
        center_y: 16.0,
        angle_deg: 0.0,
        roi_width: 5,
        ref_shift: 8.0,
        ref_wavelength: 532.0,
    };
    TaggingSession::new(store, geometry).unwrap()
}

#[test]
fn test_cube_cached_by_wavelength_bound() {
    let mut s = session();
    assert_eq!(s.cached_bound(), None);

    let ptr_first = {
        let cube = s.roi_cube(700.0, SplineDegree::Cubic).unwrap();
        cube.data.as_ptr()
    };
    assert_eq!(s.cached_bound(), Some(700.0));

    // Same bound: no recompute, same backing allocation.
    let ptr_second = s.roi_cube(700.0, SplineDegree::Cubic).unwrap().data.as_ptr();
    assert_eq!(ptr_first, ptr_second);

    // New bound: rebuilt with more columns.
    let cols_700 = s.roi_cube(700.0, SplineDegree::Cubic).unwrap().data.dim().2;
    let cols_900 = s.roi_cube(900.0, SplineDegree::Cubic).unwrap().data.dim().2;
    assert!(cols_900 > cols_700);
    assert_eq!(s.cached_bound(), Some(900.0));
}

#[test]
fn test_geometry_change_invalidates_cube() {
    let mut s = session();
    s.roi_cube(700.0, SplineDegree::Cubic).unwrap();
    assert!(s.cached_bound().is_some());

    let mut geometry = s.geometry().clone();
    geometry.angle_deg = 12.0;
    s.set_geometry(geometry).unwrap();
    assert_eq!(s.cached_bound(), None);
    assert_eq!(s.descriptor().angle, 12.0);
}

#[test]
fn test_calibration_feeds_geometry_reference() {
    let mut s = session();
    s.roi_cube(700.0, SplineDegree::Cubic).unwrap();

    let calibration = Calibration {
        px_ref: 12.5,
        px_err: 0.3,
        lambda_ref: 532.0,
        lambda_err: 0.0,
    };
    s.apply_calibration(&calibration);

    assert_eq!(s.cached_bound(), None);
    assert_eq!(s.geometry().ref_shift, 12.5);
    assert_eq!(s.geometry().ref_wavelength, 532.0);
    assert_eq!(s.descriptor().ref_offset, 12.5);
}

#[test]
fn test_region_slicing() {
    let mut s = session();
    let cube = s.roi_cube(700.0, SplineDegree::Cubic).unwrap();

    let (frames, rows, cols) = cube.data.dim();
    assert_eq!(frames, 4);
    assert_eq!(rows, 5);
    // 5 + round(8 * 700 / 532) = 5 + 11
    assert_eq!(cols, 16);

    let spot = cube.region(RegionKind::Spot);
    let streak = cube.region(RegionKind::Streak);
    assert_eq!(spot.dim(), (4, 5, 5));
    assert_eq!(streak.dim(), (4, 5, 11));
    assert_eq!(cube.region(RegionKind::Whole).dim(), (4, 5, 16));
    assert_eq!(cube.streak_wavelengths().len(), 11);
}

#[test]
fn test_invalid_geometry_rejected() {
    let store = FrameStore::compose(vec![stack(2, 8, 8, |_, _, _| 1.0)]).unwrap();
    let geometry = GeometryDescriptor {
        center_x: 4.0,
        center_y: 4.0,
        angle_deg: 0.0,
        roi_width: 9, // wider than the frame
        ref_shift: 0.0,
        ref_wavelength: 532.0,
    };
    assert!(TaggingSession::new(store, geometry).is_err());
}
