use ndarray::Array3;
use spectag_core::background::{corrected, subtract_background};

#[test]
fn test_zero_edge_rows_leave_cube_unchanged() {
    // Signal confined to interior rows, zero at both edge rows: the
    // interpolated background plane is zero everywhere.
    let mut cube = Array3::<f32>::zeros((2, 6, 5));
    for f in 0..2 {
        for c in 0..5 {
            cube[[f, 2, c]] = 0.8;
            cube[[f, 3, c]] = 0.5;
        }
    }
    let out = corrected(&cube);
    for (a, b) in out.iter().zip(cube.iter()) {
        assert!((a - b).abs() < 1e-7);
    }
}

#[test]
fn test_pure_linear_plane_removed_completely() {
    let (frames, rows, cols) = (3, 7, 5);
    let mut cube = Array3::<f32>::zeros((frames, rows, cols));
    for f in 0..frames {
        for r in 0..rows {
            let fraction = r as f32 / (rows - 1) as f32;
            for c in 0..cols {
                let top = 0.2 + 0.01 * c as f32;
                let bottom = 0.6 - 0.02 * c as f32;
                cube[[f, r, c]] = top * (1.0 - fraction) + bottom * fraction;
            }
        }
    }
    let out = corrected(&cube);
    for v in out.iter() {
        assert!(v.abs() < 1e-6);
    }
}

#[test]
fn test_signal_preserved_over_linear_background() {
    let (rows, cols) = (9, 4);
    let mut cube = Array3::<f32>::zeros((1, rows, cols));
    for r in 0..rows {
        let fraction = r as f32 / (rows - 1) as f32;
        for c in 0..cols {
            cube[[0, r, c]] = 0.1 + 0.3 * fraction;
        }
    }
    // Inject a peak on top of the ramp.
    cube[[0, 4, 2]] += 0.5;

    subtract_background(&mut cube);
    assert!((cube[[0, 4, 2]] - 0.5).abs() < 1e-6);
    assert!(cube[[0, 4, 1]].abs() < 1e-6);
    assert!(cube[[0, 0, 0]].abs() < 1e-6);
    assert!(cube[[0, 8, 3]].abs() < 1e-6);
}

#[test]
fn test_single_row_cube_untouched() {
    let mut cube = Array3::<f32>::from_elem((2, 1, 3), 0.4);
    subtract_background(&mut cube);
    for v in cube.iter() {
        assert!((v - 0.4).abs() < 1e-7);
    }
}
