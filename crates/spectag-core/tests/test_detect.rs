mod common;

use common::{stack, Lcg};
use ndarray::Array2;
use spectag_core::detect::{detect_spots, mask, CalibrationImage, DetectionConfig};

/// Two bright 10x10 squares on a flat noisy background.
fn two_square_image() -> Array2<f32> {
    let mut image = Array2::<f32>::zeros((30, 60));
    let mut rng = Lcg(7);
    for v in image.iter_mut() {
        *v = rng.next_noise(0.1);
    }
    for r in 10..20 {
        for c in 10..20 {
            image[[r, c]] = 1.0;
        }
        for c in 40..50 {
            image[[r, c]] = 1.0;
        }
    }
    image
}

#[test]
fn test_two_squares_detected_exactly() {
    let image = two_square_image();
    let std_image = Array2::<f32>::zeros(image.dim());
    let regions = detect_spots(&image, &std_image, &DetectionConfig::default());

    assert_eq!(regions.len(), 2);

    // Sorted by ascending x, each bounding its square's x-extent exactly.
    assert_eq!(regions[0].xmin, 10);
    assert_eq!(regions[0].xmax, 19);
    assert_eq!(regions[1].xmin, 40);
    assert_eq!(regions[1].xmax, 49);
    for region in &regions {
        assert!(region.width() >= 4);
        assert_eq!(region.ymin, 10);
        assert_eq!(region.ymax, 19);
    }
}

#[test]
fn test_blank_image_yields_no_regions() {
    let image = Array2::<f32>::zeros((20, 20));
    let std_image = Array2::<f32>::zeros((20, 20));
    let regions = detect_spots(&image, &std_image, &DetectionConfig::default());
    assert!(regions.is_empty());
}

#[test]
fn test_narrow_sliver_rejected() {
    // A 2-pixel-wide stripe passes the mask and projections but is
    // narrower than the minimum region width.
    let mut image = Array2::<f32>::zeros((20, 20));
    for r in 5..15 {
        image[[r, 8]] = 1.0;
        image[[r, 9]] = 1.0;
    }
    let std_image = Array2::<f32>::zeros((20, 20));
    let regions = detect_spots(&image, &std_image, &DetectionConfig::default());
    assert!(regions.is_empty());
}

#[test]
fn test_denoise_removes_isolated_pixels() {
    let mut m = Array2::from_elem((9, 9), false);
    m[[4, 4]] = true; // isolated
    for c in 2..7 {
        m[[1, c]] = true;
        m[[2, c]] = true;
    }
    let cleaned = mask::denoise_mask(&m, 1, 3);
    assert!(!cleaned[[4, 4]]);
    assert!(cleaned[[1, 3]]);
    assert!(cleaned[[2, 4]]);
}

#[test]
fn test_denoise_never_grows_the_mask() {
    let mut m = Array2::from_elem((7, 7), false);
    for r in 2..5 {
        for c in 2..5 {
            m[[r, c]] = true;
        }
    }
    let cleaned = mask::denoise_mask(&m, 2, 3);
    for ((r, c), &v) in cleaned.indexed_iter() {
        if v {
            assert!(m[[r, c]], "pixel ({r}, {c}) appeared out of nowhere");
        }
    }
}

#[test]
fn test_calibration_image_removes_constant_background() {
    // Flat stack: the edge-row background guess equals the mean itself.
    let s = stack(3, 8, 8, |_, _, _| 2.0);
    let image = CalibrationImage::from_stack(&s);
    for v in image.mean.iter() {
        assert!(v.abs() < 1e-6);
    }
    for v in image.std.iter() {
        assert!(v.abs() < 1e-6);
    }
}

#[test]
fn test_threshold_is_global_scalar() {
    // Mean of the image is 0.25; cutoff sqrt(2) * 0.25 ~ 0.354.
    let mut image = Array2::<f32>::zeros((4, 4));
    for (i, v) in image.iter_mut().enumerate() {
        *v = if i < 4 { 1.0 } else { 0.0 };
    }
    let std_image = Array2::<f32>::from_elem((4, 4), 99.0); // must be ignored
    let m = mask::threshold_mask(&image, &std_image, std::f64::consts::SQRT_2);
    let on = m.iter().filter(|&&v| v).count();
    assert_eq!(on, 4);
}
