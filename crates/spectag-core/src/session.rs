//! The explicit tagging session: one composed frame store, one mutable
//! geometry/descriptor pair, and the ROI-cube cache. All core calls go
//! through a session value; there is no process-wide state.

use tracing::info;

use crate::calibrate::Calibration;
use crate::cube::RoiCube;
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::geometry::GeometryDescriptor;
use crate::resample::{resample_store, SplineDegree};
use crate::store::FrameStore;

struct CachedCube {
    /// Bit pattern of the max-wavelength bound the cube was built for.
    key: u64,
    cube: RoiCube,
}

/// Session state for tagging one particle: owned frame store, the
/// interactive geometry, the in-progress export descriptor, and the
/// derived ROI cube (recomputed only when geometry or the wavelength
/// bound changes).
pub struct TaggingSession {
    store: FrameStore,
    geometry: GeometryDescriptor,
    descriptor: Descriptor,
    cube: Option<CachedCube>,
}

impl TaggingSession {
    pub fn new(store: FrameStore, geometry: GeometryDescriptor) -> Result<Self> {
        geometry.validate(store.width(), store.height())?;
        let mut descriptor = Descriptor::default();
        descriptor.apply_geometry(&geometry);
        Ok(Self {
            store,
            geometry,
            descriptor,
            cube: None,
        })
    }

    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    pub fn geometry(&self) -> &GeometryDescriptor {
        &self.geometry
    }

    /// Replace the geometry. Invalidates the cached cube.
    pub fn set_geometry(&mut self, geometry: GeometryDescriptor) -> Result<()> {
        geometry.validate(self.store.width(), self.store.height())?;
        self.geometry = geometry;
        self.descriptor.apply_geometry(&self.geometry);
        self.cube = None;
        Ok(())
    }

    /// Feed a calibration result into the geometry's pixel/wavelength
    /// reference. Invalidates the cached cube.
    pub fn apply_calibration(&mut self, calibration: &Calibration) {
        self.geometry.ref_shift = calibration.px_ref;
        self.geometry.ref_wavelength = calibration.lambda_ref;
        self.descriptor.apply_geometry(&self.geometry);
        self.cube = None;
        info!(
            "calibration applied: {:.4} px at {:.1} nm",
            calibration.px_ref, calibration.lambda_ref
        );
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn descriptor_mut(&mut self) -> &mut Descriptor {
        &mut self.descriptor
    }

    /// The ROI cube out to `max_wavelength`, resampled on demand and
    /// cached keyed by the bound.
    pub fn roi_cube(&mut self, max_wavelength: f64, degree: SplineDegree) -> Result<&RoiCube> {
        self.roi_cube_with_progress(max_wavelength, degree, |_| {})
    }

    /// Like [`roi_cube`](Self::roi_cube) with a progress callback for
    /// the resampling pass (only invoked on an actual rebuild).
    pub fn roi_cube_with_progress<F>(
        &mut self,
        max_wavelength: f64,
        degree: SplineDegree,
        on_progress: F,
    ) -> Result<&RoiCube>
    where
        F: FnMut(f32),
    {
        let key = max_wavelength.to_bits();
        let stale = self.cube.as_ref().map_or(true, |c| c.key != key);
        if stale {
            let grid = self.geometry.sampling_grid(max_wavelength);
            let data = resample_store(&self.store, &grid, degree, on_progress)?;
            let cube = RoiCube {
                data,
                wavelength: grid.wavelength,
                split: self.geometry.split_index(),
            };
            self.cube = Some(CachedCube { key, cube });
        }
        Ok(&self.cube.as_ref().expect("cube rebuilt above").cube)
    }

    /// Bound the cached cube was built for, if any.
    pub fn cached_bound(&self) -> Option<f64> {
        self.cube.as_ref().map(|c| f64::from_bits(c.key))
    }
}
