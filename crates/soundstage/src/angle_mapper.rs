//! Mapping from a continuous direction to the nearest direction of the measurement grid.
//!
//! The dataset only covers azimuths from -80 to 80, that is the front half of the horizontal plane.  Everything else is
//! reached through symmetry:
//!
//! - Left and right mirror each other, which the per-ear tables already encode: the grid has negative azimuths for the
//!   left and positive for the right.
//! - Behind the listener is modeled by continuing the elevation axis over the top of the head: a source at elevation
//!   `e` behind the listener is treated as elevation `180 - e` at the mirrored front azimuth.
//!
//! Selection is nearest-neighbor, with no interpolation between measured directions.
use soundstage_datasets::{AzimuthBin, ElevationBin, AZIMUTH_ANGLES, ELEVATION_ANGLES, MAX_ELEVATION};

use crate::Direction;

/// The greatest magnitude of azimuth the dataset has measurements for.
const AZIMUTH_SPAN: f32 = AZIMUTH_ANGLES[AZIMUTH_ANGLES.len() - 1];

/// The grid cell chosen for a direction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SelectedBins {
    pub azimuth: AzimuthBin,
    pub elevation: ElevationBin,
}

/// Wrap any azimuth to `0.0..360.0`.
///
/// Non-finite azimuths wrap to 0.
pub fn wrap_azimuth(azimuth: f32) -> f32 {
    if !azimuth.is_finite() {
        return 0.0;
    }

    let wrapped = azimuth.rem_euclid(360.0);
    // rem_euclid rounds tiny negative values up to exactly 360.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Fold an azimuth in `0..=360` onto the azimuths of the dataset, in `-80..=80`.
///
/// Directions behind the listener are reflected to the front; left is negative.  Values between 80 and 90 on either
/// side are clamped to the outermost measurement.
pub fn correct_azimuth(azimuth: f32) -> f32 {
    let folded = if (270.0..=360.0).contains(&azimuth) {
        -(360.0 - azimuth)
    } else if (0.0..=90.0).contains(&azimuth) {
        azimuth
    } else if azimuth > 90.0 && azimuth <= 180.0 {
        180.0 - azimuth
    } else if azimuth > 180.0 && azimuth < 270.0 {
        -(azimuth - 180.0)
    } else {
        0.0
    };

    folded.clamp(-AZIMUTH_SPAN, AZIMUTH_SPAN)
}

/// Given an elevation and the (wrapped, uncorrected) azimuth, get the elevation on the dataset's extended elevation
/// axis.
///
/// In front of the listener the elevation passes through.  Behind it, it becomes `180 - elevation`, clamped to the
/// largest measured elevation.
pub fn correct_elevation(elevation: f32, azimuth: f32) -> f32 {
    if (270.0..=360.0).contains(&azimuth) || (0.0..=90.0).contains(&azimuth) {
        elevation
    } else if azimuth > 90.0 && azimuth < 270.0 {
        let reflected = elevation + (180.0 - 2.0 * elevation);
        reflected.min(MAX_ELEVATION)
    } else {
        0.0
    }
}

/// Index of the grid value closest to `value`.
///
/// Ties go to the lower index.  The grids are tiny, so this is a linear scan.
fn nearest_index(value: f32, grid: &[f32]) -> usize {
    let mut min_diff = f32::INFINITY;
    let mut index_found = 0;

    for (i, g) in grid.iter().copied().enumerate() {
        let diff = (value - g).abs();
        if diff < min_diff {
            min_diff = diff;
            index_found = i;
        }
    }

    index_found
}

pub fn nearest_azimuth_index(azimuth: f32) -> AzimuthBin {
    AzimuthBin::new(nearest_index(azimuth, &AZIMUTH_ANGLES))
        .expect("Nearest search only returns indices into the grid")
}

pub fn nearest_elevation_index(elevation: f32) -> ElevationBin {
    ElevationBin::new(nearest_index(elevation, &ELEVATION_ANGLES))
        .expect("Nearest search only returns indices into the grid")
}

/// Choose the measurement to use for a direction.
pub fn select_bins(direction: Direction) -> SelectedBins {
    let azimuth = wrap_azimuth(direction.azimuth);
    let elevation = if direction.elevation.is_finite() {
        direction.elevation
    } else {
        0.0
    };

    SelectedBins {
        azimuth: nearest_azimuth_index(correct_azimuth(azimuth)),
        elevation: nearest_elevation_index(correct_elevation(elevation, azimuth)),
    }
}
