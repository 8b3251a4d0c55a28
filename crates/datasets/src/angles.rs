/// Number of azimuths in the measurement grid.
pub const AZIMUTH_BINS: usize = 25;

/// Number of elevations in the measurement grid.
pub const ELEVATION_BINS: usize = 50;

/// The azimuths of the measurement grid in degrees, sorted from least to greatest.
///
/// 0 is straight ahead.  Negative angles are to the left.  The grid only covers the frontal half of the horizontal
/// plane and is denser near the median plane; the rear half is reached by continuing the elevation axis over the top of
/// the head, see [ELEVATION_ANGLES].
pub const AZIMUTH_ANGLES: [f32; AZIMUTH_BINS] = [
    -80.0, -65.0, -55.0, -45.0, -40.0, -35.0, -30.0, -25.0, -20.0, -15.0, -10.0, -5.0, 0.0, 5.0, 10.0, 15.0, 20.0,
    25.0, 30.0, 35.0, 40.0, 45.0, 55.0, 65.0, 80.0,
];

/// The elevations of the measurement grid in degrees, sorted from least to greatest.
///
/// These run from -45 in steps of 5.625.  0 is level with the ears and 90 straight up.  Values past 90 continue over
/// the top of the head and down the back, so 180 is level with the ears but behind the listener.
pub const ELEVATION_ANGLES: [f32; ELEVATION_BINS] = [
    -45.0, -39.375, -33.75, -28.125, -22.5, -16.875, -11.25, -5.625, 0.0, 5.625, 11.25, 16.875, 22.5, 28.125, 33.75,
    39.375, 45.0, 50.625, 56.25, 61.875, 67.5, 73.125, 78.75, 84.375, 90.0, 95.625, 101.25, 106.875, 112.5, 118.125,
    123.75, 129.375, 135.0, 140.625, 146.25, 151.875, 157.5, 163.125, 168.75, 174.375, 180.0, 185.625, 191.25,
    196.875, 202.5, 208.125, 213.75, 219.375, 225.0, 230.625,
];

/// The greatest elevation in the grid.
pub const MAX_ELEVATION: f32 = ELEVATION_ANGLES[ELEVATION_BINS - 1];
