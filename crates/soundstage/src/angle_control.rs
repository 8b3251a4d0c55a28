use std::sync::atomic::Ordering;
use std::sync::Arc;

use soundstage_sync::AtomicF32Pair;

/// A direction for the source, in degrees.
///
/// Azimuth is any value and wraps around 360: 0 is straight ahead and angles increase clockwise as seen from above, so
/// 90 is to the right.  Elevation is nominally in `-45..=90`, where 0 is level with the ears and 90 straight up.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Direction {
    pub azimuth: f32,
    pub elevation: f32,
}

impl Direction {
    pub fn new(azimuth: f32, elevation: f32) -> Direction {
        Direction { azimuth, elevation }
    }
}

/// A handle through which a controller (a UI, an automation lane, a game) moves the source.
///
/// Handles are cheap to clone and may be used from any thread at any time.  The engine reads the direction once at the
/// start of each super-block as a single snapshot, so it never sees the azimuth of one update with the elevation of
/// another, and changes made while a super-block is being accumulated all land together at the next one.
#[derive(Clone, Debug)]
pub struct AngleControl {
    state: Arc<AtomicF32Pair>,
}

impl AngleControl {
    pub fn new(initial: Direction) -> AngleControl {
        AngleControl {
            state: Arc::new(AtomicF32Pair::new(initial.azimuth, initial.elevation)),
        }
    }

    pub fn set_direction(&self, direction: Direction) {
        self.state
            .store(direction.azimuth, direction.elevation, Ordering::Release);
    }

    /// Change the azimuth, leaving the elevation as it is even if another thread is changing it concurrently.
    pub fn set_azimuth(&self, azimuth: f32) {
        self.state
            .update(|_, elevation| (azimuth, elevation), Ordering::AcqRel);
    }

    /// Change the elevation, leaving the azimuth as it is even if another thread is changing it concurrently.
    pub fn set_elevation(&self, elevation: f32) {
        self.state
            .update(|azimuth, _| (azimuth, elevation), Ordering::AcqRel);
    }

    /// Read the current direction as one consistent value.
    pub fn snapshot(&self) -> Direction {
        let (azimuth, elevation) = self.state.load(Ordering::Acquire);
        Direction { azimuth, elevation }
    }
}

impl Default for AngleControl {
    fn default() -> Self {
        AngleControl::new(Direction::default())
    }
}
