//! Latest-value cells shared between a writer task and the control cycle.
//!
//! A writer publishes a whole value and a reader copies a whole value, each
//! inside one short critical section. A reader therefore never observes a
//! rotation matrix that is half old and half new.

use core::cell::Cell;

use critical_section::Mutex;

use crate::input::{BearingSource, OrientationSource};
use crate::types::Orientation;

/// A `Copy` value guarded by a critical section.
///
/// Usable in a `static`: `new` is `const`.
pub struct SnapshotCell<T: Copy> {
    inner: Mutex<Cell<T>>,
}

/// Orientation feed from the inertial subsystem.
pub type SharedOrientation = SnapshotCell<Orientation>;
/// Bearing feed from waypoint navigation, degrees.
pub type SharedBearing = SnapshotCell<f32>;

impl<T: Copy> SnapshotCell<T> {
    pub const fn new(initial: T) -> Self {
        Self {
            inner: Mutex::new(Cell::new(initial)),
        }
    }

    /// Replace the stored value.
    pub fn publish(&self, value: T) {
        critical_section::with(|cs| self.inner.borrow(cs).set(value));
    }

    /// Copy of the stored value.
    pub fn snapshot(&self) -> T {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }
}

impl SharedOrientation {
    /// Cell starting wings level.
    pub const fn level() -> Self {
        Self::new(Orientation::level())
    }
}

impl OrientationSource for SnapshotCell<Orientation> {
    fn orientation(&self) -> Orientation {
        self.snapshot()
    }
}

impl BearingSource for SnapshotCell<f32> {
    fn desired_bearing_deg(&self) -> f32 {
        self.snapshot()
    }
}
