//! Simple threshold-based floating point asserts.
//!
//! We could grab various crates for this but we generally want thresholds bigger than epsilon, and this is both small
//! and simple.  Public so that the other crates of the workspace can use it in their tests.

#[track_caller]
pub fn close_floats32(a: f32, b: f32, threshold: f32) {
    let diff = (a - b).abs();
    assert!(
        diff < threshold,
        "{} vs {}, difference {} is greater than threshold {}",
        a,
        b,
        diff,
        threshold
    );
}

/// Compare two slices elementwise, reporting the first index which differs.
#[track_caller]
pub fn close_slices32(a: &[f32], b: &[f32], threshold: f32) {
    assert_eq!(a.len(), b.len(), "Slices have different lengths");

    for (i, (x, y)) in a.iter().copied().zip(b.iter().copied()).enumerate() {
        let diff = (x - y).abs();
        assert!(
            diff < threshold,
            "At index {}: {} vs {}, difference {} is greater than threshold {}",
            i,
            x,
            y,
            diff,
            threshold
        );
    }
}
