// File: crates/chart-core/src/downsample.rs
// Summary: Render-cost thinning for point markers (even index spacing).

/// Default cap on marker dots drawn per series.
pub const DEFAULT_MAX_MARKERS: usize = 800;

/// Up to `max` indices into `0..len`, evenly spaced, first and last always included.
/// Returns every index when `len <= max`.
pub fn evenly_spaced_indices(len: usize, max: usize) -> Vec<usize> {
    if len == 0 || max == 0 { return Vec::new(); }
    if len <= max { return (0..len).collect(); }
    if max == 1 { return vec![0]; }

    let step = (len - 1) as f64 / (max - 1) as f64;
    let mut out = Vec::with_capacity(max);
    for i in 0..max {
        let idx = ((i as f64) * step).round() as usize;
        let idx = idx.min(len - 1);
        if out.last() != Some(&idx) {
            out.push(idx);
        }
    }
    out
}
