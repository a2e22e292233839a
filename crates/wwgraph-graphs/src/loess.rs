//! Locally weighted regression (LOESS) for trend curves
//!
//! Tricube-weighted local linear regression: each point's fitted value comes
//! from a weighted least-squares line over the `span` fraction of its
//! nearest neighbours along x.

/// Smooth a set of points with the given span (fraction of the dataset used
/// as the local window, clamped to at least two points).
///
/// Returns one fitted `(x, y)` pair per input point, sorted by x. Inputs
/// with fewer than three points are returned as-is.
pub fn smooth(points: &[(f64, f64)], span: f64) -> Vec<(f64, f64)> {
    if points.len() < 3 {
        let mut out = points.to_vec();
        out.sort_by(|a, b| a.0.total_cmp(&b.0));
        return out;
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = sorted.len();
    let window = ((span * n as f64).ceil() as usize).clamp(2, n);

    let mut fitted = Vec::with_capacity(n);
    let mut lo = 0usize;
    for i in 0..n {
        let x = sorted[i].0;
        // Slide the window so it holds the nearest neighbours of x
        while lo + window < n && x - sorted[lo].0 > sorted[lo + window].0 - x {
            lo += 1;
        }
        let neighbours = &sorted[lo..lo + window];
        fitted.push((x, fit_at(x, neighbours)));
    }
    fitted
}

/// Weighted linear fit evaluated at `x`; degenerate windows (zero spread or
/// a singular normal matrix) fall back to the weighted mean.
fn fit_at(x: f64, neighbours: &[(f64, f64)]) -> f64 {
    let max_dist = neighbours
        .iter()
        .map(|(xi, _)| (xi - x).abs())
        .fold(0.0, f64::max);

    let mut sw = 0.0;
    let mut swx = 0.0;
    let mut swy = 0.0;
    let mut swxx = 0.0;
    let mut swxy = 0.0;
    for &(xi, yi) in neighbours {
        let w = if max_dist > 0.0 {
            tricube((xi - x).abs() / max_dist)
        } else {
            1.0
        };
        sw += w;
        swx += w * xi;
        swy += w * yi;
        swxx += w * xi * xi;
        swxy += w * xi * yi;
    }

    let denom = sw * swxx - swx * swx;
    if denom.abs() < f64::EPSILON * sw.max(1.0) {
        return swy / sw;
    }
    let slope = (sw * swxy - swx * swy) / denom;
    let intercept = (swy - slope * swx) / sw;
    intercept + slope * x
}

fn tricube(u: f64) -> f64 {
    let u = u.clamp(0.0, 1.0);
    let t = 1.0 - u * u * u;
    t * t * t
}
