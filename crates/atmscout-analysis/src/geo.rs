//! Great-circle distance between optional coordinate pairs.
//!
//! Scraped records frequently lack one or both coordinates, so the distance
//! function never fails: missing or malformed input degrades to
//! `f64::INFINITY` ("unknown, arbitrarily far") instead of an error.

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two optional coordinate pairs.
///
/// Returns `f64::INFINITY` when either pair is absent or any component is
/// non-finite. Callers treat infinity as "distance unknown".
#[must_use]
pub fn distance_km(a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> f64 {
    let (Some((lat1, lon1)), Some((lat2, lon2))) = (a, b) else {
        return f64::INFINITY;
    };

    if ![lat1, lon1, lat2, lon2].iter().all(|v| v.is_finite()) {
        return f64::INFINITY;
    }

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    let d = EARTH_RADIUS_KM * c;
    // asin of a slightly-out-of-range h (float rounding on antipodal points)
    // yields NaN; map that to infinity like any other malformed input.
    if d.is_finite() {
        d
    } else {
        f64::INFINITY
    }
}
