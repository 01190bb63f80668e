//! Great-circle math on a spherical Earth.

use crate::models::Coordinates;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const DEGENERATE_ARC_RAD: f64 = 1e-12;

/// Great-circle distance between two points in kilometers (Haversine formula).
pub fn haversine_distance(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();

    let h = (dphi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for near-antipodal points.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Central angle between two points, in radians.
fn central_angle(a: Coordinates, b: Coordinates) -> f64 {
    haversine_distance(a, b) / EARTH_RADIUS_KM
}

/// Sample `segments + 1` points along the great circle from `a` to `b`.
///
/// Points are `[lon, lat]`. The first point is `a` and the last is `b`.
/// Coincident endpoints yield `segments + 1` copies of `a`. Antipodal
/// endpoints have no unique great circle, so the path falls back to a
/// linear interpolation in degrees.
pub fn interpolate_great_circle(a: Coordinates, b: Coordinates, segments: usize) -> Vec<[f64; 2]> {
    if segments == 0 {
        return vec![a.to_lon_lat()];
    }

    let d = central_angle(a, b);
    let sin_d = d.sin();

    if d < DEGENERATE_ARC_RAD {
        return vec![a.to_lon_lat(); segments + 1];
    }
    if sin_d.abs() < DEGENERATE_ARC_RAD {
        return interpolate_linear(a, b, segments);
    }

    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let lon2 = b.longitude.to_radians();

    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        if i == 0 {
            points.push(a.to_lon_lat());
            continue;
        }
        if i == segments {
            points.push(b.to_lon_lat());
            continue;
        }
        let f = i as f64 / segments as f64;
        let wa = ((1.0 - f) * d).sin() / sin_d;
        let wb = (f * d).sin() / sin_d;

        let x = wa * lat1.cos() * lon1.cos() + wb * lat2.cos() * lon2.cos();
        let y = wa * lat1.cos() * lon1.sin() + wb * lat2.cos() * lon2.sin();
        let z = wa * lat1.sin() + wb * lat2.sin();

        let lat = z.atan2((x * x + y * y).sqrt());
        let lon = y.atan2(x);
        points.push([lon.to_degrees(), lat.to_degrees()]);
    }
    points
}

fn interpolate_linear(a: Coordinates, b: Coordinates, segments: usize) -> Vec<[f64; 2]> {
    (0..=segments)
        .map(|i| {
            let f = i as f64 / segments as f64;
            [
                a.longitude + (b.longitude - a.longitude) * f,
                a.latitude + (b.latitude - a.latitude) * f,
            ]
        })
        .collect()
}
