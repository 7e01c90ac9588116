//! Geospatial operators: haversine great-circle distance and ray-casting
//! point-in-polygon, both over WGS-84 lat/lon pairs.

use serde_json::Value as Json;

const EARTH_RADIUS_KM: f64 = 6_371.0088;

fn point_of(v: &Json) -> Option<(f64, f64)> {
    if let Some(arr) = v.as_array() {
        if arr.len() == 2 {
            return Some((arr[0].as_f64()?, arr[1].as_f64()?));
        }
        return None;
    }
    Some((v.get("lat")?.as_f64()?, v.get("lon")?.as_f64()?))
}

/// Great-circle distance between two WGS-84 points, in kilometers.
pub fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

pub fn within_radius(field: &Json, value: &Json) -> bool {
    let Some(point) = point_of(field) else { return false };
    let Some(center) = value.get("center").and_then(point_of) else { return false };
    let Some(radius) = value.get("radius_km").and_then(Json::as_f64) else { return false };
    haversine_km(point, center) <= radius
}

/// Ray-casting point-in-polygon; boundary points are included as inside.
pub fn in_polygon(field: &Json, value: &Json) -> bool {
    let Some(point) = point_of(field) else { return false };
    let polygon_json = if let Some(arr) = value.as_array() {
        Some(arr)
    } else {
        value.get("polygon").and_then(Json::as_array)
    };
    let Some(polygon_json) = polygon_json else { return false };
    let polygon: Option<Vec<(f64, f64)>> = polygon_json.iter().map(point_of).collect();
    let Some(polygon) = polygon else { return false };
    if polygon.len() < 3 {
        return false;
    }
    point_in_polygon(point, &polygon)
}

fn on_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> bool {
    let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    if cross.abs() > 1e-9 {
        return false;
    }
    let within_x = p.0 >= a.0.min(b.0) - 1e-9 && p.0 <= a.0.max(b.0) + 1e-9;
    let within_y = p.1 >= a.1.min(b.1) - 1e-9 && p.1 <= a.1.max(b.1) + 1e-9;
    within_x && within_y
}

fn point_in_polygon(point: (f64, f64), polygon: &[(f64, f64)]) -> bool {
    let n = polygon.len();
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        if on_segment(point, a, b) {
            return true;
        }
    }
    let (x, y) = point;
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        let intersects = (yi > y) != (yj > y)
            && x < (xj - xi) * (y - yi) / (yj - yi) + xi;
        if intersects {
            inside = !inside;
        }
        j = i;
    }
    inside
}
