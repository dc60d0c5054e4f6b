use geo::{coord, Rect};

/// mean meters per degree of latitude, as used when buffering in degrees
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// converts a distance in meters to degrees of (latitude, longitude) at the given
/// latitude. longitude degrees shrink towards the poles.
pub fn meters_to_degrees(meters: f64, latitude: f64) -> (f64, f64) {
    let d_lat = meters / METERS_PER_DEGREE;
    let cos_lat = latitude.to_radians().cos().abs().max(1e-6);
    let d_lon = meters / (METERS_PER_DEGREE * cos_lat);
    (d_lat, d_lon)
}

/// grows a WGS84 rectangle by a distance in meters on every side. the longitude
/// buffer is taken at the latitude furthest from the equator so the result
/// always covers the requested distance.
pub fn buffer_rect(rect: &Rect<f64>, meters: f64) -> Rect<f64> {
    let widest_lat = rect.min().y.abs().max(rect.max().y.abs());
    let (d_lat, d_lon) = meters_to_degrees(meters, widest_lat);
    Rect::new(
        coord! { x: rect.min().x - d_lon, y: rect.min().y - d_lat },
        coord! { x: rect.max().x + d_lon, y: rect.max().y + d_lat },
    )
}

#[cfg(test)]
mod tests {
    use super::{buffer_rect, meters_to_degrees};
    use geo::{coord, Rect};

    #[test]
    fn thirty_meters_in_london() {
        let (d_lat, d_lon) = meters_to_degrees(30.0, 51.5);
        assert!((d_lat - 0.00027).abs() < 1e-5);
        // longitude degrees are ~62% as long at this latitude
        assert!(d_lon > d_lat);
        assert!((d_lon - 0.000436).abs() < 1e-5);
    }

    #[test]
    fn buffered_rect_contains_original() {
        let r = Rect::new(coord! { x: -0.3, y: 51.5 }, coord! { x: -0.2, y: 51.6 });
        let b = buffer_rect(&r, 500.0);
        assert!(b.min().x < r.min().x && b.min().y < r.min().y);
        assert!(b.max().x > r.max().x && b.max().y > r.max().y);
    }
}
