// src/coordinate.rs
//
// Degrees/minutes/seconds to signed decimal degrees.
// Hemisphere references are compared exactly and case-sensitively: anything
// other than "N" (latitude) or "E" (longitude) yields a negative value.

use crate::error::GpsError;
use geo::Point;

/// Parse GPS coordinate magnitude from a normalized (d, m, s) triplet.
pub fn dms_to_decimal(dms: &[f64], tag: &str) -> Result<f64, GpsError> {
    match dms {
        [degrees, minutes, seconds] => Ok(degrees + minutes / 60.0 + seconds / 3600.0),
        _ => Err(GpsError::malformed_coordinate(
            tag,
            format!("expected 3 components (d, m, s), got {}", dms.len()),
        )),
    }
}

fn apply_ref(magnitude: f64, reference: &str, positive: &str) -> f64 {
    if reference != positive { -magnitude } else { magnitude }
}

pub fn latitude(dms: &[f64], reference: &str) -> Result<f64, GpsError> {
    Ok(apply_ref(dms_to_decimal(dms, "GPSLatitude")?, reference, "N"))
}

pub fn longitude(dms: &[f64], reference: &str) -> Result<f64, GpsError> {
    Ok(apply_ref(dms_to_decimal(dms, "GPSLongitude")?, reference, "E"))
}

/// geo uses (x, y) = (lon, lat)
pub fn to_point(lat: f64, lon: f64) -> Point<f64> {
    Point::new(lon, lat)
}

/// Format decimal degrees as DMS string
pub fn format_dms(decimal_deg: f64) -> String {
    let abs_deg = decimal_deg.abs();
    let d = abs_deg.floor() as i32;
    let m_float = (abs_deg - d as f64) * 60.0;
    let m = m_float.floor() as i32;
    let s = (m_float - m as f64) * 60.0;

    let sign = if decimal_deg < 0.0 { "-" } else { "" };
    format!("{}{}° {}' {:.1}\"", sign, d, m, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dms_to_decimal() {
        // 48° 51' 24" (Paris approximate)
        let decimal = dms_to_decimal(&[48.0, 51.0, 24.0], "GPSLatitude").unwrap();
        assert!((decimal - 48.8567).abs() < 0.001);
    }

    #[test]
    fn test_not_a_triplet() {
        let err = dms_to_decimal(&[48.0, 51.0], "GPSLatitude").unwrap_err();
        assert!(matches!(err, GpsError::MalformedCoordinate { ref tag, .. } if tag == "GPSLatitude"));
        assert!(longitude(&[1.0, 2.0, 3.0, 4.0], "E").is_err());
    }

    #[test]
    fn test_latitude_ref_is_exact() {
        let dms = [40.0, 30.0, 0.0];
        assert_eq!(latitude(&dms, "N").unwrap(), 40.5);
        assert_eq!(latitude(&dms, "S").unwrap(), -40.5);
        assert_eq!(latitude(&dms, "n").unwrap(), -40.5);
        assert_eq!(latitude(&dms, "").unwrap(), -40.5);
        assert_eq!(latitude(&dms, "N ").unwrap(), -40.5);
    }

    #[test]
    fn test_longitude_ref_is_exact() {
        let dms = [79.0, 56.0, 0.0];
        assert!(longitude(&dms, "E").unwrap() > 0.0);
        assert!(longitude(&dms, "W").unwrap() < 0.0);
        assert!(longitude(&dms, "e").unwrap() < 0.0);
        // latitude refs do not count as east
        assert!(longitude(&dms, "N").unwrap() < 0.0);
    }

    #[test]
    fn test_no_range_clamping() {
        assert_eq!(latitude(&[95.0, 0.0, 0.0], "N").unwrap(), 95.0);
    }

    #[test]
    fn test_format_dms() {
        assert_eq!(format_dms(40.5), "40° 30' 0.0\"");
        assert_eq!(format_dms(-79.75), "-79° 45' 0.0\"");
        let p = to_point(40.5, -79.5);
        assert_eq!((p.x(), p.y()), (-79.5, 40.5));
    }
}
