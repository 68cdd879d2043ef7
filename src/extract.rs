// src/extract.rs
//
// Pipeline: raw tag map -> resolved names -> normalized GPS block -> record.

use crate::error::GpsError;
use crate::exif_types::{ExifValue, GPS_INFO_KEY, RawTagMap, ResolvedTagMap, TagKey};
use crate::gps_record::{NormalizedGpsRecord, build_record};
use crate::rational::normalize_gps_block;
use crate::tag_resolver::resolve_tags;

/// Resolve tag names and convert the GPS block's rationals to decimals.
/// Tags outside the GPS block keep their raw values.
pub fn exif_data(raw: &RawTagMap) -> Result<ResolvedTagMap, GpsError> {
    let mut resolved = resolve_tags(raw);
    let key = TagKey::name(GPS_INFO_KEY);
    if let Some(ExifValue::Map(gps)) = resolved.get(&key) {
        let normalized = normalize_gps_block(gps)?;
        resolved.insert(key, ExifValue::Map(normalized));
    }
    Ok(resolved)
}

/// Main entry point: extract the normalized GPS record from a decoder mapping.
pub fn extract_gps(raw: &RawTagMap) -> Result<NormalizedGpsRecord, GpsError> {
    let resolved = exif_data(raw)?;
    build_record(&resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif_types::{
        TAG_GPS_ALTITUDE, TAG_GPS_INFO, TAG_GPS_LATITUDE, TAG_MAKE, TAG_X_RESOLUTION, TagMap,
    };

    #[test]
    fn test_only_gps_block_is_normalized() {
        let mut gps = TagMap::new();
        gps.insert(TagKey::Id(TAG_GPS_ALTITUDE), ExifValue::rational(1001, 10));
        let mut raw = RawTagMap::new();
        raw.insert(TagKey::Id(TAG_X_RESOLUTION), ExifValue::rational(72, 1));
        raw.insert(TagKey::Id(TAG_MAKE), ExifValue::text("Apple"));
        raw.insert(TagKey::Id(TAG_GPS_INFO), ExifValue::Map(gps));

        let data = exif_data(&raw).unwrap();
        assert_eq!(data[&TagKey::name("XResolution")], ExifValue::rational(72, 1));
        let gps = data[&TagKey::name(GPS_INFO_KEY)].as_map().unwrap();
        assert_eq!(gps[&TagKey::name("GPSAltitude")], ExifValue::Float(100.1));
    }

    #[test]
    fn test_zero_denominator_surfaces() {
        let mut gps = TagMap::new();
        gps.insert(TagKey::Id(TAG_GPS_LATITUDE), ExifValue::rationals(&[(40, 1), (26, 0), (0, 1)]));
        let mut raw = RawTagMap::new();
        raw.insert(TagKey::Id(TAG_GPS_INFO), ExifValue::Map(gps));

        assert_eq!(
            extract_gps(&raw).unwrap_err(),
            GpsError::DivisionByZero { tag: "GPSLatitude".to_string() }
        );
    }

    #[test]
    fn test_empty_input() {
        let record = extract_gps(&RawTagMap::new()).unwrap();
        assert!(record.is_empty());
    }
}
