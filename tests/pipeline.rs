use exifgeo::exif_types::{
    TAG_GPS_ALTITUDE, TAG_GPS_ALTITUDE_REF, TAG_GPS_DATESTAMP, TAG_GPS_INFO, TAG_GPS_LATITUDE,
    TAG_GPS_LATITUDE_REF, TAG_GPS_LONGITUDE, TAG_GPS_LONGITUDE_REF, TAG_GPS_SPEED,
    TAG_GPS_SPEED_REF, TAG_GPS_TIMESTAMP, TAG_GPS_TRACK, TAG_GPS_TRACK_REF, TAG_MAKE,
};
use exifgeo::{ExifValue, GpsError, RawTagMap, TagKey, TagMap, extract_gps};

fn pittsburgh_gps() -> TagMap {
    let mut gps = TagMap::new();
    gps.insert(TagKey::Id(TAG_GPS_LATITUDE), ExifValue::rationals(&[(40, 1), (26, 1), (0, 1)]));
    gps.insert(TagKey::Id(TAG_GPS_LATITUDE_REF), ExifValue::text("N"));
    gps.insert(TagKey::Id(TAG_GPS_LONGITUDE), ExifValue::rationals(&[(79, 1), (56, 1), (0, 1)]));
    gps.insert(TagKey::Id(TAG_GPS_LONGITUDE_REF), ExifValue::text("W"));
    gps
}

fn raw_with(gps: TagMap) -> RawTagMap {
    let mut raw = RawTagMap::new();
    raw.insert(TagKey::Id(TAG_MAKE), ExifValue::text("Canon"));
    raw.insert(TagKey::Id(TAG_GPS_INFO), ExifValue::Map(gps));
    raw
}

#[test]
fn test_end_to_end_position() {
    let record = extract_gps(&raw_with(pittsburgh_gps())).unwrap();
    assert!((record.latitude.unwrap() - 40.4333).abs() < 1e-4);
    assert!((record.longitude.unwrap() - -79.9333).abs() < 1e-4);

    let point = record.position().unwrap();
    assert_eq!(point.y(), record.latitude.unwrap());
    assert_eq!(point.x(), record.longitude.unwrap());
}

#[test]
fn test_end_to_end_all_fields() {
    let mut gps = pittsburgh_gps();
    gps.insert(TagKey::Id(TAG_GPS_ALTITUDE_REF), ExifValue::Integer(0));
    gps.insert(TagKey::Id(TAG_GPS_ALTITUDE), ExifValue::rational(2735, 10));
    gps.insert(TagKey::Id(TAG_GPS_SPEED), ExifValue::rational(0, 1));
    gps.insert(TagKey::Id(TAG_GPS_SPEED_REF), ExifValue::text("K"));
    gps.insert(TagKey::Id(TAG_GPS_TRACK), ExifValue::rational(18125, 100));
    gps.insert(TagKey::Id(TAG_GPS_TRACK_REF), ExifValue::text("T"));
    gps.insert(TagKey::Id(TAG_GPS_DATESTAMP), ExifValue::text("2024:03:05"));
    gps.insert(TagKey::Id(TAG_GPS_TIMESTAMP), ExifValue::rationals(&[(14, 1), (30, 1), (125, 10)]));

    let record = extract_gps(&raw_with(gps)).unwrap();
    assert_eq!(record.altitude, Some(ExifValue::Float(273.5)));
    assert_eq!(record.speed, Some(ExifValue::Float(0.0)));
    assert_eq!(record.speed_ref.as_deref(), Some("K"));
    assert_eq!(record.track, Some(ExifValue::Float(181.25)));
    assert_eq!(record.track_ref.as_deref(), Some("T"));
    assert_eq!(
        record.timestamp.unwrap().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        "2024-03-05T14:30:12.500000"
    );
}

#[test]
fn test_missing_ref_drops_both_coordinates() {
    let mut gps = pittsburgh_gps();
    gps.remove(&TagKey::Id(TAG_GPS_LONGITUDE_REF));
    let record = extract_gps(&raw_with(gps)).unwrap();
    assert!(record.latitude.is_none());
    assert!(record.longitude.is_none());
}

#[test]
fn test_no_gps_block() {
    let mut raw = RawTagMap::new();
    raw.insert(TagKey::Id(TAG_MAKE), ExifValue::text("Canon"));
    let record = extract_gps(&raw).unwrap();
    assert!(record.is_empty());

    assert!(extract_gps(&RawTagMap::new()).unwrap().is_empty());
}

#[test]
fn test_typed_failures() {
    let mut gps = pittsburgh_gps();
    gps.insert(TagKey::Id(TAG_GPS_ALTITUDE), ExifValue::rational(10, 0));
    let err = extract_gps(&raw_with(gps)).unwrap_err();
    assert!(matches!(err, GpsError::DivisionByZero { ref tag } if tag == "GPSAltitude"));

    let mut gps = pittsburgh_gps();
    gps.insert(TagKey::Id(TAG_GPS_DATESTAMP), ExifValue::text("2024-03-05"));
    gps.insert(TagKey::Id(TAG_GPS_TIMESTAMP), ExifValue::rationals(&[(14, 1), (30, 1), (0, 1)]));
    let err = extract_gps(&raw_with(gps)).unwrap_err();
    assert!(matches!(err, GpsError::MalformedTimestamp { ref field, .. } if field == "GPSDateStamp"));
}

#[test]
fn test_concurrent_extraction() {
    let raw = raw_with(pittsburgh_gps());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let raw = raw.clone();
            std::thread::spawn(move || extract_gps(&raw).unwrap())
        })
        .collect();
    let expected = extract_gps(&raw).unwrap();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
