// src/gps_record.rs
//
// Assembles the typed GPS record from a resolved, rational-normalized tag map.
// Presence follows the decoder's truthiness: an empty string or sequence
// counts as a missing tag.

use crate::coordinate;
use crate::error::GpsError;
use crate::exif_types::{ExifValue, GPS_INFO_KEY, ResolvedTagMap, TagKey, TagMap};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use geo::Point;
use serde::Serialize;

const GPS_LATITUDE: &str = "GPSLatitude";
const GPS_LATITUDE_REF: &str = "GPSLatitudeRef";
const GPS_LONGITUDE: &str = "GPSLongitude";
const GPS_LONGITUDE_REF: &str = "GPSLongitudeRef";
const GPS_ALTITUDE: &str = "GPSAltitude";
const GPS_SPEED: &str = "GPSSpeed";
const GPS_SPEED_REF: &str = "GPSSpeedRef";
const GPS_TRACK: &str = "GPSTrack";
const GPS_TRACK_REF: &str = "GPSTrackRef";
const GPS_DATESTAMP: &str = "GPSDateStamp";
const GPS_TIMESTAMP: &str = "GPSTimeStamp";

/// Clean GPS information for one image. Every field is optional; an image
/// without a GPS block yields a record with all fields absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NormalizedGpsRecord {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<ExifValue>,
    pub speed: Option<ExifValue>,
    pub speed_ref: Option<String>,
    pub track: Option<ExifValue>,
    pub track_ref: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NormalizedGpsRecord {
    /// Get GPS position if both lat/lon are present
    pub fn position(&self) -> Option<Point<f64>> {
        Some(coordinate::to_point(self.latitude?, self.longitude?))
    }

    pub fn has_position(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Altitude in meters, when the copied-through value is numeric
    pub fn altitude_m(&self) -> Option<f64> {
        self.altitude.as_ref().and_then(ExifValue::as_f64)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn get<'a>(gps: &'a TagMap, name: &str) -> Option<&'a ExifValue> {
    gps.get(&TagKey::name(name)).filter(|v| !v.is_empty())
}

fn get_ref(gps: &TagMap, name: &str) -> Option<String> {
    gps.get(&TagKey::name(name))
        .map(|v| v.as_str().map(str::to_owned).unwrap_or_else(|| v.as_string()))
}

fn triplet(value: &ExifValue, tag: &str) -> Result<Vec<f64>, GpsError> {
    value.as_f64_seq().ok_or_else(|| {
        GpsError::malformed_coordinate(tag, format!("not a numeric sequence: {}", value.as_string()))
    })
}

/// Latitude and longitude are computed only when all four source tags are
/// present; otherwise both are absent.
fn extract_lat_lon(gps: &TagMap) -> Result<(Option<f64>, Option<f64>), GpsError> {
    let (Some(lat), Some(lat_ref), Some(lon), Some(lon_ref)) = (
        get(gps, GPS_LATITUDE),
        get(gps, GPS_LATITUDE_REF),
        get(gps, GPS_LONGITUDE),
        get(gps, GPS_LONGITUDE_REF),
    ) else {
        return Ok((None, None));
    };

    // Non-string refs never equal "N"/"E"
    let lat_ref = lat_ref.as_str().unwrap_or_default();
    let lon_ref = lon_ref.as_str().unwrap_or_default();

    let lat = coordinate::latitude(&triplet(lat, GPS_LATITUDE)?, lat_ref)?;
    let lon = coordinate::longitude(&triplet(lon, GPS_LONGITUDE)?, lon_ref)?;
    Ok((Some(lat), Some(lon)))
}

fn parse_date_component<T: std::str::FromStr>(part: &str, date: &str) -> Result<T, GpsError> {
    part.trim().parse::<T>().map_err(|_| {
        GpsError::malformed_timestamp(
            GPS_DATESTAMP,
            format!("'{}' is not an integer in '{}'", part, date),
        )
    })
}

/// Whole part of a non-negative time component
fn time_component(v: f64, what: &str) -> Result<u32, GpsError> {
    if !v.is_finite() || v < 0.0 || v >= u32::MAX as f64 {
        return Err(GpsError::malformed_timestamp(GPS_TIMESTAMP, format!("invalid {}: {}", what, v)));
    }
    Ok(v.trunc() as u32)
}

/// Compose a UTC timestamp from GPSDateStamp ("YYYY:MM:DD") and GPSTimeStamp
/// (hours, minutes, seconds with fraction). Microseconds are truncated, not rounded.
pub fn compose_timestamp(
    date: &ExifValue,
    time: &ExifValue,
) -> Result<DateTime<Utc>, GpsError> {
    let date_str = date.as_str().ok_or_else(|| {
        GpsError::malformed_timestamp(GPS_DATESTAMP, format!("not a string: {}", date.as_string()))
    })?;
    let [year, month, day] = date_str.split(':').collect::<Vec<_>>()[..] else {
        return Err(GpsError::malformed_timestamp(
            GPS_DATESTAMP,
            format!("expected YYYY:MM:DD, got '{}'", date_str),
        ));
    };
    let year: i32 = parse_date_component(year, date_str)?;
    let month: u32 = parse_date_component(month, date_str)?;
    let day: u32 = parse_date_component(day, date_str)?;
    if !(1..=9999).contains(&year) {
        return Err(GpsError::malformed_timestamp(
            GPS_DATESTAMP,
            format!("year {} out of range 1..=9999", year),
        ));
    }

    let hms = time.as_f64_seq().ok_or_else(|| {
        GpsError::malformed_timestamp(
            GPS_TIMESTAMP,
            format!("not a numeric sequence: {}", time.as_string()),
        )
    })?;
    let [hours, minutes, seconds, ..] = hms[..] else {
        return Err(GpsError::malformed_timestamp(
            GPS_TIMESTAMP,
            format!("expected 3 components (h, m, s), got {}", hms.len()),
        ));
    };
    let hour = time_component(hours, "hour")?;
    let minute = time_component(minutes, "minute")?;
    let second = time_component(seconds, "second")?;
    let micro = (seconds.fract() * 1e6).trunc() as u32;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        GpsError::malformed_timestamp(GPS_DATESTAMP, format!("invalid calendar date '{}'", date_str))
    })?;
    let time = NaiveTime::from_hms_micro_opt(hour, minute, second, micro).ok_or_else(|| {
        GpsError::malformed_timestamp(
            GPS_TIMESTAMP,
            format!("invalid time of day {:02}:{:02}:{:02}.{:06}", hour, minute, second, micro),
        )
    })?;

    Ok(NaiveDateTime::new(date, time).and_utc())
}

/// Build the record from a resolved tag map whose GPS block has already been
/// rational-normalized. A missing GPS block is not an error.
pub fn build_record(resolved: &ResolvedTagMap) -> Result<NormalizedGpsRecord, GpsError> {
    let Some(gps) = resolved.get(&TagKey::name(GPS_INFO_KEY)).and_then(ExifValue::as_map) else {
        return Ok(NormalizedGpsRecord::default());
    };

    let (latitude, longitude) = extract_lat_lon(gps)?;

    let timestamp = match (get(gps, GPS_DATESTAMP), get(gps, GPS_TIMESTAMP)) {
        (Some(date), Some(time)) => Some(compose_timestamp(date, time)?),
        _ => None,
    };

    Ok(NormalizedGpsRecord {
        latitude,
        longitude,
        altitude: gps.get(&TagKey::name(GPS_ALTITUDE)).cloned(),
        speed: gps.get(&TagKey::name(GPS_SPEED)).cloned(),
        speed_ref: get_ref(gps, GPS_SPEED_REF),
        track: gps.get(&TagKey::name(GPS_TRACK)).cloned(),
        track_ref: get_ref(gps, GPS_TRACK_REF),
        timestamp,
    })
}
