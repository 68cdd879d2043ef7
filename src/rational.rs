// src/rational.rs
//
// Rational -> decimal conversion. Values that are not rational-shaped pass
// through untouched.

use crate::error::GpsError;
use crate::exif_types::{ExifValue, Rational, TagMap};

fn rational_to_f64(r: &Rational, tag: &str) -> Result<f64, GpsError> {
    r.to_f64().ok_or_else(|| GpsError::division_by_zero(tag))
}

/// Normalize one value. `tag` is only used to label a zero-denominator error.
pub fn normalize_value(value: &ExifValue, tag: &str) -> Result<ExifValue, GpsError> {
    Ok(match value {
        ExifValue::Rational(r) => ExifValue::Float(rational_to_f64(r, tag)?),
        ExifValue::RationalTuple(rats) => ExifValue::Floats(
            rats.iter().map(|r| rational_to_f64(r, tag)).collect::<Result<Vec<_>, _>>()?,
        ),
        other => other.clone(),
    })
}

/// Normalize every entry of a (resolved) GPS block.
pub fn normalize_gps_block(gps: &TagMap) -> Result<TagMap, GpsError> {
    gps.iter()
        .map(|(key, value)| Ok((key.clone(), normalize_value(value, &key.to_string())?)))
        .collect()
}
