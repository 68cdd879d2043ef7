// src/exif_types.rs
//
// Tagged EXIF value union and tag lookup tables.
// Main-IFD and GPS-IFD tag numbers overlap (0x0001 is both InteropIndex and
// GPSLatitudeRef), so each IFD has its own name table.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum size for binary EXIF values (exclude thumbnails and large blobs)
pub const MAX_TAG_SIZE: usize = 1024;

/// Key under which the resolved GPS sub-mapping is nested
pub const GPS_INFO_KEY: &str = "GPSInfo";

/// Tag-keyed mapping as handed over by a metadata decoder, or after name resolution.
pub type TagMap = BTreeMap<TagKey, ExifValue>;
pub type RawTagMap = TagMap;
pub type ResolvedTagMap = TagMap;

/// Opaque tag identifier: numeric tag code or an already-resolved name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagKey {
    Id(u16),
    Name(String),
}

impl TagKey {
    pub fn name(name: impl Into<String>) -> Self {
        TagKey::Name(name.into())
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKey::Id(id) => write!(f, "0x{:04X}", id),
            TagKey::Name(n) => f.write_str(n),
        }
    }
}

// JSON object keys must be strings
impl Serialize for TagKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// EXIF rational: numerator / denominator. Signed to cover both RATIONAL and SRATIONAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rational {
    pub num: i64,
    pub denom: i64,
}

impl Rational {
    pub const fn new(num: i64, denom: i64) -> Self {
        Self { num, denom }
    }

    /// `None` when the denominator is zero
    pub fn to_f64(&self) -> Option<f64> {
        if self.denom == 0 { None } else { Some(self.num as f64 / self.denom as f64) }
    }
}

impl From<(i64, i64)> for Rational {
    fn from((num, denom): (i64, i64)) -> Self {
        Self { num, denom }
    }
}

/// Generic value type for decoded EXIF data.
/// Rational shapes are decided once at the decoder boundary, never re-inferred.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExifValue {
    /// Plain integer (BYTE, SHORT, LONG, SLONG)
    Integer(i64),
    /// Already-decoded floating point scalar
    Float(f64),
    /// ASCII or UTF-8 string (trimmed, null bytes removed)
    Text(String),
    /// Single numerator/denominator pair
    Rational(Rational),
    /// Sequence of rationals (GPS coordinates, GPS time of day)
    RationalTuple(Vec<Rational>),
    /// Normalized rational tuple
    Floats(Vec<f64>),
    /// Multiple integers (version fields, bit depths)
    Integers(Vec<i64>),
    /// Opaque binary payload
    Bytes(Vec<u8>),
    /// Nested IFD (GPS block)
    Map(TagMap),
}

impl ExifValue {
    pub fn rational(num: i64, denom: i64) -> Self {
        ExifValue::Rational(Rational::new(num, denom))
    }

    pub fn rationals(pairs: &[(i64, i64)]) -> Self {
        ExifValue::RationalTuple(pairs.iter().copied().map(Rational::from).collect())
    }

    pub fn text(s: impl Into<String>) -> Self {
        ExifValue::Text(s.into())
    }

    /// Get value as f64 if it is a numeric scalar
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExifValue::Integer(v) => Some(*v as f64),
            ExifValue::Float(v) => Some(*v),
            ExifValue::Rational(r) => r.to_f64(),
            _ => None,
        }
    }

    /// Get value as a numeric sequence
    pub fn as_f64_seq(&self) -> Option<Vec<f64>> {
        match self {
            ExifValue::Floats(v) => Some(v.clone()),
            ExifValue::Integers(v) => Some(v.iter().map(|i| *i as f64).collect()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExifValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&TagMap> {
        match self {
            ExifValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Python-style truthiness: empty strings, sequences and maps count as missing
    pub fn is_empty(&self) -> bool {
        match self {
            ExifValue::Text(s) => s.is_empty(),
            ExifValue::RationalTuple(v) => v.is_empty(),
            ExifValue::Floats(v) => v.is_empty(),
            ExifValue::Integers(v) => v.is_empty(),
            ExifValue::Bytes(v) => v.is_empty(),
            ExifValue::Map(m) => m.is_empty(),
            _ => false,
        }
    }

    /// Get value as string for display
    pub fn as_string(&self) -> String {
        match self {
            ExifValue::Integer(v) => v.to_string(),
            ExifValue::Float(v) => format!("{:.4}", v),
            ExifValue::Text(s) => s.clone(),
            ExifValue::Rational(r) => format!("{}/{}", r.num, r.denom),
            ExifValue::RationalTuple(v) => {
                v.iter().map(|r| format!("{}/{}", r.num, r.denom)).collect::<Vec<_>>().join(", ")
            }
            ExifValue::Floats(v) => {
                v.iter().map(|f| format!("{:.6}", f)).collect::<Vec<_>>().join(", ")
            }
            ExifValue::Integers(v) => format!("{:?}", v),
            ExifValue::Bytes(v) => format!("{:?}", v),
            ExifValue::Map(m) => format!("{{{} tags}}", m.len()),
        }
    }
}

// =============================================================================
// Main IFD Tag IDs
// =============================================================================
// These are standard TIFF/EXIF tag numbers

pub const TAG_IMAGE_DESCRIPTION: u16 = 0x010E;
pub const TAG_IMAGE_WIDTH: u16 = 0x0100;
pub const TAG_IMAGE_HEIGHT: u16 = 0x0101;
pub const TAG_MAKE: u16 = 0x010F;
pub const TAG_MODEL: u16 = 0x0110;
pub const TAG_ORIENTATION: u16 = 0x0112;
pub const TAG_X_RESOLUTION: u16 = 0x011A;
pub const TAG_Y_RESOLUTION: u16 = 0x011B;
pub const TAG_RESOLUTION_UNIT: u16 = 0x0128;
pub const TAG_SOFTWARE: u16 = 0x0131;
pub const TAG_DATETIME: u16 = 0x0132;
pub const TAG_ARTIST: u16 = 0x013B;
pub const TAG_COPYRIGHT: u16 = 0x8298;
pub const TAG_EXIF_OFFSET: u16 = 0x8769;
pub const TAG_GPS_INFO: u16 = 0x8825;

pub const TAG_EXPOSURE_TIME: u16 = 0x829A;
pub const TAG_FNUMBER: u16 = 0x829D;
pub const TAG_EXPOSURE_PROGRAM: u16 = 0x8822;
pub const TAG_ISO: u16 = 0x8827;
pub const TAG_EXIF_VERSION: u16 = 0x9000;
pub const TAG_DATETIME_ORIGINAL: u16 = 0x9003;
pub const TAG_DATETIME_DIGITIZED: u16 = 0x9004;
pub const TAG_SHUTTER_SPEED: u16 = 0x9201;
pub const TAG_APERTURE: u16 = 0x9202;
pub const TAG_EXPOSURE_BIAS: u16 = 0x9204;
pub const TAG_SUBJECT_DISTANCE: u16 = 0x9206;
pub const TAG_METERING_MODE: u16 = 0x9207;
pub const TAG_FLASH: u16 = 0x9209;
pub const TAG_FOCAL_LENGTH: u16 = 0x920A;
pub const TAG_SUBSEC_TIME_ORIGINAL: u16 = 0x9291;
pub const TAG_COLOR_SPACE: u16 = 0xA001;
pub const TAG_PIXEL_X_DIMENSION: u16 = 0xA002;
pub const TAG_PIXEL_Y_DIMENSION: u16 = 0xA003;
pub const TAG_SCENE_TYPE: u16 = 0xA301;
pub const TAG_WHITE_BALANCE: u16 = 0xA403;
pub const TAG_DIGITAL_ZOOM_RATIO: u16 = 0xA404;
pub const TAG_FOCAL_LENGTH_35MM: u16 = 0xA405;
pub const TAG_CONTRAST: u16 = 0xA408;
pub const TAG_SATURATION: u16 = 0xA409;
pub const TAG_SHARPNESS: u16 = 0xA40A;

pub const TAG_LENS_MAKE: u16 = 0xA433;
pub const TAG_LENS_MODEL: u16 = 0xA434;

// Tags to exclude (thumbnails and large binary data)
pub const TAG_JPEG_INTERCHANGE_FORMAT: u16 = 0x0201;
pub const TAG_JPEG_INTERCHANGE_FORMAT_LENGTH: u16 = 0x0202;
pub const TAG_STRIP_OFFSETS: u16 = 0x0111;
pub const TAG_STRIP_BYTE_COUNTS: u16 = 0x0117;
pub const TAG_TILE_OFFSETS: u16 = 0x0144;
pub const TAG_TILE_BYTE_COUNTS: u16 = 0x0145;
pub const TAG_MAKER_NOTE: u16 = 0x927C;

// =============================================================================
// GPS IFD Tag IDs
// =============================================================================

pub const TAG_GPS_VERSION_ID: u16 = 0x0000;
pub const TAG_GPS_LATITUDE_REF: u16 = 0x0001;
pub const TAG_GPS_LATITUDE: u16 = 0x0002;
pub const TAG_GPS_LONGITUDE_REF: u16 = 0x0003;
pub const TAG_GPS_LONGITUDE: u16 = 0x0004;
pub const TAG_GPS_ALTITUDE_REF: u16 = 0x0005;
pub const TAG_GPS_ALTITUDE: u16 = 0x0006;
pub const TAG_GPS_TIMESTAMP: u16 = 0x0007;
pub const TAG_GPS_SATELLITES: u16 = 0x0008;
pub const TAG_GPS_STATUS: u16 = 0x0009;
pub const TAG_GPS_MEASURE_MODE: u16 = 0x000A;
pub const TAG_GPS_DOP: u16 = 0x000B;
pub const TAG_GPS_SPEED_REF: u16 = 0x000C;
pub const TAG_GPS_SPEED: u16 = 0x000D;
pub const TAG_GPS_TRACK_REF: u16 = 0x000E;
pub const TAG_GPS_TRACK: u16 = 0x000F;
pub const TAG_GPS_IMG_DIRECTION_REF: u16 = 0x0010;
pub const TAG_GPS_IMG_DIRECTION: u16 = 0x0011;
pub const TAG_GPS_MAP_DATUM: u16 = 0x0012;
pub const TAG_GPS_DEST_LATITUDE_REF: u16 = 0x0013;
pub const TAG_GPS_DEST_LATITUDE: u16 = 0x0014;
pub const TAG_GPS_DEST_LONGITUDE_REF: u16 = 0x0015;
pub const TAG_GPS_DEST_LONGITUDE: u16 = 0x0016;
pub const TAG_GPS_DEST_BEARING_REF: u16 = 0x0017;
pub const TAG_GPS_DEST_BEARING: u16 = 0x0018;
pub const TAG_GPS_DEST_DISTANCE_REF: u16 = 0x0019;
pub const TAG_GPS_DEST_DISTANCE: u16 = 0x001A;
pub const TAG_GPS_PROCESSING_METHOD: u16 = 0x001B;
pub const TAG_GPS_AREA_INFORMATION: u16 = 0x001C;
pub const TAG_GPS_DATESTAMP: u16 = 0x001D;
pub const TAG_GPS_DIFFERENTIAL: u16 = 0x001E;
pub const TAG_GPS_H_POSITIONING_ERROR: u16 = 0x001F;

/// Check if a tag should be excluded from storage
pub fn is_excluded_tag(tag_id: u16) -> bool {
    matches!(
        tag_id,
        TAG_JPEG_INTERCHANGE_FORMAT
            | TAG_JPEG_INTERCHANGE_FORMAT_LENGTH
            | TAG_STRIP_OFFSETS
            | TAG_STRIP_BYTE_COUNTS
            | TAG_TILE_OFFSETS
            | TAG_TILE_BYTE_COUNTS
            | TAG_MAKER_NOTE
    )
}

/// Lookup table signature shared by the main and GPS tables
pub type TagTable = fn(u16) -> Option<&'static str>;

/// Map main-IFD tag ID to human-readable name
pub fn tag_id_to_name(tag_id: u16) -> Option<&'static str> {
    Some(match tag_id {
        TAG_IMAGE_DESCRIPTION => "ImageDescription",
        TAG_IMAGE_WIDTH => "ImageWidth",
        TAG_IMAGE_HEIGHT => "ImageLength",
        TAG_MAKE => "Make",
        TAG_MODEL => "Model",
        TAG_ORIENTATION => "Orientation",
        TAG_X_RESOLUTION => "XResolution",
        TAG_Y_RESOLUTION => "YResolution",
        TAG_RESOLUTION_UNIT => "ResolutionUnit",
        TAG_SOFTWARE => "Software",
        TAG_DATETIME => "DateTime",
        TAG_ARTIST => "Artist",
        TAG_COPYRIGHT => "Copyright",
        TAG_EXIF_OFFSET => "ExifOffset",
        TAG_GPS_INFO => GPS_INFO_KEY,
        TAG_EXPOSURE_TIME => "ExposureTime",
        TAG_FNUMBER => "FNumber",
        TAG_EXPOSURE_PROGRAM => "ExposureProgram",
        TAG_ISO => "ISOSpeedRatings",
        TAG_EXIF_VERSION => "ExifVersion",
        TAG_DATETIME_ORIGINAL => "DateTimeOriginal",
        TAG_DATETIME_DIGITIZED => "DateTimeDigitized",
        TAG_SHUTTER_SPEED => "ShutterSpeedValue",
        TAG_APERTURE => "ApertureValue",
        TAG_EXPOSURE_BIAS => "ExposureBiasValue",
        TAG_SUBJECT_DISTANCE => "SubjectDistance",
        TAG_METERING_MODE => "MeteringMode",
        TAG_FLASH => "Flash",
        TAG_FOCAL_LENGTH => "FocalLength",
        TAG_SUBSEC_TIME_ORIGINAL => "SubsecTimeOriginal",
        TAG_COLOR_SPACE => "ColorSpace",
        TAG_PIXEL_X_DIMENSION => "ExifImageWidth",
        TAG_PIXEL_Y_DIMENSION => "ExifImageHeight",
        TAG_SCENE_TYPE => "SceneType",
        TAG_WHITE_BALANCE => "WhiteBalance",
        TAG_DIGITAL_ZOOM_RATIO => "DigitalZoomRatio",
        TAG_FOCAL_LENGTH_35MM => "FocalLengthIn35mmFilm",
        TAG_CONTRAST => "Contrast",
        TAG_SATURATION => "Saturation",
        TAG_SHARPNESS => "Sharpness",
        TAG_LENS_MAKE => "LensMake",
        TAG_LENS_MODEL => "LensModel",
        _ => return None,
    })
}

/// Map GPS-IFD tag ID to human-readable name
pub fn gps_tag_id_to_name(tag_id: u16) -> Option<&'static str> {
    Some(match tag_id {
        TAG_GPS_VERSION_ID => "GPSVersionID",
        TAG_GPS_LATITUDE_REF => "GPSLatitudeRef",
        TAG_GPS_LATITUDE => "GPSLatitude",
        TAG_GPS_LONGITUDE_REF => "GPSLongitudeRef",
        TAG_GPS_LONGITUDE => "GPSLongitude",
        TAG_GPS_ALTITUDE_REF => "GPSAltitudeRef",
        TAG_GPS_ALTITUDE => "GPSAltitude",
        TAG_GPS_TIMESTAMP => "GPSTimeStamp",
        TAG_GPS_SATELLITES => "GPSSatellites",
        TAG_GPS_STATUS => "GPSStatus",
        TAG_GPS_MEASURE_MODE => "GPSMeasureMode",
        TAG_GPS_DOP => "GPSDOP",
        TAG_GPS_SPEED_REF => "GPSSpeedRef",
        TAG_GPS_SPEED => "GPSSpeed",
        TAG_GPS_TRACK_REF => "GPSTrackRef",
        TAG_GPS_TRACK => "GPSTrack",
        TAG_GPS_IMG_DIRECTION_REF => "GPSImgDirectionRef",
        TAG_GPS_IMG_DIRECTION => "GPSImgDirection",
        TAG_GPS_MAP_DATUM => "GPSMapDatum",
        TAG_GPS_DEST_LATITUDE_REF => "GPSDestLatitudeRef",
        TAG_GPS_DEST_LATITUDE => "GPSDestLatitude",
        TAG_GPS_DEST_LONGITUDE_REF => "GPSDestLongitudeRef",
        TAG_GPS_DEST_LONGITUDE => "GPSDestLongitude",
        TAG_GPS_DEST_BEARING_REF => "GPSDestBearingRef",
        TAG_GPS_DEST_BEARING => "GPSDestBearing",
        TAG_GPS_DEST_DISTANCE_REF => "GPSDestDistanceRef",
        TAG_GPS_DEST_DISTANCE => "GPSDestDistance",
        TAG_GPS_PROCESSING_METHOD => "GPSProcessingMethod",
        TAG_GPS_AREA_INFORMATION => "GPSAreaInformation",
        TAG_GPS_DATESTAMP => "GPSDateStamp",
        TAG_GPS_DIFFERENTIAL => "GPSDifferential",
        TAG_GPS_H_POSITIONING_ERROR => "GPSHPositioningError",
        _ => return None,
    })
}
