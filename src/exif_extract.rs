// src/exif_extract.rs
//
// Decoder boundary: reads EXIF containers with kamadak-exif and converts them
// into the tag-id keyed RawTagMap consumed by the extraction pipeline.
// Filters out thumbnails and large binary blobs. No normalization happens here.

use crate::exif_types::{
    ExifValue, MAX_TAG_SIZE, RawTagMap, Rational, TAG_GPS_INFO, TagKey, TagMap, is_excluded_tag,
};
use crate::extract::extract_gps;
use crate::gps_record::NormalizedGpsRecord;
use anyhow::{Context as _, Result};
use exif::{Context, In, Value};
use std::path::Path;

/// Read EXIF data from a file path or preloaded bytes.
/// `Ok(None)` means the container simply carries no EXIF segment.
pub fn read_exif_data(path: &Path, preloaded_bytes: Option<&[u8]>) -> Result<Option<exif::Exif>> {
    trait BufReadSeek: std::io::BufRead + std::io::Seek {}
    impl<T: std::io::BufRead + std::io::Seek> BufReadSeek for T {}

    let mut reader: Box<dyn BufReadSeek> = match preloaded_bytes {
        Some(bytes) => Box::new(std::io::Cursor::new(bytes)),
        None => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("cannot open {}", path.display()))?;
            Box::new(std::io::BufReader::new(file))
        }
    };

    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(Some(exif)),
        Err(exif::Error::NotFound(_)) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("cannot parse EXIF in {}", path.display())),
    }
}

/// Collapse a single-element vector into a scalar, else keep the sequence
fn ints<T: Copy + Into<i64>>(v: &[T]) -> Option<ExifValue> {
    match v {
        [] => None,
        [one] => Some(ExifValue::Integer((*one).into())),
        many if many.len() <= MAX_TAG_SIZE / 2 => {
            Some(ExifValue::Integers(many.iter().map(|x| (*x).into()).collect()))
        }
        _ => None,
    }
}

fn rationals(v: impl Iterator<Item = Rational>) -> Option<ExifValue> {
    let mut rats: Vec<Rational> = v.collect();
    match rats.len() {
        0 => None,
        1 => rats.pop().map(ExifValue::Rational),
        _ => Some(ExifValue::RationalTuple(rats)),
    }
}

fn floats(v: impl Iterator<Item = f64>) -> Option<ExifValue> {
    let mut vals: Vec<f64> = v.collect();
    match vals.len() {
        0 => None,
        1 => vals.pop().map(ExifValue::Float),
        _ => Some(ExifValue::Floats(vals)),
    }
}

/// Convert a kamadak-exif value into the tagged union. `None` drops the field.
pub fn convert_value(value: &Value) -> Option<ExifValue> {
    match value {
        Value::Byte(v) => {
            if v.len() == 1 {
                Some(ExifValue::Integer(v[0].into()))
            } else if v.len() <= MAX_TAG_SIZE {
                Some(ExifValue::Bytes(v.clone()))
            } else {
                None
            }
        }
        Value::SByte(v) => ints(v),
        Value::Short(v) => ints(v),
        Value::SShort(v) => ints(v),
        Value::Long(v) => ints(v),
        Value::SLong(v) => ints(v),

        Value::Rational(v) => rationals(v.iter().map(|r| Rational::new(r.num.into(), r.denom.into()))),
        Value::SRational(v) => {
            rationals(v.iter().map(|r| Rational::new(r.num.into(), r.denom.into())))
        }

        Value::Float(v) => floats(v.iter().map(|f| (*f).into())),
        Value::Double(v) => floats(v.iter().copied()),

        Value::Ascii(v) => {
            // Concatenate all ASCII strings, clean null bytes
            let s: String = v
                .iter()
                .filter_map(|bytes| std::str::from_utf8(bytes).ok())
                .collect::<Vec<_>>()
                .join("")
                .replace('\0', "")
                .trim()
                .to_string();

            if s.len() > MAX_TAG_SIZE {
                return None;
            }
            Some(ExifValue::Text(s))
        }

        Value::Undefined(bytes, _) => {
            // Skip large undefined blobs (MakerNotes, etc.)
            if bytes.len() > MAX_TAG_SIZE {
                return None;
            }
            // Try to interpret as string first
            match std::str::from_utf8(bytes) {
                Ok(s) if !s.trim().replace('\0', "").is_empty() => {
                    Some(ExifValue::Text(s.replace('\0', "").trim().to_string()))
                }
                _ if bytes.len() <= 64 => Some(ExifValue::Bytes(bytes.clone())),
                _ => None,
            }
        }

        _ => None,
    }
}

/// Build the decoder mapping from primary-IFD fields. GPS-IFD fields are
/// gathered into a nested map under the GPSInfo tag ID.
pub fn raw_tag_map(exif_data: &exif::Exif) -> RawTagMap {
    let mut map = RawTagMap::new();
    let mut gps = TagMap::new();

    for field in exif_data.fields() {
        // Skip thumbnail IFD entirely
        if field.ifd_num != In::PRIMARY {
            continue;
        }

        let tag_id = field.tag.number();
        let context = field.tag.context();

        // The GPS IFD pointer itself is an offset, replaced by the nested map below
        if context == Context::Tiff && tag_id == TAG_GPS_INFO {
            continue;
        }
        if is_excluded_tag(tag_id) && context != Context::Gps {
            continue;
        }

        let Some(value) = convert_value(&field.value) else {
            log::trace!("dropping tag 0x{:04X} ({:?})", tag_id, field.tag);
            continue;
        };

        match context {
            Context::Gps => {
                gps.insert(TagKey::Id(tag_id), value);
            }
            Context::Tiff | Context::Exif => {
                map.insert(TagKey::Id(tag_id), value);
            }
            // Interop IDs collide with GPS IDs and carry nothing we use
            _ => {}
        }
    }

    if !gps.is_empty() {
        map.insert(TagKey::Id(TAG_GPS_INFO), ExifValue::Map(gps));
    }
    map
}

/// Read one image and run the full extraction pipeline.
/// An image without EXIF yields an empty record.
pub fn extract_from_path(path: &Path) -> Result<NormalizedGpsRecord> {
    let Some(exif_data) = read_exif_data(path, None)? else {
        log::debug!("no EXIF data in {}", path.display());
        return Ok(NormalizedGpsRecord::default());
    };
    let raw = raw_tag_map(&exif_data);
    let record = extract_gps(&raw).with_context(|| format!("bad GPS data in {}", path.display()))?;
    Ok(record)
}
