// EXIF GPS extraction: decoded tag map in, typed GPS record out.

pub mod config;
pub mod coordinate;
pub mod error;
pub mod exif_extract;
pub mod exif_types;
pub mod extract;
pub mod gps_record;
pub mod rational;
pub mod scanner;
pub mod tag_resolver;

pub use error::GpsError;
pub use exif_types::{ExifValue, Rational, RawTagMap, ResolvedTagMap, TagKey, TagMap};
pub use extract::{exif_data, extract_gps};
pub use gps_record::NormalizedGpsRecord;
