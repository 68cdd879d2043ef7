// src/tag_resolver.rs
//
// Replaces numeric tag IDs with their names. The GPS block is resolved with
// its own table and nested under "GPSInfo".

use crate::exif_types::{
    ExifValue, GPS_INFO_KEY, RawTagMap, ResolvedTagMap, TAG_GPS_INFO, TagKey, TagMap, TagTable,
    gps_tag_id_to_name, tag_id_to_name,
};

/// Resolve a single key. Keys unknown to `table` (and string keys) pass through unchanged.
fn resolve_key(key: &TagKey, table: TagTable) -> TagKey {
    match key {
        TagKey::Id(id) => table(*id).map(TagKey::name).unwrap_or_else(|| key.clone()),
        TagKey::Name(_) => key.clone(),
    }
}

fn is_gps_block_key(key: &TagKey) -> bool {
    match key {
        TagKey::Id(id) => *id == TAG_GPS_INFO,
        TagKey::Name(name) => name == GPS_INFO_KEY,
    }
}

/// Resolve every key of `raw` through `table`, without touching nested maps.
pub fn resolve_with(raw: &TagMap, table: TagTable) -> TagMap {
    raw.iter().map(|(k, v)| (resolve_key(k, table), v.clone())).collect()
}

/// Resolve a top-level decoder mapping; the GPS sub-mapping is resolved
/// recursively with the GPS table.
pub fn resolve_tags(raw: &RawTagMap) -> ResolvedTagMap {
    let mut resolved = ResolvedTagMap::new();

    for (key, value) in raw {
        if is_gps_block_key(key) {
            let gps = match value {
                ExifValue::Map(sub) => ExifValue::Map(resolve_with(sub, gps_tag_id_to_name)),
                // e.g. a bare IFD offset from a decoder that did not follow the pointer
                other => {
                    log::debug!("GPS block is not a sub-mapping: {:?}", other);
                    other.clone()
                }
            };
            resolved.insert(TagKey::name(GPS_INFO_KEY), gps);
        } else {
            resolved.insert(resolve_key(key, tag_id_to_name), value.clone());
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif_types::{TAG_GPS_LATITUDE, TAG_GPS_LATITUDE_REF, TAG_MAKE};

    #[test]
    fn test_empty_map() {
        assert!(resolve_tags(&RawTagMap::new()).is_empty());
    }

    #[test]
    fn test_known_and_unknown_keys() {
        let mut raw = RawTagMap::new();
        raw.insert(TagKey::Id(TAG_MAKE), ExifValue::text("Canon"));
        raw.insert(TagKey::Id(0xBEEF), ExifValue::Integer(7));
        raw.insert(TagKey::name("Custom"), ExifValue::Integer(1));

        let resolved = resolve_tags(&raw);
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved.get(&TagKey::name("Make")), Some(&ExifValue::text("Canon")));
        assert_eq!(resolved.get(&TagKey::Id(0xBEEF)), Some(&ExifValue::Integer(7)));
        assert_eq!(resolved.get(&TagKey::name("Custom")), Some(&ExifValue::Integer(1)));
    }

    #[test]
    fn test_gps_block_uses_gps_table() {
        let mut gps = TagMap::new();
        gps.insert(TagKey::Id(TAG_GPS_LATITUDE_REF), ExifValue::text("N"));
        gps.insert(TagKey::Id(TAG_GPS_LATITUDE), ExifValue::rationals(&[(1, 1), (2, 1), (3, 1)]));
        gps.insert(TagKey::Id(0x00FF), ExifValue::Integer(0));

        let mut raw = RawTagMap::new();
        raw.insert(TagKey::Id(TAG_GPS_INFO), ExifValue::Map(gps));

        let resolved = resolve_tags(&raw);
        let gps = resolved.get(&TagKey::name(GPS_INFO_KEY)).and_then(|v| v.as_map()).unwrap();
        assert_eq!(gps.get(&TagKey::name("GPSLatitudeRef")), Some(&ExifValue::text("N")));
        assert!(gps.contains_key(&TagKey::name("GPSLatitude")));
        assert!(gps.contains_key(&TagKey::Id(0x00FF)));
        assert_eq!(gps.len(), 3);
    }

    #[test]
    fn test_gps_block_already_named() {
        let mut gps = TagMap::new();
        gps.insert(TagKey::Id(TAG_GPS_LATITUDE_REF), ExifValue::text("S"));
        let mut raw = RawTagMap::new();
        raw.insert(TagKey::name(GPS_INFO_KEY), ExifValue::Map(gps));

        let resolved = resolve_tags(&raw);
        let gps = resolved[&TagKey::name(GPS_INFO_KEY)].as_map().unwrap();
        assert_eq!(gps.get(&TagKey::name("GPSLatitudeRef")), Some(&ExifValue::text("S")));
    }

    #[test]
    fn test_input_untouched() {
        let mut raw = RawTagMap::new();
        raw.insert(TagKey::Id(TAG_MAKE), ExifValue::text("Nikon"));
        let before = raw.clone();
        let _ = resolve_tags(&raw);
        assert_eq!(raw, before);
    }
}
