//! Recursive map merge shared by the composite and context providers.

use serde_json::Value;

use super::DataMap;

/// Merges `dst` over `src` and returns a fresh map.
///
/// Keys found only on one side are copied as they are. When both sides hold a
/// key and both values are maps, the maps are merged recursively; any other
/// conflict is won by `dst` outright, so lists are replaced and never
/// concatenated. Neither input is modified.
pub fn deep_merge(src: &DataMap, dst: &DataMap) -> DataMap {
    let mut merged = src.clone();
    for (key, dst_value) in dst {
        let value = match (merged.get(key), dst_value) {
            (Some(Value::Object(src_map)), Value::Object(dst_map)) => {
                Value::Object(deep_merge(src_map, dst_map))
            }
            _ => dst_value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

/// Folds `deep_merge` left to right; later maps win.
pub fn merge_all<'a, I>(maps: I) -> DataMap
where
    I: IntoIterator<Item = &'a DataMap>,
{
    maps.into_iter()
        .fold(DataMap::new(), |acc, next| deep_merge(&acc, next))
}
