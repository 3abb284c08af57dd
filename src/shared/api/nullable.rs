use serde::{Deserialize, Deserializer};

/// Tells an absent field apart from an explicit `null` in a PATCH body.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`:
/// missing → `None`, `null` → `Some(None)`, a value → `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
