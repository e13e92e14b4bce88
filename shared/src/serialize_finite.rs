use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

/// Serializer for serde with to write an `f64` as a JSON number, or `null` when the value is
/// NaN or infinite. Engine outputs carry NaN for "insufficient data" and callers must never
/// see it as a number.
/// This function is not used directly but rather from struct fields with a serde with attribute
/// pointing to this module
///
/// # Arguments
///
/// * 'value' - the float to write
/// * 'serializer' - serializer given from serde
pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() {
        value.serialize(serializer)
    } else {
        serializer.serialize_none()
    }
}

/// Reads back what `serialize` wrote, turning `null` into NaN
pub fn deserialize<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
}
