use std::fmt;

use serde::Serialize;

/// Serialize `value` to compact JSON, falling back to its `Debug` form.
///
/// Never fails and never returns an empty string: if the `Debug` output is
/// empty too, the type name is returned instead.
pub fn to_json_string<T>(value: &T) -> String
where
    T: Serialize + fmt::Debug + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(text) => text,
        Err(error) => {
            let type_name = std::any::type_name::<T>();
            tracing::debug!(type_name, %error, "json encoding failed, using debug form");
            debug_text(&value, type_name)
        }
    }
}

/// `Debug` form of `value`, or `type_name` when that is empty.
pub fn debug_text(value: &dyn fmt::Debug, type_name: &str) -> String {
    let text = format!("{value:?}");
    if text.is_empty() {
        type_name.to_string()
    } else {
        text
    }
}

/// Object-safe view of [`to_json_string`], used to hold heterogeneous
/// arguments behind one reference type.
pub trait ToJsonString {
    fn to_json_string(&self) -> String;
}

impl<T: Serialize + fmt::Debug> ToJsonString for T {
    fn to_json_string(&self) -> String {
        to_json_string(self)
    }
}
