use std::panic::Location;

/// Fallback caller name when neither a function path nor a location is known.
pub const UNKNOWN_CALLER: &str = "unknown";

const PROBE_SUFFIX: &str = "::__beterr_probe";
const CLOSURE_SEGMENT: &str = "::{{closure}}";

/// Qualified path of the enclosing function, e.g. `my_app::db::load_user`.
///
/// Closures report the named function that contains them.
#[macro_export]
macro_rules! function_path {
    () => {{
        fn __beterr_probe() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::caller::trim_function_path(type_name_of(__beterr_probe))
    }};
}

/// Strip the probe item and any closure segments from a `type_name` path.
pub fn trim_function_path(raw: &str) -> &str {
    let mut path = raw.strip_suffix(PROBE_SUFFIX).unwrap_or(raw);
    while let Some(stripped) = path.strip_suffix(CLOSURE_SEGMENT) {
        path = stripped;
    }
    path
}

/// Resolve the `fn_name` recorded in an annotation.
///
/// A non-empty function path wins; otherwise the call location is rendered as
/// `file:line:column`.
pub fn qualified_name(function: Option<&str>, location: Option<&Location<'_>>) -> String {
    match (function.filter(|f| !f.is_empty()), location) {
        (Some(function), _) => function.to_string(),
        (None, Some(loc)) => format!("{}:{}:{}", loc.file(), loc.line(), loc.column()),
        (None, None) => UNKNOWN_CALLER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_path_names_enclosing_fn() {
        let path = crate::function_path!();
        assert_eq!(path, "beterr::caller::tests::function_path_names_enclosing_fn");
    }

    #[test]
    fn function_path_skips_closures() {
        let probe = || crate::function_path!();
        let path = probe();
        assert_eq!(path, "beterr::caller::tests::function_path_skips_closures");
    }

    #[test]
    fn trim_leaves_foreign_paths_alone() {
        assert_eq!(trim_function_path("a::b::c"), "a::b::c");
        assert_eq!(
            trim_function_path("a::b::{{closure}}::{{closure}}::__beterr_probe"),
            "a::b"
        );
    }

    #[test]
    fn qualified_name_prefers_function() {
        let loc = Location::caller();
        assert_eq!(qualified_name(Some("app::run"), Some(loc)), "app::run");
    }

    #[test]
    fn qualified_name_falls_back_to_location() {
        let loc = Location::caller();
        let name = qualified_name(None, Some(loc));
        assert!(name.starts_with("src/caller.rs:") || name.starts_with("src\\caller.rs:"));
        assert_eq!(qualified_name(Some(""), Some(loc)), name);
    }

    #[test]
    fn qualified_name_unknown_without_sources() {
        assert_eq!(qualified_name(None, None), UNKNOWN_CALLER);
    }
}
