use std::fmt;
use std::panic::Location;

use serde::Serialize;

use crate::caller;
use crate::error::{Error, WrapError};
use crate::json::{ToJsonString, debug_text, to_json_string};
use crate::scope::CancelScope;
use crate::types::{Inner, MAX_DEPTH, Record};

/// Inner text recorded when `e` is called without an error.
pub const NIL_ERR: &str = "nil err";

/// Text recorded in place of a [`CancelScope`] argument.
pub const SCOPE_PLACEHOLDER: &str = "ctx";

/// A borrowed argument attached to a future annotation.
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    Value(&'a dyn ToJsonString),
    /// A value with no `Serialize` impl, recorded in its `Debug` form.
    Debug {
        value: &'a dyn fmt::Debug,
        type_name: &'static str,
    },
    Scope(&'a dyn CancelScope),
}

impl<'a> Arg<'a> {
    pub fn value<T: Serialize + fmt::Debug>(value: &'a T) -> Self {
        Self::Value(value)
    }

    pub fn debug<T: fmt::Debug>(value: &'a T) -> Self {
        Self::Debug {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn scope<S: CancelScope>(scope: &'a S) -> Self {
        Self::Scope(scope)
    }

    /// Text stored in the record's `args` list.
    pub fn render(&self) -> String {
        match self {
            Self::Value(value) => value.to_json_string(),
            Self::Debug { value, type_name } => debug_text(*value, type_name),
            Self::Scope(_) => SCOPE_PLACEHOLDER.to_string(),
        }
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(&value.to_json_string()).finish(),
            Self::Debug { .. } => f.debug_tuple("Debug").field(&self.render()).finish(),
            Self::Scope(_) => f.write_str("Scope"),
        }
    }
}

/// Arguments captured at a call site, rendered into an error only on failure.
///
/// ```
/// use beterr::{ResultExt, wrap};
///
/// fn load(user_id: u64) -> Result<String, beterr::WrapError> {
///     let w = wrap!(user_id);
///     std::fs::read_to_string("/nonexistent").wrap_err(&w, &["read", "profile"])
/// }
///
/// let err = load(7).unwrap_err();
/// assert_eq!(err.record().args, ["7"]);
/// assert_eq!(err.record().msg, "read profile");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Wrap<'a> {
    args: Vec<Arg<'a>>,
    function: Option<&'static str>,
}

impl<'a> Wrap<'a> {
    pub fn new(args: Vec<Arg<'a>>) -> Self {
        Self {
            args,
            function: None,
        }
    }

    /// Record the qualified path of the function that owns this context.
    pub fn in_function(mut self, path: &'static str) -> Self {
        self.function = Some(path);
        self
    }

    pub fn args(&self) -> &[Arg<'a>] {
        &self.args
    }

    pub fn function(&self) -> Option<&'static str> {
        self.function
    }

    /// Annotate `err` with this context and the space-joined `msg` parts.
    ///
    /// If `err` displays as a record produced by an earlier `e`, it is nested
    /// instead of being kept as text.
    #[track_caller]
    pub fn e(&self, err: Option<&dyn fmt::Display>, msg: &[&str]) -> WrapError {
        let location = Location::caller();
        let inner_text = err.map_or_else(|| NIL_ERR.to_string(), |err| err.to_string());
        let inner = match Record::parse(&inner_text) {
            Ok(prev) => Inner::Record(Box::new(prev)),
            Err(Error::TooDeep { depth }) => {
                tracing::debug!(
                    depth,
                    max = MAX_DEPTH,
                    "record chain too deep, keeping inner as text"
                );
                Inner::Text(inner_text)
            }
            Err(_) => Inner::Text(inner_text),
        };

        let record = Record {
            fn_name: caller::qualified_name(self.function, Some(location)),
            args: self.args.iter().map(Arg::render).collect(),
            msg: msg.join(" "),
            inner,
        };
        WrapError::new(to_json_string(&record), record)
    }
}

/// Build a [`Wrap`] from borrowed arguments, tagging it with the enclosing
/// function path.
///
/// Each argument is rendered by the first rule it satisfies:
///
/// 1. [`CancelScope`]: the placeholder `"ctx"`;
/// 2. `Serialize + Debug`: [`to_json_string`](crate::to_json_string);
/// 3. `Debug` only: its `Debug` text.
///
/// Arguments are borrowed for as long as the returned [`Wrap`] lives, so only
/// places are accepted: locals, fields, statics or constants. Bind computed
/// values first.
///
/// ```compile_fail
/// let id = 1_u64;
/// let w = beterr::wrap!(id + 1);
/// let _ = w.e(None, &[]);
/// ```
///
/// ```
/// let id = 1_u64;
/// let next = id + 1;
/// let w = beterr::wrap!(next);
/// assert_eq!(w.e(None, &[]).record().args, ["2"]);
/// ```
#[macro_export]
macro_rules! wrap {
    ($($arg:expr),* $(,)?) => {
        $crate::Wrap::new(::std::vec![$({
            #[allow(unused_imports, reason = "only one dispatch trait applies per argument")]
            use $crate::__private::{DebugKind as _, ScopeKind as _, ValueKind as _};
            let arg = &$arg;
            (&&&$crate::__private::Probe(arg)).beterr_arg_kind().into_arg(arg)
        }),*])
        .in_function($crate::function_path!())
    };
}

pub trait ResultExt<T> {
    /// Replace the error with an annotation built from `w` and `msg`.
    fn wrap_err(self, w: &Wrap<'_>, msg: &[&str]) -> Result<T, WrapError>;
}

impl<T, E: fmt::Display> ResultExt<T> for Result<T, E> {
    #[track_caller]
    fn wrap_err(self, w: &Wrap<'_>, msg: &[&str]) -> Result<T, WrapError> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(w.e(Some(&err), msg)),
        }
    }
}
