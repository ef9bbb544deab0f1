use std::sync::Arc;
use std::time::Instant;

/// A request-scoped value carrying cancellation and deadline signals.
///
/// Arguments implementing this trait are never serialized into an annotation;
/// they render as [`SCOPE_PLACEHOLDER`](crate::SCOPE_PLACEHOLDER).
pub trait CancelScope {
    fn is_cancelled(&self) -> bool;

    fn deadline(&self) -> Option<Instant> {
        None
    }
}

impl<S: CancelScope + ?Sized> CancelScope for &S {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }

    fn deadline(&self) -> Option<Instant> {
        (**self).deadline()
    }
}

impl<S: CancelScope + ?Sized> CancelScope for Box<S> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }

    fn deadline(&self) -> Option<Instant> {
        (**self).deadline()
    }
}

impl<S: CancelScope + ?Sized> CancelScope for Arc<S> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }

    fn deadline(&self) -> Option<Instant> {
        (**self).deadline()
    }
}

// Autoref dispatch for `wrap!`. The macro calls
// `(&&&Probe(&arg)).beterr_arg_kind()` and method lookup peels one reference
// per step: `ScopeKind` sits on `&&Probe`, `ValueKind` on `&Probe` and
// `DebugKind` on `Probe`, so the first tier the argument satisfies wins.
#[doc(hidden)]
pub mod kind {
    use std::fmt;

    use serde::Serialize;

    use super::CancelScope;
    use crate::wrap::Arg;

    pub struct Probe<'a, T>(pub &'a T);

    pub struct ScopeTag;
    pub struct ValueTag;
    pub struct DebugTag;

    pub trait ScopeKind {
        #[inline]
        fn beterr_arg_kind(&self) -> ScopeTag {
            ScopeTag
        }
    }

    impl<S: CancelScope> ScopeKind for &&Probe<'_, S> {}

    pub trait ValueKind {
        #[inline]
        fn beterr_arg_kind(&self) -> ValueTag {
            ValueTag
        }
    }

    impl<T: Serialize + fmt::Debug> ValueKind for &Probe<'_, T> {}

    pub trait DebugKind {
        #[inline]
        fn beterr_arg_kind(&self) -> DebugTag {
            DebugTag
        }
    }

    impl<T: fmt::Debug> DebugKind for Probe<'_, T> {}

    impl ScopeTag {
        #[inline]
        pub fn into_arg<'a, S: CancelScope + 'a>(self, scope: &'a S) -> Arg<'a> {
            Arg::Scope(scope)
        }
    }

    impl ValueTag {
        #[inline]
        pub fn into_arg<'a, T: Serialize + fmt::Debug + 'a>(self, value: &'a T) -> Arg<'a> {
            Arg::Value(value)
        }
    }

    impl DebugTag {
        #[inline]
        pub fn into_arg<'a, T: fmt::Debug + 'a>(self, value: &'a T) -> Arg<'a> {
            Arg::debug(value)
        }
    }
}
