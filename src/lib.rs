#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod caller;
pub mod error;
pub mod json;
pub mod scope;
pub mod types;
pub mod wrap;

#[doc(hidden)]
pub use scope::kind as __private;

pub use caller::{UNKNOWN_CALLER, qualified_name};
pub use error::{Error, WrapError};
pub use json::{ToJsonString, to_json_string};
pub use scope::CancelScope;
pub use types::{Inner, MAX_DEPTH, Record};
pub use wrap::{Arg, NIL_ERR, ResultExt, SCOPE_PLACEHOLDER, Wrap};
