//! The prelude: `use switchyard::prelude::*;` brings the request accessors into scope.

pub use crate::ext::RequestExt;
