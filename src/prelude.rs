//! The prelude brings the request extension methods into scope.
//!
//! ```
//! use segroute::prelude::*;
//! ```

pub use crate::ext::RequestExt;
