//! Generation pipeline behind `go-gen`: sample JSON in, `types.ts` and
//! `api.ts` out, merged incrementally into an existing output directory.

pub mod error;
pub mod fetch;
pub mod merge;
pub mod naming;
pub mod openapi;
pub mod path_guard;
pub mod request_fn;
pub mod typegen;
pub mod writer;

pub use error::{GenError, Result};
pub use request_fn::HttpMethod;
pub use writer::{WriteOutcome, WriteRequest, write_files};
