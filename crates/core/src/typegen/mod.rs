//! JSON sample to TypeScript declaration generator.
//!
//! The pipeline mirrors a small compiler:
//! 1. Infer: sample `serde_json::Value` -> `TsModule` (named declarations)
//! 2. Emit: `TsModule` -> declaration text via the `Emit` trait
//!
//! The output is what the merge engine consumes: `export interface` and
//! `export type` blocks, root declaration first.

mod emit;
mod infer;
mod types;
pub mod utils;

pub use emit::Emit;
pub use infer::{generate_endpoint_declarations, generate_type_declarations, infer_module};
pub use types::{TsModule, TsPrimitive, TsProp, TsType, TsTypeDef, TypeDefKind};
