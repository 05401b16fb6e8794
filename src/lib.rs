//! Schema Models
//!
//! Generates statically typed model definitions from a directory of JSON
//! Schema documents.
//!
//! ## Pipeline
//!
//! ```text
//! schemas/*.json ──► Registry::ingest ──► Registry (objects, aliases, models)
//!                                              │
//!                          ModelEmitter::render_all (Go | Rust)
//!                                              │
//!                          SourceFormatter (gofmt | rustfmt)
//!                                              │
//!                          output::write_unit ──► <out>/<Model>.go
//! ```
//!
//! ## Type mapping
//!
//! | schema                              | Go            | Rust                       |
//! |-------------------------------------|---------------|----------------------------|
//! | `string`                            | `string`      | `String`                   |
//! | `string` + `int64` / `uint64`       | `int64,string`| `i64` via `DisplayFromStr` |
//! | `boolean`                           | `bool`        | `bool`                     |
//! | `array` of object                   | `[]Item`      | `Vec<Item>`                |
//! | `object`                            | `Nested`      | `Nested`                   |
//! | anything else                       | `interface{}` | `serde_json::Value`        |

pub mod checksum;
pub mod codegen;
pub mod config;
pub mod error;
pub mod format;
pub mod generator;
pub mod loader;
pub mod output;
pub mod registry;
pub mod schema;

pub use checksum::Checksum;
pub use codegen::{
    FieldDecl, FieldOrder, FieldType, GeneratedUnit, Language, ModelEmitter, RenderProfile,
    RenderReport, ResolvedModel,
};
pub use config::{GeneratorConfig, ParseErrorPolicy};
pub use error::{GenError, Result};
pub use format::{ExternalFormatter, Passthrough, SourceFormatter};
pub use generator::{GenerationSummary, ModelGenerator};
pub use loader::SchemaFile;
pub use registry::Registry;
pub use schema::{Object, ObjectRef, Property, PropertyKind};
