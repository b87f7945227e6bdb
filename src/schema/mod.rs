//! Record schemas
//!
//! Every resource declares a fixed schema that travels with its record
//! stream. Schemas are JSON-Schema shaped with format hints for semantic
//! types (date-time, email, uri).

mod types;

pub use types::{JsonSchema, JsonType, SchemaProperty};
