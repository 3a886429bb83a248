//! # cwlq
//!
//! Query engine for Common Workflow Language (CWL) documents: navigate a
//! parsed tool or workflow description with a small path-expression
//! language and resolve derived values (declared field names, output file
//! locations) from that navigation.
//!
//! The path language addresses values with dotted segments: `.` is the
//! document root, an integer segment indexes a list, and a name segment
//! names a record field or the id basename of an element in an
//! identifier-addressable list. Three query functions wrap around it:
//! `keys(...)`, `commandline`/`commandline(...)`, and `ls(...)`.

pub mod env;
pub mod error;
pub mod expr;
pub mod inspect;
pub mod parser;
pub mod serialize;
pub mod tree;

pub use env::{Environment, RuntimeDirs};
pub use error::{CwlError, Unimplemented};
pub use inspect::{inspect, Inspection, Location};
pub use parser::{load_document, parse};
pub use serialize::save;
pub use tree::{Document, Record, RecordList, Value};
