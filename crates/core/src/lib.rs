#![forbid(unsafe_code)]

pub mod access;
pub mod annotation;
pub mod locate;
pub mod metrics;
pub mod parse;
pub mod records;
pub mod schema;
pub mod table;

pub use table::{Cell, Row, Snapshot};
