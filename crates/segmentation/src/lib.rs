//! Rule-based segmentation — evaluates customer membership against
//! user-authored rule clauses and resolves full audiences.

pub mod builder;
pub mod resolver;
pub mod rules;

pub use builder::{Segment, SegmentBuilder};
pub use resolver::resolve_audience;
pub use rules::{evaluate, validate_clauses};
