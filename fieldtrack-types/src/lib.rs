//! Core identity types for fieldtrack.
//!
//! - [`RecordKey`]: identity of one live record instance in the host runtime
//! - [`RecordRef`]: identifier + type name of a related record
//!
//! Both are plain values; the tracker never owns host records, it only keys
//! its snapshot state by [`RecordKey`] and serializes relations from
//! [`RecordRef`]s.

mod ids;

pub use ids::{RecordKey, RecordRef};
