//! Region geometry for figure extraction.
//!
//! Picture detections arrive as fragments; these helpers merge them into
//! connected clusters, pull in the heading that introduces a figure, and
//! pad the result inside the page bounds.

mod cluster;
mod header;
mod region;

pub use cluster::cluster;
pub use header::expand_with_header;
pub use region::{meets_min_size, pad};
