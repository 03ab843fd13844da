//! Filesystem primitives applied by the pipeline.
pub mod link;
