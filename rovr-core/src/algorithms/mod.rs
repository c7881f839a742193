//! A collection of reusable algorithms without direct dependency on the solve pipeline.

pub mod validation;
