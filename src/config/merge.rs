//! Source precedence for layered configuration.

pub mod merge_policy;
