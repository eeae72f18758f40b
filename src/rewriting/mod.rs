//! Circuit rewriting.
//!
//! This module contains the core of the optimizer: rule patterns, the
//! matching predicate with its commit/rollback protocol, the backtracking
//! search driver, replacement-graph construction and the best-first outer
//! loop.

pub mod frontier;
pub mod library;
pub mod matching;
pub mod optimizer;
pub mod pattern;
pub mod replace;
pub mod rule;
pub mod search;
pub mod template;
