//! Tooling primitives for the tank bot.
//!
//! Engine-agnostic and lightweight; rendering of traces belongs in whatever tool
//! consumes them.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink};
