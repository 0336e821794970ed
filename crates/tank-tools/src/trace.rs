#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use tank_core::TickContext;

/// One step of bot activity, recorded for later inspection.
///
/// `tag` names what happened (for example `dectree.branch`); `subject` is the index of
/// the node or object involved and `detail` an optional tag-specific value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub tag: Cow<'static, str>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub subject: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub detail: u64,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            tag: tag.into(),
            subject: 0,
            detail: 0,
        }
    }

    /// Event stamped with the tick of `ctx`.
    pub fn at(ctx: &TickContext, tag: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ctx.tick, tag)
    }

    pub fn subject(mut self, subject: u64) -> Self {
        self.subject = subject;
        self
    }

    pub fn detail(mut self, detail: u64) -> Self {
        self.detail = detail;
        self
    }

    pub fn flag(self, value: bool) -> Self {
        self.detail(u64::from(value))
    }
}

/// Destination for trace events.
pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn emit(&mut self, event: TraceEvent) {
        (**self).emit(event);
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Box<S> {
    fn emit(&mut self, event: TraceEvent) {
        (**self).emit(event);
    }
}

/// Discards everything; used when nobody is listening.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

/// Buffers events in memory, mostly for tests.
#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl VecTraceSink {
    pub fn tags(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.tag.as_ref()).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Full event history of a run, in emission order.
#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn for_tick(&self, tick: u64) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(move |e| e.tick == tick)
    }

    /// Number of events carrying `tag`.
    pub fn count(&self, tag: &str) -> usize {
        self.events.iter().filter(|e| e.tag == tag).count()
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
