//! Output sinks
//!
//! A sink receives a finished [`Collection`]. Sinks run strictly after
//! collection, so a failing or missing output target cannot affect what was
//! collected.

use tracing::warn;

use crate::error::Result;
use crate::pipeline::Collection;

pub trait OutputSink {
    fn name(&self) -> &str;

    fn consume(&mut self, collection: &Collection) -> Result<()>;
}

/// Hand `collection` to every sink. Sink failures are logged and counted,
/// never propagated.
pub fn deliver(collection: &Collection, sinks: &mut [Box<dyn OutputSink>]) -> usize {
    let mut failures = 0;
    for sink in sinks.iter_mut() {
        if let Err(e) = sink.consume(collection) {
            warn!(sink = sink.name(), error = %e, "Output sink failed");
            failures += 1;
        }
    }
    failures
}
