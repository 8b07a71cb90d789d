//! Plugin enumeration probe: one signal per installed plugin, in order

use bp_protocol::Signal;

use super::{Probe, ProbeOutcome};
use crate::constants::keys;
use crate::env::Environment;

#[derive(Debug, Default, Clone, Copy)]
pub struct PluginProbe;

impl Probe for PluginProbe {
    fn name(&self) -> &'static str {
        "plugins"
    }

    fn collect(&self, env: &dyn Environment) -> ProbeOutcome {
        let signals = env
            .plugins()
            .into_iter()
            .enumerate()
            .map(|(index, name)| Signal::new(keys::navigator_plugin(index), name))
            .collect();
        ProbeOutcome::Collected(signals)
    }
}
