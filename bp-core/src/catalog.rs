//! Probe catalog
//!
//! The execution order of the catalog is the order of the record, and the
//! digest is positional, so the order here is part of the output contract.
//! Any change to the standard catalog must bump `constants::catalog::VERSION`.

use crate::constants;
use crate::probe::{
    AudioProbe, CanvasProbe, CookieProbe, FontProbe, NavigatorProbe, OptionalDescriptorProbe,
    PlatformProbe, PluginProbe, Probe, ScreenProbe, StorageProbe, TimezoneProbe, TouchProbe,
    WebGlProbe,
};

pub struct ProbeCatalog {
    version: u32,
    probes: Vec<Box<dyn Probe>>,
}

impl ProbeCatalog {
    /// The standard catalog, in its versioned order
    pub fn standard() -> Self {
        let probes: Vec<Box<dyn Probe>> = vec![
            Box::new(CanvasProbe),
            Box::new(NavigatorProbe),
            Box::new(ScreenProbe),
            Box::new(TimezoneProbe),
            Box::new(StorageProbe),
            Box::new(PlatformProbe),
            Box::new(FontProbe),
            Box::new(OptionalDescriptorProbe),
            Box::new(TouchProbe),
            Box::new(PluginProbe),
            Box::new(CookieProbe),
            Box::new(WebGlProbe),
            Box::new(AudioProbe),
        ];
        Self {
            version: constants::catalog::VERSION,
            probes,
        }
    }

    /// An empty catalog for custom probe sets
    pub fn custom(version: u32) -> Self {
        Self {
            version,
            probes: Vec::new(),
        }
    }

    pub fn with_probe(mut self, probe: impl Probe + 'static) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    pub fn push(&mut self, probe: Box<dyn Probe>) {
        self.probes.push(probe);
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Probe> {
        self.probes.iter().map(|p| p.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|p| p.name()).collect()
    }
}

impl Default for ProbeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ProbeCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeCatalog")
            .field("version", &self.version)
            .field("probes", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order() {
        let catalog = ProbeCatalog::standard();
        assert_eq!(catalog.version(), constants::catalog::VERSION);
        assert_eq!(
            catalog.names(),
            vec![
                "canvas",
                "navigator",
                "screen",
                "timezone",
                "storage",
                "platform",
                "font",
                "optional_descriptors",
                "touch",
                "plugins",
                "cookies",
                "webgl",
                "audio",
            ]
        );
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = ProbeCatalog::custom(7)
            .with_probe(StorageProbe)
            .with_probe(CookieProbe);
        assert_eq!(catalog.version(), 7);
        assert_eq!(catalog.names(), vec!["storage", "cookies"]);
    }
}
