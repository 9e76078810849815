use super::TensorDecoder;
use crate::error::{DecoderError, Result};
use std::collections::HashMap;

/// Creates a fresh, unconfigured decoder
pub type DecoderFactory = fn() -> Box<dyn TensorDecoder>;

/// Decoders available to a host, keyed by name.
///
/// Nothing registers itself; the embedding code calls
/// [`register`](Self::register) and [`deregister`](Self::deregister).
#[derive(Default)]
pub struct DecoderRegistry {
    factories: HashMap<&'static str, DecoderFactory>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if an existing entry was replaced
    pub fn register(&mut self, name: &'static str, factory: DecoderFactory) -> bool {
        tracing::debug!("Registering tensor decoder {}", name);
        self.factories.insert(name, factory).is_some()
    }

    /// Returns true if the name was registered
    pub fn deregister(&mut self, name: &str) -> bool {
        tracing::debug!("Deregistering tensor decoder {}", name);
        self.factories.remove(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Create a new decoder instance
    pub fn create(&self, name: &str) -> Result<Box<dyn TensorDecoder>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| DecoderError::UnknownDecoder(name.to_string()))?;
        Ok(factory())
    }
}
