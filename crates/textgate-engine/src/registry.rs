use crate::engine_trait::OcrEngine;
use std::collections::HashMap;
use textgate_core::EngineError;

pub struct EngineRegistry {
    factories: HashMap<String, fn() -> Box<dyn OcrEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("null", || Box::new(crate::null_engine::NullEngine::new()));
        #[cfg(feature = "tesseract")]
        registry.register("tesseract", || {
            Box::new(crate::tesseract_engine::TesseractEngine::new())
        });
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Box<dyn OcrEngine>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn OcrEngine>, EngineError> {
        self.factory(name).map(|f| f())
    }

    /// Look up the factory itself, for gates that construct lazily.
    pub fn factory(&self, name: &str) -> Result<fn() -> Box<dyn OcrEngine>, EngineError> {
        self.factories
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::NotFound(name.to_string()))
    }

    pub fn list_engines(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullEngine;

    #[test]
    fn test_registry_new_has_null_engine() {
        let registry = EngineRegistry::new();
        assert!(registry.create("null").is_ok());
    }

    #[test]
    fn test_registry_create_null_returns_correct_name() {
        let registry = EngineRegistry::new();
        let engine = registry.create("null").unwrap();
        assert_eq!(engine.name(), "null");
    }

    #[test]
    fn test_registry_create_unknown_returns_error() {
        let registry = EngineRegistry::new();
        let result = registry.create("nope");
        match result {
            Err(EngineError::NotFound(name)) => assert_eq!(name, "nope"),
            _ => panic!("expected NotFound error"),
        }
    }

    #[test]
    fn test_registry_factory_unknown_returns_error() {
        let registry = EngineRegistry::new();
        assert!(registry.factory("nope").is_err());
    }

    #[test]
    fn test_registry_factory_builds_engine() {
        let registry = EngineRegistry::new();
        let factory = registry.factory("null").unwrap();
        let engine = factory();
        assert_eq!(engine.name(), "null");
    }

    #[test]
    fn test_registry_register_custom_engine() {
        let mut registry = EngineRegistry::new();
        registry.register("custom", || Box::new(NullEngine::new()));
        let engine = registry.create("custom").unwrap();
        // NullEngine is used as the factory, so name is still "null"
        assert_eq!(engine.name(), "null");
    }

    #[test]
    fn test_registry_list_engines_includes_null() {
        let registry = EngineRegistry::new();
        let engines = registry.list_engines();
        assert!(engines.contains(&"null"));
    }
}
