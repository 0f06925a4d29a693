use super::provider::*;

/// Ordered, immutable set of providers.
///
/// Position is priority: detection picks the first provider that matches.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn from_providers(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers }
    }

    /// Framework-specific providers first, then frontend tooling, generic node,
    /// the other languages and finally plain static sites.
    pub fn with_defaults() -> Self {
        Self::from_providers(vec![
            Box::new(NextJsProvider),
            Box::new(FrontendProvider),
            Box::new(NodeProvider),
            Box::new(PythonProvider),
            Box::new(GoProvider),
            Box::new(RustProvider),
            Box::new(StaticSiteProvider),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Provider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    pub fn get(&self, index: usize) -> Option<&dyn Provider> {
        self.providers.get(index).map(|p| p.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec!["nextjs", "frontend", "node", "python", "go", "rust", "static"]
        );
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(0).is_none());
    }
}
