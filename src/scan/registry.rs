use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Contract binary name to the sorted, duplicate-free set of its providers.
///
/// Every configured contract has an entry, even when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, BTreeSet<String>>,
}

impl ProviderRegistry {
    pub fn new<I, S>(contracts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            providers: contracts
                .into_iter()
                .map(|c| (c.into(), BTreeSet::new()))
                .collect(),
        }
    }

    /// Contracts in lexicographic order.
    pub fn contracts(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn contains_contract(&self, contract: &str) -> bool {
        self.providers.contains_key(contract)
    }

    /// Records a provider. Returns false if the contract is not configured
    /// or the provider was already recorded.
    pub fn insert(&mut self, contract: &str, provider: String) -> bool {
        match self.providers.get_mut(contract) {
            Some(set) => set.insert(provider),
            None => false,
        }
    }

    pub fn providers(&self, contract: &str) -> Option<&BTreeSet<String>> {
        self.providers.get(contract)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.providers.iter().map(|(c, p)| (c.as_str(), p))
    }

    /// True when no contracts are configured.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn contract_count(&self) -> usize {
        self.providers.len()
    }

    pub fn provider_count(&self) -> usize {
        self.providers.values().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_contracts_start_empty() {
        let registry = ProviderRegistry::new(["com.acme.Plugin", "com.acme.Codec"]);

        assert_eq!(registry.contract_count(), 2);
        assert_eq!(registry.provider_count(), 0);
        assert!(registry.providers("com.acme.Plugin").unwrap().is_empty());
        assert!(registry.providers("com.acme.Other").is_none());
    }

    #[test]
    fn test_contracts_are_sorted_and_deduplicated() {
        let registry = ProviderRegistry::new(["b.Second", "a.First", "b.Second"]);
        let contracts: Vec<&str> = registry.contracts().collect();
        assert_eq!(contracts, vec!["a.First", "b.Second"]);
    }

    #[test]
    fn test_insert_is_set_like_and_sorted() {
        let mut registry = ProviderRegistry::new(["com.acme.Plugin"]);

        assert!(registry.insert("com.acme.Plugin", "z.Last".to_string()));
        assert!(registry.insert("com.acme.Plugin", "a.First".to_string()));
        assert!(!registry.insert("com.acme.Plugin", "z.Last".to_string()));

        let providers: Vec<&String> = registry.providers("com.acme.Plugin").unwrap().iter().collect();
        assert_eq!(providers, vec!["a.First", "z.Last"]);
        assert_eq!(registry.provider_count(), 2);
    }

    #[test]
    fn test_insert_ignores_unconfigured_contract() {
        let mut registry = ProviderRegistry::new(["com.acme.Plugin"]);
        assert!(!registry.insert("com.acme.Other", "x.Impl".to_string()));
        assert!(!registry.contains_contract("com.acme.Other"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = ProviderRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.iter().count(), 0);
    }

    #[test]
    fn test_serializes_as_map() {
        let mut registry = ProviderRegistry::new(["com.acme.Plugin"]);
        registry.insert("com.acme.Plugin", "com.acme.impl.Foo".to_string());

        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(json, serde_json::json!({"com.acme.Plugin": ["com.acme.impl.Foo"]}));
    }
}
