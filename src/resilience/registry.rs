//! Process-wide circuit breakers, one per endpoint name.

use dashmap::DashMap;
use std::sync::Arc;

use crate::config::CircuitBreakerConfig;
use crate::resilience::circuit_breaker::{BreakerSnapshot, CircuitBreaker};

/// Thread-safe map of endpoint name to its breaker.
#[derive(Debug, Clone, Default)]
pub struct BreakerRegistry {
    inner: Arc<DashMap<String, Arc<CircuitBreaker>>>,
}

impl BreakerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the breaker for `name`, creating it with `config` on first use.
    ///
    /// Later calls for the same name share the existing breaker; `config` is ignored.
    pub fn get_or_create(&self, name: &str, config: &CircuitBreakerConfig) -> Arc<CircuitBreaker> {
        self.inner
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::info!(endpoint = %name, "Registering circuit breaker");
                Arc::new(CircuitBreaker::new(name, config.clone()))
            })
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<CircuitBreaker>> {
        self.inner.get(name).map(|entry| entry.value().clone())
    }

    /// Snapshots of every breaker, ordered by name.
    pub fn snapshots(&self) -> Vec<BreakerSnapshot> {
        let mut snapshots: Vec<_> = self.inner.iter().map(|entry| entry.value().snapshot()).collect();
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_shares_breaker() {
        let registry = BreakerRegistry::new();
        let config = CircuitBreakerConfig::default();
        let a = registry.get_or_create("ext", &config);
        let b = registry.get_or_create("ext", &config);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn test_snapshots_sorted() {
        let registry = BreakerRegistry::new();
        let config = CircuitBreakerConfig::default();
        registry.get_or_create("zeta", &config);
        registry.get_or_create("alpha", &config);
        let names: Vec<_> = registry.snapshots().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
