//! Portfolio Store Port (Driven Port)
//!
//! Interface for reading and writing the set of stored portfolios.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::portfolio::Portfolio;

/// Stored portfolios keyed by id.
pub type PortfolioSet = BTreeMap<String, Portfolio>;

/// Portfolio store error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortfolioStoreError {
    /// No portfolio with this id.
    #[error("Portfolio not found: {id}")]
    NotFound {
        /// Requested id.
        id: String,
    },

    /// Backing store failure.
    #[error("Portfolio store unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },
}

/// Port for portfolio persistence.
#[async_trait]
pub trait PortfolioStorePort: Send + Sync {
    /// Read every stored portfolio.
    async fn read(&self) -> Result<PortfolioSet, PortfolioStoreError>;

    /// Replace the stored set.
    async fn write(&self, portfolios: PortfolioSet) -> Result<(), PortfolioStoreError>;

    /// Read one portfolio by id.
    async fn get(&self, id: &str) -> Result<Portfolio, PortfolioStoreError> {
        self.read()
            .await?
            .remove(id)
            .ok_or_else(|| PortfolioStoreError::NotFound { id: id.to_string() })
    }
}

/// In-memory implementation for testing and development.
#[derive(Debug, Default)]
pub struct InMemoryPortfolioStore {
    portfolios: std::sync::RwLock<PortfolioSet>,
}

impl InMemoryPortfolioStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `portfolios`.
    #[must_use]
    pub fn with_portfolios(portfolios: PortfolioSet) -> Self {
        Self {
            portfolios: std::sync::RwLock::new(portfolios),
        }
    }
}

#[async_trait]
impl PortfolioStorePort for InMemoryPortfolioStore {
    async fn read(&self) -> Result<PortfolioSet, PortfolioStoreError> {
        let portfolios = self
            .portfolios
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(portfolios.clone())
    }

    async fn write(&self, portfolios: PortfolioSet) -> Result<(), PortfolioStoreError> {
        let mut stored = self
            .portfolios
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *stored = portfolios;
        drop(stored);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::portfolio::{Position, WeightPolicy};
    use rust_decimal_macros::dec;

    fn portfolio() -> Portfolio {
        Portfolio::new(
            vec![Position::new("SPY", 1.0)],
            dec!(5000),
            "USD",
            WeightPolicy::Normalize,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn write_then_read() {
        let store = InMemoryPortfolioStore::new();
        let mut set = PortfolioSet::new();
        set.insert("core".to_string(), portfolio());

        store.write(set.clone()).await.unwrap();

        assert_eq!(store.read().await.unwrap(), set);
        assert_eq!(store.get("core").await.unwrap(), portfolio());
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let store = InMemoryPortfolioStore::new();
        let Err(err) = store.get("nope").await else {
            panic!("expected not found");
        };
        assert_eq!(err, PortfolioStoreError::NotFound { id: "nope".to_string() });
    }
}
