//! Token/Chain Registry for the supported mainnet catalog

use crate::shared::types::{Chain, Token};

/// Static catalog of supported tokens and chains with reference prices.
/// Immutable after construction; safe to share behind an `Arc` and read
/// from any number of tasks without locking.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
    chains: Vec<Chain>,
    prices: Vec<(String, f64)>,
}

impl TokenRegistry {
    /// Build the default mainnet catalog
    pub fn mainnet() -> Self {
        let tokens = vec![
            Token {
                symbol: "ETH".to_string(),
                name: "Ethereum".to_string(),
                address: "0x0000000000000000000000000000000000000000".to_string(),
                decimals: 18,
                balance: 0.5,
            },
            Token {
                symbol: "USDC".to_string(),
                name: "USD Coin".to_string(),
                address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".to_string(),
                decimals: 6,
                balance: 1250.32,
            },
            Token {
                symbol: "USDT".to_string(),
                name: "Tether".to_string(),
                address: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
                decimals: 6,
                balance: 800.0,
            },
            Token {
                symbol: "DAI".to_string(),
                name: "Dai Stablecoin".to_string(),
                address: "0x6b175474e89094c44da98b954eedeac495271d0f".to_string(),
                decimals: 18,
                balance: 450.75,
            },
            Token {
                symbol: "WBTC".to_string(),
                name: "Wrapped Bitcoin".to_string(),
                address: "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599".to_string(),
                decimals: 8,
                balance: 0.012,
            },
        ];

        let chains = vec![
            Chain { id: "ethereum".to_string(), name: "Ethereum".to_string(), chain_id: 1 },
            Chain { id: "arbitrum".to_string(), name: "Arbitrum".to_string(), chain_id: 42161 },
            Chain { id: "optimism".to_string(), name: "Optimism".to_string(), chain_id: 10 },
            Chain { id: "polygon".to_string(), name: "Polygon".to_string(), chain_id: 137 },
            Chain { id: "base".to_string(), name: "Base".to_string(), chain_id: 8453 },
            Chain { id: "bsc".to_string(), name: "BSC".to_string(), chain_id: 56 },
        ];

        // Reference spot prices in USD; stand-in for a live price feed
        let prices = vec![
            ("ETH".to_string(), 3979.85),
            ("USDC".to_string(), 1.00),
            ("USDT".to_string(), 1.00),
            ("DAI".to_string(), 1.00),
            ("WBTC".to_string(), 95234.12),
        ];

        Self { tokens, chains, prices }
    }

    /// Get all listed tokens
    pub fn list_tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Get all supported chains
    pub fn list_chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Look up a token by symbol
    pub fn token(&self, symbol: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }

    /// Look up a chain by id
    pub fn chain(&self, id: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    /// Reference USD price for a token symbol
    pub fn price_of(&self, symbol: &str) -> Option<f64> {
        self.prices
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, p)| *p)
    }

    /// Check whether a token symbol is listed
    pub fn is_listed(&self, symbol: &str) -> bool {
        self.token(symbol).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_catalog() {
        let registry = TokenRegistry::mainnet();
        assert_eq!(registry.list_tokens().len(), 5);
        assert_eq!(registry.list_chains().len(), 6);
        assert_eq!(registry.price_of("ETH"), Some(3979.85));
        assert_eq!(registry.price_of("USDC"), Some(1.00));
        assert!(registry.price_of("DOGE").is_none());
    }

    #[test]
    fn test_token_lookup() {
        let registry = TokenRegistry::mainnet();
        let eth = registry.token("ETH").unwrap();
        assert_eq!(eth.decimals, 18);
        assert!(registry.token("DOGE").is_none());
        assert!(registry.chain("ethereum").is_some());
        assert!(registry.chain("solana").is_none());
    }
}
