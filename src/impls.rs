use crate::defines::*;
use crate::types::{
    AccountBalance, BinanceAccountResponse, OrderSide, OrderType, TradeError, TradingContext,
};

use std::fmt;

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TradingContext {
    /// Builds a trading context from explicit credentials, falling back
    /// to the BINANCE_API_KEY / BINANCE_API_SECRET env variables when a
    /// value is absent or empty.
    pub fn new(
        api_key: Option<String>,
        api_secret: Option<String>,
        use_testnet: bool,
    ) -> Result<Self, TradeError> {
        let api_key = api_key
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty()));
        let api_secret = api_secret.filter(|secret| !secret.is_empty()).or_else(|| {
            std::env::var(API_SECRET_ENV)
                .ok()
                .filter(|secret| !secret.is_empty())
        });

        match (api_key, api_secret) {
            (Some(api_key), Some(api_secret)) => Ok(Self {
                api_key,
                api_secret,
                use_testnet,
            }),
            _ => Err(TradeError::Validation(format!(
                "API credentials not found. Set {} and {} environment variables or pass --api-key and --api-secret",
                API_KEY_ENV, API_SECRET_ENV
            ))),
        }
    }

    /// Base URL of the REST API this context targets.
    pub fn rest_api_url(&self) -> &'static str {
        if self.use_testnet {
            TESTNET_API_URL
        } else {
            MAINNET_API_URL
        }
    }
}

impl From<BinanceAccountResponse> for AccountBalance {
    fn from(account: BinanceAccountResponse) -> Self {
        Self {
            total_wallet_balance: account.total_wallet_balance,
            available_balance: account.available_balance,
            total_unrealized_profit: account.total_unrealized_profit,
        }
    }
}
