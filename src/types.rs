use clap::Parser;
use thiserror::Error;

#[derive(Debug, Parser)]
#[clap(name="quickfut")]
#[clap(about="quickfut places market and limit orders on Binance's USDT-M futures testnet", long_about=None)]
#[clap(after_help="EXAMPLES:
    # Place a market buy order
    quickfut --symbol BTCUSDT --side BUY --type MARKET --quantity 0.001

    # Place a limit sell order
    quickfut --symbol ETHUSDT --side SELL --type LIMIT --quantity 0.01 --price 2500.0

    # Test connection and credentials
    quickfut --test
")]
pub struct CommandlineArgs {
    /// Trading pair symbol, e.g. BTCUSDT or ETHUSDT.
    #[clap(short='s', long)]
    pub symbol: Option<String>,

    /// Order side, BUY or SELL.
    #[clap(long)]
    pub side: Option<String>,

    /// Order type, MARKET or LIMIT.
    #[clap(long="type")]
    pub order_type: Option<String>,

    /// Order quantity in units of the base asset.
    #[clap(short='q', long, allow_hyphen_values=true)]
    pub quantity: Option<f64>,

    /// Order price. Required for LIMIT orders, ignored for MARKET.
    #[clap(short='p', long, allow_hyphen_values=true)]
    pub price: Option<f64>,

    /// Test API connection and credentials, then exit.
    #[clap(long)]
    pub test: bool,

    /// Show the account balance, then exit.
    #[clap(long)]
    pub balance: bool,

    /// Look up the status of an existing order by its exchange-assigned
    /// id. Requires --symbol.
    #[clap(long, value_name="ORDER_ID")]
    pub order_status: Option<u64>,

    /// API key. Falls back to the BINANCE_API_KEY env variable.
    #[clap(long)]
    pub api_key: Option<String>,

    /// API secret. Falls back to the BINANCE_API_SECRET env variable.
    #[clap(long)]
    pub api_secret: Option<String>,
}

/// Error categories surfaced to the top-level handler. Local validation
/// failures never reach the network; the remaining variants preserve the
/// exchange's own message.
#[derive(Debug, Error)]
pub enum TradeError {
    #[error("{0}")]
    Validation(String),

    #[error("authentication error: {0}")]
    Authentication(String),

    #[error("order rejected: {0}")]
    OrderRejected(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
}

/// A fully validated order, ready to be submitted to the exchange.
/// `price` is present if and only if `order_type` is `Limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: f64,
    pub price: Option<f64>,
}

/// `TradingContext` carries the credentials and environment selection for
/// one invocation. It is built once in `main` and handed to the exchange
/// client, never stored globally.
pub struct TradingContext {
    /// Set via --api-key or the BINANCE_API_KEY env variable.
    pub api_key: String,

    /// Set via --api-secret or the BINANCE_API_SECRET env variable.
    pub api_secret: String,

    /// Whether to execute API calls against the testnet.
    pub use_testnet: bool,
}

/// Order response from Binance futures, as returned by both order
/// placement and order status queries.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct BinanceOrderResponse {
    #[serde(rename = "orderId")]
    pub order_id: u64,
    pub symbol: String,
    pub status: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    #[serde(rename = "origQty")]
    pub orig_qty: String,
    #[serde(rename = "executedQty")]
    pub executed_qty: String,
    // avgPrice and price come back as "0" strings until something fills;
    // older API revisions omit avgPrice entirely on placement.
    #[serde(rename = "avgPrice", default)]
    pub avg_price: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

/// Account response from Binance futures. Only the totals this tool
/// reports are mapped; everything else in the payload is ignored.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct BinanceAccountResponse {
    #[serde(rename = "totalWalletBalance")]
    pub total_wallet_balance: String,
    #[serde(rename = "totalUnrealizedProfit")]
    pub total_unrealized_profit: String,
    #[serde(rename = "availableBalance")]
    pub available_balance: String,
}

/// Error payload Binance returns alongside non-2xx statuses.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct BinanceErrorResponse {
    pub code: i64,
    pub msg: String,
}

/// Account totals reported by --balance, in USDT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    pub total_wallet_balance: String,
    pub available_balance: String,
    pub total_unrealized_profit: String,
}
