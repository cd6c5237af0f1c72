use tracing::info;

use crate::api::{BinanceFuturesClient, ExchangeApi};
use crate::types::{
    AccountBalance, BinanceOrderResponse, OrderRequest, OrderType, TradeError, TradingContext,
};
use crate::validators::{validate_order_params, validate_order_type, validate_symbol};

/// Runs one order through validation, submission and reporting. Generic
/// over the exchange seam; production code uses the real REST client.
pub struct OrderManager<C: ExchangeApi> {
    client: C,
}

impl OrderManager<BinanceFuturesClient> {
    pub fn new(context: TradingContext) -> Result<Self, TradeError> {
        info!("Initializing order manager...");
        Ok(Self::with_client(BinanceFuturesClient::new(context)?))
    }
}

impl<C: ExchangeApi> OrderManager<C> {
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    /// Validates and places a MARKET order. A validation failure returns
    /// before any network call is made.
    pub fn place_market_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: f64,
    ) -> Result<BinanceOrderResponse, TradeError> {
        info!("=== Placing MARKET order ===");
        let request = validate_order_params(symbol, side, "MARKET", quantity, None)?;
        self.submit(request)
    }

    /// Validates and places a LIMIT order. A validation failure returns
    /// before any network call is made.
    pub fn place_limit_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: f64,
        price: f64,
    ) -> Result<BinanceOrderResponse, TradeError> {
        info!("=== Placing LIMIT order ===");
        let request = validate_order_params(symbol, side, "LIMIT", quantity, Some(price))?;
        self.submit(request)
    }

    /// Routes to the matching placement method based on the order type.
    pub fn place_order(
        &self,
        symbol: &str,
        side: &str,
        order_type: &str,
        quantity: f64,
        price: Option<f64>,
    ) -> Result<BinanceOrderResponse, TradeError> {
        match validate_order_type(order_type)? {
            OrderType::Market => self.place_market_order(symbol, side, quantity),
            OrderType::Limit => {
                let price = price.ok_or_else(|| {
                    TradeError::Validation("Price is required for LIMIT orders".to_string())
                })?;
                self.place_limit_order(symbol, side, quantity, price)
            }
        }
    }

    fn submit(&self, request: OrderRequest) -> Result<BinanceOrderResponse, TradeError> {
        print_order_summary(&request);
        let response = self.client.place_order(&request)?;
        print_order_response(&response);
        Ok(response)
    }

    pub fn test_connection(&self) -> Result<(), TradeError> {
        self.client.test_connection()
    }

    pub fn account_balance(&self) -> Result<AccountBalance, TradeError> {
        self.client.get_balance()
    }

    pub fn order_status(
        &self,
        symbol: &str,
        order_id: u64,
    ) -> Result<BinanceOrderResponse, TradeError> {
        let symbol = validate_symbol(symbol)?;
        self.client.get_order_status(&symbol, order_id)
    }
}

fn print_order_summary(request: &OrderRequest) {
    println!();
    println!("{}", "=".repeat(50));
    println!("ORDER REQUEST SUMMARY");
    println!("{}", "=".repeat(50));
    println!("Symbol:       {}", request.symbol);
    println!("Side:         {}", request.side);
    println!("Type:         {}", request.order_type);
    println!("Quantity:     {}", request.quantity);
    if let Some(price) = request.price {
        println!("Price:        {}", price);
    }
    println!("{}", "=".repeat(50));

    info!("Order summary: {:?}", request);
}

fn print_order_response(response: &BinanceOrderResponse) {
    println!();
    println!("{}", "=".repeat(50));
    println!("ORDER RESPONSE");
    println!("{}", "=".repeat(50));
    println!("Order ID:     {}", response.order_id);
    println!("Symbol:       {}", response.symbol);
    println!("Side:         {}", response.side);
    println!("Type:         {}", response.order_type);
    println!("Status:       {}", response.status);
    println!("Quantity:     {}", response.orig_qty);

    if parses_positive(&response.executed_qty) {
        println!("Executed Qty: {}", response.executed_qty);
    }
    if let Some(avg_price) = response.avg_price.as_deref() {
        if parses_positive(avg_price) {
            println!("Avg Price:    {}", avg_price);
        }
    }
    if let Some(price) = response.price.as_deref() {
        if parses_positive(price) {
            println!("Limit Price:  {}", price);
        }
    }

    println!("{}", "=".repeat(50));

    match response.status.as_str() {
        "NEW" | "FILLED" | "PARTIALLY_FILLED" => println!("\n✅ Order placed successfully!"),
        status => println!("\n⚠️  Order status: {}", status),
    }
    println!();

    info!("Order response printed: order id {}", response.order_id);
}

fn parses_positive(value: &str) -> bool {
    value.parse::<f64>().map(|v| v > 0.0).unwrap_or(false)
}
