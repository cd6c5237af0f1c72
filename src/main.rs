mod api;
mod defines;
mod impls;
mod logger;
mod orders;
mod types;
mod validators;

use clap::Parser;
use tracing::{debug, error, info};

use orders::OrderManager;
use types::{CommandlineArgs, TradeError, TradingContext};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let log_path = match logger::setup_logging() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("❌ Failed to initialize logging: {}", e);
            return 2;
        }
    };

    // parse arguments via clap
    let cmd_args = CommandlineArgs::parse();

    println!();
    println!("{}", "=".repeat(60));
    println!("BINANCE FUTURES QUICK ORDER (TESTNET)");
    println!("{}", "=".repeat(60));
    info!("Logging initialized. Log file: {}", log_path.display());

    let started = std::time::Instant::now();
    let outcome = dispatch(&cmd_args);
    debug!("Finished in {:?}", started.elapsed());

    match outcome {
        Ok(()) => 0,
        Err(e) => {
            report_error(&e);
            exit_code(&e)
        }
    }
}

fn dispatch(cmd_args: &CommandlineArgs) -> Result<(), TradeError> {
    // construct the trading context with credentials from the command
    // line, falling back to the environment; always against the testnet.
    info!("Initializing trading context...");
    let context = TradingContext::new(cmd_args.api_key.clone(), cmd_args.api_secret.clone(), true)?;
    let order_manager = OrderManager::new(context)?;

    if cmd_args.test {
        println!("\n🔍 Testing API connection...");
        order_manager.test_connection()?;
        println!("✅ Connection successful!");
        println!("✅ API credentials are valid");
        return Ok(());
    }

    if cmd_args.balance {
        println!("\n💰 Fetching account balance...");
        let balance = order_manager.account_balance()?;
        println!("\nAccount Balance:");
        println!("  Total Wallet Balance: {} USDT", balance.total_wallet_balance);
        println!("  Available Balance:    {} USDT", balance.available_balance);
        println!("  Unrealized Profit:    {} USDT", balance.total_unrealized_profit);
        return Ok(());
    }

    if let Some(order_id) = cmd_args.order_status {
        let symbol = require(cmd_args.symbol.as_deref(), "--symbol")?;
        println!("\n🔎 Fetching status of order {}...", order_id);
        let order = order_manager.order_status(symbol, order_id)?;
        println!("\nOrder {}:", order.order_id);
        println!("  Symbol:       {}", order.symbol);
        println!("  Side:         {}", order.side);
        println!("  Type:         {}", order.order_type);
        println!("  Status:       {}", order.status);
        println!("  Quantity:     {}", order.orig_qty);
        println!("  Executed Qty: {}", order.executed_qty);
        return Ok(());
    }

    let symbol = require(cmd_args.symbol.as_deref(), "--symbol")?;
    let side = require(cmd_args.side.as_deref(), "--side")?;
    let order_type = require(cmd_args.order_type.as_deref(), "--type")?;
    let quantity = cmd_args
        .quantity
        .ok_or_else(|| TradeError::Validation("--quantity is required".to_string()))?;

    info!("Placing {} {} order...", order_type, side);
    order_manager.place_order(symbol, side, order_type, quantity, cmd_args.price)?;
    Ok(())
}

fn require<'a>(value: Option<&'a str>, flag: &str) -> Result<&'a str, TradeError> {
    value.ok_or_else(|| TradeError::Validation(format!("{} is required", flag)))
}

fn report_error(error: &TradeError) {
    error!("{}", error);
    match error {
        TradeError::Validation(_) => {
            println!("\n❌ Validation error: {}", error);
            println!("\nUse --help to see usage information");
        }
        TradeError::Authentication(_) => {
            println!("\n❌ {}", error);
            println!("Please check your API credentials");
        }
        _ => println!("\n❌ {}", error),
    }
}

fn exit_code(error: &TradeError) -> i32 {
    match error {
        TradeError::Validation(_) => 1,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_exit_with_one() {
        assert_eq!(exit_code(&TradeError::Validation("x".to_string())), 1);
    }

    #[test]
    fn test_api_errors_exit_with_two() {
        assert_eq!(exit_code(&TradeError::Authentication("x".to_string())), 2);
        assert_eq!(exit_code(&TradeError::OrderRejected("x".to_string())), 2);
        assert_eq!(exit_code(&TradeError::Network("x".to_string())), 2);
        assert_eq!(exit_code(&TradeError::Unknown("x".to_string())), 2);
    }

    #[test]
    fn test_require_reports_the_missing_flag() {
        assert_eq!(require(Some("BTCUSDT"), "--symbol").unwrap(), "BTCUSDT");
        let error = require(None, "--side").unwrap_err();
        assert_eq!(error.to_string(), "--side is required");
    }
}
