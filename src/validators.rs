use regex::Regex;
use tracing::{debug, info, warn};

use crate::defines::SYMBOL_PATTERN;
use crate::types::{OrderRequest, OrderSide, OrderType, TradeError};

/// Validates the trading symbol format and normalizes it to uppercase.
pub fn validate_symbol(symbol: &str) -> Result<String, TradeError> {
    let symbol = symbol.trim().to_uppercase();

    if symbol.is_empty() {
        return Err(TradeError::Validation("Symbol cannot be empty".to_string()));
    }

    let pattern = Regex::new(SYMBOL_PATTERN).expect("symbol pattern is a valid regex");
    if !pattern.is_match(&symbol) {
        return Err(TradeError::Validation(format!(
            "Invalid symbol format: {}",
            symbol
        )));
    }

    // Most USDT-M futures symbols end with USDT or BUSD
    if !symbol.ends_with("USDT") && !symbol.ends_with("BUSD") {
        warn!("Symbol {} doesn't end with USDT or BUSD - may be invalid", symbol);
    }

    debug!("Symbol validated: {}", symbol);
    Ok(symbol)
}

/// Validates the order side, accepting any casing of BUY/SELL.
pub fn validate_side(side: &str) -> Result<OrderSide, TradeError> {
    let normalized = side.trim().to_uppercase();

    let side = match normalized.as_str() {
        "BUY" => OrderSide::Buy,
        "SELL" => OrderSide::Sell,
        "" => return Err(TradeError::Validation("Side cannot be empty".to_string())),
        other => {
            return Err(TradeError::Validation(format!(
                "Invalid side: {}. Must be BUY or SELL",
                other
            )))
        }
    };

    debug!("Side validated: {}", side);
    Ok(side)
}

/// Validates the order type, accepting any casing of MARKET/LIMIT.
pub fn validate_order_type(order_type: &str) -> Result<OrderType, TradeError> {
    let normalized = order_type.trim().to_uppercase();

    let order_type = match normalized.as_str() {
        "MARKET" => OrderType::Market,
        "LIMIT" => OrderType::Limit,
        "" => {
            return Err(TradeError::Validation(
                "Order type cannot be empty".to_string(),
            ))
        }
        other => {
            return Err(TradeError::Validation(format!(
                "Invalid order type: {}. Must be MARKET or LIMIT",
                other
            )))
        }
    };

    debug!("Order type validated: {}", order_type);
    Ok(order_type)
}

/// Validates that the quantity is a positive, finite number.
pub fn validate_quantity(quantity: f64) -> Result<f64, TradeError> {
    if !quantity.is_finite() {
        return Err(TradeError::Validation(format!(
            "Invalid quantity: {}. Must be a finite number",
            quantity
        )));
    }

    if quantity <= 0.0 {
        return Err(TradeError::Validation(format!(
            "Quantity must be positive: {}",
            quantity
        )));
    }

    debug!("Quantity validated: {}", quantity);
    Ok(quantity)
}

/// Validates the price against the order type: required and positive for
/// LIMIT, dropped (with a warning) for MARKET.
pub fn validate_price(price: Option<f64>, order_type: OrderType) -> Result<Option<f64>, TradeError> {
    match order_type {
        OrderType::Market => {
            if price.is_some() {
                warn!("Price provided for MARKET order - will be ignored");
            }
            Ok(None)
        }
        OrderType::Limit => {
            let price = price.ok_or_else(|| {
                TradeError::Validation("Price is required for LIMIT orders".to_string())
            })?;

            if !price.is_finite() {
                return Err(TradeError::Validation(format!(
                    "Invalid price: {}. Must be a finite number",
                    price
                )));
            }

            if price <= 0.0 {
                return Err(TradeError::Validation(format!(
                    "Price must be positive: {}",
                    price
                )));
            }

            debug!("Price validated: {}", price);
            Ok(Some(price))
        }
    }
}

/// Validates all order parameters together and assembles the request.
pub fn validate_order_params(
    symbol: &str,
    side: &str,
    order_type: &str,
    quantity: f64,
    price: Option<f64>,
) -> Result<OrderRequest, TradeError> {
    info!("Validating order parameters...");

    let order_type_validated = validate_order_type(order_type)?;
    let request = OrderRequest {
        symbol: validate_symbol(symbol)?,
        side: validate_side(side)?,
        order_type: order_type_validated,
        quantity: validate_quantity(quantity)?,
        price: validate_price(price, order_type_validated)?,
    };

    info!("All parameters validated successfully");
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalized_to_uppercase() {
        assert_eq!(validate_symbol(" btcusdt ").unwrap(), "BTCUSDT");
        assert_eq!(validate_symbol("ETHUSDT").unwrap(), "ETHUSDT");
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let error = validate_symbol("").unwrap_err();
        assert_eq!(error.to_string(), "Symbol cannot be empty");
    }

    #[test]
    fn test_symbol_with_punctuation_rejected() {
        assert!(validate_symbol("BTC-USDT").is_err());
        assert!(validate_symbol("BTC/USDT").is_err());
        assert!(validate_symbol("BTC USDT").is_err());
    }

    #[test]
    fn test_side_accepts_buy_and_sell_case_insensitively() {
        assert_eq!(validate_side("BUY").unwrap(), OrderSide::Buy);
        assert_eq!(validate_side("buy").unwrap(), OrderSide::Buy);
        assert_eq!(validate_side("Sell").unwrap(), OrderSide::Sell);
        assert_eq!(validate_side(" sell ").unwrap(), OrderSide::Sell);
    }

    #[test]
    fn test_side_rejects_anything_else() {
        let error = validate_side("HOLD").unwrap_err();
        assert!(error.to_string().contains("Invalid side"));
        assert!(validate_side("").is_err());
        assert!(validate_side("LONG").is_err());
    }

    #[test]
    fn test_order_type_accepts_market_and_limit() {
        assert_eq!(validate_order_type("MARKET").unwrap(), OrderType::Market);
        assert_eq!(validate_order_type("market").unwrap(), OrderType::Market);
        assert_eq!(validate_order_type("Limit").unwrap(), OrderType::Limit);
    }

    #[test]
    fn test_order_type_rejects_unknown() {
        let error = validate_order_type("STOP").unwrap_err();
        assert!(error.to_string().contains("Invalid order type"));
        assert!(validate_order_type("").is_err());
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert!(validate_quantity(0.001).is_ok());
        let error = validate_quantity(-0.001).unwrap_err();
        assert!(error.to_string().contains("Quantity must be positive"));
        assert!(validate_quantity(0.0).is_err());
    }

    #[test]
    fn test_quantity_must_be_finite() {
        assert!(validate_quantity(f64::NAN).is_err());
        assert!(validate_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_price_dropped_for_market() {
        assert_eq!(validate_price(None, OrderType::Market).unwrap(), None);
        assert_eq!(validate_price(Some(100.0), OrderType::Market).unwrap(), None);
    }

    #[test]
    fn test_price_required_for_limit() {
        let error = validate_price(None, OrderType::Limit).unwrap_err();
        assert_eq!(error.to_string(), "Price is required for LIMIT orders");
    }

    #[test]
    fn test_price_must_be_positive_for_limit() {
        assert!(validate_price(Some(-1.0), OrderType::Limit).is_err());
        assert!(validate_price(Some(0.0), OrderType::Limit).is_err());
        assert!(validate_price(Some(f64::NAN), OrderType::Limit).is_err());
        assert_eq!(
            validate_price(Some(2500.0), OrderType::Limit).unwrap(),
            Some(2500.0)
        );
    }

    #[test]
    fn test_market_request_validates_without_price() {
        let request = validate_order_params("BTCUSDT", "BUY", "MARKET", 0.001, None).unwrap();
        assert_eq!(request.symbol, "BTCUSDT");
        assert_eq!(request.side, OrderSide::Buy);
        assert_eq!(request.order_type, OrderType::Market);
        assert_eq!(request.quantity, 0.001);
        assert_eq!(request.price, None);
    }

    #[test]
    fn test_limit_request_keeps_price() {
        let request =
            validate_order_params("ETHUSDT", "SELL", "LIMIT", 0.01, Some(2500.0)).unwrap();
        assert_eq!(request.side, OrderSide::Sell);
        assert_eq!(request.order_type, OrderType::Limit);
        assert_eq!(request.price, Some(2500.0));
    }

    #[test]
    fn test_limit_request_without_price_fails() {
        let error = validate_order_params("ETHUSDT", "SELL", "LIMIT", 0.01, None).unwrap_err();
        assert_eq!(error.to_string(), "Price is required for LIMIT orders");
    }

    #[test]
    fn test_bad_quantity_fails_regardless_of_other_fields() {
        assert!(validate_order_params("BTCUSDT", "BUY", "MARKET", -0.001, None).is_err());
        assert!(validate_order_params("BTCUSDT", "SELL", "LIMIT", 0.0, Some(100.0)).is_err());
    }
}
