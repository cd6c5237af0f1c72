use isahc::http::{Request, Response, StatusCode};
use isahc::{Body, HttpClient, ReadResponseExt};
use ring::hmac;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::form_urlencoded;

use crate::defines::*;
use crate::types::{
    AccountBalance, BinanceAccountResponse, BinanceErrorResponse, BinanceOrderResponse,
    OrderRequest, TradeError, TradingContext,
};

/// The operations this tool needs from the exchange. Implemented by the
/// real REST client below; tests substitute a recording double.
pub trait ExchangeApi {
    fn test_connection(&self) -> Result<(), TradeError>;
    fn get_balance(&self) -> Result<AccountBalance, TradeError>;
    fn place_order(&self, order: &OrderRequest) -> Result<BinanceOrderResponse, TradeError>;
    fn get_order_status(
        &self,
        symbol: &str,
        order_id: u64,
    ) -> Result<BinanceOrderResponse, TradeError>;
}

/// Thin client over the Binance USDT-M futures REST API. Each operation
/// performs exactly one signed HTTPS call; nothing is retried and no
/// state is kept between calls beyond the HTTP session itself.
pub struct BinanceFuturesClient {
    context: TradingContext,
    http: HttpClient,
}

impl BinanceFuturesClient {
    pub fn new(context: TradingContext) -> Result<Self, TradeError> {
        let http = HttpClient::new()
            .map_err(|e| TradeError::Unknown(format!("failed to build http client: {}", e)))?;

        info!(
            "Binance futures client initialized ({})",
            if context.use_testnet { "TESTNET" } else { "PRODUCTION" }
        );

        Ok(Self { context, http })
    }

    /// Assembles the full request URL: urlencoded params plus recvWindow,
    /// timestamp and the HMAC signature over the whole query string.
    fn signed_url(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in params {
            serializer.append_pair(name, value);
        }
        serializer.append_pair("recvWindow", &RECV_WINDOW_MS.to_string());
        serializer.append_pair(
            "timestamp",
            &chrono::Utc::now().timestamp_millis().to_string(),
        );

        let query = serializer.finish();
        let signature = sign_payload(&self.context.api_secret, &query);
        format!(
            "{}{}?{}&signature={}",
            self.context.rest_api_url(),
            endpoint,
            query,
            signature
        )
    }

    fn get(&self, url: String) -> Result<Response<Body>, TradeError> {
        let request = Request::get(url)
            .header(API_KEY_HEADER, self.context.api_key.as_str())
            .body(Body::empty())
            .map_err(|e| TradeError::Unknown(format!("failed to build request: {}", e)))?;

        self.http
            .send(request)
            .map_err(|e| TradeError::Network(e.to_string()))
    }

    fn post(&self, url: String) -> Result<Response<Body>, TradeError> {
        let request = Request::post(url)
            .header(API_KEY_HEADER, self.context.api_key.as_str())
            .body(Body::empty())
            .map_err(|e| TradeError::Unknown(format!("failed to build request: {}", e)))?;

        self.http
            .send(request)
            .map_err(|e| TradeError::Network(e.to_string()))
    }

    /// Decodes a successful response, or classifies the failure with the
    /// exchange's message preserved.
    fn read_response<T: DeserializeOwned>(
        &self,
        mut response: Response<Body>,
    ) -> Result<T, TradeError> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .map_err(|e| TradeError::Unknown(format!("malformed exchange response: {}", e)))
        } else {
            let body = response.text().unwrap_or_default();
            Err(classify_api_error(status, &body))
        }
    }
}

impl ExchangeApi for BinanceFuturesClient {
    /// One signed account query: success proves both connectivity and
    /// credential validity.
    fn test_connection(&self) -> Result<(), TradeError> {
        info!("Testing API connection...");

        let url = self.signed_url(ACCOUNT_ENDPOINT, &[]);
        let response = self.get(url)?;
        let account: BinanceAccountResponse = self.read_response(response)?;

        info!("API authentication successful");
        debug!("Account balance: {} USDT", account.total_wallet_balance);
        Ok(())
    }

    fn get_balance(&self) -> Result<AccountBalance, TradeError> {
        debug!("Fetching account balance");

        let url = self.signed_url(ACCOUNT_ENDPOINT, &[]);
        let response = self.get(url)?;
        let account: BinanceAccountResponse = self.read_response(response)?;

        let balance = AccountBalance::from(account);
        debug!("Account balance: {:?}", balance);
        Ok(balance)
    }

    fn place_order(&self, order: &OrderRequest) -> Result<BinanceOrderResponse, TradeError> {
        info!(
            "Placing {} {} order for {}",
            order.order_type, order.side, order.symbol
        );
        debug!(
            "Order params: quantity={}, price={:?}",
            order.quantity, order.price
        );

        let params = build_order_params(order);
        let url = self.signed_url(ORDER_ENDPOINT, &params);
        let response = self.post(url)?;
        let placed: BinanceOrderResponse = self.read_response(response)?;

        info!("Order placed successfully: order id {}", placed.order_id);
        debug!("Order response: {:?}", placed);
        Ok(placed)
    }

    fn get_order_status(
        &self,
        symbol: &str,
        order_id: u64,
    ) -> Result<BinanceOrderResponse, TradeError> {
        debug!("Fetching order status: {}", order_id);

        let params = [
            ("symbol", symbol.to_string()),
            ("orderId", order_id.to_string()),
        ];
        let url = self.signed_url(ORDER_ENDPOINT, &params);
        let response = self.get(url)?;
        let order: BinanceOrderResponse = self.read_response(response)?;

        debug!("Order status: {:?}", order);
        Ok(order)
    }
}

/// Order parameters in the exchange's wire names. LIMIT orders carry the
/// price and a GTC time-in-force; MARKET orders carry neither.
pub(crate) fn build_order_params(order: &OrderRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("symbol", order.symbol.clone()),
        ("side", order.side.as_str().to_string()),
        ("type", order.order_type.as_str().to_string()),
        ("quantity", order.quantity.to_string()),
    ];

    if let Some(price) = order.price {
        params.push(("price", price.to_string()));
        params.push(("timeInForce", DEFAULT_TIME_IN_FORCE.to_string()));
    }

    params
}

/// HMAC-SHA256 over the query string, hex-encoded, as the exchange
/// expects in the `signature` parameter.
pub(crate) fn sign_payload(secret: &str, payload: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let tag = hmac::sign(&key, payload.as_bytes());
    to_hex(tag.as_ref())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}

/// Maps a non-2xx response onto the local error taxonomy. 401/403 and
/// the credential-related exchange codes become authentication errors,
/// any other client error is an exchange-side rejection, and server
/// errors stay unknown. The exchange's message is kept verbatim.
pub(crate) fn classify_api_error(status: StatusCode, body: &str) -> TradeError {
    let (code, message) = match serde_json::from_str::<BinanceErrorResponse>(body) {
        Ok(error) => (Some(error.code), error.msg),
        Err(_) if body.trim().is_empty() => (None, format!("HTTP {}", status)),
        Err(_) => (None, format!("HTTP {}: {}", status, body.trim())),
    };

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return TradeError::Authentication(message);
    }

    if let Some(code) = code {
        if AUTH_ERROR_CODES.contains(&code) {
            return TradeError::Authentication(message);
        }
    }

    if status.is_client_error() {
        TradeError::OrderRejected(message)
    } else {
        TradeError::Unknown(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderSide, OrderType};

    // Example secret, payload and signature published in the exchange's
    // signed-endpoint documentation.
    const DOC_SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
    const DOC_PAYLOAD: &str = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
    const DOC_SIGNATURE: &str = "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71";

    fn market_order() -> OrderRequest {
        OrderRequest {
            symbol: "BTCUSDT".to_string(),
            side: OrderSide::Buy,
            order_type: OrderType::Market,
            quantity: 0.001,
            price: None,
        }
    }

    fn limit_order() -> OrderRequest {
        OrderRequest {
            symbol: "ETHUSDT".to_string(),
            side: OrderSide::Sell,
            order_type: OrderType::Limit,
            quantity: 0.01,
            price: Some(2500.0),
        }
    }

    #[test]
    fn test_sign_payload_matches_documented_vector() {
        assert_eq!(sign_payload(DOC_SECRET, DOC_PAYLOAD), DOC_SIGNATURE);
    }

    #[test]
    fn test_to_hex_encodes_lowercase() {
        assert_eq!(to_hex(&[0x00, 0xab, 0xff]), "00abff");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn test_market_order_params_have_no_price() {
        let params = build_order_params(&market_order());
        assert_eq!(
            params,
            vec![
                ("symbol", "BTCUSDT".to_string()),
                ("side", "BUY".to_string()),
                ("type", "MARKET".to_string()),
                ("quantity", "0.001".to_string()),
            ]
        );
    }

    #[test]
    fn test_limit_order_params_carry_price_and_time_in_force() {
        let params = build_order_params(&limit_order());
        assert_eq!(
            params,
            vec![
                ("symbol", "ETHUSDT".to_string()),
                ("side", "SELL".to_string()),
                ("type", "LIMIT".to_string()),
                ("quantity", "0.01".to_string()),
                ("price", "2500".to_string()),
                ("timeInForce", "GTC".to_string()),
            ]
        );
    }

    #[test]
    fn test_unauthorized_status_maps_to_authentication() {
        let error = classify_api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"code":-2014,"msg":"API-key format invalid."}"#,
        );
        assert!(matches!(error, TradeError::Authentication(_)));
        assert!(error.to_string().contains("API-key format invalid."));
    }

    #[test]
    fn test_credential_error_codes_map_to_authentication() {
        let error = classify_api_error(
            StatusCode::BAD_REQUEST,
            r#"{"code":-1022,"msg":"Signature for this request is not valid."}"#,
        );
        assert!(matches!(error, TradeError::Authentication(_)));
    }

    #[test]
    fn test_client_error_maps_to_order_rejected() {
        let error = classify_api_error(
            StatusCode::BAD_REQUEST,
            r#"{"code":-4003,"msg":"Quantity less than zero."}"#,
        );
        assert!(matches!(error, TradeError::OrderRejected(_)));
        assert!(error.to_string().contains("Quantity less than zero."));
    }

    #[test]
    fn test_server_error_maps_to_unknown() {
        let error = classify_api_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(matches!(error, TradeError::Unknown(_)));
        assert!(error.to_string().contains("500"));
    }

    #[test]
    fn test_unparseable_body_is_kept_in_message() {
        let error = classify_api_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(error.to_string().contains("<html>bad gateway</html>"));
    }
}
