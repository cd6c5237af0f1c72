/// REST base URL of the Binance USDT-M futures testnet.
pub const TESTNET_API_URL: &str = "https://testnet.binancefuture.com";

/// REST base URL of the production Binance USDT-M futures API.
pub const MAINNET_API_URL: &str = "https://fapi.binance.com";

pub const ORDER_ENDPOINT: &str = "/fapi/v1/order";
pub const ACCOUNT_ENDPOINT: &str = "/fapi/v2/account";

/// Header carrying the API key on authenticated requests.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";

/// How long (in milliseconds) a signed request stays valid after the
/// timestamp it carries.
pub const RECV_WINDOW_MS: u64 = 5000;

/// Time-in-force attached to LIMIT orders.
pub const DEFAULT_TIME_IN_FORCE: &str = "GTC";

/// Symbols are plain uppercase alphanumerics, e.g. BTCUSDT.
pub const SYMBOL_PATTERN: &str = "^[A-Z0-9]+$";

/// Exchange error codes that mean bad credentials or a bad signature
/// rather than a rejected order: -1022 invalid signature, -2014 bad
/// API key format, -2015 invalid key, IP or permissions.
pub const AUTH_ERROR_CODES: [i64; 3] = [-1022, -2014, -2015];

pub const DEFAULT_LOG_DIR: &str = "logs";
