//! Network URL constants for the CoinCap SDK.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://rest.coincap.io/v3";

/// Base URL for asset icons. Icons are keyed by lowercase symbol.
pub const ICON_BASE_URL: &str = "https://assets.coincap.io/assets/icons";

/// Environment variable holding the optional API key.
pub const API_KEY_ENV: &str = "COINCAP_API_KEY";

/// Number of assets requested by listing and search endpoints.
pub const DEFAULT_ASSET_LIMIT: u32 = 100;
