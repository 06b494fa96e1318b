//! HTTP layer: transport seam, `RetryingFetcher`, and `CoinCapHttp` endpoints.

pub mod client;
pub mod fetcher;
pub mod retry;
pub mod transport;

pub use client::CoinCapHttp;
pub use fetcher::RetryingFetcher;
pub use retry::{RetryConfig, RetryPolicy};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportFuture};
