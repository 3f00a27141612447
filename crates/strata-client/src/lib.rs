#[cfg(feature = "browser")]
pub mod browser;
pub mod fetcher;

#[cfg(feature = "browser")]
pub use browser::{ChromiumPage, ChromiumRenderer};
pub use fetcher::ReqwestFetcher;
