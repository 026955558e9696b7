//! Client modules for external HTTP interactions

pub mod page_fetcher;

pub use page_fetcher::HttpFetcher;
