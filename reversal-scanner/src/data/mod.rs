pub mod finnhub;
pub mod live;
pub mod provider;
pub mod snapshot;
pub mod types;
pub mod yahoo;

pub use finnhub::FinnhubClient;
pub use live::LiveMarketData;
pub use provider::{MarketDataProvider, ProviderError};
pub use snapshot::{MarketSnapshot, SnapshotProvider};
pub use types::{OptionQuote, OptionType, OptionsChain};
pub use yahoo::YahooClient;
