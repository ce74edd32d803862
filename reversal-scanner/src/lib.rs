pub mod analytics;
pub mod config;
pub mod data;
pub mod pricing;
pub mod report;
pub mod scanner;

// Re-export commonly used types
pub use analytics::{CombinationGenerator, StrategyCombination, StrategyDirection};
pub use config::{ConfigError, ScannerConfig};
pub use data::{MarketDataProvider, OptionQuote, OptionType, OptionsChain, ProviderError};
pub use pricing::BlackScholes;
pub use report::{format_report, AnalysisResult};
pub use scanner::{AnalysisError, AnalysisRequest, RiskReversalScanner, ScanOutcome};
