//! Option pricing.
//!
//! Provides:
//! - Black-Scholes d1, delta and vega with an erf-based normal CDF
//! - Greeks annotation of option chain sides

pub mod black_scholes;
pub mod greeks;

pub use black_scholes::{norm_cdf, norm_pdf, BlackScholes, DEFAULT_DIVIDEND_YIELD, DEFAULT_RISK_FREE_RATE};
pub use greeks::annotate_greeks;
