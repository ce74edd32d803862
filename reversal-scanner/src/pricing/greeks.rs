//! Greeks annotation for a chain side.

use rust_decimal::Decimal;

use super::black_scholes::BlackScholes;
use crate::data::OptionQuote;

/// Return copies of `quotes` with `vega` and `delta` populated.
///
/// Each quote is priced with its own implied volatility and option type.
/// Nothing is filtered; the output has the same length and order as the input.
pub fn annotate_greeks(
    quotes: &[OptionQuote],
    underlying_price: Decimal,
    time: f64,
    bs: &BlackScholes,
) -> Vec<OptionQuote> {
    let spot: f64 = underlying_price.try_into().unwrap_or(0.0);

    quotes
        .iter()
        .map(|quote| {
            let strike: f64 = quote.strike.try_into().unwrap_or(0.0);
            let vol = quote.implied_volatility;
            let vega = bs.vega(spot, strike, time, vol);
            let delta = bs.delta(spot, strike, time, vol, quote.option_type);
            quote.with_greeks(vega, delta)
        })
        .collect()
}
