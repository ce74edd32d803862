//! Black-Scholes pricing primitives.
//!
//! Only the pieces the screener consumes are implemented: d1, delta and
//! vega, plus the standard normal density and distribution. The CDF uses
//! the Abramowitz-Stegun 7.1.26 error-function approximation
//! (|error| <= 1.5e-7), so no statistics crate is involved.

use std::f64::consts::{PI, SQRT_2};

use crate::data::OptionType;

/// Default risk-free rate used when scanning.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.045;

/// Default continuous dividend yield.
pub const DEFAULT_DIVIDEND_YIELD: f64 = 0.0;

/// Black-Scholes calculator for Greeks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    /// Risk-free interest rate
    pub rate: f64,
    /// Continuous dividend yield
    pub dividend: f64,
}

impl Default for BlackScholes {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RISK_FREE_RATE,
            dividend: DEFAULT_DIVIDEND_YIELD,
        }
    }
}

impl BlackScholes {
    pub fn new(rate: f64, dividend: f64) -> Self {
        Self { rate, dividend }
    }

    /// Calculate d1.
    ///
    /// With no time or no volatility left the option is pure intrinsic value,
    /// so d1 collapses to +inf (spot above strike) or -inf.
    pub fn d1(&self, spot: f64, strike: f64, time: f64, vol: f64) -> f64 {
        if time <= 0.0 || vol <= 0.0 {
            return if spot > strike {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
        }

        let numerator =
            (spot / strike).ln() + (self.rate - self.dividend + 0.5 * vol * vol) * time;
        numerator / (vol * time.sqrt())
    }

    /// Calculate delta.
    pub fn delta(&self, spot: f64, strike: f64, time: f64, vol: f64, opt_type: OptionType) -> f64 {
        if time <= 0.0 {
            return match opt_type {
                OptionType::Call => {
                    if spot > strike {
                        1.0
                    } else {
                        0.0
                    }
                }
                OptionType::Put => {
                    if spot < strike {
                        -1.0
                    } else {
                        0.0
                    }
                }
            };
        }

        let d1 = self.d1(spot, strike, time, vol);
        let discount = (-self.dividend * time).exp();

        match opt_type {
            OptionType::Call => discount * norm_cdf(d1),
            OptionType::Put => discount * (norm_cdf(d1) - 1.0),
        }
    }

    /// Calculate vega (same for calls and puts).
    /// Returns vega per 1% change in volatility.
    pub fn vega(&self, spot: f64, strike: f64, time: f64, vol: f64) -> f64 {
        if time <= 0.0 || vol <= 0.0 {
            return 0.0;
        }

        let d1 = self.d1(spot, strike, time, vol);
        let discount = (-self.dividend * time).exp();

        spot * discount * norm_pdf(d1) * time.sqrt() / 100.0
    }
}

/// Standard normal PDF.
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Standard normal CDF.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Error function, Abramowitz-Stegun 7.1.26.
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    let y = 1.0 - poly * (-x * x).exp();

    sign * y
}
