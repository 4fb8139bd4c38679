use crate::market_data::OptionKind;
use crate::{Error, Result};
use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// Standard normal CDF
///
/// Φ(x) = erfc(-x / √2) / 2, which keeps full precision in both tails.
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Reject inputs the closed form cannot take (log of S/K, division by σ√t)
#[inline]
fn validate(spot: f64, strike: f64, vol: f64, time: f64) -> Result<f64> {
    for (name, value) in [
        ("spot", spot),
        ("strike", strike),
        ("volatility", vol),
        ("time to expiry", time),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "{} must be positive and finite, got {}",
                name, value
            )));
        }
    }

    let vol_sqrt_t = vol * time.sqrt();
    if vol_sqrt_t <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "σ√t underflows to zero (σ={}, t={})",
            vol, time
        )));
    }

    Ok(vol_sqrt_t)
}

/// Black-Scholes d1 with zero rate and no dividend
///
/// d1 = (ln(S/K) + σ²t/2) / (σ√t)
pub fn d1(spot: f64, strike: f64, vol: f64, time: f64) -> Result<f64> {
    let vol_sqrt_t = validate(spot, strike, vol, time)?;
    Ok(((spot / strike).ln() + 0.5 * vol * vol * time) / vol_sqrt_t)
}

/// Black-Scholes d2 = d1 − σ√t
pub fn d2(spot: f64, strike: f64, vol: f64, time: f64) -> Result<f64> {
    Ok(d1(spot, strike, vol, time)? - vol * time.sqrt())
}

/// European call value: S·Φ(d1) − K·Φ(d2)
pub fn call_price(spot: f64, strike: f64, vol: f64, time: f64) -> Result<f64> {
    let d1 = d1(spot, strike, vol, time)?;
    let d2 = d1 - vol * time.sqrt();
    Ok(spot * norm_cdf(d1) - strike * norm_cdf(d2))
}

/// European put value: −S·Φ(−d1) + K·Φ(−d2)
pub fn put_price(spot: f64, strike: f64, vol: f64, time: f64) -> Result<f64> {
    let d1 = d1(spot, strike, vol, time)?;
    let d2 = d1 - vol * time.sqrt();
    Ok(-spot * norm_cdf(-d1) + strike * norm_cdf(-d2))
}

/// Call delta: Φ(d1)
pub fn delta_call(spot: f64, strike: f64, vol: f64, time: f64) -> Result<f64> {
    Ok(norm_cdf(d1(spot, strike, vol, time)?))
}

/// Put delta: −Φ(−d1)
pub fn delta_put(spot: f64, strike: f64, vol: f64, time: f64) -> Result<f64> {
    Ok(-norm_cdf(-d1(spot, strike, vol, time)?))
}

/// Value of a call or put
pub fn price(kind: OptionKind, spot: f64, strike: f64, vol: f64, time: f64) -> Result<f64> {
    match kind {
        OptionKind::Call => call_price(spot, strike, vol, time),
        OptionKind::Put => put_price(spot, strike, vol, time),
    }
}

/// Delta of a call or put
pub fn delta(kind: OptionKind, spot: f64, strike: f64, vol: f64, time: f64) -> Result<f64> {
    match kind {
        OptionKind::Call => delta_call(spot, strike, vol, time),
        OptionKind::Put => delta_put(spot, strike, vol, time),
    }
}
