//! Closed-form option valuation

mod black_scholes;

pub use black_scholes::{
    call_price, d1, d2, delta, delta_call, delta_put, norm_cdf, price, put_price,
};
