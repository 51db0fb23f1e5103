use crate::curve_math::{coefficients_bounded, coefficients_of, reserves_of};
use crate::decay_math::{decay, DecayOutcome};
use crate::full_math::{checked_mul_div, q128, scale, zero};
use crate::price_math::{leverage_ratio, select_price};
use perp_types::{
    minimum_reserve, Error, MarketState, PoolParams, PoolState, PriceData, Reserves, Side,
    StateTransition, MAX_K, MAX_RESERVE, MINIMUM_SUPPLY,
};
use soroban_sdk::{Env, U256};

/// Everything the engine needs to price one swap
#[derive(Clone, Debug)]
pub struct SwapInput<'a> {
    pub params: &'a PoolParams,
    pub state: &'a PoolState,
    pub prices: &'a PriceData,
    /// Ledger timestamp of the swap
    pub now: u64,
    pub side_in: Side,
    pub side_out: Side,
    pub amount_in: u128,
    /// Ledger supply of the side paid in (ignored for Reserve)
    pub supply_in: u128,
    /// Ledger supply of the side paid out (ignored for Reserve)
    pub supply_out: u128,
    /// Vesting multiplier on the close leg (Q128, 1.0 when opening)
    pub maturity_ratio: U256,
}

/// Full result of a swap computation
#[derive(Clone, Debug)]
pub struct SwapComputation {
    pub market: MarketState,
    pub decay: DecayOutcome,
    pub transition: StateTransition,
    /// State to persist
    pub state: PoolState,
}

fn minimum_reserve_error(side: Side) -> Error {
    match side {
        Side::Long => Error::MinimumReserveA,
        Side::Short => Error::MinimumReserveB,
        _ => Error::MinimumReserveC,
    }
}

/// Check pool parameters for `initialize`
pub fn validate_params(env: &Env, params: &PoolParams) -> Result<(), Error> {
    let zero = zero(env);
    let one = q128(env);
    if params.mark == zero || params.k == 0 || params.open_rate == zero {
        return Err(Error::ZeroParam);
    }
    if params.k > MAX_K
        || params.open_rate > one
        || params.maturity_rate > one
        || params.discount_rate > one
    {
        return Err(Error::InvalidParam);
    }
    Ok(())
}

/// Check the opening state and return its split at `price`.
///
/// Every side starts at or above its reserve floor, which also keeps the 1:1
/// initial mint above MINIMUM_SUPPLY.
pub fn initial_reserves(
    env: &Env,
    params: &PoolParams,
    r: u128,
    a: &U256,
    b: &U256,
    price: &U256,
) -> Result<Reserves, Error> {
    let zero = zero(env);
    if r == 0 || a == &zero || b == &zero {
        return Err(Error::ZeroParam);
    }
    if r > MAX_RESERVE || !coefficients_bounded(env, a, b, r) {
        return Err(Error::InvalidParam);
    }
    let state = PoolState {
        r,
        a: a.clone(),
        b: b.clone(),
        last_update: 0,
    };
    let xk = leverage_ratio(env, price, &params.mark, params.k);
    let reserves = reserves_of(env, &state, &xk);
    for side in [Side::Long, Side::Short, Side::Neutral] {
        if reserves.of(side) < minimum_reserve(side).max(MINIMUM_SUPPLY) {
            return Err(minimum_reserve_error(side));
        }
    }
    Ok(reserves)
}

/// Decode and check the side pair and amount of a swap request
pub fn validate_swap(side_in: u32, side_out: u32, amount_in: u128) -> Result<(Side, Side), Error> {
    let side_in = Side::from_code(side_in).ok_or(Error::InvalidSideIn)?;
    let side_out = Side::from_code(side_out).ok_or(Error::InvalidSideOut)?;
    if side_in == side_out {
        return Err(Error::SameSide);
    }
    if amount_in == 0 {
        return Err(Error::ZeroParam);
    }
    if amount_in > MAX_RESERVE {
        return Err(Error::Overflow);
    }
    Ok((side_in, side_out))
}

/// Split of the reserve at `price` after decaying to `now`
pub fn live_reserves(env: &Env, params: &PoolParams, state: &PoolState, price: &U256, now: u64) -> DecayOutcome {
    let xk = leverage_ratio(env, price, &params.mark, params.k);
    let reserves = reserves_of(env, state, &xk);
    let elapsed = now.saturating_sub(state.last_update);
    decay(
        env,
        &reserves,
        elapsed,
        params.interest_hl,
        params.premium_hl,
        params.fee_rate,
    )
}

/// Market snapshot the transition is applied to: selected price, curve
/// split at that price and elapsed-time decay.
pub fn prepare(env: &Env, input: &SwapInput) -> (MarketState, DecayOutcome) {
    let price = select_price(&input.prices.spot, &input.prices.twap, input.side_in, input.side_out);
    let xk = leverage_ratio(env, &price, &input.params.mark, input.params.k);
    let reserves = reserves_of(env, input.state, &xk);
    let elapsed = input.now.saturating_sub(input.state.last_update);
    let outcome = decay(
        env,
        &reserves,
        elapsed,
        input.params.interest_hl,
        input.params.premium_hl,
        input.params.fee_rate,
    );

    let market = MarketState {
        price,
        xk,
        reserves: outcome.reserves,
        supply_in: if input.side_in.is_position() { input.supply_in } else { 0 },
        supply_out: if input.side_out.is_position() { input.supply_out } else { 0 },
        maturity_ratio: input.maturity_ratio.clone(),
        open_rate: input.params.open_rate.clone(),
    };
    (market, outcome)
}

/// Apply a swap to a market snapshot.
///
/// Close leg: the burned share of the side's reserve is released, scaled by
/// the maturity ratio; the withheld part stays with rC. Open leg: Reserve
/// receives the payout, Long/Short receive `payout · open_rate` with the rest
/// going to rC, Neutral receives the full payout.
///
/// A leg that takes at least one unit of value from the payer must return
/// something. Burning tokens worth less than a unit (a side priced to zero)
/// is accepted with a zero output.
pub fn transition(
    env: &Env,
    market: &MarketState,
    side_in: Side,
    side_out: Side,
    amount_in: u128,
) -> Result<StateTransition, Error> {
    let mut reserves = market.reserves;

    let (value, payout) = match reserves.of_mut(side_in) {
        None => (amount_in, amount_in),
        Some(r_in) => {
            let supply = market.supply_in;
            if supply < amount_in || supply - amount_in < MINIMUM_SUPPLY {
                return Err(Error::MinimumSupply);
            }
            let value = checked_mul_div(env, amount_in, *r_in, supply).ok_or(Error::Overflow)?;
            *r_in -= value;
            let payout = scale(env, value, &market.maturity_ratio).min(value);
            reserves.r_c += value - payout;
            (value, payout)
        }
    };

    let amount_out = match side_out {
        Side::Reserve => payout,
        Side::Long | Side::Short => {
            let credited = scale(env, payout, &market.open_rate).min(payout);
            let r_out = reserves.of(side_out);
            if r_out == 0 {
                return Err(minimum_reserve_error(side_out));
            }
            let minted = mint_amount(env, credited, market.supply_out, r_out)?;
            if let Some(r) = reserves.of_mut(side_out) {
                *r += credited;
            }
            reserves.r_c += payout - credited;
            minted
        }
        Side::Neutral => {
            if reserves.r_c == 0 {
                return Err(Error::MinimumReserveC);
            }
            let minted = mint_amount(env, payout, market.supply_out, reserves.r_c)?;
            reserves.r_c += payout;
            minted
        }
    };

    if amount_out == 0 && value > 0 {
        return Err(Error::InsufficientPayment);
    }
    if side_out != Side::Reserve && reserves.of(side_out) < minimum_reserve(side_out) {
        return Err(minimum_reserve_error(side_out));
    }
    Ok(StateTransition { reserves, amount_out })
}

// Tokens minted for `credited` value at the side's current supply/reserve
fn mint_amount(env: &Env, credited: u128, supply: u128, reserve: u128) -> Result<u128, Error> {
    let minted = checked_mul_div(env, credited, supply, reserve).ok_or(Error::Overflow)?;
    supply.checked_add(minted).ok_or(Error::Overflow)?;
    Ok(minted)
}

/// New persisted state from a transition: coefficients re-derived at the
/// snapshot's xk so the next evaluation at this price reproduces the split.
pub fn settle(env: &Env, market: &MarketState, transition: &StateTransition, now: u64) -> Result<PoolState, Error> {
    let total = transition.reserves.total();
    if total > MAX_RESERVE {
        return Err(Error::Overflow);
    }
    let (a, b) = coefficients_of(env, &transition.reserves, &market.xk)?;
    Ok(PoolState {
        r: total,
        a,
        b,
        last_update: now,
    })
}

/// prepare, transition and settle in one call
pub fn compute_swap(env: &Env, input: &SwapInput) -> Result<SwapComputation, Error> {
    let (market, decay) = prepare(env, input);
    let transition = transition(env, &market, input.side_in, input.side_out, input.amount_in)?;
    let state = settle(env, &market, &transition, input.now)?;
    Ok(SwapComputation {
        market,
        decay,
        transition,
        state,
    })
}
