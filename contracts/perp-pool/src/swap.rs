use crate::invariants::{check_swap, transition_matches, SwapCheck};
use crate::maturity::{commit_close, commit_open, ratio_for_close, record_after_open};
use crate::storage::{get_config, get_state, set_state};
use perp_math::{is_saturated, prepare, settle, transition, validate_swap, SwapInput};
use perp_types::{
    Error, PositionLedgerClient, PriceFeedClient, Side, SwapHelperClient, SwapParams, SwapResult,
};
use soroban_sdk::{log, token, Address, Env, Symbol};

fn to_amount(value: u128) -> Result<i128, Error> {
    i128::try_from(value).map_err(|_| Error::Overflow)
}

/// Price and apply a swap for `owner`.
///
/// Everything is computed and checked before the first write. With `commit`
/// unset nothing is written and no tokens move, which is how `quote` runs.
pub fn execute_swap(env: &Env, owner: &Address, params: &SwapParams, commit: bool) -> Result<SwapResult, Error> {
    let config = get_config(env)?;
    let state = get_state(env)?;
    let (side_in, side_out) = validate_swap(params.side_in, params.side_out, params.amount_in)?;
    let amount_in = params.amount_in;

    let reserve_token = token::Client::new(env, &config.reserve_token);
    let ledger = PositionLedgerClient::new(env, &config.ledger);
    let pool = env.current_contract_address();
    let now = env.ledger().timestamp();

    // Payment
    let held_in = match side_in {
        Side::Reserve => u128::try_from(reserve_token.balance(owner)).unwrap_or(0),
        side => ledger.balance(owner, &side.code()),
    };
    if held_in < amount_in {
        return Err(Error::InsufficientPayment);
    }

    let supply_of = |side: Side| {
        if side.is_position() {
            ledger.total_supply(&side.code())
        } else {
            0
        }
    };
    let supply_in = supply_of(side_in);
    let supply_out = supply_of(side_out);
    let maturity_ratio = ratio_for_close(env, &config.params, owner, side_in, now)?;
    let prices = PriceFeedClient::new(env, &config.oracle).fetch();

    let input = SwapInput {
        params: &config.params,
        state: &state,
        prices: &prices,
        now,
        side_in,
        side_out,
        amount_in,
        supply_in,
        supply_out,
        maturity_ratio,
    };
    let (market, decay) = prepare(env, &input);
    if is_saturated(env, &market.xk) {
        log!(env, "price ratio clamped", market.price.clone());
    }
    let derived = transition(env, &market, side_in, side_out, amount_in)?;

    if let Some(helper) = &params.helper {
        let proposed = SwapHelperClient::new(env, helper).swap_to_state(&market, params);
        if !transition_matches(&derived, &proposed) {
            log!(env, "helper transition rejected", helper.clone());
            return Err(Error::StateIntegrity);
        }
    }

    let new_state = settle(env, &market, &derived, now)?;
    let amount_out = derived.amount_out;
    let paid_in = if side_in == Side::Reserve { amount_in } else { 0 };
    let paid_out = if side_out == Side::Reserve { amount_out } else { 0 };
    check_swap(
        env,
        &SwapCheck {
            before: &state,
            after: &new_state,
            xk: &market.xk,
            paid_in,
            paid_out,
            fee: decay.fee,
            burned: side_in.is_position().then_some((supply_in, amount_in)),
        },
    )?;

    let opened = if side_out.is_position() {
        let held_out = ledger.balance(owner, &side_out.code());
        Some(record_after_open(env, &config.params, owner, side_out, held_out, amount_out, now)?)
    } else {
        None
    };

    let result = SwapResult {
        amount_out,
        fee: decay.fee,
    };
    if !commit {
        return Ok(result);
    }

    set_state(env, &new_state);

    match side_in {
        Side::Reserve => reserve_token.transfer(owner, &pool, &to_amount(amount_in)?),
        side => {
            ledger.burn(owner, &side.code(), &amount_in);
            commit_close(env, owner, side, held_in - amount_in);
        }
    }
    match side_out {
        Side::Reserve => reserve_token.transfer(&pool, owner, &to_amount(amount_out)?),
        side => {
            if let (Some(record), true) = (&opened, amount_out > 0) {
                ledger.mint(owner, &side.code(), &amount_out);
                commit_open(env, owner, side, record);
            }
        }
    }

    if decay.fee > 0 {
        reserve_token.transfer(&pool, &config.fee_to, &to_amount(decay.fee)?);
        env.events().publish(
            (Symbol::new(env, "fee"), config.fee_to.clone()),
            (decay.fee, decay.interest),
        );
    }

    env.events().publish(
        (Symbol::new(env, "swap"), owner.clone()),
        (params.side_in, params.side_out, amount_in, amount_out, market.price),
    );
    log!(env, "swap", new_state.r, decay.interest, decay.premium);

    Ok(result)
}
