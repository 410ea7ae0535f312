//! Fund custody: the contract's own balance of the settlement asset.
//!
//! All token movement goes through this module so that the only transfers the
//! contract ever makes are donor → custody, custody → owner and
//! custody → donor.

use soroban_sdk::{token, Address, Env};

use crate::storage;
use crate::Error;

fn client(env: &Env) -> Result<token::Client<'_>, Error> {
    let token = storage::get_token(env)?;
    Ok(token::Client::new(env, &token))
}

/// Current custody balance.
pub fn balance(env: &Env) -> Result<i128, Error> {
    Ok(client(env)?.balance(&env.current_contract_address()))
}

/// Pull `amount` from `from` into custody.
///
/// The donor's balance is checked first so an underfunded donation surfaces as
/// `NotEnoughFunds` instead of a trap inside the token contract.
pub fn collect(env: &Env, from: &Address, amount: i128) -> Result<(), Error> {
    let token = client(env)?;
    if token.balance(from) < amount {
        return Err(Error::NotEnoughFunds);
    }
    token.transfer(from, &env.current_contract_address(), &amount);
    Ok(())
}

/// Pay `amount` out of custody to `to`. Zero amounts are a no-op.
pub fn release(env: &Env, to: &Address, amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Ok(());
    }
    let token = client(env)?;
    token.transfer(&env.current_contract_address(), to, &amount);
    Ok(())
}
