use cosmwasm_std::{Addr, Api, Deps, Env, StdResult, Storage};
use cw721::msg::OwnerOfResponse;

use botkit_data_store_utils::QueryMsg as DataStoreQueryMsg;

use crate::{
    state::{BOUND_TOKEN, DATA_STORE, GUARD_DEPTH},
    ContractError,
};

/// Current holder of the bound token. Never cached.
pub fn token_owner(deps: Deps) -> StdResult<Addr> {
    let token = BOUND_TOKEN.load(deps.storage)?;
    let res: OwnerOfResponse = deps.querier.query_wasm_smart(
        &token.token_contract,
        &cw721_base::msg::QueryMsg::OwnerOf {
            token_id: token.token_id,
            include_expired: None,
        },
    )?;
    deps.api.addr_validate(&res.owner)
}

pub fn is_token_holder(deps: Deps, signer: &Addr) -> StdResult<bool> {
    Ok(token_owner(deps)? == *signer)
}

/// The account may also act on itself, for `Multicall` and nested calls.
pub fn check_signer(deps: Deps, env: &Env, signer: &Addr) -> Result<(), ContractError> {
    if *signer == env.contract.address || is_token_holder(deps, signer)? {
        return Ok(());
    }
    Err(ContractError::InvalidSigner(signer.to_string()))
}

pub fn guard_entered(storage: &dyn Storage) -> StdResult<bool> {
    Ok(GUARD_DEPTH.may_load(storage)?.unwrap_or_default() > 0)
}

pub fn check_not_entered(storage: &dyn Storage) -> Result<(), ContractError> {
    if guard_entered(storage)? {
        return Err(ContractError::ReentrancyGuard);
    }
    Ok(())
}

pub fn enter_guard(storage: &mut dyn Storage) -> StdResult<()> {
    let depth = GUARD_DEPTH.may_load(storage)?.unwrap_or_default();
    GUARD_DEPTH.save(storage, &(depth + 1))
}

pub fn release_guard(storage: &mut dyn Storage) -> StdResult<()> {
    let depth = GUARD_DEPTH.may_load(storage)?.unwrap_or_default();
    GUARD_DEPTH.save(storage, &depth.saturating_sub(1))
}

/// Asks the data store whether `module` may be routed to. Nothing is
/// installable before the account is initialized.
pub fn check_module(deps: Deps, module: &Addr) -> Result<(), ContractError> {
    let Some(data_store) = DATA_STORE.may_load(deps.storage)? else {
        return Err(ContractError::ModuleNotWhitelisted(module.to_string()));
    };

    let installable: bool = deps.querier.query_wasm_smart(
        data_store,
        &DataStoreQueryMsg::ModuleCanBeInstalled {
            module: module.to_string(),
        },
    )?;
    if !installable {
        return Err(ContractError::ModuleNotWhitelisted(module.to_string()));
    }
    Ok(())
}

/// Empty addresses stand for the zero address.
pub fn validate_optional(api: &dyn Api, addr: Option<String>) -> StdResult<Option<Addr>> {
    addr.filter(|addr| !addr.is_empty())
        .map(|addr| api.addr_validate(&addr))
        .transpose()
}
