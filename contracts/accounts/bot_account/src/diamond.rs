use cosmwasm_std::{Addr, StdResult, Storage};

use botkit_account_utils::diamond::{Facet, Selector};

use crate::{
    state::{FACET_ADDRESSES, FACET_SELECTORS, SELECTOR_FACETS},
    ContractError,
};

pub fn facet_address(storage: &dyn Storage, selector: Selector) -> StdResult<Option<Addr>> {
    SELECTOR_FACETS.may_load(storage, selector.to_u32())
}

pub fn facet_selectors(storage: &dyn Storage, facet: &Addr) -> StdResult<Vec<Selector>> {
    Ok(FACET_SELECTORS
        .may_load(storage, facet)?
        .unwrap_or_default())
}

pub fn facet_addresses(storage: &dyn Storage) -> StdResult<Vec<Addr>> {
    Ok(FACET_ADDRESSES.may_load(storage)?.unwrap_or_default())
}

pub fn facets(storage: &dyn Storage) -> StdResult<Vec<Facet>> {
    facet_addresses(storage)?
        .into_iter()
        .map(|facet_address| {
            let function_selectors = facet_selectors(storage, &facet_address)?;
            Ok(Facet {
                facet_address,
                function_selectors,
            })
        })
        .collect()
}

pub fn add_functions(
    storage: &mut dyn Storage,
    facet: &Addr,
    selectors: &[Selector],
) -> Result<(), ContractError> {
    for selector in selectors {
        if SELECTOR_FACETS.has(storage, selector.to_u32()) {
            return Err(ContractError::AddFunctionDuplicate(*selector));
        }
        route(storage, *selector, facet)?;
    }
    Ok(())
}

/// Drops `selectors` from the table. Selectors routed to `account` itself are immutable.
pub fn remove_functions(
    storage: &mut dyn Storage,
    account: &Addr,
    selectors: &[Selector],
) -> Result<(), ContractError> {
    for selector in selectors {
        let current = routed_mutable(storage, account, *selector)?;
        unroute(storage, *selector, &current)?;
    }
    Ok(())
}

pub fn replace_functions(
    storage: &mut dyn Storage,
    account: &Addr,
    facet: &Addr,
    selectors: &[Selector],
) -> Result<(), ContractError> {
    for selector in selectors {
        let current = routed_mutable(storage, account, *selector)?;
        if current == *facet {
            return Err(ContractError::ReplaceFunctionSame(*selector));
        }
        unroute(storage, *selector, &current)?;
        route(storage, *selector, facet)?;
    }
    Ok(())
}

fn routed_mutable(
    storage: &dyn Storage,
    account: &Addr,
    selector: Selector,
) -> Result<Addr, ContractError> {
    let current = facet_address(storage, selector)?
        .ok_or(ContractError::RemoveFunctionDoesNotExist(selector))?;
    if current == *account {
        return Err(ContractError::RemoveFunctionImmutable(selector));
    }
    Ok(current)
}

fn route(storage: &mut dyn Storage, selector: Selector, facet: &Addr) -> StdResult<()> {
    SELECTOR_FACETS.save(storage, selector.to_u32(), facet)?;

    let mut selectors = facet_selectors(storage, facet)?;
    if selectors.is_empty() {
        let mut facets = facet_addresses(storage)?;
        facets.push(facet.clone());
        FACET_ADDRESSES.save(storage, &facets)?;
    }
    selectors.push(selector);
    FACET_SELECTORS.save(storage, facet, &selectors)
}

fn unroute(storage: &mut dyn Storage, selector: Selector, facet: &Addr) -> StdResult<()> {
    SELECTOR_FACETS.remove(storage, selector.to_u32());

    let mut selectors = facet_selectors(storage, facet)?;
    selectors.retain(|s| *s != selector);
    if !selectors.is_empty() {
        return FACET_SELECTORS.save(storage, facet, &selectors);
    }

    // Last selector gone, the facet leaves the enumeration
    FACET_SELECTORS.remove(storage, facet);
    let mut facets = facet_addresses(storage)?;
    facets.retain(|f| f != facet);
    FACET_ADDRESSES.save(storage, &facets)
}
