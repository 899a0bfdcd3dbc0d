#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Decimal, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use botkit_data_store_utils::{
    ExecuteMsg, FeeResponse, InstantiateMsg, NamedAddressResponse, QueryMsg, StoredFeeResponse,
    TryNamedAddressResponse,
};

use crate::{
    error::ContractError,
    state::{
        StoredFee, ANY_TOKEN, FLASH_LOAN_FEES, GLOBAL_OVERRIDE_KEY, MODULE_WHITELIST,
        NAMED_ADDRESSES, NAMED_ADDRESS_COUNT, NAMED_ADDRESS_NAMES, SWAP_FEES,
    },
};

// version info for migration info
const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = msg.owner.unwrap_or_else(|| info.sender.to_string());
    let ownership = cw_ownable::initialize_owner(deps.storage, deps.api, Some(&owner))?;

    NAMED_ADDRESS_COUNT.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attributes(ownership.into_attributes()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::UpdateOwnership(action) => execute::update_ownership(deps, env, info, action),
        ExecuteMsg::SetNamedAddresses { entries } => {
            execute::set_named_addresses(deps, info, entries)
        }
        ExecuteMsg::SetModuleWhitelist { entries } => {
            execute::set_module_whitelist(deps, info, entries)
        }
        ExecuteMsg::SetSwapFees { entries } => execute::set_swap_fees(deps, info, entries),
        ExecuteMsg::SetFlashLoanFees { entries } => {
            execute::set_flash_loan_fees(deps, info, entries)
        }
        ExecuteMsg::Sweep { denoms } => execute::sweep(deps, env, info, denoms),
    }
}

mod execute {
    use cosmwasm_std::{Addr, Api, CosmosMsg, DepsMut, Env, Event, MessageInfo, Response};
    use cw_denom::UncheckedDenom;
    use cw_ownable::{assert_owner, Action};

    use botkit_data_store_utils::{
        FeeConfig, FlashLoanFeeEntry, ModuleWhitelistEntry, NamedAddressEntry, SwapFeeEntry,
    };

    use crate::{
        state::{
            StoredFee, ANY_TOKEN, FLASH_LOAN_FEES, GLOBAL_OVERRIDE_KEY, MODULE_WHITELIST,
            NAMED_ADDRESSES, NAMED_ADDRESS_COUNT, NAMED_ADDRESS_NAMES, SWAP_FEES,
        },
        ContractError,
    };

    pub fn update_ownership(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        action: Action,
    ) -> Result<Response, ContractError> {
        let event = match action {
            Action::TransferOwnership { .. } => "ownership_transfer_started",
            _ => "ownership_transferred",
        };
        let ownership = cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;

        Ok(Response::new()
            .add_attribute("method", "update_ownership")
            .add_event(Event::new(event).add_attributes(ownership.into_attributes())))
    }

    pub fn set_named_addresses(
        deps: DepsMut,
        info: MessageInfo,
        entries: Vec<NamedAddressEntry>,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info.sender)?;

        let mut events = Vec::with_capacity(entries.len());
        for NamedAddressEntry { name, address } in entries {
            if address.is_empty() {
                return Err(ContractError::AddressZero);
            }
            let address = deps.api.addr_validate(&address)?;

            // Existing names keep their index
            let index = match NAMED_ADDRESSES.may_load(deps.storage, &name)? {
                Some((index, _)) => index,
                None => {
                    let index = NAMED_ADDRESS_COUNT.load(deps.storage)? + 1;
                    NAMED_ADDRESS_COUNT.save(deps.storage, &index)?;
                    NAMED_ADDRESS_NAMES.save(deps.storage, index, &name)?;
                    index
                }
            };
            NAMED_ADDRESSES.save(deps.storage, &name, &(index, address.clone()))?;

            events.push(
                Event::new("named_address_set")
                    .add_attribute("name", name)
                    .add_attribute("address", address),
            );
        }

        Ok(Response::new()
            .add_attribute("method", "set_named_addresses")
            .add_events(events))
    }

    pub fn set_module_whitelist(
        deps: DepsMut,
        info: MessageInfo,
        entries: Vec<ModuleWhitelistEntry>,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info.sender)?;

        let mut events = Vec::with_capacity(entries.len());
        for ModuleWhitelistEntry {
            module,
            whitelisted,
        } in entries
        {
            let module = match module {
                Some(module) => deps.api.addr_validate(&module)?.to_string(),
                None => GLOBAL_OVERRIDE_KEY.to_string(),
            };
            MODULE_WHITELIST.save(deps.storage, &module, &whitelisted)?;

            events.push(
                Event::new("module_whitelist_set")
                    .add_attribute("module", display_key(&module))
                    .add_attribute("whitelisted", whitelisted.to_string()),
            );
        }

        Ok(Response::new()
            .add_attribute("method", "set_module_whitelist")
            .add_events(events))
    }

    pub fn set_swap_fees(
        deps: DepsMut,
        info: MessageInfo,
        entries: Vec<SwapFeeEntry>,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info.sender)?;

        let mut events = Vec::with_capacity(entries.len());
        for SwapFeeEntry {
            swap_type,
            token_in,
            token_out,
            fee,
        } in entries
        {
            let token_in = token_in.unwrap_or_else(|| ANY_TOKEN.to_string());
            let token_out = token_out.unwrap_or_else(|| ANY_TOKEN.to_string());
            let fee = stored_fee(deps.api, fee)?;
            SWAP_FEES.save(deps.storage, (swap_type, &token_in, &token_out), &fee)?;

            events.push(
                fee_event("swap_fee_set", &fee)
                    .add_attribute("swap_type", swap_type.to_string())
                    .add_attribute("token_in", display_key(&token_in))
                    .add_attribute("token_out", display_key(&token_out)),
            );
        }

        Ok(Response::new()
            .add_attribute("method", "set_swap_fees")
            .add_events(events))
    }

    pub fn set_flash_loan_fees(
        deps: DepsMut,
        info: MessageInfo,
        entries: Vec<FlashLoanFeeEntry>,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info.sender)?;

        let mut events = Vec::with_capacity(entries.len());
        for FlashLoanFeeEntry { token, fee } in entries {
            let token = token.unwrap_or_else(|| ANY_TOKEN.to_string());
            let fee = stored_fee(deps.api, fee)?;
            FLASH_LOAN_FEES.save(deps.storage, &token, &fee)?;

            events.push(
                fee_event("flash_loan_fee_set", &fee).add_attribute("token", display_key(&token)),
            );
        }

        Ok(Response::new()
            .add_attribute("method", "set_flash_loan_fees")
            .add_events(events))
    }

    pub fn sweep(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        denoms: Vec<UncheckedDenom>,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info.sender)?;

        let mut msgs: Vec<CosmosMsg> = Vec::with_capacity(denoms.len());
        for denom in denoms {
            let denom = denom.into_checked(deps.as_ref())?;
            let balance = denom.query_balance(&deps.querier, &env.contract.address)?;
            if !balance.is_zero() {
                msgs.push(denom.get_transfer_to_message(&info.sender, balance)?);
            }
        }

        Ok(Response::new()
            .add_messages(msgs)
            .add_attribute("method", "sweep")
            .add_attribute("recipient", info.sender))
    }

    fn stored_fee(api: &dyn Api, fee: FeeConfig) -> Result<StoredFee, ContractError> {
        let fee_receiver = fee
            .fee_receiver
            .map(|receiver| api.addr_validate(&receiver))
            .transpose()?;

        Ok(StoredFee {
            fee_percent: fee.fee_percent,
            fee_receiver,
        })
    }

    fn fee_event(ty: &str, fee: &StoredFee) -> Event {
        Event::new(ty)
            .add_attribute("fee_percent", fee.fee_percent.to_string())
            .add_attribute(
                "fee_receiver",
                fee.fee_receiver
                    .as_ref()
                    .map_or_else(|| "data_store".to_string(), Addr::to_string),
            )
    }

    // Attribute values cannot be empty
    fn display_key(key: &str) -> &str {
        if key.is_empty() {
            "any"
        } else {
            key
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Ownership {} => Ok(to_json_binary(&cw_ownable::get_ownership(deps.storage)?)?),
        QueryMsg::ModuleCanBeInstalled { module } => {
            let module = deps.api.addr_validate(&module)?;
            let can_be_installed = is_whitelisted(deps, GLOBAL_OVERRIDE_KEY)?
                || is_whitelisted(deps, module.as_str())?;
            Ok(to_json_binary(&can_be_installed)?)
        }
        QueryMsg::ModuleWhitelisted { module } => {
            let whitelisted = match module {
                Some(module) => is_whitelisted(deps, deps.api.addr_validate(&module)?.as_str())?,
                None => is_whitelisted(deps, GLOBAL_OVERRIDE_KEY)?,
            };
            Ok(to_json_binary(&whitelisted)?)
        }
        QueryMsg::NamedAddress { name } => match NAMED_ADDRESSES.may_load(deps.storage, &name)? {
            Some((_, address)) => Ok(to_json_binary(&address)?),
            None => Err(ContractError::NamedAddressNotSet(name)),
        },
        QueryMsg::TryNamedAddress { name } => {
            let address = NAMED_ADDRESSES
                .may_load(deps.storage, &name)?
                .map(|(_, address)| address);
            Ok(to_json_binary(&TryNamedAddressResponse {
                success: address.is_some(),
                address,
            })?)
        }
        QueryMsg::NamedAddressesLength {} => {
            Ok(to_json_binary(&NAMED_ADDRESS_COUNT.load(deps.storage)?)?)
        }
        QueryMsg::NamedAddressByIndex { index } => {
            let length = NAMED_ADDRESS_COUNT.load(deps.storage)?;
            if index == 0 || index > length {
                return Err(ContractError::OutOfRange { index, length });
            }
            let name = NAMED_ADDRESS_NAMES.load(deps.storage, index)?;
            let (_, address) = NAMED_ADDRESSES.load(deps.storage, &name)?;
            Ok(to_json_binary(&NamedAddressResponse { name, address })?)
        }
        QueryMsg::SwapFee {
            swap_type,
            token_in,
            token_out,
        } => {
            let token_in = token_in.unwrap_or_default();
            let token_out = token_out.unwrap_or_default();
            let stored = match SWAP_FEES.may_load(deps.storage, (swap_type, &token_in, &token_out))? {
                Some(fee) => Some(fee),
                None => SWAP_FEES.may_load(deps.storage, (swap_type, ANY_TOKEN, ANY_TOKEN))?,
            };
            Ok(to_json_binary(&effective_fee(&env, stored))?)
        }
        QueryMsg::StoredSwapFee {
            swap_type,
            token_in,
            token_out,
        } => {
            let token_in = token_in.unwrap_or_default();
            let token_out = token_out.unwrap_or_default();
            let stored = SWAP_FEES.may_load(deps.storage, (swap_type, &token_in, &token_out))?;
            Ok(to_json_binary(&stored_fee_response(stored))?)
        }
        QueryMsg::FlashLoanFee { token } => {
            let token = token.unwrap_or_default();
            let stored = match FLASH_LOAN_FEES.may_load(deps.storage, &token)? {
                Some(fee) => Some(fee),
                None => FLASH_LOAN_FEES.may_load(deps.storage, ANY_TOKEN)?,
            };
            Ok(to_json_binary(&effective_fee(&env, stored))?)
        }
        QueryMsg::StoredFlashLoanFee { token } => {
            let stored = FLASH_LOAN_FEES.may_load(deps.storage, &token.unwrap_or_default())?;
            Ok(to_json_binary(&stored_fee_response(stored))?)
        }
    }
}

fn is_whitelisted(deps: Deps, key: &str) -> StdResult<bool> {
    Ok(MODULE_WHITELIST
        .may_load(deps.storage, key)?
        .unwrap_or_default())
}

/// A stored percent of one or more is an explicit zero fee. Without a receiver
/// the data store collects.
fn effective_fee(env: &Env, stored: Option<StoredFee>) -> FeeResponse {
    match stored {
        Some(StoredFee {
            fee_percent,
            fee_receiver,
        }) => FeeResponse {
            fee_percent: if fee_percent >= Decimal::one() {
                Decimal::zero()
            } else {
                fee_percent
            },
            fee_receiver: fee_receiver.unwrap_or_else(|| env.contract.address.clone()),
        },
        None => FeeResponse {
            fee_percent: Decimal::zero(),
            fee_receiver: env.contract.address.clone(),
        },
    }
}

fn stored_fee_response(stored: Option<StoredFee>) -> StoredFeeResponse {
    stored.map_or(
        StoredFeeResponse {
            fee_percent: Decimal::zero(),
            fee_receiver: None,
        },
        |fee| StoredFeeResponse {
            fee_percent: fee.fee_percent,
            fee_receiver: fee.fee_receiver,
        },
    )
}
