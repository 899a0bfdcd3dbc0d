#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, to_json_vec, Binary, ContractResult, Deps, DepsMut, Empty, Env, MessageInfo,
    QueryRequest, Reply, Response, StdError, SubMsgResult, SystemResult, WasmQuery,
};
use cw2::set_contract_version;

use botkit_account_utils::{
    diamond::{account_selectors, DEFAULT_INTERFACES},
    msg::{
        ExecuteMsg, ImplementationResponse, InstantiateMsg, QueryMsg, TokenResponse,
        GUARD_ENTERED, GUARD_NOT_ENTERED,
    },
};

use crate::{
    diamond,
    helpers::{check_not_entered, guard_entered, is_token_holder, release_guard, token_owner},
    state::{BoundToken, BOUND_TOKEN, DATA_STORE, GUARD_DEPTH, STATE, SUPPORTED_INTERFACES},
    ContractError,
};

// version info for migration info
const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const EXECUTE_REPLY_ID: u64 = 1;
pub const FALLBACK_REPLY_ID: u64 = 2;
pub const DELEGATE_REPLY_ID: u64 = 3;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let token_contract = deps.api.addr_validate(&msg.token_contract)?;
    BOUND_TOKEN.save(
        deps.storage,
        &BoundToken {
            token_contract: token_contract.clone(),
            token_id: msg.token_id.clone(),
        },
    )?;
    STATE.save(deps.storage, &0)?;
    GUARD_DEPTH.save(deps.storage, &0)?;

    // The account's own functions route to itself and can never be cut out
    diamond::add_functions(deps.storage, &env.contract.address, &account_selectors())?;
    for interface_id in DEFAULT_INTERFACES {
        SUPPORTED_INTERFACES.save(deps.storage, interface_id.to_u32(), &true)?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("token_contract", token_contract)
        .add_attribute("token_id", msg.token_id))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Initialize { data_store } => execute::initialize(deps, env, info, data_store),
        ExecuteMsg::Execute {
            target,
            value,
            data,
            operation,
        } => execute::execute_call(deps, env, info, target, value, data, operation),
        ExecuteMsg::Multicall { msgs } => execute::multicall(deps, env, info, msgs),
        ExecuteMsg::DiamondCut {
            cuts,
            init,
            init_msg,
        } => execute::diamond_cut(deps, env, info, cuts, init, init_msg),
        ExecuteMsg::UpdateSupportedInterfaces {
            interface_ids,
            support,
        } => execute::update_supported_interfaces(deps, env, info, interface_ids, support),
        ExecuteMsg::ReceiveNft(receive) => execute::receive_nft(deps, info, receive),
        ExecuteMsg::Fallback { selector, msg } => {
            execute::fallback(deps, env, info, selector, msg)
        }
    }
}

mod execute {
    use cosmwasm_std::{
        from_json, BankMsg, Binary, Coin, CosmosMsg, DepsMut, Env, Event, MessageInfo, Response,
        SubMsg, WasmMsg,
    };

    use botkit_account_utils::{
        diamond::{FacetCut, FacetCutAction, InterfaceId, Selector},
        msg::{ExecuteMsg, OPERATION_CALL},
    };
    use botkit_bot_nft_utils::Cw721ReceiveMsg;

    use crate::{
        contract::{DELEGATE_REPLY_ID, EXECUTE_REPLY_ID, FALLBACK_REPLY_ID},
        diamond,
        helpers::{check_module, check_not_entered, check_signer, enter_guard, validate_optional},
        state::{BOUND_TOKEN, DATA_STORE, STATE, SUPPORTED_INTERFACES},
        ContractError,
    };

    pub fn initialize(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        data_store: String,
    ) -> Result<Response, ContractError> {
        check_not_entered(deps.storage)?;
        check_signer(deps.as_ref(), &env, &info.sender)?;

        if DATA_STORE.exists(deps.storage) {
            return Err(ContractError::AlreadyInitialized);
        }
        if data_store.is_empty() {
            return Err(ContractError::AddressZero);
        }
        let data_store = deps.api.addr_validate(&data_store)?;
        DATA_STORE.save(deps.storage, &data_store)?;

        Ok(Response::new()
            .add_attribute("method", "initialize")
            .add_attribute("data_store", data_store))
    }

    pub fn execute_call(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        target: String,
        value: Vec<Coin>,
        data: Binary,
        operation: u8,
    ) -> Result<Response, ContractError> {
        check_signer(deps.as_ref(), &env, &info.sender)?;
        if operation != OPERATION_CALL {
            return Err(ContractError::OnlyCallsAllowed);
        }
        if target.is_empty() {
            return Err(ContractError::AddressZero);
        }
        let target = deps.api.addr_validate(&target)?;

        let state = STATE.load(deps.storage)? + 1;
        STATE.save(deps.storage, &state)?;
        let response = Response::new()
            .add_attribute("method", "execute")
            .add_attribute("target", target.clone())
            .add_attribute("state", state.to_string());

        // Nothing to call and nothing to send
        if data.is_empty() && value.iter().all(|coin| coin.amount.is_zero()) {
            return Ok(response);
        }
        // Released in the reply
        enter_guard(deps.storage)?;

        let msg: CosmosMsg = if data.is_empty() {
            BankMsg::Send {
                to_address: target.to_string(),
                amount: value,
            }
            .into()
        } else {
            WasmMsg::Execute {
                contract_addr: target.to_string(),
                msg: data,
                funds: value,
            }
            .into()
        };

        Ok(response.add_submessage(SubMsg::reply_always(msg, EXECUTE_REPLY_ID)))
    }

    pub fn multicall(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        msgs: Vec<Binary>,
    ) -> Result<Response, ContractError> {
        if msgs.is_empty() {
            return Ok(Response::new()
                .add_attribute("method", "multicall")
                .add_attribute("calls", "0"));
        }
        check_signer(deps.as_ref(), &env, &info.sender)?;

        let calls = msgs.len();
        let self_calls = msgs
            .into_iter()
            .map(|payload| {
                from_json::<ExecuteMsg>(&payload)?;
                Ok(WasmMsg::Execute {
                    contract_addr: env.contract.address.to_string(),
                    msg: payload,
                    funds: vec![],
                })
            })
            .collect::<Result<Vec<_>, ContractError>>()?;

        Ok(Response::new()
            .add_messages(self_calls)
            .add_attribute("method", "multicall")
            .add_attribute("calls", calls.to_string()))
    }

    pub fn diamond_cut(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        cuts: Vec<FacetCut>,
        init: Option<String>,
        init_msg: Binary,
    ) -> Result<Response, ContractError> {
        check_signer(deps.as_ref(), &env, &info.sender)?;

        let mut event = Event::new("diamond_cut").add_attribute("cuts", cuts.len().to_string());
        for FacetCut {
            facet_address,
            action,
            function_selectors,
        } in cuts
        {
            if function_selectors.is_empty() {
                return Err(ContractError::LengthZero);
            }
            // Any non-empty address on Remove is rejected, valid or not
            let facet_address = facet_address.filter(|facet| !facet.is_empty());

            let (key, facet) = match (action, facet_address) {
                (FacetCutAction::Remove, Some(_)) => return Err(ContractError::AddressNotZero),
                (FacetCutAction::Remove, None) => {
                    diamond::remove_functions(
                        deps.storage,
                        &env.contract.address,
                        &function_selectors,
                    )?;
                    ("remove", "none".to_string())
                }
                (FacetCutAction::Add | FacetCutAction::Replace, None) => {
                    return Err(ContractError::AddressZero)
                }
                (FacetCutAction::Add, Some(facet)) => {
                    let facet = deps.api.addr_validate(&facet)?;
                    check_module(deps.as_ref(), &facet)?;
                    diamond::add_functions(deps.storage, &facet, &function_selectors)?;
                    ("add", facet.to_string())
                }
                (FacetCutAction::Replace, Some(facet)) => {
                    let facet = deps.api.addr_validate(&facet)?;
                    check_module(deps.as_ref(), &facet)?;
                    diamond::replace_functions(
                        deps.storage,
                        &env.contract.address,
                        &facet,
                        &function_selectors,
                    )?;
                    ("replace", facet.to_string())
                }
            };

            event = event.add_attribute(
                key,
                format!("{facet}:{}", join_selectors(&function_selectors)),
            );
        }

        let mut response = Response::new().add_attribute("method", "diamond_cut");
        if let Some(init) = validate_optional(deps.api, init)? {
            if deps.querier.query_wasm_contract_info(&init).is_err() {
                return Err(ContractError::NotAContract(init.to_string()));
            }
            check_module(deps.as_ref(), &init)?;

            response = response.add_submessage(SubMsg::reply_on_error(
                WasmMsg::Execute {
                    contract_addr: init.to_string(),
                    msg: init_msg,
                    funds: vec![],
                },
                DELEGATE_REPLY_ID,
            ));
            event = event.add_attribute("init", init);
        }

        Ok(response.add_event(event))
    }

    pub fn update_supported_interfaces(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        interface_ids: Vec<InterfaceId>,
        support: Vec<bool>,
    ) -> Result<Response, ContractError> {
        check_not_entered(deps.storage)?;
        check_signer(deps.as_ref(), &env, &info.sender)?;
        if interface_ids.len() != support.len() {
            return Err(ContractError::LengthMismatch);
        }

        let mut events = Vec::with_capacity(interface_ids.len());
        for (interface_id, supported) in interface_ids.into_iter().zip(support) {
            SUPPORTED_INTERFACES.save(deps.storage, interface_id.to_u32(), &supported)?;
            events.push(
                Event::new("interface_support_updated")
                    .add_attribute("interface_id", interface_id.to_string())
                    .add_attribute("supported", supported.to_string()),
            );
        }

        Ok(Response::new()
            .add_attribute("method", "update_supported_interfaces")
            .add_events(events))
    }

    pub fn receive_nft(
        deps: DepsMut,
        info: MessageInfo,
        receive: Cw721ReceiveMsg,
    ) -> Result<Response, ContractError> {
        let token = BOUND_TOKEN.load(deps.storage)?;
        // One hop only: the account may not hold the token it is bound to
        if info.sender == token.token_contract && receive.token_id == token.token_id {
            return Err(ContractError::OwnershipCycle);
        }

        Ok(Response::new()
            .add_attribute("method", "receive_nft")
            .add_attribute("token_contract", info.sender)
            .add_attribute("token_id", receive.token_id)
            .add_attribute("sender", receive.sender))
    }

    pub fn fallback(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        selector: Selector,
        msg: Binary,
    ) -> Result<Response, ContractError> {
        check_not_entered(deps.storage)?;
        check_signer(deps.as_ref(), &env, &info.sender)?;

        let facet = diamond::facet_address(deps.storage, selector)?
            .ok_or(ContractError::FunctionDoesNotExist(selector))?;
        enter_guard(deps.storage)?;

        Ok(Response::new()
            .add_submessage(SubMsg::reply_always(
                WasmMsg::Execute {
                    contract_addr: facet.to_string(),
                    msg,
                    funds: info.funds,
                },
                FALLBACK_REPLY_ID,
            ))
            .add_attribute("method", "fallback")
            .add_attribute("selector", selector.to_string())
            .add_attribute("facet", facet))
    }

    fn join_selectors(selectors: &[Selector]) -> String {
        selectors
            .iter()
            .map(Selector::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        EXECUTE_REPLY_ID | FALLBACK_REPLY_ID => match msg.result {
            SubMsgResult::Ok(response) => {
                release_guard(deps.storage)?;

                #[allow(deprecated)]
                let data = response.data;
                let mut response = Response::new().add_attribute("method", "release_guard");
                if let Some(data) = data {
                    response = response.set_data(data);
                }
                Ok(response)
            }
            SubMsgResult::Err(reason) => Err(ContractError::propagated(reason)),
        },
        // Only failures come back
        DELEGATE_REPLY_ID => match msg.result {
            SubMsgResult::Err(reason) => Err(ContractError::propagated(reason)),
            SubMsgResult::Ok(_) => Ok(Response::new()),
        },
        _ => Err(ContractError::Std(StdError::generic_err("unknown reply id"))),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    if !is_reenterable(&msg) {
        check_not_entered(deps.storage)?;
    }

    match msg {
        QueryMsg::Owner {} => Ok(to_json_binary(&token_owner(deps)?)?),
        QueryMsg::Token {} => {
            let token = BOUND_TOKEN.load(deps.storage)?;
            Ok(to_json_binary(&TokenResponse {
                chain_id: env.block.chain_id,
                token_contract: token.token_contract,
                token_id: token.token_id,
            })?)
        }
        QueryMsg::State {} => Ok(to_json_binary(&STATE.load(deps.storage)?)?),
        QueryMsg::IsValidSigner { signer } => {
            let signer = deps.api.addr_validate(&signer)?;
            Ok(to_json_binary(&is_token_holder(deps, &signer)?)?)
        }
        QueryMsg::Implementation {} => {
            let info = deps
                .querier
                .query_wasm_contract_info(&env.contract.address)?;
            Ok(to_json_binary(&ImplementationResponse {
                code_id: info.code_id,
            })?)
        }
        QueryMsg::DataStore {} => Ok(to_json_binary(&DATA_STORE.may_load(deps.storage)?)?),
        QueryMsg::ReentrancyGuardState {} => {
            let state = if guard_entered(deps.storage)? {
                GUARD_ENTERED
            } else {
                GUARD_NOT_ENTERED
            };
            Ok(to_json_binary(&state)?)
        }
        QueryMsg::SupportsInterface { interface_id } => {
            let supported = SUPPORTED_INTERFACES
                .may_load(deps.storage, interface_id.to_u32())?
                .unwrap_or_default();
            Ok(to_json_binary(&supported)?)
        }
        QueryMsg::Facets {} => Ok(to_json_binary(&diamond::facets(deps.storage)?)?),
        QueryMsg::FacetAddresses {} => {
            Ok(to_json_binary(&diamond::facet_addresses(deps.storage)?)?)
        }
        QueryMsg::FacetFunctionSelectors { facet } => {
            let facet = deps.api.addr_validate(&facet)?;
            Ok(to_json_binary(&diamond::facet_selectors(
                deps.storage,
                &facet,
            )?)?)
        }
        QueryMsg::FacetAddress { selector } => Ok(to_json_binary(&diamond::facet_address(
            deps.storage,
            selector,
        )?)?),
        QueryMsg::Fallback { selector, msg } => {
            let facet = diamond::facet_address(deps.storage, selector)?
                .ok_or(ContractError::FunctionDoesNotExist(selector))?;

            let request: QueryRequest<Empty> = WasmQuery::Smart {
                contract_addr: facet.to_string(),
                msg,
            }
            .into();
            match deps.querier.raw_query(&to_json_vec(&request)?) {
                SystemResult::Ok(ContractResult::Ok(data)) => Ok(data),
                SystemResult::Ok(ContractResult::Err(reason)) => {
                    Err(ContractError::propagated(reason))
                }
                SystemResult::Err(err) => Err(ContractError::propagated(err.to_string())),
            }
        }
    }
}

// Everything else is rejected while a guarded call is in flight
fn is_reenterable(msg: &QueryMsg) -> bool {
    matches!(
        msg,
        QueryMsg::DataStore {}
            | QueryMsg::ReentrancyGuardState {}
            | QueryMsg::SupportsInterface { .. }
    )
}
