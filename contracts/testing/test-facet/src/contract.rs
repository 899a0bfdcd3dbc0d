#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, to_json_vec, Binary, ContractResult, Deps, DepsMut, Empty, Env, MessageInfo,
    QueryRequest, Reply, Response, StdError, StdResult, Storage, SubMsg, SubMsgResult,
    SystemResult, WasmMsg, WasmQuery,
};

use crate::{
    msg::{CallOutcome, ExecuteMsg, InstantiateMsg, QueryMsg},
    state::{OUTCOMES, SETUPS},
};

const ACCOUNT_CALL_REPLY_ID: u64 = 1;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: InstantiateMsg,
) -> StdResult<Response> {
    OUTCOMES.save(deps.storage, &vec![])?;
    Ok(Response::new().add_attribute("method", "instantiate"))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> StdResult<Response> {
    match msg {
        ExecuteMsg::Echo { data } => Ok(Response::new()
            .add_attribute("method", "echo")
            .set_data(data)),
        ExecuteMsg::Fail { reason } => Err(StdError::generic_err(reason)),
        ExecuteMsg::QueryAccount { account, msg } => {
            let request: QueryRequest<Empty> = WasmQuery::Smart {
                contract_addr: account,
                msg,
            }
            .into();
            let outcome = match deps.querier.raw_query(&to_json_vec(&request)?) {
                SystemResult::Ok(ContractResult::Ok(data)) => CallOutcome {
                    ok: true,
                    detail: String::from_utf8_lossy(data.as_slice()).into_owned(),
                },
                SystemResult::Ok(ContractResult::Err(err)) => CallOutcome {
                    ok: false,
                    detail: err,
                },
                SystemResult::Err(err) => CallOutcome {
                    ok: false,
                    detail: err.to_string(),
                },
            };
            record(deps.storage, outcome)?;

            Ok(Response::new().add_attribute("method", "query_account"))
        }
        ExecuteMsg::ExecuteAccount { account, msg } => Ok(Response::new()
            .add_submessage(SubMsg::reply_always(
                WasmMsg::Execute {
                    contract_addr: account,
                    msg,
                    funds: vec![],
                },
                ACCOUNT_CALL_REPLY_ID,
            ))
            .add_attribute("method", "execute_account")),
        ExecuteMsg::Setup { label } => {
            SETUPS.save(deps.storage, &info.sender, &label)?;
            Ok(Response::new()
                .add_attribute("method", "setup")
                .add_attribute("label", label))
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> StdResult<Response> {
    match msg.id {
        ACCOUNT_CALL_REPLY_ID => {
            let outcome = match msg.result {
                SubMsgResult::Ok(_) => CallOutcome {
                    ok: true,
                    detail: String::new(),
                },
                SubMsgResult::Err(err) => CallOutcome {
                    ok: false,
                    detail: err,
                },
            };
            record(deps.storage, outcome)?;
            Ok(Response::new())
        }
        _ => Err(StdError::generic_err("unknown reply id")),
    }
}

fn record(storage: &mut dyn Storage, outcome: CallOutcome) -> StdResult<()> {
    OUTCOMES.update(storage, |mut outcomes| -> StdResult<_> {
        outcomes.push(outcome);
        Ok(outcomes)
    })?;
    Ok(())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Echo { data } => Ok(data),
        QueryMsg::Outcomes {} => to_json_binary(&OUTCOMES.load(deps.storage)?),
        QueryMsg::Setup { caller } => {
            let caller = deps.api.addr_validate(&caller)?;
            to_json_binary(&SETUPS.may_load(deps.storage, &caller)?)
        }
    }
}
