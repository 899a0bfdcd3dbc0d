#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    instantiate2_address, to_json_binary, Addr, Binary, CodeInfoResponse, Deps, DepsMut, Env,
    Event, MessageInfo, Response, StdError,
};
use cw2::set_contract_version;
use sha2::{Digest, Sha256};

use botkit_bot_nft_utils::QueryMsg as BotNftQueryMsg;
use botkit_factory_utils::{
    BotCreationSettings, CreateBotResponse, ExecuteMsg, InstantiateMsg, QueryMsg,
};

use crate::{
    error::ContractError,
    state::{BOT_NFT, CREATION_SETTINGS, SETTINGS_COUNT},
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

    let bot_nft = deps.api.addr_validate(&msg.bot_nft)?;
    BOT_NFT.save(deps.storage, &bot_nft)?;
    SETTINGS_COUNT.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("bot_nft", bot_nft)
        .add_attributes(ownership.into_attributes()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;

    match msg {
        ExecuteMsg::UpdateOwnership(action) => {
            let ownership = cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;
            Ok(Response::new()
                .add_attribute("method", "update_ownership")
                .add_attributes(ownership.into_attributes()))
        }
        ExecuteMsg::PostBotCreationSettings { settings } => {
            execute::post_bot_creation_settings(deps, info, settings)
        }
        ExecuteMsg::SetBotCreationSettingsPaused {
            settings_id,
            is_paused,
        } => execute::set_bot_creation_settings_paused(deps, info, settings_id, is_paused),
        ExecuteMsg::CreateBot { settings_id } => execute::create_bot(deps, env, info, settings_id),
    }
}

mod execute {
    use cosmwasm_std::{to_json_binary, DepsMut, Env, Event, MessageInfo, Response, WasmMsg};
    use cw_ownable::assert_owner;

    use botkit_account_utils::msg::InstantiateMsg as BotAccountInstantiateMsg;
    use botkit_bot_nft_utils::ExecuteMsg as BotNftExecuteMsg;
    use botkit_factory_utils::BotCreationSettings;

    use crate::{
        contract::{paused_event, predict_bot},
        state::{BOT_NFT, CREATION_SETTINGS, SETTINGS_COUNT},
        ContractError,
    };

    pub fn post_bot_creation_settings(
        deps: DepsMut,
        info: MessageInfo,
        settings: BotCreationSettings,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info.sender)?;

        deps.querier
            .query_wasm_code_info(settings.bot_implementation)
            .map_err(|_| ContractError::ImplementationNotFound(settings.bot_implementation))?;

        let settings_id = SETTINGS_COUNT.load(deps.storage)? + 1;
        SETTINGS_COUNT.save(deps.storage, &settings_id)?;
        CREATION_SETTINGS.save(deps.storage, settings_id, &settings)?;

        Ok(Response::new()
            .add_attribute("method", "post_bot_creation_settings")
            .add_event(
                Event::new("bot_creation_settings_posted")
                    .add_attribute("settings_id", settings_id.to_string())
                    .add_attribute("bot_implementation", settings.bot_implementation.to_string())
                    .add_attribute(
                        "initialization_calls",
                        settings.initialization_calls.len().to_string(),
                    ),
            )
            .add_event(paused_event(settings_id, settings.is_paused)))
    }

    pub fn set_bot_creation_settings_paused(
        deps: DepsMut,
        info: MessageInfo,
        settings_id: u64,
        is_paused: bool,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info.sender)?;

        let mut settings = CREATION_SETTINGS
            .may_load(deps.storage, settings_id)?
            .ok_or(ContractError::SettingsDoesNotExist(settings_id))?;
        settings.is_paused = is_paused;
        CREATION_SETTINGS.save(deps.storage, settings_id, &settings)?;

        Ok(Response::new()
            .add_attribute("method", "set_bot_creation_settings_paused")
            .add_event(paused_event(settings_id, is_paused)))
    }

    pub fn create_bot(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        settings_id: u64,
    ) -> Result<Response, ContractError> {
        let (settings, salt, created) = predict_bot(deps.as_ref(), &env, settings_id)?;
        let bot_nft = BOT_NFT.load(deps.storage)?;

        // The factory holds the token until every initialization call went through
        let mint = WasmMsg::Execute {
            contract_addr: bot_nft.to_string(),
            msg: to_json_binary(&BotNftExecuteMsg::Mint {
                owner: env.contract.address.to_string(),
                account: created.bot_address.to_string(),
                implementation: settings.bot_implementation,
            })?,
            funds: vec![],
        };
        let instantiate = WasmMsg::Instantiate2 {
            admin: None,
            code_id: settings.bot_implementation,
            label: format!("bot_{}", created.bot_id),
            msg: to_json_binary(&BotAccountInstantiateMsg {
                token_contract: bot_nft.to_string(),
                token_id: created.bot_id.to_string(),
            })?,
            funds: vec![],
            salt,
        };
        let initialization_calls = settings.initialization_calls.into_iter().map(|call| {
            WasmMsg::Execute {
                contract_addr: created.bot_address.to_string(),
                msg: call,
                funds: vec![],
            }
        });
        let hand_over = WasmMsg::Execute {
            contract_addr: bot_nft.to_string(),
            msg: to_json_binary(&BotNftExecuteMsg::TransferNft {
                recipient: info.sender.to_string(),
                token_id: created.bot_id.to_string(),
            })?,
            funds: vec![],
        };

        Ok(Response::new()
            .add_message(mint)
            .add_message(instantiate)
            .add_messages(initialization_calls)
            .add_message(hand_over)
            .add_attribute("method", "create_bot")
            .add_event(
                Event::new("bot_created")
                    .add_attribute("settings_id", settings_id.to_string())
                    .add_attribute("bot_id", created.bot_id.to_string())
                    .add_attribute("bot_address", created.bot_address.to_string())
                    .add_attribute("owner", info.sender),
            )
            .set_data(to_json_binary(&created)?))
    }
}

fn paused_event(settings_id: u64, is_paused: bool) -> Event {
    Event::new("bot_creation_settings_paused")
        .add_attribute("settings_id", settings_id.to_string())
        .add_attribute("is_paused", is_paused.to_string())
}

fn load_settings(deps: Deps, settings_id: u64) -> Result<BotCreationSettings, ContractError> {
    CREATION_SETTINGS
        .may_load(deps.storage, settings_id)?
        .ok_or(ContractError::SettingsDoesNotExist(settings_id))
}

/// Salt binding a bot address to its token: `sha256(chain_id || bot_nft || bot_id)`.
pub fn bot_salt(chain_id: &str, bot_nft: &Addr, bot_id: u64) -> Binary {
    let mut hasher = Sha256::new();
    hasher.update(chain_id.as_bytes());
    hasher.update(bot_nft.as_bytes());
    hasher.update(bot_id.to_be_bytes());
    Binary::from(hasher.finalize().to_vec())
}

/// Resolves what `CreateBot` is about to create against the current state.
fn predict_bot(
    deps: Deps,
    env: &Env,
    settings_id: u64,
) -> Result<(BotCreationSettings, Binary, CreateBotResponse), ContractError> {
    let settings = load_settings(deps, settings_id)?;
    if settings.is_paused {
        return Err(ContractError::CreationSettingsPaused(settings_id));
    }

    let bot_nft = BOT_NFT.load(deps.storage)?;
    let num_tokens: u64 = deps
        .querier
        .query_wasm_smart(&bot_nft, &BotNftQueryMsg::NumTokens {})?;
    let bot_id = num_tokens + 1;

    let salt = bot_salt(&env.block.chain_id, &bot_nft, bot_id);
    let CodeInfoResponse { checksum, .. } = deps
        .querier
        .query_wasm_code_info(settings.bot_implementation)?;
    let creator = deps.api.addr_canonicalize(env.contract.address.as_str())?;
    let canonical = instantiate2_address(checksum.as_slice(), &creator, &salt)
        .map_err(|e| StdError::generic_err(e.to_string()))?;
    let bot_address = deps.api.addr_humanize(&canonical)?;

    Ok((
        settings,
        salt,
        CreateBotResponse {
            bot_id,
            bot_address,
        },
    ))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Ownership {} => Ok(to_json_binary(&cw_ownable::get_ownership(deps.storage)?)?),
        QueryMsg::BotNft {} => Ok(to_json_binary(&BOT_NFT.load(deps.storage)?)?),
        QueryMsg::BotCreationSettingsCount {} => {
            Ok(to_json_binary(&SETTINGS_COUNT.load(deps.storage)?)?)
        }
        QueryMsg::BotCreationSettings { settings_id } => {
            Ok(to_json_binary(&load_settings(deps, settings_id)?)?)
        }
        QueryMsg::PredictBot { settings_id } => {
            let (_, _, created) = predict_bot(deps, &env, settings_id)?;
            Ok(to_json_binary(&created)?)
        }
    }
}
