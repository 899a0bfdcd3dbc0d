#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response};
use cw2::set_contract_version;

use botkit_bot_nft_utils::{
    ContractInfoResponse, ExecuteMsg, InstantiateMsg, OwnerOfResponse, QueryMsg,
    TokenAccountResponse,
};

use crate::{
    error::ContractError,
    state::{CollectionInfo, TokenInfo, COLLECTION_INFO, FACTORY_WHITELIST, NUM_TOKENS, TOKENS},
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

    COLLECTION_INFO.save(
        deps.storage,
        &CollectionInfo {
            name: msg.name,
            symbol: msg.symbol,
        },
    )?;
    NUM_TOKENS.save(deps.storage, &0)?;

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
    cw_utils::nonpayable(&info)?;

    match msg {
        ExecuteMsg::UpdateOwnership(action) => {
            let ownership = cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;
            Ok(Response::new()
                .add_attribute("method", "update_ownership")
                .add_attributes(ownership.into_attributes()))
        }
        ExecuteMsg::WhitelistFactories { entries } => {
            execute::whitelist_factories(deps, info, entries)
        }
        ExecuteMsg::Mint {
            owner,
            account,
            implementation,
        } => execute::mint(deps, info, owner, account, implementation),
        ExecuteMsg::TransferNft {
            recipient,
            token_id,
        } => execute::transfer_nft(deps, info, recipient, token_id),
        ExecuteMsg::SendNft {
            contract,
            token_id,
            msg,
        } => execute::send_nft(deps, info, contract, token_id, msg),
    }
}

mod execute {
    use cosmwasm_std::{Addr, Binary, DepsMut, Event, MessageInfo, Response};
    use cw_ownable::assert_owner;

    use botkit_bot_nft_utils::{receive_nft_msg, Cw721ReceiveMsg, FactoryWhitelistEntry};

    use crate::{
        state::{TokenInfo, FACTORY_WHITELIST, NUM_TOKENS, TOKENS},
        ContractError,
    };

    pub fn whitelist_factories(
        deps: DepsMut,
        info: MessageInfo,
        entries: Vec<FactoryWhitelistEntry>,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info.sender)?;

        let mut events = Vec::with_capacity(entries.len());
        for FactoryWhitelistEntry {
            factory,
            whitelisted,
        } in entries
        {
            let factory = deps.api.addr_validate(&factory)?;
            FACTORY_WHITELIST.save(deps.storage, &factory, &whitelisted)?;

            events.push(
                Event::new("factory_whitelisted")
                    .add_attribute("factory", factory)
                    .add_attribute("whitelisted", whitelisted.to_string()),
            );
        }

        Ok(Response::new()
            .add_attribute("method", "whitelist_factories")
            .add_events(events))
    }

    pub fn mint(
        deps: DepsMut,
        info: MessageInfo,
        owner: String,
        account: String,
        implementation: u64,
    ) -> Result<Response, ContractError> {
        let whitelisted = FACTORY_WHITELIST
            .may_load(deps.storage, &info.sender)?
            .unwrap_or_default();
        if !whitelisted {
            return Err(ContractError::FactoryNotWhitelisted(info.sender.to_string()));
        }

        let owner = deps.api.addr_validate(&owner)?;
        let account = deps.api.addr_validate(&account)?;

        let minted = NUM_TOKENS.load(deps.storage)? + 1;
        NUM_TOKENS.save(deps.storage, &minted)?;
        let token_id = minted.to_string();
        TOKENS.save(
            deps.storage,
            &token_id,
            &TokenInfo {
                owner: owner.clone(),
                account: account.clone(),
                implementation,
            },
        )?;

        Ok(Response::new()
            .add_attribute("method", "mint")
            .add_attribute("account", account)
            .add_event(transfer_event(None, owner.as_str(), &token_id)))
    }

    pub fn transfer_nft(
        deps: DepsMut,
        info: MessageInfo,
        recipient: String,
        token_id: String,
    ) -> Result<Response, ContractError> {
        let recipient = deps.api.addr_validate(&recipient)?;
        move_token(deps, &info.sender, &recipient, &token_id)?;

        Ok(Response::new()
            .add_attribute("method", "transfer_nft")
            .add_event(transfer_event(
                Some(info.sender.as_str()),
                recipient.as_str(),
                &token_id,
            )))
    }

    pub fn send_nft(
        deps: DepsMut,
        info: MessageInfo,
        contract: String,
        token_id: String,
        msg: Binary,
    ) -> Result<Response, ContractError> {
        let contract = deps.api.addr_validate(&contract)?;
        move_token(deps, &info.sender, &contract, &token_id)?;

        let event = transfer_event(Some(info.sender.as_str()), contract.as_str(), &token_id);
        // Receiver gets to reject the transfer by failing
        let hook = receive_nft_msg(
            Cw721ReceiveMsg {
                sender: info.sender.to_string(),
                token_id,
                msg,
            },
            &contract,
        )?;

        Ok(Response::new()
            .add_message(hook)
            .add_attribute("method", "send_nft")
            .add_event(event))
    }

    fn move_token(
        deps: DepsMut,
        sender: &Addr,
        recipient: &Addr,
        token_id: &str,
    ) -> Result<(), ContractError> {
        let mut token = TOKENS
            .may_load(deps.storage, token_id)?
            .ok_or_else(|| ContractError::TokenNotFound(token_id.to_string()))?;
        if token.owner != *sender {
            return Err(ContractError::NotTokenOwner(token_id.to_string()));
        }

        token.owner = recipient.clone();
        TOKENS.save(deps.storage, token_id, &token)?;
        Ok(())
    }

    // Mints carry no `from`
    fn transfer_event(from: Option<&str>, to: &str, token_id: &str) -> Event {
        let event = Event::new("transfer");
        let event = match from {
            Some(from) => event.add_attribute("from", from),
            None => event,
        };
        event
            .add_attribute("to", to)
            .add_attribute("token_id", token_id)
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Ownership {} => Ok(to_json_binary(&cw_ownable::get_ownership(deps.storage)?)?),
        QueryMsg::OwnerOf { token_id, .. } => {
            let token = load_token(deps, &token_id)?;
            Ok(to_json_binary(&OwnerOfResponse {
                owner: token.owner.to_string(),
                approvals: vec![],
            })?)
        }
        QueryMsg::TokenAccount { token_id } => {
            let token = load_token(deps, &token_id)?;
            Ok(to_json_binary(&TokenAccountResponse {
                account: token.account,
                implementation: token.implementation,
            })?)
        }
        QueryMsg::NumTokens {} => Ok(to_json_binary(&NUM_TOKENS.load(deps.storage)?)?),
        QueryMsg::ContractInfo {} => {
            let CollectionInfo { name, symbol } = COLLECTION_INFO.load(deps.storage)?;
            Ok(to_json_binary(&ContractInfoResponse { name, symbol })?)
        }
        QueryMsg::IsFactoryWhitelisted { factory } => {
            let factory = deps.api.addr_validate(&factory)?;
            let whitelisted = FACTORY_WHITELIST
                .may_load(deps.storage, &factory)?
                .unwrap_or_default();
            Ok(to_json_binary(&whitelisted)?)
        }
    }
}

fn load_token(deps: Deps, token_id: &str) -> Result<TokenInfo, ContractError> {
    TOKENS
        .may_load(deps.storage, token_id)?
        .ok_or_else(|| ContractError::TokenNotFound(token_id.to_string()))
}
