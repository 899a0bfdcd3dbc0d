use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{to_json_binary, Addr, Binary, CosmosMsg, StdResult, WasmMsg};
use cw_ownable::{cw_ownable_execute, cw_ownable_query};

pub use cw721::{msg::OwnerOfResponse, receiver::Cw721ReceiveMsg};

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: Option<String>, // Defaults to the instantiator
    pub name: String,
    pub symbol: String,
}

#[cw_serde]
pub struct FactoryWhitelistEntry {
    pub factory: String,
    pub whitelisted: bool,
}

#[cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    /// Toggle which factories may mint (only owner)
    WhitelistFactories { entries: Vec<FactoryWhitelistEntry> },
    /// Mint the next token id to `owner`, recording the account bound to it (whitelisted factories only)
    Mint {
        owner: String,
        account: String,
        implementation: u64,
    },
    /// Same wire format as cw721 `TransferNft`
    TransferNft { recipient: String, token_id: String },
    /// Transfer and notify the receiving contract with a cw721 `ReceiveNft`
    SendNft {
        contract: String,
        token_id: String,
        msg: Binary,
    },
}

#[cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Answers like a cw721 contract. Tokens carry no approvals and never expire.
    #[returns(OwnerOfResponse)]
    OwnerOf {
        token_id: String,
        include_expired: Option<bool>,
    },
    #[returns(TokenAccountResponse)]
    TokenAccount { token_id: String },
    #[returns(u64)]
    NumTokens {},
    #[returns(ContractInfoResponse)]
    ContractInfo {},
    #[returns(bool)]
    IsFactoryWhitelisted { factory: String },
}

#[cw_serde]
pub struct TokenAccountResponse {
    pub account: Addr,
    pub implementation: u64,
}

#[cw_serde]
pub struct ContractInfoResponse {
    pub name: String,
    pub symbol: String,
}

#[cw_serde]
enum ReceiverExecuteMsg {
    ReceiveNft(Cw721ReceiveMsg),
}

/// Hook message delivering `receive` to `contract_addr`, as cw721 `SendNft` does.
pub fn receive_nft_msg(
    receive: Cw721ReceiveMsg,
    contract_addr: impl Into<String>,
) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: contract_addr.into(),
        msg: to_json_binary(&ReceiverExecuteMsg::ReceiveNft(receive))?,
        funds: vec![],
    }))
}
