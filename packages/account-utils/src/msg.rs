use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{to_json_binary, Addr, Binary, Coin, CosmosMsg, StdResult, WasmMsg};

use botkit_bot_nft_utils::Cw721ReceiveMsg;

use crate::diamond::{Facet, FacetCut, InterfaceId, Selector};

/// Plain call, the only operation type accounts execute.
pub const OPERATION_CALL: u8 = 0;

pub const GUARD_NOT_ENTERED: u8 = 1;
pub const GUARD_ENTERED: u8 = 2;

#[cw_serde]
pub struct InstantiateMsg {
    pub token_contract: String, // NFT registry holding the bound token
    pub token_id: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// One-shot setup pointing the account at its data store (token holder only)
    Initialize { data_store: String },
    /// Call `target` with `data` and `value`. Empty `data` sends `value` as a bank transfer.
    Execute {
        target: String,
        value: Vec<Coin>,
        data: Binary,
        operation: u8,
    },
    /// Run every payload (a JSON encoded `ExecuteMsg`) against the account itself, in order
    Multicall { msgs: Vec<Binary> },
    /// Mutate the routing table, then optionally call `init` with `init_msg` on behalf of the account
    DiamondCut {
        cuts: Vec<FacetCut>,
        init: Option<String>,
        init_msg: Binary,
    },
    UpdateSupportedInterfaces {
        interface_ids: Vec<InterfaceId>,
        support: Vec<bool>,
    },
    /// cw721 `SendNft` hook called by NFT registries
    ReceiveNft(Cw721ReceiveMsg),
    /// Dispatch `msg` to the facet routed for `selector`
    Fallback { selector: Selector, msg: Binary },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Addr)]
    Owner {},
    #[returns(TokenResponse)]
    Token {},
    #[returns(u64)]
    State {},
    #[returns(bool)]
    IsValidSigner { signer: String },
    #[returns(ImplementationResponse)]
    Implementation {},
    #[returns(Option<Addr>)]
    DataStore {},
    #[returns(u8)]
    ReentrancyGuardState {},
    #[returns(bool)]
    SupportsInterface { interface_id: InterfaceId },
    #[returns(Vec<Facet>)]
    Facets {},
    #[returns(Vec<Addr>)]
    FacetAddresses {},
    #[returns(Vec<Selector>)]
    FacetFunctionSelectors { facet: String },
    #[returns(Option<Addr>)]
    FacetAddress { selector: Selector },
    /// Raw response of the facet routed for `selector`
    #[returns(Binary)]
    Fallback { selector: Selector, msg: Binary },
}

#[cw_serde]
pub struct TokenResponse {
    pub chain_id: String,
    pub token_contract: Addr,
    pub token_id: String,
}

#[cw_serde]
pub struct ImplementationResponse {
    pub code_id: u64,
}

/// Builds the message that makes `account` call `target` with `msg`.
pub fn execute_on_account(
    account: impl Into<String>,
    target: impl Into<String>,
    msg: Binary,
    value: Vec<Coin>,
) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: account.into(),
        msg: to_json_binary(&ExecuteMsg::Execute {
            target: target.into(),
            value,
            data: msg,
            operation: OPERATION_CALL,
        })?,
        funds: vec![],
    }))
}
