use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct TokenInfo {
    pub owner: Addr,
    pub account: Addr,
    pub implementation: u64,
}

#[cw_serde]
pub struct CollectionInfo {
    pub name: String,
    pub symbol: String,
}

pub const COLLECTION_INFO: Item<CollectionInfo> = Item::new("collection_info");
// Also the last minted id, tokens are numbered from 1
pub const NUM_TOKENS: Item<u64> = Item::new("num_tokens");
// Token ids are the decimal mint sequence, as cw721 ids are strings
pub const TOKENS: Map<&str, TokenInfo> = Map::new("tokens");
pub const FACTORY_WHITELIST: Map<&Addr, bool> = Map::new("factory_whitelist");
