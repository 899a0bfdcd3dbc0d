use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary};
use cw_ownable::{cw_ownable_execute, cw_ownable_query};

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: Option<String>, // Defaults to the instantiator
    pub bot_nft: String,
}

/// Template the factory stamps bots out of.
#[cw_serde]
pub struct BotCreationSettings {
    /// Code id of the bot account contract
    pub bot_implementation: u64,
    /// Account `ExecuteMsg`s run in order against every new bot, sent by the factory while it holds the token
    pub initialization_calls: Vec<Binary>,
    pub is_paused: bool,
}

#[cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    /// Append new settings under the next id, starting at 1 (only owner)
    PostBotCreationSettings { settings: BotCreationSettings },
    /// Pause or resume existing settings (only owner)
    SetBotCreationSettingsPaused { settings_id: u64, is_paused: bool },
    /// Mint a token and create the bot bound to it. Returns `CreateBotResponse` as data.
    CreateBot { settings_id: u64 },
}

#[cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Addr)]
    BotNft {},
    #[returns(u64)]
    BotCreationSettingsCount {},
    #[returns(BotCreationSettings)]
    BotCreationSettings { settings_id: u64 },
    /// What `CreateBot` would return against the current state
    #[returns(CreateBotResponse)]
    PredictBot { settings_id: u64 },
}

#[cw_serde]
pub struct CreateBotResponse {
    pub bot_id: u64,
    pub bot_address: Addr,
}
