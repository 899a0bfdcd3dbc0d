use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

use botkit_factory_utils::BotCreationSettings;

pub const BOT_NFT: Item<Addr> = Item::new("bot_nft");
/// Settings ids run from 1 to the count, entries are never removed
pub const SETTINGS_COUNT: Item<u64> = Item::new("settings_count");
pub const CREATION_SETTINGS: Map<u64, BotCreationSettings> = Map::new("creation_settings");
