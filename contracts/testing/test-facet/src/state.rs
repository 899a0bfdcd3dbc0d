use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

use crate::msg::CallOutcome;

pub const OUTCOMES: Item<Vec<CallOutcome>> = Item::new("outcomes");
/// Label of the last `Setup` run, keyed by caller
pub const SETUPS: Map<&Addr, String> = Map::new("setups");
