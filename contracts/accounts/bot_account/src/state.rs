use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

use botkit_account_utils::diamond::Selector;

#[cw_serde]
pub struct BoundToken {
    pub token_contract: Addr,
    pub token_id: String,
}

pub const BOUND_TOKEN: Item<BoundToken> = Item::new("bound_token");
/// Bumped once per `Execute`, never decreases
pub const STATE: Item<u64> = Item::new("state");
/// Guarded calls currently in flight
pub const GUARD_DEPTH: Item<u32> = Item::new("guard_depth");
/// Set once by `Initialize`
pub const DATA_STORE: Item<Addr> = Item::new("data_store");
pub const SUPPORTED_INTERFACES: Map<u32, bool> = Map::new("supported_interfaces");

// Routing table. Selectors are keyed by their big-endian u32 form.
pub const SELECTOR_FACETS: Map<u32, Addr> = Map::new("selector_facets");
pub const FACET_SELECTORS: Map<&Addr, Vec<Selector>> = Map::new("facet_selectors");
/// Facets in the order they were first routed to
pub const FACET_ADDRESSES: Item<Vec<Addr>> = Item::new("facet_addresses");
