use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal};
use cw_storage_plus::{Item, Map};

/// Whitelist key of the global override (never a valid address).
pub const GLOBAL_OVERRIDE_KEY: &str = "";
/// Wildcard token key used for default fees.
pub const ANY_TOKEN: &str = "";

#[cw_serde]
pub struct StoredFee {
    pub fee_percent: Decimal,
    pub fee_receiver: Option<Addr>,
}

// name -> (1-based index, address)
pub const NAMED_ADDRESSES: Map<&str, (u64, Addr)> = Map::new("named_addresses");
pub const NAMED_ADDRESS_NAMES: Map<u64, String> = Map::new("named_address_names");
pub const NAMED_ADDRESS_COUNT: Item<u64> = Item::new("named_address_count");

pub const MODULE_WHITELIST: Map<&str, bool> = Map::new("module_whitelist");

// (swap type, token in, token out)
pub const SWAP_FEES: Map<(u64, &str, &str), StoredFee> = Map::new("swap_fees");
pub const FLASH_LOAN_FEES: Map<&str, StoredFee> = Map::new("flash_loan_fees");
