use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Decimal};
use cw_denom::UncheckedDenom;
use cw_ownable::{cw_ownable_execute, cw_ownable_query};

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: Option<String>, // Defaults to the instantiator
}

#[cw_serde]
pub struct NamedAddressEntry {
    pub name: String,
    pub address: String,
}

/// `module: None` is the global override: while it is whitelisted every
/// module can be installed.
#[cw_serde]
pub struct ModuleWhitelistEntry {
    pub module: Option<String>,
    pub whitelisted: bool,
}

/// Fee configuration as posted by the owner.
///
/// `fee_percent` is a fraction of `Decimal::one()`. Posting exactly one (or more)
/// records an explicit zero fee. A missing `fee_receiver` means the data store
/// itself collects the fee.
#[cw_serde]
pub struct FeeConfig {
    pub fee_percent: Decimal,
    pub fee_receiver: Option<String>,
}

/// Tokens are native denoms or contract addresses; `None` is the wildcard
/// entry used when no exact pair is configured.
#[cw_serde]
pub struct SwapFeeEntry {
    pub swap_type: u64,
    pub token_in: Option<String>,
    pub token_out: Option<String>,
    pub fee: FeeConfig,
}

#[cw_serde]
pub struct FlashLoanFeeEntry {
    pub token: Option<String>,
    pub fee: FeeConfig,
}

#[cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    SetNamedAddresses { entries: Vec<NamedAddressEntry> },
    SetModuleWhitelist { entries: Vec<ModuleWhitelistEntry> },
    SetSwapFees { entries: Vec<SwapFeeEntry> },
    SetFlashLoanFees { entries: Vec<FlashLoanFeeEntry> },
    /// Send the whole balance of every listed denom to the owner
    Sweep { denoms: Vec<UncheckedDenom> },
}

#[cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Whether `module` may be routed by accounts (honours the global override)
    #[returns(bool)]
    ModuleCanBeInstalled { module: String },
    /// Raw whitelist flag, no override applied
    #[returns(bool)]
    ModuleWhitelisted { module: Option<String> },
    #[returns(Addr)]
    NamedAddress { name: String },
    #[returns(TryNamedAddressResponse)]
    TryNamedAddress { name: String },
    #[returns(u64)]
    NamedAddressesLength {},
    /// 1-based
    #[returns(NamedAddressResponse)]
    NamedAddressByIndex { index: u64 },
    #[returns(FeeResponse)]
    SwapFee {
        swap_type: u64,
        token_in: Option<String>,
        token_out: Option<String>,
    },
    #[returns(StoredFeeResponse)]
    StoredSwapFee {
        swap_type: u64,
        token_in: Option<String>,
        token_out: Option<String>,
    },
    #[returns(FeeResponse)]
    FlashLoanFee { token: Option<String> },
    #[returns(StoredFeeResponse)]
    StoredFlashLoanFee { token: Option<String> },
}

#[cw_serde]
pub struct TryNamedAddressResponse {
    pub success: bool,
    pub address: Option<Addr>,
}

#[cw_serde]
pub struct NamedAddressResponse {
    pub name: String,
    pub address: Addr,
}

/// Effective fee: defaults applied, sentinel collapsed, receiver resolved.
#[cw_serde]
pub struct FeeResponse {
    pub fee_percent: Decimal,
    pub fee_receiver: Addr,
}

/// Exactly what was posted for the key.
#[cw_serde]
pub struct StoredFeeResponse {
    pub fee_percent: Decimal,
    pub fee_receiver: Option<Addr>,
}
