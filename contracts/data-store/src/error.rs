use cosmwasm_std::StdError;
use cw_denom::DenomError;
use cw_ownable::OwnershipError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error(transparent)]
    Denom(#[from] DenomError),

    #[error("Address zero")]
    AddressZero,

    #[error("Index {index} out of range, {length} named addresses stored")]
    OutOfRange { index: u64, length: u64 },

    #[error("Named address {0} is not set")]
    NamedAddressNotSet(String),
}
