use cosmwasm_std::StdError;
use cw_ownable::OwnershipError;
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("Bot creation settings {0} do not exist")]
    SettingsDoesNotExist(u64),

    #[error("Bot creation settings {0} are paused")]
    CreationSettingsPaused(u64),

    #[error("Bot implementation code {0} is not stored")]
    ImplementationNotFound(u64),
}
