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

    #[error("Factory {0} is not whitelisted")]
    FactoryNotWhitelisted(String),

    #[error("Token {0} does not exist")]
    TokenNotFound(String),

    #[error("Sender is not the owner of token {0}")]
    NotTokenOwner(String),
}
