use cosmwasm_std::StdError;
use thiserror::Error;

use crate::diamond::Selector;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // Authorization
    #[error("Invalid signer: {0} does not hold the bound token")]
    InvalidSigner(String),

    // State violations
    #[error("Account already initialized")]
    AlreadyInitialized,

    #[error("Function {0} already exists")]
    AddFunctionDuplicate(Selector),

    #[error("Cannot remove function {0}: it does not exist")]
    RemoveFunctionDoesNotExist(Selector),

    #[error("Cannot remove function {0}: it is immutable")]
    RemoveFunctionImmutable(Selector),

    #[error("Function {0} already routes to this facet")]
    ReplaceFunctionSame(Selector),

    #[error("Reentrancy guard: call rejected while another call is in flight")]
    ReentrancyGuard,

    #[error("Ownership cycle: the account cannot hold its own token")]
    OwnershipCycle,

    // Validation
    #[error("Address zero")]
    AddressZero,

    #[error("Address must be zero for remove")]
    AddressNotZero,

    #[error("Length zero")]
    LengthZero,

    #[error("Length mismatch")]
    LengthMismatch,

    #[error("{0} is not a contract")]
    NotAContract(String),

    // Permission gates
    #[error("Module {0} is not whitelisted")]
    ModuleNotWhitelisted(String),

    #[error("Only calls are allowed")]
    OnlyCallsAllowed,

    // Propagated failures
    #[error("Call reverted: {0}")]
    RevertWithReason(String),

    #[error("Delegate call failed")]
    DelegateCallFailed,

    #[error("Diamond: function {0} does not exist")]
    FunctionDoesNotExist(Selector),
}

impl ContractError {
    /// Maps the error of a forwarded call onto the error surfaced by the account.
    pub fn propagated(reason: String) -> Self {
        if reason.is_empty() {
            ContractError::DelegateCallFailed
        } else {
            ContractError::RevertWithReason(reason)
        }
    }
}
