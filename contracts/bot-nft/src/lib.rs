pub mod contract;
mod error;
pub mod state;

pub use crate::error::ContractError;
