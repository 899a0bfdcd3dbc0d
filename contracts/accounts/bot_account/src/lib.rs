pub mod contract;
mod diamond;
mod helpers;
pub mod state;

pub use botkit_account_utils::error::ContractError;

#[cfg(test)]
mod tests;
