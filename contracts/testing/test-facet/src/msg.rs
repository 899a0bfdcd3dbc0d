use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Binary;

#[cw_serde]
pub struct InstantiateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    /// Answers with `data` as response data
    Echo { data: Binary },
    Fail { reason: String },
    /// Smart-queries `account` with `msg` and records the outcome
    QueryAccount { account: String, msg: Binary },
    /// Calls `account` with `msg` and records the outcome without failing
    ExecuteAccount { account: String, msg: Binary },
    /// Init module entry point, remembers `label` for the caller
    Setup { label: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Binary)]
    Echo { data: Binary },
    #[returns(Vec<CallOutcome>)]
    Outcomes {},
    #[returns(Option<String>)]
    Setup { caller: String },
}

#[cw_serde]
pub struct CallOutcome {
    pub ok: bool,
    /// Response JSON on success, error text otherwise
    pub detail: String,
}
