use cosmwasm_std::{testing::MockApi, Addr, Coin, Empty, Uint128};
use cw20::Cw20Coin;
use cw_multi_test::{
    error::AnyResult, next_block, App, AppResponse, Contract, ContractWrapper, Executor,
};
use serde::Serialize;
use std::fmt::Debug;

use botkit_bot_nft_utils as bot_nft;
use botkit_data_store_utils as data_store;

use crate::msg::{ExecuteMsg, InstantiateMsg};

/// Contract wrappers deployed by [`BotTestSuiteBase`].
pub struct BotContracts {
    pub account: Box<dyn Contract<Empty>>,
    pub bot_nft: Box<dyn Contract<Empty>>,
    pub data_store: Box<dyn Contract<Empty>>,
    pub facet: Box<dyn Contract<Empty>>,
}

pub struct BotTestSuiteBase {
    app: App,
    owner: Addr,
    user: Addr,
    account_code_id: u64,
    facet_code_id: u64,
    cw20_code_id: u64,
    bot_nft: Addr,
    data_store: Addr,
}

#[allow(dead_code)]
impl BotTestSuiteBase {
    pub fn new(contracts: BotContracts) -> Self {
        let mut app = App::default();

        let owner = app.api().addr_make("owner");
        let user = app.api().addr_make("user");

        let account_code_id = app.store_code(contracts.account);
        let bot_nft_code_id = app.store_code(contracts.bot_nft);
        let data_store_code_id = app.store_code(contracts.data_store);
        let facet_code_id = app.store_code(contracts.facet);

        let cw20_code = ContractWrapper::new(
            cw20_base::contract::execute,
            cw20_base::contract::instantiate,
            cw20_base::contract::query,
        );
        let cw20_code_id = app.store_code(Box::new(cw20_code));

        let data_store = app
            .instantiate_contract(
                data_store_code_id,
                owner.clone(),
                &data_store::InstantiateMsg { owner: None },
                &[],
                "data_store",
                Some(owner.to_string()),
            )
            .unwrap();

        let bot_nft = app
            .instantiate_contract(
                bot_nft_code_id,
                owner.clone(),
                &bot_nft::InstantiateMsg {
                    owner: None,
                    name: "Bots".to_string(),
                    symbol: "BOT".to_string(),
                },
                &[],
                "bot_nft",
                Some(owner.to_string()),
            )
            .unwrap();

        Self {
            app,
            owner,
            user,
            account_code_id,
            facet_code_id,
            cw20_code_id,
            bot_nft,
            data_store,
        }
    }
}

pub trait BotTestSuite {
    fn app(&self) -> &App;
    fn app_mut(&mut self) -> &mut App;
    /// Owner of the data store and the NFT registry.
    fn owner(&self) -> &Addr;
    /// Default bot holder.
    fn user(&self) -> &Addr;
    fn account_code_id(&self) -> u64;
    fn facet_code_id(&self) -> u64;
    fn cw20_code_id(&self) -> u64;
    fn bot_nft(&self) -> &Addr;
    fn data_store(&self) -> &Addr;

    fn api(&self) -> &MockApi {
        self.app().api()
    }

    fn store_code(&mut self, contract: Box<dyn Contract<Empty>>) -> u64 {
        self.app_mut().store_code(contract)
    }

    /// Deploys an account bound to the next token and mints that token to
    /// `holder`, with the suite owner acting as the minting factory.
    fn account_init(&mut self, holder: &Addr) -> (String, Addr) {
        let owner = self.owner().clone();
        let bot_nft = self.bot_nft().clone();
        self.whitelist_factory(&owner, true);

        let minted = self.query_wasm::<_, u64>(&bot_nft, &bot_nft::QueryMsg::NumTokens {});
        let token_id = (minted + 1).to_string();
        let code_id = self.account_code_id();
        let account = self
            .app_mut()
            .instantiate_contract(
                code_id,
                owner.clone(),
                &InstantiateMsg {
                    token_contract: bot_nft.to_string(),
                    token_id: token_id.clone(),
                },
                &[],
                format!("bot_account_{token_id}"),
                None,
            )
            .unwrap();

        self.contract_execute(
            &owner,
            &bot_nft,
            &bot_nft::ExecuteMsg::Mint {
                owner: holder.to_string(),
                account: account.to_string(),
                implementation: code_id,
            },
        )
        .unwrap();

        (token_id, account)
    }

    /// Points `account` at the suite data store, signing as `holder`.
    fn account_initialize(&mut self, holder: &Addr, account: &Addr) -> AnyResult<AppResponse> {
        let data_store = self.data_store().to_string();
        self.contract_execute(holder, account, &ExecuteMsg::Initialize { data_store })
    }

    fn facet_init(&mut self, label: &str) -> Addr {
        let owner = self.owner().clone();
        let code_id = self.facet_code_id();
        self.app_mut()
            .instantiate_contract(code_id, owner, &Empty {}, &[], label, None)
            .unwrap()
    }

    fn whitelist_factory(&mut self, factory: &Addr, whitelisted: bool) -> AppResponse {
        let owner = self.owner().clone();
        let bot_nft = self.bot_nft().clone();
        self.contract_execute(
            &owner,
            &bot_nft,
            &bot_nft::ExecuteMsg::WhitelistFactories {
                entries: vec![bot_nft::FactoryWhitelistEntry {
                    factory: factory.to_string(),
                    whitelisted,
                }],
            },
        )
        .unwrap()
    }

    /// `None` toggles the global override.
    fn whitelist_module(&mut self, module: Option<&Addr>, whitelisted: bool) -> AppResponse {
        let owner = self.owner().clone();
        let data_store = self.data_store().clone();
        self.contract_execute(
            &owner,
            &data_store,
            &data_store::ExecuteMsg::SetModuleWhitelist {
                entries: vec![data_store::ModuleWhitelistEntry {
                    module: module.map(Addr::to_string),
                    whitelisted,
                }],
            },
        )
        .unwrap()
    }

    fn contract_execute<T: Serialize + Debug>(
        &mut self,
        sender: &Addr,
        addr: &Addr,
        msg: &T,
    ) -> AnyResult<AppResponse> {
        self.app_mut()
            .execute_contract(sender.clone(), addr.clone(), &msg, &[])
    }

    fn contract_execute_with_funds<T: Serialize + Debug>(
        &mut self,
        sender: &Addr,
        addr: &Addr,
        msg: &T,
        funds: &[Coin],
    ) -> AnyResult<AppResponse> {
        self.app_mut()
            .execute_contract(sender.clone(), addr.clone(), &msg, funds)
    }

    fn next_block(&mut self) {
        self.app_mut().update_block(next_block);
    }

    fn query_balance(&self, addr: &Addr, denom: &str) -> Coin {
        self.app().wrap().query_balance(addr, denom).unwrap()
    }

    fn assert_balance(&self, addr: &Addr, coin: Coin) {
        let bal = self.query_balance(addr, &coin.denom);
        assert_eq!(bal, coin);
    }

    fn init_balance(&mut self, addr: &Addr, amounts: Vec<Coin>) {
        self.app_mut().init_modules(|router, _, store| {
            router.bank.init_balance(store, addr, amounts).unwrap();
        });
    }

    fn cw20_init(
        &mut self,
        name: &str,
        symbol: &str,
        decimals: u8,
        initial_balances: Vec<Cw20Coin>,
    ) -> Addr {
        let msg = cw20_base::msg::InstantiateMsg {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            initial_balances,
            mint: None,
            marketing: None,
        };

        let owner = self.owner().clone();
        let cw20_code_id = self.cw20_code_id();
        self.app_mut()
            .instantiate_contract(
                cw20_code_id,
                owner.clone(),
                &msg,
                &[],
                format!("CW20 {name}"),
                Some(owner.to_string()),
            )
            .unwrap()
    }

    fn cw20_query_balance(&self, addr: &Addr, cw20_addr: &Addr) -> Uint128 {
        let res = self.query_wasm::<_, cw20::BalanceResponse>(
            cw20_addr,
            &cw20::Cw20QueryMsg::Balance {
                address: addr.to_string(),
            },
        );
        res.balance
    }

    fn query_wasm<T, U>(&self, addr: &Addr, query: &T) -> U
    where
        T: Serialize,
        U: serde::de::DeserializeOwned,
    {
        self.app()
            .wrap()
            .query_wasm_smart::<U>(addr, &query)
            .unwrap()
    }
}

impl BotTestSuite for BotTestSuiteBase {
    fn app(&self) -> &App {
        &self.app
    }

    fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    fn owner(&self) -> &Addr {
        &self.owner
    }

    fn user(&self) -> &Addr {
        &self.user
    }

    fn account_code_id(&self) -> u64 {
        self.account_code_id
    }

    fn facet_code_id(&self) -> u64 {
        self.facet_code_id
    }

    fn cw20_code_id(&self) -> u64 {
        self.cw20_code_id
    }

    fn bot_nft(&self) -> &Addr {
        &self.bot_nft
    }

    fn data_store(&self) -> &Addr {
        &self.data_store
    }
}
