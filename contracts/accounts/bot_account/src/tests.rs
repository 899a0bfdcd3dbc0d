use cosmwasm_std::{coin, to_json_binary, Addr, Binary, Coin, Event};
use cw_multi_test::{error::AnyResult, App, AppResponse, ContractWrapper};
use getset::Getters;
use itertools::sorted;

use botkit_account_utils::{
    diamond::{
        account_selectors, Facet, FacetCut, FacetCutAction, InterfaceId, Selector,
        DEFAULT_INTERFACES, INTERFACE_ERC165,
    },
    msg::{
        ExecuteMsg, ImplementationResponse, QueryMsg, TokenResponse, GUARD_ENTERED,
        GUARD_NOT_ENTERED, OPERATION_CALL,
    },
    testing::{BotContracts, BotTestSuite, BotTestSuiteBase},
};
use botkit_bot_nft_utils::{
    Cw721ReceiveMsg, ExecuteMsg as BotNftExecuteMsg, OwnerOfResponse, QueryMsg as BotNftQueryMsg,
};
use botkit_test_facet::msg::{
    CallOutcome, ExecuteMsg as FacetExecuteMsg, QueryMsg as FacetQueryMsg,
};

use crate::ContractError;

const NTRN: &str = "untrn";

fn echo_selector() -> Selector {
    Selector::from_signature("echo(binary)")
}

fn setup_selector() -> Selector {
    Selector::from_signature("setup(string)")
}

#[derive(Getters)]
struct BotAccountTestSuite {
    #[getset(get)]
    inner: BotTestSuiteBase,
}

impl Default for BotAccountTestSuite {
    fn default() -> Self {
        let account = ContractWrapper::new(
            crate::contract::execute,
            crate::contract::instantiate,
            crate::contract::query,
        )
        .with_reply(crate::contract::reply);
        let bot_nft = ContractWrapper::new(
            botkit_bot_nft::contract::execute,
            botkit_bot_nft::contract::instantiate,
            botkit_bot_nft::contract::query,
        );
        let data_store = ContractWrapper::new(
            botkit_data_store::contract::execute,
            botkit_data_store::contract::instantiate,
            botkit_data_store::contract::query,
        );
        let facet = ContractWrapper::new(
            botkit_test_facet::contract::execute,
            botkit_test_facet::contract::instantiate,
            botkit_test_facet::contract::query,
        )
        .with_reply(botkit_test_facet::contract::reply);

        let inner = BotTestSuiteBase::new(BotContracts {
            account: Box::new(account),
            bot_nft: Box::new(bot_nft),
            data_store: Box::new(data_store),
            facet: Box::new(facet),
        });

        Self { inner }
    }
}

#[allow(dead_code)]
impl BotAccountTestSuite {
    /// Account held by the suite user and pointed at the data store.
    fn bot(&mut self) -> Addr {
        let user = self.user().clone();
        let (_, account) = self.account_init(&user);
        self.account_initialize(&user, &account).unwrap();
        account
    }

    fn diamond_cut(
        &mut self,
        account: &Addr,
        cuts: Vec<FacetCut>,
        init: Option<&Addr>,
        init_msg: Binary,
    ) -> AnyResult<AppResponse> {
        let user = self.user().clone();
        self.contract_execute(
            &user,
            account,
            &ExecuteMsg::DiamondCut {
                cuts,
                init: init.map(Addr::to_string),
                init_msg,
            },
        )
    }

    fn cut(&mut self, account: &Addr, cuts: Vec<FacetCut>) -> AnyResult<AppResponse> {
        self.diamond_cut(account, cuts, None, Binary::default())
    }

    fn execute_call(
        &mut self,
        account: &Addr,
        target: &Addr,
        data: Binary,
        value: Vec<Coin>,
    ) -> AnyResult<AppResponse> {
        let user = self.user().clone();
        self.contract_execute(&user, account, &execute_msg(target, data, value))
    }

    fn execute_on_facet(
        &mut self,
        account: &Addr,
        facet: &Addr,
        msg: &FacetExecuteMsg,
    ) -> AnyResult<AppResponse> {
        self.execute_call(account, facet, to_json_binary(msg).unwrap(), vec![])
    }

    fn facet_address(&self, account: &Addr, selector: Selector) -> Option<Addr> {
        self.query_wasm(account, &QueryMsg::FacetAddress { selector })
    }

    fn state(&self, account: &Addr) -> u64 {
        self.query_wasm(account, &QueryMsg::State {})
    }

    fn outcomes(&self, facet: &Addr) -> Vec<CallOutcome> {
        self.query_wasm(facet, &FacetQueryMsg::Outcomes {})
    }

    fn last_outcome(&self, facet: &Addr) -> CallOutcome {
        self.outcomes(facet).pop().unwrap()
    }
}

impl BotTestSuite for BotAccountTestSuite {
    fn app(&self) -> &App {
        self.inner.app()
    }

    fn app_mut(&mut self) -> &mut App {
        self.inner.app_mut()
    }

    fn owner(&self) -> &Addr {
        self.inner.owner()
    }

    fn user(&self) -> &Addr {
        self.inner.user()
    }

    fn account_code_id(&self) -> u64 {
        self.inner.account_code_id()
    }

    fn facet_code_id(&self) -> u64 {
        self.inner.facet_code_id()
    }

    fn cw20_code_id(&self) -> u64 {
        self.inner.cw20_code_id()
    }

    fn bot_nft(&self) -> &Addr {
        self.inner.bot_nft()
    }

    fn data_store(&self) -> &Addr {
        self.inner.data_store()
    }
}

fn execute_msg(target: &Addr, data: Binary, value: Vec<Coin>) -> ExecuteMsg {
    ExecuteMsg::Execute {
        target: target.to_string(),
        value,
        data,
        operation: OPERATION_CALL,
    }
}

fn add(facet: &Addr, selectors: Vec<Selector>) -> FacetCut {
    FacetCut {
        facet_address: Some(facet.to_string()),
        action: FacetCutAction::Add,
        function_selectors: selectors,
    }
}

fn replace(facet: &Addr, selectors: Vec<Selector>) -> FacetCut {
    FacetCut {
        facet_address: Some(facet.to_string()),
        action: FacetCutAction::Replace,
        function_selectors: selectors,
    }
}

fn remove(selectors: Vec<Selector>) -> FacetCut {
    FacetCut {
        facet_address: None,
        action: FacetCutAction::Remove,
        function_selectors: selectors,
    }
}

fn account_error(res: AnyResult<AppResponse>) -> ContractError {
    res.unwrap_err().downcast::<ContractError>().unwrap()
}

#[test]
fn instantiate_routes_own_functions() {
    let mut suite = BotAccountTestSuite::default();
    let user = suite.user().clone();
    let (token_id, account) = suite.account_init(&user);

    let facet_addresses: Vec<Addr> = suite.query_wasm(&account, &QueryMsg::FacetAddresses {});
    assert_eq!(facet_addresses, vec![account.clone()]);

    let selectors: Vec<Selector> = suite.query_wasm(
        &account,
        &QueryMsg::FacetFunctionSelectors {
            facet: account.to_string(),
        },
    );
    assert_eq!(
        sorted(selectors).collect::<Vec<_>>(),
        sorted(account_selectors()).collect::<Vec<_>>()
    );
    assert_eq!(
        suite.facet_address(&account, Selector::from_signature("owner()")),
        Some(account.clone())
    );

    for interface_id in DEFAULT_INTERFACES {
        let supported: bool =
            suite.query_wasm(&account, &QueryMsg::SupportsInterface { interface_id });
        assert!(supported);
    }

    let owner: Addr = suite.query_wasm(&account, &QueryMsg::Owner {});
    assert_eq!(owner, user);
    let token: TokenResponse = suite.query_wasm(&account, &QueryMsg::Token {});
    assert_eq!(
        token,
        TokenResponse {
            chain_id: suite.app().block_info().chain_id,
            token_contract: suite.bot_nft().clone(),
            token_id,
        }
    );
    let implementation: ImplementationResponse =
        suite.query_wasm(&account, &QueryMsg::Implementation {});
    assert_eq!(implementation.code_id, suite.account_code_id());

    assert_eq!(suite.state(&account), 0);
    let guard: u8 = suite.query_wasm(&account, &QueryMsg::ReentrancyGuardState {});
    assert_eq!(guard, GUARD_NOT_ENTERED);
    let data_store: Option<Addr> = suite.query_wasm(&account, &QueryMsg::DataStore {});
    assert_eq!(data_store, None);
}

#[test]
fn initialize_only_once() {
    let mut suite = BotAccountTestSuite::default();
    let user = suite.user().clone();
    let stranger = suite.api().addr_make("stranger");
    let (_, account) = suite.account_init(&user);

    let res = suite.contract_execute(
        &user,
        &account,
        &ExecuteMsg::Initialize {
            data_store: String::new(),
        },
    );
    assert_eq!(account_error(res), ContractError::AddressZero);

    let res = suite.account_initialize(&stranger, &account);
    assert_eq!(
        account_error(res),
        ContractError::InvalidSigner(stranger.to_string())
    );

    suite.account_initialize(&user, &account).unwrap();
    let data_store: Option<Addr> = suite.query_wasm(&account, &QueryMsg::DataStore {});
    assert_eq!(data_store.as_ref(), Some(suite.data_store()));

    let res = suite.account_initialize(&user, &account);
    assert_eq!(account_error(res), ContractError::AlreadyInitialized);
}

#[test]
fn diamond_cut_add_then_remove() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let module = suite.facet_init("module");
    suite.whitelist_module(Some(&module), true);
    let selector = echo_selector();

    let res = suite.cut(&account, vec![add(&module, vec![selector])]).unwrap();
    assert!(res.has_event(
        &Event::new("wasm-diamond_cut")
            .add_attribute("cuts", "1")
            .add_attribute("add", format!("{module}:{selector}"))
    ));
    assert_eq!(suite.facet_address(&account, selector), Some(module.clone()));

    let facets: Vec<Facet> = suite.query_wasm(&account, &QueryMsg::Facets {});
    assert_eq!(facets.len(), 2);
    assert_eq!(
        facets[1],
        Facet {
            facet_address: module.clone(),
            function_selectors: vec![selector],
        }
    );

    suite.cut(&account, vec![remove(vec![selector])]).unwrap();
    assert_eq!(suite.facet_address(&account, selector), None);
    let facet_addresses: Vec<Addr> = suite.query_wasm(&account, &QueryMsg::FacetAddresses {});
    assert_eq!(facet_addresses, vec![account.clone()]);

    let res = suite.cut(&account, vec![remove(vec![selector])]);
    assert_eq!(
        account_error(res),
        ContractError::RemoveFunctionDoesNotExist(selector)
    );
}

#[test]
fn diamond_cut_validates_cuts() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let module = suite.facet_init("module");
    suite.whitelist_module(Some(&module), true);

    let res = suite.cut(&account, vec![add(&module, vec![])]);
    assert_eq!(account_error(res), ContractError::LengthZero);

    let res = suite.cut(
        &account,
        vec![FacetCut {
            facet_address: None,
            action: FacetCutAction::Add,
            function_selectors: vec![echo_selector()],
        }],
    );
    assert_eq!(account_error(res), ContractError::AddressZero);

    let res = suite.cut(
        &account,
        vec![FacetCut {
            facet_address: Some(module.to_string()),
            action: FacetCutAction::Remove,
            function_selectors: vec![echo_selector()],
        }],
    );
    assert_eq!(account_error(res), ContractError::AddressNotZero);

    // Remove rejects any address before looking at its form
    let res = suite.cut(
        &account,
        vec![FacetCut {
            facet_address: Some("not-an-address".to_string()),
            action: FacetCutAction::Remove,
            function_selectors: vec![echo_selector()],
        }],
    );
    assert_eq!(account_error(res), ContractError::AddressNotZero);

    suite
        .cut(&account, vec![add(&module, vec![echo_selector()])])
        .unwrap();
    let res = suite.cut(&account, vec![add(&module, vec![echo_selector()])]);
    assert_eq!(
        account_error(res),
        ContractError::AddFunctionDuplicate(echo_selector())
    );

    let res = suite.cut(&account, vec![replace(&module, vec![echo_selector()])]);
    assert_eq!(
        account_error(res),
        ContractError::ReplaceFunctionSame(echo_selector())
    );

    // A failing cut later in the batch undoes the earlier ones
    let res = suite.cut(
        &account,
        vec![
            add(&module, vec![setup_selector()]),
            add(&module, vec![echo_selector()]),
        ],
    );
    assert!(res.is_err());
    assert_eq!(suite.facet_address(&account, setup_selector()), None);
}

#[test]
fn own_functions_are_immutable() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let module = suite.facet_init("module");
    suite.whitelist_module(Some(&module), true);
    let owner_selector = Selector::from_signature("owner()");

    let res = suite.cut(&account, vec![remove(vec![owner_selector])]);
    assert_eq!(
        account_error(res),
        ContractError::RemoveFunctionImmutable(owner_selector)
    );

    let res = suite.cut(&account, vec![replace(&module, vec![owner_selector])]);
    assert_eq!(
        account_error(res),
        ContractError::RemoveFunctionImmutable(owner_selector)
    );

    let res = suite.cut(&account, vec![add(&module, vec![owner_selector])]);
    assert_eq!(
        account_error(res),
        ContractError::AddFunctionDuplicate(owner_selector)
    );
    assert_eq!(suite.facet_address(&account, owner_selector), Some(account));
}

#[test]
fn replace_moves_selector_to_new_facet() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let first = suite.facet_init("first");
    let second = suite.facet_init("second");
    suite.whitelist_module(Some(&first), true);

    suite
        .cut(&account, vec![add(&first, vec![echo_selector(), setup_selector()])])
        .unwrap();

    // The new facet has to pass the whitelist too
    let res = suite.cut(&account, vec![replace(&second, vec![echo_selector()])]);
    assert_eq!(
        account_error(res),
        ContractError::ModuleNotWhitelisted(second.to_string())
    );

    suite.whitelist_module(Some(&second), true);
    suite
        .cut(&account, vec![replace(&second, vec![echo_selector()])])
        .unwrap();

    assert_eq!(suite.facet_address(&account, echo_selector()), Some(second.clone()));
    let facets: Vec<Facet> = suite.query_wasm(&account, &QueryMsg::Facets {});
    assert_eq!(
        facets[1..],
        [
            Facet {
                facet_address: first,
                function_selectors: vec![setup_selector()],
            },
            Facet {
                facet_address: second,
                function_selectors: vec![echo_selector()],
            },
        ]
    );
}

#[test]
fn diamond_cut_checks_whitelist() {
    let mut suite = BotAccountTestSuite::default();
    let user = suite.user().clone();
    let module = suite.facet_init("module");

    // Nothing is installable until the account knows its data store
    let (_, uninitialized) = suite.account_init(&user);
    suite.whitelist_module(None, true);
    let res = suite.cut(&uninitialized, vec![add(&module, vec![echo_selector()])]);
    assert_eq!(
        account_error(res),
        ContractError::ModuleNotWhitelisted(module.to_string())
    );
    suite.whitelist_module(None, false);

    let account = suite.bot();
    let res = suite.cut(&account, vec![add(&module, vec![echo_selector()])]);
    assert_eq!(
        account_error(res),
        ContractError::ModuleNotWhitelisted(module.to_string())
    );

    // Global override
    suite.whitelist_module(None, true);
    suite
        .cut(&account, vec![add(&module, vec![echo_selector()])])
        .unwrap();
    assert_eq!(suite.facet_address(&account, echo_selector()), Some(module));
}

#[test]
fn diamond_cut_only_by_holder() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let module = suite.facet_init("module");
    suite.whitelist_module(Some(&module), true);
    let stranger = suite.api().addr_make("stranger");

    let res = suite.contract_execute(
        &stranger,
        &account,
        &ExecuteMsg::DiamondCut {
            cuts: vec![add(&module, vec![echo_selector()])],
            init: None,
            init_msg: Binary::default(),
        },
    );
    assert_eq!(
        account_error(res),
        ContractError::InvalidSigner(stranger.to_string())
    );
}

#[test]
fn diamond_cut_runs_init_as_account() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let module = suite.facet_init("module");
    let unlisted = suite.facet_init("unlisted");
    suite.whitelist_module(Some(&module), true);
    let nobody = suite.api().addr_make("nobody");

    let setup = to_json_binary(&FacetExecuteMsg::Setup {
        label: "v1".to_string(),
    })
    .unwrap();

    let res = suite.diamond_cut(&account, vec![], Some(&nobody), setup.clone());
    assert_eq!(
        account_error(res),
        ContractError::NotAContract(nobody.to_string())
    );

    let res = suite.diamond_cut(&account, vec![], Some(&unlisted), setup.clone());
    assert_eq!(
        account_error(res),
        ContractError::ModuleNotWhitelisted(unlisted.to_string())
    );

    // A reverting init undoes the cuts
    let fail = to_json_binary(&FacetExecuteMsg::Fail {
        reason: "boom".to_string(),
    })
    .unwrap();
    let res = suite.diamond_cut(
        &account,
        vec![add(&module, vec![setup_selector()])],
        Some(&module),
        fail,
    );
    assert!(matches!(
        account_error(res),
        ContractError::RevertWithReason(reason) if reason.contains("boom")
    ));
    assert_eq!(suite.facet_address(&account, setup_selector()), None);

    let res = suite
        .diamond_cut(
            &account,
            vec![add(&module, vec![setup_selector()])],
            Some(&module),
            setup,
        )
        .unwrap();
    assert!(res.has_event(
        &Event::new("wasm-diamond_cut").add_attribute("init", module.to_string())
    ));
    let label: Option<String> = suite.query_wasm(
        &module,
        &FacetQueryMsg::Setup {
            caller: account.to_string(),
        },
    );
    assert_eq!(label, Some("v1".to_string()));
}

#[test]
fn execute_bumps_state_and_relays_data() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let target = suite.facet_init("target");
    let recipient = suite.api().addr_make("recipient");

    let data = Binary::from(b"pong");
    let res = suite
        .execute_on_facet(&account, &target, &FacetExecuteMsg::Echo { data: data.clone() })
        .unwrap();
    assert_eq!(res.data, Some(data));
    assert_eq!(suite.state(&account), 1);

    // Empty data is a plain transfer
    suite.init_balance(&account, vec![coin(100, NTRN)]);
    suite
        .execute_call(&account, &recipient, Binary::default(), vec![coin(40, NTRN)])
        .unwrap();
    suite.assert_balance(&recipient, coin(40, NTRN));
    suite.assert_balance(&account, coin(60, NTRN));
    assert_eq!(suite.state(&account), 2);

    let guard: u8 = suite.query_wasm(&account, &QueryMsg::ReentrancyGuardState {});
    assert_eq!(guard, GUARD_NOT_ENTERED);
}

#[test]
fn empty_execute_only_bumps_state() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let recipient = suite.api().addr_make("recipient");

    let res = suite
        .execute_call(&account, &recipient, Binary::default(), vec![])
        .unwrap();
    assert!(res.has_event(
        &Event::new("wasm")
            .add_attribute("method", "execute")
            .add_attribute("state", "1")
    ));
    assert!(!res.events.iter().any(|event| event.ty == "transfer"));
    assert_eq!(res.data, None);
    assert_eq!(suite.state(&account), 1);

    let guard: u8 = suite.query_wasm(&account, &QueryMsg::ReentrancyGuardState {});
    assert_eq!(guard, GUARD_NOT_ENTERED);
}

#[test]
fn execute_rejections() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let target = suite.facet_init("target");
    let user = suite.user().clone();
    let stranger = suite.api().addr_make("stranger");
    let echo = to_json_binary(&FacetExecuteMsg::Echo {
        data: Binary::default(),
    })
    .unwrap();

    let res = suite.contract_execute(
        &user,
        &account,
        &ExecuteMsg::Execute {
            target: target.to_string(),
            value: vec![],
            data: echo.clone(),
            operation: 1,
        },
    );
    assert_eq!(account_error(res), ContractError::OnlyCallsAllowed);

    let res = suite.contract_execute(&stranger, &account, &execute_msg(&target, echo, vec![]));
    assert_eq!(
        account_error(res),
        ContractError::InvalidSigner(stranger.to_string())
    );

    let res = suite.execute_on_facet(
        &account,
        &target,
        &FacetExecuteMsg::Fail {
            reason: "boom".to_string(),
        },
    );
    assert!(matches!(
        account_error(res),
        ContractError::RevertWithReason(reason) if reason.contains("boom")
    ));

    assert_eq!(suite.state(&account), 0);
}

#[test]
fn multicall_runs_every_payload() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let target = suite.facet_init("target");
    let stranger = suite.api().addr_make("stranger");
    let user = suite.user().clone();
    let echo = to_json_binary(&FacetExecuteMsg::Echo {
        data: Binary::default(),
    })
    .unwrap();
    let call = to_json_binary(&execute_msg(&target, echo, vec![])).unwrap();

    // Empty batches need no signer
    suite
        .contract_execute(&stranger, &account, &ExecuteMsg::Multicall { msgs: vec![] })
        .unwrap();

    let res = suite.contract_execute(
        &stranger,
        &account,
        &ExecuteMsg::Multicall {
            msgs: vec![call.clone()],
        },
    );
    assert_eq!(
        account_error(res),
        ContractError::InvalidSigner(stranger.to_string())
    );

    suite
        .contract_execute(
            &user,
            &account,
            &ExecuteMsg::Multicall {
                msgs: vec![call.clone(), call.clone()],
            },
        )
        .unwrap();
    assert_eq!(suite.state(&account), 2);

    // Unrouted selectors fail the whole batch
    let unknown = Selector::from_signature("unknown()");
    let res = suite.contract_execute(
        &user,
        &account,
        &ExecuteMsg::Multicall {
            msgs: vec![
                call,
                to_json_binary(&ExecuteMsg::Fallback {
                    selector: unknown,
                    msg: Binary::default(),
                })
                .unwrap(),
            ],
        },
    );
    assert_eq!(account_error(res), ContractError::FunctionDoesNotExist(unknown));
    assert_eq!(suite.state(&account), 2);

    let res = suite.contract_execute(
        &user,
        &account,
        &ExecuteMsg::Multicall {
            msgs: vec![Binary::from(b"{\"self_destruct\":{}}")],
        },
    );
    assert!(res.is_err());
}

#[test]
fn guarded_queries_fail_during_execute() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let spy = suite.facet_init("spy");

    let guarded = [
        QueryMsg::Owner {},
        QueryMsg::Token {},
        QueryMsg::State {},
        QueryMsg::IsValidSigner {
            signer: account.to_string(),
        },
        QueryMsg::Implementation {},
        QueryMsg::Facets {},
        QueryMsg::FacetAddresses {},
        QueryMsg::FacetFunctionSelectors {
            facet: account.to_string(),
        },
        QueryMsg::FacetAddress {
            selector: echo_selector(),
        },
    ];
    for query in &guarded {
        suite
            .execute_on_facet(
                &account,
                &spy,
                &FacetExecuteMsg::QueryAccount {
                    account: account.to_string(),
                    msg: to_json_binary(query).unwrap(),
                },
            )
            .unwrap();
        let outcome = suite.last_outcome(&spy);
        assert!(!outcome.ok, "{query:?} answered while entered");
        assert!(outcome.detail.contains("Reentrancy guard"));

        // and answer once the call is over
        assert!(suite
            .app()
            .wrap()
            .query_wasm_smart::<serde_json::Value>(&account, query)
            .is_ok());
    }

    let reenterable = [
        QueryMsg::DataStore {},
        QueryMsg::ReentrancyGuardState {},
        QueryMsg::SupportsInterface {
            interface_id: INTERFACE_ERC165,
        },
    ];
    for query in &reenterable {
        suite
            .execute_on_facet(
                &account,
                &spy,
                &FacetExecuteMsg::QueryAccount {
                    account: account.to_string(),
                    msg: to_json_binary(query).unwrap(),
                },
            )
            .unwrap();
        assert!(suite.last_outcome(&spy).ok, "{query:?} rejected while entered");
    }

    let outcomes = suite.outcomes(&spy);
    let guard_state = &outcomes[outcomes.len() - 2];
    assert_eq!(guard_state.detail, GUARD_ENTERED.to_string());
}

#[test]
fn reenterable_executes_during_execute() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let other_holder = suite.api().addr_make("other_holder");
    let (other_token, _) = suite.account_init(&other_holder);
    let spy = suite.facet_init("spy");
    let bot_nft = suite.bot_nft().clone();

    let spy_call = |msg: &ExecuteMsg| FacetExecuteMsg::ExecuteAccount {
        account: account.to_string(),
        msg: to_json_binary(msg).unwrap(),
    };

    let reenterable = [
        ExecuteMsg::Multicall { msgs: vec![] },
        ExecuteMsg::ReceiveNft(Cw721ReceiveMsg {
            sender: bot_nft.to_string(),
            token_id: other_token,
            msg: Binary::default(),
        }),
    ];
    for msg in &reenterable {
        suite
            .execute_on_facet(&account, &spy, &spy_call(msg))
            .unwrap();
        assert!(suite.last_outcome(&spy).ok, "{msg:?} rejected while entered");
    }

    let guarded = [
        ExecuteMsg::Initialize {
            data_store: suite.data_store().to_string(),
        },
        ExecuteMsg::UpdateSupportedInterfaces {
            interface_ids: vec![INTERFACE_ERC165],
            support: vec![false],
        },
        ExecuteMsg::Fallback {
            selector: echo_selector(),
            msg: Binary::default(),
        },
    ];
    for msg in &guarded {
        suite
            .execute_on_facet(&account, &spy, &spy_call(msg))
            .unwrap();
        let outcome = suite.last_outcome(&spy);
        assert!(!outcome.ok, "{msg:?} accepted while entered");
        assert!(outcome.detail.contains("Reentrancy guard"));
    }
}

#[test]
fn nested_self_calls() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let target = suite.facet_init("target");
    let echo = to_json_binary(&FacetExecuteMsg::Echo {
        data: Binary::from(b"inner"),
    })
    .unwrap();

    // Execute is reenterable: the account may call itself
    let inner = to_json_binary(&execute_msg(&target, echo, vec![])).unwrap();
    let res = suite.execute_call(&account, &account, inner, vec![]).unwrap();
    assert_eq!(res.data, Some(Binary::from(b"inner")));
    assert_eq!(suite.state(&account), 2);

    // Guarded functions are not, even for the account itself
    let inner = to_json_binary(&ExecuteMsg::UpdateSupportedInterfaces {
        interface_ids: vec![INTERFACE_ERC165],
        support: vec![false],
    })
    .unwrap();
    let res = suite.execute_call(&account, &account, inner, vec![]);
    assert!(matches!(
        account_error(res),
        ContractError::RevertWithReason(reason) if reason.contains("Reentrancy guard")
    ));
    assert_eq!(suite.state(&account), 2);
}

#[test]
fn fallback_dispatches_to_facet() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let module = suite.facet_init("module");
    let user = suite.user().clone();
    suite.whitelist_module(Some(&module), true);
    suite
        .cut(&account, vec![add(&module, vec![echo_selector()])])
        .unwrap();

    let data = Binary::from(b"through the proxy");
    let res = suite
        .contract_execute(
            &user,
            &account,
            &ExecuteMsg::Fallback {
                selector: echo_selector(),
                msg: to_json_binary(&FacetExecuteMsg::Echo { data: data.clone() }).unwrap(),
            },
        )
        .unwrap();
    assert_eq!(res.data, Some(data));

    // The facet sees the account as entered
    suite
        .contract_execute(
            &user,
            &account,
            &ExecuteMsg::Fallback {
                selector: echo_selector(),
                msg: to_json_binary(&FacetExecuteMsg::QueryAccount {
                    account: account.to_string(),
                    msg: to_json_binary(&QueryMsg::Owner {}).unwrap(),
                })
                .unwrap(),
            },
        )
        .unwrap();
    assert!(!suite.last_outcome(&module).ok);

    let answer: String = suite.query_wasm(
        &account,
        &QueryMsg::Fallback {
            selector: echo_selector(),
            msg: to_json_binary(&FacetQueryMsg::Echo {
                data: to_json_binary("hello").unwrap(),
            })
            .unwrap(),
        },
    );
    assert_eq!(answer, "hello");

    let unknown = Selector::from_signature("unknown()");
    let res = suite.contract_execute(
        &user,
        &account,
        &ExecuteMsg::Fallback {
            selector: unknown,
            msg: Binary::default(),
        },
    );
    assert_eq!(account_error(res), ContractError::FunctionDoesNotExist(unknown));

    let err = suite
        .app()
        .wrap()
        .query_wasm_smart::<String>(
            &account,
            &QueryMsg::Fallback {
                selector: unknown,
                msg: Binary::default(),
            },
        )
        .unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn update_supported_interfaces() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let user = suite.user().clone();
    let custom = InterfaceId::new([0xaa, 0xbb, 0xcc, 0xdd]);

    let res = suite.contract_execute(
        &user,
        &account,
        &ExecuteMsg::UpdateSupportedInterfaces {
            interface_ids: vec![custom],
            support: vec![true, false],
        },
    );
    assert_eq!(account_error(res), ContractError::LengthMismatch);

    let res = suite
        .contract_execute(
            &user,
            &account,
            &ExecuteMsg::UpdateSupportedInterfaces {
                interface_ids: vec![custom, INTERFACE_ERC165],
                support: vec![true, false],
            },
        )
        .unwrap();
    assert!(res.has_event(
        &Event::new("wasm-interface_support_updated")
            .add_attribute("interface_id", "0xaabbccdd")
            .add_attribute("supported", "true")
    ));
    assert!(res.has_event(
        &Event::new("wasm-interface_support_updated")
            .add_attribute("interface_id", INTERFACE_ERC165.to_string())
            .add_attribute("supported", "false")
    ));

    let supported: bool = suite.query_wasm(
        &account,
        &QueryMsg::SupportsInterface {
            interface_id: custom,
        },
    );
    assert!(supported);
    let supported: bool = suite.query_wasm(
        &account,
        &QueryMsg::SupportsInterface {
            interface_id: INTERFACE_ERC165,
        },
    );
    assert!(!supported);
}

#[test]
fn account_rejects_its_own_token() {
    let mut suite = BotAccountTestSuite::default();
    let user = suite.user().clone();
    let bot_nft = suite.bot_nft().clone();
    let (token_id, account) = suite.account_init(&user);
    let (other_token, _) = suite.account_init(&user);

    let res = suite.contract_execute(
        &user,
        &bot_nft,
        &BotNftExecuteMsg::SendNft {
            contract: account.to_string(),
            token_id: token_id.clone(),
            msg: Binary::default(),
        },
    );
    assert_eq!(account_error(res), ContractError::OwnershipCycle);
    let owner: OwnerOfResponse = suite.query_wasm(
        &bot_nft,
        &BotNftQueryMsg::OwnerOf {
            token_id,
            include_expired: None,
        },
    );
    assert_eq!(owner.owner, user.to_string());

    // Other bots are fine
    suite
        .contract_execute(
            &user,
            &bot_nft,
            &BotNftExecuteMsg::SendNft {
                contract: account.to_string(),
                token_id: other_token.clone(),
                msg: Binary::default(),
            },
        )
        .unwrap();
    let owner: OwnerOfResponse = suite.query_wasm(
        &bot_nft,
        &BotNftQueryMsg::OwnerOf {
            token_id: other_token,
            include_expired: None,
        },
    );
    assert_eq!(owner.owner, account.to_string());
}

#[test]
fn ownership_follows_the_token() {
    let mut suite = BotAccountTestSuite::default();
    let user = suite.user().clone();
    let buyer = suite.api().addr_make("buyer");
    let bot_nft = suite.bot_nft().clone();
    let (token_id, account) = suite.account_init(&user);

    suite
        .contract_execute(
            &user,
            &bot_nft,
            &BotNftExecuteMsg::TransferNft {
                recipient: buyer.to_string(),
                token_id,
            },
        )
        .unwrap();

    let owner: Addr = suite.query_wasm(&account, &QueryMsg::Owner {});
    assert_eq!(owner, buyer);
    let valid: bool = suite.query_wasm(
        &account,
        &QueryMsg::IsValidSigner {
            signer: user.to_string(),
        },
    );
    assert!(!valid);
    let valid: bool = suite.query_wasm(
        &account,
        &QueryMsg::IsValidSigner {
            signer: buyer.to_string(),
        },
    );
    assert!(valid);

    let res = suite.account_initialize(&user, &account);
    assert_eq!(
        account_error(res),
        ContractError::InvalidSigner(user.to_string())
    );
    suite.account_initialize(&buyer, &account).unwrap();
}

#[test]
fn only_the_holder_is_a_valid_signer() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let user = suite.user().clone();
    let target = suite.facet_init("target");

    let is_valid_signer = |suite: &BotAccountTestSuite, signer: &Addr| -> bool {
        suite.query_wasm(
            &account,
            &QueryMsg::IsValidSigner {
                signer: signer.to_string(),
            },
        )
    };
    assert!(is_valid_signer(&suite, &user));
    assert!(!is_valid_signer(&suite, &account));
    assert!(!is_valid_signer(&suite, &target));

    // The account still passes its own signer check on self calls
    let echo = to_json_binary(&FacetExecuteMsg::Echo {
        data: Binary::from(b"self"),
    })
    .unwrap();
    let inner = to_json_binary(&execute_msg(&target, echo, vec![])).unwrap();
    let res = suite.execute_call(&account, &account, inner, vec![]).unwrap();
    assert_eq!(res.data, Some(Binary::from(b"self")));
}

#[test]
fn diamond_cut_from_inside_execute() {
    let mut suite = BotAccountTestSuite::default();
    let account = suite.bot();
    let module = suite.facet_init("module");
    let user = suite.user().clone();
    suite.whitelist_module(Some(&module), true);

    // The account calls its own DiamondCut while the outer Execute is in flight
    let cut = to_json_binary(&ExecuteMsg::DiamondCut {
        cuts: vec![add(&module, vec![echo_selector()])],
        init: None,
        init_msg: Binary::default(),
    })
    .unwrap();
    suite.execute_call(&account, &account, cut, vec![]).unwrap();

    assert_eq!(
        suite.facet_address(&account, echo_selector()),
        Some(module.clone())
    );
    assert_eq!(suite.state(&account), 1);
    let guard: u8 = suite.query_wasm(&account, &QueryMsg::ReentrancyGuardState {});
    assert_eq!(guard, GUARD_NOT_ENTERED);

    let data = Binary::from(b"routed");
    let res = suite
        .contract_execute(
            &user,
            &account,
            &ExecuteMsg::Fallback {
                selector: echo_selector(),
                msg: to_json_binary(&FacetExecuteMsg::Echo { data: data.clone() }).unwrap(),
            },
        )
        .unwrap();
    assert_eq!(res.data, Some(data));
}
