use std::{fmt, str::FromStr};

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdError};
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// 4-byte function identifier used to route calls to facets.
///
/// A selector is the first four bytes of the sha256 digest of a canonical
/// function signature, and travels on the wire as `0x`-prefixed hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
pub struct Selector(#[schemars(with = "String")] [u8; 4]);

/// ERC-165 style interface identifiers share the selector encoding.
pub type InterfaceId = Selector;

impl Selector {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Selector(bytes)
    }

    pub fn from_signature(signature: &str) -> Self {
        let digest = Sha256::digest(signature.as_bytes());
        Selector([digest[0], digest[1], digest[2], digest[3]])
    }

    pub fn bytes(&self) -> [u8; 4] {
        self.0
    }

    // Storage key form
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub fn from_u32(value: u32) -> Self {
        Selector(value.to_be_bytes())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Selector {
    type Err = StdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| StdError::parse_err("Selector", e))?;
        let bytes: [u8; 4] = bytes
            .try_into()
            .map_err(|_| StdError::parse_err("Selector", "expected exactly 4 bytes"))?;
        Ok(Selector(bytes))
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cw_serde]
#[derive(Copy)]
pub enum FacetCutAction {
    Add,
    Remove,
    Replace,
}

/// One entry of a diamond cut.
///
/// `facet_address` is the facet the selectors should route to. It must be set
/// for `Add` and `Replace` and must be left empty for `Remove`, which only
/// looks at the selectors.
#[cw_serde]
pub struct FacetCut {
    pub facet_address: Option<String>,
    pub action: FacetCutAction,
    pub function_selectors: Vec<Selector>,
}

#[cw_serde]
pub struct Facet {
    pub facet_address: Addr,
    pub function_selectors: Vec<Selector>,
}

pub const INTERFACE_ERC165: InterfaceId = Selector::new([0x01, 0xff, 0xc9, 0xa7]);
pub const INTERFACE_ERC6551_ACCOUNT: InterfaceId = Selector::new([0x6f, 0xaf, 0xf5, 0xf1]);
pub const INTERFACE_ERC6551_EXECUTABLE: InterfaceId = Selector::new([0x51, 0x94, 0x54, 0x47]);
pub const INTERFACE_ERC721_RECEIVER: InterfaceId = Selector::new([0x15, 0x0b, 0x7a, 0x02]);
pub const INTERFACE_ERC1155_RECEIVER: InterfaceId = Selector::new([0x4e, 0x23, 0x12, 0xe0]);
pub const INTERFACE_DIAMOND_CUT: InterfaceId = Selector::new([0x1f, 0x93, 0x1c, 0x1c]);
pub const INTERFACE_DIAMOND_LOUPE: InterfaceId = Selector::new([0x48, 0xe2, 0xb0, 0x93]);

/// Interfaces every freshly instantiated account reports as supported.
pub const DEFAULT_INTERFACES: [InterfaceId; 7] = [
    INTERFACE_ERC165,
    INTERFACE_ERC6551_ACCOUNT,
    INTERFACE_ERC6551_EXECUTABLE,
    INTERFACE_ERC721_RECEIVER,
    INTERFACE_ERC1155_RECEIVER,
    INTERFACE_DIAMOND_CUT,
    INTERFACE_DIAMOND_LOUPE,
];

/// Canonical signatures of the functions an account implements itself.
/// They are routed to the account's own address and can never be cut out.
pub const ACCOUNT_FUNCTIONS: &[&str] = &[
    "initialize(string)",
    "execute(string,coin[],binary,uint8)",
    "multicall(binary[])",
    "diamond_cut(facet_cut[],string,binary)",
    "update_supported_interfaces(bytes4[],bool[])",
    "receive_nft(string,uint64,binary)",
    "owner()",
    "token()",
    "state()",
    "is_valid_signer(string)",
    "implementation()",
    "data_store()",
    "reentrancy_guard_state()",
    "supports_interface(bytes4)",
    "facets()",
    "facet_addresses()",
    "facet_function_selectors(string)",
    "facet_address(bytes4)",
];

pub fn account_selectors() -> Vec<Selector> {
    ACCOUNT_FUNCTIONS
        .iter()
        .map(|signature| Selector::from_signature(signature))
        .collect()
}
