use crate::core::constants::*;
use crate::core::types::{Pool, Token};
use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every token the protocol lists. `Trust` is the native hub asset that all
/// pools pair against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenSymbol {
    Trust,
    Oracle,
    Intuit,
    Tswp,
    Pintu,
}

impl TokenSymbol {
    pub const ALL: [TokenSymbol; 5] = [
        TokenSymbol::Trust,
        TokenSymbol::Oracle,
        TokenSymbol::Intuit,
        TokenSymbol::Tswp,
        TokenSymbol::Pintu,
    ];

    pub const HUB: TokenSymbol = TokenSymbol::Trust;

    pub fn is_hub(self) -> bool {
        self == Self::HUB
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenSymbol::Trust => "tTRUST",
            TokenSymbol::Oracle => "ORACLE",
            TokenSymbol::Intuit => "INTUIT",
            TokenSymbol::Tswp => "TSWP",
            TokenSymbol::Pintu => "PINTU",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenSymbol::Trust => "Testnet TRUST (Native Token)",
            TokenSymbol::Oracle => "Oracle Token",
            TokenSymbol::Intuit => "INTUIT Token",
            TokenSymbol::Tswp => "TSWP Token (Governance)",
            TokenSymbol::Pintu => "PINTU Token (Staking)",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TokenSymbol::Trust => "⚡",
            TokenSymbol::Oracle => "🔮",
            TokenSymbol::Intuit => "🧠",
            TokenSymbol::Tswp => "🗳️",
            TokenSymbol::Pintu => "💎",
        }
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown token symbol: {0}")]
pub struct UnknownSymbol(pub String);

impl FromStr for TokenSymbol {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TTRUST" | "TRUST" => Ok(TokenSymbol::Trust),
            "ORACLE" => Ok(TokenSymbol::Oracle),
            "INTUIT" => Ok(TokenSymbol::Intuit),
            "TSWP" => Ok(TokenSymbol::Tswp),
            "PINTU" => Ok(TokenSymbol::Pintu),
            _ => Err(UnknownSymbol(s.to_string())),
        }
    }
}

/// Networks the protocol is deployed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    IntuitionTestnet,
    LocalHardhat,
}

impl Network {
    pub fn chain_id(self) -> u64 {
        match self {
            Network::IntuitionTestnet => INTUITION_TESTNET_CHAIN_ID,
            Network::LocalHardhat => LOCAL_HARDHAT_CHAIN_ID,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Network::IntuitionTestnet => "Intuition Testnet",
            Network::LocalHardhat => "Local Hardhat",
        }
    }

    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Network::IntuitionTestnet => INTUITION_TESTNET_RPC_URL,
            Network::LocalHardhat => LOCAL_HARDHAT_RPC_URL,
        }
    }

    pub fn explorer_url(self) -> Option<&'static str> {
        match self {
            Network::IntuitionTestnet => Some(INTUITION_EXPLORER_URL),
            Network::LocalHardhat => None,
        }
    }

    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        match chain_id {
            INTUITION_TESTNET_CHAIN_ID => Some(Network::IntuitionTestnet),
            LOCAL_HARDHAT_CHAIN_ID => Some(Network::LocalHardhat),
            _ => None,
        }
    }

    pub fn contracts(self) -> &'static NetworkContracts {
        match self {
            Network::IntuitionTestnet => &INTUITION_TESTNET_CONTRACTS,
            Network::LocalHardhat => &LOCAL_HARDHAT_CONTRACTS,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.chain_id())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "intuition" | "intuition-testnet" | "testnet" => Ok(Network::IntuitionTestnet),
            "local" | "localhost" | "hardhat" => Ok(Network::LocalHardhat),
            other => other
                .parse::<u64>()
                .ok()
                .and_then(Network::from_chain_id)
                .ok_or_else(|| format!("Unsupported network: {}", s)),
        }
    }
}

/// Deployed addresses for one network. Pools are keyed by their non-hub token.
#[derive(Debug, Clone)]
pub struct NetworkContracts {
    pub tokens: BTreeMap<TokenSymbol, Address>,
    pub pools: BTreeMap<TokenSymbol, Address>,
    pub router: Option<Address>,
}

lazy_static::lazy_static! {
    static ref INTUITION_TESTNET_CONTRACTS: NetworkContracts = NetworkContracts {
        tokens: BTreeMap::from([
            (TokenSymbol::Trust, Address::ZERO),
            (TokenSymbol::Oracle, address!("1AA6ad0A70Dd90796F2936BD11F0d4DEF7553b04")),
            (TokenSymbol::Intuit, address!("D8a5a9b31c3C0232E196d518E89Fd8bF83AcAd43")),
            (TokenSymbol::Tswp, address!("DC11f7E700A4c898AE5CAddB1082cFfa76512aDD")),
            (TokenSymbol::Pintu, address!("51A1ceB83B83F1985a81C295d1fF28Afef186E02")),
        ]),
        pools: BTreeMap::from([
            (TokenSymbol::Oracle, address!("216cCe003Be533D11Fd4B6d87F066Eef48B42568")),
            (TokenSymbol::Intuit, address!("36b58F5C1969B7b6591D752ea6F5486D069010AB")),
            (TokenSymbol::Tswp, address!("8198f5d8F8CfFE8f9C413d98a0A55aEB8ab9FbB7")),
            (TokenSymbol::Pintu, address!("0355B7B8cb128fA5692729Ab3AAa199C1753f726")),
        ]),
        router: Some(address!("9A676e781A523b5d0C0e43731313A708CB607508")),
    };

    // Only the ORACLE pair has a well-known address on a fresh Hardhat node.
    static ref LOCAL_HARDHAT_CONTRACTS: NetworkContracts = NetworkContracts {
        tokens: BTreeMap::from([
            (TokenSymbol::Trust, Address::ZERO),
            (TokenSymbol::Oracle, address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0")),
            (TokenSymbol::Intuit, address!("Cf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9")),
            (TokenSymbol::Tswp, address!("Dc64a140Aa3E981100a9becA4E685f962f0cF6C9")),
            (TokenSymbol::Pintu, address!("5FC8d32690cc91D4c39d9d3abcBD16989F875707")),
        ]),
        pools: BTreeMap::from([
            (TokenSymbol::Oracle, address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512")),
        ]),
        router: None,
    };
}

/// Token and pool lookup for a single network.
///
/// Built once from the static tables and then only read. Everything the
/// resolver and planner know about addresses comes from here.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    network: Network,
    tokens: BTreeMap<TokenSymbol, Token>,
    pools: BTreeMap<TokenSymbol, Pool>,
    router: Option<Address>,
}

impl TokenRegistry {
    pub fn for_network(network: Network) -> Self {
        let contracts = network.contracts();
        Self::from_parts(network, &contracts.tokens, &contracts.pools, contracts.router)
    }

    pub fn from_parts(
        network: Network,
        token_addresses: &BTreeMap<TokenSymbol, Address>,
        pool_addresses: &BTreeMap<TokenSymbol, Address>,
        router: Option<Address>,
    ) -> Self {
        let tokens: BTreeMap<TokenSymbol, Token> = token_addresses
            .iter()
            .map(|(symbol, address)| (*symbol, Token::new(*symbol, *address)))
            .collect();

        let hub = Token::hub();
        let pools = pool_addresses
            .iter()
            .filter(|(symbol, _)| !symbol.is_hub())
            .filter_map(|(symbol, address)| {
                tokens
                    .get(symbol)
                    .map(|token| (*symbol, Pool::new(*address, hub.clone(), token.clone())))
            })
            .collect();

        Self {
            network,
            tokens,
            pools,
            router,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn hub(&self) -> TokenSymbol {
        TokenSymbol::HUB
    }

    pub fn token(&self, symbol: TokenSymbol) -> Option<&Token> {
        self.tokens.get(&symbol)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    /// The direct pool pairing `symbol` with the hub
    pub fn pool_for(&self, symbol: TokenSymbol) -> Option<&Pool> {
        self.pools.get(&symbol)
    }

    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.pools.values()
    }

    pub fn router(&self) -> Option<Address> {
        self.router
    }
}
