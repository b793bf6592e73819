//! 已知链注册表
//!
//! 静态初始化的常用链清单，作为 `add_chain` 负载的现成来源，
//! 也通过只读 API 暴露给表现层。

use once_cell::sync::Lazy;

use crate::domain::{normalize_chain_id, ChainDescriptor, NativeCurrency};

/// 已知链的静态描述
#[derive(Debug, Clone)]
pub struct KnownChain {
    /// 0x 十六进制链ID
    pub chain_id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
    pub is_testnet: bool,
}

static KNOWN_CHAINS: Lazy<Vec<KnownChain>> = Lazy::new(|| {
    vec![
        KnownChain {
            chain_id: "0x1",
            name: "Ethereum",
            symbol: "ETH",
            decimals: 18,
            rpc_url: "https://ethereum-rpc.publicnode.com",
            explorer_url: "https://etherscan.io",
            is_testnet: false,
        },
        KnownChain {
            chain_id: "0x5",
            name: "Goerli Testnet",
            symbol: "ETH",
            decimals: 18,
            rpc_url: "https://ethereum-goerli-rpc.publicnode.com",
            explorer_url: "https://goerli.etherscan.io",
            is_testnet: true,
        },
        KnownChain {
            chain_id: "0xaa36a7",
            name: "Ethereum Sepolia",
            symbol: "ETH",
            decimals: 18,
            rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
            explorer_url: "https://sepolia.etherscan.io",
            is_testnet: true,
        },
        KnownChain {
            chain_id: "0x89",
            name: "Polygon",
            symbol: "MATIC",
            decimals: 18,
            rpc_url: "https://polygon-rpc.com",
            explorer_url: "https://polygonscan.com",
            is_testnet: false,
        },
        KnownChain {
            chain_id: "0x38",
            name: "BNB Smart Chain",
            symbol: "BNB",
            decimals: 18,
            rpc_url: "https://bsc-dataseed1.binance.org",
            explorer_url: "https://bscscan.com",
            is_testnet: false,
        },
    ]
});

pub fn all() -> &'static [KnownChain] {
    KNOWN_CHAINS.as_slice()
}

/// 按链ID查找（接受十六进制或十进制输入）
pub fn find(chain_id: &str) -> Option<&'static KnownChain> {
    let normalized = normalize_chain_id(chain_id).ok()?;
    KNOWN_CHAINS.iter().find(|c| c.chain_id == normalized)
}

impl KnownChain {
    /// 转换为钱包注册负载
    pub fn descriptor(&self) -> ChainDescriptor {
        ChainDescriptor {
            chain_id: self.chain_id.to_string(),
            chain_name: self.name.to_string(),
            rpc_urls: vec![self.rpc_url.to_string()],
            native_currency: NativeCurrency {
                name: self.symbol.to_string(),
                symbol: self.symbol.to_string(),
                decimals: self.decimals,
            },
            block_explorer_urls: vec![self.explorer_url.to_string()],
        }
    }
}
