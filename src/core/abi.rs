use crate::core::registry::TokenSymbol;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use serde::Serialize;

sol! {
    /// Hub/token pair pool. Each deployment exposes its own pair of
    /// directional swap functions; the read surface is shared.
    #[sol(rpc)]
    interface IHubPool {
        function getAmountOut(address _tokenIn, uint256 _amountIn) external view returns (uint256 amountOut);
        function getDEXStats() external view returns (uint256 _tTrustReserve, uint256 _tokenReserve, uint256 _totalVolume, uint256 _totalTrades, uint256 _totalLiquidity);

        function swapTrustForOracle(uint256 _amountIn, uint256 _minAmountOut) external payable;
        function swapOracleForTrust(uint256 _amountIn, uint256 _minAmountOut) external;
        function swapTrustForIntuit(uint256 _amountIn, uint256 _minAmountOut) external payable;
        function swapIntuitForTrust(uint256 _amountIn, uint256 _minAmountOut) external;
        function swapTrustForTswp(uint256 _amountIn, uint256 _minAmountOut) external payable;
        function swapTswpForTrust(uint256 _amountIn, uint256 _minAmountOut) external;
        function swapTrustForPintu(uint256 _amountIn, uint256 _minAmountOut) external payable;
        function swapPintuForTrust(uint256 _amountIn, uint256 _minAmountOut) external;
    }

    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
    }

    /// Multi-hop router. Both legs settle inside one transaction.
    #[sol(rpc)]
    interface IDexRouter {
        function swap(address tokenIn, address tokenOut, uint256 amountIn, uint256 minAmountOut) external payable;
    }
}

/// Which of a pool's two swap functions to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwapEntry {
    /// Pay the hub asset as native value, receive the pool token
    HubIn,
    /// Pay the pool token, receive the hub asset
    HubOut,
}

/// Solidity signature of a pool's swap entry point. `None` for the hub itself.
pub fn swap_signature(token: TokenSymbol, entry: SwapEntry) -> Option<&'static str> {
    use IHubPool::*;
    let signature = match (token, entry) {
        (TokenSymbol::Trust, _) => return None,
        (TokenSymbol::Oracle, SwapEntry::HubIn) => swapTrustForOracleCall::SIGNATURE,
        (TokenSymbol::Oracle, SwapEntry::HubOut) => swapOracleForTrustCall::SIGNATURE,
        (TokenSymbol::Intuit, SwapEntry::HubIn) => swapTrustForIntuitCall::SIGNATURE,
        (TokenSymbol::Intuit, SwapEntry::HubOut) => swapIntuitForTrustCall::SIGNATURE,
        (TokenSymbol::Tswp, SwapEntry::HubIn) => swapTrustForTswpCall::SIGNATURE,
        (TokenSymbol::Tswp, SwapEntry::HubOut) => swapTswpForTrustCall::SIGNATURE,
        (TokenSymbol::Pintu, SwapEntry::HubIn) => swapTrustForPintuCall::SIGNATURE,
        (TokenSymbol::Pintu, SwapEntry::HubOut) => swapPintuForTrustCall::SIGNATURE,
    };
    Some(signature)
}

/// Calldata for a direct pool swap. `None` for the hub itself.
pub fn encode_pool_swap(
    token: TokenSymbol,
    entry: SwapEntry,
    amount_in: U256,
    min_amount_out: U256,
) -> Option<Bytes> {
    use IHubPool::*;
    let (a, m) = (amount_in, min_amount_out);
    let data = match (token, entry) {
        (TokenSymbol::Trust, _) => return None,
        (TokenSymbol::Oracle, SwapEntry::HubIn) => swapTrustForOracleCall { _amountIn: a, _minAmountOut: m }.abi_encode(),
        (TokenSymbol::Oracle, SwapEntry::HubOut) => swapOracleForTrustCall { _amountIn: a, _minAmountOut: m }.abi_encode(),
        (TokenSymbol::Intuit, SwapEntry::HubIn) => swapTrustForIntuitCall { _amountIn: a, _minAmountOut: m }.abi_encode(),
        (TokenSymbol::Intuit, SwapEntry::HubOut) => swapIntuitForTrustCall { _amountIn: a, _minAmountOut: m }.abi_encode(),
        (TokenSymbol::Tswp, SwapEntry::HubIn) => swapTrustForTswpCall { _amountIn: a, _minAmountOut: m }.abi_encode(),
        (TokenSymbol::Tswp, SwapEntry::HubOut) => swapTswpForTrustCall { _amountIn: a, _minAmountOut: m }.abi_encode(),
        (TokenSymbol::Pintu, SwapEntry::HubIn) => swapTrustForPintuCall { _amountIn: a, _minAmountOut: m }.abi_encode(),
        (TokenSymbol::Pintu, SwapEntry::HubOut) => swapPintuForTrustCall { _amountIn: a, _minAmountOut: m }.abi_encode(),
    };
    Some(data.into())
}

pub fn encode_approve(spender: Address, amount: U256) -> Bytes {
    IERC20::approveCall { spender, amount }.abi_encode().into()
}

pub fn encode_router_swap(
    token_in: Address,
    token_out: Address,
    amount_in: U256,
    min_amount_out: U256,
) -> Bytes {
    IDexRouter::swapCall {
        tokenIn: token_in,
        tokenOut: token_out,
        amountIn: amount_in,
        minAmountOut: min_amount_out,
    }
    .abi_encode()
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_signatures() {
        assert_eq!(
            swap_signature(TokenSymbol::Oracle, SwapEntry::HubIn),
            Some("swapTrustForOracle(uint256,uint256)")
        );
        assert_eq!(
            swap_signature(TokenSymbol::Pintu, SwapEntry::HubOut),
            Some("swapPintuForTrust(uint256,uint256)")
        );
        assert_eq!(swap_signature(TokenSymbol::Trust, SwapEntry::HubIn), None);
    }

    #[test]
    fn test_pool_swap_calldata_layout() {
        let data = encode_pool_swap(
            TokenSymbol::Intuit,
            SwapEntry::HubOut,
            U256::from(7u64),
            U256::from(5u64),
        )
        .unwrap();

        assert_eq!(&data[..4], &IHubPool::swapIntuitForTrustCall::SELECTOR[..]);
        assert_eq!(data.len(), 4 + 32 * 2);
        assert_eq!(data[4 + 31], 7);
        assert_eq!(data[4 + 63], 5);
        assert!(encode_pool_swap(TokenSymbol::Trust, SwapEntry::HubIn, U256::ZERO, U256::ZERO).is_none());
    }

    #[test]
    fn test_router_and_approve_selectors() {
        let swap = encode_router_swap(Address::ZERO, Address::repeat_byte(1), U256::from(1u64), U256::ZERO);
        assert_eq!(&swap[..4], &IDexRouter::swapCall::SELECTOR[..]);
        assert_eq!(swap.len(), 4 + 32 * 4);

        let approve = encode_approve(Address::repeat_byte(9), U256::MAX);
        assert_eq!(&approve[..4], &IERC20::approveCall::SELECTOR[..]);
    }
}
