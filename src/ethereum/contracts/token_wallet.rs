//! Token-wallet contract bindings.

use alloy::sol;

// Simple token wallet: custodies ERC20 balances per user.
sol! {
    #[sol(rpc)]
    interface ITokenWallet {
        function deposit(address token, uint256 amount) external;
        function withdraw(address token, uint256 amount) external;
        function balanceOf(address user, address token) external view returns (uint256);
    }
}
