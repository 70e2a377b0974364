//! ERC20 token contract bindings.
//!
//! Only the metadata the panel needs to scale amounts.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function decimals() external view returns (uint8);
    }
}
