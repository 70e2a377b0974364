//! Contract call requests derived from panel state.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};
use serde::{Deserialize, Serialize};

use crate::ethereum::contracts::ITokenWallet;

/// State-mutating action offered by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletAction {
    /// Move tokens from the account into the wallet contract.
    Deposit,
    /// Move tokens from the wallet contract back to the account.
    Withdraw,
}

impl WalletAction {
    /// Contract function the action calls.
    pub fn function_name(&self) -> &'static str {
        match self {
            WalletAction::Deposit => "deposit",
            WalletAction::Withdraw => "withdraw",
        }
    }
}

impl std::fmt::Display for WalletAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.function_name())
    }
}

/// Contract call in display form: address, function name and stringified
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallParameters {
    /// Target contract address.
    pub contract: String,
    /// Function name.
    pub function: String,
    /// Arguments in ABI order.
    pub args: Vec<String>,
}

/// `balanceOf(user, token)` read against the wallet contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BalanceQuery {
    pub contract: Address,
    pub user: Address,
    pub token: Address,
}

impl BalanceQuery {
    pub const FUNCTION: &'static str = "balanceOf";

    /// ABI-encoded calldata.
    pub fn calldata(&self) -> Bytes {
        ITokenWallet::balanceOfCall { user: self.user, token: self.token }.abi_encode().into()
    }

    pub fn parameters(&self) -> CallParameters {
        CallParameters {
            contract: format!("{:?}", self.contract),
            function: Self::FUNCTION.to_string(),
            args: vec![format!("{:?}", self.user), format!("{:?}", self.token)],
        }
    }
}

/// `deposit(token, amount)` or `withdraw(token, amount)` against the wallet
/// contract. `amount` is already scaled to the token's smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteRequest {
    pub contract: Address,
    pub action: WalletAction,
    pub token: Address,
    pub amount: U256,
}

impl WriteRequest {
    /// ABI-encoded calldata.
    pub fn calldata(&self) -> Bytes {
        let (token, amount) = (self.token, self.amount);
        let data = match self.action {
            WalletAction::Deposit => ITokenWallet::depositCall { token, amount }.abi_encode(),
            WalletAction::Withdraw => ITokenWallet::withdrawCall { token, amount }.abi_encode(),
        };
        data.into()
    }

    pub fn parameters(&self) -> CallParameters {
        CallParameters {
            contract: format!("{:?}", self.contract),
            function: self.action.function_name().to_string(),
            args: vec![format!("{:?}", self.token), self.amount.to_string()],
        }
    }
}
