//! MCP server implementation.
//!
//! Every control of the panel is a tool; each tool returns the re-rendered
//! panel as JSON.

use std::sync::Arc;

use alloy::primitives::Address;
use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::AppError,
    ethereum::{EthereumClient, WalletManager},
    services::{ContractReader, ContractWriter, PanelSettings, RpcGateway, WalletActionPanel},
    types::{Session, WalletAction},
};

/// Token Wallet MCP Server.
///
/// Lets the connected account deposit tokens into and withdraw them from the
/// token-wallet contract, and shows its balance there.
#[derive(Clone)]
pub struct TokenWalletServer {
    /// Events are applied to the panel one at a time.
    panel: Arc<Mutex<WalletActionPanel>>,
    reader: Arc<dyn ContractReader>,
    writer: Arc<dyn ContractWriter>,
    /// Account the connect control signs in with.
    account: Address,
    tool_router: ToolRouter<Self>,
}

impl TokenWalletServer {
    /// Create a new Token Wallet MCP Server.
    ///
    /// Note: This uses lazy initialization - no network calls are made during
    /// server startup.
    pub fn new(config: Config) -> Result<Self, AppError> {
        tracing::info!(contract = %config.wallet_contract, "Initializing Token Wallet MCP Server");

        let wallet = WalletManager::from_private_key(&config.private_key)?;
        let client = Arc::new(EthereumClient::new(&config.rpc_url, &wallet)?);
        let gateway = Arc::new(RpcGateway::new(client, wallet.address()));

        let server = Self::with_gateways(
            PanelSettings::from(&config),
            wallet.address(),
            gateway.clone(),
            gateway,
        );

        tracing::info!("Token Wallet MCP Server initialized successfully");

        Ok(server)
    }

    /// Create a server over arbitrary gateways.
    pub fn with_gateways(
        settings: PanelSettings,
        account: Address,
        reader: Arc<dyn ContractReader>,
        writer: Arc<dyn ContractWriter>,
    ) -> Self {
        let panel = WalletActionPanel::new(settings, reader.clone(), writer.clone());

        Self {
            panel: Arc::new(Mutex::new(panel)),
            reader,
            writer,
            account,
            tool_router: Self::tool_router(),
        }
    }

    /// Shared handle to the panel.
    pub fn panel(&self) -> Arc<Mutex<WalletActionPanel>> {
        self.panel.clone()
    }

    async fn render(&self) -> Result<String, McpError> {
        let view = self.panel.lock().await.render();
        serde_json::to_string_pretty(&view)
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }

    /// Fetch token decimals if the panel is waiting for them.
    ///
    /// The panel lock is released during the call; a result for a token the
    /// user has already replaced is discarded by the panel.
    async fn resolve_token_decimals(&self) {
        let Some(token) = self.panel.lock().await.decimals_lookup_needed() else {
            return;
        };

        let decimals = match self.reader.token_decimals(token).await {
            Ok(decimals) => Some(decimals),
            Err(e) => {
                tracing::warn!(token = %token, error = %e, "Token decimals lookup failed, using fallback");
                None
            }
        };

        self.panel.lock().await.record_token_decimals(token, decimals);
    }

    /// Dry-run the deposit and withdraw calls the panel has not prepared yet.
    ///
    /// Same locking as the decimals lookup: outcomes for requests the inputs
    /// no longer produce are discarded by the panel.
    async fn prepare_actions(&self) {
        let requests = self.panel.lock().await.preparations_needed();

        for request in requests {
            let outcome = self.writer.prepare(&request).await;
            self.panel.lock().await.record_preparation(request, outcome);
        }
    }

    /// Bring derived state up to date after an input or session change.
    async fn refresh(&self) {
        self.resolve_token_decimals().await;
        self.prepare_actions().await;
    }

    async fn submit(&self, action: WalletAction) -> Result<String, McpError> {
        let submitted = self.panel.lock().await.submit(action);
        if submitted.is_none() {
            tracing::info!(action = %action, "Action unavailable, nothing submitted");
        }
        self.render().await
    }
}

/// Input parameters for the set_token_address tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct SetTokenAddressInput {
    /// ERC20 token contract address (0x...). Stored as typed.
    pub token_address: String,
}

/// Input parameters for the set_amount tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct SetAmountInput {
    /// Amount in whole tokens (human-readable, e.g., "1.5"). Stored as typed.
    pub amount: String,
}

#[tool_router]
impl TokenWalletServer {
    /// Connect the configured wallet.
    #[tool(description = "Connect the wallet. Required before any other action is available.")]
    pub async fn connect_wallet(&self) -> Result<String, McpError> {
        tracing::info!(account = %self.account, "connect_wallet called");

        self.panel.lock().await.set_session(Session::connected(self.account));
        self.refresh().await;
        self.render().await
    }

    /// Disconnect the wallet. Stops the balance watch.
    #[tool(description = "Disconnect the wallet")]
    pub async fn disconnect_wallet(&self) -> Result<String, McpError> {
        tracing::info!("disconnect_wallet called");

        self.panel.lock().await.set_session(Session::disconnected());
        self.render().await
    }

    /// Edit the token address field.
    #[tool(
        description = "Set the token address field. The balance readout follows the new token; deposit and withdraw are re-derived and dry-run."
    )]
    pub async fn set_token_address(
        &self,
        Parameters(input): Parameters<SetTokenAddressInput>,
    ) -> Result<String, McpError> {
        tracing::info!(token = %input.token_address, "set_token_address called");

        self.panel.lock().await.on_token_address_change(input.token_address);
        self.refresh().await;
        self.render().await
    }

    /// Edit the amount field.
    #[tool(description = "Set the amount field (in whole tokens, e.g. \"1.5\")")]
    pub async fn set_amount(
        &self,
        Parameters(input): Parameters<SetAmountInput>,
    ) -> Result<String, McpError> {
        tracing::info!(amount = %input.amount, "set_amount called");

        self.panel.lock().await.on_amount_change(input.amount);
        self.refresh().await;
        self.render().await
    }

    /// Press the deposit button.
    ///
    /// Does nothing while the button is disabled. The transaction runs in the
    /// background; its progress shows in the panel's deposit status.
    #[tool(description = "Deposit the entered amount of the entered token into the wallet contract")]
    pub async fn deposit(&self) -> Result<String, McpError> {
        tracing::info!("deposit called");
        self.submit(WalletAction::Deposit).await
    }

    /// Press the withdraw button.
    #[tool(description = "Withdraw the entered amount of the entered token from the wallet contract")]
    pub async fn withdraw(&self) -> Result<String, McpError> {
        tracing::info!("withdraw called");
        self.submit(WalletAction::Withdraw).await
    }

    /// Render the panel without changing anything.
    #[tool(
        description = "Show the panel: connection, inputs, whether deposit/withdraw are enabled, submission status and the wallet balance for the token"
    )]
    pub async fn get_panel(&self) -> Result<String, McpError> {
        tracing::debug!("get_panel called");
        self.render().await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for TokenWalletServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "token-wallet-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Token Wallet MCP Server. Connect the wallet, set a token address and an \
                 amount, then deposit into or withdraw from the token-wallet contract."
                    .to_string(),
            ),
        }
    }
}
