use indicatif::{ProgressBar, ProgressStyle};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::{Deserialize, Serialize};

use handlebox_app::state::StateSchema;
use handlebox_types::primitives::{Amount, AppId, Round};

use crate::error::DeployError;

/// Default RPC request timeout in seconds.
const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;

/// Storage-schema declaration sent with the creation transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SchemaParams {
    pub num_uints: u32,
    pub num_byte_slices: u32,
}

impl From<StateSchema> for SchemaParams {
    fn from(schema: StateSchema) -> Self {
        Self {
            num_uints: schema.num_uints,
            num_byte_slices: schema.num_byte_slices,
        }
    }
}

/// Result of compiling a program artifact on the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileResult {
    /// Hex-encoded compiled bytecode.
    pub bytecode: String,
}

/// Result of creating an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplicationResult {
    pub app_id: AppId,
    /// Hex-encoded application address.
    pub address: String,
}

/// Result of submitting an atomic group; returned after inclusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResult {
    pub success: bool,
    pub round: Option<Round>,
    pub reason: Option<String>,
    /// Log lines emitted by accepted application calls.
    #[serde(default)]
    pub logs: Vec<String>,
}

/// A storage slot read back from the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxResult {
    /// Hex-encoded box name.
    pub name: String,
    /// Hex-encoded box value.
    pub value: String,
}

/// JSON-RPC client for the ledger node.
pub struct NodeClient {
    client: HttpClient,
}

impl NodeClient {
    /// Create a new RPC client.
    pub fn new(url: &str) -> Result<Self, DeployError> {
        let client = HttpClientBuilder::default()
            .request_timeout(std::time::Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS))
            .build(url)
            .map_err(|e| DeployError::Rpc(format!("failed to connect: {}", e)))?;
        Ok(Self { client })
    }

    /// Create a spinner for an RPC operation.
    fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("  {spinner} {msg}")
                .expect("valid template"),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }

    /// Wrap an RPC call with a better connection error message.
    fn map_rpc_error(e: &jsonrpsee::core::ClientError) -> DeployError {
        let msg = e.to_string();
        if msg.contains("connection")
            || msg.contains("Connection")
            || msg.contains("refused")
            || msg.contains("SendRequest")
            || msg.contains("send request")
        {
            DeployError::Rpc(
                "Could not connect to node.\nHint: pass --node-url or set node_url in handlebox.toml"
                    .to_string(),
            )
        } else {
            DeployError::Rpc(msg)
        }
    }

    /// Compile a program artifact's text form to bytecode on the node.
    pub async fn compile_program(&self, source: &str) -> Result<CompileResult, DeployError> {
        let pb = Self::spinner("Compiling program...");
        let result: CompileResult = self
            .client
            .request("handlebox_compileProgram", rpc_params![source])
            .await
            .map_err(|e| Self::map_rpc_error(&e))?;
        pb.finish_and_clear();
        Ok(result)
    }

    /// Create the application from compiled programs and a schema.
    pub async fn create_application(
        &self,
        sender: &str,
        approval_bytecode: &str,
        clear_bytecode: &str,
        schema: SchemaParams,
    ) -> Result<CreateApplicationResult, DeployError> {
        let pb = Self::spinner("Creating application...");
        let result: CreateApplicationResult = self
            .client
            .request(
                "handlebox_createApplication",
                rpc_params![sender, approval_bytecode, clear_bytecode, schema],
            )
            .await
            .map_err(|e| Self::map_rpc_error(&e))?;
        pb.finish_and_clear();
        Ok(result)
    }

    /// Submit an atomic group of signed transactions (hex-encoded borsh)
    /// and wait for inclusion.
    pub async fn submit_group(&self, txns: Vec<String>) -> Result<SubmitResult, DeployError> {
        let pb = Self::spinner("Submitting transaction group...");
        let result: SubmitResult = self
            .client
            .request("handlebox_submitGroup", rpc_params![txns])
            .await
            .map_err(|e| Self::map_rpc_error(&e))?;
        pb.finish_and_clear();
        Ok(result)
    }

    /// Read a box by application id and hex-encoded name. `None` when the
    /// box was never written.
    pub async fn get_box(
        &self,
        app_id: AppId,
        name: &str,
    ) -> Result<Option<BoxResult>, DeployError> {
        let pb = Self::spinner("Reading box...");
        let result: Option<BoxResult> = self
            .client
            .request("handlebox_getBox", rpc_params![app_id, name])
            .await
            .map_err(|e| Self::map_rpc_error(&e))?;
        pb.finish_and_clear();
        Ok(result)
    }

    /// Get an account balance in microunits.
    pub async fn get_balance(&self, address: &str) -> Result<Amount, DeployError> {
        let pb = Self::spinner("Fetching balance...");
        let result: Amount = self
            .client
            .request("handlebox_getBalance", rpc_params![address])
            .await
            .map_err(|e| Self::map_rpc_error(&e))?;
        pb.finish_and_clear();
        Ok(result)
    }
}
