//! Wallet client backed by an alloy provider
//!
//! Encodes [`ContractCall`]s from their JSON ABI, signs them with the
//! [`SecureWallet`], submits them over HTTP RPC, and waits for the receipt.

use super::{
    CallArgs, ContractCall, PendingInvocation, SecureWallet, TransactionReceipt, WalletClient,
    WalletError,
};
use crate::amount;
use crate::config::{Network, RpcConfig};
use alloy::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy::json_abi::{Function, JsonAbi};
use alloy::network::{Ethereum, ReceiptResponse};
use alloy::primitives::Bytes;
use alloy::providers::{PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

/// Signs and submits deposits on a single network
pub struct AlloyWalletClient {
    wallet: SecureWallet,
    network: Network,
    rpc_url: url::Url,
}

impl AlloyWalletClient {
    pub fn new(wallet: SecureWallet, network: Network, rpc_url: &str) -> crate::Result<Self> {
        let rpc_url = rpc_url
            .parse()
            .map_err(|e| crate::Error::Config(format!("Invalid RPC URL: {}", e)))?;

        Ok(Self {
            wallet,
            network,
            rpc_url,
        })
    }

    /// Build a client using the RPC URL configured for `network`
    pub fn from_rpc_config(
        wallet: SecureWallet,
        network: Network,
        rpc_config: &RpcConfig,
    ) -> crate::Result<Self> {
        let rpc_url = rpc_config.get(network).ok_or_else(|| {
            crate::Error::Config(format!("No RPC URL configured for {}", network))
        })?;
        Self::new(wallet, network, rpc_url)
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

#[async_trait]
impl WalletClient for AlloyWalletClient {
    async fn invoke_contract(
        &self,
        call: &ContractCall,
    ) -> Result<Box<dyn PendingInvocation>, WalletError> {
        if call.network != self.network {
            return Err(WalletError::WrongNetwork(format!(
                "contract {} is deployed on {}, but the wallet is on {}",
                call.contract_address, call.network, self.network
            )));
        }

        let data = encode_call(call)?;
        let value = amount::to_atomic(call.amount, asset_decimals(call.asset_id)?)
            .map_err(|e| WalletError::InvalidCall(e.to_string()))?;

        let provider = ProviderBuilder::new()
            .wallet(self.wallet.wallet().clone())
            .connect_http(self.rpc_url.clone());

        let tx = TransactionRequest::default()
            .from(self.wallet.address())
            .to(call.contract_address)
            .input(data.into())
            .value(value);

        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| WalletError::Rejected(e.to_string()))?;

        tracing::info!(
            tx_hash = %pending.tx_hash(),
            network = %self.network,
            method = call.method,
            "Transaction submitted"
        );

        Ok(Box::new(AlloyPending {
            inner: pending,
            network: self.network,
        }))
    }
}

struct AlloyPending {
    inner: PendingTransactionBuilder<Ethereum>,
    network: Network,
}

#[async_trait]
impl PendingInvocation for AlloyPending {
    async fn wait(self: Box<Self>) -> Result<TransactionReceipt, WalletError> {
        let network = self.network;
        let receipt = self
            .inner
            .get_receipt()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;

        let transaction_hash = receipt.transaction_hash().to_string();
        if !receipt.status() {
            return Err(WalletError::Reverted(transaction_hash));
        }

        Ok(TransactionReceipt {
            transaction_link: network.transaction_link(&transaction_hash),
            transaction_hash,
        })
    }
}

/// Decimals of the asset ids a call may attach
fn asset_decimals(asset_id: &str) -> Result<u32, WalletError> {
    match asset_id {
        "eth" => Ok(amount::ETH_DECIMALS),
        "gwei" => Ok(9),
        "wei" => Ok(0),
        other => Err(WalletError::InvalidCall(format!(
            "unsupported asset id: {}",
            other
        ))),
    }
}

/// ABI-encode a call's method and named arguments into calldata
pub(crate) fn encode_call(call: &ContractCall) -> Result<Bytes, WalletError> {
    let abi: JsonAbi = serde_json::from_value(call.abi.clone())
        .map_err(|e| WalletError::InvalidCall(format!("invalid ABI: {}", e)))?;

    let function = abi
        .function(call.method)
        .and_then(|overloads| overloads.first())
        .ok_or_else(|| {
            WalletError::InvalidCall(format!("method {} not found in ABI", call.method))
        })?;

    let values = resolve_args(function, &call.args)?;
    let data = function
        .abi_encode_input(&values)
        .map_err(|e| WalletError::InvalidCall(format!("failed to encode {}: {}", call.method, e)))?;

    Ok(Bytes::from(data))
}

fn resolve_args(function: &Function, args: &CallArgs) -> Result<Vec<DynSolValue>, WalletError> {
    if let Some(extra) = args
        .keys()
        .find(|name| !function.inputs.iter().any(|p| &p.name == *name))
    {
        return Err(WalletError::InvalidCall(format!(
            "unexpected argument {} for {}",
            extra, function.name
        )));
    }

    function
        .inputs
        .iter()
        .map(|param| {
            let raw = args.get(&param.name).ok_or_else(|| {
                WalletError::InvalidCall(format!("missing argument {}", param.name))
            })?;
            let ty: DynSolType = param
                .resolve()
                .map_err(|e| WalletError::InvalidCall(format!("{}: {}", param.name, e)))?;
            ty.coerce_str(raw).map_err(|e| {
                WalletError::InvalidCall(format!("argument {}: {}", param.name, e))
            })
        })
        .collect()
}
