use std::sync::Arc;

use async_trait::async_trait;
use ethers::prelude::SignerMiddleware;
use ethers::providers::{
    Http, Middleware, PendingTransaction as ProviderPendingTransaction,
    Provider,
};
use ethers::signers::{LocalWallet, Signer, Wallet};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::Eip1559TransactionRequest;
use eyre::Context;
use tracing::{debug, info, instrument};

use super::{
    Confirmation, NetworkClient, PendingTransaction, TransactionKind,
    TransactionRequest, TransactionStatus,
};
use crate::cli::PrivateKey;
use crate::error::StepError;
use crate::types::Network;

pub type RpcSigner = SignerMiddleware<Provider<Http>, LocalWallet>;

#[derive(Debug, Clone)]
pub struct EthersClient {
    network: Network,
    signer: Arc<RpcSigner>,
    confirmations: usize,
}

impl EthersClient {
    #[instrument(skip(private_key))]
    pub async fn connect(
        network: Network,
        rpc_url: &str,
        private_key: &PrivateKey,
        confirmations: usize,
    ) -> eyre::Result<Self> {
        let provider = Provider::try_from(rpc_url)
            .with_context(|| format!("Invalid {network} rpc url {rpc_url}"))?;
        let chain_id = provider
            .get_chainid()
            .await
            .with_context(|| format!("Querying {network} chain id"))?;
        let wallet = Wallet::from(private_key.key.clone())
            .with_chain_id(chain_id.as_u64());

        info!(
            %network,
            chain_id = chain_id.as_u64(),
            deployer = ?wallet.address(),
            "Connected"
        );

        let signer = SignerMiddleware::new(provider, wallet);

        Ok(Self {
            network,
            signer: Arc::new(signer),
            confirmations,
        })
    }
}

#[async_trait]
impl NetworkClient for EthersClient {
    fn network(&self) -> Network {
        self.network
    }

    async fn submit(
        &self,
        request: TransactionRequest,
    ) -> Result<PendingTransaction, StepError> {
        let mut tx = match request.fee {
            Some(fee) => TypedTransaction::Legacy(
                ethers::types::TransactionRequest::new()
                    .data(request.data)
                    .gas_price(fee.gas_price),
            ),
            None => TypedTransaction::Eip1559(
                Eip1559TransactionRequest::new().data(request.data),
            ),
        };

        if let TransactionKind::Call { to } = request.kind {
            tx.set_to(to);
        }

        self.signer
            .fill_transaction(&mut tx, None)
            .await
            .map_err(|err| StepError::SubmissionRejected(err.to_string()))?;

        let pending = self
            .signer
            .send_transaction(tx, None)
            .await
            .map_err(|err| StepError::SubmissionRejected(err.to_string()))?;

        let transaction_hash = *pending;
        debug!(network = %self.network, ?transaction_hash, "Submitted");

        Ok(PendingTransaction {
            network: self.network,
            transaction_hash,
            kind: request.kind,
        })
    }

    async fn await_confirmation(
        &self,
        pending: &PendingTransaction,
    ) -> Result<Confirmation, StepError> {
        let receipt = ProviderPendingTransaction::new(
            pending.transaction_hash,
            self.signer.provider(),
        )
        .confirmations(self.confirmations)
        .await
        .map_err(|err| StepError::ConfirmationFailed(err.to_string()))?
        .ok_or_else(|| {
            StepError::ConfirmationFailed(format!(
                "transaction {:?} was dropped",
                pending.transaction_hash
            ))
        })?;

        let status = if receipt.status == Some(1.into()) {
            TransactionStatus::Success
        } else {
            TransactionStatus::Reverted
        };

        Ok(Confirmation {
            transaction_hash: receipt.transaction_hash,
            contract_address: receipt.contract_address,
            status,
        })
    }
}
