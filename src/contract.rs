use async_trait::async_trait;
use multiversx_sc::types::Address;
use num_bigint::BigUint;

use crate::record::{AssetDraft, ProposalDraft, RawDonation, RawProposal, VoteTally};

/// Failure reported by a contract call: a transport error, a rejected
/// signature or a reverted transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxFailure {
    /// Provider error code when one is known, e.g. `"4001"`
    pub code: Option<String>,
    pub message: String,
}

impl TxFailure {
    pub fn new(message: impl Into<String>) -> Self {
        TxFailure {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        TxFailure {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub success: bool,
}

/// Read and write surface of the external donation and voting contracts.
///
/// Implementations wrap whatever transport reaches the chain. Views map to
/// `getProposalCount`, `getProposal`, `getDonors`, `getVotes`,
/// `isProposalApproved` and the reward token's `balanceOf`.
#[async_trait]
pub trait DonationContract: Send + Sync {
    async fn proposal_count(&self) -> Result<u64, TxFailure>;

    async fn proposal(&self, id: u64) -> Result<RawProposal, TxFailure>;

    async fn donors(&self, id: u64) -> Result<Vec<RawDonation>, TxFailure>;

    async fn votes(&self, id: u64) -> Result<VoteTally, TxFailure>;

    async fn is_proposal_approved(&self, id: u64) -> Result<bool, TxFailure>;

    async fn token_balance(&self, owner: &Address) -> Result<BigUint, TxFailure>;

    async fn create_proposal(&self, from: &Address, draft: &ProposalDraft) -> Result<TxReceipt, TxFailure>;

    async fn donate(&self, from: &Address, id: u64, amount: &BigUint) -> Result<TxReceipt, TxFailure>;

    async fn vote(&self, from: &Address, id: u64, support: bool) -> Result<TxReceipt, TxFailure>;

    async fn execute_proposal(&self, from: &Address, id: u64) -> Result<TxReceipt, TxFailure>;

    async fn withdraw(&self, from: &Address, id: u64) -> Result<TxReceipt, TxFailure>;

    async fn mint_tokens(&self, from: &Address, to: &Address, amount: &BigUint) -> Result<TxReceipt, TxFailure>;

    async fn transfer_tokens(&self, from: &Address, to: &Address, amount: &BigUint) -> Result<TxReceipt, TxFailure>;

    async fn tokenize_asset(&self, from: &Address, asset: &AssetDraft) -> Result<TxReceipt, TxFailure>;
}
