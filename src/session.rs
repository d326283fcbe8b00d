use multiversx_sc::types::Address;
use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

use crate::amount::{parse_units, AmountError};
use crate::contract::{DonationContract, TxFailure, TxReceipt};
use crate::record::{AssetDraft, ProposalDraft};

/// Provider codes for a signature the user declined
const REJECTED_CODES: &[&str] = &["4001", "ACTION_REJECTED"];
const INSUFFICIENT_FUNDS_CODES: &[&str] = &["INSUFFICIENT_FUNDS"];
const NETWORK_CODES: &[&str] = &["NETWORK_ERROR", "TIMEOUT", "SERVER_ERROR"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Please connect your wallet to continue.")]
    WalletNotConnected,

    #[error("Amount must be greater than zero.")]
    ZeroAmount,

    #[error("Please fill out all fields.")]
    MissingFields,

    #[error("This asset proposal has not been approved by the community.")]
    NotApproved(u64),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Transaction was rejected in the wallet.")]
    Rejected,

    #[error("Insufficient funds for this transaction.")]
    InsufficientFunds,

    #[error("Network error, please try again: {0}")]
    Network(String),

    #[error("Transaction {0} failed on chain.")]
    Reverted(String),

    #[error("Transaction failed: {0}")]
    Failed(String),
}

/// Maps a provider failure onto the known error classes.
pub fn classify(failure: TxFailure) -> ActionError {
    let Some(code) = failure.code.as_deref() else {
        return ActionError::Failed(failure.message);
    };
    if REJECTED_CODES.contains(&code) {
        ActionError::Rejected
    } else if INSUFFICIENT_FUNDS_CODES.contains(&code) {
        ActionError::InsufficientFunds
    } else if NETWORK_CODES.contains(&code) {
        ActionError::Network(failure.message)
    } else {
        ActionError::Failed(failure.message)
    }
}

/// Wallet connection state, supplied by whatever wallet integration the
/// page uses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletSession {
    pub connected: bool,
    pub address: Option<Address>,
}

impl WalletSession {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(address: Address) -> Self {
        WalletSession {
            connected: true,
            address: Some(address),
        }
    }

    /// The signing address, or [`ActionError::WalletNotConnected`].
    pub fn require_address(&self) -> Result<&Address, ActionError> {
        match (&self.address, self.connected) {
            (Some(address), true) => Ok(address),
            _ => Err(ActionError::WalletNotConnected),
        }
    }
}

/// Write endpoints of the donation contract, signed by the session wallet.
pub struct Actions<'a, C: DonationContract + ?Sized> {
    contract: &'a C,
    session: &'a WalletSession,
}

impl<'a, C: DonationContract + ?Sized> Actions<'a, C> {
    pub fn new(contract: &'a C, session: &'a WalletSession) -> Self {
        Actions { contract, session }
    }

    pub async fn donate(&self, id: u64, amount: &BigUint) -> Result<TxReceipt, ActionError> {
        let from = self.session.require_address()?;
        self.send_donation(from, id, amount).await
    }

    /// Donates a user-entered decimal amount such as `"12.5"`.
    pub async fn donate_input(&self, id: u64, input: &str, decimals: u32) -> Result<TxReceipt, ActionError> {
        let from = self.session.require_address()?;
        let amount = parse_units(input, decimals)?;
        self.send_donation(from, id, &amount).await
    }

    pub async fn vote(&self, id: u64, support: bool) -> Result<TxReceipt, ActionError> {
        let from = self.session.require_address()?;
        settle("vote", self.contract.vote(from, id, support).await)
    }

    pub async fn execute_proposal(&self, id: u64) -> Result<TxReceipt, ActionError> {
        let from = self.session.require_address()?;
        settle("executeProposal", self.contract.execute_proposal(from, id).await)
    }

    pub async fn withdraw(&self, id: u64) -> Result<TxReceipt, ActionError> {
        let from = self.session.require_address()?;
        settle("withdraw", self.contract.withdraw(from, id).await)
    }

    pub async fn mint_tokens(&self, to: &Address, amount: &BigUint) -> Result<TxReceipt, ActionError> {
        let from = self.session.require_address()?;
        if amount.is_zero() {
            return Err(ActionError::ZeroAmount);
        }
        settle("mintTokens", self.contract.mint_tokens(from, to, amount).await)
    }

    pub async fn create_proposal(&self, draft: &ProposalDraft) -> Result<TxReceipt, ActionError> {
        let from = self.session.require_address()?;
        self.submit_proposal(from, draft).await
    }

    /// Creates a proposal from form input; the goal is a decimal amount.
    pub async fn create_proposal_input(
        &self,
        title: &str,
        description: &str,
        goal: &str,
        beneficiary: &Address,
        decimals: u32,
    ) -> Result<TxReceipt, ActionError> {
        let from = self.session.require_address()?;
        if goal.trim().is_empty() {
            return Err(ActionError::MissingFields);
        }
        let draft = ProposalDraft {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            goal: parse_units(goal, decimals)?,
            beneficiary: beneficiary.clone(),
        };
        self.submit_proposal(from, &draft).await
    }

    /// Puts an asset up for approval as a zero-goal proposal owned by the
    /// session wallet.
    pub async fn propose_asset(&self, asset: &AssetDraft) -> Result<TxReceipt, ActionError> {
        let from = self.session.require_address()?;
        if !asset.is_complete() {
            return Err(ActionError::MissingFields);
        }
        self.submit_proposal(from, &asset.approval_proposal(from)).await
    }

    /// Tokenizes an asset once its approval proposal has passed.
    pub async fn tokenize_asset(&self, proposal_id: u64, asset: &AssetDraft) -> Result<TxReceipt, ActionError> {
        let from = self.session.require_address()?;
        if !asset.is_complete() {
            return Err(ActionError::MissingFields);
        }
        let approved = self
            .contract
            .is_proposal_approved(proposal_id)
            .await
            .map_err(classify)?;
        if !approved {
            return Err(ActionError::NotApproved(proposal_id));
        }
        settle("tokenizeAsset", self.contract.tokenize_asset(from, asset).await)
    }

    /// Reward token balance of the session wallet, fixed-point.
    pub async fn token_balance(&self) -> Result<BigUint, ActionError> {
        let owner = self.session.require_address()?;
        self.contract.token_balance(owner).await.map_err(classify)
    }

    pub async fn transfer_tokens(&self, to: &Address, amount: &BigUint) -> Result<TxReceipt, ActionError> {
        let from = self.session.require_address()?;
        self.send_transfer(from, to, amount).await
    }

    pub async fn transfer_input(&self, to: &Address, input: &str, decimals: u32) -> Result<TxReceipt, ActionError> {
        let from = self.session.require_address()?;
        let amount = parse_units(input, decimals)?;
        self.send_transfer(from, to, &amount).await
    }

    async fn send_donation(&self, from: &Address, id: u64, amount: &BigUint) -> Result<TxReceipt, ActionError> {
        if amount.is_zero() {
            return Err(ActionError::ZeroAmount);
        }
        settle("donate", self.contract.donate(from, id, amount).await)
    }

    async fn submit_proposal(&self, from: &Address, draft: &ProposalDraft) -> Result<TxReceipt, ActionError> {
        if !draft.is_complete() {
            return Err(ActionError::MissingFields);
        }
        settle("createProposal", self.contract.create_proposal(from, draft).await)
    }

    async fn send_transfer(&self, from: &Address, to: &Address, amount: &BigUint) -> Result<TxReceipt, ActionError> {
        if amount.is_zero() {
            return Err(ActionError::ZeroAmount);
        }
        settle("transfer", self.contract.transfer_tokens(from, to, amount).await)
    }
}

fn settle(endpoint: &str, result: Result<TxReceipt, TxFailure>) -> Result<TxReceipt, ActionError> {
    let outcome = match result {
        Ok(receipt) if receipt.success => Ok(receipt),
        Ok(receipt) => Err(ActionError::Reverted(receipt.tx_hash)),
        Err(failure) => Err(classify(failure)),
    };
    if let Err(err) = &outcome {
        log::warn!("{endpoint} failed: {err}");
    }
    outcome
}
