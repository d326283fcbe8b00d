use multiversx_sc::types::Address;
use num_bigint::BigUint;
use thiserror::Error;

use crate::amount::{format_units, parse_units};
use crate::config::ViewConfig;
use crate::contract::{DonationContract, TxReceipt};
use crate::filter::{self, StatusFilter};
use crate::normalize::{DonorView, Normalizer, ProposalView};
use crate::reader::{ChainReader, FetchError, ViewGuard};
use crate::record::{AssetDraft, ProposalDraft};
use crate::rewards::{Reward, RewardSchedule};
use crate::session::{ActionError, Actions, WalletSession};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("Proposal {0} is not on the board")]
    UnknownProposal(u64),

    #[error("Proposal {0} has already been executed")]
    AlreadyExecuted(u64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProposalDetail {
    pub proposal: ProposalView,
    pub donors: Vec<DonorView>,
}

impl ProposalDetail {
    pub fn donor_count(&self) -> usize {
        self.donors.len()
    }
}

/// A confirmed donation and the reward tier it earned, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DonationOutcome {
    pub receipt: TxReceipt,
    pub reward: Option<Reward>,
}

/// Read snapshot of the donation contract for one page view.
///
/// The snapshot lives as long as the board. [`ProposalBoard::teardown`]
/// drops any read still in flight.
pub struct ProposalBoard {
    config: ViewConfig,
    reader: ChainReader,
    normalizer: Normalizer,
    rewards: RewardSchedule,
    guard: ViewGuard,
    with_votes: bool,
    proposals: Vec<ProposalView>,
    message: Option<String>,
}

impl ProposalBoard {
    pub fn new(config: ViewConfig) -> Self {
        ProposalBoard {
            reader: ChainReader::from_config(&config),
            normalizer: Normalizer::from_config(&config),
            rewards: RewardSchedule::from_config(&config),
            config,
            guard: ViewGuard::new(),
            with_votes: false,
            proposals: Vec::new(),
            message: None,
        }
    }

    /// A board that also loads vote tallies on every refresh.
    pub fn voting(config: ViewConfig) -> Self {
        ProposalBoard {
            with_votes: true,
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn guard(&self) -> ViewGuard {
        self.guard.clone()
    }

    pub fn proposals(&self) -> &[ProposalView] {
        &self.proposals
    }

    pub fn get(&self, id: u64) -> Option<&ProposalView> {
        self.proposals.iter().find(|p| p.id == id)
    }

    /// Last user-visible message: a load failure or a failed action.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn visible(&self, status: StatusFilter, term: &str) -> Vec<&ProposalView> {
        filter::apply(&self.proposals, status, term)
    }

    pub fn search_votes(&self, term: &str) -> Vec<&ProposalView> {
        filter::search_by_title_or_id(&self.proposals, term)
    }

    pub fn reward_for(&self, amount: &BigUint) -> Option<Reward> {
        self.rewards.reward_for(amount)
    }

    pub fn reward_lines(&self) -> Vec<String> {
        RewardSchedule::describe(&self.config)
    }

    pub fn tick(&mut self, now_ms: u64) {
        for proposal in &mut self.proposals {
            proposal.tick(now_ms);
        }
    }

    pub fn teardown(&mut self) {
        self.guard.unmount();
    }

    /// Replaces the snapshot with a fresh read and returns the number of
    /// listed proposals.
    ///
    /// If the count cannot be read the previous snapshot stays and the
    /// failure becomes the board message.
    pub async fn refresh<C>(&mut self, contract: &C, now_ms: u64) -> Result<usize, BoardError>
    where
        C: DonationContract + ?Sized,
    {
        let raw = match self.reader.fetch_proposals(contract, &self.guard).await {
            Ok(raw) => raw,
            Err(FetchError::Discarded) => return Err(FetchError::Discarded.into()),
            Err(err) => {
                log::warn!("{err}");
                self.message = Some(err.to_string());
                return Err(err.into());
            }
        };

        let mut proposals = self.normalizer.proposals(&raw, now_ms);
        if self.with_votes {
            let ids: Vec<u64> = proposals.iter().map(|p| p.id).collect();
            let tallies = self.reader.fetch_tallies(contract, &ids, &self.guard).await?;
            for (id, tally) in tallies {
                if let Some(proposal) = proposals.iter_mut().find(|p| p.id == id) {
                    proposal.votes = Some(tally);
                }
            }
        }

        self.proposals = proposals;
        self.message = None;
        Ok(self.proposals.len())
    }

    pub async fn detail<C>(&self, contract: &C, id: u64) -> Result<ProposalDetail, BoardError>
    where
        C: DonationContract + ?Sized,
    {
        let proposal = self.get(id).cloned().ok_or(BoardError::UnknownProposal(id))?;
        let donors = self
            .reader
            .fetch_donors(contract, id, &self.guard)
            .await?
            .iter()
            .map(|donor| self.normalizer.donor(donor))
            .collect();
        Ok(ProposalDetail { proposal, donors })
    }

    pub async fn donate<C>(
        &mut self,
        contract: &C,
        session: &WalletSession,
        id: u64,
        input: &str,
        now_ms: u64,
    ) -> Result<DonationOutcome, BoardError>
    where
        C: DonationContract + ?Sized,
    {
        self.open_proposal(session, id)?;
        let result = match parse_units(input, self.config.token_decimals) {
            Ok(amount) => Actions::new(contract, session)
                .donate(id, &amount)
                .await
                .map(|receipt| DonationOutcome {
                    receipt,
                    reward: self.rewards.reward_for(&amount),
                }),
            Err(err) => Err(err.into()),
        };
        let outcome = self.record_outcome(result)?;
        self.reload(contract, now_ms).await;
        Ok(outcome)
    }

    pub async fn vote<C>(
        &mut self,
        contract: &C,
        session: &WalletSession,
        id: u64,
        support: bool,
        now_ms: u64,
    ) -> Result<TxReceipt, BoardError>
    where
        C: DonationContract + ?Sized,
    {
        self.open_proposal(session, id)?;
        let result = Actions::new(contract, session).vote(id, support).await;
        let receipt = self.record_outcome(result)?;
        if let Some(proposal) = self.proposals.iter_mut().find(|p| p.id == id) {
            proposal.votes.get_or_insert_with(Default::default).record(support);
        }
        self.reload(contract, now_ms).await;
        Ok(receipt)
    }

    pub async fn execute<C>(
        &mut self,
        contract: &C,
        session: &WalletSession,
        id: u64,
        now_ms: u64,
    ) -> Result<TxReceipt, BoardError>
    where
        C: DonationContract + ?Sized,
    {
        self.open_proposal(session, id)?;
        let result = Actions::new(contract, session).execute_proposal(id).await;
        let receipt = self.record_outcome(result)?;
        if let Some(proposal) = self.proposals.iter_mut().find(|p| p.id == id) {
            proposal.mark_executed();
        }
        self.reload(contract, now_ms).await;
        Ok(receipt)
    }

    pub async fn withdraw<C>(
        &mut self,
        contract: &C,
        session: &WalletSession,
        id: u64,
        now_ms: u64,
    ) -> Result<TxReceipt, BoardError>
    where
        C: DonationContract + ?Sized,
    {
        self.open_proposal(session, id)?;
        let result = Actions::new(contract, session).withdraw(id).await;
        let receipt = self.record_outcome(result)?;
        self.reload(contract, now_ms).await;
        Ok(receipt)
    }

    /// Submits a new proposal and reloads the board so it shows up.
    pub async fn create_proposal<C>(
        &mut self,
        contract: &C,
        session: &WalletSession,
        draft: &ProposalDraft,
        now_ms: u64,
    ) -> Result<TxReceipt, BoardError>
    where
        C: DonationContract + ?Sized,
    {
        self.require_wallet(session)?;
        let result = Actions::new(contract, session).create_proposal(draft).await;
        let receipt = self.record_outcome(result)?;
        self.reload(contract, now_ms).await;
        Ok(receipt)
    }

    pub async fn propose_asset<C>(
        &mut self,
        contract: &C,
        session: &WalletSession,
        asset: &AssetDraft,
        now_ms: u64,
    ) -> Result<TxReceipt, BoardError>
    where
        C: DonationContract + ?Sized,
    {
        self.require_wallet(session)?;
        let result = Actions::new(contract, session).propose_asset(asset).await;
        let receipt = self.record_outcome(result)?;
        self.reload(contract, now_ms).await;
        Ok(receipt)
    }

    pub async fn tokenize_asset<C>(
        &mut self,
        contract: &C,
        session: &WalletSession,
        proposal_id: u64,
        asset: &AssetDraft,
    ) -> Result<TxReceipt, BoardError>
    where
        C: DonationContract + ?Sized,
    {
        self.require_wallet(session)?;
        let result = Actions::new(contract, session)
            .tokenize_asset(proposal_id, asset)
            .await;
        self.record_outcome(result)
    }

    /// Reward token balance of the session wallet in display units.
    pub async fn token_balance<C>(&mut self, contract: &C, session: &WalletSession) -> Result<String, BoardError>
    where
        C: DonationContract + ?Sized,
    {
        self.require_wallet(session)?;
        let result = Actions::new(contract, session).token_balance().await;
        let balance = self.record_outcome(result)?;
        Ok(format_units(&balance, self.config.token_decimals))
    }

    pub async fn transfer_tokens<C>(
        &mut self,
        contract: &C,
        session: &WalletSession,
        to: &Address,
        input: &str,
    ) -> Result<TxReceipt, BoardError>
    where
        C: DonationContract + ?Sized,
    {
        self.require_wallet(session)?;
        let result = Actions::new(contract, session)
            .transfer_input(to, input, self.config.token_decimals)
            .await;
        self.record_outcome(result)
    }

    /// Wallet first, so a disconnected user always sees the connect prompt.
    fn require_wallet(&mut self, session: &WalletSession) -> Result<(), BoardError> {
        if let Err(err) = session.require_address() {
            self.message = Some(err.to_string());
            return Err(err.into());
        }
        Ok(())
    }

    fn open_proposal(&mut self, session: &WalletSession, id: u64) -> Result<(), BoardError> {
        self.require_wallet(session)?;
        match self.get(id) {
            None => Err(BoardError::UnknownProposal(id)),
            Some(proposal) if proposal.executed => Err(BoardError::AlreadyExecuted(id)),
            Some(_) => Ok(()),
        }
    }

    fn record_outcome<T>(&mut self, result: Result<T, ActionError>) -> Result<T, BoardError> {
        match result {
            Ok(value) => {
                self.message = None;
                Ok(value)
            }
            Err(err) => {
                self.message = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    async fn reload<C>(&mut self, contract: &C, now_ms: u64)
    where
        C: DonationContract + ?Sized,
    {
        if let Err(err) = self.refresh(contract, now_ms).await {
            log::debug!("refresh after write failed: {err}");
        }
    }
}
