use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use thiserror::Error;

use crate::config::ViewConfig;
use crate::contract::DonationContract;
use crate::record::{RawDonation, RawProposal, VoteTally};

/// Proposal count accepted when no config says otherwise
pub const DEFAULT_MAX_PROPOSALS: u64 = 10_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Failed to read proposal count: {0}")]
    Count(String),

    #[error("Failed to read proposal {id}: {message}")]
    Proposal { id: u64, message: String },

    #[error("Failed to read donors of proposal {id}: {message}")]
    Donors { id: u64, message: String },

    #[error("Failed to read votes of proposal {id}: {message}")]
    Votes { id: u64, message: String },

    #[error("Contract reports {count} proposals, more than the {max} this view loads")]
    TooManyProposals { count: u64, max: u64 },

    #[error("View closed before the read completed")]
    Discarded,
}

/// Tracks whether the view that started a read is still on screen.
///
/// Clones share the flag, so a fetch can hold one while the page keeps the
/// other and unmounts it on navigation.
#[derive(Clone, Debug)]
pub struct ViewGuard {
    mounted: Arc<AtomicBool>,
}

impl Default for ViewGuard {
    fn default() -> Self {
        ViewGuard {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl ViewGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    fn check(&self) -> Result<(), FetchError> {
        if self.is_mounted() {
            Ok(())
        } else {
            Err(FetchError::Discarded)
        }
    }
}

/// Reads proposals from the donation contract with bounded concurrency.
#[derive(Clone, Debug)]
pub struct ChainReader {
    concurrency: usize,
    attempts: u32,
    max_proposals: u64,
}

impl Default for ChainReader {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}

impl ChainReader {
    pub fn new(concurrency: usize, attempts: u32) -> Self {
        ChainReader {
            concurrency: concurrency.max(1),
            attempts: attempts.max(1),
            max_proposals: DEFAULT_MAX_PROPOSALS,
        }
    }

    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(config.fetch_concurrency, config.fetch_attempts).with_max_proposals(config.max_proposals)
    }

    /// Largest proposal count accepted from the contract before any read.
    pub fn with_max_proposals(self, max_proposals: u64) -> Self {
        ChainReader { max_proposals, ..self }
    }

    /// Every listed proposal, ascending by ID.
    ///
    /// Unreadable IDs and empty slots are left out. Only a failed or
    /// implausible count read, or an unmounted view, fails the whole batch.
    pub async fn fetch_proposals<C>(&self, contract: &C, guard: &ViewGuard) -> Result<Vec<RawProposal>, FetchError>
    where
        C: DonationContract + ?Sized,
    {
        let count = contract
            .proposal_count()
            .await
            .map_err(|failure| FetchError::Count(failure.message))?;
        if count > self.max_proposals {
            return Err(FetchError::TooManyProposals {
                count,
                max: self.max_proposals,
            });
        }
        let results = self.fetch_each(contract, count).await;
        guard.check()?;

        let listed = keep_listed(results);
        log::debug!("loaded {} of {} proposals", listed.len(), count);
        Ok(listed)
    }

    /// One result per ID in `1..=count`, in ID order regardless of which
    /// read finishes first. `count` is not capped here.
    pub async fn fetch_each<C>(&self, contract: &C, count: u64) -> Vec<Result<RawProposal, FetchError>>
    where
        C: DonationContract + ?Sized,
    {
        stream::iter(1..=count)
            .map(|id| self.fetch_one(contract, id))
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await
    }

    async fn fetch_one<C>(&self, contract: &C, id: u64) -> Result<RawProposal, FetchError>
    where
        C: DonationContract + ?Sized,
    {
        let mut message = String::new();
        for attempt in 1..=self.attempts {
            match contract.proposal(id).await {
                Ok(proposal) if proposal.id == id => return Ok(proposal),
                Ok(proposal) => {
                    message = format!("contract returned proposal {} instead", proposal.id);
                }
                Err(failure) => {
                    message = failure.message;
                }
            }
            log::debug!("read of proposal {id} failed (attempt {attempt}/{}): {message}", self.attempts);
        }
        Err(FetchError::Proposal { id, message })
    }

    pub async fn fetch_donors<C>(&self, contract: &C, id: u64, guard: &ViewGuard) -> Result<Vec<RawDonation>, FetchError>
    where
        C: DonationContract + ?Sized,
    {
        let donors = contract
            .donors(id)
            .await
            .map_err(|failure| FetchError::Donors {
                id,
                message: failure.message,
            })?;
        guard.check()?;
        Ok(donors)
    }

    /// Tallies for the given proposals, paired with their IDs in input order.
    /// A tally that cannot be read is logged and left out.
    pub async fn fetch_tallies<C>(&self, contract: &C, ids: &[u64], guard: &ViewGuard) -> Result<Vec<(u64, VoteTally)>, FetchError>
    where
        C: DonationContract + ?Sized,
    {
        let results = stream::iter(ids.iter().copied())
            .map(|id| async move {
                contract
                    .votes(id)
                    .await
                    .map(|tally| (id, tally))
                    .map_err(|failure| FetchError::Votes {
                        id,
                        message: failure.message,
                    })
            })
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;
        guard.check()?;

        Ok(results
            .into_iter()
            .filter_map(|result| match result {
                Ok(tally) => Some(tally),
                Err(err) => {
                    log::warn!("{err}");
                    None
                }
            })
            .collect())
    }
}

fn keep_listed(results: Vec<Result<RawProposal, FetchError>>) -> Vec<RawProposal> {
    results
        .into_iter()
        .filter_map(|result| match result {
            Ok(proposal) if proposal.is_empty_slot() => {
                log::debug!("proposal {} is an empty slot, skipping", proposal.id);
                None
            }
            Ok(proposal) => Some(proposal),
            Err(err) => {
                log::warn!("{err}, skipping");
                None
            }
        })
        .collect()
}
