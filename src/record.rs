use multiversx_sc::types::Address;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;

/// A proposal exactly as the donation contract reports it.
///
/// Amounts stay in fixed-point; see [`crate::normalize`] for display units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawProposal {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub goal: BigUint,
    pub balance: BigUint,
    pub beneficiary: Address,
    pub executed: bool,
    /// Seconds since epoch
    pub creation_time: u64,
}

impl RawProposal {
    /// An unused or deleted storage slot: zero goal paid out to nobody.
    pub fn is_empty_slot(&self) -> bool {
        self.goal.is_zero() && self.beneficiary.is_zero()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawDonation {
    /// Seconds since epoch
    pub time: u64,
    pub wallet: Address,
    pub amount: BigUint,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub votes_for: u64,
    pub votes_against: u64,
}

impl VoteTally {
    pub fn total(&self) -> u64 {
        self.votes_for.saturating_add(self.votes_against)
    }

    /// Counts one more vote in the given direction.
    pub fn record(&mut self, support: bool) {
        if support {
            self.votes_for = self.votes_for.saturating_add(1);
        } else {
            self.votes_against = self.votes_against.saturating_add(1);
        }
    }
}

/// A new proposal as submitted to `createProposal`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalDraft {
    pub title: String,
    pub description: String,
    /// Fixed-point, zero for approval-only proposals
    pub goal: BigUint,
    pub beneficiary: Address,
}

impl ProposalDraft {
    /// Title, description and beneficiary are all filled in.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty() && !self.beneficiary.is_zero()
    }
}

/// An asset put up for community approval before it is tokenized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetDraft {
    pub name: String,
    pub asset_type: String,
    /// Metadata URI
    pub uri: String,
}

impl AssetDraft {
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.asset_type, &self.uri]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// The approval proposal for this asset: no funding goal, paid out to
    /// the proposer.
    pub fn approval_proposal(&self, proposer: &Address) -> ProposalDraft {
        ProposalDraft {
            title: format!("Tokenize Asset: {}", self.name.trim()),
            description: format!("Asset Type: {}, URI: {}", self.asset_type.trim(), self.uri.trim()),
            goal: BigUint::zero(),
            beneficiary: proposer.clone(),
        }
    }
}
