use multiversx_sc::types::Address;
use multiversx_sc_scenario::bech32;
use serde::Serialize;

use crate::amount::{format_basis_points, format_units, progress_basis_points};
use crate::config::ViewConfig;
use crate::countdown::{deadline_ms, Countdown, ProposalPhase};
use crate::record::{RawDonation, RawProposal, VoteTally};

/// Display-ready proposal derived from a [`RawProposal`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProposalView {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Decimal token amounts, e.g. `"1500.0"`
    pub goal: String,
    pub raised: String,
    pub progress_bps: u64,
    pub progress_percent: f64,
    /// Two decimals, e.g. `"50.00"`
    pub progress_label: String,
    pub beneficiary: String,
    pub executed: bool,
    pub creation_time_ms: u64,
    pub deadline_ms: u64,
    pub countdown: Countdown,
    pub phase: ProposalPhase,
    /// Filled in on the voting page only
    pub votes: Option<VoteTally>,
}

impl ProposalView {
    /// Recomputes the time-dependent fields against a new clock reading.
    pub fn tick(&mut self, now_ms: u64) {
        self.countdown = Countdown::until(self.deadline_ms, now_ms);
        self.phase = ProposalPhase::derive(self.executed, self.deadline_ms, now_ms);
    }

    pub fn is_finished(&self) -> bool {
        self.phase != ProposalPhase::Active
    }

    /// Marks the proposal executed ahead of the next contract read.
    pub fn mark_executed(&mut self) {
        self.executed = true;
        self.phase = ProposalPhase::Executed;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DonorView {
    pub time_ms: u64,
    pub wallet: String,
    pub amount: String,
}

/// Converts contract records into display units.
#[derive(Clone, Debug)]
pub struct Normalizer {
    decimals: u32,
    window_ms: u64,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}

impl Normalizer {
    pub fn new(decimals: u32, window_ms: u64) -> Self {
        Normalizer { decimals, window_ms }
    }

    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(config.token_decimals, config.window_ms())
    }

    pub fn proposal(&self, raw: &RawProposal, now_ms: u64) -> ProposalView {
        let progress_bps = progress_basis_points(&raw.balance, &raw.goal);
        let creation_time_ms = raw.creation_time.saturating_mul(1_000);
        let deadline_ms = deadline_ms(creation_time_ms, self.window_ms);

        ProposalView {
            id: raw.id,
            title: raw.title.clone(),
            description: raw.description.clone(),
            goal: format_units(&raw.goal, self.decimals),
            raised: format_units(&raw.balance, self.decimals),
            progress_bps,
            progress_percent: progress_bps as f64 / 100.0,
            progress_label: format_basis_points(progress_bps),
            beneficiary: render_address(&raw.beneficiary),
            executed: raw.executed,
            creation_time_ms,
            deadline_ms,
            countdown: Countdown::until(deadline_ms, now_ms),
            phase: ProposalPhase::derive(raw.executed, deadline_ms, now_ms),
            votes: None,
        }
    }

    pub fn proposals(&self, raw: &[RawProposal], now_ms: u64) -> Vec<ProposalView> {
        raw.iter().map(|proposal| self.proposal(proposal, now_ms)).collect()
    }

    pub fn donor(&self, raw: &RawDonation) -> DonorView {
        DonorView {
            time_ms: raw.time.saturating_mul(1_000),
            wallet: render_address(&raw.wallet),
            amount: format_units(&raw.amount, self.decimals),
        }
    }
}

pub fn render_address(address: &Address) -> String {
    bech32::encode(address)
}
