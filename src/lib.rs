//! View-model for a donation board backed by an external donation contract.
//!
//! The contract owns every proposal. This crate reads it through
//! [`contract::DonationContract`], derives display records, and gates the
//! contract's write endpoints on an explicit [`session::WalletSession`].

pub mod amount;
pub mod board;
pub mod config;
pub mod contract;
pub mod countdown;
pub mod filter;
pub mod normalize;
pub mod reader;
pub mod record;
pub mod rewards;
pub mod session;
pub mod types;

// ============================================================
// Constants
// ============================================================

/// Fixed-point decimals of the on-chain token amounts
pub const TOKEN_DECIMALS: u32 = 18;

/// Fundraising window: 30 days
pub const FUNDRAISING_WINDOW_DAYS: u64 = 30;

pub const MS_PER_MINUTE: u64 = 60 * 1_000;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Fundraising window in milliseconds
pub const FUNDRAISING_WINDOW_MS: u64 = FUNDRAISING_WINDOW_DAYS * MS_PER_DAY;

pub use board::{BoardError, DonationOutcome, ProposalBoard};
pub use config::ViewConfig;
pub use contract::{DonationContract, TxFailure, TxReceipt};
pub use countdown::{Countdown, ProposalPhase};
pub use filter::StatusFilter;
pub use normalize::{DonorView, ProposalView};
pub use reader::{ChainReader, FetchError, ViewGuard};
pub use record::{AssetDraft, ProposalDraft, RawDonation, RawProposal, VoteTally};
pub use rewards::{RewardSchedule, RewardTier};
pub use session::{ActionError, WalletSession};
