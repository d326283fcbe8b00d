multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use crate::record::{RawDonation, RawProposal, VoteTally};

// ============================================================
// Proposal: returned by getProposal(id)
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Proposal<M: ManagedTypeApi> {
    pub id: u64,
    pub title: ManagedBuffer<M>,
    pub description: ManagedBuffer<M>,
    /// Target amount, 18 decimals
    pub goal: BigUint<M>,
    /// Raised so far, drained once executed
    pub balance: BigUint<M>,
    pub beneficiary: ManagedAddress<M>,
    pub executed: bool,
    /// Block timestamp in seconds
    pub creation_time: u64,
}

// ============================================================
// Donation Record: one entry of getDonors(id)
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct DonationRecord<M: ManagedTypeApi> {
    pub time: u64,
    pub wallet_address: ManagedAddress<M>,
    pub amount: BigUint<M>,
}

// ============================================================
// Votes: returned by the voting contract's getVotes(id)
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub struct Votes {
    pub votes_for: u64,
    pub votes_against: u64,
}

impl<M: ManagedTypeApi> From<&Proposal<M>> for RawProposal {
    fn from(proposal: &Proposal<M>) -> Self {
        RawProposal {
            id: proposal.id,
            title: buffer_to_string(&proposal.title),
            description: buffer_to_string(&proposal.description),
            goal: big_uint_to_owned(&proposal.goal),
            balance: big_uint_to_owned(&proposal.balance),
            beneficiary: proposal.beneficiary.to_address(),
            executed: proposal.executed,
            creation_time: proposal.creation_time,
        }
    }
}

impl<M: ManagedTypeApi> From<&DonationRecord<M>> for RawDonation {
    fn from(record: &DonationRecord<M>) -> Self {
        RawDonation {
            time: record.time,
            wallet: record.wallet_address.to_address(),
            amount: big_uint_to_owned(&record.amount),
        }
    }
}

impl From<Votes> for VoteTally {
    fn from(votes: Votes) -> Self {
        VoteTally {
            votes_for: votes.votes_for,
            votes_against: votes.votes_against,
        }
    }
}

fn buffer_bytes<M: ManagedTypeApi>(buffer: &ManagedBuffer<M>) -> Vec<u8> {
    buffer.to_boxed_bytes().into_vec()
}

/// Invalid UTF-8 is replaced rather than rejected; titles are display-only.
fn buffer_to_string<M: ManagedTypeApi>(buffer: &ManagedBuffer<M>) -> String {
    String::from_utf8_lossy(&buffer_bytes(buffer)).into_owned()
}

fn big_uint_to_owned<M: ManagedTypeApi>(value: &BigUint<M>) -> num_bigint::BigUint {
    num_bigint::BigUint::from_bytes_be(&buffer_bytes(&value.to_bytes_be_buffer()))
}
