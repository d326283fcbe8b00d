// Shared test double for the external donation contract.
//
// Proposals live in memory. Reads can be made to fail per ID, and reads of
// higher IDs can be made to finish first so ordering is exercised.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};

use async_trait::async_trait;
use donation_view::{
    AssetDraft, DonationContract, ProposalDraft, RawDonation, RawProposal, TxFailure, TxReceipt, ViewGuard, VoteTally,
};
use multiversx_sc::types::Address;
use num_bigint::BigUint;

pub const NOW_SECS: u64 = 1_720_000_000;
pub const NOW_MS: u64 = NOW_SECS * 1_000;
pub const DAY_SECS: u64 = 24 * 60 * 60;

pub fn wallet(byte: u8) -> Address {
    Address::from([byte; 32])
}

pub fn tokens(whole: u64) -> BigUint {
    BigUint::from(whole) * BigUint::from(10u32).pow(18)
}

pub fn proposal(id: u64, title: &str, goal: BigUint, balance: BigUint, executed: bool) -> RawProposal {
    RawProposal {
        id,
        title: title.to_string(),
        description: format!("{title} description"),
        goal,
        balance,
        beneficiary: wallet(id as u8),
        executed,
        creation_time: NOW_SECS - DAY_SECS,
    }
}

pub fn empty_slot(id: u64) -> RawProposal {
    RawProposal {
        id,
        title: String::new(),
        description: String::new(),
        goal: BigUint::from(0u32),
        balance: BigUint::from(0u32),
        beneficiary: Address::zero(),
        executed: false,
        creation_time: 0,
    }
}

/// Ready after being polled `remaining + 1` times.
struct Yield {
    remaining: u64,
}

impl Future for Yield {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.remaining == 0 {
            Poll::Ready(())
        } else {
            self.remaining -= 1;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[derive(Default)]
pub struct MockContract {
    pub count: u64,
    pub proposals: Mutex<BTreeMap<u64, RawProposal>>,
    pub failing_reads: HashSet<u64>,
    pub count_fails: bool,
    /// Later IDs resolve first when set
    pub reverse_completion: bool,
    pub donors: HashMap<u64, Vec<RawDonation>>,
    pub votes: Mutex<HashMap<u64, VoteTally>>,
    pub write_failure: Mutex<Option<TxFailure>>,
    pub revert_writes: bool,
    pub calls: Mutex<Vec<String>>,
    pub reads: Mutex<Vec<u64>>,
    /// Unmounted as soon as any proposal is read
    pub unmount_on_read: Mutex<Option<ViewGuard>>,
    /// Proposals added through `create_proposal`, counted past `count`
    pub created: Mutex<u64>,
    pub approved: HashSet<u64>,
    /// Reward token balances keyed by address bytes
    pub balances: Mutex<HashMap<Vec<u8>, BigUint>>,
}

impl MockContract {
    pub fn with_proposals(proposals: Vec<RawProposal>) -> Self {
        let count = proposals.iter().map(|p| p.id).max().unwrap_or(0);
        MockContract {
            count,
            proposals: Mutex::new(proposals.into_iter().map(|p| (p.id, p)).collect()),
            ..Default::default()
        }
    }

    pub fn fail_writes_with(&self, failure: TxFailure) {
        *self.write_failure.lock().unwrap() = Some(failure);
    }

    pub fn set_balance(&self, owner: &Address, amount: BigUint) {
        self.balances.lock().unwrap().insert(owner.as_bytes().to_vec(), amount);
    }

    pub fn balance_of(&self, owner: &Address) -> BigUint {
        self.balances
            .lock()
            .unwrap()
            .get(owner.as_bytes())
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn write(&self, call: String) -> Result<TxReceipt, TxFailure> {
        self.calls.lock().unwrap().push(call);
        if let Some(failure) = self.write_failure.lock().unwrap().clone() {
            return Err(failure);
        }
        let tx_hash = format!("0x{:04x}", self.calls.lock().unwrap().len());
        Ok(TxReceipt {
            tx_hash,
            success: !self.revert_writes,
        })
    }
}

#[async_trait]
impl DonationContract for MockContract {
    async fn proposal_count(&self) -> Result<u64, TxFailure> {
        if self.count_fails {
            return Err(TxFailure::with_code("NETWORK_ERROR", "gateway unreachable"));
        }
        Ok(self.count + *self.created.lock().unwrap())
    }

    async fn proposal(&self, id: u64) -> Result<RawProposal, TxFailure> {
        self.reads.lock().unwrap().push(id);
        let guard = self.unmount_on_read.lock().unwrap().clone();
        if let Some(guard) = guard {
            guard.unmount();
        }
        if self.reverse_completion {
            Yield {
                remaining: self.count.saturating_sub(id),
            }
            .await;
        }
        if self.failing_reads.contains(&id) {
            return Err(TxFailure::new(format!("execution reverted for {id}")));
        }
        let stored = self.proposals.lock().unwrap().get(&id).cloned();
        Ok(stored.unwrap_or_else(|| empty_slot(id)))
    }

    async fn donors(&self, id: u64) -> Result<Vec<RawDonation>, TxFailure> {
        Ok(self.donors.get(&id).cloned().unwrap_or_default())
    }

    async fn votes(&self, id: u64) -> Result<VoteTally, TxFailure> {
        Ok(self.votes.lock().unwrap().get(&id).copied().unwrap_or_default())
    }

    async fn is_proposal_approved(&self, id: u64) -> Result<bool, TxFailure> {
        Ok(self.approved.contains(&id))
    }

    async fn token_balance(&self, owner: &Address) -> Result<BigUint, TxFailure> {
        Ok(self.balance_of(owner))
    }

    async fn create_proposal(&self, _from: &Address, draft: &ProposalDraft) -> Result<TxReceipt, TxFailure> {
        let receipt = self.write(format!("createProposal({}, {})", draft.title, draft.goal))?;
        if receipt.success {
            let mut created = self.created.lock().unwrap();
            *created += 1;
            let id = self.count + *created;
            self.proposals.lock().unwrap().insert(
                id,
                RawProposal {
                    id,
                    title: draft.title.clone(),
                    description: draft.description.clone(),
                    goal: draft.goal.clone(),
                    balance: BigUint::from(0u32),
                    beneficiary: draft.beneficiary.clone(),
                    executed: false,
                    creation_time: NOW_SECS,
                },
            );
        }
        Ok(receipt)
    }

    async fn donate(&self, _from: &Address, id: u64, amount: &BigUint) -> Result<TxReceipt, TxFailure> {
        let receipt = self.write(format!("donate({id}, {amount})"))?;
        if receipt.success {
            if let Some(p) = self.proposals.lock().unwrap().get_mut(&id) {
                p.balance += amount;
            }
        }
        Ok(receipt)
    }

    async fn vote(&self, _from: &Address, id: u64, support: bool) -> Result<TxReceipt, TxFailure> {
        let receipt = self.write(format!("vote({id}, {support})"))?;
        if receipt.success {
            self.votes.lock().unwrap().entry(id).or_default().record(support);
        }
        Ok(receipt)
    }

    async fn execute_proposal(&self, _from: &Address, id: u64) -> Result<TxReceipt, TxFailure> {
        let receipt = self.write(format!("executeProposal({id})"))?;
        if receipt.success {
            if let Some(p) = self.proposals.lock().unwrap().get_mut(&id) {
                p.executed = true;
            }
        }
        Ok(receipt)
    }

    async fn withdraw(&self, _from: &Address, id: u64) -> Result<TxReceipt, TxFailure> {
        let receipt = self.write(format!("withdraw({id})"))?;
        if receipt.success {
            if let Some(p) = self.proposals.lock().unwrap().get_mut(&id) {
                p.balance = BigUint::from(0u32);
                p.executed = true;
            }
        }
        Ok(receipt)
    }

    async fn mint_tokens(&self, _from: &Address, _to: &Address, amount: &BigUint) -> Result<TxReceipt, TxFailure> {
        self.write(format!("mintTokens({amount})"))
    }

    async fn transfer_tokens(&self, from: &Address, to: &Address, amount: &BigUint) -> Result<TxReceipt, TxFailure> {
        let held = self.balance_of(from);
        if &held < amount {
            return Err(TxFailure::with_code("INSUFFICIENT_FUNDS", "transfer amount exceeds balance"));
        }
        let receipt = self.write(format!("transfer({amount})"))?;
        if receipt.success {
            let received = self.balance_of(to) + amount;
            self.set_balance(from, held - amount);
            self.set_balance(to, received);
        }
        Ok(receipt)
    }

    async fn tokenize_asset(&self, _from: &Address, asset: &AssetDraft) -> Result<TxReceipt, TxFailure> {
        self.write(format!("tokenizeAsset({}, {}, {})", asset.name, asset.asset_type, asset.uri))
    }
}
