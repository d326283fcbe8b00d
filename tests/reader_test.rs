// Tests for reading proposals out of the donation contract.

mod common;

use common::*;
use donation_view::{ChainReader, FetchError, ViewGuard};
use futures::executor::block_on;
use num_bigint::BigUint;

#[test]
fn skips_empty_slots() {
    let contract = MockContract::with_proposals(vec![
        proposal(1, "Mosque in Pasteur", BigUint::from(1000u32), BigUint::from(500u32), false),
        empty_slot(2),
    ]);

    let listed = block_on(ChainReader::default().fetch_proposals(&contract, &ViewGuard::new())).unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, 1);
}

#[test]
fn zero_goal_with_real_beneficiary_is_kept() {
    let mut zero_goal = proposal(1, "Pending goal", BigUint::from(0u32), BigUint::from(0u32), false);
    zero_goal.beneficiary = wallet(9);
    let contract = MockContract::with_proposals(vec![zero_goal]);

    let listed = block_on(ChainReader::default().fetch_proposals(&contract, &ViewGuard::new())).unwrap();

    assert_eq!(listed.len(), 1);
}

#[test]
fn failed_read_is_skipped_not_fatal() {
    let mut contract = MockContract::with_proposals(
        (1..=4)
            .map(|id| proposal(id, &format!("Campaign {id}"), tokens(10), tokens(1), false))
            .collect(),
    );
    contract.failing_reads.insert(2);

    let listed = block_on(ChainReader::default().fetch_proposals(&contract, &ViewGuard::new())).unwrap();

    let ids: Vec<u64> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[test]
fn output_is_ascending_when_reads_finish_out_of_order() {
    let mut contract = MockContract::with_proposals(
        (1..=12)
            .map(|id| proposal(id, &format!("Campaign {id}"), tokens(10), tokens(1), false))
            .collect(),
    );
    contract.reverse_completion = true;

    let listed = block_on(ChainReader::new(12, 1).fetch_proposals(&contract, &ViewGuard::new())).unwrap();

    let ids: Vec<u64> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=12).collect::<Vec<u64>>());
}

#[test]
fn results_stay_within_count() {
    for count in 0..6u64 {
        let mut contract = MockContract::with_proposals(
            (1..=count)
                .map(|id| proposal(id, "Campaign", tokens(5), tokens(0), id % 2 == 0))
                .collect(),
        );
        contract.count = count;
        contract.failing_reads.insert(3);

        let listed = block_on(ChainReader::new(2, 1).fetch_proposals(&contract, &ViewGuard::new())).unwrap();

        assert!(listed.len() as u64 <= count);
        assert!(listed.iter().all(|p| (1..=count).contains(&p.id)));
        assert!(listed.windows(2).all(|w| w[0].id < w[1].id));
    }
}

#[test]
fn fetch_each_reports_every_id() {
    let mut contract = MockContract::with_proposals(vec![proposal(1, "A", tokens(1), tokens(0), false)]);
    contract.count = 3;
    contract.failing_reads.insert(3);

    let results = block_on(ChainReader::default().fetch_each(&contract, 3));

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].as_ref().unwrap().is_empty_slot());
    assert!(matches!(results[2], Err(FetchError::Proposal { id: 3, .. })));
}

#[test]
fn retries_up_to_configured_attempts() {
    let mut contract = MockContract::with_proposals(vec![proposal(1, "A", tokens(1), tokens(0), false)]);
    contract.failing_reads.insert(1);

    let results = block_on(ChainReader::new(1, 3).fetch_each(&contract, 1));

    assert!(results[0].is_err());
    assert_eq!(*contract.reads.lock().unwrap(), vec![1, 1, 1]);
}

#[test]
fn mismatched_id_is_rejected() {
    let contract = MockContract::with_proposals(vec![proposal(1, "A", tokens(1), tokens(0), false)]);
    contract
        .proposals
        .lock()
        .unwrap()
        .insert(2, proposal(7, "Wrong slot", tokens(1), tokens(0), false));
    let contract = MockContract { count: 2, ..contract };

    let listed = block_on(ChainReader::default().fetch_proposals(&contract, &ViewGuard::new())).unwrap();

    assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
}

#[test]
fn count_failure_fails_the_batch() {
    let mut contract = MockContract::default();
    contract.count_fails = true;

    let result = block_on(ChainReader::default().fetch_proposals(&contract, &ViewGuard::new()));

    assert!(matches!(result, Err(FetchError::Count(_))));
}

#[test]
fn implausible_count_fails_before_any_read() {
    let contract = MockContract {
        count: u64::MAX,
        ..Default::default()
    };

    let result = block_on(ChainReader::default().fetch_proposals(&contract, &ViewGuard::new()));

    assert!(matches!(result, Err(FetchError::TooManyProposals { count: u64::MAX, .. })));
    assert!(contract.reads.lock().unwrap().is_empty());
}

#[test]
fn count_at_configured_cap_is_read() {
    let contract = MockContract::with_proposals(
        (1..=3)
            .map(|id| proposal(id, &format!("Campaign {id}"), tokens(10), tokens(1), false))
            .collect(),
    );
    let reader = ChainReader::default().with_max_proposals(3);

    assert_eq!(block_on(reader.fetch_proposals(&contract, &ViewGuard::new())).unwrap().len(), 3);

    let capped = ChainReader::default().with_max_proposals(2);
    assert_eq!(
        block_on(capped.fetch_proposals(&contract, &ViewGuard::new())),
        Err(FetchError::TooManyProposals { count: 3, max: 2 })
    );
}

#[test]
fn unmounted_view_discards_results() {
    let contract = MockContract::with_proposals(vec![proposal(1, "A", tokens(1), tokens(0), false)]);
    let guard = ViewGuard::new();
    *contract.unmount_on_read.lock().unwrap() = Some(guard.clone());

    let result = block_on(ChainReader::default().fetch_proposals(&contract, &guard));

    assert_eq!(result, Err(FetchError::Discarded));
}

#[test]
fn tallies_follow_input_order() {
    let contract = MockContract::default();
    {
        let mut votes = contract.votes.lock().unwrap();
        votes.entry(4).or_default().record(true);
        votes.entry(2).or_default().record(false);
    }

    let tallies = block_on(ChainReader::default().fetch_tallies(&contract, &[4, 2], &ViewGuard::new())).unwrap();

    assert_eq!(tallies[0].0, 4);
    assert_eq!(tallies[0].1.votes_for, 1);
    assert_eq!(tallies[1].0, 2);
    assert_eq!(tallies[1].1.votes_against, 1);
}
