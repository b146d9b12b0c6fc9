//! Frenzy Lifecycle Integration Tests
//!
//! Drives the complete flow through signed envelopes and the transaction
//! processor: creation, activation, voting, clock advancement, resolution,
//! and the envelope-level rejections.

use frenzy_program::{
    constants::FRENZY_ANNOUNCEMENT, FrenzyError, FrenzyEvent, FrenzyInstruction, FrenzyStatus,
};
use solana_sdk::{signature::Keypair, signer::Signer};
use tokio::sync::broadcast::error::RecvError;

use crate::{
    block_producer::{BlockProducer, BlockProducerConfig},
    processor::{FrenzyProcessor, TransactionError, TransactionResult},
    registry_store::RegistryStore,
    transaction::FrenzyTransaction,
};

const GENESIS_TS: i64 = 1_700_000_000;

fn movie_options() -> Vec<String> {
    vec![
        "Lord of the Rings".to_string(),
        "Indiana Jones".to_string(),
        "Star Wars".to_string(),
    ]
}

fn new_processor() -> FrenzyProcessor {
    FrenzyProcessor::new(RegistryStore::new(), GENESIS_TS)
}

fn submit(
    processor: &FrenzyProcessor,
    keypair: &Keypair,
    instruction: &FrenzyInstruction,
) -> TransactionResult {
    processor.process_transaction(&FrenzyTransaction::signed(keypair, instruction))
}

fn create_best_movie(processor: &FrenzyProcessor, owner: &Keypair) {
    let result = submit(
        processor,
        owner,
        &FrenzyInstruction::CreateFrenzy {
            name: "Best Movie".to_string(),
            options: movie_options(),
        },
    );
    assert!(result.success, "create failed: {:?}", result.error);
}

fn start_best_movie(processor: &FrenzyProcessor, owner: &Keypair, duration_secs: i64) {
    let result = submit(
        processor,
        owner,
        &FrenzyInstruction::StartFrenzy {
            id: 1,
            duration_secs,
        },
    );
    assert!(result.success, "start failed: {:?}", result.error);
}

#[test]
fn test_create_frenzy_with_initial_values() {
    let processor = new_processor();
    let owner = Keypair::new();

    create_best_movie(&processor, &owner);

    let store = processor.store();
    assert_eq!(store.frenzy_count(), 1);

    let frenzy = store.get_frenzy(1).unwrap();
    assert_eq!(frenzy.name, "Best Movie");
    assert_eq!(frenzy.status, FrenzyStatus::Inactive);
    assert_eq!(store.frenzy_options(1).unwrap(), movie_options());
    // Nothing is active until the creator starts it.
    assert!(store.active_frenzies().is_empty());
}

#[test]
fn test_started_frenzy_is_listed_active() {
    let processor = new_processor();
    let owner = Keypair::new();

    create_best_movie(&processor, &owner);
    let result = submit(
        &processor,
        &owner,
        &FrenzyInstruction::StartFrenzy {
            id: 1,
            duration_secs: 30,
        },
    );

    assert!(result.success);
    assert_eq!(
        result.events,
        vec![FrenzyEvent::FrenzyStarted {
            name: "Best Movie".to_string(),
            announcement: FRENZY_ANNOUNCEMENT.to_string(),
        }]
    );

    let active = processor.store().active_frenzies();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, 1);
    assert_eq!(active[0].end_time, GENESIS_TS + 30);
}

#[test]
fn test_best_movie_resolves_to_indiana_jones() {
    let processor = new_processor();
    let owner = Keypair::new();
    let voter1 = Keypair::new();
    let voter2 = Keypair::new();

    create_best_movie(&processor, &owner);
    start_best_movie(&processor, &owner, 30);

    for (voter, option_index) in [(&voter1, 0), (&voter2, 1), (&owner, 1)] {
        let result = submit(
            &processor,
            voter,
            &FrenzyInstruction::Vote {
                id: 1,
                option_index,
            },
        );
        assert!(result.success, "vote failed: {:?}", result.error);
    }

    // Resolution is time-gated until the harness advances the clock.
    let early = submit(&processor, &owner, &FrenzyInstruction::CheckFrenzy { id: 1 });
    assert_eq!(
        early.error,
        Some(TransactionError::Rejected(FrenzyError::TooEarly))
    );

    processor.advance_time(31);

    let resolved = submit(&processor, &owner, &FrenzyInstruction::CheckFrenzy { id: 1 });
    assert!(resolved.success);
    assert_eq!(
        resolved.events,
        vec![FrenzyEvent::FrenzyCompleted {
            name: "Best Movie".to_string(),
            options: movie_options(),
            winning_option: "Indiana Jones".to_string(),
        }]
    );

    let frenzy = processor.store().get_frenzy(1).unwrap();
    assert_eq!(frenzy.status, FrenzyStatus::Completed);
    assert_eq!(frenzy.vote_counts, vec![1, 2, 0]);
    assert!(processor.store().active_frenzies().is_empty());
}

#[test]
fn test_rejected_transaction_leaves_registry_untouched() {
    let processor = new_processor();
    let owner = Keypair::new();
    let voter = Keypair::new();

    create_best_movie(&processor, &owner);
    let snapshot = processor.store().snapshot();

    // Duplicate name, vote on an inactive frenzy, start by a stranger:
    // each rejection leaves the registry exactly as it was.
    let duplicate = submit(
        &processor,
        &voter,
        &FrenzyInstruction::CreateFrenzy {
            name: "Best Movie".to_string(),
            options: movie_options(),
        },
    );
    assert_eq!(
        duplicate.error,
        Some(TransactionError::Rejected(FrenzyError::DuplicateName))
    );

    let early_vote = submit(
        &processor,
        &voter,
        &FrenzyInstruction::Vote {
            id: 1,
            option_index: 0,
        },
    );
    assert_eq!(
        early_vote.error,
        Some(TransactionError::Rejected(FrenzyError::NotActive))
    );

    let foreign_start = submit(
        &processor,
        &voter,
        &FrenzyInstruction::StartFrenzy {
            id: 1,
            duration_secs: 30,
        },
    );
    assert_eq!(
        foreign_start.error,
        Some(TransactionError::Rejected(FrenzyError::NotCreator))
    );

    assert_eq!(processor.store().snapshot(), snapshot);
}

#[test]
fn test_double_vote_rejected() {
    let processor = new_processor();
    let owner = Keypair::new();
    let voter = Keypair::new();

    create_best_movie(&processor, &owner);
    start_best_movie(&processor, &owner, 30);

    let vote = FrenzyInstruction::Vote {
        id: 1,
        option_index: 2,
    };
    assert!(submit(&processor, &voter, &vote).success);

    let again = submit(&processor, &voter, &vote);
    assert_eq!(
        again.error,
        Some(TransactionError::Rejected(FrenzyError::AlreadyVoted))
    );
    assert_eq!(
        processor.store().get_frenzy(1).unwrap().vote_counts,
        vec![0, 0, 1]
    );
}

#[test]
fn test_value_transfer_rejected() {
    let processor = new_processor();
    let sender = Keypair::new();

    // A bare transfer: value attached, no recognizable call data.
    let transfer = FrenzyTransaction::signed_raw(&sender, 1_000, Vec::new());
    let result = processor.process_transaction(&transfer);

    assert!(!result.success);
    assert_eq!(
        result.error,
        Some(TransactionError::Rejected(FrenzyError::PaymentNotAccepted))
    );
}

#[test]
fn test_unrecognized_call_data_rejected() {
    let processor = new_processor();
    let sender = Keypair::new();

    let garbage = FrenzyTransaction::signed_raw(&sender, 0, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    let result = processor.process_transaction(&garbage);

    assert!(!result.success);
    assert_eq!(
        result.error,
        Some(TransactionError::Rejected(FrenzyError::UnknownOperation))
    );
}

#[test]
fn test_forged_sender_rejected_before_dispatch() {
    let processor = new_processor();
    let owner = Keypair::new();
    let forger = Keypair::new();

    let mut tx = FrenzyTransaction::signed(
        &forger,
        &FrenzyInstruction::CreateFrenzy {
            name: "Forged".to_string(),
            options: movie_options(),
        },
    );
    tx.sender = owner.pubkey();

    let result = processor.process_transaction(&tx);
    assert_eq!(result.error, Some(TransactionError::SignatureFailure));
    assert_eq!(processor.store().frenzy_count(), 0);
}

#[tokio::test]
async fn test_block_producer_applies_submitted_transactions() {
    let store = RegistryStore::new();
    let processor = FrenzyProcessor::new(store.clone(), GENESIS_TS);
    let producer = BlockProducer::new(
        processor,
        BlockProducerConfig {
            block_time_ms: 5,
            ..Default::default()
        },
    );
    let sender = producer.transaction_sender();
    let mut updates = producer.subscribe();

    tokio::spawn(producer.run_async());

    let owner = Keypair::new();
    sender
        .send(FrenzyTransaction::signed(
            &owner,
            &FrenzyInstruction::CreateFrenzy {
                name: "Async Frenzy".to_string(),
                options: movie_options(),
            },
        ))
        .unwrap();

    loop {
        match updates.recv().await {
            Ok(update) if update.transaction_count > 0 => {
                assert_eq!(update.transaction_count, 1);
                assert!(update.transaction_results[0].success);
                break;
            }
            Ok(_) => continue,
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => panic!("block producer stopped unexpectedly"),
        }
    }

    assert_eq!(store.frenzy_count(), 1);
    assert_eq!(store.get_frenzy(1).unwrap().name, "Async Frenzy");
}
