//! Frenzy Registry Processor
//!
//! Decodes call data and executes one operation against the registry.
//! Handlers validate fully before writing, so a rejection never leaves
//! partial state behind.

use borsh::BorshDeserialize;
use solana_program::{clock::Clock, pubkey::Pubkey};

use crate::{
    constants::FRENZY_ANNOUNCEMENT,
    error::FrenzyError,
    event::FrenzyEvent,
    instruction::FrenzyInstruction,
    registry::FrenzyRegistry,
    state::{Frenzy, FrenzyStatus},
};

/// Process one operation
///
/// `caller` is the acting identity and `clock` the current time, both
/// supplied by the runtime. `value` is native currency attached to the call;
/// the registry holds no balance and accepts none.
pub fn process(
    registry: &mut FrenzyRegistry,
    caller: &Pubkey,
    clock: &Clock,
    call_data: &[u8],
    value: u64,
) -> Result<Vec<FrenzyEvent>, FrenzyError> {
    if value > 0 {
        return Err(FrenzyError::PaymentNotAccepted);
    }

    let instruction = FrenzyInstruction::try_from_slice(call_data)
        .map_err(|_| FrenzyError::UnknownOperation)?;

    match instruction {
        FrenzyInstruction::CreateFrenzy { name, options } => {
            process_create_frenzy(registry, caller, name, options)
        }

        FrenzyInstruction::StartFrenzy { id, duration_secs } => {
            process_start_frenzy(registry, caller, clock, id, duration_secs)
        }

        FrenzyInstruction::Vote { id, option_index } => {
            process_vote(registry, caller, id, option_index)
        }

        FrenzyInstruction::CheckFrenzy { id } => process_check_frenzy(registry, clock, id),
    }
}

/// Create a new frenzy
fn process_create_frenzy(
    registry: &mut FrenzyRegistry,
    caller: &Pubkey,
    name: String,
    options: Vec<String>,
) -> Result<Vec<FrenzyEvent>, FrenzyError> {
    if registry.name_exists(&name) {
        return Err(FrenzyError::DuplicateName);
    }
    if options.is_empty() {
        return Err(FrenzyError::InvalidOption);
    }

    let id = registry.next_id();
    registry.insert(Frenzy::new(id, name, options, *caller));

    Ok(Vec::new())
}

/// Open a frenzy's voting window
fn process_start_frenzy(
    registry: &mut FrenzyRegistry,
    caller: &Pubkey,
    clock: &Clock,
    id: u64,
    duration_secs: i64,
) -> Result<Vec<FrenzyEvent>, FrenzyError> {
    // Creator check comes first; a missing record has no creator to match.
    let frenzy = match registry.get_mut(id) {
        Some(f) => f,
        None => return Err(FrenzyError::NotCreator),
    };
    if frenzy.creator != *caller {
        return Err(FrenzyError::NotCreator);
    }
    if frenzy.status != FrenzyStatus::Inactive {
        return Err(FrenzyError::InvalidStatus);
    }

    frenzy.status = FrenzyStatus::Active;
    frenzy.end_time = clock.unix_timestamp.saturating_add(duration_secs);

    Ok(vec![FrenzyEvent::FrenzyStarted {
        name: frenzy.name.clone(),
        announcement: FRENZY_ANNOUNCEMENT.to_string(),
    }])
}

/// Cast one vote
fn process_vote(
    registry: &mut FrenzyRegistry,
    caller: &Pubkey,
    id: u64,
    option_index: u32,
) -> Result<Vec<FrenzyEvent>, FrenzyError> {
    // Status gate precedes the option and duplicate-vote checks.
    let frenzy = match registry.get_mut(id) {
        Some(f) if f.is_active() => f,
        _ => return Err(FrenzyError::NotActive),
    };
    if option_index as usize >= frenzy.options.len() {
        return Err(FrenzyError::InvalidOption);
    }
    if frenzy.has_voted(caller) {
        return Err(FrenzyError::AlreadyVoted);
    }

    frenzy.record_vote(*caller, option_index);

    Ok(Vec::new())
}

/// Resolve a frenzy whose voting window has elapsed
///
/// Nothing forces resolution; an expired frenzy stays active and keeps
/// accepting votes until some caller resolves it.
fn process_check_frenzy(
    registry: &mut FrenzyRegistry,
    clock: &Clock,
    id: u64,
) -> Result<Vec<FrenzyEvent>, FrenzyError> {
    let frenzy = match registry.get_mut(id) {
        Some(f) if f.is_active() => f,
        _ => return Err(FrenzyError::NotActive),
    };
    if !frenzy.has_ended(clock) {
        return Err(FrenzyError::TooEarly);
    }

    frenzy.status = FrenzyStatus::Completed;
    let winner = frenzy.winning_option();

    Ok(vec![FrenzyEvent::FrenzyCompleted {
        name: frenzy.name.clone(),
        options: frenzy.options.clone(),
        winning_option: frenzy.options[winner].clone(),
    }])
}
