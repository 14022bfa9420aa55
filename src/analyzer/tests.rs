use super::*;
use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

fn instruction(accounts: Vec<AccountMeta>, data_len: usize) -> Instruction {
    Instruction {
        program_id: Pubkey::new_unique(),
        accounts,
        data: vec![0xAB; data_len],
    }
}

#[test]
fn empty_transaction_is_low_risk_and_free() {
    let assessment = assess(&CandidateTransaction::new());
    assert!(assessment.indicators.is_empty());
    assert_eq!(assessment.level, RiskLevel::Low);
    assert_eq!(assessment.estimated_cost, 0);
}

#[test]
fn writable_signer_flags_admin_operation() {
    let tx = CandidateTransaction::new().with_instruction(instruction(
        vec![AccountMeta::new(Pubkey::new_unique(), true)],
        8,
    ));
    let assessment = assess(&tx);
    assert!(assessment.indicators.contains(&RiskIndicator::AdminOperation));
    assert_eq!(assessment.level, RiskLevel::Medium);
}

#[test]
fn readonly_signer_does_not_flag_admin_operation() {
    let tx = CandidateTransaction::new().with_instruction(instruction(
        vec![AccountMeta::new_readonly(Pubkey::new_unique(), true)],
        8,
    ));
    assert!(assess(&tx).indicators.is_empty());
}

#[test]
fn payload_over_32_bytes_flags_large_transfer() {
    let tx = CandidateTransaction::new().with_instruction(instruction(vec![], 33));
    let assessment = assess(&tx);
    assert_eq!(
        assessment.indicators.iter().collect::<Vec<_>>(),
        vec![&RiskIndicator::LargeTransfer]
    );

    let boundary = CandidateTransaction::new().with_instruction(instruction(vec![], 32));
    assert!(assess(&boundary).indicators.is_empty());
}

#[test]
fn more_than_three_accounts_flags_cross_program_invocation() {
    let accounts: Vec<_> = (0..4)
        .map(|_| AccountMeta::new_readonly(Pubkey::new_unique(), false))
        .collect();
    let tx = CandidateTransaction::new().with_instruction(instruction(accounts, 0));
    assert!(assess(&tx)
        .indicators
        .contains(&RiskIndicator::CrossProgramInvocation));

    let accounts: Vec<_> = (0..3)
        .map(|_| AccountMeta::new_readonly(Pubkey::new_unique(), false))
        .collect();
    let tx = CandidateTransaction::new().with_instruction(instruction(accounts, 0));
    assert!(assess(&tx).indicators.is_empty());
}

#[test]
fn indicator_kinds_deduplicate_across_instructions() {
    // Three instructions all tripping large-transfer still count as one kind.
    let mut tx = CandidateTransaction::new();
    for _ in 0..3 {
        tx = tx.with_instruction(instruction(vec![], 40));
    }
    let assessment = assess(&tx);
    assert_eq!(assessment.indicators.len(), 1);
    assert_eq!(assessment.level, RiskLevel::Medium);
    assert_eq!(assessment.estimated_cost, 3 * 5_000 + 2_000);
}

#[test]
fn level_is_monotonic_in_distinct_indicator_kinds() {
    let admin = instruction(vec![AccountMeta::new(Pubkey::new_unique(), true)], 0);
    let large = instruction(vec![], 40);
    let cpi = instruction(
        (0..5)
            .map(|_| AccountMeta::new_readonly(Pubkey::new_unique(), false))
            .collect(),
        0,
    );

    let one = CandidateTransaction::new().with_instruction(admin.clone());
    let two = CandidateTransaction::new()
        .with_instruction(admin.clone())
        .with_instruction(large.clone());
    let three = CandidateTransaction::new()
        .with_instruction(admin)
        .with_instruction(large)
        .with_instruction(cpi);

    assert_eq!(assess(&one).level, RiskLevel::Medium);
    assert_eq!(assess(&two).level, RiskLevel::High);
    assert_eq!(assess(&three).level, RiskLevel::Critical);
}

#[test]
fn admin_plus_large_transfer_two_accounts_assesses_high_at_14000() {
    // One instruction, writable+signer authority, 40-byte payload, two
    // accounts total: admin-operation and large-transfer, no CPI flag.
    let tx = CandidateTransaction::new().with_instruction(instruction(
        vec![
            AccountMeta::new(Pubkey::new_unique(), true),
            AccountMeta::new_readonly(Pubkey::new_unique(), false),
        ],
        40,
    ));

    let assessment = assess(&tx);
    let expected: std::collections::BTreeSet<_> =
        [RiskIndicator::AdminOperation, RiskIndicator::LargeTransfer]
            .into_iter()
            .collect();
    assert_eq!(assessment.indicators, expected);
    assert_eq!(assessment.level, RiskLevel::High);
    assert_eq!(assessment.estimated_cost, 14_000);
}

#[test]
fn ordering_of_instructions_does_not_change_level() {
    let admin = instruction(vec![AccountMeta::new(Pubkey::new_unique(), true)], 0);
    let large = instruction(vec![], 40);

    let forward = CandidateTransaction::new()
        .with_instruction(admin.clone())
        .with_instruction(large.clone());
    let backward = CandidateTransaction::new()
        .with_instruction(large)
        .with_instruction(admin);

    assert_eq!(assess(&forward).level, assess(&backward).level);
    assert_eq!(assess(&forward).indicators, assess(&backward).indicators);
}
