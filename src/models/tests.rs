use super::*;
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

#[test]
fn risk_level_table_is_exact() {
    assert_eq!(RiskLevel::from_indicator_count(0), RiskLevel::Low);
    assert_eq!(RiskLevel::from_indicator_count(1), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_indicator_count(2), RiskLevel::High);
    assert_eq!(RiskLevel::from_indicator_count(3), RiskLevel::Critical);
    assert_eq!(RiskLevel::from_indicator_count(7), RiskLevel::Critical);
}

#[test]
fn risk_levels_are_ordered() {
    assert!(RiskLevel::Low < RiskLevel::Medium);
    assert!(RiskLevel::Medium < RiskLevel::High);
    assert!(RiskLevel::High < RiskLevel::Critical);
}

#[test]
fn candidate_collects_signers_from_account_metas() {
    let program_id = Pubkey::new_unique();
    let authority = Pubkey::new_unique();
    let tx = CandidateTransaction::new().with_instruction(Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(authority, true),
            AccountMeta::new_readonly(Pubkey::new_unique(), false),
        ],
        data: vec![0; 8],
    });

    assert_eq!(tx.instruction_count(), 1);
    assert_eq!(tx.signers, vec![authority]);
}

#[test]
fn candidate_deduplicates_signers() {
    let program_id = Pubkey::new_unique();
    let authority = Pubkey::new_unique();
    let ix = Instruction {
        program_id,
        accounts: vec![AccountMeta::new(authority, true)],
        data: vec![],
    };
    let tx = CandidateTransaction::new()
        .with_instruction(ix.clone())
        .with_instruction(ix);

    assert_eq!(tx.instruction_count(), 2);
    assert_eq!(tx.signers.len(), 1);
}

#[test]
fn alert_serializes_with_kebab_case_category() {
    let alert = Alert::new(
        AlertCategory::HighValue,
        Severity::Medium,
        &Pubkey::new_unique(),
        "transfer of 2000000000 base units".to_string(),
    );
    let json = serde_json::to_value(&alert).unwrap();
    assert_eq!(json["category"], "high-value");
    assert_eq!(json["severity"], "medium");
}

#[test]
fn indicator_display_matches_wire_names() {
    assert_eq!(RiskIndicator::AdminOperation.to_string(), "admin-operation");
    assert_eq!(
        RiskIndicator::CrossProgramInvocation.to_string(),
        "cross-program-invocation"
    );
}
