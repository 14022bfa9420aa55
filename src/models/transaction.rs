//! Candidate transactions assembled for safe-mode evaluation

use solana_instruction::Instruction;
use solana_pubkey::Pubkey;

/// An unsent transaction candidate: an ordered instruction sequence plus the
/// set of signers it would require on submission.
///
/// Built once per simulated attack and treated as immutable afterwards; the
/// builder helpers exist only for assembly.
#[derive(Debug, Clone, Default)]
pub struct CandidateTransaction {
    /// Instructions in execution order
    pub instructions: Vec<Instruction>,
    /// Accounts that would have to sign the real transaction
    pub signers: Vec<Pubkey>,
}

impl CandidateTransaction {
    /// Create an empty candidate
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction, recording any signer accounts it references
    pub fn with_instruction(mut self, instruction: Instruction) -> Self {
        for meta in &instruction.accounts {
            if meta.is_signer && !self.signers.contains(&meta.pubkey) {
                self.signers.push(meta.pubkey);
            }
        }
        self.instructions.push(instruction);
        self
    }

    /// Number of instructions in the candidate
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }
}
