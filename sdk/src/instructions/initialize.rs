//! Initialize instruction builder.
//!
//! Builds the instruction that creates the index account. The program
//! rejects it once the index exists, so it is not idempotent.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::error::SdkError;

use super::pda::derive_index_address;
use super::variant::ArticleInstruction;

/// System program ID.
pub const SYSTEM_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("11111111111111111111111111111111");

/// Builder for the Initialize instruction.
///
/// Accounts:
///
/// 0. `[signer, writable]` Payer
/// 1. `[writable]` Index PDA
/// 2. `[]` System program
#[derive(Debug, Clone)]
pub struct InitializeBuilder {
    program_id: Pubkey,
    payer: Option<Pubkey>,
}

impl InitializeBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            payer: None,
        }
    }

    /// Sets the payer account.
    #[must_use]
    pub fn payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    /// Returns the derived index PDA.
    ///
    /// # Errors
    ///
    /// Returns an error if derivation fails.
    pub fn get_index_address(&self) -> Result<(Pubkey, u8), SdkError> {
        derive_index_address(&self.program_id)
    }

    /// Builds the instruction.
    ///
    /// # Errors
    ///
    /// Returns an error if the payer is not set or derivation fails.
    pub fn build(self) -> Result<Instruction, SdkError> {
        let payer = self
            .payer
            .ok_or_else(|| SdkError::InvalidAddress("payer not set".to_string()))?;

        let (index, _) = derive_index_address(&self.program_id)?;

        let accounts = vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(index, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ];

        Ok(Instruction {
            program_id: self.program_id,
            accounts,
            data: ArticleInstruction::Initialize.pack()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_program_id() -> Pubkey {
        Pubkey::new_unique()
    }

    #[test]
    fn test_initialize_builder_new() {
        let program_id = test_program_id();
        let builder = InitializeBuilder::new(program_id);
        assert_eq!(builder.program_id, program_id);
        assert!(builder.payer.is_none());
    }

    #[test]
    fn test_initialize_builder_build() {
        let program_id = test_program_id();
        let payer = Pubkey::new_unique();
        let (index, _) = derive_index_address(&program_id).expect("derive");

        let ix = InitializeBuilder::new(program_id)
            .payer(payer)
            .build()
            .expect("should build instruction");

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.data, vec![0]);
        assert_eq!(
            ix.accounts,
            vec![
                AccountMeta::new(payer, true),
                AccountMeta::new(index, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ]
        );
    }

    #[test]
    fn test_initialize_builder_get_address() {
        let program_id = test_program_id();
        let builder = InitializeBuilder::new(program_id);

        let (index, _) = builder.get_index_address().expect("should derive");
        assert_eq!(index, derive_index_address(&program_id).expect("derive").0);
    }

    #[test]
    fn test_initialize_builder_build_missing_payer() {
        let result = InitializeBuilder::new(test_program_id()).build();
        assert!(matches!(result, Err(SdkError::InvalidAddress(_))));
    }
}
