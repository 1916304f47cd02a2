//! In-process ledger.
//!
//! Emulates a ledger running the article program: transactions are
//! signature-checked, executed atomically against an account map, and
//! finalized immediately. Useful for dry runs and tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction,
};

use crate::client::ClientError;
use crate::codec::{decode_article, decode_index, encode_article, encode_index};
use crate::instructions::pda::{derive_article_address, derive_index_address};
use crate::instructions::ArticleInstruction;
use crate::ledger::Ledger;
use crate::types::{Article, ArticleIndex, Commitment, SignatureStatus};

/// Longest title the program accepts, in bytes.
pub const TITLE_LENGTH_LIMIT: usize = 20;

/// Longest content the program accepts, in bytes.
pub const CONTENT_LENGTH_LIMIT: usize = 1000;

const NOT_ENOUGH_KEYS: &str = "insufficient account keys for instruction";

/// Whether account `i` of the transaction message is writable according to
/// the message header.
fn is_writable(transaction: &Transaction, i: usize) -> bool {
    let message = &transaction.message;
    let header = &message.header;
    let signed = usize::from(header.num_required_signatures);
    if i < signed {
        i < signed.saturating_sub(usize::from(header.num_readonly_signed_accounts))
    } else {
        i < message
            .account_keys
            .len()
            .saturating_sub(usize::from(header.num_readonly_unsigned_accounts))
    }
}

/// Fails unless the instruction account at `position` is writable.
fn require_writable(writable: &[bool], position: usize, role: &str) -> Result<(), String> {
    if writable.get(position).copied().unwrap_or(false) {
        Ok(())
    } else {
        Err(format!("{} account must be writable", role))
    }
}

/// A processed transaction.
#[derive(Debug, Clone)]
struct TransactionRecord {
    slot: u64,
    instruction_count: usize,
    logs: Vec<String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<Pubkey, Vec<u8>>,
    transactions: HashMap<Signature, TransactionRecord>,
    slot: u64,
    blockhashes: u64,
}

/// In-memory ledger running the article program.
#[derive(Debug)]
pub struct MemoryLedger {
    program_id: Pubkey,
    stalled: bool,
    state: Mutex<MemoryState>,
}

impl MemoryLedger {
    /// Creates an empty ledger with the article program deployed at
    /// `program_id`.
    #[must_use]
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            stalled: false,
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Creates a ledger that accepts transactions but never reports them as
    /// confirmed.
    #[must_use]
    pub fn stalled(program_id: Pubkey) -> Self {
        Self {
            stalled: true,
            ..Self::new(program_id)
        }
    }

    /// Returns the program id the ledger runs.
    #[must_use]
    pub const fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Returns the number of transactions executed.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.lock().transactions.len()
    }

    /// Returns the number of instructions in an executed transaction.
    #[must_use]
    pub fn instruction_count(&self, signature: &Signature) -> Option<usize> {
        self.lock()
            .transactions
            .get(signature)
            .map(|record| record.instruction_count)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes every instruction of `transaction` against a copy of
    /// `accounts`, returning the new account map and the log lines.
    fn execute(
        &self,
        accounts: &HashMap<Pubkey, Vec<u8>>,
        transaction: &Transaction,
    ) -> Result<(HashMap<Pubkey, Vec<u8>>, Vec<String>), String> {
        let message = &transaction.message;
        let num_signers = usize::from(message.header.num_required_signatures);
        let mut scratch = accounts.clone();
        let mut logs = Vec::new();

        for (position, ix) in message.instructions.iter().enumerate() {
            let program = message
                .account_keys
                .get(usize::from(ix.program_id_index))
                .ok_or_else(|| format!("instruction {}: invalid program index", position))?;

            if program != &self.program_id {
                return Err(format!(
                    "instruction {}: unsupported program {}",
                    position, program
                ));
            }

            let keys = ix
                .accounts
                .iter()
                .map(|&i| {
                    message.account_keys.get(usize::from(i)).copied().ok_or_else(|| {
                        format!("instruction {}: invalid account index {}", position, i)
                    })
                })
                .collect::<Result<Vec<Pubkey>, String>>()?;
            let writable: Vec<bool> = ix
                .accounts
                .iter()
                .map(|&i| is_writable(transaction, usize::from(i)))
                .collect();

            match ix.accounts.first() {
                Some(&payer) if usize::from(payer) < num_signers => {}
                _ => {
                    return Err(format!(
                        "instruction {}: missing required signature for payer",
                        position
                    ))
                }
            }

            logs.push(format!("Program {} invoke [1]", program));
            match self.process(&mut scratch, &keys, &writable, &ix.data, &mut logs) {
                Ok(()) => logs.push(format!("Program {} success", program)),
                Err(err) => {
                    return Err(format!(
                        "Error processing Instruction {}: {}",
                        position, err
                    ))
                }
            }
        }

        Ok((scratch, logs))
    }

    /// Runs one article program instruction.
    fn process(
        &self,
        accounts: &mut HashMap<Pubkey, Vec<u8>>,
        keys: &[Pubkey],
        writable: &[bool],
        data: &[u8],
        logs: &mut Vec<String>,
    ) -> Result<(), String> {
        let instruction =
            ArticleInstruction::unpack(data).map_err(|_| "invalid instruction data".to_string())?;

        match instruction {
            ArticleInstruction::Initialize => {
                let [_payer, index, _system, ..] = keys else {
                    return Err(NOT_ENOUGH_KEYS.to_string());
                };
                require_writable(writable, 0, "payer")?;
                require_writable(writable, 1, "index")?;
                self.check_index(index)?;

                if accounts.contains_key(index) {
                    return Err(format!("Allocate: account {} already in use", index));
                }

                let data = encode_index(&ArticleIndex::default()).map_err(|e| e.to_string())?;
                accounts.insert(*index, data);
                Ok(())
            }
            ArticleInstruction::PostArticle(article) => {
                let [_payer, index, article_address, _system, ..] = keys else {
                    return Err(NOT_ENOUGH_KEYS.to_string());
                };
                require_writable(writable, 0, "payer")?;
                require_writable(writable, 1, "index")?;
                require_writable(writable, 2, "article")?;
                let state = self.read_index(accounts, index)?;

                let (expected, _) = derive_article_address(&self.program_id, state.cur_index)
                    .map_err(|e| e.to_string())?;
                if article_address != &expected {
                    return Err(format!(
                        "article account {} does not match sequence {}",
                        article_address, state.cur_index
                    ));
                }

                if article.title.len() > TITLE_LENGTH_LIMIT
                    || article.content.len() > CONTENT_LENGTH_LIMIT
                {
                    return Err("invalid program argument".to_string());
                }

                if accounts.contains_key(article_address) {
                    return Err(format!("Allocate: account {} already in use", article_address));
                }

                let next = state
                    .incremented()
                    .ok_or_else(|| "arithmetic overflow".to_string())?;
                let article_data = encode_article(&article).map_err(|e| e.to_string())?;
                let index_data = encode_index(&next).map_err(|e| e.to_string())?;

                accounts.insert(*article_address, article_data);
                accounts.insert(*index, index_data);
                Ok(())
            }
            ArticleInstruction::ListArticles => {
                let [_payer, index, _system, articles @ ..] = keys else {
                    return Err(NOT_ENOUGH_KEYS.to_string());
                };
                let state = self.read_index(accounts, index)?;

                if articles.len() != state.cur_index as usize {
                    return Err("invalid program argument".to_string());
                }

                let mut listed: Vec<Article> = Vec::with_capacity(articles.len());
                for (sequence, address) in (0..state.cur_index).zip(articles) {
                    let (expected, _) = derive_article_address(&self.program_id, sequence)
                        .map_err(|e| e.to_string())?;
                    if address != &expected {
                        return Err(format!(
                            "article account {} does not match sequence {}",
                            address, sequence
                        ));
                    }

                    let data = accounts
                        .get(address)
                        .ok_or_else(|| format!("article account {} not found", address))?;
                    listed.push(decode_article(data).map_err(|_| "invalid account data")?);
                }

                for (sequence, article) in listed.iter().enumerate() {
                    logs.push(format!(
                        "Program log: Article index: {}, title: {}, content: {}",
                        sequence, article.title, article.content
                    ));
                }
                Ok(())
            }
        }
    }

    fn check_index(&self, index: &Pubkey) -> Result<(), String> {
        let (expected, _) = derive_index_address(&self.program_id).map_err(|e| e.to_string())?;
        if index != &expected {
            return Err(format!("index account {} does not match derived address", index));
        }
        Ok(())
    }

    fn read_index(
        &self,
        accounts: &HashMap<Pubkey, Vec<u8>>,
        index: &Pubkey,
    ) -> Result<ArticleIndex, String> {
        self.check_index(index)?;
        let data = accounts
            .get(index)
            .ok_or_else(|| "index account not initialized".to_string())?;
        decode_index(data).map_err(|_| "invalid account data".to_string())
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn latest_blockhash(&self) -> Result<Hash, ClientError> {
        let mut state = self.lock();
        state.blockhashes += 1;

        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&state.blockhashes.to_le_bytes());
        Ok(Hash::new_from_array(bytes))
    }

    async fn submit(&self, transaction: &Transaction) -> Result<Signature, ClientError> {
        transaction
            .verify()
            .map_err(|e| ClientError::Rejected(format!("signature verification failed: {}", e)))?;

        let signature = *transaction
            .signatures
            .first()
            .ok_or_else(|| ClientError::Rejected("transaction has no signatures".to_string()))?;

        let mut state = self.lock();
        if state.transactions.contains_key(&signature) {
            return Err(ClientError::Rejected(
                "transaction has already been processed".to_string(),
            ));
        }

        let (accounts, logs) = self
            .execute(&state.accounts, transaction)
            .map_err(|err| ClientError::Rejected(format!("transaction simulation failed: {}", err)))?;

        state.slot += 1;
        let record = TransactionRecord {
            slot: state.slot,
            instruction_count: transaction.message.instructions.len(),
            logs,
        };
        state.accounts = accounts;
        state.transactions.insert(signature, record);

        Ok(signature)
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, ClientError> {
        if self.stalled {
            return Ok(None);
        }

        Ok(self
            .lock()
            .transactions
            .get(signature)
            .map(|record| SignatureStatus {
                slot: record.slot,
                confirmation: Some(Commitment::Finalized),
                err: None,
            }))
    }

    async fn transaction_logs(&self, signature: &Signature) -> Result<Vec<String>, ClientError> {
        self.lock()
            .transactions
            .get(signature)
            .map(|record| record.logs.clone())
            .ok_or_else(|| ClientError::NotFound(format!("transaction {}", signature)))
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ClientError> {
        Ok(self.lock().accounts.get(address).cloned())
    }
}
