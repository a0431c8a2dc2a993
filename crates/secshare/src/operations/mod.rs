//! Host operations: plain text in, plain text out.
//!
//! Every operation reports failures as a string starting with `Error: ` rather
//! than returning an error, and owns at most one key, created on first use.

mod combine;
mod decrypt;
mod encrypt;

pub use combine::CombineSharesOperation;
pub use decrypt::{DecryptArgs, DecryptOperation};
pub use encrypt::{EncryptArgs, EncryptOperation};

use crate::{KeyGenerator, KeyMaterial, KeyRegime, Operations, Result, Seed};
use once_cell::sync::OnceCell;
use tracing::warn;

/// Prefix of every failure reported to the host.
pub const ERROR_PREFIX: &str = "Error: ";

fn report(operation: &'static str, result: Result<String>) -> String {
    match result {
        Ok(output) => output,
        Err(e) => {
            warn!(operation, error = %e, "operation failed");
            format!("{}{}", ERROR_PREFIX, e)
        }
    }
}

/// Key material generated at most once per operation instance.
#[derive(Debug, Default)]
struct KeySlot {
    cell: OnceCell<KeyMaterial>,
}

impl KeySlot {
    /// The instance key, generating it on first use.
    ///
    /// Concurrent first callers block until a single generation completes; a
    /// failed generation leaves the slot empty.
    fn get_or_generate(
        &self,
        node_count: usize,
        operations: Operations,
        regime: KeyRegime,
        seed: Option<&Seed>,
    ) -> Result<&KeyMaterial> {
        self.cell.get_or_try_init(|| {
            KeyGenerator::default().generate(node_count, operations, regime, seed)
        })
    }

    fn get(&self) -> Option<&KeyMaterial> {
        self.cell.get()
    }
}
