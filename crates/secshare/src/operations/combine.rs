use super::report;
use crate::{combine_shares, format_shares, parse_share_pair, Parameters, Result};
use std::sync::Arc;

/// Add two share vectors, given as `"[1,2,3]; [4,5,6]"`.
#[derive(Debug, Clone)]
pub struct CombineSharesOperation {
    par: Arc<Parameters>,
}

impl Default for CombineSharesOperation {
    fn default() -> Self {
        Self::new(&Parameters::default_arc())
    }
}

impl CombineSharesOperation {
    /// Create an operation combining shares modulo the modulus of `par`.
    pub fn new(par: &Arc<Parameters>) -> Self {
        Self { par: par.clone() }
    }

    /// Combine the two arrays of `input`, or return an `Error: ` message.
    pub fn run(&self, input: &str) -> String {
        report("combine", self.try_run(input))
    }

    fn try_run(&self, input: &str) -> Result<String> {
        let (a, b) = parse_share_pair(input)?;
        let shares = combine_shares(&a, &b, self.par.modulus())?;
        Ok(format_shares(&shares))
    }
}

#[cfg(test)]
mod tests {
    use super::CombineSharesOperation;
    use crate::operations::{DecryptArgs, DecryptOperation, EncryptArgs, EncryptOperation};
    use crate::Seed;
    use serde_json::Value;

    #[test]
    fn combine() {
        let op = CombineSharesOperation::default();
        assert_eq!(op.run("[1,2,3];[4,5,6]"), "[5,7,9]");
        assert_eq!(op.run(" [1] ; [2] "), "[3]");
        assert_eq!(
            op.run("[1,2];[3]"),
            "Error: Both arrays must have the same length. E.g., [1,2]; [3,4] (got 2 and 1)"
        );
        assert_eq!(
            op.run("[1,2]"),
            "Error: Both inputs must be arrays separated by ';'. E.g., [1,2]; [3,4]"
        );
    }

    #[test]
    fn combined_shares_decrypt_to_the_sum() {
        let seed = Seed::new("aggregate");
        let encrypt = EncryptOperation::new(EncryptArgs {
            seed: Some(seed.clone()),
            ..Default::default()
        });
        let shares = |input: &str| {
            let value: Value = serde_json::from_str(&encrypt.run(input)).unwrap();
            value["shares"].to_string()
        };
        let combined = CombineSharesOperation::default()
            .run(&format!("{};{}", shares("40"), shares("-82")));

        let decrypt = DecryptOperation::new(DecryptArgs {
            seed: Some(seed),
            ..Default::default()
        });
        assert_eq!(decrypt.run(&combined), "-42");
    }
}
