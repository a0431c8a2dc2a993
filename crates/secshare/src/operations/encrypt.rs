use super::{report, KeySlot};
use crate::{Error, KeyMaterial, KeyRegime, Mode, Operations, Plaintext, Result, Seed};
use rand::rngs::OsRng;
use serde_json::json;

/// Arguments of [`EncryptOperation`].
#[derive(Debug, Clone)]
pub struct EncryptArgs {
    /// Number of computation nodes.
    pub node_count: usize,
    /// Regime of the instance key.
    pub regime: KeyRegime,
    /// The mode to encrypt in; the instance key enables only this mode.
    pub mode: Mode,
    /// Seed of the instance key; without one the key is random.
    pub seed: Option<Seed>,
    /// Output `{"ciphertext":…,"secretKey":…}` instead of the bare ciphertext.
    pub include_key: bool,
}

impl Default for EncryptArgs {
    fn default() -> Self {
        Self {
            node_count: 3,
            regime: KeyRegime::Coordinating,
            mode: Mode::Sum,
            seed: None,
            include_key: false,
        }
    }
}

/// Encrypt host input under a key owned by the operation.
///
/// Input parsing as an integer is attempted first; anything else is text. In
/// STORE mode only canonical integer literals are integers, so that every
/// other input, `007` included, decrypts back to the exact text.
#[derive(Debug)]
pub struct EncryptOperation {
    args: EncryptArgs,
    key: KeySlot,
}

impl EncryptOperation {
    /// Create an operation; its key is generated on the first run.
    pub fn new(args: EncryptArgs) -> Self {
        Self {
            args,
            key: KeySlot::default(),
        }
    }

    /// The key of the operation, once generated.
    pub fn key(&self) -> Option<&KeyMaterial> {
        self.key.get()
    }

    /// Encrypt `input`, returning a JSON ciphertext or an `Error: ` message.
    pub fn run(&self, input: &str) -> String {
        report("encrypt", self.try_run(input))
    }

    fn try_run(&self, input: &str) -> Result<String> {
        let args = &self.args;
        let pt = match args.mode {
            Mode::Store => Plaintext::parse_canonical(input),
            Mode::Sum | Mode::Match => Plaintext::parse(input),
        };
        if args.mode == Mode::Sum && matches!(pt, Plaintext::Text(_)) {
            return Err(Error::sum_requires_integer());
        }

        let key = self.key.get_or_generate(
            args.node_count,
            Operations::only(args.mode),
            args.regime,
            args.seed.as_ref(),
        )?;
        let ct = key.encrypt(args.mode, &pt, &mut OsRng)?;

        let output = if args.include_key {
            let key = match key {
                KeyMaterial::Coordinating(sk) => sk.to_value(),
                KeyMaterial::Cluster(ck) => ck.to_value(),
            };
            json!({ "ciphertext": ct.to_value(), "secretKey": key })
        } else {
            ct.to_value()
        };
        Ok(output.to_string())
    }
}
