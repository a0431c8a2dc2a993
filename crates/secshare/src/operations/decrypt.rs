use super::{report, KeySlot};
use crate::{Ciphertext, Error, KeyMaterial, KeyRegime, Mode, Operations, OutputKind, Result};
use crate::{SecretKey, Seed};
use serde_json::Value;

/// Arguments of [`DecryptOperation`].
#[derive(Debug, Clone)]
pub struct DecryptArgs {
    /// Number of computation nodes of the instance key.
    pub node_count: usize,
    /// Regime of the instance key.
    pub regime: KeyRegime,
    /// The mode of the ciphertexts; when absent it is inferred from their shape.
    pub mode: Option<Mode>,
    /// Rendering of the decrypted value.
    pub output: OutputKind,
    /// Seed of the instance key; without one the key is random.
    pub seed: Option<Seed>,
}

impl Default for DecryptArgs {
    fn default() -> Self {
        Self {
            node_count: 3,
            regime: KeyRegime::Coordinating,
            mode: Some(Mode::Sum),
            output: OutputKind::Number,
            seed: None,
        }
    }
}

/// Decrypt a JSON ciphertext.
///
/// The input is a ciphertext record, a bare share array, or
/// `{"ciphertext":…,"secretKey":…}`. The key is, in order of precedence, the
/// inline secret key, the key carried by a cluster ciphertext, or the key owned
/// by the operation.
#[derive(Debug)]
pub struct DecryptOperation {
    args: DecryptArgs,
    key: KeySlot,
}

impl DecryptOperation {
    /// Create an operation; its key is generated on first use.
    pub fn new(args: DecryptArgs) -> Self {
        Self {
            args,
            key: KeySlot::default(),
        }
    }

    /// The key of the operation, once generated.
    pub fn key(&self) -> Option<&KeyMaterial> {
        self.key.get()
    }

    /// Decrypt `input`, returning the rendered value or an `Error: ` message.
    pub fn run(&self, input: &str) -> String {
        report("decrypt", self.try_run(input))
    }

    fn try_run(&self, input: &str) -> Result<String> {
        let args = &self.args;
        if args.mode == Some(Mode::Sum) && args.output == OutputKind::Text {
            return Err(Error::sum_requires_number_output());
        }

        let value: Value = serde_json::from_str(input).map_err(|e| Error::Parse(e.to_string()))?;
        let (ct, inline_key) = match value.get("ciphertext") {
            Some(ciphertext) => {
                let key = value
                    .get("secretKey")
                    .map(|key| serde_json::from_value::<SecretKey>(key.clone()))
                    .transpose()
                    .map_err(Error::serialization)?;
                (Ciphertext::from_value(ciphertext, args.mode)?, key)
            }
            None => (Ciphertext::from_value(&value, args.mode)?, None),
        };
        if ct.mode() == Mode::Sum && args.output == OutputKind::Text {
            return Err(Error::sum_requires_number_output());
        }

        let decrypted = match (&inline_key, ct.embedded_key()) {
            (Some(sk), _) => sk.decrypt(&ct)?,
            (None, Some(ck)) => ck.decrypt(&ct)?,
            (None, None) => {
                let mode = args.mode.unwrap_or(ct.mode());
                self.key
                    .get_or_generate(
                        args.node_count,
                        Operations::only(mode),
                        args.regime,
                        args.seed.as_ref(),
                    )?
                    .decrypt(&ct)?
            }
        };
        decrypted.render(args.output)
    }
}
