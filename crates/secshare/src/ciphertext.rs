//! Ciphertexts for the three operating modes.

use crate::serde_decimal::{biguint_from_value, number};
use crate::{ClusterKey, Error, Mode, Result};
use ndarray::{Array2, Axis};
use num_bigint::BigUint;
use secshare_traits::{Deserialize, Serialize};
use serde::{
    de::Error as _, Deserialize as SerdeDeserialize, Deserializer, Serialize as SerdeSerialize,
    Serializer,
};
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::str::FromStr;

/// Length in bytes of a MATCH tag.
pub const MATCH_TAG_LEN: usize = 64;

/// A deterministic MATCH tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchTag([u8; MATCH_TAG_LEN]);

impl MatchTag {
    /// Create a tag from its raw bytes.
    pub const fn from_bytes(bytes: [u8; MATCH_TAG_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw bytes of the tag.
    pub fn as_bytes(&self) -> &[u8; MATCH_TAG_LEN] {
        &self.0
    }

    /// Lowercase hexadecimal encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a hexadecimal tag.
    pub fn from_hex(text: &str) -> Result<Self> {
        let mut bytes = [0u8; MATCH_TAG_LEN];
        hex::decode_to_slice(text, &mut bytes)
            .map_err(|e| Error::Parse(format!("invalid match tag: {}", e)))?;
        Ok(Self(bytes))
    }

    fn looks_like_hex(text: &str) -> bool {
        text.len() == 2 * MATCH_TAG_LEN && text.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl Debug for MatchTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MatchTag({})", self.to_hex())
    }
}

/// The kind of plaintext a STORE ciphertext holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// One column per character.
    #[default]
    Text,
    /// A single column holding the integer itself.
    Integer,
}

impl StoreKind {
    /// The wire name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            StoreKind::Text => "text",
            StoreKind::Integer => "integer",
        }
    }
}

impl FromStr for StoreKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(StoreKind::Text),
            "integer" => Ok(StoreKind::Integer),
            _ => Err(Error::Parse(format!("Invalid STORE kind {:?}", s))),
        }
    }
}

/// The mode-dependent content of a ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CiphertextBody {
    /// One share per node.
    Sum(Vec<BigUint>),
    /// Additive shares of character codes, or of an integer.
    Store {
        /// Rows are nodes, columns are codes.
        shares: Array2<BigUint>,
        /// Whether the codes spell a text or hold an integer.
        kind: StoreKind,
    },
    /// One identical tag per node.
    Match(Vec<MatchTag>),
}

impl CiphertextBody {
    /// The mode the body was produced in.
    pub fn mode(&self) -> Mode {
        match self {
            CiphertextBody::Sum(_) => Mode::Sum,
            CiphertextBody::Store { .. } => Mode::Store,
            CiphertextBody::Match(_) => Mode::Match,
        }
    }

    /// The number of nodes the body holds shares for.
    pub fn node_count(&self) -> usize {
        match self {
            CiphertextBody::Sum(shares) => shares.len(),
            CiphertextBody::Store { shares, .. } => shares.nrows(),
            CiphertextBody::Match(tags) => tags.len(),
        }
    }

    fn to_value(&self) -> (&'static str, Value) {
        match self {
            CiphertextBody::Sum(shares) => {
                ("shares", Value::Array(shares.iter().map(number).collect()))
            }
            CiphertextBody::Store { shares, .. } => (
                "shares",
                Value::Array(
                    shares
                        .axis_iter(Axis(0))
                        .map(|row| Value::Array(row.iter().map(number).collect()))
                        .collect(),
                ),
            ),
            CiphertextBody::Match(tags) => (
                "tags",
                Value::Array(tags.iter().map(|t| Value::String(t.to_hex())).collect()),
            ),
        }
    }

    /// Decode a body from a bare JSON array, inferring the mode from its shape
    /// unless `mode` is given.
    fn from_array(items: &[Value], mode: Option<Mode>) -> Result<Self> {
        let mode = match mode {
            Some(mode) => mode,
            None => Self::infer_mode(items)?,
        };
        match mode {
            Mode::Sum => items
                .iter()
                .map(biguint_from_value)
                .collect::<Result<Vec<_>>>()
                .map(CiphertextBody::Sum),
            Mode::Store => Self::table_from_rows(items).map(|shares| CiphertextBody::Store {
                shares,
                kind: StoreKind::Text,
            }),
            Mode::Match => items
                .iter()
                .map(|item| match item {
                    Value::String(text) => MatchTag::from_hex(text),
                    other => Err(Error::Parse(format!("expected a match tag, found {}", other))),
                })
                .collect::<Result<Vec<_>>>()
                .map(CiphertextBody::Match),
        }
    }

    fn infer_mode(items: &[Value]) -> Result<Mode> {
        if items.is_empty() {
            return Err(Error::mode_required(
                "an empty array has no shape to infer a mode from",
            ));
        }
        if items.iter().all(Value::is_array) {
            Ok(Mode::Store)
        } else if items
            .iter()
            .all(|v| matches!(v, Value::String(s) if MatchTag::looks_like_hex(s)))
        {
            Ok(Mode::Match)
        } else if items.iter().all(|v| v.is_number() || v.is_string()) {
            Ok(Mode::Sum)
        } else {
            Err(Error::mode_required(
                "the array mixes shares of different shapes",
            ))
        }
    }

    fn table_from_rows(rows: &[Value]) -> Result<Array2<BigUint>> {
        let mut width = None;
        let mut data = Vec::new();
        for row in rows {
            let Value::Array(cells) = row else {
                return Err(Error::malformed_ciphertext("STORE shares must be a table"));
            };
            match width {
                None => width = Some(cells.len()),
                Some(w) if w != cells.len() => {
                    return Err(Error::malformed_ciphertext(format!(
                        "STORE rows have different lengths {} and {}",
                        w,
                        cells.len()
                    )))
                }
                Some(_) => {}
            }
            for cell in cells {
                data.push(biguint_from_value(cell)?);
            }
        }
        Array2::from_shape_vec((rows.len(), width.unwrap_or(0)), data)
            .map_err(|e| Error::malformed_ciphertext(e.to_string()))
    }
}

/// A ciphertext: the node shares and, for cluster keys, the key itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    pub(crate) body: CiphertextBody,
    pub(crate) key: Option<Box<ClusterKey>>,
}

impl Ciphertext {
    pub(crate) fn new(body: CiphertextBody, key: Option<ClusterKey>) -> Self {
        Self {
            body,
            key: key.map(Box::new),
        }
    }

    /// Build a SUM ciphertext from raw node shares, e.g. the output of
    /// [`crate::combine_shares`].
    pub fn from_sum_shares(shares: Vec<BigUint>) -> Self {
        Self::new(CiphertextBody::Sum(shares), None)
    }

    /// The mode the ciphertext was produced in.
    pub fn mode(&self) -> Mode {
        self.body.mode()
    }

    /// The number of nodes the ciphertext holds shares for.
    pub fn node_count(&self) -> usize {
        self.body.node_count()
    }

    /// The mode-dependent content.
    pub fn body(&self) -> &CiphertextBody {
        &self.body
    }

    /// The SUM shares, one per node.
    pub fn shares(&self) -> Option<&[BigUint]> {
        match &self.body {
            CiphertextBody::Sum(shares) => Some(shares),
            _ => None,
        }
    }

    /// The STORE table, rows are nodes.
    pub fn table(&self) -> Option<&Array2<BigUint>> {
        match &self.body {
            CiphertextBody::Store { shares, .. } => Some(shares),
            _ => None,
        }
    }

    /// The kind of plaintext of a STORE ciphertext.
    pub fn store_kind(&self) -> Option<StoreKind> {
        match &self.body {
            CiphertextBody::Store { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The shares held by node `index`.
    pub fn node_shares(&self, index: usize) -> Option<Vec<BigUint>> {
        match &self.body {
            CiphertextBody::Sum(shares) => shares.get(index).map(|s| vec![s.clone()]),
            CiphertextBody::Store { shares, .. } => {
                (index < shares.nrows()).then(|| shares.row(index).to_vec())
            }
            CiphertextBody::Match(_) => None,
        }
    }

    /// The cluster key carried by the ciphertext, if any.
    pub fn embedded_key(&self) -> Option<&ClusterKey> {
        self.key.as_deref()
    }

    /// Whether two MATCH ciphertexts encrypt the same plaintext.
    pub fn same_plaintext(&self, other: &Ciphertext) -> Result<bool> {
        match (&self.body, &other.body) {
            (CiphertextBody::Match(a), CiphertextBody::Match(b)) => {
                Ok(a.first().is_some() && a.first() == b.first())
            }
            _ => Err(Error::TypeMismatch(
                "Equality testing requires two MATCH ciphertexts".to_string(),
            )),
        }
    }

    /// Encode as the JSON wire record.
    pub fn to_value(&self) -> Value {
        let mut record = Map::new();
        record.insert("mode".to_string(), Value::String(self.mode().to_string()));
        let (field, content) = self.body.to_value();
        record.insert(field.to_string(), content);
        if let CiphertextBody::Store {
            kind: StoreKind::Integer,
            ..
        } = self.body
        {
            record.insert(
                "kind".to_string(),
                Value::String(StoreKind::Integer.as_str().to_string()),
            );
        }
        if let Some(key) = &self.key {
            record.insert("key".to_string(), key.to_value());
        }
        Value::Object(record)
    }

    /// Decode a ciphertext from its JSON wire record or from a bare share array.
    ///
    /// An explicit `"mode"` in the record wins over `hint`; without either, the
    /// mode is inferred from the shape of the shares.
    pub fn from_value(value: &Value, hint: Option<Mode>) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Self::new(CiphertextBody::from_array(items, hint)?, None)),
            Value::Object(record) => {
                let mode = match record.get("mode") {
                    Some(Value::String(mode)) => Some(mode.parse::<Mode>()?),
                    Some(other) => {
                        return Err(Error::Parse(format!("invalid mode {}", other)));
                    }
                    None => hint,
                };
                let content = match (record.get("shares"), record.get("tags")) {
                    (Some(Value::Array(items)), None) | (None, Some(Value::Array(items))) => items,
                    (None, None) => {
                        return Err(Error::mode_required(
                            "the record carries neither shares nor tags",
                        ))
                    }
                    _ => {
                        return Err(Error::malformed_ciphertext(
                            "expected exactly one array of shares or tags",
                        ))
                    }
                };
                let mode = match (mode, record.contains_key("tags")) {
                    (Some(mode), _) => Some(mode),
                    (None, true) => Some(Mode::Match),
                    (None, false) => None,
                };
                let mut body = CiphertextBody::from_array(content, mode)?;
                match (record.get("kind"), &mut body) {
                    (None, _) => {}
                    (Some(Value::String(name)), CiphertextBody::Store { kind, .. }) => {
                        *kind = name.parse()?;
                    }
                    (Some(_), CiphertextBody::Store { .. }) => {
                        return Err(Error::Parse("STORE kind must be a string".to_string()));
                    }
                    (Some(_), _) => {
                        return Err(Error::malformed_ciphertext(
                            "only STORE ciphertexts carry a kind",
                        ));
                    }
                }
                let key = match record.get("key") {
                    Some(Value::Null) | None => None,
                    Some(key) => Some(
                        serde_json::from_value::<ClusterKey>(key.clone())
                            .map_err(Error::serialization)?,
                    ),
                };
                Ok(Self::new(body, key))
            }
            _ => Err(Error::mode_required(
                "a ciphertext must be a record or an array of shares",
            )),
        }
    }

    /// Decode a ciphertext from JSON text.
    pub fn from_json(text: &str, hint: Option<Mode>) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::Parse(e.to_string()))?;
        Self::from_value(&value, hint)
    }
}

impl Serialize for Ciphertext {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_value().to_string().into_bytes()
    }
}

impl Deserialize for Ciphertext {
    type Error = Error;

    fn try_deserialize(bytes: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| Error::Parse(e.to_string()))?;
        Self::from_value(&value, None)
    }
}

impl SerdeSerialize for Ciphertext {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> SerdeDeserialize<'de> for Ciphertext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ciphertext::from_value(&value, None).map_err(D::Error::custom)
    }
}
