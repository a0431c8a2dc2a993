//! Cluster descriptors, operating modes and capability sets.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// An opaque placeholder for one computation node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {}

/// The set of computation nodes among which shares are distributed.
///
/// Only the number of nodes is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cluster {
    nodes: Vec<Node>,
}

impl Cluster {
    /// Create a cluster of `node_count` nodes.
    pub fn new(node_count: usize) -> Result<Self> {
        if node_count == 0 {
            return Err(Error::invalid_node_count(node_count));
        }
        Ok(Self {
            nodes: vec![Node::default(); node_count],
        })
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::invalid_node_count(0));
        }
        Ok(())
    }

    /// The wire form `{"nodes":[{},…]}`.
    pub(crate) fn to_value(&self) -> Value {
        let nodes = vec![Value::Object(Map::new()); self.node_count()];
        let mut record = Map::new();
        record.insert("nodes".to_string(), Value::Array(nodes));
        Value::Object(record)
    }
}

/// The operating modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Additive shares of an integer, summable by the nodes.
    Sum,
    /// Additive shares of each character code, for storage.
    Store,
    /// Deterministic tags, for equality testing.
    Match,
}

impl Mode {
    /// All modes, in table order.
    pub const ALL: [Mode; 3] = [Mode::Sum, Mode::Store, Mode::Match];

    /// Position of the mode in the algorithm table.
    pub(crate) const fn index(self) -> usize {
        match self {
            Mode::Sum => 0,
            Mode::Store => 1,
            Mode::Match => 2,
        }
    }

    /// The lowercase wire name of the mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Sum => "sum",
            Mode::Store => "store",
            Mode::Match => "match",
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Mode::Sum),
            "store" => Ok(Mode::Store),
            "match" => Ok(Mode::Match),
            _ => Err(Error::Parse(format!("Invalid mode {:?}", s))),
        }
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// The set of modes a key is enabled for.
///
/// Serialized as named boolean flags, e.g. `{"sum":true}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operations {
    /// SUM mode
    #[serde(default, skip_serializing_if = "is_false")]
    pub sum: bool,
    /// STORE mode
    #[serde(default, skip_serializing_if = "is_false")]
    pub store: bool,
    /// MATCH mode
    #[serde(default, rename = "match", skip_serializing_if = "is_false")]
    pub matching: bool,
}

impl Operations {
    /// A capability set with a single mode enabled.
    pub fn only(mode: Mode) -> Self {
        Self::default().with(mode)
    }

    /// Returns a copy with `mode` enabled.
    pub fn with(mut self, mode: Mode) -> Self {
        match mode {
            Mode::Sum => self.sum = true,
            Mode::Store => self.store = true,
            Mode::Match => self.matching = true,
        }
        self
    }

    /// Returns whether `mode` is enabled.
    pub fn contains(&self, mode: Mode) -> bool {
        match mode {
            Mode::Sum => self.sum,
            Mode::Store => self.store,
            Mode::Match => self.matching,
        }
    }

    /// Returns whether no mode is enabled.
    pub fn is_empty(&self) -> bool {
        !(self.sum || self.store || self.matching)
    }

    /// Iterate over the enabled modes.
    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        Mode::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    /// The enabled mode, when exactly one is enabled.
    pub fn single_mode(&self) -> Result<Mode> {
        let mut modes = self.modes();
        match (modes.next(), modes.next()) {
            (Some(mode), None) => Ok(mode),
            (None, _) => Err(Error::no_capabilities()),
            (Some(_), Some(_)) => Err(Error::mode_required(
                "the key enables several modes, name the one to use",
            )),
        }
    }

    /// Fails with a capability mismatch unless `mode` is enabled.
    pub(crate) fn require(&self, mode: Mode) -> Result<()> {
        if self.contains(mode) {
            Ok(())
        } else {
            Err(Error::capability_mismatch(mode))
        }
    }

    /// Whether the key needs per-node masks.
    pub(crate) fn needs_masks(&self) -> bool {
        self.sum || self.store
    }

    /// The wire form: one `true` flag per enabled mode.
    pub(crate) fn to_value(&self) -> Value {
        Value::Object(
            self.modes()
                .map(|mode| (mode.as_str().to_string(), Value::Bool(true)))
                .collect(),
        )
    }

    pub(crate) fn flags(&self) -> u8 {
        (self.sum as u8) | ((self.store as u8) << 1) | ((self.matching as u8) << 2)
    }
}

impl FromIterator<Mode> for Operations {
    fn from_iter<T: IntoIterator<Item = Mode>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), Self::with)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cluster, Mode, Operations};
    use crate::Error;
    use std::error::Error as StdError;

    #[test]
    fn cluster_requires_a_node() {
        assert!(matches!(Cluster::new(0), Err(Error::InvalidCluster(_))));
        assert_eq!(Cluster::new(5).unwrap().node_count(), 5);
    }

    #[test]
    fn cluster_json() -> Result<(), Box<dyn StdError>> {
        let cluster = Cluster::new(3)?;
        let json = serde_json::to_string(&cluster)?;
        assert_eq!(json, r#"{"nodes":[{},{},{}]}"#);
        let back: Cluster = serde_json::from_str(r#"{"nodes":[{"url":"a"},{}]}"#)?;
        assert_eq!(back.node_count(), 2);
        Ok(())
    }

    #[test]
    fn mode_names() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
        assert_eq!(" STORE ".parse::<Mode>().unwrap(), Mode::Store);
        assert!(matches!("avg".parse::<Mode>(), Err(Error::Parse(_))));
    }

    #[test]
    fn operations_flags() -> Result<(), Box<dyn StdError>> {
        let ops = Operations::only(Mode::Sum);
        assert_eq!(serde_json::to_string(&ops)?, r#"{"sum":true}"#);
        assert!(ops.contains(Mode::Sum));
        assert!(!ops.contains(Mode::Match));
        assert_eq!(ops.single_mode()?, Mode::Sum);

        let ops: Operations = serde_json::from_str(r#"{"store":true,"match":true}"#)?;
        assert_eq!(ops.modes().collect::<Vec<_>>(), vec![Mode::Store, Mode::Match]);
        assert!(matches!(ops.single_mode(), Err(Error::ModeRequired(_))));
        assert_eq!(ops, [Mode::Match, Mode::Store].into_iter().collect::<Operations>());

        assert!(Operations::default().is_empty());
        assert!(matches!(
            Operations::default().single_mode(),
            Err(Error::CapabilityMismatch(_))
        ));
        assert!(matches!(
            Operations::only(Mode::Store).require(Mode::Sum),
            Err(Error::CapabilityMismatch(_))
        ));
        Ok(())
    }
}
