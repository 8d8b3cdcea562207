//! Input schema for hierarchical call profiles.
//!
//! A profile is one root call with nested children. Every node carries the
//! inclusive metrics reported by the profiler (`ct`, `wt`, `cpu`, `mu`, `pmu`)
//! and, when available, the exclusive ones (`ewt`, `ecpu`, `emu`, `epmu`).

use crate::utils::error::AnalysisError;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

/// A metric key recognized by every analysis view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKey {
    /// Call count
    Ct,
    /// Wall time
    Wt,
    /// CPU time
    Cpu,
    /// Memory usage
    Mu,
    /// Peak memory usage
    Pmu,
    /// Exclusive wall time
    Ewt,
    /// Exclusive CPU time
    Ecpu,
    /// Exclusive memory usage
    Emu,
    /// Exclusive peak memory usage
    Epmu,
}

impl MetricKey {
    /// Inclusive keys, as reported per node by the profiler
    pub const INCLUSIVE: [MetricKey; 5] = [
        MetricKey::Ct,
        MetricKey::Wt,
        MetricKey::Cpu,
        MetricKey::Mu,
        MetricKey::Pmu,
    ];

    /// Exclusive keys, supplied directly by the profiler
    pub const EXCLUSIVE: [MetricKey; 4] = [
        MetricKey::Ewt,
        MetricKey::Ecpu,
        MetricKey::Emu,
        MetricKey::Epmu,
    ];

    /// Every recognized key, inclusive first
    pub const ALL: [MetricKey; 9] = [
        MetricKey::Ct,
        MetricKey::Wt,
        MetricKey::Cpu,
        MetricKey::Mu,
        MetricKey::Pmu,
        MetricKey::Ewt,
        MetricKey::Ecpu,
        MetricKey::Emu,
        MetricKey::Epmu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::Ct => "ct",
            MetricKey::Wt => "wt",
            MetricKey::Cpu => "cpu",
            MetricKey::Mu => "mu",
            MetricKey::Pmu => "pmu",
            MetricKey::Ewt => "ewt",
            MetricKey::Ecpu => "ecpu",
            MetricKey::Emu => "emu",
            MetricKey::Epmu => "epmu",
        }
    }

    pub fn is_exclusive(&self) -> bool {
        Self::EXCLUSIVE.contains(self)
    }

    /// Human-readable description, used by the `metrics` command
    pub fn description(&self) -> &'static str {
        match self {
            MetricKey::Ct => "call count",
            MetricKey::Wt => "wall time",
            MetricKey::Cpu => "cpu time",
            MetricKey::Mu => "memory usage",
            MetricKey::Pmu => "peak memory usage",
            MetricKey::Ewt => "exclusive wall time",
            MetricKey::Ecpu => "exclusive cpu time",
            MetricKey::Emu => "exclusive memory usage",
            MetricKey::Epmu => "exclusive peak memory usage",
        }
    }
}

impl FromStr for MetricKey {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| AnalysisError::InvalidMetric(s.to_string()))
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-node metric values, one slot per [`MetricKey`]
///
/// Missing keys read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub ct: f64,
    #[serde(default)]
    pub wt: f64,
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub mu: f64,
    #[serde(default)]
    pub pmu: f64,
    #[serde(default)]
    pub ewt: f64,
    #[serde(default)]
    pub ecpu: f64,
    #[serde(default)]
    pub emu: f64,
    #[serde(default)]
    pub epmu: f64,
}

impl Metrics {
    pub fn get(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::Ct => self.ct,
            MetricKey::Wt => self.wt,
            MetricKey::Cpu => self.cpu,
            MetricKey::Mu => self.mu,
            MetricKey::Pmu => self.pmu,
            MetricKey::Ewt => self.ewt,
            MetricKey::Ecpu => self.ecpu,
            MetricKey::Emu => self.emu,
            MetricKey::Epmu => self.epmu,
        }
    }

    pub fn set(&mut self, key: MetricKey, value: f64) {
        let slot = match key {
            MetricKey::Ct => &mut self.ct,
            MetricKey::Wt => &mut self.wt,
            MetricKey::Cpu => &mut self.cpu,
            MetricKey::Mu => &mut self.mu,
            MetricKey::Pmu => &mut self.pmu,
            MetricKey::Ewt => &mut self.ewt,
            MetricKey::Ecpu => &mut self.ecpu,
            MetricKey::Emu => &mut self.emu,
            MetricKey::Epmu => &mut self.epmu,
        };
        *slot = value;
    }
}

impl AddAssign<&Metrics> for Metrics {
    fn add_assign(&mut self, other: &Metrics) {
        for key in MetricKey::ALL {
            self.set(key, self.get(key) + other.get(key));
        }
    }
}

/// One call in the profile tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileNode {
    /// Function name (canonical `Type::function` once normalized)
    #[serde(alias = "name")]
    pub function: String,

    /// Owning class/type, merged into `function` by normalization
    #[serde(
        default,
        rename = "cls",
        alias = "owningType",
        alias = "owning_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub owning_type: Option<String>,

    /// Metrics recorded for this call occurrence
    #[serde(flatten)]
    pub metrics: Metrics,

    /// Calls made from this occurrence, in recorded order
    #[serde(
        default,
        deserialize_with = "lenient_children",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<ProfileNode>,
}

impl ProfileNode {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            owning_type: None,
            metrics: Metrics::default(),
            children: Vec::new(),
        }
    }

    pub fn with_owning_type(mut self, owning_type: impl Into<String>) -> Self {
        self.owning_type = Some(owning_type.into());
        self
    }

    pub fn with_metric(mut self, key: MetricKey, value: f64) -> Self {
        self.metrics.set(key, value);
        self
    }

    pub fn with_child(mut self, child: ProfileNode) -> Self {
        self.children.push(child);
        self
    }

    /// Value of `key` at this node
    pub fn metric(&self, key: MetricKey) -> f64 {
        self.metrics.get(key)
    }

    /// Single-level self value: own metric minus the direct children's
    pub fn self_value(&self, key: MetricKey) -> f64 {
        self.children
            .iter()
            .fold(self.metric(key), |value, child| value - child.metric(key))
    }

    /// Total number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ProfileNode::node_count).sum::<usize>()
    }

    /// Deepest nesting level below this node (0 for a leaf)
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Treat a missing, null or non-array `children` field as "no children"
fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<ProfileNode>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ChildrenVisitor)
}

/// Reads child nodes straight from the input; anything but an array is skipped
struct ChildrenVisitor;

impl<'de> Visitor<'de> for ChildrenVisitor {
    type Value = Vec<ProfileNode>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of call nodes")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut children = Vec::new();
        while let Some(child) = seq.next_element()? {
            children.push(child);
        }
        Ok(children)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Vec::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }
}
