use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Predicate applied by a leaf condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Exists,
    Equals,
    NotEquals,
    Contains,
    In,
    Gt,
    Gte,
    Lt,
    Lte,
    MatchesRegex,
    /// Any operator name this build does not know. Always evaluates to false.
    #[serde(other)]
    Unknown,
}

/// A node in a condition tree.
///
/// Serialized with a `type` tag of `leaf` or `group`. When the tag is
/// absent the kind is inferred: a `path` key makes a leaf, any of `all`,
/// `any` or `not` makes a group. Everything else, including an unknown tag
/// and a leaf or group whose fields do not parse, deserializes to
/// [`ConditionNode::Unrecognized`], which evaluates as a match (fail-open).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConditionNode {
    Leaf(ConditionLeaf),
    Group(ConditionGroup),
    Unrecognized,
}

/// Compare the value at `path` against `value` with `op`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionLeaf {
    pub path: String,
    #[serde(alias = "operator")]
    pub op: Operator,
    /// Absent for `exists`. An explicit JSON `null` is kept as
    /// `Some(Value::Null)`, which is distinct from absent.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

/// Boolean combinator. Every constraint present must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<ConditionNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any: Option<Vec<ConditionNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<ConditionNode>>,
}

const GROUP_KEYS: [&str; 3] = ["all", "any", "not"];

impl<'de> Deserialize<'de> for ConditionNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::classify(raw))
    }
}

impl ConditionNode {
    fn classify(raw: Value) -> Self {
        let Some(fields) = raw.as_object() else {
            return Self::Unrecognized;
        };
        let is_leaf = match fields.get("type") {
            Some(Value::String(tag)) if tag == "leaf" => true,
            Some(Value::String(tag)) if tag == "group" => false,
            Some(_) => return Self::Unrecognized,
            None if fields.contains_key("path") => true,
            None if GROUP_KEYS.iter().any(|key| fields.contains_key(*key)) => false,
            None => return Self::Unrecognized,
        };

        if is_leaf {
            ConditionLeaf::deserialize(raw).map_or(Self::Unrecognized, Self::Leaf)
        } else {
            ConditionGroup::deserialize(raw).map_or(Self::Unrecognized, Self::Group)
        }
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Default for ConditionNode {
    /// An unconstrained group, which always matches.
    fn default() -> Self {
        Self::Group(ConditionGroup::default())
    }
}

impl ConditionNode {
    /// A leaf comparing `path` with `value`.
    pub fn leaf(path: impl Into<String>, op: Operator, value: Value) -> Self {
        Self::Leaf(ConditionLeaf {
            path: path.into(),
            op,
            value: Some(value),
        })
    }

    /// `exists` leaf, which takes no value.
    pub fn exists(path: impl Into<String>) -> Self {
        Self::Leaf(ConditionLeaf {
            path: path.into(),
            op: Operator::Exists,
            value: None,
        })
    }

    pub fn all(children: Vec<ConditionNode>) -> Self {
        Self::Group(ConditionGroup {
            all: Some(children),
            ..ConditionGroup::default()
        })
    }

    pub fn any(children: Vec<ConditionNode>) -> Self {
        Self::Group(ConditionGroup {
            any: Some(children),
            ..ConditionGroup::default()
        })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: ConditionNode) -> Self {
        Self::Group(ConditionGroup {
            not: Some(Box::new(child)),
            ..ConditionGroup::default()
        })
    }

    /// A node that always matches.
    pub fn always() -> Self {
        Self::default()
    }
}
