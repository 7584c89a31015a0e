use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Generic JSON-like document tree. Object keys keep insertion order,
/// which downstream tools rely on when diffing output.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Object(Vec<(String, Node)>),
    Array(Vec<Node>),
    String(String),
    Integer(i64),
    Float(f32),
}

impl Node {
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn floats(values: &[f32]) -> Self {
        Node::Array(values.iter().copied().map(Node::Float).collect())
    }

    pub fn integers(values: &[i64]) -> Self {
        Node::Array(values.iter().copied().map(Node::Integer).collect())
    }

    /// Objects and arrays; everything else is a scalar.
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Object(_) | Node::Array(_))
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Integer(value)
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Node::Integer(i64::from(value))
    }
}

impl From<f32> for Node {
    fn from(value: f32) -> Self {
        Node::Float(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Array(value)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Node::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::String(s) => serializer.serialize_str(s),
            Node::Integer(i) => serializer.serialize_i64(*i),
            Node::Float(f) => serializer.serialize_f32(*f),
        }
    }
}
