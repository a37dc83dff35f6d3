use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Payload handed over by the data provider. Mirrors the provider's JSON
/// contract; field names are camelCase on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphData {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// A single book.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    pub id: usize,
    pub title: String,
    pub author: String,
    pub genre: String,
    /// Kept as a string; the provider stores publication years as text.
    pub year: String,
}

/// A citation between two books.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub id: usize,
    pub source_id: usize,
    pub target_id: usize,
    pub quote: String,
    pub sentiment: Sentiment,
    /// Derivable from the two endpoint authors; recomputed at build time
    /// when the provider omits it.
    #[serde(default)]
    pub is_same_author: bool,
}

/// Closed set of citation tones the provider may send.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Recommended,
    #[default]
    Neutral,
    Critiqued,
}

/// Traversal bound for [`crate::extract`]: a number of hops or `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Limited(u32),
    All,
}

impl Depth {
    /// Whether `depth` lies within this bound.
    pub fn allows(self, depth: u32) -> bool {
        match self {
            Depth::Limited(max) => depth < max,
            Depth::All => true,
        }
    }
}

impl Serialize for Depth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Depth::Limited(n) => serializer.serialize_u32(*n),
            Depth::All => serializer.serialize_str("all"),
        }
    }
}

impl<'de> Deserialize<'de> for Depth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(Depth::Limited(n)),
            Raw::Text(s) if s.eq_ignore_ascii_case("all") => Ok(Depth::All),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "expected a depth number or \"all\", got \"{s}\""
            ))),
        }
    }
}
