use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const DEFAULT_STATUS: &str = "enacted";

// ---------------------------------------------------------------------------
// ActionId
// ---------------------------------------------------------------------------

/// Registry identifier of an action.
///
/// Stored data carries both `"14148"` and `14148`. The JSON form is kept as
/// written; identity comparisons go through [`ActionId::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionId {
    Text(String),
    Number(u64),
}

impl ActionId {
    pub fn key(&self) -> String {
        match self {
            ActionId::Text(s) => s.trim().to_string(),
            ActionId::Number(n) => n.to_string(),
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionId::Text(s) => f.write_str(s),
            ActionId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        ActionId::Text(s.to_string())
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        ActionId::Text(s)
    }
}

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// The JSON object a record was read from, and the normalised form it had
/// right after loading. Writing a record back replays the stored key order
/// and raw values for every field that still holds its loaded value.
#[derive(Debug, Clone)]
pub(crate) struct Origin {
    raw: Map<String, Value>,
    loaded: Map<String, Value>,
}

impl Origin {
    fn capture<T: Serialize>(raw: &Value, record: &T) -> serde_json::Result<Option<Self>> {
        let Value::Object(raw) = raw else {
            return Ok(None);
        };
        Ok(Some(Self {
            raw: raw.clone(),
            loaded: to_object(record)?,
        }))
    }

    /// Lay `rendered` out in stored key order. `canonical` is the normalised
    /// form of the same record and decides which fields changed since load.
    fn restore(
        &self,
        canonical: &Map<String, Value>,
        mut rendered: Map<String, Value>,
    ) -> Map<String, Value> {
        let mut out = Map::new();
        for (key, raw) in &self.raw {
            let value = rendered.shift_remove(key);
            if canonical.get(key) == self.loaded.get(key) {
                out.insert(key.clone(), raw.clone());
            } else if let Some(value) = value {
                out.insert(key.clone(), value);
            }
        }
        for (key, value) in rendered {
            // Defaults filled in on load stay implicit until they change.
            if canonical.get(&key) == self.loaded.get(&key) {
                continue;
            }
            out.insert(key, value);
        }
        out
    }
}

fn to_object<T: Serialize>(record: &T) -> serde_json::Result<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

/// Hand-edited records carry numbers and nulls where strings are expected.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_status<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_else(default_status))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Challenge
// ---------------------------------------------------------------------------

/// A legal proceeding filed against an action. Curated by hand; only
/// `docketId` and `lastUpdated` are ever written by the tooling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub docket_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub(crate) origin: Option<Origin>,
}

impl PartialEq for Challenge {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.url == other.url
            && self.docket_id == other.docket_id
            && self.last_updated == other.last_updated
            && self.extra == other.extra
    }
}

impl Challenge {
    /// The docket id, if present and non-empty.
    pub fn docket_id(&self) -> Option<&str> {
        self.docket_id.as_deref().filter(|id| !id.is_empty())
    }

    fn to_stored(&self) -> serde_json::Result<Value> {
        let canonical = to_object(self)?;
        let out = match &self.origin {
            Some(origin) => origin.restore(&canonical, canonical.clone()),
            None => canonical,
        };
        Ok(Value::Object(out))
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    /// Publication date, `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default = "default_status", deserialize_with = "lenient_status")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub challenges: Vec<Challenge>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub(crate) origin: Option<Origin>,
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.date == other.date
            && self.url == other.url
            && self.status == other.status
            && self.challenges == other.challenges
            && self.extra == other.extra
    }
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

impl Action {
    /// A freshly published action as the registry reports it: default status,
    /// no challenges.
    pub fn new(
        id: impl Into<ActionId>,
        title: impl Into<String>,
        date: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date: date.into(),
            url: url.into(),
            status: default_status(),
            challenges: Vec::new(),
            extra: Map::new(),
            origin: None,
        }
    }

    /// Decode a record read from the dataset file, remembering its layout so
    /// [`Action::to_stored`] can write it back unchanged.
    pub fn from_stored(raw: Value) -> serde_json::Result<Self> {
        let mut action: Action = serde_json::from_value(raw.clone())?;
        if let Some(Value::Array(items)) = raw.get("challenges") {
            for (challenge, item) in action.challenges.iter_mut().zip(items) {
                challenge.origin = Origin::capture(item, challenge)?;
            }
        }
        action.origin = Origin::capture(&raw, &action)?;
        Ok(action)
    }

    /// The JSON written to the dataset file. Records that came from the file
    /// keep their key order, nulls and raw values for every untouched field.
    pub fn to_stored(&self) -> serde_json::Result<Value> {
        let canonical = to_object(self)?;
        let mut rendered = canonical.clone();
        let challenges = self
            .challenges
            .iter()
            .map(Challenge::to_stored)
            .collect::<serde_json::Result<Vec<_>>>()?;
        rendered.insert("challenges".to_string(), Value::Array(challenges));
        let out = match &self.origin {
            Some(origin) => origin.restore(&canonical, rendered),
            None => rendered,
        };
        Ok(Value::Object(out))
    }

    /// Take over the curated side of a stored record: status, challenges,
    /// extras and the stored layout. Registry-owned fields stay as they are.
    pub fn carry_curated(&mut self, stored: &Action) {
        self.status = stored.status.clone();
        self.challenges = stored.challenges.clone();
        self.extra = stored.extra.clone();
        self.origin = stored.origin.clone();
    }

    pub fn key(&self) -> String {
        self.id.key()
    }

    pub fn challenge_count(&self) -> usize {
        self.challenges.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
