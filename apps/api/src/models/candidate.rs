use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A candidate record as returned by the upstream talent source.
///
/// Upstream payloads are loosely shaped: fields may be missing, `null`, of the
/// wrong type, or spelled differently depending on which webhook produced them.
/// Each field is read on its own from the raw JSON object and anything
/// unusable falls back to its default, so one bad field never costs the
/// whole record. Only a record that is not a JSON object is rejected.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Candidate {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Vec<Skill>,
    pub experiences: Vec<Experience>,
    pub profile_url: Option<String>,
    pub photo_url: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skill {
    pub name: String,
    pub mastery: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    #[default]
    Unset,
    Shortlisted,
    Rejected,
}

/// A candidate plus the derived fit score and the reviewer's decision tag.
/// Never persisted; rebuilt every time the list is fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub score: u8,
    pub decision: Decision,
}

impl TryFrom<Value> for Candidate {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(record) => Ok(Candidate::from_record(&record)),
            other => Err(format!(
                "candidate record must be a JSON object, got {}",
                json_kind(&other)
            )),
        }
    }
}

impl Candidate {
    /// Field names are listed in priority order; the first usable value wins
    /// when a payload carries a field under several aliases.
    fn from_record(record: &Map<String, Value>) -> Self {
        Candidate {
            id: first_text(record, &["id", "_id"]),
            name: first_text(record, &["name"]).unwrap_or_default(),
            email: first_text(record, &["email"]).unwrap_or_default(),
            phone: first_text(record, &["phone"]),
            skills: first_array(record, &["skills"])
                .map(|items| items.iter().filter_map(parse_skill).collect())
                .unwrap_or_default(),
            experiences: first_array(record, &["experiences", "experience"])
                .map(|items| items.iter().filter_map(parse_experience).collect())
                .unwrap_or_default(),
            profile_url: first_text(record, &["profile_url", "linkedin_url", "linkedin"]),
            photo_url: first_text(record, &["photo_url", "photo"]),
            summary: first_text(record, &["summary", "description"]),
            status: first_text(record, &["status"]),
            address: first_text(record, &["address", "location"]),
        }
    }

    /// Loose identity used to attach decisions: the id when present,
    /// otherwise the normalized email.
    pub fn key(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => self.email.trim().to_lowercase(),
        }
    }

    pub fn current_title(&self) -> Option<&str> {
        self.experiences
            .first()
            .map(|e| e.title.as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn current_company(&self) -> Option<&str> {
        self.experiences
            .first()
            .map(|e| e.company.as_str())
            .filter(|c| !c.is_empty())
    }

    /// Number of skills with a usable name.
    pub fn skill_count(&self) -> usize {
        self.skills.iter().filter(|s| !s.name.is_empty()).count()
    }
}

/// Skills arrive either as bare strings or as `{ name, mastery }` objects.
/// Anything else (numbers, nested arrays) is dropped.
fn parse_skill(value: &Value) -> Option<Skill> {
    match value {
        Value::String(name) => Some(Skill {
            name: name.trim().to_string(),
            mastery: None,
        }),
        Value::Object(record) => Some(Skill {
            name: first_text(record, &["name"]).unwrap_or_default(),
            mastery: first_text(record, &["mastery", "level"]),
        }),
        _ => None,
    }
}

fn parse_experience(value: &Value) -> Option<Experience> {
    match value {
        Value::Object(record) => Some(Experience {
            title: first_text(record, &["title", "role"]).unwrap_or_default(),
            company: first_text(record, &["company"]).unwrap_or_default(),
        }),
        _ => None,
    }
}

/// First non-blank scalar under any of `keys`. Numbers and booleans are
/// stringified (phones and ids often arrive as numbers).
fn first_text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn first_array<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter().find_map(|key| record.get(*key)?.as_array())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
