use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::dataset::{MentionRecord, MentionSet};

#[derive(Clone, Debug, Deserialize)]
struct RawTopicEntry {
    topic: String,
    #[serde(default)]
    positive: u64,
    #[serde(default)]
    neutral: u64,
    #[serde(default)]
    negative: u64,
}

impl RawTopicEntry {
    fn into_record(self) -> MentionRecord {
        MentionRecord {
            topic: self.topic,
            positive: self.positive,
            neutral: self.neutral,
            negative: self.negative,
        }
    }
}

/// Accepts either a bare array of topic entries or an object wrapping a
/// `topics` array with an optional `name`.
pub(super) fn parse_mention_set(raw: &str, fallback_name: &str) -> Result<MentionSet> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in mention dataset")?;

    let (name, entries) = match parsed {
        Value::Array(entries) => (fallback_name.to_owned(), entries),
        Value::Object(mut object) => {
            let name = object
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(fallback_name)
                .to_owned();
            let topics = object
                .remove("topics")
                .ok_or_else(|| anyhow!("mention dataset object has no topics array"))?;
            let Value::Array(entries) = topics else {
                return Err(anyhow!("topics must be an array"));
            };
            (name, entries)
        }
        _ => return Err(anyhow!("unexpected JSON type in mention dataset")),
    };

    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = RawTopicEntry::deserialize(entry).context("invalid topic entry")?;
        records.push(entry.into_record());
    }

    if records.is_empty() {
        return Err(anyhow!("mention dataset has no topics"));
    }

    Ok(MentionSet { name, records })
}
