use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::dataset::{MentionRecord, MentionSet};
use super::parse::parse_mention_set;

pub fn load_mention_set(path: &str) -> Result<MentionSet> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading mention dataset {path}"))?;
    let fallback_name = Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_owned());
    parse_mention_set(&raw, &fallback_name)
}

const SAMPLE_TOPICS: &[(&str, u64, u64, u64)] = &[
    ("electric cars", 1840, 920, 640),
    ("heat pumps", 410, 380, 110),
    ("solar panels", 980, 410, 220),
    ("wind farms", 520, 300, 410),
    ("hydrogen", 260, 340, 180),
    ("battery storage", 640, 280, 90),
    ("nuclear", 450, 520, 560),
    ("rail travel", 380, 240, 130),
    ("e-bikes", 720, 210, 150),
    ("carbon tax", 210, 330, 480),
    ("retrofitting", 150, 200, 70),
    ("district heating", 90, 130, 40),
    ("smart meters", 170, 260, 210),
    ("car sharing", 230, 180, 120),
    ("green roofs", 310, 90, 30),
    ("induction stoves", 280, 150, 60),
    ("micro grids", 60, 110, 25),
    ("biochar", 40, 70, 20),
];

/// Built-in dataset used when no `--dataset` file is given.
pub fn sample_mention_set() -> MentionSet {
    MentionSet {
        name: "energy transition sample".to_owned(),
        records: SAMPLE_TOPICS
            .iter()
            .map(|&(topic, positive, neutral, negative)| MentionRecord {
                topic: topic.to_owned(),
                positive,
                neutral,
                negative,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_is_nonempty_with_unique_topics() {
        let set = sample_mention_set();
        assert!(set.topic_count() > 10);

        let mut topics = set
            .records
            .iter()
            .map(|record| record.topic.as_str())
            .collect::<Vec<_>>();
        topics.sort_unstable();
        topics.dedup();
        assert_eq!(topics.len(), set.records.len());
    }

    #[test]
    fn missing_file_reports_the_path() {
        let error = load_mention_set("/nonexistent/mentions.json").unwrap_err();
        assert!(format!("{error:#}").contains("/nonexistent/mentions.json"));
    }
}
