use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::SkillLevels;

/// Everything the adaptive-learning page shows about the learner's progress.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub current: SkillLevels,
    #[serde(default)]
    pub targets: SkillLevels,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub recommendation: Option<String>,
}

/// One dated snapshot: `{"date": "2024-05-01", "listening": 6.5, ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    #[serde(flatten)]
    pub scores: IndexMap<String, serde_json::Value>,
}

impl HistoryEntry {
    pub fn score(&self, series: &str) -> Option<f64> {
        self.scores.get(series).and_then(serde_json::Value::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Skill;

    #[test]
    fn test_progress_without_results() {
        let progress: Progress = serde_json::from_str(
            r#"{
                "current": {"listening": 0, "reading": 0, "writing": 0, "speaking": 0},
                "history": [],
                "targets": {"listening": 7.0, "reading": 7.0, "writing": 7.0, "speaking": 7.0},
                "recommendation": "We recommend taking the diagnostic test."
            }"#,
        )
        .unwrap();
        assert_eq!(progress.current.get(Skill::Reading), Some(0.0));
        assert_eq!(progress.targets.get(Skill::Speaking), Some(7.0));
        assert!(progress.history.is_empty());
        assert!(progress.recommendation.is_some());
    }

    #[test]
    fn test_history_entry_flattens_scores() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"date": "2024-05-01", "listening": 6.5, "reading": 7, "speaking": null}"#,
        )
        .unwrap();
        assert_eq!(entry.date, "2024-05-01");
        assert_eq!(entry.score("listening"), Some(6.5));
        assert_eq!(entry.score("speaking"), None);
        let series: Vec<_> = entry.scores.keys().cloned().collect();
        assert_eq!(series, vec!["listening", "reading", "speaking"]);
    }
}
