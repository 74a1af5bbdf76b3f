use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopicResponse {
    pub topic: String,
}

/// IELTS writing task number; anything other than task 1 is treated as task 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
pub enum WritingTask {
    Task1,
    Task2,
}

impl From<u8> for WritingTask {
    fn from(n: u8) -> Self {
        if n == 1 {
            WritingTask::Task1
        } else {
            WritingTask::Task2
        }
    }
}

impl From<WritingTask> for u8 {
    fn from(task: WritingTask) -> Self {
        match task {
            WritingTask::Task1 => 1,
            WritingTask::Task2 => 2,
        }
    }
}

impl WritingTask {
    /// Parses the value of the task-type selector.
    pub fn from_selector(value: &str) -> Self {
        value.trim().parse::<u8>().map(Self::from).unwrap_or(WritingTask::Task2)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WritingAnalysisRequest {
    pub essay: String,
    pub task_type: WritingTask,
    pub topic: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub text: String,
    pub suggestion: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WritingAnalysis {
    /// Criterion name to score, in the order the examiner reported them.
    #[serde(default)]
    pub scores: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub improvements: Vec<Improvement>,
    #[serde(default)]
    pub recommendations: serde_json::Value,
    #[serde(default)]
    pub topic_relevance: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub aspect: String,
    pub comment: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeakingAnalysis {
    #[serde(default)]
    pub scores: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub feedback: Vec<Feedback>,
    #[serde(default)]
    pub recommendations: serde_json::Value,
    #[serde(default)]
    pub topic_relevance: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_type_from_selector() {
        assert_eq!(WritingTask::from_selector("1"), WritingTask::Task1);
        assert_eq!(WritingTask::from_selector("2"), WritingTask::Task2);
        assert_eq!(WritingTask::from_selector("essay"), WritingTask::Task2);
    }

    #[test]
    fn test_writing_request_shape() {
        let request = WritingAnalysisRequest {
            essay: "Cities are loud.".to_string(),
            task_type: WritingTask::Task1,
            topic: "City life".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"essay": "Cities are loud.", "task_type": 1, "topic": "City life"})
        );
    }

    #[test]
    fn test_scores_keep_reported_order() {
        let analysis: SpeakingAnalysis = serde_json::from_str(
            r#"{"scores": {"fluency": 6, "pronunciation": 5.5, "overall": 6}, "feedback": [], "recommendations": "Practice.", "topic_relevance": "Good"}"#,
        )
        .unwrap();
        let criteria: Vec<_> = analysis.scores.keys().cloned().collect();
        assert_eq!(criteria, vec!["fluency", "pronunciation", "overall"]);
    }
}
