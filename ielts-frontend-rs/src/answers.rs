use ielts_utils::{
    chat::{MiniTest, MiniTestAnswers},
    practice::{PracticeAnswers, PracticeTest, QuestionId},
};

use crate::capture::Recording;
use crate::dom::Dom;

/// What a finished diagnostic test sends for scoring.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticSubmission {
    /// One entry per rendered question, in order. `None` for unanswered questions.
    Answers(Vec<Option<String>>),
    Audio(Recording),
}

pub(crate) fn question_field_name(index: usize) -> String {
    format!("q{index}")
}

pub(crate) fn practice_field_name(id: &QuestionId) -> String {
    format!("q{id}")
}

pub(crate) fn mini_test_field_name(index: usize) -> String {
    format!("mini{index}")
}

/// Reads the checked radio or the textarea for each of `count` positional questions.
pub(crate) fn collect_positional(dom: &impl Dom, count: usize) -> Vec<Option<String>> {
    (0..count)
        .map(|index| {
            let name = question_field_name(index);
            dom.checked_value(&name).or_else(|| dom.field_value(&name))
        })
        .collect()
}

/// Only answered questions are included; their order follows the test.
pub(crate) fn collect_practice(dom: &impl Dom, test: &PracticeTest) -> PracticeAnswers {
    let answers = test
        .questions
        .iter()
        .filter_map(|question| {
            dom.checked_value(&practice_field_name(&question.id))
                .map(|value| (question.id.to_string(), value))
        })
        .collect();
    PracticeAnswers { answers }
}

pub(crate) fn collect_mini_test(dom: &impl Dom, test: &MiniTest) -> MiniTestAnswers {
    let answers = (0..test.questions.len())
        .map(|index| dom.checked_value(&mini_test_field_name(index)))
        .collect();
    MiniTestAnswers { answers }
}
