use std::cell::RefCell;

use ielts_utils::practice::{CheckResult, PracticeKind, PracticeTest};

use crate::answers::collect_practice;
use crate::api::{ApiClient, ApiError, Transport};
use crate::dom::Dom;
use crate::render;

pub(crate) const PASSAGE_ID: &str = "passage";
pub(crate) const QUESTIONS_ID: &str = "questions";
pub(crate) const RESULTS_ID: &str = "results";

/// The listening and reading practice pages: one multiple-choice test, checked by the server.
pub struct PracticePage<T, D> {
    kind: PracticeKind,
    api: ApiClient<T>,
    dom: D,
    test: RefCell<Option<PracticeTest>>,
}

impl<T: Transport, D: Dom> PracticePage<T, D> {
    pub fn new(kind: PracticeKind, transport: T, dom: D) -> Self {
        Self {
            kind,
            api: ApiClient::new(transport),
            dom,
            test: RefCell::new(None),
        }
    }

    pub fn kind(&self) -> PracticeKind {
        self.kind
    }

    pub fn is_loaded(&self) -> bool {
        self.test.borrow().is_some()
    }

    pub async fn load(&self) -> Result<(), ApiError> {
        let test = self.api.get_practice_test(self.kind).await.inspect_err(|e| {
            log::error!("Error loading the {:?} practice test: {e}", self.kind);
        })?;

        if self.kind == PracticeKind::Reading
            && let Some(passage) = &test.passage
        {
            self.dom.set_html(PASSAGE_ID, &render::practice_passage(passage));
        }
        self.dom
            .set_html(QUESTIONS_ID, &render::practice_questions(&test));
        log::info!(
            "Loaded {:?} practice test with {} questions",
            self.kind,
            test.questions.len()
        );
        self.test.replace(Some(test));
        Ok(())
    }

    /// Returns `None` when there is no test on the page yet.
    pub async fn submit(&self) -> Option<Result<CheckResult, ApiError>> {
        let answers = match self.test.borrow().as_ref() {
            Some(test) => collect_practice(&self.dom, test),
            None => {
                log::warn!("Submit ignored: the practice test has not loaded");
                return None;
            }
        };

        let result = self.api.check_practice_answers(self.kind, &answers).await;
        match &result {
            Ok(check) => self.dom.set_html(RESULTS_ID, &results_html(check)),
            Err(e) => {
                log::error!("Error checking {:?} answers: {e}", self.kind);
                self.dom.set_html(
                    RESULTS_ID,
                    &render::error_paragraph(
                        "An error occurred while checking your answers. Please try again.",
                    ),
                );
            }
        }
        Some(result)
    }
}

fn results_html(check: &CheckResult) -> String {
    format!(
        "<h2>Results</h2><p>Score: {}/{}</p><p>Percentage: {:.2}%</p>",
        check.score, check.total, check.percentage
    )
}
