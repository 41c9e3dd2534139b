//! Scripted judge for tests.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use super::error::JudgeError;
use super::judge::{Assessment, SemanticJudge};

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// A successful assessment.
    Score(f32, Vec<String>),
    /// A transient transport failure.
    Transient,
    /// A definitive malformed-response failure.
    Definitive,
    /// Sleeps for the duration, then succeeds with the score. Combine with
    /// a short orchestrator timeout to script deadline expiry.
    Slow(Duration, f32),
}

/// A judge that replies from a script.
///
/// Outcomes are keyed by a substring of the candidate summary (typically the
/// company name) and consumed front-to-back, so "fail once, then succeed"
/// sequences are expressible. Unmatched candidates get the default outcome.
pub struct MockJudge {
    default: MockOutcome,
    scripted: Mutex<HashMap<String, VecDeque<MockOutcome>>>,
    calls: AtomicUsize,
}

impl MockJudge {
    /// A judge that scores every candidate `score` with no justification.
    pub fn uniform(score: f32) -> Self {
        Self::with_default(MockOutcome::Score(score, vec![]))
    }

    /// A judge that always fails transport: "judge unreachable".
    pub fn unreachable() -> Self {
        Self::with_default(MockOutcome::Transient)
    }

    pub fn with_default(default: MockOutcome) -> Self {
        Self {
            default,
            scripted: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queues `outcome` for candidates whose summary contains `key`.
    pub fn script(self, key: impl Into<String>, outcome: MockOutcome) -> Self {
        self.scripted
            .lock()
            .entry(key.into())
            .or_default()
            .push_back(outcome);
        self
    }

    /// Total assess calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_outcome(&self, candidate_summary: &str) -> MockOutcome {
        let mut scripted = self.scripted.lock();

        let key = scripted
            .keys()
            .find(|key| candidate_summary.contains(key.as_str()))
            .cloned();

        if let Some(key) = key
            && let Some(queue) = scripted.get_mut(&key)
            && let Some(outcome) = queue.pop_front()
        {
            return outcome;
        }

        self.default.clone()
    }
}

impl SemanticJudge for MockJudge {
    fn name(&self) -> &str {
        "mock-judge"
    }

    async fn assess(
        &self,
        _query_summary: &str,
        candidate_summary: &str,
    ) -> Result<Assessment, JudgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.next_outcome(candidate_summary) {
            MockOutcome::Score(score, justification) => Ok(Assessment {
                score,
                justification,
            }),
            MockOutcome::Transient => Err(JudgeError::Transport {
                message: "scripted transport failure".to_string(),
            }),
            MockOutcome::Definitive => Err(JudgeError::Malformed {
                message: "scripted malformed response".to_string(),
            }),
            MockOutcome::Slow(delay, score) => {
                tokio::time::sleep(delay).await;
                Ok(Assessment {
                    score,
                    justification: vec![],
                })
            }
        }
    }
}
