//! This module turns a structured checkup query into an ordered list of suggestions,
//! by calling a remote text-generation endpoint and parsing its unstructured answer

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::traits::SuggestionSource;

pub mod parser;

/// The single sentinel entry shown in place of real suggestions when a generation fails.
///
/// Failures are absorbed into this sentinel on purpose: the results panel only ever displays
/// a suggestion list, it does not need a separate error channel
pub const GENERATION_ERROR_SENTINEL: &str = "Error generating checkup list.";

/// The two genders the advisory prompt recognizes. "Unset" is modeled as `Option::None` in [`CheckupQuery`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// A transient advisory query, straight from the form inputs. Never persisted
#[derive(Clone, Debug, Default)]
pub struct CheckupQuery {
    /// Expected to parse as a positive integer, but only its presence is validated
    pub age: String,
    pub gender: Option<Gender>,
    /// Free text, possibly empty
    pub condition: String,
}

/// Where the latest generation request currently stands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No request was ever issued
    Idle,
    /// A request is in flight
    Pending,
    /// The last completed request produced a (possibly empty) suggestion list
    Success,
    /// The last completed request failed; the suggestion list holds the sentinel entry
    Failed,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

/// What the results panel displays: the current phase and the suggestion list
#[derive(Clone, Debug, Default)]
pub struct AdvisorState {
    pub phase: Phase,
    pub suggestions: Vec<String>,
}

impl AdvisorState {
    /// Whether the UI should display a spinner instead of the list
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Pending
    }
}

/// See [`state_channel`]
pub type StateSender = tokio::sync::watch::Sender<AdvisorState>;
/// See [`state_channel`]
pub type StateReceiver = tokio::sync::watch::Receiver<AdvisorState>;

/// Create a feedback channel, that a UI layer can watch to re-render the results panel on every state change
pub fn state_channel() -> (StateSender, StateReceiver) {
    tokio::sync::watch::channel(AdvisorState::default())
}

/// The checkup advisor.
///
/// Cloning is cheap and clones share the same state, so a coordinator can hand a clone to a background task
/// and keep serving note edits while a generation is in flight.
///
/// Requests supersede each other rather than merge: each one gets a monotonically increasing sequence number,
/// and a request that finds a newer number at completion time discards its own result. The in-flight call itself
/// is not cancelled, its result just never becomes visible ("last issued wins")
#[derive(Clone)]
pub struct CheckupAdvisor {
    source: Arc<dyn SuggestionSource + Send + Sync>,
    state: Arc<Mutex<AdvisorState>>,
    last_issued: Arc<AtomicU64>,
    feedback: Option<Arc<StateSender>>,
}

impl CheckupAdvisor {
    pub fn new(source: Arc<dyn SuggestionSource + Send + Sync>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(AdvisorState::default())),
            last_issued: Arc::new(AtomicU64::new(0)),
            feedback: None,
        }
    }

    /// Same as [`Self::new`], but every state change will also be published on `feedback`
    pub fn new_with_feedback_channel(source: Arc<dyn SuggestionSource + Send + Sync>, feedback: StateSender) -> Self {
        Self {
            feedback: Some(Arc::new(feedback)),
            ..Self::new(source)
        }
    }

    /// Returns a snapshot of the current phase and suggestion list
    pub fn current_state(&self) -> AdvisorState {
        self.state.lock().unwrap().clone()
    }

    /// Ask the provider for a checkup list matching `query`.
    ///
    /// When the age is blank or the gender is unset this is a no-op: no state transition, no remote call,
    /// and `false` is returned. This is a precondition check on half-filled forms, not an error.
    ///
    /// On valid input the advisor transitions to [`Phase::Pending`], issues the remote call, and on completion
    /// replaces the suggestion list wholesale: with the parsed points on success (possibly none, in case the provider
    /// returned no usable text), or with [`GENERATION_ERROR_SENTINEL`] on failure. The remote error itself is
    /// logged and absorbed, never returned.
    ///
    /// Returns `true` in case a request was actually issued, even when its result ended up superseded.
    pub async fn generate(&self, query: &CheckupQuery) -> bool {
        let age = query.age.trim();
        let gender = match query.gender {
            None => return false,
            Some(gender) => gender,
        };
        if age.is_empty() {
            return false;
        }

        let seq = self.last_issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().unwrap().phase = Phase::Pending;
        self.notify();

        let prompt = build_prompt(age, gender, &query.condition);
        log::debug!("Issuing generation request #{}", seq);
        let outcome = self.source.generate_text(&prompt).await;

        {
            let mut state = self.state.lock().unwrap();
            if seq != self.last_issued.load(Ordering::SeqCst) {
                // A newer request was issued while this one was in flight: its result must never
                // overwrite the newer one, whether the newer one has completed yet or not
                log::debug!("Discarding the stale result of generation request #{}", seq);
                return true;
            }

            match outcome {
                Ok(text) => {
                    state.suggestions = parser::split_into_points(text.as_deref().unwrap_or(""));
                    state.phase = Phase::Success;
                    log::info!("Generation request #{} produced {} points", seq, state.suggestions.len());
                },
                Err(err) => {
                    log::warn!("Generation request #{} failed: {}", seq, err);
                    state.suggestions = vec![GENERATION_ERROR_SENTINEL.to_string()];
                    state.phase = Phase::Failed;
                },
            }
        }

        self.notify();
        true
    }

    fn notify(&self) {
        if let Some(sender) = &self.feedback {
            let _ = sender.send(self.current_state());
        }
    }
}

/// Build the natural-language prompt the provider will answer
fn build_prompt(age: &str, gender: Gender, condition: &str) -> String {
    format!(
        "Suggest a list of medical checkups for a {}-year-old {} with the following condition(s): {}. \
         Return the list as bullet points.",
        age, gender, condition
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::error::Error;

    /// A source that answers every call with the same canned outcome
    struct CannedSource {
        answer: Result<Option<String>, String>,
    }

    #[async_trait]
    impl SuggestionSource for CannedSource {
        async fn generate_text(&self, _prompt: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(err) => Err(err.clone().into()),
            }
        }
    }

    /// A source that makes the test fail as soon as it is called
    struct UnreachableSource {}

    #[async_trait]
    impl SuggestionSource for UnreachableSource {
        async fn generate_text(&self, _prompt: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
            panic!("The remote endpoint must not be called for this query");
        }
    }

    #[tokio::test]
    async fn incomplete_query_is_a_no_op() {
        let advisor = CheckupAdvisor::new(Arc::new(UnreachableSource{}));

        let no_age = CheckupQuery{ age: "  ".to_string(), gender: Some(Gender::Male), condition: String::new() };
        assert_eq!(advisor.generate(&no_age).await, false);

        let no_gender = CheckupQuery{ age: "52".to_string(), gender: None, condition: "asthma".to_string() };
        assert_eq!(advisor.generate(&no_gender).await, false);

        let state = advisor.current_state();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.suggestions.is_empty());
    }

    #[tokio::test]
    async fn successful_generation_replaces_the_list() {
        let source = CannedSource{ answer: Ok(Some("- Mammogram\n- Pap smear\n".to_string())) };
        let advisor = CheckupAdvisor::new(Arc::new(source));
        let query = CheckupQuery{ age: "45".to_string(), gender: Some(Gender::Female), condition: String::new() };

        assert_eq!(advisor.generate(&query).await, true);

        let state = advisor.current_state();
        assert_eq!(state.phase, Phase::Success);
        assert_eq!(state.suggestions, vec!["Mammogram", "Pap smear"]);
        assert_eq!(state.is_loading(), false);
    }

    #[tokio::test]
    async fn missing_text_field_is_an_empty_success() {
        let source = CannedSource{ answer: Ok(None) };
        let advisor = CheckupAdvisor::new(Arc::new(source));
        let query = CheckupQuery{ age: "30".to_string(), gender: Some(Gender::Male), condition: String::new() };

        advisor.generate(&query).await;

        let state = advisor.current_state();
        assert_eq!(state.phase, Phase::Success);
        assert!(state.suggestions.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_yields_the_sentinel() {
        let source = CannedSource{ answer: Err("Unexpected HTTP status code 503".to_string()) };
        let advisor = CheckupAdvisor::new(Arc::new(source));
        let query = CheckupQuery{ age: "60".to_string(), gender: Some(Gender::Male), condition: "hypertension".to_string() };

        assert_eq!(advisor.generate(&query).await, true);

        let state = advisor.current_state();
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(state.suggestions, vec![GENERATION_ERROR_SENTINEL]);
    }

    #[test]
    fn prompt_contains_every_field() {
        let prompt = build_prompt("52", Gender::Female, "hypothyroidism");
        assert!(prompt.contains("52-year-old"));
        assert!(prompt.contains("female"));
        assert!(prompt.contains("hypothyroidism"));
        assert!(prompt.contains("bullet points"));
    }
}
