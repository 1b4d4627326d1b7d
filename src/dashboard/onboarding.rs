//! AI-assisted onboarding: collect the business profile, save it, then ask
//! the completion provider for outcome metrics.
//!
//! The flow moves Details → Description → Processing → Results. Any failure
//! while processing, including the client-side timeout, drops back to
//! Description so the user can retry with a shorter text.

use std::fmt;
use std::time::Duration;

use crate::config::AppConfig;
use crate::dashboard::notice::{Notice, Notices};
use crate::error::DashError;
use crate::model::BusinessInfo;
use crate::ports::{ChunkSender, CompletionRequest, DashboardStore, IdGenerator, LlmClient};

/// Growth stages offered by the details step. `custom` means free text.
pub const GROWTH_STAGES: [&str; 7] =
    ["Pre-seed", "Seed", "Early", "Growth", "Expansion", "Mature", "custom"];

/// Longest accepted business description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 3000;

const MAX_TOKENS: u32 = 4096;

const MISSING_FIELDS: &str = "Please fill in all required fields";
const MISSING_DESCRIPTION: &str = "Please provide a description of your business";

/// Asks for outcome metrics in a fixed table shape.
pub const OUTCOME_PROMPT: &str = "Please suggest the 5 most important outcome metrics for the next \
3 months that I can use to track my progress towards accomplishing my mission and distribute 100 \
points among these outcome metrics as per their importance towards my mission. Output your result \
in the form of a table with the following columns: Outcome name, target value, deadline (date) and \
points allocated to that outcome.";

/// System prompt casting the model as a consultant for this business.
#[must_use]
pub fn consultant_prompt(name: &str, industry: &str, description: &str) -> String {
    format!(
        "You are an elite business strategy consultant specializing in guiding startups and small \
         businesses. You are consulting a new business owner whose business is named: \"{name}\", \
         which is in the industry of {industry} and is described as follows: \"{description}\". \
         Provide them with initial strategic recommendations and next steps to establish or grow \
         their business. Be specific, actionable, and empathetic in your response."
    )
}

/// Where the flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Name, industry, growth stage and optional numbers.
    Details,
    /// Free-text description of the business.
    Description,
    /// Waiting on the completion provider.
    Processing,
    /// The completion arrived.
    Results,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Details => "details",
            Self::Description => "description",
            Self::Processing => "processing",
            Self::Results => "results",
        })
    }
}

/// Answers from the details step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessDetails {
    /// Business name.
    pub name: String,
    /// Industry.
    pub industry: String,
    /// One of [`GROWTH_STAGES`] or free text.
    pub growth_stage: String,
    /// Months operating; missing means 0.
    pub months_in_business: Option<u32>,
    /// Annual revenue; missing means 0.
    pub annual_revenue: Option<f64>,
}

impl BusinessDetails {
    fn validate(&self) -> Result<(), DashError> {
        let stage = self.growth_stage.trim();
        if self.name.trim().is_empty()
            || self.industry.trim().is_empty()
            || stage.is_empty()
            || stage.eq_ignore_ascii_case("custom")
        {
            return Err(DashError::validation("Missing Information", MISSING_FIELDS));
        }
        Ok(())
    }

    fn business_info(&self, description: &str) -> BusinessInfo {
        BusinessInfo {
            mission_statement: description.to_string(),
            name: self.name.trim().to_string(),
            industry: self.industry.trim().to_string(),
            months_in_business: self.months_in_business.unwrap_or(0),
            annual_revenue: self.annual_revenue.unwrap_or(0.0),
            growth_stage: self.growth_stage.trim().to_string(),
        }
    }
}

/// State of one onboarding run.
#[derive(Debug, Clone)]
pub struct Onboarding {
    step: Step,
    details: BusinessDetails,
    model: String,
    timeout: Duration,
    session_id: Option<String>,
    result: Option<String>,
    notices: Notices,
}

impl Onboarding {
    /// Starts a run using `model`, waiting at most `timeout` for the completion.
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            step: Step::Details,
            details: BusinessDetails::default(),
            model: model.into(),
            timeout,
            session_id: None,
            result: None,
            notices: Notices::default(),
        }
    }

    /// Starts a run with the configured model and timeout.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.llm_model.clone(), config.onboarding_timeout)
    }

    /// Current step.
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Id of the last submission, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// The completion text once the flow reached [`Step::Results`].
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Takes queued notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Moves one step back: Description → Details, Results → Description.
    pub fn back(&mut self) {
        self.step = match self.step {
            Step::Details | Step::Description => Step::Details,
            Step::Processing | Step::Results => Step::Description,
        };
    }

    /// Accepts the details step.
    ///
    /// # Errors
    ///
    /// Returns `Missing Information` when name, industry or growth stage is
    /// blank; the flow stays on Details.
    pub fn submit_details(&mut self, details: BusinessDetails) -> Result<(), DashError> {
        if let Err(e) = details.validate() {
            self.notices.push(Notice::titled_error("Missing Information", MISSING_FIELDS));
            return Err(e);
        }
        self.details = details;
        self.step = Step::Description;
        Ok(())
    }

    /// Submits the description: saves the business profile, then requests
    /// the outcome metrics, relaying chunks to `chunks` as they arrive.
    ///
    /// # Errors
    ///
    /// Validation failures never touch the store and leave the step alone.
    /// Save failures, provider failures and the timeout return the flow to
    /// Description.
    pub async fn submit_description(
        &mut self,
        store: &dyn DashboardStore,
        llm: &dyn LlmClient,
        ids: &dyn IdGenerator,
        description: &str,
        chunks: Option<ChunkSender>,
    ) -> Result<&str, DashError> {
        if self.step != Step::Description {
            return Err(DashError::validation(
                "Missing Information",
                format!("Business details come first (currently at the {} step)", self.step),
            ));
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(self.reject("Missing Information", MISSING_DESCRIPTION));
        }
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            let message = format!(
                "Please keep your business description under {MAX_DESCRIPTION_CHARS} characters \
                 to avoid timeouts."
            );
            return Err(self.reject("Description Too Long", message));
        }

        self.step = Step::Processing;
        self.result = None;
        let session_id = ids.generate_id();
        tracing::info!(
            session_id = %session_id,
            chars = description.chars().count(),
            "submitting onboarding"
        );
        self.session_id = Some(session_id);

        if let Err(e) = store.save_business_info(&self.details.business_info(description)).await {
            tracing::error!(error = %e, "failed to save business info");
            self.step = Step::Description;
            self.notices.push(Notice::titled_error(
                "Submission Error",
                "There was a problem submitting your data. Please try again.",
            ));
            return Err(DashError::upstream("Failed to update business information", e));
        }

        let details = &self.details;
        let system = consultant_prompt(details.name.trim(), details.industry.trim(), description);
        let request = CompletionRequest {
            model: self.model.clone(),
            system: Some(system),
            prompt: OUTCOME_PROMPT.to_string(),
            max_tokens: MAX_TOKENS,
        };
        match tokio::time::timeout(self.timeout, llm.complete(&request, chunks)).await {
            Ok(Ok(response)) => {
                tracing::debug!(
                    prompt_tokens = response.prompt_tokens,
                    completion_tokens = response.completion_tokens,
                    "onboarding completion finished"
                );
                self.step = Step::Results;
                Ok(self.result.insert(response.text).as_str())
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "onboarding completion failed");
                self.step = Step::Description;
                self.notices.push(Notice::error(
                    "An error occurred while processing your business information. \
                     Please try again.",
                ));
                Err(DashError::upstream("Completion failed", e))
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "onboarding completion timed out"
                );
                self.step = Step::Description;
                self.notices.push(Notice::titled_error(
                    "Request Timeout",
                    "The analysis is taking longer than expected. \
                     Please try again with a more concise description.",
                ));
                Err(DashError::Timeout { secs: self.timeout.as_secs() })
            }
        }
    }

    fn reject(&mut self, title: &str, message: impl Into<String>) -> DashError {
        let message = message.into();
        self.notices.push(Notice::titled_error(title, message.clone()));
        DashError::validation(title, message)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::error::PortError;
    use crate::ports::{CompletionResponse, LlmFuture};

    struct ScriptedLlm {
        reply: Result<String, String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedLlm {
        fn replying(text: &str) -> Self {
            Self { reply: Ok(text.to_string()), requests: Mutex::new(Vec::new()) }
        }

        fn failing(message: &str) -> Self {
            Self { reply: Err(message.to_string()), requests: Mutex::new(Vec::new()) }
        }
    }

    impl LlmClient for ScriptedLlm {
        fn complete(
            &self,
            request: &CompletionRequest,
            chunks: Option<ChunkSender>,
        ) -> LlmFuture<'_> {
            self.requests.lock().unwrap().push(request.clone());
            let reply = self.reply.clone();
            Box::pin(async move {
                let text = reply.map_err(PortError::from)?;
                if let Some(tx) = chunks {
                    for word in text.split_inclusive(' ') {
                        let _ = tx.send(word.to_string());
                    }
                }
                Ok::<_, PortError>(CompletionResponse {
                    text,
                    prompt_tokens: 10,
                    completion_tokens: 20,
                })
            })
        }
    }

    struct StalledLlm;

    impl LlmClient for StalledLlm {
        fn complete(
            &self,
            _request: &CompletionRequest,
            _chunks: Option<ChunkSender>,
        ) -> LlmFuture<'_> {
            Box::pin(std::future::pending::<Result<CompletionResponse, PortError>>())
        }
    }

    struct FixedIds;

    impl IdGenerator for FixedIds {
        fn generate_id(&self) -> String {
            "session-1".into()
        }
    }

    fn details() -> BusinessDetails {
        BusinessDetails {
            name: "Bean There".into(),
            industry: "Coffee".into(),
            growth_stage: "Seed".into(),
            months_in_business: None,
            annual_revenue: Some(12_000.0),
        }
    }

    fn at_description() -> Onboarding {
        let mut flow = Onboarding::new("test-model", Duration::from_secs(5));
        flow.submit_details(details()).unwrap();
        flow
    }

    #[test]
    fn details_require_name_industry_and_stage() {
        let mut flow = Onboarding::new("m", Duration::from_secs(1));
        let missing = BusinessDetails { growth_stage: "custom".into(), ..details() };

        let err = flow.submit_details(missing).unwrap_err();

        assert_eq!(err.status_code(), 400);
        assert_eq!(flow.step(), Step::Details);
        assert_eq!(flow.drain_notices()[0].title, "Missing Information");
    }

    #[tokio::test]
    async fn successful_run_saves_profile_and_streams() {
        let store = MemoryStore::new();
        let llm = ScriptedLlm::replying("| Outcome | Target |");
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut flow = at_description();

        let text = flow
            .submit_description(&store, &llm, &FixedIds, "  We roast coffee.  ", Some(tx))
            .await
            .unwrap()
            .to_string();

        assert_eq!(text, "| Outcome | Target |");
        assert_eq!(flow.step(), Step::Results);
        assert_eq!(flow.session_id(), Some("session-1"));

        let info = store.business_info().unwrap();
        assert_eq!(info.mission_statement, "We roast coffee.");
        assert_eq!(info.months_in_business, 0);
        assert_eq!(info.annual_revenue, 12_000.0);

        let request = llm.requests.lock().unwrap()[0].clone();
        assert_eq!(request.prompt, OUTCOME_PROMPT);
        let system = request.system.unwrap();
        assert!(system.contains("\"Bean There\""));
        assert!(system.contains("industry of Coffee"));

        let mut streamed = String::new();
        while let Ok(chunk) = rx.try_recv() {
            streamed.push_str(&chunk);
        }
        assert_eq!(streamed, text);
    }

    #[tokio::test]
    async fn invalid_descriptions_never_reach_the_store() {
        let store = MemoryStore::new();
        let llm = ScriptedLlm::replying("unused");
        let mut flow = at_description();

        let blank = flow.submit_description(&store, &llm, &FixedIds, "   ", None).await;
        assert!(blank.is_err());
        let long = "x".repeat(MAX_DESCRIPTION_CHARS + 1);
        let too_long = flow.submit_description(&store, &llm, &FixedIds, &long, None).await;
        assert!(matches!(
            too_long,
            Err(DashError::Validation { ref title, .. }) if title == "Description Too Long"
        ));

        assert!(store.calls().is_empty());
        assert!(llm.requests.lock().unwrap().is_empty());
        assert_eq!(flow.step(), Step::Description);
    }

    #[tokio::test]
    async fn description_before_details_is_rejected() {
        let store = MemoryStore::new();
        let llm = ScriptedLlm::replying("unused");
        let mut flow = Onboarding::new("m", Duration::from_secs(1));

        assert!(flow.submit_description(&store, &llm, &FixedIds, "text", None).await.is_err());
        assert!(store.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_returns_to_description() {
        let store = MemoryStore::new();
        let mut flow = Onboarding::new("m", Duration::from_secs(35));
        flow.submit_details(details()).unwrap();

        let err = flow
            .submit_description(&store, &StalledLlm, &FixedIds, "We roast coffee.", None)
            .await
            .unwrap_err();

        assert!(matches!(err, DashError::Timeout { secs: 35 }));
        assert_eq!(flow.step(), Step::Description);
        assert!(flow.result().is_none());
        assert_eq!(flow.drain_notices()[0].title, "Request Timeout");
    }

    #[tokio::test]
    async fn provider_error_returns_to_description() {
        let store = MemoryStore::new();
        let llm = ScriptedLlm::failing("rate limited");
        let mut flow = at_description();

        let err = flow
            .submit_description(&store, &llm, &FixedIds, "We roast coffee.", None)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert_eq!(flow.step(), Step::Description);
    }

    #[tokio::test]
    async fn failed_save_skips_completion() {
        let store = MemoryStore::new();
        store.fail_on("save_business_info");
        let llm = ScriptedLlm::replying("unused");
        let mut flow = at_description();

        let submitted = flow.submit_description(&store, &llm, &FixedIds, "We roast coffee.", None);
        assert!(submitted.await.is_err());
        assert!(llm.requests.lock().unwrap().is_empty());
        assert_eq!(flow.drain_notices()[0].title, "Submission Error");
    }

    #[test]
    fn back_steps_toward_details() {
        let mut flow = at_description();
        flow.back();
        assert_eq!(flow.step(), Step::Details);
    }
}
