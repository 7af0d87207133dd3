//! Dashboard service: Orchestrates scoring, coaching, simulation and
//! gamification over local storage.
//!
//! Every state-changing use case appends an entry to the audit chain. Audit
//! payloads carry scores and labels only, never chat text.

use std::sync::Arc;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde_json::json;

use super::coach::{HealthContext, MoodAdaptiveResponder};
use super::risk::{RiskScorer, DEFAULT_TIME_HORIZON_DAYS};
use super::simulation::DigitalTwin;
use crate::adapters::StorageError;
use crate::config::{CoachConfig, ScoringConfig};
use crate::domain::{
    audit, AuditAction, AuditEntry, ChatTurn, CoachReply, GamificationEvent, GamificationState, HealthAction,
    HealthMetrics, RiskAssessment, SimulationOutcome, SimulationParams, UserProfile, UserRole,
};
use crate::ports::{AssessmentSnapshot, Storage};
use crate::HealthAiError;

/// Assessments included in a data export.
const EXPORT_ASSESSMENT_LIMIT: usize = 1000;

/// Chat turns included in a data export.
const EXPORT_CHAT_LIMIT: usize = 100_000;

/// Actor recorded for events before a profile exists.
const ANONYMOUS_ACTOR: &str = "anonymous";

/// Result of logging a health action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub state: GamificationState,
    pub events: Vec<GamificationEvent>,
    /// False when the day had already been counted
    pub counted: bool,
}

/// Service behind every dashboard screen.
pub struct DashboardService<S>
where
    S: Storage,
{
    storage: Arc<S>,
    scorer: RiskScorer,
    responder: MoodAdaptiveResponder,
    twin: DigitalTwin,
    rng: ChaCha20Rng,
    chat_history_limit: usize,
}

impl<S> DashboardService<S>
where
    S: Storage,
    S::Error: Into<StorageError>,
{
    /// Create a service with an OS-seeded random source.
    pub fn new(storage: Arc<S>, scoring: ScoringConfig, coach: CoachConfig) -> Self {
        Self::with_rng(storage, scoring, coach, ChaCha20Rng::from_entropy())
    }

    /// Create a service with a caller-provided random source.
    pub fn with_rng(storage: Arc<S>, scoring: ScoringConfig, coach: CoachConfig, rng: ChaCha20Rng) -> Self {
        Self {
            storage,
            scorer: RiskScorer::new(scoring),
            responder: MoodAdaptiveResponder::new(coach),
            twin: DigitalTwin::new(),
            rng,
            chat_history_limit: 50,
        }
    }

    #[must_use]
    pub fn with_chat_history_limit(mut self, limit: usize) -> Self {
        self.chat_history_limit = limit;
        self
    }

    fn storage_err(e: S::Error) -> HealthAiError {
        HealthAiError::Storage(e.into())
    }

    /// Load the profile, creating the sample profile on first run.
    ///
    /// # Errors
    /// Returns error if storage fails.
    pub fn initialize_profile(&self, display_name: &str, role: UserRole) -> Result<UserProfile, HealthAiError> {
        if let Some(profile) = self.storage.load_profile().map_err(Self::storage_err)? {
            tracing::info!("Loaded existing profile");
            return Ok(profile);
        }

        tracing::info!("No profile found, creating sample {role} profile");
        let profile = UserProfile::sample(display_name, role);
        self.storage.save_profile(&profile).map_err(Self::storage_err)?;
        self.storage
            .save_gamification(&GamificationState::default())
            .map_err(Self::storage_err)?;
        self.audit(
            AuditAction::ProfileCreated,
            &profile.id,
            json!({ "role": profile.role.to_string() }),
        )?;

        Ok(profile)
    }

    /// # Errors
    /// Returns `NotFound` if no profile has been created.
    pub fn profile(&self) -> Result<UserProfile, HealthAiError> {
        self.storage
            .load_profile()
            .map_err(Self::storage_err)?
            .ok_or_else(|| HealthAiError::Storage(StorageError::NotFound("profile".to_string())))
    }

    /// Replace the profile's metrics after validating them.
    ///
    /// # Errors
    /// Returns `Validation` for malformed metrics, or a storage error.
    pub fn update_metrics(&self, metrics: HealthMetrics) -> Result<(), HealthAiError> {
        validate(&metrics)?;
        let mut profile = self.profile()?;
        profile.metrics = metrics;
        self.storage.save_profile(&profile).map_err(Self::storage_err)
    }

    /// Score the stored profile over the default horizon.
    ///
    /// # Errors
    /// See [`Self::assess_metrics`].
    pub fn assess_risk(&self) -> Result<RiskAssessment, HealthAiError> {
        let profile = self.profile()?;
        self.assess_metrics(&profile.id, &profile.metrics, DEFAULT_TIME_HORIZON_DAYS)
    }

    /// Validate, score and record `metrics`.
    ///
    /// # Errors
    /// Returns `Validation` when any value is malformed; the scorer is not run.
    pub fn assess_metrics(
        &self,
        actor: &str,
        metrics: &HealthMetrics,
        time_horizon_days: u32,
    ) -> Result<RiskAssessment, HealthAiError> {
        validate(metrics)?;

        let assessment = self.scorer.compute_risk(metrics, time_horizon_days);
        tracing::info!(
            "Risk assessed: overall {} ({}), {} alert(s)",
            assessment.overall_risk,
            assessment.risk_level(),
            assessment.alerts.len()
        );

        let snapshot = AssessmentSnapshot {
            assessed_at: chrono::Utc::now(),
            assessment: assessment.clone(),
        };
        if let Err(e) = self.storage.save_assessment(&snapshot) {
            tracing::warn!("Failed to save assessment: {:?}", e);
        }

        self.audit(
            AuditAction::RiskAssessed,
            actor,
            json!({
                "overallRisk": assessment.overall_risk,
                "level": assessment.risk_level().to_string(),
                "horizonDays": time_horizon_days,
            }),
        )?;

        Ok(assessment)
    }

    /// Most recent stored assessment, if any.
    ///
    /// # Errors
    /// Returns error if storage fails.
    pub fn latest_assessment(&self) -> Result<Option<AssessmentSnapshot>, HealthAiError> {
        Ok(self
            .storage
            .load_recent_assessments(1)
            .map_err(Self::storage_err)?
            .into_iter()
            .next())
    }

    /// Answer a chat message and record the exchange.
    ///
    /// # Errors
    /// Returns error if storage fails.
    pub fn send_chat_message(&mut self, message: &str) -> Result<CoachReply, HealthAiError> {
        let profile = self.storage.load_profile().map_err(Self::storage_err)?;
        let latest = self.latest_assessment()?;

        let context = HealthContext {
            metrics: profile.as_ref().map(|p| &p.metrics),
            latest_assessment: latest.as_ref().map(|s| &s.assessment),
        };
        let reply = self.responder.respond(message, &context, &mut self.rng);

        self.storage
            .append_chat_turn(&ChatTurn::new(message, &reply))
            .map_err(Self::storage_err)?;

        let actor = profile.as_ref().map_or(ANONYMOUS_ACTOR, |p| p.id.as_str());
        self.audit(
            AuditAction::ChatMessage,
            actor,
            json!({ "mood": reply.mood.as_str(), "category": reply.category }),
        )?;

        Ok(reply)
    }

    /// Recent conversation, oldest first.
    ///
    /// # Errors
    /// Returns error if storage fails.
    pub fn chat_history(&self) -> Result<Vec<ChatTurn>, HealthAiError> {
        self.storage
            .load_recent_chat_turns(self.chat_history_limit)
            .map_err(Self::storage_err)
    }

    /// Run a digital-twin projection and record it.
    ///
    /// # Errors
    /// Returns error if the audit entry cannot be stored.
    pub fn run_simulation(&self, params: SimulationParams) -> Result<SimulationOutcome, HealthAiError> {
        let outcome = self.twin.run_simulation(params);
        tracing::info!(
            "Simulation {} run: impact {:.1}, confidence {}%",
            outcome.kind,
            outcome.impact_score(),
            outcome.confidence
        );

        self.audit(
            AuditAction::SimulationRun,
            &self.actor()?,
            json!({ "kind": outcome.kind, "params": outcome.params }),
        )?;

        Ok(outcome)
    }

    /// Current gamification state (default if none stored).
    ///
    /// # Errors
    /// Returns error if storage fails.
    pub fn gamification(&self) -> Result<GamificationState, HealthAiError> {
        Ok(self
            .storage
            .load_gamification()
            .map_err(Self::storage_err)?
            .unwrap_or_default())
    }

    /// Record a health action taken on `today`.
    ///
    /// # Errors
    /// Returns error if storage fails.
    pub fn log_action(&self, action: HealthAction, today: NaiveDate) -> Result<ActionOutcome, HealthAiError> {
        let mut state = self.gamification()?;
        let before = state.last_action_date;
        let events = state.record_action(action, today);
        let counted = before != state.last_action_date;

        if !counted {
            tracing::debug!("Action {} ignored, day already counted", action.as_str());
            return Ok(ActionOutcome {
                state,
                events,
                counted,
            });
        }

        self.storage.save_gamification(&state).map_err(Self::storage_err)?;
        tracing::info!(
            "Logged {}: streak {}, points {}, level {}",
            action.as_str(),
            state.streak,
            state.points,
            state.level
        );

        self.audit(
            AuditAction::ActionLogged,
            &self.actor()?,
            json!({ "action": action.as_str(), "points": state.points, "streak": state.streak }),
        )?;

        Ok(ActionOutcome {
            state,
            events,
            counted,
        })
    }

    /// Export everything stored about the user as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns error if storage or serialization fails.
    pub fn export_user_data(&self) -> Result<String, HealthAiError> {
        let profile = self.storage.load_profile().map_err(Self::storage_err)?;
        let assessments = self
            .storage
            .load_recent_assessments(EXPORT_ASSESSMENT_LIMIT)
            .map_err(Self::storage_err)?;
        let chat_history = self
            .storage
            .load_recent_chat_turns(EXPORT_CHAT_LIMIT)
            .map_err(Self::storage_err)?;

        self.audit(AuditAction::DataExported, &self.actor()?, json!({}))?;
        let audit_log = self.audit_log()?;

        let export = json!({
            "exportedAt": chrono::Utc::now().to_rfc3339(),
            "profile": profile,
            "gamification": self.gamification()?,
            "assessments": assessments,
            "chatHistory": chat_history,
            "auditLog": audit_log,
        });

        tracing::info!("Exported user data ({} audit entries)", audit_log.len());
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Delete all stored data.
    ///
    /// # Errors
    /// Returns error if storage fails.
    pub fn delete_user_data(&self) -> Result<(), HealthAiError> {
        self.storage.clear_all().map_err(Self::storage_err)?;
        tracing::warn!("User data deleted");
        Ok(())
    }

    /// Full audit log in chain order.
    ///
    /// # Errors
    /// Returns error if storage fails.
    pub fn audit_log(&self) -> Result<Vec<AuditEntry>, HealthAiError> {
        self.storage.load_audit_entries().map_err(Self::storage_err)
    }

    /// Verify the stored audit chain, returning the number of entries.
    ///
    /// # Errors
    /// Returns `Integrity` naming the first broken entry.
    pub fn verify_audit_chain(&self) -> Result<usize, HealthAiError> {
        let entries = self.audit_log()?;
        audit::verify_chain(&entries)?;
        Ok(entries.len())
    }

    fn actor(&self) -> Result<String, HealthAiError> {
        Ok(self
            .storage
            .load_profile()
            .map_err(Self::storage_err)?
            .map_or_else(|| ANONYMOUS_ACTOR.to_string(), |p| p.id))
    }

    fn audit(&self, action: AuditAction, actor: &str, payload: serde_json::Value) -> Result<(), HealthAiError> {
        let prev = self.storage.last_audit_entry().map_err(Self::storage_err)?;
        let entry = AuditEntry::next(prev.as_ref(), action, actor, payload.to_string());
        self.storage.append_audit_entry(&entry).map_err(Self::storage_err)?;
        tracing::debug!("Audit #{} {}", entry.sequence, entry.action);
        Ok(())
    }
}

fn validate(metrics: &HealthMetrics) -> Result<(), HealthAiError> {
    metrics
        .validate()
        .map_err(|errors| HealthAiError::Validation(errors.join("; ")))
}
