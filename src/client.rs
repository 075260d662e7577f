use crate::api::ApiClient;
use crate::config::{ChatFallback, ClientConfig};
use crate::errors::{ErrorField, SyncError};
use crate::models::{TrackerAction, TrackerUpdate};
use crate::regions::{
    Alerts, InputField, TextRegion, TodoControl, TodoEntry, TodoList, Transcript, TranscriptEntry,
};
use chrono::Local;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Region handles one client instance patches.
#[derive(Clone)]
pub struct Regions {
    pub transcript: Arc<dyn Transcript>,
    pub chat_input: Arc<dyn InputField>,
    pub todo_list: Arc<dyn TodoList>,
    pub todo_input: Arc<dyn InputField>,
    pub water_display: Arc<dyn TextRegion>,
    pub water_input: Arc<dyn InputField>,
    pub water_goal_display: Arc<dyn TextRegion>,
    pub water_goal_input: Arc<dyn InputField>,
    pub steps_display: Arc<dyn TextRegion>,
    pub steps_input: Arc<dyn InputField>,
    pub steps_goal_display: Arc<dyn TextRegion>,
    pub steps_goal_input: Arc<dyn InputField>,
    pub alerts: Arc<dyn Alerts>,
}

/// How a single user action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    /// The server confirmed and the regions were patched.
    Applied,
    /// Nothing was sent (empty or unparseable input).
    Skipped,
    /// The request failed; carries the message the user was shown.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Increase,
    Decrease,
}

impl From<Nudge> for TrackerAction {
    fn from(nudge: Nudge) -> Self {
        match nudge {
            Nudge::Increase => TrackerAction::Increase,
            Nudge::Decrease => TrackerAction::Decrease,
        }
    }
}

/// Binds the page's forms to the backend. Every operation issues at most
/// one request and never retries; failures end up in a region, not in the
/// return type.
///
/// Entries appended to the transcript or the to-do list are never
/// reconciled with the server afterwards.
pub struct FormSyncClient {
    api: ApiClient,
    config: ClientConfig,
    regions: Regions,
}

impl FormSyncClient {
    pub fn new(config: ClientConfig, regions: Regions) -> Result<Self, SyncError> {
        let api = ApiClient::new(&config)?;
        Ok(Self::with_api(api, config, regions))
    }

    pub fn with_api(api: ApiClient, config: ClientConfig, regions: Regions) -> Self {
        Self {
            api,
            config,
            regions,
        }
    }

    pub fn regions(&self) -> &Regions {
        &self.regions
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn submit_chat(&self, message: &str) -> Settled {
        if message.trim().is_empty() {
            debug!("ignoring empty chat message");
            return Settled::Skipped;
        }

        let transcript = &self.regions.transcript;
        transcript.append(TranscriptEntry::you(message));
        let placeholder = self
            .config
            .chat_placeholder
            .then(|| transcript.append(TranscriptEntry::loading()));

        let result = self.api.chat(message).await;
        if let Some(id) = placeholder {
            transcript.remove(id);
        }

        let settled = match result {
            Ok(reply) => {
                info!("chat reply received");
                transcript.append(TranscriptEntry::bot(reply.response));
                Settled::Applied
            }
            Err(err) => {
                warn!("chat request failed: {err}");
                let text = match &self.config.chat_fallback {
                    ChatFallback::Fixed(text) => text.clone(),
                    ChatFallback::ServerResponse => {
                        format!("Error: {}", err.user_message(ErrorField::Response))
                    }
                };
                transcript.append(TranscriptEntry::bot(text.clone()));
                Settled::Failed(text)
            }
        };

        self.regions.chat_input.clear();
        transcript.scroll_to_bottom();
        settled
    }

    pub async fn add_todo(&self, task: &str) -> Settled {
        if task.trim().is_empty() {
            debug!("ignoring empty todo");
            return Settled::Skipped;
        }

        match self.api.create_todo(task).await {
            Ok(created) => {
                info!(id = created.id, "todo added");
                self.regions.todo_list.append(TodoEntry {
                    id: created.id,
                    task: created.task,
                    completed: created.completed,
                });
                self.regions.todo_input.clear();
                Settled::Applied
            }
            Err(err) => self.fail("Error adding todo", &err),
        }
    }

    /// Sends the new completion state. The checkbox already shows it, so
    /// success leaves the regions untouched.
    pub async fn toggle_todo(&self, id: i64, completed: bool) -> Settled {
        match self.api.update_todo(id, completed).await {
            Ok(()) => {
                info!(id, completed, "todo updated");
                Settled::Applied
            }
            Err(err) => self.fail("Error updating todo", &err),
        }
    }

    pub async fn delete_todo(&self, id: i64) -> Settled {
        match self.api.delete_todo(id).await {
            Ok(()) => {
                if !self.regions.todo_list.remove(id) {
                    debug!(id, "deleted todo was not on the list");
                }
                info!(id, "todo deleted");
                Settled::Applied
            }
            Err(err) => self.fail("Error deleting todo", &err),
        }
    }

    pub async fn handle_todo_control(&self, control: TodoControl) -> Settled {
        match control {
            TodoControl::Toggle { id, completed } => self.toggle_todo(id, completed).await,
            TodoControl::Delete { id } => self.delete_todo(id).await,
        }
    }

    pub async fn set_water_intake(&self, amount: f64) -> Settled {
        let update = TrackerUpdate::set(amount, Some(timestamp()));
        self.apply_water(&update, "Error updating water intake").await
    }

    pub async fn adjust_water(&self, nudge: Nudge) -> Settled {
        let update = TrackerUpdate::nudge(nudge.into(), Some(timestamp()));
        self.apply_water(&update, "Error updating water intake").await
    }

    pub async fn set_steps(&self, count: i64) -> Settled {
        let update = TrackerUpdate::set(count, Some(timestamp()));
        self.apply_steps(&update, "Error updating steps").await
    }

    pub async fn adjust_steps(&self, nudge: Nudge) -> Settled {
        let update = TrackerUpdate::nudge(nudge.into(), Some(timestamp()));
        self.apply_steps(&update, "Error updating steps").await
    }

    /// Sets the daily water goal. The server clamps it and may lower the
    /// current intake to fit, so both displays take the returned values.
    pub async fn set_water_goal(&self, max: f64) -> Settled {
        let update = TrackerUpdate::set_max(max);
        self.apply_water(&update, "Error updating water goal").await
    }

    pub async fn set_steps_goal(&self, goal: i64) -> Settled {
        let update = TrackerUpdate::set_goal(goal);
        self.apply_steps(&update, "Error updating steps goal").await
    }

    /// Fills both tracker displays from the server's current totals.
    pub async fn load_tracking(&self) -> Settled {
        match self.api.tracking().await {
            Ok(snapshot) => {
                self.regions
                    .water_display
                    .set_text(&format_litres(snapshot.water.intake));
                self.regions
                    .steps_display
                    .set_text(&snapshot.steps.count.to_string());
                self.show_water_goal(snapshot.water.goal);
                self.show_steps_goal(snapshot.steps.goal);
                info!(
                    intake = snapshot.water.intake,
                    steps = snapshot.steps.count,
                    "tracking loaded"
                );
                Settled::Applied
            }
            Err(err) => self.fail("Error loading tracking", &err),
        }
    }

    async fn apply_water(&self, update: &TrackerUpdate<f64>, context: &str) -> Settled {
        match self.api.update_water(update).await {
            Ok(total) => {
                self.regions
                    .water_display
                    .set_text(&format_litres(total.intake));
                self.show_water_goal(total.max);
                info!(
                    action = ?update.action,
                    intake = total.intake,
                    max = ?total.max,
                    last_updated = ?total.last_updated,
                    "water intake updated"
                );
                Settled::Applied
            }
            Err(err) => self.fail(context, &err),
        }
    }

    async fn apply_steps(&self, update: &TrackerUpdate<i64>, context: &str) -> Settled {
        match self.api.update_steps(update).await {
            Ok(total) => {
                self.regions
                    .steps_display
                    .set_text(&total.count.to_string());
                self.show_steps_goal(total.goal);
                info!(
                    action = ?update.action,
                    count = total.count,
                    goal = ?total.goal,
                    last_updated = ?total.last_updated,
                    "steps updated"
                );
                Settled::Applied
            }
            Err(err) => self.fail(context, &err),
        }
    }

    fn show_water_goal(&self, max: Option<f64>) {
        if let Some(max) = max {
            self.regions.water_goal_display.set_text(&format_litres(max));
        }
    }

    fn show_steps_goal(&self, goal: Option<i64>) {
        if let Some(goal) = goal {
            self.regions.steps_goal_display.set_text(&goal.to_string());
        }
    }

    fn fail(&self, context: &str, err: &SyncError) -> Settled {
        warn!(
            status = ?err.status(),
            network = err.is_network(),
            "{context}: {err}"
        );
        let message = format!("{context}: {}", err.user_message(ErrorField::Error));
        self.regions.alerts.alert(&message);
        Settled::Failed(message)
    }
}

/// One decimal, ties rounded away from zero (2.25 shows as "2.3").
pub fn format_litres(intake: f64) -> String {
    format!("{:.1}", (intake * 10.0).round() / 10.0)
}

fn timestamp() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}
