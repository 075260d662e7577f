use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTodo {
    pub task: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedTodo {
    pub id: i64,
    pub task: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoToggle {
    pub id: i64,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoRef {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrackerAction {
    Set,
    Increase,
    Decrease,
    /// Water only: new daily goal in `max`.
    SetMax,
    /// Steps only: new daily goal in `goal`.
    SetGoal,
}

/// Body for `/api/update_water` and `/api/update_steps`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackerUpdate<V> {
    pub action: TrackerAction,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<V>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max: Option<V>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub goal: Option<V>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<String>,
}

impl<V> TrackerUpdate<V> {
    fn bare(action: TrackerAction, timestamp: Option<String>) -> Self {
        Self {
            action,
            value: None,
            max: None,
            goal: None,
            timestamp,
        }
    }

    pub fn set(value: V, timestamp: Option<String>) -> Self {
        Self {
            value: Some(value),
            ..Self::bare(TrackerAction::Set, timestamp)
        }
    }

    pub fn nudge(action: TrackerAction, timestamp: Option<String>) -> Self {
        Self::bare(action, timestamp)
    }

    pub fn set_max(max: V) -> Self {
        Self {
            max: Some(max),
            ..Self::bare(TrackerAction::SetMax, None)
        }
    }

    pub fn set_goal(goal: V) -> Self {
        Self {
            goal: Some(goal),
            ..Self::bare(TrackerAction::SetGoal, None)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterTotal {
    pub intake: f64,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepsTotal {
    pub count: i64,
    #[serde(default)]
    pub goal: Option<i64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterSnapshot {
    pub intake: f64,
    #[serde(default)]
    pub goal: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepsSnapshot {
    pub count: i64,
    #[serde(default)]
    pub goal: Option<i64>,
}

/// The parts of `GET /api/get_tracking` this client renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackingSnapshot {
    pub water: WaterSnapshot,
    pub steps: StepsSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_update_serializes_action_and_value() {
        let body = serde_json::to_value(TrackerUpdate::set(2.5, None)).unwrap();
        assert_eq!(body, json!({ "action": "set", "value": 2.5 }));
    }

    #[test]
    fn nudge_omits_value() {
        let body = serde_json::to_value(TrackerUpdate::<i64>::nudge(
            TrackerAction::Decrease,
            Some("2026-01-05T08:00:00".into()),
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({ "action": "decrease", "timestamp": "2026-01-05T08:00:00" })
        );
    }

    #[test]
    fn goal_updates_use_their_own_field() {
        let water = serde_json::to_value(TrackerUpdate::set_max(2.5)).unwrap();
        assert_eq!(water, json!({ "action": "set_max", "max": 2.5 }));

        let steps = serde_json::to_value(TrackerUpdate::set_goal(8000)).unwrap();
        assert_eq!(steps, json!({ "action": "set_goal", "goal": 8000 }));
    }

    #[test]
    fn created_todo_ignores_extra_fields() {
        let todo: CreatedTodo = serde_json::from_value(json!({
            "id": 7,
            "task": "buy milk",
            "completed": false,
            "date": "2026-01-05"
        }))
        .unwrap();
        assert_eq!(todo.id, 7);
        assert_eq!(todo.task, "buy milk");
    }

    #[test]
    fn tracking_snapshot_reads_nested_totals() {
        let snapshot: TrackingSnapshot = serde_json::from_value(json!({
            "water": { "intake": 1.9, "goal": 3.0, "history": [] },
            "steps": { "count": 4200, "goal": 10000, "last_updated": null },
            "mood": { "value": "Happy" }
        }))
        .unwrap();
        assert_eq!(snapshot.water.intake, 1.9);
        assert_eq!(snapshot.steps.count, 4200);
    }
}
