//! Event subscription hub standing in for the page's submit/input listeners.
//!
//! Handlers are registered per form or per field and invoked directly with
//! synthetic events, so "what triggers what" can be exercised without a UI
//! loop. [`bind_page`] registers the full set of page handlers.

use crate::client::{FormSyncClient, Nudge};
use crate::regions::{InputField, TodoControl};
use crate::validation::{parse_number, FormConstraints, ValidationRule, AGE_YEARS, WORKOUT_MINUTES};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::debug;

pub type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

type SubmitHandler = Arc<dyn Fn(SubmitEvent) -> HandlerFuture + Send + Sync>;
type InputHandler = Arc<dyn Fn(InputEvent) + Send + Sync>;
type TodoHandler = Arc<dyn Fn(TodoControl) -> HandlerFuture + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormId {
    Chat,
    AddTodo,
    Water,
    WaterIncrease,
    WaterDecrease,
    WaterGoal,
    Steps,
    StepsIncrease,
    StepsDecrease,
    StepsGoal,
    Diet,
    Workout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    DietAge,
    WorkoutAge,
    WorkoutTime,
}

#[derive(Debug, Clone)]
pub struct SubmitEvent {
    pub form: FormId,
    prevented: Arc<AtomicBool>,
}

impl SubmitEvent {
    pub fn new(form: FormId) -> Self {
        Self {
            form,
            prevented: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stops the native form submission from going ahead.
    pub fn prevent_default(&self) {
        self.prevented.store(true, Ordering::Relaxed);
    }

    pub fn default_prevented(&self) -> bool {
        self.prevented.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub field: FieldId,
}

#[derive(Default, Clone)]
pub struct Events {
    submit: HashMap<FormId, Vec<SubmitHandler>>,
    input: HashMap<FieldId, Vec<InputHandler>>,
    todo: Vec<TodoHandler>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_submit<F, Fut>(&mut self, form: FormId, handler: F)
    where
        F: Fn(SubmitEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.submit
            .entry(form)
            .or_default()
            .push(Arc::new(move |event| Box::pin(handler(event))));
    }

    pub fn on_input<F>(&mut self, field: FieldId, handler: F)
    where
        F: Fn(InputEvent) + Send + Sync + 'static,
    {
        self.input.entry(field).or_default().push(Arc::new(handler));
    }

    pub fn on_todo_control<F, Fut>(&mut self, handler: F)
    where
        F: Fn(TodoControl) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.todo
            .push(Arc::new(move |control| Box::pin(handler(control))));
    }

    /// Runs every submit handler for `form` to completion and returns the
    /// event so callers can see whether the default was prevented.
    pub async fn submit(&self, form: FormId) -> SubmitEvent {
        let event = SubmitEvent::new(form);
        let handlers = self.submit.get(&form).cloned().unwrap_or_default();
        if handlers.is_empty() {
            debug!(?form, "no submit handler registered");
        }
        for handler in handlers {
            handler(event.clone()).await;
        }
        event
    }

    pub fn input(&self, field: FieldId) {
        for handler in self.input.get(&field).into_iter().flatten() {
            handler(InputEvent { field });
        }
    }

    pub async fn todo_control(&self, control: TodoControl) {
        for handler in self.todo.clone() {
            handler(control).await;
        }
    }
}

/// Inputs of the two recommendation forms, which only validate locally.
#[derive(Clone)]
pub struct RecommendationFields {
    pub diet_age: Arc<dyn InputField>,
    pub workout_age: Arc<dyn InputField>,
    pub workout_time: Arc<dyn InputField>,
}

/// Registers every page handler against `client` and `fields`.
pub fn bind_page(client: Arc<FormSyncClient>, fields: RecommendationFields) -> Events {
    let mut events = Events::new();

    let c = Arc::clone(&client);
    events.on_submit(FormId::Chat, move |event| {
        let c = Arc::clone(&c);
        async move {
            event.prevent_default();
            let message = c.regions().chat_input.value();
            c.submit_chat(&message).await;
        }
    });

    let c = Arc::clone(&client);
    events.on_submit(FormId::AddTodo, move |event| {
        let c = Arc::clone(&c);
        async move {
            event.prevent_default();
            let task = c.regions().todo_input.value();
            c.add_todo(&task).await;
        }
    });

    let c = Arc::clone(&client);
    events.on_submit(FormId::Water, move |event| {
        let c = Arc::clone(&c);
        async move {
            event.prevent_default();
            let input = &c.regions().water_input;
            match parse_number(&input.value()) {
                Some(amount) => {
                    input.set_invalid(false);
                    c.set_water_intake(amount).await;
                }
                None => input.set_invalid(true),
            }
        }
    });

    let c = Arc::clone(&client);
    events.on_submit(FormId::Steps, move |event| {
        let c = Arc::clone(&c);
        async move {
            event.prevent_default();
            let input = &c.regions().steps_input;
            let count = parse_number(&input.value()).map(|value| value.trunc() as i64);
            match count {
                Some(count) => {
                    input.set_invalid(false);
                    c.set_steps(count).await;
                }
                None => input.set_invalid(true),
            }
        }
    });

    let c = Arc::clone(&client);
    events.on_submit(FormId::WaterGoal, move |event| {
        let c = Arc::clone(&c);
        async move {
            event.prevent_default();
            let input = &c.regions().water_goal_input;
            match parse_number(&input.value()) {
                Some(max) => {
                    input.set_invalid(false);
                    c.set_water_goal(max).await;
                }
                None => input.set_invalid(true),
            }
        }
    });

    let c = Arc::clone(&client);
    events.on_submit(FormId::StepsGoal, move |event| {
        let c = Arc::clone(&c);
        async move {
            event.prevent_default();
            let input = &c.regions().steps_goal_input;
            match parse_number(&input.value()).map(|value| value.trunc() as i64) {
                Some(goal) => {
                    input.set_invalid(false);
                    c.set_steps_goal(goal).await;
                }
                None => input.set_invalid(true),
            }
        }
    });

    for (form, nudge, water) in [
        (FormId::WaterIncrease, Nudge::Increase, true),
        (FormId::WaterDecrease, Nudge::Decrease, true),
        (FormId::StepsIncrease, Nudge::Increase, false),
        (FormId::StepsDecrease, Nudge::Decrease, false),
    ] {
        let c = Arc::clone(&client);
        events.on_submit(form, move |event| {
            let c = Arc::clone(&c);
            async move {
                event.prevent_default();
                if water {
                    c.adjust_water(nudge).await;
                } else {
                    c.adjust_steps(nudge).await;
                }
            }
        });
    }

    let c = Arc::clone(&client);
    events.on_todo_control(move |control| {
        let c = Arc::clone(&c);
        async move {
            c.handle_todo_control(control).await;
        }
    });

    for (field, input, range) in [
        (FieldId::DietAge, &fields.diet_age, AGE_YEARS),
        (FieldId::WorkoutAge, &fields.workout_age, AGE_YEARS),
        (FieldId::WorkoutTime, &fields.workout_time, WORKOUT_MINUTES),
    ] {
        let rule = ValidationRule::new(Arc::clone(input), range);
        events.on_input(field, move |_| {
            rule.evaluate();
        });
    }

    let diet = Arc::new(FormConstraints::new().field(Arc::clone(&fields.diet_age), true, Some(AGE_YEARS)));
    let workout = Arc::new(
        FormConstraints::new()
            .field(Arc::clone(&fields.workout_age), true, Some(AGE_YEARS))
            .field(Arc::clone(&fields.workout_time), true, Some(WORKOUT_MINUTES)),
    );
    for (form, constraints) in [(FormId::Diet, diet), (FormId::Workout, workout)] {
        events.on_submit(form, move |event| {
            if !constraints.check_validity() {
                event.prevent_default();
            }
            async {}
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn submit_runs_handlers_in_registration_order() {
        let calls = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut events = Events::new();
        for tag in ["first", "second"] {
            let calls = Arc::clone(&calls);
            events.on_submit(FormId::Chat, move |_| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.lock().unwrap().push(tag);
                }
            });
        }

        let event = events.submit(FormId::Chat).await;
        assert!(!event.default_prevented());
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn unrelated_forms_do_not_fire() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut events = Events::new();
        let counter = Arc::clone(&fired);
        events.on_submit(FormId::Water, move |event| {
            let counter = Arc::clone(&counter);
            async move {
                event.prevent_default();
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert!(!events.submit(FormId::Steps).await.default_prevented());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(events.submit(FormId::Water).await.default_prevented());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn input_handlers_receive_their_field() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut events = Events::new();
        let sink = Arc::clone(&seen);
        events.on_input(FieldId::WorkoutTime, move |event| {
            sink.lock().unwrap().push(event.field);
        });

        events.input(FieldId::DietAge);
        events.input(FieldId::WorkoutTime);
        assert_eq!(*seen.lock().unwrap(), vec![FieldId::WorkoutTime]);
    }
}
