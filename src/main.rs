use form_sync::console::{ConsoleAlerts, ConsoleText, ConsoleTodoList, ConsoleTranscript};
use form_sync::regions::{MemoryInput, TodoControl};
use form_sync::{bind_page, ClientConfig, Events, FormId, FormSyncClient, RecommendationFields, Regions};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, PartialEq)]
enum Command {
    Chat(String),
    Todo(String),
    TodoControl(TodoControl),
    Form(FormId, Option<String>),
    Load,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Command::Chat(line.to_owned()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let id = || arg.parse::<i64>().ok();

    match name {
        "todo" => Some(Command::Todo(arg.to_owned())),
        "done" => id().map(|id| Command::TodoControl(TodoControl::Toggle { id, completed: true })),
        "undo" => id().map(|id| Command::TodoControl(TodoControl::Toggle { id, completed: false })),
        "rm" => id().map(|id| Command::TodoControl(TodoControl::Delete { id })),
        "water" => Some(Command::Form(FormId::Water, Some(arg.to_owned()))),
        "water+" => Some(Command::Form(FormId::WaterIncrease, None)),
        "water-" => Some(Command::Form(FormId::WaterDecrease, None)),
        "steps" => Some(Command::Form(FormId::Steps, Some(arg.to_owned()))),
        "steps+" => Some(Command::Form(FormId::StepsIncrease, None)),
        "steps-" => Some(Command::Form(FormId::StepsDecrease, None)),
        "water-goal" => Some(Command::Form(FormId::WaterGoal, Some(arg.to_owned()))),
        "steps-goal" => Some(Command::Form(FormId::StepsGoal, Some(arg.to_owned()))),
        "load" => Some(Command::Load),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

struct Inputs {
    chat: MemoryInput,
    todo: MemoryInput,
    water: MemoryInput,
    water_goal: MemoryInput,
    steps: MemoryInput,
    steps_goal: MemoryInput,
}

impl Inputs {
    fn for_form(&self, form: FormId) -> Option<&MemoryInput> {
        match form {
            FormId::Water => Some(&self.water),
            FormId::WaterGoal => Some(&self.water_goal),
            FormId::Steps => Some(&self.steps),
            FormId::StepsGoal => Some(&self.steps_goal),
            _ => None,
        }
    }
}

/// Returns `false` once the session should end.
async fn dispatch(events: &Events, client: &FormSyncClient, inputs: &Inputs, command: Command) -> bool {
    match command {
        Command::Chat(message) => {
            inputs.chat.type_value(&message);
            events.submit(FormId::Chat).await;
        }
        Command::Todo(task) => {
            inputs.todo.type_value(&task);
            events.submit(FormId::AddTodo).await;
        }
        Command::TodoControl(control) => events.todo_control(control).await,
        Command::Form(form, value) => {
            if let (Some(value), Some(input)) = (value, inputs.for_form(form)) {
                input.type_value(&value);
            }
            events.submit(form).await;
        }
        Command::Load => {
            client.load_tracking().await;
        }
        Command::Quit => return false,
    }
    true
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    let inputs = Inputs {
        chat: MemoryInput::new(),
        todo: MemoryInput::new(),
        water: MemoryInput::new(),
        water_goal: MemoryInput::new(),
        steps: MemoryInput::new(),
        steps_goal: MemoryInput::new(),
    };
    let regions = Regions {
        transcript: Arc::new(ConsoleTranscript::default()),
        chat_input: Arc::new(inputs.chat.clone()),
        todo_list: Arc::new(ConsoleTodoList::default()),
        todo_input: Arc::new(inputs.todo.clone()),
        water_display: Arc::new(ConsoleText::new("water (L)")),
        water_input: Arc::new(inputs.water.clone()),
        water_goal_display: Arc::new(ConsoleText::new("water goal (L)")),
        water_goal_input: Arc::new(inputs.water_goal.clone()),
        steps_display: Arc::new(ConsoleText::new("steps")),
        steps_input: Arc::new(inputs.steps.clone()),
        steps_goal_display: Arc::new(ConsoleText::new("steps goal")),
        steps_goal_input: Arc::new(inputs.steps_goal.clone()),
        alerts: Arc::new(ConsoleAlerts),
    };
    let client = Arc::new(FormSyncClient::new(config, regions)?);
    let fields = RecommendationFields {
        diet_age: Arc::new(MemoryInput::new()),
        workout_age: Arc::new(MemoryInput::new()),
        workout_time: Arc::new(MemoryInput::new()),
    };
    let events = bind_page(Arc::clone(&client), fields);

    info!("talking to {}", client.config().base_url);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        match parse_command(&line) {
            Some(command) => {
                if !dispatch(&events, &client, &inputs, command).await {
                    break;
                }
            }
            None if line.trim().is_empty() => {}
            None => eprintln!("unknown command: {}", line.trim()),
        }
    }

    info!("session closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_chat_message() {
        assert_eq!(parse_command("  how much water? "), Some(Command::Chat("how much water?".into())));
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn slash_commands_map_to_forms() {
        assert_eq!(parse_command("/todo buy milk"), Some(Command::Todo("buy milk".into())));
        assert_eq!(
            parse_command("/done 7"),
            Some(Command::TodoControl(TodoControl::Toggle { id: 7, completed: true }))
        );
        assert_eq!(parse_command("/rm 7"), Some(Command::TodoControl(TodoControl::Delete { id: 7 })));
        assert_eq!(parse_command("/water 2.5"), Some(Command::Form(FormId::Water, Some("2.5".into()))));
        assert_eq!(parse_command("/steps-"), Some(Command::Form(FormId::StepsDecrease, None)));
        assert_eq!(
            parse_command("/water-goal 2.5"),
            Some(Command::Form(FormId::WaterGoal, Some("2.5".into())))
        );
        assert_eq!(
            parse_command("/steps-goal 8000"),
            Some(Command::Form(FormId::StepsGoal, Some("8000".into())))
        );
        assert_eq!(parse_command("/quit"), Some(Command::Quit));
    }

    #[test]
    fn malformed_commands_are_rejected() {
        assert_eq!(parse_command("/rm seven"), None);
        assert_eq!(parse_command("/dance"), None);
    }
}
