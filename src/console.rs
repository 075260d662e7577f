use crate::regions::{Alerts, EntryId, TextRegion, TodoEntry, TodoList, Transcript, TranscriptEntry};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex, PoisonError,
};

/// Prints each transcript entry as it is appended. A terminal cannot take
/// lines back, so removal only forgets the id.
#[derive(Default)]
pub struct ConsoleTranscript {
    next_id: AtomicU64,
}

impl Transcript for ConsoleTranscript {
    fn append(&self, entry: TranscriptEntry) -> EntryId {
        println!("{}", entry.render());
        EntryId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn remove(&self, id: EntryId) -> bool {
        id.0 <= self.next_id.load(Ordering::Relaxed)
    }

    fn scroll_to_bottom(&self) {}
}

#[derive(Default)]
pub struct ConsoleTodoList {
    entries: Mutex<Vec<TodoEntry>>,
}

impl TodoList for ConsoleTodoList {
    fn append(&self, entry: TodoEntry) {
        let mark = if entry.completed { "x" } else { " " };
        println!("[{mark}] #{} {}", entry.id, entry.task);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    fn remove(&self, id: i64) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != before;
        if removed {
            println!("removed #{id}");
        }
        removed
    }
}

pub struct ConsoleText {
    label: &'static str,
}

impl ConsoleText {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl TextRegion for ConsoleText {
    fn set_text(&self, text: &str) {
        println!("{}: {text}", self.label);
    }
}

#[derive(Default)]
pub struct ConsoleAlerts;

impl Alerts for ConsoleAlerts {
    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }
}
