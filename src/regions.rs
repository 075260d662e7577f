//! Display regions the client patches.
//!
//! Each region is a trait object handed to [`crate::FormSyncClient`] at
//! construction, so one page can host several independent clients and tests
//! can inspect the result without a live page. The `Memory*` handles keep
//! their contents in memory and are cheap to clone (clones share state).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    You,
    Bot,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl TranscriptEntry {
    pub fn you(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::You,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
        }
    }

    pub fn loading() -> Self {
        Self {
            speaker: Speaker::Loading,
            text: "Loading…".to_owned(),
        }
    }

    pub fn render(&self) -> String {
        match self.speaker {
            Speaker::You => format!("You: {}", self.text),
            Speaker::Bot => format!("Bot: {}", self.text),
            Speaker::Loading => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

pub trait Transcript: Send + Sync {
    fn append(&self, entry: TranscriptEntry) -> EntryId;
    fn remove(&self, id: EntryId) -> bool;
    fn scroll_to_bottom(&self);
}

/// A rendered to-do entry, bound to the server-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoEntry {
    pub id: i64,
    pub task: String,
    pub completed: bool,
}

/// What an entry's controls emit when the user operates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoControl {
    Toggle { id: i64, completed: bool },
    Delete { id: i64 },
}

impl TodoEntry {
    pub fn checkbox(&self, checked: bool) -> TodoControl {
        TodoControl::Toggle {
            id: self.id,
            completed: checked,
        }
    }

    pub fn delete_button(&self) -> TodoControl {
        TodoControl::Delete { id: self.id }
    }
}

pub trait TodoList: Send + Sync {
    fn append(&self, entry: TodoEntry);
    /// Removes every entry bound to `id`; returns whether one was found.
    fn remove(&self, id: i64) -> bool;
}

pub trait TextRegion: Send + Sync {
    fn set_text(&self, text: &str);
}

pub trait InputField: Send + Sync {
    fn value(&self) -> String;
    fn clear(&self);
    fn set_invalid(&self, invalid: bool);
}

/// Blocking, user-facing error notice.
pub trait Alerts: Send + Sync {
    fn alert(&self, message: &str);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct TranscriptInner {
    next_id: u64,
    entries: Vec<(EntryId, TranscriptEntry)>,
    scrolls: usize,
}

#[derive(Clone, Default)]
pub struct MemoryTranscript {
    inner: Arc<Mutex<TranscriptInner>>,
}

impl MemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<TranscriptEntry> {
        lock(&self.inner)
            .entries
            .iter()
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries().iter().map(TranscriptEntry::render).collect()
    }

    /// Number of times the view was scrolled to its bottom.
    pub fn scroll_count(&self) -> usize {
        lock(&self.inner).scrolls
    }
}

impl Transcript for MemoryTranscript {
    fn append(&self, entry: TranscriptEntry) -> EntryId {
        let mut inner = lock(&self.inner);
        inner.next_id += 1;
        let id = EntryId(inner.next_id);
        inner.entries.push((id, entry));
        id
    }

    fn remove(&self, id: EntryId) -> bool {
        let mut inner = lock(&self.inner);
        let before = inner.entries.len();
        inner.entries.retain(|(entry_id, _)| *entry_id != id);
        inner.entries.len() != before
    }

    fn scroll_to_bottom(&self) {
        lock(&self.inner).scrolls += 1;
    }
}

#[derive(Clone, Default)]
pub struct MemoryTodoList {
    entries: Arc<Mutex<Vec<TodoEntry>>>,
}

impl MemoryTodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<TodoEntry> {
        lock(&self.entries).clone()
    }

    pub fn get(&self, id: i64) -> Option<TodoEntry> {
        lock(&self.entries).iter().find(|entry| entry.id == id).cloned()
    }
}

impl TodoList for MemoryTodoList {
    fn append(&self, entry: TodoEntry) {
        lock(&self.entries).push(entry);
    }

    fn remove(&self, id: i64) -> bool {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }
}

#[derive(Clone, Default)]
pub struct MemoryText {
    text: Arc<Mutex<String>>,
}

impl MemoryText {
    pub fn new(initial: &str) -> Self {
        Self {
            text: Arc::new(Mutex::new(initial.to_owned())),
        }
    }

    pub fn text(&self) -> String {
        lock(&self.text).clone()
    }
}

impl TextRegion for MemoryText {
    fn set_text(&self, text: &str) {
        *lock(&self.text) = text.to_owned();
    }
}

#[derive(Default)]
struct InputInner {
    value: String,
    invalid: bool,
}

#[derive(Clone, Default)]
pub struct MemoryInput {
    inner: Arc<Mutex<InputInner>>,
}

impl MemoryInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the user typing `value` into the field.
    pub fn type_value(&self, value: &str) {
        lock(&self.inner).value = value.to_owned();
    }

    pub fn is_invalid(&self) -> bool {
        lock(&self.inner).invalid
    }
}

impl InputField for MemoryInput {
    fn value(&self) -> String {
        lock(&self.inner).value.clone()
    }

    fn clear(&self) {
        lock(&self.inner).value.clear();
    }

    fn set_invalid(&self, invalid: bool) {
        lock(&self.inner).invalid = invalid;
    }
}

#[derive(Clone, Default)]
pub struct MemoryAlerts {
    shown: Arc<Mutex<Vec<String>>>,
}

impl MemoryAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<String> {
        lock(&self.shown).clone()
    }
}

impl Alerts for MemoryAlerts {
    fn alert(&self, message: &str) {
        lock(&self.shown).push(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_removes_only_the_given_entry() {
        let transcript = MemoryTranscript::new();
        transcript.append(TranscriptEntry::you("hi"));
        let loading = transcript.append(TranscriptEntry::loading());
        transcript.append(TranscriptEntry::bot("hello"));

        assert!(transcript.remove(loading));
        assert!(!transcript.remove(loading));
        assert_eq!(transcript.lines(), vec!["You: hi", "Bot: hello"]);
    }

    #[test]
    fn todo_list_removes_by_exact_id() {
        let list = MemoryTodoList::new();
        for (id, task) in [(7, "buy milk"), (17, "call 7 people"), (70, "run")] {
            list.append(TodoEntry {
                id,
                task: task.into(),
                completed: false,
            });
        }

        assert!(list.remove(7));
        let remaining: Vec<i64> = list.entries().iter().map(|entry| entry.id).collect();
        assert_eq!(remaining, vec![17, 70]);
    }

    #[test]
    fn entry_controls_carry_the_bound_id() {
        let entry = TodoEntry {
            id: 7,
            task: "buy milk".into(),
            completed: false,
        };
        assert_eq!(
            entry.checkbox(true),
            TodoControl::Toggle {
                id: 7,
                completed: true
            }
        );
        assert_eq!(entry.delete_button(), TodoControl::Delete { id: 7 });
    }

    #[test]
    fn clones_share_state() {
        let input = MemoryInput::new();
        let handle = input.clone();
        input.type_value("2.5");
        assert_eq!(handle.value(), "2.5");
        handle.clear();
        assert_eq!(input.value(), "");
    }
}
