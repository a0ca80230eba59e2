//! Observable in-memory task list.
//!
//! `TasksObject` is owned by whoever constructs it and handed out by
//! reference. Readers either take a `snapshot()` or `subscribe()` to be
//! woken on every change. Writers are expected to be a single logical owner
//! (the UI or CLI driving loop).

use tokio::sync::watch;
use tracing::debug;

use crate::types::{Position, Task};

/// The shared task list.
#[derive(Debug)]
pub struct TasksObject {
    tasks: watch::Sender<Vec<Task>>,
}

impl Default for TasksObject {
    fn default() -> Self {
        Self::new()
    }
}

impl TasksObject {
    /// Creates an empty task list.
    pub fn new() -> Self {
        let (tasks, _) = watch::channel(Vec::new());
        Self { tasks }
    }

    /// Creates a task list pre-populated with `tasks`, in order.
    ///
    /// Ids are expected to be unique, as they are when loaded from storage.
    /// With duplicates, lookups only ever see the first match.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let (tasks, _) = watch::channel(tasks);
        Self { tasks }
    }

    /// Returns a receiver that observes every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks.subscribe()
    }

    /// Returns a copy of the current tasks in display order.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Returns a copy of the task with the given id.
    pub fn get(&self, id: i64) -> Option<Task> {
        self.tasks.borrow().iter().find(|t| t.id == id).cloned()
    }

    /// Replaces the whole list, e.g. after loading from storage.
    ///
    /// Ids must be unique, same as for `with_tasks`.
    pub fn replace(&self, tasks: Vec<Task>) {
        debug!(count = tasks.len(), "Replacing task list");
        self.tasks.send_replace(tasks);
    }

    /// Mutates the list in place and notifies subscribers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Vec<Task>),
    {
        self.tasks.send_modify(f);
    }

    /// Appends a task at the end of the display order.
    ///
    /// Returns `false`, leaving the list untouched, if the id is taken.
    pub fn push(&self, task: Task) -> bool {
        self.tasks.send_if_modified(|tasks| {
            if tasks.iter().any(|t| t.id == task.id) {
                return false;
            }
            tasks.push(task);
            true
        })
    }

    /// Overwrites the task sharing `task.id`, keeping its place in the list.
    /// Returns the previous value, or `None` if absent.
    pub fn put(&self, task: Task) -> Option<Task> {
        let mut previous = None;
        self.tasks.send_if_modified(|tasks| {
            match tasks.iter_mut().find(|t| t.id == task.id) {
                Some(slot) => {
                    previous = Some(std::mem::replace(slot, task));
                    true
                }
                None => false,
            }
        });
        previous
    }

    /// Renames a task. Returns the updated task, or `None` if absent.
    pub fn rename(&self, id: i64, name: impl Into<String>) -> Option<Task> {
        let name = name.into();
        self.modify_task(id, |task| task.name = name)
    }

    /// Sets the completion flag. Returns the updated task, or `None` if absent.
    pub fn set_completed(&self, id: i64, completed: bool) -> Option<Task> {
        self.modify_task(id, |task| task.completed = completed)
    }

    /// Flips the completion flag. Returns the updated task, or `None` if absent.
    pub fn toggle(&self, id: i64) -> Option<Task> {
        self.modify_task(id, |task| task.completed = !task.completed)
    }

    /// Moves a task to a new layout position.
    pub fn move_to(&self, id: i64, position: Position) -> Option<Task> {
        self.modify_task(id, |task| task.position = position)
    }

    /// Removes a task, keeping the order of the rest.
    pub fn remove(&self, id: i64) -> Option<Task> {
        let mut removed = None;
        self.tasks.send_if_modified(|tasks| {
            match tasks.iter().position(|t| t.id == id) {
                Some(index) => {
                    removed = Some(tasks.remove(index));
                    true
                }
                None => false,
            }
        });
        removed
    }

    fn modify_task<F>(&self, id: i64, f: F) -> Option<Task>
    where
        F: FnOnce(&mut Task),
    {
        let mut updated = None;
        self.tasks.send_if_modified(|tasks| {
            match tasks.iter_mut().find(|t| t.id == id) {
                Some(task) => {
                    f(task);
                    updated = Some(task.clone());
                    true
                }
                None => false,
            }
        });
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TasksObject {
        TasksObject::with_tasks(vec![
            Task::new(1).with_name("first"),
            Task::new(2).with_name("second"),
            Task::new(3).with_name("third"),
        ])
    }

    #[test]
    fn test_starts_empty() {
        let tasks = TasksObject::new();
        assert!(tasks.is_empty());
        assert_eq!(tasks.len(), 0);
        assert!(tasks.snapshot().is_empty());
    }

    #[test]
    fn test_push_keeps_insertion_order() {
        let tasks = TasksObject::new();
        tasks.push(Task::new(5));
        tasks.push(Task::new(2));

        let ids: Vec<i64> = tasks.snapshot().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![5, 2]);
    }

    #[test]
    fn test_push_rejects_duplicate_id() {
        let tasks = sample();
        let mut rx = tasks.subscribe();
        rx.borrow_and_update();

        assert!(!tasks.push(Task::new(2).with_name("impostor")));

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks.get(2).unwrap().name, "second");
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_put_overwrites_in_place() {
        let tasks = sample();
        let mut changed = Task::new(2).with_name("changed");
        changed.completed = true;

        let previous = tasks.put(changed.clone()).unwrap();

        assert_eq!(previous.name, "second");
        assert_eq!(tasks.snapshot()[1], changed);
        assert!(tasks.put(Task::new(99)).is_none());
        assert_eq!(tasks.len(), 3);
    }

    #[test]
    fn test_rename_and_toggle() {
        let tasks = sample();

        let renamed = tasks.rename(2, "renamed").unwrap();
        assert_eq!(renamed.name, "renamed");

        let toggled = tasks.toggle(2).unwrap();
        assert!(toggled.completed);
        assert!(!tasks.toggle(2).unwrap().completed);

        assert!(tasks.set_completed(3, true).unwrap().completed);
        assert!(tasks.get(3).unwrap().completed);
    }

    #[test]
    fn test_move_to() {
        let tasks = sample();
        let moved = tasks.move_to(1, Position::new(-5.0, 12.5)).unwrap();
        assert_eq!(moved.position, Position::new(-5.0, 12.5));
    }

    #[test]
    fn test_unknown_id_is_none() {
        let tasks = sample();
        assert!(tasks.rename(99, "x").is_none());
        assert!(tasks.toggle(99).is_none());
        assert!(tasks.remove(99).is_none());
        assert_eq!(tasks.len(), 3);
    }

    #[test]
    fn test_remove_preserves_order() {
        let tasks = sample();
        let removed = tasks.remove(2).unwrap();
        assert_eq!(removed.name, "second");

        let ids: Vec<i64> = tasks.snapshot().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_replace() {
        let tasks = sample();
        tasks.replace(vec![Task::new(10)]);
        assert_eq!(tasks.len(), 1);
        assert!(tasks.get(10).is_some());
    }

    #[test]
    fn test_subscriber_sees_mutation() {
        let tasks = TasksObject::new();
        let mut rx = tasks.subscribe();
        assert!(!rx.has_changed().unwrap());

        tasks.push(Task::new(1));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[test]
    fn test_subscriber_not_woken_by_miss() {
        let tasks = sample();
        let mut rx = tasks.subscribe();
        rx.borrow_and_update();

        tasks.toggle(42);

        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_subscriber_wakes_on_change() {
        let tasks = TasksObject::new();
        let mut rx = tasks.subscribe();

        let waiter = tokio::spawn(async move {
            rx.changed().await.unwrap();
            rx.borrow().len()
        });

        tasks.push(Task::new(1));

        assert_eq!(waiter.await.unwrap(), 1);
    }
}
