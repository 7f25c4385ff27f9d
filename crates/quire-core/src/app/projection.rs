//! Projection - 表示用シーケンスの構築（純粋関数）
//!
//! 現在ジョブ（一時的）を先頭に置き、その後ろに永続タスクを登録順で並べます。
//! 重複の抑制はしません。ダウンロード中の本は、reconcile されるまで
//! 「現在ジョブ」と「pending の永続タスク」の両方として表示されます。

use crate::domain::{
    DisplayItem, DisplayKey, DisplayView, ServerStatus, StatusCounts, Task, TaskStatus,
};

pub fn project(status: &ServerStatus, tasks: &[Task]) -> Vec<DisplayItem> {
    let mut items = Vec::with_capacity(tasks.len() + 1);

    if let Some(job) = status.current_job() {
        items.push(DisplayItem {
            key: DisplayKey::Current,
            book_id: job.book_id,
            book_name: job.book_name,
            status: TaskStatus::Downloading,
            progress: Some(job.progress),
            message: job.message,
            removable: false,
            added_at: None,
            completed_at: None,
        });
    }

    items.extend(tasks.iter().map(|t| DisplayItem {
        key: DisplayKey::Task(t.id),
        book_id: Some(t.book_id.clone()),
        book_name: t.book_name.clone(),
        status: t.status,
        progress: t.progress.filter(|_| t.status == TaskStatus::Downloading),
        message: t.message.clone(),
        removable: true,
        added_at: Some(t.added_at),
        completed_at: t.completed_at,
    }));

    items
}

pub fn count(items: &[DisplayItem]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for item in items {
        match item.status {
            TaskStatus::Pending => counts.pending += 1,
            TaskStatus::Downloading => counts.downloading += 1,
            TaskStatus::Completed => counts.completed += 1,
            TaskStatus::Failed => counts.failed += 1,
            TaskStatus::Skipped => counts.skipped += 1,
        }
    }
    counts.total = items.len();
    counts
}

pub fn view(status: &ServerStatus, tasks: &[Task]) -> DisplayView {
    let items = project(status, tasks);
    let counts = count(&items);
    DisplayView { items, counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookId, TaskId};
    use chrono::{TimeZone, Utc};
    use ulid::Ulid;

    fn task(n: u64, book: &str, status: TaskStatus) -> Task {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut t = Task::new(TaskId::from_ulid(Ulid::from_parts(n, 0)), BookId::from(book), None, at);
        if status != TaskStatus::Pending {
            t.resolve(status, None, at);
        }
        t
    }

    #[test]
    fn idle_status_lists_tasks_in_insertion_order() {
        let tasks = vec![
            task(1, "a", TaskStatus::Pending),
            task(2, "b", TaskStatus::Completed),
            task(3, "c", TaskStatus::Failed),
        ];

        let items = project(&ServerStatus::idle(), &tasks);

        let keys: Vec<_> = items.iter().map(|i| i.key).collect();
        let expected: Vec<_> = tasks.iter().map(|t| DisplayKey::Task(t.id)).collect();
        assert_eq!(keys, expected);
        assert!(items.iter().all(|i| i.removable));
    }

    #[test]
    fn downloading_prepends_ephemeral_row_and_keeps_pending_duplicate() {
        let tasks = vec![task(1, "111", TaskStatus::Pending)];
        let status = ServerStatus::downloading("111", 42);

        let items = project(&status, &tasks);

        assert_eq!(items.len(), 2);
        assert!(items[0].is_current());
        assert_eq!(items[0].status, TaskStatus::Downloading);
        assert_eq!(items[0].progress, Some(42));
        assert!(!items[0].removable);
        assert_eq!(items[1].book_id, Some(BookId::from("111")));
        assert_eq!(items[1].status, TaskStatus::Pending);
        assert_eq!(items[1].progress, None);
    }

    #[test]
    fn projection_is_stable_and_pure() {
        let tasks = vec![task(1, "a", TaskStatus::Pending), task(2, "b", TaskStatus::Skipped)];
        let snapshot = tasks.clone();
        let status = ServerStatus::downloading("z", 10);

        let first = project(&status, &tasks);
        let second = project(&status, &tasks);

        assert_eq!(first, second);
        assert_eq!(tasks, snapshot);
    }

    #[test]
    fn counts_include_the_current_row() {
        let tasks = vec![
            task(1, "111", TaskStatus::Pending),
            task(2, "b", TaskStatus::Completed),
            task(3, "c", TaskStatus::Skipped),
        ];

        let v = view(&ServerStatus::downloading("111", 5), &tasks);

        assert_eq!(v.counts.downloading, 1);
        assert_eq!(v.counts.pending, 1);
        assert_eq!(v.counts.completed, 1);
        assert_eq!(v.counts.skipped, 1);
        assert_eq!(v.counts.failed, 0);
        assert_eq!(v.counts.total, 4);
        assert_eq!(v.counts.get(TaskStatus::Pending), 1);
    }
}
