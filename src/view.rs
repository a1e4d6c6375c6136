//! Derived view state: the filtered task list and the dashboard counts.
//! Both are recomputed from the full list on every draw.

use std::fmt;

use crate::models::{Status, Task};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn next(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == Status::Pending,
            StatusFilter::Completed => status == Status::Completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusFilter::All => "All",
            StatusFilter::Pending => "Pending",
            StatusFilter::Completed => "Completed",
        };
        f.write_str(label)
    }
}

/// Tasks matching `filter` whose title contains `search`, ignoring case.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: StatusFilter, search: &str) -> Vec<&'a Task> {
    let needle = search.to_lowercase();
    tasks
        .iter()
        .filter(|task| filter.matches(task.status))
        .filter(|task| task.title.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks
            .iter()
            .filter(|task| task.status == Status::Completed)
            .count();
        let pending = tasks
            .iter()
            .filter(|task| task.status == Status::Pending)
            .count();
        TaskStats {
            total: tasks.len(),
            completed,
            pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::models::Priority;

    fn task(title: &str, status: Status) -> Task {
        Task {
            id: Uuid::now_v7(),
            title: title.to_string(),
            description: String::new(),
            priority: Priority::Low,
            due_date: NaiveDate::from_ymd_opt(2026, 10, 30).unwrap(),
            status,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("Foo the bar", Status::Completed),
            task("Pay foo invoice", Status::Pending),
            task("Walk dog", Status::Completed),
            task("FOOTBALL practice", Status::Completed),
            task("Groceries", Status::Pending),
        ]
    }

    fn titles(tasks: Vec<&Task>) -> Vec<&str> {
        tasks.into_iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_completed_filter_with_search_is_case_insensitive() {
        let tasks = sample();
        let filtered = filter_tasks(&tasks, StatusFilter::Completed, "foo");
        assert_eq!(titles(filtered), vec!["Foo the bar", "FOOTBALL practice"]);

        let filtered = filter_tasks(&tasks, StatusFilter::Completed, "FoO");
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_all_filter_with_empty_search_keeps_everything() {
        let tasks = sample();
        assert_eq!(filter_tasks(&tasks, StatusFilter::All, "").len(), tasks.len());
    }

    #[test]
    fn test_pending_filter() {
        let tasks = sample();
        let filtered = filter_tasks(&tasks, StatusFilter::Pending, "");
        assert_eq!(titles(filtered), vec!["Pay foo invoice", "Groceries"]);
        assert!(filter_tasks(&tasks, StatusFilter::Pending, "walk").is_empty());
    }

    #[test]
    fn test_stats_add_up() {
        let tasks = sample();
        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(
            stats,
            TaskStats {
                total: 5,
                completed: 3,
                pending: 2
            }
        );

        for n in 0..tasks.len() {
            let stats = TaskStats::from_tasks(&tasks[..n]);
            assert_eq!(stats.total, stats.completed + stats.pending);
        }
        assert_eq!(TaskStats::from_tasks(&[]), TaskStats::default());
    }

    #[test]
    fn test_filter_cycle() {
        assert_eq!(StatusFilter::default(), StatusFilter::All);
        assert_eq!(StatusFilter::All.next(), StatusFilter::Pending);
        assert_eq!(StatusFilter::Pending.next(), StatusFilter::Completed);
        assert_eq!(StatusFilter::Completed.next(), StatusFilter::All);
    }
}
