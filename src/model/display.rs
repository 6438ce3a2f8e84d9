// File: ./src/model/display.rs
use crate::model::item::{Priority, Task, TaskStatus};
use chrono::NaiveDate;

pub trait TaskDisplay {
    fn checkbox_symbol(&self) -> &'static str;
    fn priority_marker(&self) -> &'static str;
    fn to_list_line(&self, today: NaiveDate) -> String;
}

impl TaskDisplay for Task {
    fn checkbox_symbol(&self) -> &'static str {
        match self.status {
            TaskStatus::Done => "[✔]",
            TaskStatus::InProgress => "[▶]",
            TaskStatus::ToDo => "[ ]",
        }
    }

    fn priority_marker(&self) -> &'static str {
        match self.priority {
            Priority::High => "!!",
            Priority::Medium => "! ",
            Priority::Low => "  ",
        }
    }

    /// `[ ] !! Title  (due 2025-01-16, overdue)  <id>`
    fn to_list_line(&self, today: NaiveDate) -> String {
        let mut s = format!(
            "{} {} {}",
            self.checkbox_symbol(),
            self.priority_marker(),
            self.title
        );
        if let Some(d) = self.due_date {
            if self.is_overdue(today) {
                s.push_str(&format!("  (due {}, overdue)", d.format("%Y-%m-%d")));
            } else {
                s.push_str(&format!("  (due {})", d.format("%Y-%m-%d")));
            }
        }
        s.push_str(&format!("  <{}>", self.id));
        s
    }
}
