/// Shared types used across the codebase

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error returned when a string is not a member of one of the todo enumerations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant: {}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

// Closed string enumerations. The wire string is also the stored value.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownVariant(other.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Area of life a todo belongs to
    Category {
        Work => "WORK",
        Home => "HOME",
        Learning => "LEARNING",
    }
}

string_enum! {
    Priority {
        High => "HIGH",
        Medium => "MEDIUM",
        Low => "LOW",
    }
}

string_enum! {
    /// Progress of a todo. Any value may replace any other; there are no transition rules.
    Status {
        ToDo => "TO DO",
        InProgress => "IN PROGRESS",
        Done => "DONE",
    }
}

/// A persisted todo record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub todo: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    #[serde(rename = "dueDate")]
    pub due_date: NaiveDate,
}

/// A validated todo that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub todo: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub due_date: NaiveDate,
}

impl NewTodo {
    pub fn into_todo(self, id: Uuid) -> Todo {
        Todo {
            id,
            todo: self.todo,
            category: self.category,
            priority: self.priority,
            status: self.status,
            due_date: self.due_date,
        }
    }
}

/// Field-level changes for a partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub todo: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due_date: Option<NaiveDate>,
}

impl TodoChanges {
    /// Write the supplied fields onto an existing record
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(text) = &self.todo {
            todo.todo = text.clone();
        }
        if let Some(category) = self.category {
            todo.category = category;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
    }
}
