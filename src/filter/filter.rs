use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};

use super::error::FilterError;
use super::types::{FilterOp, FilterWhereInfo, SqlParam};
use crate::types::Todo;

/// Conditions for listing todos. Every set field must match (logical AND).
///
/// Enumeration filters are kept as the raw request strings: a value outside
/// its enumeration is still a valid filter, it just matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    /// Case-insensitive regular expression applied to the todo text
    pub search: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl TodoFilter {
    /// All todos due on `date`
    pub fn due_on(date: NaiveDate) -> Self {
        Self { due_date: Some(date), ..Self::default() }
    }

    /// Column conditions in a stable order
    pub fn conditions(&self) -> Vec<FilterWhereInfo> {
        let mut conditions = vec![];
        if let Some(status) = &self.status {
            conditions.push(FilterWhereInfo { column: "status", operator: FilterOp::Eq, data: SqlParam::Text(status.clone()) });
        }
        if let Some(priority) = &self.priority {
            conditions.push(FilterWhereInfo { column: "priority", operator: FilterOp::Eq, data: SqlParam::Text(priority.clone()) });
        }
        if let Some(category) = &self.category {
            conditions.push(FilterWhereInfo { column: "category", operator: FilterOp::Eq, data: SqlParam::Text(category.clone()) });
        }
        if let Some(search) = &self.search {
            conditions.push(FilterWhereInfo { column: "todo", operator: FilterOp::IRegex, data: SqlParam::Text(search.clone()) });
        }
        if let Some(due_date) = self.due_date {
            conditions.push(FilterWhereInfo { column: "due_date", operator: FilterOp::Eq, data: SqlParam::Date(due_date) });
        }
        conditions
    }

    /// Compile the search pattern, if any
    pub fn search_regex(&self) -> Result<Option<Regex>, FilterError> {
        match &self.search {
            Some(pattern) => Ok(Some(RegexBuilder::new(pattern).case_insensitive(true).build()?)),
            None => Ok(None),
        }
    }

    /// In-process evaluation. `search` must be the result of [`TodoFilter::search_regex`].
    pub fn matches(&self, todo: &Todo, search: Option<&Regex>) -> bool {
        if let Some(status) = &self.status { if status != todo.status.as_str() { return false; } }
        if let Some(priority) = &self.priority { if priority != todo.priority.as_str() { return false; } }
        if let Some(category) = &self.category { if category != todo.category.as_str() { return false; } }
        if let Some(due_date) = self.due_date { if due_date != todo.due_date { return false; } }
        if let Some(re) = search { if !re.is_match(&todo.todo) { return false; } }
        true
    }
}
