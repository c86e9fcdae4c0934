use crate::param::ParamList;
use std::time::Duration;

/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    /// Other SQL (e.g., DDL, MERGE, EXEC)
    Other,
}

impl QueryType {
    /// Detect query type from SQL text, skipping leading `/* ... */` comments.
    pub fn from_sql(sql: &str) -> Self {
        let mut rest = sql.trim_start();
        while let Some(after) = rest.strip_prefix("/*") {
            rest = match after.find("*/") {
                Some(end) => after[end + 2..].trim_start(),
                None => "",
            };
        }

        let keyword: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_uppercase();
        match keyword.as_str() {
            "SELECT" => QueryType::Select,
            "INSERT" => QueryType::Insert,
            "UPDATE" => QueryType::Update,
            "DELETE" => QueryType::Delete,
            _ => QueryType::Other,
        }
    }
}

/// Receives one entry per executed statement.
pub trait QueryLogger: Send + Sync {
    /// Called after a statement ran successfully.
    ///
    /// `args` is `None` when the statement ran without supplied parameters.
    fn log(&self, sql: &str, args: Option<&ParamList>, duration: Duration);
}

impl<L: QueryLogger + ?Sized> QueryLogger for std::sync::Arc<L> {
    fn log(&self, sql: &str, args: Option<&ParamList>, duration: Duration) {
        (**self).log(sql, args, duration)
    }
}
