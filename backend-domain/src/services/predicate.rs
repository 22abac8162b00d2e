use std::fmt;

use crate::entities::{amount_threshold, FilterCriteria};
use crate::value_objects::UserIdMatch;

/// A value bound to a positional `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Float(f64),
    Int(i64),
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Text(value) => write!(f, "'{}'", value),
            SqlParam::Float(value) => write!(f, "{}", value),
            SqlParam::Int(value) => write!(f, "{}", value),
        }
    }
}

/// Conjunctive predicate fragments paired positionally with their bound
/// parameters: fragment `i` references `$(i + 1)` only.
///
/// Fragment text is built from fixed column expressions and placeholder
/// numbers; filter values only ever travel in `params`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<String>,
    params: Vec<SqlParam>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn into_params(self) -> Vec<SqlParam> {
        self.params
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Placeholder number the next pushed parameter will get.
    pub fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }

    /// Appends a fragment; `render` receives the placeholder to reference.
    pub fn push(&mut self, render: impl FnOnce(usize) -> String, param: SqlParam) {
        let placeholder = self.next_placeholder();
        self.clauses.push(render(placeholder));
        self.params.push(param);
    }

    /// `WHERE a AND b`, or an empty string when nothing applies.
    pub fn where_clause(&self) -> String {
        self.where_clause_with(&[])
    }

    /// Like [`Predicate::where_clause`], with parameterless conditions that
    /// always apply placed ahead of the filter fragments.
    pub fn where_clause_with(&self, fixed: &[&str]) -> String {
        let parts: Vec<&str> = fixed
            .iter()
            .copied()
            .chain(self.clauses.iter().map(String::as_str))
            .collect();
        if parts.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", parts.join(" AND "))
        }
    }
}

/// Filters of the trend and histogram charts: day, score threshold and
/// exact user id.
pub fn analytics_predicate(criteria: &FilterCriteria) -> Predicate {
    let mut predicate = Predicate::new();
    push_date(&mut predicate, criteria);
    push_score_threshold(&mut predicate, criteria);
    push_user_id(&mut predicate, criteria, UserIdMatch::Exact);
    predicate
}

/// Filters of the export page: time window, user id substring and score
/// threshold.
pub fn export_predicate(criteria: &FilterCriteria) -> Predicate {
    let mut predicate = Predicate::new();
    if let Some(start) = criteria.start {
        predicate.push(
            |n| format!("timestamp >= ${}", n),
            SqlParam::Int(start.timestamp()),
        );
    }
    if let Some(end) = criteria.end {
        predicate.push(
            |n| format!("timestamp <= ${}", n),
            SqlParam::Int(end.timestamp()),
        );
    }
    push_date(&mut predicate, criteria);
    push_user_id(&mut predicate, criteria, UserIdMatch::Substring);
    push_score_threshold(&mut predicate, criteria);
    predicate
}

fn push_date(predicate: &mut Predicate, criteria: &FilterCriteria) {
    if let Some(day) = criteria.date {
        predicate.push(
            |n| format!("DATE(to_timestamp(timestamp)) = ${}::date", n),
            SqlParam::Text(day.format("%Y-%m-%d").to_string()),
        );
    }
}

fn push_score_threshold(predicate: &mut Predicate, criteria: &FilterCriteria) {
    if let Some(threshold) = criteria.effective_score_threshold() {
        predicate.push(
            |n| format!("amount >= ${}", n),
            SqlParam::Float(amount_threshold(threshold)),
        );
    }
}

fn push_user_id(predicate: &mut Predicate, criteria: &FilterCriteria, mode: UserIdMatch) {
    let Some(user_id) = criteria.user_id.as_deref() else {
        return;
    };
    match mode {
        UserIdMatch::Exact => predicate.push(
            |n| format!("user_id::text = ${}", n),
            SqlParam::Text(user_id.to_string()),
        ),
        UserIdMatch::Substring => predicate.push(
            |n| format!("user_id::text LIKE ${}", n),
            SqlParam::Text(format!("%{}%", user_id)),
        ),
    }
}
