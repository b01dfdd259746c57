//! WHERE conditions from query-string parameters.
//!
//! A [`FilterParsers`] maps parameter names to parsers. [`QueryFilter::new`] runs
//! every registered parser whose parameter is present, in registration order, and
//! collects the resulting conditions together with their argument values. The
//! values line up 1:1 with the placeholders of [`QueryFilter::conditions`].
//!
//! A SELECT drops conditions on columns its tables lack, and their placeholders
//! with them. Call [`QueryFilter::retain_for`] with the FROM schema first so the
//! arguments keep matching what is rendered.
//!
//! ```ignore
//! use std::collections::HashMap;
//! use sqlweave::filter::{self, FilterParsers, LikeMatch, QueryFilter};
//!
//! let parsers = FilterParsers::new()
//!     .add("name", filter::like_filter(col("fullName"), LikeMatch::Contains))
//!     .add("minAge", filter::int_gte(col("age")));
//!
//! let qs = HashMap::from([("name".to_string(), "ann".to_string())]);
//! let f = QueryFilter::new(&qs, &parsers).retain_for(&person);
//! let sql = select([col("*")]).from(&person).filter(f.conditions()).build()?;
//! ```

pub mod parse;

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::query::{Column, Predicate, kept_by_select_from};
use crate::schema::Schema;

/// Argument value bound to one placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

/// Turns one raw value into a condition and its arguments; `None` skips it.
///
/// The arguments must follow the placeholders of the condition one value per slot.
pub type FilterParser = Box<dyn Fn(&str) -> Option<(Predicate, Vec<Value>)> + Send + Sync>;

/// Parameter name to parser table, kept in registration order.
#[derive(Default)]
pub struct FilterParsers {
    parsers: Vec<(String, FilterParser)>,
}

impl FilterParsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `parser` for parameter `key`. A later registration for the same
    /// key replaces the earlier one but keeps its position.
    pub fn add(mut self, key: impl Into<String>, parser: FilterParser) -> Self {
        let key = key.into();
        match self.parsers.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = parser,
            None => self.parsers.push((key, parser)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for FilterParsers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.parsers.iter().map(|(k, _)| k))
            .finish()
    }
}

/// Conditions and arguments collected from a query string.
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    conditions: Vec<Predicate>,
    args: Vec<Value>,
}

impl QueryFilter {
    /// Run `parsers` over `query`.
    ///
    /// Empty values, parameters without a parser and values a parser rejects are
    /// skipped.
    pub fn new(query: &HashMap<String, String>, parsers: &FilterParsers) -> Self {
        let mut out = Self::default();
        for (key, parser) in &parsers.parsers {
            let Some(raw) = query.get(key) else {
                continue;
            };
            if raw.is_empty() {
                continue;
            }
            match parser(raw) {
                Some((cond, args)) if !args.is_empty() => {
                    out.conditions.push(cond);
                    out.args.extend(args);
                }
                _ => warn!(key = %key, value = %raw, "ignoring unparsable filter value"),
            }
        }
        out
    }

    /// AND of every accepted condition; empty when nothing was accepted.
    pub fn conditions(&self) -> Predicate {
        Predicate::and(self.conditions.iter().cloned())
    }

    /// Arguments in placeholder order.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn into_args(self) -> Vec<Value> {
        self.args
    }

    /// Keep only what a SELECT from `schema` renders.
    ///
    /// Comparisons on columns `schema` lacks are removed together with the
    /// arguments bound to their placeholders.
    pub fn retain_for(&self, schema: &Schema) -> QueryFilter {
        let mut args = self.args.iter();
        let mut out = QueryFilter::default();
        for cond in &self.conditions {
            if let Some(kept) = retain_node(cond, schema, &mut args, &mut out.args) {
                if !kept.is_empty() {
                    out.conditions.push(kept);
                }
            }
        }
        debug!(
            table = schema.table_name(),
            kept = out.conditions.len(),
            dropped = self.conditions.len() - out.conditions.len(),
            "filter retained for table"
        );
        out
    }
}

fn retain_node(
    node: &Predicate,
    schema: &Schema,
    args: &mut std::slice::Iter<'_, Value>,
    kept: &mut Vec<Value>,
) -> Option<Predicate> {
    match node {
        Predicate::Comparison(c) => {
            let n = c.variable.as_ref().map_or(0, |v| v.arg_count());
            let bound: Vec<&Value> = args.by_ref().take(n).collect();
            if !kept_by_select_from(c, schema) {
                return None;
            }
            kept.extend(bound.into_iter().cloned());
            Some(node.clone())
        }
        Predicate::Logical(logic, children) => Some(Predicate::Logical(
            *logic,
            children
                .iter()
                .filter_map(|child| retain_node(child, schema, args, kept))
                .collect(),
        )),
    }
}

/// Where the search text must appear in a LIKE filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeMatch {
    /// `%value%`
    Contains,
    /// `value%`
    StartsWith,
    /// `%value`
    EndsWith,
}

impl LikeMatch {
    fn pattern(self, v: &str) -> String {
        match self {
            LikeMatch::Contains => format!("%{v}%"),
            LikeMatch::StartsWith => format!("{v}%"),
            LikeMatch::EndsWith => format!("%{v}"),
        }
    }
}

/// `column LIKE ?` with the value wrapped per `mode`.
pub fn like_filter(column: Column, mode: LikeMatch) -> FilterParser {
    Box::new(move |v| {
        let pattern = mode.pattern(v);
        Some((Predicate::like(column.clone()), vec![Value::Text(pattern)]))
    })
}

/// `column ILIKE ?`, case-insensitive on Postgres.
pub fn ilike_filter(column: Column, mode: LikeMatch) -> FilterParser {
    Box::new(move |v| {
        let pattern = mode.pattern(v);
        Some((Predicate::ilike(column.clone()), vec![Value::Text(pattern)]))
    })
}

/// `column = ?` with the raw text.
pub fn equal_filter(column: Column) -> FilterParser {
    Box::new(move |v| Some((Predicate::eq(column.clone()), vec![Value::from(v)])))
}

/// `column IN (?, ...)` from a comma separated integer list.
pub fn in_int_filter(column: Column) -> FilterParser {
    Box::new(move |v| {
        let ints = parse::int_args(v);
        if ints.is_empty() {
            return None;
        }
        let cond = Predicate::in_list(column.clone(), ints.len());
        Some((cond, ints.into_iter().map(Value::Int).collect()))
    })
}

pub fn int_gte(column: Column) -> FilterParser {
    Box::new(move |v| {
        let i = parse::parse_int(v)?;
        Some((Predicate::gte(column.clone()), vec![Value::Int(i)]))
    })
}

pub fn int_lte(column: Column) -> FilterParser {
    Box::new(move |v| {
        let i = parse::parse_int(v)?;
        Some((Predicate::lte(column.clone()), vec![Value::Int(i)]))
    })
}

pub fn float_gte(column: Column) -> FilterParser {
    Box::new(move |v| {
        let f = parse::parse_float(v)?;
        Some((Predicate::gte(column.clone()), vec![Value::Float(f)]))
    })
}

pub fn float_lte(column: Column) -> FilterParser {
    Box::new(move |v| {
        let f = parse::parse_float(v)?;
        Some((Predicate::lte(column.clone()), vec![Value::Float(f)]))
    })
}

/// `column >= ?` for a time; see [`parse::parse_time`] for accepted forms.
pub fn time_gte(column: Column, layout: Option<&'static str>) -> FilterParser {
    Box::new(move |v| {
        let t = parse::parse_time(v, layout)?;
        Some((Predicate::gte(column.clone()), vec![Value::Timestamp(t)]))
    })
}

/// `column <= ?` for a time.
pub fn time_lte(column: Column, layout: Option<&'static str>) -> FilterParser {
    Box::new(move |v| {
        let t = parse::parse_time(v, layout)?;
        Some((Predicate::lte(column.clone()), vec![Value::Timestamp(t)]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Postgres;
    use crate::query::col;
    use crate::query::Statement;

    fn qs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn parsers() -> FilterParsers {
        FilterParsers::new()
            .add("name", like_filter(col("fullName"), LikeMatch::Contains))
            .add("minAge", int_gte(col("age")))
            .add("ids", in_int_filter(col("id")))
            .add("email", equal_filter(col("email")))
    }

    #[test]
    fn runs_in_registration_order() {
        let f = QueryFilter::new(
            &qs(&[("ids", "3,1,3"), ("name", "ann"), ("minAge", "18")]),
            &parsers(),
        );
        assert_eq!(
            f.conditions().to_sql(&Postgres).unwrap(),
            r#""fullName" LIKE ? AND "age" >= ? AND "id" IN (?, ?)"#
        );
        assert_eq!(
            f.args(),
            [
                Value::from("%ann%"),
                Value::Int(18),
                Value::Int(3),
                Value::Int(1)
            ]
        );
    }

    #[test]
    fn skips_empty_unknown_and_invalid() {
        let f = QueryFilter::new(
            &qs(&[("name", ""), ("unknown", "x"), ("minAge", "old"), ("ids", "a,b")]),
            &parsers(),
        );
        assert!(f.args().is_empty());
        assert_eq!(f.conditions().to_sql(&Postgres).unwrap(), "");
    }

    #[test]
    fn retain_for_drops_conditions_and_their_args() {
        let person = Schema::builder()
            .table_name("Person")
            .columns(["id", "fullName", "email"])
            .build()
            .unwrap();
        let f = QueryFilter::new(
            &qs(&[("ids", "3,1"), ("name", "ann"), ("minAge", "18"), ("email", "a@b")]),
            &parsers(),
        );
        assert_eq!(f.args().len(), 5);

        let kept = f.retain_for(&person);
        let sql = crate::query::select([col("id")])
            .from(&person)
            .filter(kept.conditions())
            .build()
            .unwrap();
        assert_eq!(
            sql,
            r#"SELECT "Person"."id" FROM "Person" WHERE "Person"."fullName" LIKE ? AND "Person"."id" IN (?, ?) AND "Person"."email" = ?"#
        );
        assert_eq!(
            kept.args(),
            [
                Value::from("%ann%"),
                Value::Int(3),
                Value::Int(1),
                Value::from("a@b")
            ]
        );
        assert_eq!(sql.matches('?').count(), kept.args().len());
    }

    #[test]
    fn retain_for_prunes_inside_groups() {
        let person = Schema::builder()
            .table_name("Person")
            .columns(["id", "fullName"])
            .build()
            .unwrap();
        let p = FilterParsers::new().add(
            "q",
            Box::new(|v: &str| {
                let cond = Predicate::or([
                    Predicate::like(col("nickName")),
                    Predicate::like(col("fullName")),
                ]);
                Some((cond, vec![Value::from(v), Value::from(v.to_uppercase())]))
            }),
        );
        let kept = QueryFilter::new(&qs(&[("q", "ann")]), &p).retain_for(&person);
        assert_eq!(kept.args(), [Value::from("ANN")]);
        assert_eq!(kept.conditions().to_sql(&Postgres).unwrap(), r#"("fullName" LIKE ?)"#);
    }

    #[test]
    fn like_patterns() {
        assert_eq!(LikeMatch::Contains.pattern("a"), "%a%");
        assert_eq!(LikeMatch::StartsWith.pattern("a"), "a%");
        assert_eq!(LikeMatch::EndsWith.pattern("a"), "%a");
    }

    #[test]
    fn later_registration_replaces_parser() {
        let p = FilterParsers::new()
            .add("q", equal_filter(col("a")))
            .add("q", equal_filter(col("b")));
        assert_eq!(p.len(), 1);
        let f = QueryFilter::new(&qs(&[("q", "x")]), &p);
        assert_eq!(f.conditions().to_sql(&Postgres).unwrap(), r#""b" = ?"#);
    }

    #[test]
    fn time_filters_parse_epoch() {
        let p = FilterParsers::new().add("since", time_gte(col("createdAt"), None));
        let f = QueryFilter::new(&qs(&[("since", "0")]), &p);
        assert_eq!(f.args().len(), 1);
        assert!(matches!(f.args()[0], Value::Timestamp(_)));
    }

    #[test]
    fn values_serialize_untagged() {
        let values = vec![Value::Int(1), Value::from("x"), Value::Bool(true)];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1,"x",true]"#);
    }
}
