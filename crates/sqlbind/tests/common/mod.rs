//! A tiny in-memory table that understands the statements `QueryBuilder` renders.
//!
//! Supports flat `AND` WHERE clauses made of `col op :param` and
//! `col IN (:p_1, ...)` fragments, `ORDER BY`, `LIMIT/OFFSET`, the
//! `COUNT(*) as count` projection, and `INSERT/UPDATE ... SET` lists.

#![allow(dead_code)]

use sqlbind::{Connection, Error, Params, Result, Row, Scalar};
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;

#[derive(Default)]
pub struct MemoryTable {
    rows: RefCell<Vec<Row>>,
    next_id: Cell<i64>,
    last_id: Cell<i64>,
    log: RefCell<Vec<String>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            ..Self::default()
        }
    }

    /// SQL of every statement run so far.
    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    fn lines(&self, sql: &str) -> Vec<String> {
        self.log.borrow_mut().push(sql.to_string());
        sql.trim_end_matches(';').lines().map(str::to_string).collect()
    }

    fn run_select(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        let lines = self.lines(sql);
        let columns = clause(&lines, "SELECT ").ok_or_else(|| bad(sql))?;

        let mut rows: Vec<Row> = self
            .rows
            .borrow()
            .iter()
            .filter(|row| matches_where(row, clause(&lines, "WHERE "), params))
            .cloned()
            .collect();

        if columns == "COUNT(*) as count" {
            return Ok(vec![Row::new().with("count", rows.len() as i64)]);
        }

        if let Some(order) = clause(&lines, "ORDER BY ") {
            let keys: Vec<(&str, bool)> = order
                .split(", ")
                .filter_map(|item| item.split_once(' '))
                .map(|(col, dir)| (col, dir == "ASC"))
                .collect();
            rows.sort_by(|a, b| {
                keys.iter()
                    .map(|(col, asc)| {
                        let ord = compare(a.get(col), b.get(col));
                        if *asc { ord } else { ord.reverse() }
                    })
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        if let Some(limit) = clause(&lines, "LIMIT ") {
            let mut parts = limit.split(" OFFSET ");
            let limit: usize = parts.next().and_then(|n| n.parse().ok()).ok_or_else(|| bad(sql))?;
            let offset: usize = parts.next().and_then(|n| n.parse().ok()).unwrap_or(0);
            rows = rows.into_iter().skip(offset).take(limit).collect();
        }

        Ok(rows.iter().map(|row| project(row, columns)).collect())
    }
}

fn bad(sql: &str) -> Error {
    Error::database(format!("unsupported statement: {sql}"))
}

fn clause<'a>(lines: &'a [String], keyword: &str) -> Option<&'a str> {
    lines.iter().find_map(|line| line.strip_prefix(keyword))
}

fn compare(a: Option<&Scalar>, b: Option<&Scalar>) -> Ordering {
    match (a, b) {
        (Some(Scalar::Text(a)), Some(Scalar::Text(b))) => a.cmp(b),
        (Some(a), Some(b)) => match (a.as_float(), b.as_float()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn lookup<'p>(params: &'p Params, placeholder: &str) -> Option<&'p Scalar> {
    params.get(placeholder.trim().trim_start_matches(':'))
}

fn matches_where(row: &Row, clause: Option<&str>, params: &Params) -> bool {
    let Some(clause) = clause else {
        return true;
    };
    clause.split(" AND ").all(|fragment| {
        if let Some((column, list)) = fragment.split_once(" IN (") {
            let value = row.get(column);
            return list
                .trim_end_matches(')')
                .split(", ")
                .any(|p| lookup(params, p) == value);
        }
        let mut parts = fragment.splitn(3, ' ');
        let (Some(column), Some(op), Some(placeholder)) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        let ord = compare(row.get(column), lookup(params, placeholder));
        match op {
            "=" => ord == Ordering::Equal,
            "!=" | "<>" => ord != Ordering::Equal,
            ">" => ord == Ordering::Greater,
            ">=" => ord != Ordering::Less,
            "<" => ord == Ordering::Less,
            "<=" => ord != Ordering::Greater,
            _ => false,
        }
    })
}

fn project(row: &Row, columns: &str) -> Row {
    if columns == "*" || columns.ends_with(".*") {
        return row.clone();
    }
    columns
        .split(',')
        .map(|col| match col.split_once(" as ") {
            Some((name, alias)) => (alias.to_string(), row.get(name).cloned().unwrap_or(Scalar::Null)),
            None => (col.to_string(), row.get(col).cloned().unwrap_or(Scalar::Null)),
        })
        .collect()
}

fn set_values(lines: &[String], params: &Params) -> Vec<(String, Scalar)> {
    clause(lines, "SET ")
        .map(|sets| {
            sets.split(',')
                .filter_map(|item| item.split_once(" = "))
                .map(|(col, p)| {
                    (
                        col.to_string(),
                        lookup(params, p).cloned().unwrap_or(Scalar::Null),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

impl Connection for MemoryTable {
    fn select_first(&self, sql: &str, params: &Params) -> Result<Option<Row>> {
        Ok(self.run_select(sql, params)?.into_iter().next())
    }

    fn select_all(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        self.run_select(sql, params)
    }

    fn exec(&self, sql: &str, params: &Params) -> Result<u64> {
        let lines = self.lines(sql);
        let head = lines.first().ok_or_else(|| bad(sql))?;

        if head.starts_with("INSERT INTO ") {
            let id = self.next_id.get();
            let mut row = Row::new().with("id", id);
            for (col, value) in set_values(&lines, params) {
                row.insert(col, value);
            }
            self.rows.borrow_mut().push(row);
            self.next_id.set(id + 1);
            self.last_id.set(id);
            return Ok(1);
        }

        let filter = clause(&lines, "WHERE ");
        if head.starts_with("UPDATE ") {
            let values = set_values(&lines, params);
            let mut affected = 0;
            for row in self.rows.borrow_mut().iter_mut() {
                if matches_where(row, filter, params) {
                    for (col, value) in &values {
                        row.insert(col.as_str(), value.clone());
                    }
                    affected += 1;
                }
            }
            return Ok(affected);
        }

        if head.starts_with("DELETE FROM ") {
            let mut rows = self.rows.borrow_mut();
            let before = rows.len();
            rows.retain(|row| !matches_where(row, filter, params));
            return Ok((before - rows.len()) as u64);
        }

        Err(bad(sql))
    }

    fn last_inserted_id(&self) -> Result<i64> {
        Ok(self.last_id.get())
    }
}
