use serde_json::{json, Map, Value};

use super::error::FilterError;
use super::filter::validate_identifier;
use super::types::{FilterOp, FilterWhereInfo, FilterWhereOptions};

/// Translates a JSON where-clause into a parameterised SQL predicate.
///
/// `{ "name": "x" }` is implicit equality, `{ "name": { "$ilike": "%x%" } }`
/// applies an operator, and `$and` / `$or` / `$not` nest sub-clauses. All
/// nested clauses share one parameter counter so placeholders stay unique.
pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(
        where_data: Option<&Value>,
        starting_param_index: usize,
        options: &FilterWhereOptions,
    ) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);

        let mut sql_conditions = vec![];
        if options.exclude_deleted {
            sql_conditions.push("\"deleted_at\" IS NULL".to_string());
        }
        if let Some(where_data) = where_data {
            sql_conditions.extend(filter_where.parse_clause(where_data)?);
        }

        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        Ok((where_clause, filter_where.param_values))
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::MalformedWhere("expected an object".to_string())),
        }
    }

    fn parse_clause(&mut self, where_data: &Value) -> Result<Vec<String>, FilterError> {
        let obj = match where_data {
            Value::Null => return Ok(vec![]),
            Value::Object(obj) => obj,
            _ => return Err(FilterError::MalformedWhere("expected an object".to_string())),
        };

        let mut sql_conditions = vec![];
        for (key, value) in obj {
            if key.starts_with('$') {
                sql_conditions.push(self.parse_logical_operator(key, value)?);
            } else {
                for condition in Self::parse_field_condition(key, value)? {
                    sql_conditions.push(self.build_sql_condition(&condition)?);
                }
            }
        }
        Ok(sql_conditions)
    }

    fn parse_logical_operator(&mut self, op: &str, value: &Value) -> Result<String, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::BadOperand { op: op.to_string(), expected: "an array of clauses" })?;

                if arr.is_empty() {
                    // Empty conjunction is true, empty disjunction is false
                    return Ok(if op == "$and" { "1=1" } else { "1=0" }.to_string());
                }

                let mut sql_parts = Vec::with_capacity(arr.len());
                for sub in arr {
                    sql_parts.push(self.wrap(sub)?);
                }
                let joiner = if op == "$and" { " AND " } else { " OR " };
                Ok(format!("({})", sql_parts.join(joiner)))
            }
            "$not" => Ok(format!("NOT {}", self.wrap(value)?)),
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    /// Parse a nested clause into a single parenthesised predicate
    fn wrap(&mut self, sub: &Value) -> Result<String, FilterError> {
        let parts = self.parse_clause(sub)?;
        if parts.is_empty() {
            return Ok("(1=1)".to_string());
        }
        Ok(format!("({})", parts.join(" AND ")))
    }

    fn parse_field_condition(field: &str, value: &Value) -> Result<Vec<FilterWhereInfo>, FilterError> {
        validate_identifier(field).map_err(FilterError::column)?;

        match value {
            Value::Object(obj) => obj
                .iter()
                .map(|(op_key, op_val)| {
                    let operator = FilterOp::parse(op_key)
                        .ok_or_else(|| FilterError::UnsupportedOperator(op_key.clone()))?;
                    Ok(FilterWhereInfo { column: field.to_string(), operator, data: op_val.clone() })
                })
                .collect(),
            // Implicit equality: { field: value }
            _ => Ok(vec![FilterWhereInfo { column: field.to_string(), operator: FilterOp::Eq, data: value.clone() }]),
        }
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let quoted_column = format!("\"{}\"", condition.column);
        let data = &condition.data;

        Ok(match condition.operator {
            FilterOp::Eq => {
                if data.is_null() { format!("{} IS NULL", quoted_column) }
                else { format!("{} = {}", quoted_column, self.param(data.clone())) }
            }
            FilterOp::Neq => {
                if data.is_null() { format!("{} IS NOT NULL", quoted_column) }
                else { format!("{} <> {}", quoted_column, self.param(data.clone())) }
            }
            FilterOp::Gt => format!("{} > {}", quoted_column, self.param(data.clone())),
            FilterOp::Gte => format!("{} >= {}", quoted_column, self.param(data.clone())),
            FilterOp::Lt => format!("{} < {}", quoted_column, self.param(data.clone())),
            FilterOp::Lte => format!("{} <= {}", quoted_column, self.param(data.clone())),
            FilterOp::Like => format!("{} LIKE {}", quoted_column, self.param(data.clone())),
            FilterOp::ILike => format!("{} ILIKE {}", quoted_column, self.param(data.clone())),
            FilterOp::In => match data {
                Value::Array(values) if values.is_empty() => "1=0".to_string(),
                Value::Array(values) => {
                    let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                    format!("{} IN ({})", quoted_column, params.join(", "))
                }
                _ => format!("{} = {}", quoted_column, self.param(data.clone())),
            },
            FilterOp::Between => match data {
                Value::Array(values) if values.len() == 2 => format!(
                    "{} BETWEEN {} AND {}",
                    quoted_column,
                    self.param(values[0].clone()),
                    self.param(values[1].clone())
                ),
                _ => return Err(FilterError::BadOperand { op: "$between".to_string(), expected: "a [low, high] pair" }),
            },
        })
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Escape LIKE wildcards so `term` only ever matches literally
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Where-clause matching rows whose `fields` contain `term`, case-insensitively.
/// Any one field matching is enough.
pub fn substring_match(fields: &[&str], term: &str) -> Value {
    let pattern = format!("%{}%", escape_like(term));
    let alternatives: Vec<Value> = fields
        .iter()
        .map(|field| {
            let mut condition = Map::new();
            condition.insert(field.to_string(), json!({ "$ilike": pattern }));
            Value::Object(condition)
        })
        .collect();
    json!({ "$or": alternatives })
}
