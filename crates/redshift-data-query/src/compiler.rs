//! SQL compilation.
//!
//! Every selected column is rendered to text and coalesced to `''`, then
//! aliased back to its own name so results can be looked up by field name
//! whatever the cast expression looks like:
//!
//! ```text
//! /* Redshift Data API Connector query */
//! SELECT
//!   COALESCE("name", '') AS "name",
//!   COALESCE(TO_CHAR("created_at", 'YYYYMMDDHH24MISS'), '') AS "created_at"
//! FROM "dev"."public"."users"
//! WHERE
//!   ("country" IN ('JP', 'US'))
//!   AND (("age" >= 20)
//!   OR "name" IS NULL)
//! ```
//!
//! A filter the compiler cannot render becomes `1 = 1`; the query still
//! runs, but [`CompiledQuery::filters_applied`] reports `false` so the
//! consumer knows it must filter the rows itself.

use tracing::{debug, warn};

use redshift_data_core::TableRef;

use crate::error::{QueryError, QueryResult};
use crate::field_type::FieldType;
use crate::filter::{DimensionFilter, FilterOperator};
use crate::schema::SchemaField;

/// Leading comment marking statements issued by the connector.
pub const QUERY_COMMENT: &str = "/* Redshift Data API Connector query */";

const TAUTOLOGY: &str = "1 = 1";

/// Literal rendering settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Double embedded quotes in literals and identifiers, and only inline
    /// numeric-comparison values that parse as finite numbers.
    pub escape_literals: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            escape_literals: true,
        }
    }
}

impl CompileOptions {
    /// Interpolate filter values verbatim, as the legacy connector did.
    ///
    /// Values containing quotes produce broken (or injected) SQL in this
    /// mode; it exists to compare output with the legacy rendering.
    #[must_use]
    pub fn compatible() -> Self {
        Self {
            escape_literals: false,
        }
    }
}

/// Output of [`QueryCompiler::compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    /// The statement text.
    pub sql: String,
    /// True only if filters were supplied and every one of them was
    /// rendered.
    pub filters_applied: bool,
}

/// Builds connector `SELECT` statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryCompiler {
    options: CompileOptions,
}

impl QueryCompiler {
    /// Create a compiler.
    #[must_use]
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// The literal rendering settings.
    #[must_use]
    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Compile a `SELECT` of `columns` from `table`, restricted by `filters`.
    ///
    /// Empty OR-groups are ignored.
    pub fn compile(
        &self,
        table: &TableRef,
        columns: &[SchemaField],
        filters: Option<&[Vec<DimensionFilter>]>,
    ) -> QueryResult<CompiledQuery> {
        if columns.is_empty() {
            return Err(QueryError::NoColumns);
        }

        let select_list = columns
            .iter()
            .map(|field| self.column_expression(field))
            .collect::<Vec<_>>()
            .join(",\n  ");

        let mut sql = format!(
            "{QUERY_COMMENT}\nSELECT \n  {select_list}\nFROM {}\n",
            table.quoted()
        );

        let groups: Vec<&Vec<DimensionFilter>> = filters
            .unwrap_or_default()
            .iter()
            .filter(|group| !group.is_empty())
            .collect();

        let mut unsupported = 0usize;
        if !groups.is_empty() {
            let mut rendered_groups = Vec::with_capacity(groups.len());
            for group in &groups {
                let mut rendered = Vec::with_capacity(group.len());
                for filter in *group {
                    if let Some(predicate) = self.render_filter(filter) {
                        rendered.push(predicate);
                    } else {
                        warn!(
                            field = %filter.field_name,
                            operator = %filter.operator,
                            values = filter.values.len(),
                            "filter not supported, leaving it to the consumer"
                        );
                        unsupported += 1;
                        rendered.push(TAUTOLOGY.to_owned());
                    }
                }
                rendered_groups.push(format!("({})", rendered.join("\n  OR ")));
            }
            sql.push_str("WHERE\n  ");
            sql.push_str(&rendered_groups.join("\n  AND "));
        }

        let filters_applied = !groups.is_empty() && unsupported == 0;
        debug!(
            table = %table,
            columns = columns.len(),
            filter_groups = groups.len(),
            unsupported,
            filters_applied,
            "compiled query"
        );
        Ok(CompiledQuery {
            sql,
            filters_applied,
        })
    }

    /// `COALESCE(<text rendering>, '') AS "<name>"`.
    #[must_use]
    pub fn column_expression(&self, field: &SchemaField) -> String {
        let column = self.identifier(&field.name);
        let expr = match field.field_type {
            FieldType::Text => column.clone(),
            FieldType::Boolean => format!("CASE WHEN {column} THEN 'true' ELSE 'false' END"),
            FieldType::Number => format!("{column}::VARCHAR"),
            temporal => match temporal.to_char_format() {
                Some(format) => format!("TO_CHAR({column}, '{format}')"),
                None => format!("{column}::VARCHAR"),
            },
        };
        format!("COALESCE({expr}, '') AS {column}")
    }

    /// Render one atomic filter, or `None` if it cannot be expressed.
    fn render_filter(&self, filter: &DimensionFilter) -> Option<String> {
        let field = self.identifier(&filter.field_name);
        let exclude = filter.is_exclude();
        let not = if exclude { " NOT" } else { "" };
        let values = &filter.values;

        match &filter.operator {
            FilterOperator::Equals | FilterOperator::InList => {
                if values.is_empty() {
                    return None;
                }
                let list = values
                    .iter()
                    .map(|v| self.literal(v))
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!("{field}{not} IN ({list})"))
            }
            FilterOperator::Contains => {
                if values.is_empty() {
                    return None;
                }
                let body = values
                    .iter()
                    .map(|v| format!("{field}{not} LIKE {}", self.literal(&format!("%{v}%"))))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                Some(format!("({body})"))
            }
            FilterOperator::RegexpPartialMatch | FilterOperator::RegexpExactMatch => {
                if values.is_empty() {
                    return None;
                }
                let op = if exclude { "!~" } else { "~" };
                let body = values
                    .iter()
                    .map(|v| format!("{field} {op} {}", self.literal(v)))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                Some(format!("({body})"))
            }
            FilterOperator::IsNull => {
                let not = if exclude { "NOT " } else { "" };
                Some(format!("{field} IS {not}NULL"))
            }
            FilterOperator::Between => {
                let [low, high, ..] = values.as_slice() else {
                    return None;
                };
                Some(format!(
                    "{field}{not} BETWEEN {} AND {}",
                    self.literal(low),
                    self.literal(high)
                ))
            }
            operator => {
                let comparison = operator.comparison()?;
                if values.is_empty() {
                    return None;
                }
                let numbers = values
                    .iter()
                    .map(|v| self.number(v))
                    .collect::<Option<Vec<_>>>()?;
                let body = numbers
                    .iter()
                    .map(|n| format!("{field} {comparison} {n}"))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                Some(if exclude {
                    format!("NOT ({body})")
                } else {
                    format!("({body})")
                })
            }
        }
    }

    fn identifier(&self, name: &str) -> String {
        if self.options.escape_literals {
            format!("\"{}\"", name.replace('"', "\"\""))
        } else {
            format!("\"{name}\"")
        }
    }

    fn literal(&self, value: &str) -> String {
        if self.options.escape_literals {
            format!("'{}'", value.replace('\'', "''"))
        } else {
            format!("'{value}'")
        }
    }

    fn number<'a>(&self, value: &'a str) -> Option<&'a str> {
        if !self.options.escape_literals {
            return Some(value);
        }
        let trimmed = value.trim();
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(|_| trimmed)
    }
}
