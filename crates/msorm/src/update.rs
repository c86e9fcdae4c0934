//! UPDATE compilation and execution for SQL Server.

use crate::bind::{BlobHolder, ExpressionField, bind_arguments, bind_expressions, bind_values};
use crate::condition::{CompiledCondition, Condition};
use crate::config::QueryOptions;
use crate::connection::{ColumnInformation, Connection, Dialect, Schema};
use crate::error::{OrmError, OrmResult};
use crate::param::ParamList;
use crate::statement::Statement;
use crate::traits::MutationQuery;
use crate::value::Value;

/// Default prefix of the numbered SET placeholders.
pub const DEFAULT_PLACEHOLDER_PREFIX: &str = ":placeholder_";

/// UPDATE query.
///
/// Expression fields take precedence over literal fields of the same name,
/// and a write to the table's identity column is dropped before execution.
pub struct UpdateQuery {
    table: String,
    fields: Vec<(String, Value)>,
    expression_fields: Vec<(String, ExpressionField)>,
    condition: Option<Box<dyn Condition>>,
    comments: Vec<String>,
    placeholder_prefix: String,
    options: QueryOptions,
}

impl UpdateQuery {
    /// Create a new UPDATE query for the given table.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            fields: Vec::new(),
            expression_fields: Vec::new(),
            condition: None,
            comments: Vec::new(),
            placeholder_prefix: DEFAULT_PLACEHOLDER_PREFIX.to_string(),
            options: QueryOptions::default(),
        }
    }

    /// Set a field to a literal value. Setting a field twice keeps its
    /// original position and replaces the value.
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        upsert(&mut self.fields, field, value.into());
        self
    }

    /// Set several literal fields, in order.
    pub fn fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (field, value) in fields {
            upsert(&mut self.fields, field.as_ref(), value.into());
        }
        self
    }

    /// Set a field to a SQL expression.
    pub fn expression(self, field: &str, expression: &str) -> Self {
        self.expression_with(field, ExpressionField::new(expression))
    }

    /// Set a field to a SQL expression with its own arguments.
    pub fn expression_with(mut self, field: &str, expression: ExpressionField) -> Self {
        upsert(&mut self.expression_fields, field, expression);
        self
    }

    /// Restrict the rows to update.
    pub fn condition(mut self, condition: impl Condition + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    /// Add a comment emitted in front of the statement.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    /// Override the SET placeholder prefix.
    pub fn placeholder_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.placeholder_prefix = prefix.into();
        self
    }

    /// Options passed to the statement on execute.
    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn compiled_condition(&self, dialect: &dyn Dialect) -> Option<CompiledCondition> {
        self.condition
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| c.compile(dialect))
    }

    fn has_expression(&self, field: &str) -> bool {
        self.expression_fields.iter().any(|(f, _)| f == field)
    }

    fn build_sql(
        &self,
        dialect: &dyn Dialect,
        fields: &[(String, Value)],
        condition: Option<&CompiledCondition>,
    ) -> String {
        let prefix = dialect.make_comment(&self.comments);

        let mut update_fields = Vec::with_capacity(fields.len() + self.expression_fields.len());
        for (field, data) in &self.expression_fields {
            update_fields.push(format!(
                "{}={}",
                dialect.quote_identifier(field),
                data.expression
            ));
        }

        let literal = fields.iter().filter(|(f, _)| !self.has_expression(f));
        for (n, (field, _)) in literal.enumerate() {
            update_fields.push(format!(
                "{}={}{}",
                dialect.quote_identifier(field),
                self.placeholder_prefix,
                n
            ));
        }

        let mut sql = format!(
            "{prefix}UPDATE {{{}}} SET {}",
            dialect.escape_table(&self.table),
            update_fields.join(", ")
        );
        if let Some(condition) = condition {
            sql.push_str("\nWHERE ");
            sql.push_str(&condition.sql);
        }
        sql
    }

    /// The literal fields that survive identity protection.
    fn writable_fields(&self, info: &ColumnInformation) -> Vec<(String, Value)> {
        let mut fields = self.fields.clone();
        if let Some(identity) = info.identity.as_deref() {
            let before = fields.len();
            fields.retain(|(f, _)| f != identity);
            if fields.len() != before {
                tracing::debug!(
                    target: "msorm.update",
                    table = %self.table,
                    column = %identity,
                    "dropping write to identity column"
                );
            }
        }
        fields
    }

    fn bind_and_run<C: Connection>(
        &self,
        stmt: &mut Statement<'_, C>,
        mut fields: Vec<(String, Value)>,
        blobs: &mut BlobHolder,
        info: &ColumnInformation,
        condition: Option<&CompiledCondition>,
    ) -> OrmResult<()> {
        let native = stmt.native_mut()?;
        bind_expressions(native, &self.expression_fields, &mut fields)?;
        bind_values(native, &fields, blobs, &self.placeholder_prefix, info)?;
        if let Some(condition) = condition {
            bind_arguments(native, &condition.arguments)?;
        }

        let options = self.options.clone().already_prepared(true);
        stmt.execute(&ParamList::new(), &options)?;
        Ok(())
    }
}

fn upsert<V>(entries: &mut Vec<(String, V)>, key: &str, value: V) {
    match entries.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key.to_string(), value)),
    }
}

impl MutationQuery for UpdateQuery {
    /// Compile with the fields as given; identity protection only applies on
    /// execute.
    fn to_sql(&self, dialect: &dyn Dialect) -> String {
        let condition = self.compiled_condition(dialect);
        self.build_sql(dialect, &self.fields, condition.as_ref())
    }

    fn validate(&self) -> OrmResult<()> {
        if self.fields.is_empty() && self.expression_fields.is_empty() {
            return Err(OrmError::validation(format!(
                "UPDATE {}: SET clause cannot be empty",
                self.table
            )));
        }
        Ok(())
    }

    fn execute<C: Connection>(&self, conn: &C) -> OrmResult<u64> {
        self.validate()?;

        let info = conn.schema().query_column_information(&self.table)?;
        let fields = self.writable_fields(&info);
        if fields.is_empty() && self.expression_fields.is_empty() {
            tracing::debug!(
                target: "msorm.update",
                table = %self.table,
                "nothing left to update after identity protection"
            );
            return Ok(0);
        }

        let condition = self.compiled_condition(conn);
        let sql = self.build_sql(conn, &fields, condition.as_ref());
        let mut stmt = conn.prepare_query(&sql)?;

        let mut blobs = BlobHolder::new();
        let result = self.bind_and_run(&mut stmt, fields, &mut blobs, &info, condition.as_ref());
        blobs.release(stmt.handle_mut());
        result?;

        Ok(stmt.row_count())
    }
}

impl std::fmt::Debug for UpdateQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateQuery")
            .field("table", &self.table)
            .field("fields", &self.fields)
            .field("expression_fields", &self.expression_fields)
            .field("has_condition", &self.condition.is_some())
            .field("comments", &self.comments)
            .finish()
    }
}
