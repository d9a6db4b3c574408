//! Instruction templates for the statement generator. Each task variant
//! gets its own template fixing the expected output shape; grounding
//! context (schema text, table name) is interpolated verbatim.

use crate::model::RowSet;

pub fn create_table(description: &str) -> String {
    format!(
        r#"You are a SQL expert. Convert the following natural language description into a SQLite CREATE TABLE statement.

User description: "{description}"

Requirements:
- Use appropriate data types (INTEGER, VARCHAR, FLOAT, DATE, etc.)
- Include PRIMARY KEY where appropriate
- Use NOT NULL constraints when fields are essential
- Return ONLY the SQL statement, no explanation

Example:
Input: "Create a table called students with id, name, and gpa"
Output: CREATE TABLE students (id INTEGER PRIMARY KEY AUTOINCREMENT, name VARCHAR(100) NOT NULL, gpa FLOAT);

Now generate the CREATE TABLE statement:"#
    )
}

pub fn insert_rows(table: &str, description: &str) -> String {
    format!(
        r#"You are a SQL expert. Convert the following natural language description into SQLite INSERT statements for the table '{table}'.

User description: "{description}"

Requirements:
- Generate INSERT INTO statements
- Infer appropriate values and data types
- Return ONLY the SQL statements, one per line, no explanation
- Use single quotes for strings

Example:
Input for table 'students': "Add Alice with GPA 3.8 and Bob with GPA 3.5"
Output:
INSERT INTO students (name, gpa) VALUES ('Alice', 3.8);
INSERT INTO students (name, gpa) VALUES ('Bob', 3.5);

Now generate the INSERT statements:"#
    )
}

pub fn select_query(question: &str, schema: &str) -> String {
    format!(
        r#"You are a SQL expert. Convert the following question into a SQLite SELECT query.

Table Schema:
{schema}

Question: "{question}"

Requirements:
- Write a valid SQLite SELECT query
- Use appropriate WHERE, ORDER BY, GROUP BY, LIMIT clauses as needed
- Return ONLY the SQL query, no explanation

Example:
Schema: Table students (id INTEGER, name VARCHAR, gpa FLOAT)
Question: "Which students have GPA above 3.5?"
Output: SELECT name, gpa FROM students WHERE gpa > 3.5;

Now generate the SQL query:"#
    )
}

pub fn explain_result(question: &str, sql: &str, rows: &RowSet) -> String {
    let results = serde_json::to_string(&rows.rows).unwrap_or_default();
    format!(
        r#"You are a helpful assistant. Explain the following database query results in simple, natural language.

Question: "{question}"
SQL Query: {sql}
Results: {results}

Provide a brief, clear explanation (2-3 sentences maximum) of what the results show.

Example:
Question: "Which students have GPA above 3.5?"
Results: [["Alice", 3.8], ["Bob", 3.9]]
Explanation: "Two students have a GPA above 3.5: Alice with 3.8 and Bob with 3.9."

Now provide your explanation:"#
    )
}
