//! SQL for the `passengers` table and the server-side CSV load.

/// Fixed schema. Column names double as JSON keys in `/data` responses, and
/// their order must match the CSV columns since the load maps by position.
pub const MYSQL_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS passengers (
    PassengerId INT,
    Survived INT,
    Pclass INT,
    Name VARCHAR(255),
    Sex VARCHAR(10),
    Age FLOAT,
    SibSp INT,
    Parch INT,
    Ticket VARCHAR(50),
    Fare FLOAT,
    Cabin VARCHAR(50),
    Embarked VARCHAR(1)
)
"#;

pub const TRUNCATE_PASSENGERS: &str = "TRUNCATE TABLE passengers";

pub const COUNT_PASSENGERS: &str = "SELECT COUNT(*) FROM passengers";

/// Rows returned by `/data`.
pub const SELECT_SAMPLE: &str = "SELECT * FROM passengers LIMIT 10";

/// Build the `LOAD DATA INFILE` statement for a path on the database host.
///
/// The statement cannot be prepared, so the path is inlined as a quoted
/// literal rather than bound.
pub fn load_data_infile(csv_path: &str) -> String {
    format!(
        "LOAD DATA INFILE {} \
         INTO TABLE passengers \
         FIELDS TERMINATED BY ',' \
         ENCLOSED BY '\"' \
         LINES TERMINATED BY '\\n' \
         IGNORE 1 ROWS",
        quote_literal(csv_path)
    )
}

/// Quote a value as a MySQL string literal.
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
