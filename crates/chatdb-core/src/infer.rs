use std::fmt;

/// Storage type derived from a batch of sample values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    DateTime,
    Varchar(usize),
}

impl ColumnType {
    pub fn is_textual(&self) -> bool {
        matches!(self, ColumnType::Varchar(_) | ColumnType::DateTime)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "INTEGER"),
            ColumnType::Float => write!(f, "FLOAT"),
            ColumnType::Boolean => write!(f, "BOOLEAN"),
            ColumnType::DateTime => write!(f, "DATETIME"),
            ColumnType::Varchar(len) => write!(f, "VARCHAR({})", len),
        }
    }
}

/// Source-side type knowledge, when the caller has any. A hint
/// short-circuits sample parsing for the scalar kinds; string sizing
/// always comes from the samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHint {
    Integer,
    Float,
    Boolean,
    DateTime,
}

const MAX_VARCHAR: usize = 500;
const DEFAULT_VARCHAR: usize = 255;

/// Derives a column type from sample values. Absent samples (None) are
/// skipped; a column with no present samples is a defined case and falls
/// back to the default-sized string type, not an error.
pub fn infer_type(hint: Option<TypeHint>, samples: &[Option<String>]) -> ColumnType {
    match hint {
        Some(TypeHint::Integer) => return ColumnType::Integer,
        Some(TypeHint::Float) => return ColumnType::Float,
        Some(TypeHint::Boolean) => return ColumnType::Boolean,
        Some(TypeHint::DateTime) => return ColumnType::DateTime,
        None => {}
    }

    let present: Vec<&str> = samples.iter().filter_map(|s| s.as_deref()).collect();
    if !present.is_empty() {
        if present.iter().all(|v| v.trim().parse::<i64>().is_ok()) {
            return ColumnType::Integer;
        }
        if present.iter().all(|v| v.trim().parse::<f64>().is_ok()) {
            return ColumnType::Float;
        }
        if present.iter().all(|v| is_boolean(v)) {
            return ColumnType::Boolean;
        }
        if present.iter().all(|v| is_datetime(v)) {
            return ColumnType::DateTime;
        }
    }

    // Sized at twice the longest observed value, capped. Length defaults
    // to 255 when every sample is absent.
    let max_len = present
        .iter()
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(DEFAULT_VARCHAR);
    ColumnType::Varchar((max_len * 2).min(MAX_VARCHAR))
}

/// Whether any sample in the batch is absent; drives the nullable flag on
/// ingested columns.
pub fn is_nullable(samples: &[Option<String>]) -> bool {
    samples.iter().any(|s| s.is_none())
}

/// Makes a raw header usable as a column identifier: trims whitespace and
/// maps spaces and hyphens to underscores.
pub fn normalize_column(name: &str) -> String {
    name.trim().replace(' ', "_").replace('-', "_")
}

fn is_boolean(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "false"
    )
}

fn is_datetime(value: &str) -> bool {
    let v = value.trim();
    chrono::NaiveDateTime::parse_from_str(v, "%Y-%m-%d %H:%M:%S").is_ok()
        || chrono::NaiveDate::parse_from_str(v, "%Y-%m-%d").is_ok()
        || chrono::DateTime::parse_from_rfc3339(v).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn integers_infer_integer() {
        assert_eq!(
            infer_type(None, &samples(&["1", "42", "-7"])),
            ColumnType::Integer
        );
    }

    #[test]
    fn any_float_infers_float() {
        assert_eq!(
            infer_type(None, &samples(&["1", "2.5", "3"])),
            ColumnType::Float
        );
    }

    #[test]
    fn booleans_infer_boolean() {
        assert_eq!(
            infer_type(None, &samples(&["true", "False", "TRUE"])),
            ColumnType::Boolean
        );
    }

    #[test]
    fn dates_infer_datetime() {
        assert_eq!(
            infer_type(None, &samples(&["2024-01-31", "2024-06-01 12:00:00"])),
            ColumnType::DateTime
        );
    }

    #[test]
    fn strings_are_sized_from_longest_sample() {
        // "Alexandria" is 10 chars -> 20
        assert_eq!(
            infer_type(None, &samples(&["Oslo", "Alexandria"])),
            ColumnType::Varchar(20)
        );
    }

    #[test]
    fn string_size_is_capped() {
        let long = "x".repeat(400);
        assert_eq!(
            infer_type(None, &[Some(long)]),
            ColumnType::Varchar(MAX_VARCHAR)
        );
    }

    #[test]
    fn all_absent_samples_fall_back_to_default_sizing() {
        assert_eq!(
            infer_type(None, &[None, None]),
            ColumnType::Varchar(MAX_VARCHAR)
        );
    }

    #[test]
    fn hint_short_circuits_sample_parsing() {
        assert_eq!(
            infer_type(Some(TypeHint::Float), &samples(&["not a number"])),
            ColumnType::Float
        );
    }

    #[test]
    fn absent_samples_are_skipped_for_inference() {
        let mixed = vec![Some("90".to_string()), None];
        assert_eq!(infer_type(None, &mixed), ColumnType::Integer);
        assert!(is_nullable(&mixed));
    }

    #[test]
    fn normalize_maps_spaces_and_hyphens() {
        assert_eq!(normalize_column("  first name "), "first_name");
        assert_eq!(normalize_column("zip-code"), "zip_code");
    }
}
