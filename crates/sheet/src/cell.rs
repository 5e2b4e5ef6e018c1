use serde::{Deserialize, Serialize};

/// A single scalar cell as delivered by an upstream tabular source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl CellValue {
    /// Check if the value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Check if the value is a string cell
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, CellValue::String(_))
    }

    /// True for `Null` and for strings that are empty after trimming.
    ///
    /// Numbers and booleans are never blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Get the value as a string
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::String(s) => s.clone(),
        }
    }

    /// Value as it appears in an emitted record.
    ///
    /// Strings are trimmed, `Null` becomes the empty string and every other
    /// scalar keeps its native type.
    #[must_use]
    pub fn to_record_value(&self) -> CellValue {
        match self {
            CellValue::Null => CellValue::String(String::new()),
            CellValue::String(s) => CellValue::String(s.trim().to_string()),
            other => other.clone(),
        }
    }

    /// Parse a string into a `CellValue` with type inference
    /// Tries: null -> bool -> int -> float -> string
    #[must_use]
    pub fn parse(s: &str) -> CellValue {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return CellValue::Null;
        }

        // "1"/"0" stay numeric; only literal words become booleans
        match trimmed.to_lowercase().as_str() {
            "true" => return CellValue::Bool(true),
            "false" => return CellValue::Bool(false),
            _ => {}
        }

        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Int(i);
        }

        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }

        CellValue::String(s.to_string())
    }

    /// Convert a JSON scalar into a cell.
    ///
    /// Arrays and objects have no cell representation and are kept as their
    /// JSON text.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> CellValue {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(CellValue::Int)
                .or_else(|| n.as_f64().map(CellValue::Float))
                .unwrap_or_else(|| CellValue::String(n.to_string())),
            serde_json::Value::String(s) => CellValue::String(s.clone()),
            other => CellValue::String(other.to_string()),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_null() {
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse("  "), CellValue::Null);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(CellValue::parse("true"), CellValue::Bool(true));
        assert_eq!(CellValue::parse("FALSE"), CellValue::Bool(false));
        // yes/no are ordinary text in uploaded files
        assert_eq!(CellValue::parse("yes"), CellValue::String("yes".to_string()));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(CellValue::parse("42"), CellValue::Int(42));
        assert_eq!(CellValue::parse("-123"), CellValue::Int(-123));
        assert_eq!(CellValue::parse("2.5"), CellValue::Float(2.5));
        assert_eq!(CellValue::parse("NaN"), CellValue::String("NaN".to_string()));
    }

    #[test]
    fn test_is_blank() {
        assert!(CellValue::Null.is_blank());
        assert!(CellValue::String("   ".to_string()).is_blank());
        assert!(!CellValue::Int(0).is_blank());
        assert!(!CellValue::Bool(false).is_blank());
        assert!(!CellValue::String(" x ".to_string()).is_blank());
    }

    #[test]
    fn test_record_value_trims_and_pads() {
        assert_eq!(
            CellValue::String("  Alice ".to_string()).to_record_value(),
            CellValue::String("Alice".to_string())
        );
        assert_eq!(
            CellValue::Null.to_record_value(),
            CellValue::String(String::new())
        );
        assert_eq!(CellValue::Int(7).to_record_value(), CellValue::Int(7));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(CellValue::from_json(&json!(null)), CellValue::Null);
        assert_eq!(CellValue::from_json(&json!(3)), CellValue::Int(3));
        assert_eq!(CellValue::from_json(&json!(1.5)), CellValue::Float(1.5));
        assert_eq!(CellValue::from_json(&json!(true)), CellValue::Bool(true));
        assert_eq!(
            CellValue::from_json(&json!("x")),
            CellValue::String("x".to_string())
        );
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let values = vec![
            CellValue::Int(1),
            CellValue::String("a".to_string()),
            CellValue::Null,
        ];
        assert_eq!(serde_json::to_value(&values).unwrap(), json!([1, "a", null]));
    }
}
