//! Custom serde helpers for backend wire formats.

/// Deserializes a field the backend sends either as a JSON string or as a
/// JSON number into a `String`.
///
/// CoinCap sends `rank` as `"1"` on some API versions and as `1` on others.
pub mod string_or_number {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s,
            Raw::Int(n) => n.to_string(),
            Raw::Float(f) => f.to_string(),
        })
    }
}

/// Optional variant of [`string_or_number`]: `null` and missing map to `None`.
pub mod opt_string_or_number {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
            Raw::Str(s) => s,
            Raw::Int(n) => n.to_string(),
            Raw::Float(f) => f.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(with = "super::string_or_number")]
        rank: String,
        #[serde(default, with = "super::opt_string_or_number")]
        supply: Option<String>,
    }

    #[test]
    fn test_accepts_string_and_number() {
        let a: Row = serde_json::from_str(r#"{"rank":"3","supply":"21000000"}"#).unwrap();
        let b: Row = serde_json::from_str(r#"{"rank":3,"supply":null}"#).unwrap();
        assert_eq!(a.rank, "3");
        assert_eq!(b.rank, "3");
        assert_eq!(a.supply.as_deref(), Some("21000000"));
        assert_eq!(b.supply, None);
    }

    #[test]
    fn test_missing_optional_is_none() {
        let row: Row = serde_json::from_str(r#"{"rank":"1"}"#).unwrap();
        assert_eq!(row.supply, None);
    }
}
