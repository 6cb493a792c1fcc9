use serde::{Deserialize, Deserializer};

/// `?page=` parsing: absent or non-numeric means the first page, numbers
/// below 1 become page 0 which is always out of range.
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().map_or(1, parse_page))
}

pub fn first_page() -> usize {
    1
}

fn parse_page(value: &str) -> usize {
    let value = value.trim();
    match value.parse::<i64>() {
        Ok(page) if page >= 1 => usize::try_from(page).unwrap_or(usize::MAX),
        Ok(_) => 0,
        // a number too large for i64 is still a number, just past every page
        Err(_) if is_integer(value) => 0,
        Err(_) => 1,
    }
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct PageQuery {
        #[serde(default = "first_page", deserialize_with = "deserialize_page")]
        page: usize,
    }

    fn page_of(query: &str) -> usize {
        serde_json::from_str::<PageQuery>(query).unwrap().page
    }

    #[test]
    fn page_parsing() {
        assert_eq!(page_of(r#"{}"#), 1);
        assert_eq!(page_of(r#"{"page": "3"}"#), 3);
        assert_eq!(page_of(r#"{"page": "abc"}"#), 1);
        assert_eq!(page_of(r#"{"page": ""}"#), 1);
        assert_eq!(page_of(r#"{"page": "0"}"#), 0);
        assert_eq!(page_of(r#"{"page": "-2"}"#), 0);
        assert_eq!(page_of(r#"{"page": "99999999999999999999"}"#), 0);
        assert_eq!(page_of(r#"{"page": "-99999999999999999999"}"#), 0);
        assert_eq!(page_of(r#"{"page": "+"}"#), 1);
    }
}
