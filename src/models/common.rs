use std::collections::HashMap;
use std::str::FromStr;

use super::search::FilterError;

/// Repeated-key view over a raw query string.
///
/// Values are trimmed on the way in and empty ones are dropped, so an empty
/// `min_ovr=` reads the same as a missing `min_ovr`.
#[derive(Debug, Default)]
pub struct QueryParams {
    values: HashMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                continue;
            }
            values
                .entry(k.into_owned())
                .or_default()
                .push(trimmed.to_string());
        }
        Self { values }
    }

    /// Last non-empty value for `key`.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(|v| v.last()).cloned()
    }

    pub fn get_vec(&self, key: &str) -> Vec<String> {
        self.values.get(key).cloned().unwrap_or_default()
    }

    pub fn get_number<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, FilterError> {
        self.get_string(key)
            .map(|raw| parse_number(key, &raw))
            .transpose()
    }

    pub fn get_numbers<T: FromStr>(&self, key: &'static str) -> Result<Vec<T>, FilterError> {
        self.values
            .get(key)
            .map(|values| values.iter().map(|raw| parse_number(key, raw)).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn parse_number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, FilterError> {
    raw.parse().map_err(|_| FilterError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Keeps the first occurrence of each value.
pub fn dedup_preserving_order<T: PartialEq>(values: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_dropped() {
        let params = QueryParams::parse("min_ovr=&max_ovr=%20&seasons=101");
        assert_eq!(params.get_string("min_ovr"), None);
        assert_eq!(params.get_string("max_ovr"), None);
        assert_eq!(params.get_vec("seasons"), vec!["101".to_string()]);
    }

    #[test]
    fn repeated_keys_are_collected_in_order() {
        let params = QueryParams::parse("positions=ST&positions=CAM&positions=GK");
        assert_eq!(params.get_vec("positions"), vec!["ST", "CAM", "GK"]);
    }

    #[test]
    fn numbers_report_their_field() {
        let params = QueryParams::parse("min_salary=cheap");
        let err = params.get_number::<i32>("min_salary").unwrap_err();
        assert!(matches!(err, FilterError::InvalidNumber { field: "min_salary", .. }));
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        assert_eq!(dedup_preserving_order(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
