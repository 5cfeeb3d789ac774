use std::collections::HashMap;

use super::error::ApiError;

/// Query string values keyed by name, in order of appearance.
#[derive(Debug, Default, Clone)]
pub struct QueryParams(HashMap<String, Vec<String>>);

impl QueryParams {
    pub fn parse(query: Option<&str>) -> Self {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        if let Some(query) = query {
            for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
                values.entry(k.into_owned()).or_default().push(v.into_owned());
            }
        }
        Self(values)
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.first()).map(String::as_str)
    }
}

pub fn get_int_parameter(params: &QueryParams, name: &str) -> Result<i64, ApiError> {
    get_int_parameter_with_limit(params, name, i64::MIN, i64::MAX)
}

/// Parse `name` as a base-10 integer within `[min, max]`.
pub fn get_int_parameter_with_limit(
    params: &QueryParams,
    name: &str,
    min: i64,
    max: i64,
) -> Result<i64, ApiError> {
    let raw = params
        .first(name)
        .ok_or_else(|| ApiError::MissingParameter(name.to_string()))?;

    let value = raw
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidFormat(name.to_string()))?;

    if value < min || value > max {
        return Err(ApiError::OutOfRange {
            name: name.to_string(),
            min,
            max,
        });
    }

    Ok(value)
}
