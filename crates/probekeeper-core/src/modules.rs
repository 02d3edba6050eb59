//! Probe module list loading
//!
//! Operators declare the exporter's probe modules as a YAML blob. Both the
//! bare mapping form and one wrapped in a `modules:` key are accepted and
//! normalized to the same serialized representation.

use tracing::warn;

/// Normalize the configured module list, `None` if it cannot be parsed
///
/// Parse failures are logged and reported as `None`; the caller must leave
/// the previously rendered configuration in place.
pub fn load_modules(raw: &str) -> Option<String> {
    let value: serde_yaml::Value = match serde_yaml::from_str(raw) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, "failed to parse module list");
            return None;
        }
    };

    if value.is_null() {
        warn!("module list is empty");
        return None;
    }

    let key = serde_yaml::Value::String("modules".to_string());
    let modules = match &value {
        serde_yaml::Value::Mapping(mapping) => mapping.get(&key).cloned().unwrap_or(value),
        _ => value,
    };

    match serde_yaml::to_string(&modules) {
        Ok(normalized) => Some(normalized),
        Err(error) => {
            warn!(%error, "failed to serialize module list");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = "http_2xx:\n  prober: http\n  timeout: 5s\n";
    const WRAPPED: &str = "modules:\n  http_2xx:\n    prober: http\n    timeout: 5s\n";

    #[test]
    fn test_wrapped_and_bare_normalize_identically() {
        let bare = load_modules(BARE).unwrap();
        let wrapped = load_modules(WRAPPED).unwrap();

        assert_eq!(bare, wrapped);
        assert!(bare.contains("prober: http"));
    }

    #[test]
    fn test_invalid_yaml_returns_none() {
        assert!(load_modules("{http_2xx: [unclosed").is_none());
    }

    #[test]
    fn test_empty_input_returns_none() {
        assert!(load_modules("").is_none());
    }

    #[test]
    fn test_normalization_is_stable() {
        let first = load_modules(WRAPPED).unwrap();
        let second = load_modules(&format!("modules:\n{}", indent(&first))).unwrap();

        assert_eq!(first, second);
    }

    fn indent(yaml: &str) -> String {
        yaml.lines()
            .map(|line| format!("  {line}\n"))
            .collect::<String>()
    }
}
