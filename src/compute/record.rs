use serde::de::DeserializeOwned;

use crate::error::InvocationError;

/// Decode the JSON record a computation printed on stdout.
///
/// The whole trimmed output is tried first; failing that, the last line that
/// decodes as `T` wins, so progress logging before the record is tolerated.
pub fn decode_record<T: DeserializeOwned>(stdout: &str) -> Result<T, InvocationError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Err(InvocationError::MalformedOutput {
            reason: "empty output".to_string(),
        });
    }

    let whole_err = match serde_json::from_str::<T>(trimmed) {
        Ok(record) => return Ok(record),
        Err(e) => e,
    };

    trimmed
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .find_map(|line| serde_json::from_str::<T>(line).ok())
        .ok_or_else(|| InvocationError::MalformedOutput {
            reason: whole_err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        x: i32,
    }

    #[test]
    fn test_whole_output() {
        let p: Point = decode_record("  {\"x\": 4}\n").unwrap();
        assert_eq!(p, Point { x: 4 });
    }

    #[test]
    fn test_record_after_progress_lines() {
        let out = "Fetching data...\n{\"x\": 1}\nDone\n{\"x\": 2}\n";
        let p: Point = decode_record(out).unwrap();
        assert_eq!(p, Point { x: 2 });
    }

    #[test]
    fn test_malformed() {
        let err = decode_record::<Point>("not json").unwrap_err();
        assert_eq!(err.kind(), "malformed_output");
        assert!(decode_record::<Point>("   ").is_err());
        assert!(decode_record::<Point>("{\"y\": 1}").is_err());
    }
}
