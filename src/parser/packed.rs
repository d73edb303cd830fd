//! Packed numeric strings used by plist dialects.
//!
//! Rectangles and points are stored as text such as `"{{2,4},{30,40}}"`,
//! `"{2,4,30,40}"` or `"{-1.5,3}"`. Braces are dropped, the remainder is
//! split on commas and every component is parsed as a float and floored.

use crate::error::{Result, UnpxError};

/// Parse every numeric component of a packed string.
pub fn parse_packed(s: &str) -> Result<Vec<i64>> {
    let stripped: String = s.chars().filter(|c| *c != '{' && *c != '}').collect();

    if stripped.trim().is_empty() {
        return Err(UnpxError::Parse {
            message: format!("Empty packed value '{}'", s),
            help: Some("Expected a value like {x,y,w,h} or {w,h}".to_string()),
        });
    }

    stripped
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.floor() as i64)
                .ok_or_else(|| UnpxError::Parse {
                    message: format!("Invalid number '{}' in packed value '{}'", part, s),
                    help: None,
                })
        })
        .collect()
}

/// Parse a packed value with exactly `N` components.
pub fn parse_packed_n<const N: usize>(s: &str) -> Result<[i64; N]> {
    let values = parse_packed(s)?;
    values.try_into().map_err(|values: Vec<i64>| UnpxError::Parse {
        message: format!(
            "Packed value '{}' has {} components, expected {}",
            s,
            values.len(),
            N
        ),
        help: None,
    })
}

/// Parse `{x,y,w,h}` (or `{{x,y},{w,h}}`).
pub fn parse_packed_rect(s: &str) -> Result<[i64; 4]> {
    parse_packed_n::<4>(s)
}

/// Parse `{a,b}`.
pub fn parse_packed_pair(s: &str) -> Result<[i64; 2]> {
    parse_packed_n::<2>(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_rect_with_float() {
        assert_eq!(parse_packed("{10,20,30.5,40}").unwrap(), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_parse_nested_rect() {
        assert_eq!(parse_packed_rect("{{2,4},{30,40}}").unwrap(), [2, 4, 30, 40]);
    }

    #[test]
    fn test_parse_pair_with_spaces() {
        assert_eq!(parse_packed_pair("{ 12 , 7 }").unwrap(), [12, 7]);
    }

    #[test]
    fn test_negative_values_floor() {
        assert_eq!(parse_packed_pair("{-1.5,2.9}").unwrap(), [-2, 2]);
    }

    #[test]
    fn test_negative_fraction_floors_away_from_zero() {
        assert_eq!(parse_packed_pair("{-0.5,0}").unwrap(), [-1, 0]);
        assert_eq!(parse_packed_pair("{-0.0,0.5}").unwrap(), [0, 0]);
    }

    #[test]
    fn test_wrong_arity() {
        assert!(parse_packed_rect("{1,2}").is_err());
        assert!(parse_packed_pair("{1,2,3}").is_err());
    }

    #[test]
    fn test_invalid_component() {
        assert!(parse_packed("{1,abc}").is_err());
        assert!(parse_packed("{1,}").is_err());
        assert!(parse_packed("{}").is_err());
        assert!(parse_packed("{nan,1}").is_err());
    }
}
