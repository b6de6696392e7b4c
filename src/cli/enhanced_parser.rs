//! Enhanced argument parsing for CLI arguments that support both multiple flags and comma-separated values

/// Parse a vector of strings that may contain comma-separated values
///
/// Splits comma-separated items, trims whitespace and drops empty items.
///
/// # Examples
///
/// ```
/// use gspots::cli::enhanced_parser::parse_comma_separated;
///
/// // Mixed: -I "src/,tests/" -I lib/
/// let input = vec!["src/,tests/".to_string(), "lib/".to_string()];
/// let result = parse_comma_separated(input);
/// assert_eq!(result, vec!["src/", "tests/", "lib/"]);
/// ```
pub fn parse_comma_separated(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .flat_map(|item| {
            item.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<String>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated_single_values() {
        let input = vec!["src/".to_string(), "tests/".to_string()];
        assert_eq!(parse_comma_separated(input), vec!["src/", "tests/"]);
    }

    #[test]
    fn test_parse_comma_separated_with_spaces_and_empties() {
        let input = vec![" src/ , ,tests/ ".to_string(), ",".to_string()];
        assert_eq!(parse_comma_separated(input), vec!["src/", "tests/"]);
    }

    #[test]
    fn test_parse_comma_separated_empty() {
        assert!(parse_comma_separated(Vec::new()).is_empty());
    }
}
