use tracing::info;

use crate::error::InputError;

/// Parse the answer to "Enter number of Cities:".
pub fn parse_city_count(raw: &str) -> Result<usize, InputError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => usize::try_from(n).map_err(|_| InputError::InvalidCount(raw.to_string())),
        _ => Err(InputError::InvalidCount(raw.to_string())),
    }
}

/// Trim every name and drop the ones left empty, keeping order.
pub fn clean_city_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .enumerate()
        .filter_map(|(i, name)| {
            let name = name.as_ref().trim();
            if name.is_empty() {
                info!(position = i + 1, "skipping blank city name");
                println!("Skipping empty city name (entry {})", i + 1);
                None
            } else {
                Some(name.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_counts_are_accepted() {
        assert_eq!(parse_city_count("3"), Ok(3));
        assert_eq!(parse_city_count("  2 \n"), Ok(2));
    }

    #[test]
    fn zero_negative_and_garbage_are_rejected() {
        for raw in ["0", "-1", "-40", "two", "", "1.5"] {
            assert_eq!(parse_city_count(raw), Err(InputError::InvalidCount(raw.to_string())));
        }
    }

    #[test]
    fn blank_names_are_skipped_and_others_trimmed() {
        let cleaned = clean_city_names([" London ", "", "   ", "Paris"]);
        assert_eq!(cleaned, ["London", "Paris"]);
    }

    #[test]
    fn cleaned_list_never_exceeds_input() {
        let input = vec!["a".to_string(), " ".to_string()];
        assert!(clean_city_names(&input).len() <= input.len());
    }
}
