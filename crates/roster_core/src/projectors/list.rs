//! The searchable profile table.

use super::contains_ignore_case;
use crate::domain::Profile;

/// Profiles whose first name, last name or email contains `search`,
/// ignoring case. Rows keep collection order; an empty term returns all.
pub fn list_rows<'a>(profiles: &'a [Profile], search: &str) -> Vec<&'a Profile> {
    let needle = search.to_lowercase();
    profiles
        .iter()
        .filter(|profile| {
            contains_ignore_case(&profile.first_name, &needle)
                || contains_ignore_case(&profile.last_name, &needle)
                || contains_ignore_case(&profile.email, &needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::tests::profile;
    use crate::domain::Weekday;

    #[test]
    fn empty_collection_yields_no_rows() {
        for term in ["", "a", "anything@else"] {
            assert!(list_rows(&[], term).is_empty());
        }
    }

    #[test]
    fn matches_any_of_the_three_fields_ignoring_case() {
        let mut with_email = profile("3", "Carl", "Stone", &[Weekday::Monday]);
        with_email.email = "ops-lead@Example.com".to_string();
        let profiles = vec![
            profile("1", "Alice", "Moreau", &[]),
            profile("2", "Bruno", "Alvarez", &[]),
            with_email,
        ];

        let ids = |term: &str| -> Vec<String> {
            list_rows(&profiles, term)
                .iter()
                .map(|p| p.id.to_string())
                .collect()
        };
        assert_eq!(ids("AL"), vec!["1", "2"]);
        assert_eq!(ids("ops-LEAD"), vec!["3"]);
        assert_eq!(ids(""), vec!["1", "2", "3"]);
        assert!(ids("zzz").is_empty());
    }

    #[test]
    fn phone_numbers_are_not_searched() {
        let profiles = vec![profile("1", "Dee", "Ng", &[])];
        assert!(list_rows(&profiles, "5550100").is_empty());
    }
}
