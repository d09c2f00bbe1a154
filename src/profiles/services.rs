use std::collections::HashMap;

use crate::profiles::dto::FrontPageEntry;
use crate::profiles::repo_types::LikeMindRow;

/// Groups like-mind rows into `username -> {profilePicture, shared interests}`,
/// the shape the front page renders from.
pub fn group_like_minds(rows: Vec<LikeMindRow>) -> HashMap<String, FrontPageEntry> {
    let mut grouped: HashMap<String, FrontPageEntry> = HashMap::new();
    for LikeMindRow {
        username,
        profile_picture,
        interest,
    } in rows
    {
        grouped
            .entry(username)
            .or_insert_with(|| FrontPageEntry {
                profile_picture,
                interests: Vec::new(),
            })
            .interests
            .push(interest);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(username: &str, picture: Option<&str>, interest: &str) -> LikeMindRow {
        LikeMindRow {
            username: username.into(),
            profile_picture: picture.map(Into::into),
            interest: interest.into(),
        }
    }

    #[test]
    fn groups_interests_per_username() {
        let rows = vec![
            row("ada", Some("ada.png"), "chess"),
            row("ada", Some("ada.png"), "hiking"),
            row("grace", None, "chess"),
        ];

        let grouped = group_like_minds(rows);
        assert_eq!(grouped.len(), 2);
        assert_eq!(
            grouped["ada"],
            FrontPageEntry {
                profile_picture: Some("ada.png".into()),
                interests: vec!["chess".into(), "hiking".into()],
            }
        );
        assert_eq!(grouped["grace"].profile_picture, None);
        assert_eq!(grouped["grace"].interests, vec!["chess".to_string()]);
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(group_like_minds(Vec::new()).is_empty());
    }
}
