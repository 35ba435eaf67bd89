// src/profiles/matcher.rs
use crate::profiles::Profile;

/// Picks the first profile, in declaration order, whose identifier occurs in `text`.
/// Case-sensitive literal containment; an empty identifier never matches.
pub fn match_profile<'a>(text: &str, profiles: &'a [Profile]) -> Option<&'a Profile> {
    profiles
        .iter()
        .find(|profile| {
            !profile.identifier.is_empty() && text.contains(profile.identifier.as_str())
        })
}
