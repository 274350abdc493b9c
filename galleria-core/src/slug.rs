//! Title → slug derivation.
//!
//! The slug is the album's identity on disk (directory name, asset-path
//! prefix), so it must be lowercase, ASCII, and filesystem-safe on every
//! platform: transliterate unicode to ASCII, replace runs of anything
//! non-alphanumeric with a single hyphen, trim boundary hyphens.

use deunicode::deunicode;

use crate::error::CoreError;
use crate::types::AlbumId;

/// Derive the slug for a title.
///
/// Two distinct titles may derive the same slug; uniqueness among loaded
/// albums is the store's responsibility. An empty result (title with no
/// representable characters) is an error, never silently substituted.
pub fn derive(title: &str) -> Result<AlbumId, CoreError> {
    let ascii = deunicode(title);

    let mut slug = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        return Err(CoreError::EmptySlug {
            title: title.to_owned(),
        });
    }
    Ok(AlbumId(slug))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Summer 2021", "summer-2021")]
    #[case("  Léto u vody  ", "leto-u-vody")]
    #[case("Svatba — Šárka & Petr", "svatba-sarka-petr")]
    #[case("already-a-slug", "already-a-slug")]
    #[case("A--B__C", "a-b-c")]
    #[case("2020", "2020")]
    fn derives_expected_slug(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(derive(title).expect("slug").0, expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("---")]
    #[case("!!!")]
    fn empty_derivation_is_an_error(#[case] title: &str) {
        assert!(matches!(derive(title), Err(CoreError::EmptySlug { .. })));
    }
}
