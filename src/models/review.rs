// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reviews left on resources and the rating summary shown next to them.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::null_as_default;

/// Displayed instead of an average when a resource has no reviews.
pub const NO_RATING: &str = "New";

/// Reviewer columns joined onto a review row (`users(name)`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

/// Row of the `reviews` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub rating: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, rename = "users", skip_serializing_if = "Option::is_none")]
    pub author: Option<ReviewAuthor>,
}

impl Review {
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .unwrap_or("Anonymous")
    }
}

/// Review submitted by the current viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewReview {
    pub resource_id: Uuid,
    pub user_id: Uuid,
    pub rating: u8,
    pub comment: String,
}

/// Check a star rating lies in `1..=5`.
pub fn validate_rating(rating: u8) -> Result<u8> {
    if !(1..=5).contains(&rating) {
        bail!("Rating must be between 1 and 5");
    }
    Ok(rating)
}

/// Arithmetic mean of the ratings with one decimal, or [`NO_RATING`] when empty.
///
/// # Examples
///
/// ```rust,ignore
/// assert_eq!(average_rating(&[]), "New");
/// ```
pub fn average_rating(reviews: &[Review]) -> String {
    if reviews.is_empty() {
        return NO_RATING.to_string();
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    format!("{:.1}", f64::from(total) / reviews.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: u8) -> Review {
        Review {
            id: Uuid::new_v4(),
            resource_id: Uuid::nil(),
            rating,
            comment: String::new(),
            user_id: Uuid::nil(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            author: None,
        }
    }

    #[test]
    fn empty_reviews_show_new() {
        assert_eq!(average_rating(&[]), "New");
    }

    #[test]
    fn average_is_formatted_with_one_decimal() {
        assert_eq!(average_rating(&[review(5), review(3)]), "4.0");
        assert_eq!(average_rating(&[review(5), review(4), review(4)]), "4.3");
    }

    #[test]
    fn rating_bounds_are_enforced() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert_eq!(validate_rating(1).unwrap(), 1);
        assert_eq!(validate_rating(5).unwrap(), 5);
    }

    #[test]
    fn author_falls_back_to_anonymous() {
        let mut r = review(4);
        assert_eq!(r.author_name(), "Anonymous");
        r.author = Some(ReviewAuthor {
            name: Some("Meera".into()),
        });
        assert_eq!(r.author_name(), "Meera");
    }
}
