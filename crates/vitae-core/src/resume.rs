//! The résumé aggregate — a root record plus four owned child collections.
//!
//! A résumé exists in two shapes: [`NewResume`] before persistence (no id,
//! no timestamps) and [`Resume`] afterwards. The store assigns the id and
//! timestamps at first insert; whether a call is an insert or an update is
//! therefore decided by the type, not by an edit-mode flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row id of a persisted résumé. Assigned by the backend, immutable once set.
pub type ResumeId = i64;

// ─── Child entries ───────────────────────────────────────────────────────────

/// One education entry. All fields are opaque text; the graduation year is
/// never parsed as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
  pub institution:     String,
  pub degree:          String,
  pub field_of_study:  String,
  pub graduation_year: String,
}

/// One work-experience entry. Dates are opaque text with no chronological
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
  pub company:     String,
  pub position:    String,
  pub start_date:  String,
  pub end_date:    String,
  pub description: String,
}

/// One project entry. `technologies` is free text, not a structured list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
  pub title:        String,
  pub description:  String,
  pub technologies: String,
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// A résumé that has not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResume {
  pub full_name:     String,
  pub email:         String,
  pub phone_number:  String,
  pub address:       String,
  /// Reference to a photo managed outside the store (path or handle).
  pub profile_photo: Option<String>,

  pub educations:  Vec<Education>,
  pub experiences: Vec<Experience>,
  pub projects:    Vec<Project>,
  pub skills:      Vec<String>,
}

/// A persisted résumé. Child collections are owned exclusively by the
/// aggregate; on update the store replaces them wholesale, never merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
  pub id:         ResumeId,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,

  pub full_name:     String,
  pub email:         String,
  pub phone_number:  String,
  pub address:       String,
  pub profile_photo: Option<String>,

  pub educations:  Vec<Education>,
  pub experiences: Vec<Experience>,
  pub projects:    Vec<Project>,
  pub skills:      Vec<String>,
}
