//! Integration tests for `SqliteResumeStore` against an in-memory database.

use vitae_core::{
  resume::{Education, Experience, NewResume, Project},
  store::ResumeStore,
};

use crate::{Error, SqliteResumeStore, params::Param};

async fn store() -> SqliteResumeStore {
  SqliteResumeStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// The aggregate from the reference scenario.
fn asha() -> NewResume {
  NewResume {
    full_name: "Asha Rahman".into(),
    email: "a@x.com".into(),
    phone_number: "01712345678".into(),
    address: "Dhaka".into(),
    profile_photo: None,
    educations: vec![Education {
      institution:     "BUET".into(),
      degree:          "BSc".into(),
      field_of_study:  "CSE".into(),
      graduation_year: "2024".into(),
    }],
    experiences: vec![],
    projects: vec![],
    skills: vec!["Go".into(), "SQL".into()],
  }
}

fn full_resume(name: &str) -> NewResume {
  NewResume {
    full_name: name.into(),
    email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
    phone_number: "555-0100".into(),
    address: "42 Elm Street".into(),
    profile_photo: Some("photos/default.png".into()),
    educations: vec![
      Education {
        institution:     "State University".into(),
        degree:          "BSc".into(),
        field_of_study:  "Computer Science".into(),
        graduation_year: "2020".into(),
      },
      Education {
        institution:     "State University".into(),
        degree:          "MSc".into(),
        field_of_study:  "Distributed Systems".into(),
        graduation_year: "2022".into(),
      },
    ],
    experiences: vec![Experience {
      company:     "Initech".into(),
      position:    "Engineer".into(),
      start_date:  "2022-06".into(),
      end_date:    "present".into(),
      description: "Backend services.".into(),
    }],
    projects: vec![Project {
      title:        "vitae".into(),
      description:  "A résumé store.".into(),
      technologies: "Rust, SQLite".into(),
    }],
    skills: vec!["Rust".into(), "SQL".into(), "Tokio".into()],
  }
}

async fn child_count(s: &SqliteResumeStore, table: &str, cv_id: i64) -> i64 {
  let sql = format!("SELECT COUNT(*) FROM {table} WHERE cv_id = ?1");
  s.db
    .query_opt(&sql, vec![Param::from(cv_id)], |row| row.get(0))
    .await
    .unwrap()
    .unwrap()
}

// ─── Save ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_assigns_id_and_timestamps() {
  let s = store().await;

  let saved = s.save(asha()).await.unwrap();
  assert_eq!(saved.id, 1);
  assert_eq!(saved.created_at, saved.updated_at);
}

#[tokio::test]
async fn save_then_find_round_trips() {
  let s = store().await;

  let saved = s.save(full_resume("Alice Liddell")).await.unwrap();
  let fetched = s.find_by_id(saved.id).await.unwrap().unwrap();

  // Value-equal in every scalar and collection field, order included.
  assert_eq!(fetched, saved);
}

#[tokio::test]
async fn reference_scenario_round_trip() {
  let s = store().await;

  let saved = s.save(asha()).await.unwrap();
  assert_eq!(saved.id, 1);

  let fetched = s.find_by_id(1).await.unwrap().unwrap();
  assert_eq!(fetched.full_name, "Asha Rahman");
  assert_eq!(fetched.educations.len(), 1);
  assert_eq!(fetched.skills, vec!["Go".to_owned(), "SQL".to_owned()]);

  s.delete(1).await.unwrap();
  assert!(s.find_by_id(1).await.unwrap().is_none());
}

#[tokio::test]
async fn save_rolls_back_entirely_on_child_failure() {
  let s = store().await;

  // Fault injection: make a duplicate skill violate a unique constraint so
  // the last child insert of the transaction fails.
  s.db
    .execute(
      "CREATE UNIQUE INDEX skill_unique ON skill (cv_id, skill_name)",
      vec![],
    )
    .await
    .unwrap();

  let mut resume = full_resume("Partial Save");
  resume.skills = vec!["Rust".into(), "Rust".into()];

  let err = s.save(resume).await.unwrap_err();
  assert!(matches!(err, Error::TransactionAborted { op: "save", .. }));

  // No root row survived, so no partial aggregate is observable.
  let all = s.find_all().await.unwrap();
  assert!(all.is_empty());
}

// ─── Find ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn find_by_id_missing_returns_none() {
  let s = store().await;
  assert!(s.find_by_id(99).await.unwrap().is_none());
}

#[tokio::test]
async fn find_all_orders_most_recent_first() {
  let s = store().await;

  s.save(full_resume("First")).await.unwrap();
  s.save(full_resume("Second")).await.unwrap();
  s.save(full_resume("Third")).await.unwrap();

  let names: Vec<_> = s
    .find_all()
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.full_name)
    .collect();
  assert_eq!(names, vec!["Third", "Second", "First"]);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_replaces_children_never_merges() {
  let s = store().await;

  let mut saved = s.save(full_resume("Replace Me")).await.unwrap();
  assert_eq!(saved.educations.len(), 2);

  saved.educations = vec![Education {
    institution:     "Night School".into(),
    degree:          "Cert".into(),
    field_of_study:  "Welding".into(),
    graduation_year: "2025".into(),
  }];
  saved.skills.clear();
  let updated = s.update(saved).await.unwrap();

  // Exactly M rows on disk, never N + M.
  assert_eq!(child_count(&s, "education", updated.id).await, 1);
  assert_eq!(child_count(&s, "skill", updated.id).await, 0);

  let fetched = s.find_by_id(updated.id).await.unwrap().unwrap();
  assert_eq!(fetched.educations, updated.educations);
  assert!(fetched.skills.is_empty());
}

#[tokio::test]
async fn update_bumps_updated_at_only() {
  let s = store().await;

  let saved = s.save(asha()).await.unwrap();
  let updated = s.update(saved.clone()).await.unwrap();

  assert_eq!(updated.created_at, saved.created_at);
  assert!(updated.updated_at >= saved.updated_at);
}

#[tokio::test]
async fn update_missing_root_errors_not_found() {
  let s = store().await;

  let mut ghost = s.save(asha()).await.unwrap();
  s.delete(ghost.id).await.unwrap();

  ghost.full_name = "Nobody".into();
  let err = s.update(ghost).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(1)));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_cascades_to_all_child_tables() {
  let s = store().await;

  let saved = s.save(full_resume("Cascade")).await.unwrap();
  s.delete(saved.id).await.unwrap();

  for table in ["education", "experience", "project", "skill"] {
    assert_eq!(child_count(&s, table, saved.id).await, 0, "{table}");
  }
}

#[tokio::test]
async fn delete_missing_id_is_ok() {
  let s = store().await;
  s.delete(12345).await.unwrap();
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_by_name_matches_substring() {
  let s = store().await;

  s.save(full_resume("Asha Rahman")).await.unwrap();
  s.save(full_resume("Robert Paulson")).await.unwrap();

  let hits = s.search_by_name("Rahman").await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].full_name, "Asha Rahman");

  // SQLite LIKE is case-insensitive for ASCII — the backend default.
  let hits = s.search_by_name("rahman").await.unwrap();
  assert_eq!(hits.len(), 1);

  assert!(s.search_by_name("zzz").await.unwrap().is_empty());
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_updates_never_interleave() {
  let s = store().await;

  let a = s.save(full_resume("Owner A")).await.unwrap();
  let b = s.save(full_resume("Owner B")).await.unwrap();

  let mut tasks = Vec::new();
  for (label, mut resume) in [("a", a.clone()), ("b", b.clone())] {
    let s = s.clone();
    tasks.push(tokio::spawn(async move {
      for round in 0..10 {
        let marker = format!("owner-{label}-{round}");
        resume.full_name = marker.clone();
        resume.skills = vec![marker];
        resume = s.update(resume).await.unwrap();
      }
    }));
  }
  for task in tasks {
    task.await.unwrap();
  }

  // Each root reflects exactly one caller's final state; the scalar and the
  // child row always carry the same marker.
  for (id, label) in [(a.id, "a"), (b.id, "b")] {
    let fetched = s.find_by_id(id).await.unwrap().unwrap();
    let expected = format!("owner-{label}-9");
    assert_eq!(fetched.full_name, expected);
    assert_eq!(fetched.skills, vec![expected]);
  }
}

// ─── Connection guard primitives ─────────────────────────────────────────────

#[tokio::test]
async fn database_insert_returns_generated_key() {
  let s = store().await;

  let id = s
    .db
    .insert(
      "INSERT INTO cv (full_name, email, phone_number, address,
         created_at, updated_at)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      vec![
        Param::from("Raw Row"),
        Param::from("raw@example.com"),
        Param::from("555"),
        Param::from("Nowhere"),
        Param::from(chrono::Utc::now()),
        Param::from(chrono::Utc::now()),
      ],
    )
    .await
    .unwrap();
  assert_eq!(id, 1);

  let name: Option<String> = s
    .db
    .query_opt(
      "SELECT full_name FROM cv WHERE id = ?1",
      vec![Param::from(id)],
      |row| row.get(0),
    )
    .await
    .unwrap();
  assert_eq!(name.as_deref(), Some("Raw Row"));
}

#[tokio::test]
async fn database_statement_failure_surfaces() {
  let s = store().await;

  let err = s.db.execute("DELETE FROM no_such_table", vec![]).await;
  assert!(matches!(err, Err(Error::Statement(_))));
}
