//! [`SqliteResumeStore`] — the SQLite implementation of [`ResumeStore`].

use std::path::Path;

use chrono::Utc;
use vitae_core::{
  resume::{Education, Experience, NewResume, Project, Resume, ResumeId},
  store::ResumeStore,
};

use crate::{
  Error, Result,
  db::Database,
  params::{Param, decode_dt, encode_dt},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A résumé store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteResumeStore {
  pub(crate) db: Database,
}

impl SqliteResumeStore {
  /// Open (or create) a store at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Ok(Self { db: Database::open(path).await? })
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    Ok(Self { db: Database::open_in_memory().await? })
  }

  /// Orderly teardown of the underlying connection.
  pub async fn close(self) -> Result<()> { self.db.close().await }

  /// Fetch the root rows matching `sql`, then hydrate each with its child
  /// collections. One round trip per collection per root — fine at the
  /// scale of a personal tool.
  async fn hydrate_roots(
    &self,
    sql: &str,
    params: Vec<Param>,
  ) -> Result<Vec<Resume>> {
    let roots = self.db.query(sql, params, root_row).await?;
    let mut resumes = Vec::with_capacity(roots.len());
    for root in roots {
      resumes.push(self.hydrate(root).await?);
    }
    Ok(resumes)
  }

  async fn hydrate(&self, root: RootRow) -> Result<Resume> {
    let id = root.id;

    let educations = self
      .db
      .query(
        "SELECT institution, degree, field_of_study, graduation_year
         FROM education WHERE cv_id = ?1 ORDER BY ordinal",
        vec![Param::from(id)],
        |row| {
          Ok(Education {
            institution:     row.get(0)?,
            degree:          row.get(1)?,
            field_of_study:  row.get(2)?,
            graduation_year: row.get(3)?,
          })
        },
      )
      .await?;

    let experiences = self
      .db
      .query(
        "SELECT company, position, start_date, end_date, description
         FROM experience WHERE cv_id = ?1 ORDER BY ordinal",
        vec![Param::from(id)],
        |row| {
          Ok(Experience {
            company:     row.get(0)?,
            position:    row.get(1)?,
            start_date:  row.get(2)?,
            end_date:    row.get(3)?,
            description: row.get(4)?,
          })
        },
      )
      .await?;

    let projects = self
      .db
      .query(
        "SELECT title, description, technologies
         FROM project WHERE cv_id = ?1 ORDER BY ordinal",
        vec![Param::from(id)],
        |row| {
          Ok(Project {
            title:        row.get(0)?,
            description:  row.get(1)?,
            technologies: row.get(2)?,
          })
        },
      )
      .await?;

    let skills = self
      .db
      .query(
        "SELECT skill_name FROM skill WHERE cv_id = ?1 ORDER BY ordinal",
        vec![Param::from(id)],
        |row| row.get(0),
      )
      .await?;

    root.into_resume(educations, experiences, projects, skills)
  }
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

/// A `cv` row as it comes off the wire, timestamps still text.
struct RootRow {
  id:            ResumeId,
  full_name:     String,
  email:         String,
  phone_number:  String,
  address:       String,
  profile_photo: Option<String>,
  created_at:    String,
  updated_at:    String,
}

const ROOT_COLUMNS: &str =
  "id, full_name, email, phone_number, address, profile_photo, created_at, \
   updated_at";

fn root_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RootRow> {
  Ok(RootRow {
    id:            row.get(0)?,
    full_name:     row.get(1)?,
    email:         row.get(2)?,
    phone_number:  row.get(3)?,
    address:       row.get(4)?,
    profile_photo: row.get(5)?,
    created_at:    row.get(6)?,
    updated_at:    row.get(7)?,
  })
}

impl RootRow {
  fn into_resume(
    self,
    educations: Vec<Education>,
    experiences: Vec<Experience>,
    projects: Vec<Project>,
    skills: Vec<String>,
  ) -> Result<Resume> {
    Ok(Resume {
      id: self.id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      full_name: self.full_name,
      email: self.email,
      phone_number: self.phone_number,
      address: self.address,
      profile_photo: self.profile_photo,
      educations,
      experiences,
      projects,
      skills,
    })
  }
}

// ─── Child-row helpers (transaction scope) ───────────────────────────────────

/// Insert every child row for `cv_id`, stamping each with its position in
/// the in-memory collection.
fn insert_children(
  tx: &rusqlite::Transaction<'_>,
  cv_id: ResumeId,
  educations: &[Education],
  experiences: &[Experience],
  projects: &[Project],
  skills: &[String],
) -> Result<()> {
  let mut stmt = tx.prepare(
    "INSERT INTO education
       (cv_id, ordinal, institution, degree, field_of_study, graduation_year)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
  )?;
  for (i, edu) in educations.iter().enumerate() {
    stmt.execute(rusqlite::params![
      cv_id,
      i as i64,
      edu.institution,
      edu.degree,
      edu.field_of_study,
      edu.graduation_year,
    ])?;
  }

  let mut stmt = tx.prepare(
    "INSERT INTO experience
       (cv_id, ordinal, company, position, start_date, end_date, description)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
  )?;
  for (i, exp) in experiences.iter().enumerate() {
    stmt.execute(rusqlite::params![
      cv_id,
      i as i64,
      exp.company,
      exp.position,
      exp.start_date,
      exp.end_date,
      exp.description,
    ])?;
  }

  let mut stmt = tx.prepare(
    "INSERT INTO project (cv_id, ordinal, title, description, technologies)
     VALUES (?1, ?2, ?3, ?4, ?5)",
  )?;
  for (i, proj) in projects.iter().enumerate() {
    stmt.execute(rusqlite::params![
      cv_id,
      i as i64,
      proj.title,
      proj.description,
      proj.technologies,
    ])?;
  }

  let mut stmt = tx.prepare(
    "INSERT INTO skill (cv_id, ordinal, skill_name) VALUES (?1, ?2, ?3)",
  )?;
  for (i, skill) in skills.iter().enumerate() {
    stmt.execute(rusqlite::params![cv_id, i as i64, skill])?;
  }

  Ok(())
}

/// Remove every child row for `cv_id` across all four tables. Updates are
/// replace-not-merge: the re-inserted collections are the only survivors.
fn delete_children(
  tx: &rusqlite::Transaction<'_>,
  cv_id: ResumeId,
) -> Result<()> {
  tx.execute("DELETE FROM education WHERE cv_id = ?1", rusqlite::params![
    cv_id
  ])?;
  tx.execute("DELETE FROM experience WHERE cv_id = ?1", rusqlite::params![
    cv_id
  ])?;
  tx.execute("DELETE FROM project WHERE cv_id = ?1", rusqlite::params![
    cv_id
  ])?;
  tx.execute("DELETE FROM skill WHERE cv_id = ?1", rusqlite::params![cv_id])?;
  Ok(())
}

// ─── ResumeStore impl ────────────────────────────────────────────────────────

impl ResumeStore for SqliteResumeStore {
  type Error = Error;

  async fn save(&self, resume: NewResume) -> Result<Resume> {
    let now = Utc::now();

    let saved = self
      .db
      .with_tx("save", move |tx| {
        let NewResume {
          full_name,
          email,
          phone_number,
          address,
          profile_photo,
          educations,
          experiences,
          projects,
          skills,
        } = resume;

        tx.execute(
          "INSERT INTO cv
             (full_name, email, phone_number, address, profile_photo,
              created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            full_name,
            email,
            phone_number,
            address,
            profile_photo,
            encode_dt(now),
            encode_dt(now),
          ],
        )?;
        let id = tx.last_insert_rowid();
        if id == 0 {
          return Err(Error::NoGeneratedKey);
        }

        insert_children(tx, id, &educations, &experiences, &projects, &skills)?;

        Ok(Resume {
          id,
          created_at: now,
          updated_at: now,
          full_name,
          email,
          phone_number,
          address,
          profile_photo,
          educations,
          experiences,
          projects,
          skills,
        })
      })
      .await?;

    tracing::debug!(id = saved.id, "saved résumé");
    Ok(saved)
  }

  async fn update(&self, resume: Resume) -> Result<Resume> {
    let now = Utc::now();

    let updated = self
      .db
      .with_tx("update", move |tx| {
        let affected = tx.execute(
          "UPDATE cv SET full_name = ?1, email = ?2, phone_number = ?3,
             address = ?4, profile_photo = ?5, updated_at = ?6
           WHERE id = ?7",
          rusqlite::params![
            resume.full_name,
            resume.email,
            resume.phone_number,
            resume.address,
            resume.profile_photo,
            encode_dt(now),
            resume.id,
          ],
        )?;
        if affected == 0 {
          return Err(Error::NotFound(resume.id));
        }

        delete_children(tx, resume.id)?;
        insert_children(
          tx,
          resume.id,
          &resume.educations,
          &resume.experiences,
          &resume.projects,
          &resume.skills,
        )?;

        Ok(Resume { updated_at: now, ..resume })
      })
      .await?;

    tracing::debug!(id = updated.id, "updated résumé");
    Ok(updated)
  }

  async fn delete(&self, id: ResumeId) -> Result<()> {
    // Children go via ON DELETE CASCADE. Idempotent: zero rows affected
    // just means the résumé was already gone.
    let affected = self
      .db
      .execute("DELETE FROM cv WHERE id = ?1", vec![Param::from(id)])
      .await?;
    tracing::debug!(id, affected, "deleted résumé");
    Ok(())
  }

  async fn find_by_id(&self, id: ResumeId) -> Result<Option<Resume>> {
    let sql = format!("SELECT {ROOT_COLUMNS} FROM cv WHERE id = ?1");
    let root = self.db.query_opt(&sql, vec![Param::from(id)], root_row).await?;
    match root {
      Some(root) => Ok(Some(self.hydrate(root).await?)),
      None => Ok(None),
    }
  }

  async fn find_all(&self) -> Result<Vec<Resume>> {
    // Most recent first; RFC 3339 text sorts chronologically. Row id breaks
    // ties between same-instant inserts.
    let sql = format!(
      "SELECT {ROOT_COLUMNS} FROM cv ORDER BY created_at DESC, id DESC"
    );
    self.hydrate_roots(&sql, vec![]).await
  }

  async fn search_by_name(&self, needle: &str) -> Result<Vec<Resume>> {
    let sql = format!(
      "SELECT {ROOT_COLUMNS} FROM cv WHERE full_name LIKE ?1
       ORDER BY created_at DESC, id DESC"
    );
    let pattern = format!("%{needle}%");
    self.hydrate_roots(&sql, vec![Param::from(pattern)]).await
  }
}
