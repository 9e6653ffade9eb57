/// Certificate model and the completion → certificate cascade
///
/// A certificate is issued per (student, course) pair, and only when both
/// hold: the progress row is completed AND an enrollment exists for the
/// same pair. Issuance is idempotent; re-saving an already-completed
/// progress row never creates a second certificate.
///
/// The generated PNG artifact is rendered by [`crate::certgen`] and stored
/// through [`crate::storage::MediaStore`]. A rendering failure is logged
/// and leaves the certificate row without an artifact path; the issuance
/// itself still succeeds.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE certificates (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
///     course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
///     issued_on DATE NOT NULL DEFAULT CURRENT_DATE,
///     certificate_path VARCHAR(512),
///     UNIQUE (student_id, course_id)
/// );
/// ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::certgen::{certificate_filename, CertificateRenderer};
use crate::storage::MediaStore;

use super::enrollment::Enrollment;
use super::progress::Progress;

/// Certificate row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Certificate {
    /// Unique certificate ID
    pub id: Uuid,

    /// Student the certificate was issued to
    pub student_id: Uuid,

    /// Completed course
    pub course_id: Uuid,

    /// Issue date
    pub issued_on: NaiveDate,

    /// Media path of the generated PNG, if rendering succeeded
    pub certificate_path: Option<String>,
}

/// A student's certificate joined with course info, for listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IssuedCertificate {
    /// Certificate ID
    pub id: Uuid,

    /// Completed course
    pub course_id: Uuid,

    /// Course title
    pub course_title: String,

    /// Issue date
    pub issued_on: NaiveDate,

    /// Media path of the generated PNG
    pub certificate_path: Option<String>,
}

impl Certificate {
    /// Finds a certificate by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let certificate = sqlx::query_as::<_, Certificate>(
            r#"
            SELECT id, student_id, course_id, issued_on, certificate_path
            FROM certificates
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(certificate)
    }

    /// Gets or creates the certificate for a (student, course) pair
    ///
    /// Returns the certificate and whether it was newly created. The unique
    /// constraint makes this race-safe: concurrent callers converge on the
    /// same row.
    pub async fn get_or_create(
        pool: &PgPool,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<(Self, bool), sqlx::Error> {
        let inserted = sqlx::query_as::<_, Certificate>(
            r#"
            INSERT INTO certificates (student_id, course_id)
            VALUES ($1, $2)
            ON CONFLICT (student_id, course_id) DO NOTHING
            RETURNING id, student_id, course_id, issued_on, certificate_path
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(pool)
        .await?;

        if let Some(certificate) = inserted {
            return Ok((certificate, true));
        }

        let existing = sqlx::query_as::<_, Certificate>(
            r#"
            SELECT id, student_id, course_id, issued_on, certificate_path
            FROM certificates
            WHERE student_id = $1 AND course_id = $2
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(pool)
        .await?;

        Ok((existing, false))
    }

    /// Records the media path of the rendered certificate image
    pub async fn set_certificate_path(
        pool: &PgPool,
        id: Uuid,
        path: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let certificate = sqlx::query_as::<_, Certificate>(
            r#"
            UPDATE certificates
            SET certificate_path = $2
            WHERE id = $1
            RETURNING id, student_id, course_id, issued_on, certificate_path
            "#,
        )
        .bind(id)
        .bind(path)
        .fetch_optional(pool)
        .await?;

        Ok(certificate)
    }

    /// Lists a student's certificates with course titles, newest first
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<IssuedCertificate>, sqlx::Error> {
        let rows = sqlx::query_as::<_, IssuedCertificate>(
            r#"
            SELECT cert.id, cert.course_id, c.title AS course_title,
                   cert.issued_on, cert.certificate_path
            FROM certificates cert
            JOIN courses c ON c.id = cert.course_id
            WHERE cert.student_id = $1
            ORDER BY cert.issued_on DESC, c.title
            "#,
        )
        .bind(student_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Issues a certificate for a completed progress row
    ///
    /// The second side effect of the progress cascade. Checks that an
    /// enrollment exists for the progress row's (student, course) pair,
    /// then get-or-creates the certificate. A newly created certificate is
    /// rendered to PNG and the artifact path recorded; rendering failures
    /// are logged and leave the path unset.
    ///
    /// Returns `Ok(None)` when no enrollment exists (no certificate is
    /// issued), otherwise the certificate row.
    ///
    /// # Errors
    ///
    /// Returns database errors only; rendering and storage failures are
    /// swallowed after logging.
    pub async fn issue_for_completion(
        pool: &PgPool,
        media: &MediaStore,
        renderer: Option<&CertificateRenderer>,
        progress: &Progress,
    ) -> Result<Option<Self>, sqlx::Error> {
        if !Enrollment::exists(pool, progress.student_id, progress.course_id).await? {
            info!(
                student_id = %progress.student_id,
                course_id = %progress.course_id,
                "Progress completed without enrollment, skipping certificate"
            );
            return Ok(None);
        }

        let (certificate, created) =
            Self::get_or_create(pool, progress.student_id, progress.course_id).await?;

        if !created {
            return Ok(Some(certificate));
        }

        info!(
            certificate_id = %certificate.id,
            student_id = %progress.student_id,
            course_id = %progress.course_id,
            "Certificate issued"
        );

        let Some(renderer) = renderer else {
            warn!(
                certificate_id = %certificate.id,
                "No certificate renderer configured, skipping artifact"
            );
            return Ok(Some(certificate));
        };

        // Names for the artifact text
        let (student_name, course_title): (String, String) = sqlx::query_as(
            r#"
            SELECT u.username, c.title
            FROM students s
            JOIN users u ON u.id = s.user_id
            JOIN courses c ON c.id = $2
            WHERE s.id = $1
            "#,
        )
        .bind(progress.student_id)
        .bind(progress.course_id)
        .fetch_one(pool)
        .await?;

        let png = match renderer.render(&student_name, &course_title, certificate.issued_on) {
            Ok(png) => png,
            Err(e) => {
                warn!(certificate_id = %certificate.id, error = %e, "Certificate rendering failed");
                return Ok(Some(certificate));
            }
        };

        let filename = certificate_filename(&student_name, &course_title);
        match media.save("certificates", &filename, &png).await {
            Ok(path) => {
                let updated = Self::set_certificate_path(pool, certificate.id, &path).await?;
                Ok(updated.or(Some(certificate)))
            }
            Err(e) => {
                warn!(certificate_id = %certificate.id, error = %e, "Failed to store certificate image");
                Ok(Some(certificate))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_certificate_serialization() {
        let row = IssuedCertificate {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            course_title: "Biology".to_string(),
            issued_on: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            certificate_path: Some("certificates/cert_jdoe_biology.png".to_string()),
        };

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("certificate_path"));
        assert!(json.contains("Biology"));
    }
}
