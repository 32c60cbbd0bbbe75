use anyhow::{anyhow, Result};
use async_trait::async_trait;
use surrealdb::{
    engine::local::{Db, File, Mem},
    Surreal,
};
use uuid::Uuid;

use crate::models::notification::NotificationRecord;
use crate::models::student::{Student, StudentRecord, StudentRow, SubjectRow};
use crate::services::notification::NotificationStore;

const STUDENT_FIELDS: &str = "student_id, name, class_name, roll_number, \
     parent_contact, parent_whatsapp, parent_name, \
     (SELECT name, obtained_marks, total_marks, grade FROM subjects \
      WHERE student_id = $parent.student_id ORDER BY name) AS subjects";

#[derive(Clone)]
pub struct DatabaseService {
    db: Surreal<Db>,
}

impl DatabaseService {
    pub async fn new(database_url: &str) -> Result<Self> {
        let db = if database_url.starts_with("memory://") {
            Surreal::new::<Mem>(()).await?
        } else if let Some(path) = database_url.strip_prefix("file://") {
            Surreal::new::<File>(path).await?
        } else {
            return Err(anyhow!("Unsupported database URL: {}", database_url));
        };

        db.use_ns("student_management").use_db("main").await?;

        let service = Self { db };
        service.initialize_schema().await?;

        Ok(service)
    }

    async fn initialize_schema(&self) -> Result<()> {
        self.db
            .query(
                "
                DEFINE TABLE students SCHEMALESS;
                DEFINE INDEX unique_student_id ON students COLUMNS student_id UNIQUE;
                DEFINE TABLE subjects SCHEMALESS;
                DEFINE INDEX subjects_by_student ON subjects COLUMNS student_id;
                DEFINE TABLE notifications SCHEMALESS;
            ",
            )
            .await?
            .check()?;

        log::info!("Database schema initialized");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        self.db.health().await?;
        Ok(())
    }

    // Student directory

    pub async fn create_student(&self, row: &StudentRow, subjects: &[SubjectRow]) -> Result<()> {
        let _: Vec<StudentRow> = self.db.create("students").content(row).await?;
        for subject in subjects {
            let _: Vec<SubjectRow> = self.db.create("subjects").content(subject).await?;
        }
        Ok(())
    }

    /// Loads every student with its subjects grouped under the owning row,
    /// reshaped into the response format.
    pub async fn list_students(&self) -> Result<Vec<Student>> {
        let records: Vec<StudentRecord> = self
            .db
            .query(format!(
                "SELECT {STUDENT_FIELDS} FROM students ORDER BY roll_number"
            ))
            .await?
            .take(0)?;

        Ok(records.into_iter().map(Student::from).collect())
    }

    pub async fn get_student(&self, student_id: &str) -> Result<Option<Student>> {
        let record: Option<StudentRecord> = self
            .db
            .query(format!(
                "SELECT {STUDENT_FIELDS} FROM students WHERE student_id = $student_id"
            ))
            .bind(("student_id", student_id))
            .await?
            .take(0)?;

        Ok(record.map(Student::from))
    }

    // Notification audit trail

    pub async fn insert_notification(&self, record: &NotificationRecord) -> Result<()> {
        let _: Vec<NotificationRecord> = self.db.create("notifications").content(record).await?;
        Ok(())
    }

    pub async fn list_notifications(&self) -> Result<Vec<NotificationRecord>> {
        let records: Vec<NotificationRecord> = self
            .db
            .query(
                "SELECT student_id, parent_contact, message, notification_type, status, created_at \
                 FROM notifications ORDER BY created_at DESC",
            )
            .await?
            .take(0)?;

        Ok(records)
    }

    // Demo data

    pub async fn seed_demo_data(&self) -> Result<()> {
        let existing = self.student_count().await?;
        if existing > 0 {
            log::info!("Skipping demo seed, {existing} students already present");
            return Ok(());
        }

        let roster = [
            (
                Uuid::parse_str("7c9e6d7a-4f1b-4b0a-9c3d-1a2b3c4d5e6f")?,
                "Arjun Sharma",
                "S001",
                "+91 9876543210",
                "Mr. Rajesh Sharma",
                vec![("Mathematics", 95, "A+"), ("Physics", 88, "A"), ("Chemistry", 82, "B+")],
            ),
            (
                Uuid::parse_str("3f8a2b1c-9d4e-4a5f-8b6c-7d8e9f0a1b2c")?,
                "Priya Patel",
                "S002",
                "+91 9876543211",
                "Mrs. Sunita Patel",
                vec![("Mathematics", 78, "B"), ("Chemistry", 92, "A+"), ("English", 94, "A+")],
            ),
            (
                Uuid::parse_str("b2c3d4e5-f6a7-4b8c-9d0e-1f2a3b4c5d6e")?,
                "Rohit Kumar",
                "S003",
                "+91 9876543212",
                "Mr. Suresh Kumar",
                vec![("Mathematics", 65, "C+"), ("Physics", 70, "B-")],
            ),
        ];

        for (id, name, roll_number, contact, parent_name, subjects) in roster {
            let student_id = id.to_string();
            let row = StudentRow {
                student_id: student_id.clone(),
                name: name.to_string(),
                class_name: "10th Grade".to_string(),
                roll_number: roll_number.to_string(),
                parent_contact: contact.to_string(),
                parent_whatsapp: contact.to_string(),
                parent_name: parent_name.to_string(),
            };
            let subjects: Vec<SubjectRow> = subjects
                .into_iter()
                .map(|(subject, obtained, grade)| SubjectRow {
                    student_id: student_id.clone(),
                    name: subject.to_string(),
                    obtained_marks: obtained,
                    total_marks: 100,
                    grade: grade.to_string(),
                })
                .collect();

            self.create_student(&row, &subjects).await?;
        }

        log::info!("Seeded demo roster");
        Ok(())
    }

    async fn student_count(&self) -> Result<u64> {
        let rows: Vec<serde_json::Value> = self
            .db
            .query("SELECT count() FROM students GROUP ALL")
            .await?
            .take(0)?;

        Ok(rows
            .first()
            .and_then(|v| v.get("count"))
            .and_then(|v| v.as_u64())
            .unwrap_or(0))
    }
}

#[async_trait]
impl NotificationStore for DatabaseService {
    async fn store_notification(&self, record: &NotificationRecord) -> Result<()> {
        self.insert_notification(record).await
    }
}
