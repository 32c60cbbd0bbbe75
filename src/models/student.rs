use serde::{Deserialize, Serialize};

/// Student record in the shape the frontend consumes (camelCase keys).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub class: String,
    pub roll_number: String,
    pub parent_contact: String,
    #[serde(rename = "parentWhatsApp")]
    pub parent_whatsapp: String,
    pub parent_name: String,
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    pub obtained_marks: u32,
    pub total_marks: u32,
    pub grade: String,
}

/// Row shape of the `students` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRow {
    pub student_id: String,
    pub name: String,
    pub class_name: String,
    pub roll_number: String,
    pub parent_contact: String,
    pub parent_whatsapp: String,
    pub parent_name: String,
}

/// Row shape of the `subjects` table. Each subject belongs to exactly one
/// student and has no lifecycle of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRow {
    pub student_id: String,
    pub name: String,
    pub obtained_marks: u32,
    pub total_marks: u32,
    pub grade: String,
}

/// Per-subject composite carried through the join aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubjectMarks {
    pub name: String,
    pub obtained_marks: u32,
    pub total_marks: u32,
    pub grade: String,
}

/// A student row joined with its aggregated subject collection, as returned
/// by the directory query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    pub class_name: String,
    pub roll_number: String,
    pub parent_contact: String,
    pub parent_whatsapp: String,
    pub parent_name: String,
    #[serde(default)]
    pub subjects: Vec<SubjectMarks>,
}

impl From<SubjectMarks> for Subject {
    fn from(marks: SubjectMarks) -> Self {
        Subject {
            name: marks.name,
            obtained_marks: marks.obtained_marks,
            total_marks: marks.total_marks,
            grade: marks.grade,
        }
    }
}

impl From<StudentRecord> for Student {
    fn from(record: StudentRecord) -> Self {
        Student {
            id: record.student_id,
            name: record.name,
            class: record.class_name,
            roll_number: record.roll_number,
            parent_contact: record.parent_contact,
            parent_whatsapp: record.parent_whatsapp,
            parent_name: record.parent_name,
            subjects: record.subjects.into_iter().map(Subject::from).collect(),
        }
    }
}
