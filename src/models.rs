use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A status enum with a closed, ordered set of values.
pub trait Status: Copy + Ord + fmt::Display + 'static {
    const ALL: &'static [Self];
}

/// A record that carries a lifecycle status.
pub trait HasStatus {
    type Status: Status;

    fn status(&self) -> Self::Status;
}

macro_rules! status_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl Status for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let label = match self {
                    $($name::$variant => $label),+
                };
                f.write_str(label)
            }
        }
    };
}

status_enum!(ClassStatus {
    Planned => "planned",
    InProgress => "in_progress",
    Finished => "finished",
    Cancelled => "cancelled",
});

status_enum!(StudentStatus {
    Active => "active",
    Completed => "completed",
    Dropped => "dropped",
    Inactive => "inactive",
});

status_enum!(InstructorStatus {
    Active => "active",
    Inactive => "inactive",
    Blocked => "blocked",
});

status_enum!(ProspectStatus {
    New => "new",
    Contacted => "contacted",
    Enrolled => "enrolled",
    Withdrawn => "withdrawn",
});

status_enum!(PresenceStatus {
    Present => "present",
    Absent => "absent",
    Justified => "justified",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProspectKind {
    Student,
    Volunteer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub education_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    #[serde(default)]
    pub workload_hours: u32,
}

/// An ementa: the ordered syllabus a class session follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curriculum {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// A turma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSession {
    pub id: String,
    pub name: String,
    pub curriculum_id: String,
    pub instructor_id: Option<String>,
    pub status: ClassStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub seats_total: u32,
    pub seats_filled: u32,
}

impl HasStatus for ClassSession {
    type Status = ClassStatus;

    fn status(&self) -> ClassStatus {
        self.status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub class_session_id: Option<String>,
    pub status: StudentStatus,
    #[serde(default)]
    pub address: Option<Address>,
}

impl Student {
    pub fn neighborhood(&self) -> Option<&str> {
        self.address
            .as_ref()
            .and_then(|address| address.neighborhood.as_deref())
    }
}

impl HasStatus for Student {
    type Status = StudentStatus;

    fn status(&self) -> StudentStatus {
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: String,
    pub name: String,
    pub status: InstructorStatus,
    #[serde(default)]
    pub specialties: Vec<String>,
}

impl HasStatus for Instructor {
    type Status = InstructorStatus;

    fn status(&self) -> InstructorStatus {
        self.status
    }
}

/// An interessado: someone who asked about a course but is not enrolled yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub id: String,
    pub name: String,
    pub kind: ProspectKind,
    pub status: ProspectStatus,
    pub desired_course_id: Option<String>,
    pub gender: Option<String>,
    pub ethnicity: Option<String>,
    pub schooling_level: Option<String>,
}

impl HasStatus for Prospect {
    type Status = ProspectStatus;

    fn status(&self) -> ProspectStatus {
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendancePresence {
    pub student_id: String,
    pub status: PresenceStatus,
}

/// A diário: one class session's attendance on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDiary {
    pub id: String,
    pub class_session_id: String,
    pub instructor_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub presences: Vec<AttendancePresence>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionEntry {
    pub label: String,
    pub count: usize,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructorPerformance {
    pub instructor_id: String,
    pub name: String,
    pub active_classes: usize,
    pub finished_classes: usize,
    pub total_students: u32,
    pub average_attendance_rate: u32,
    pub diaries_logged: usize,
    pub diaries_this_month: usize,
}

impl InstructorPerformance {
    pub fn score(&self) -> f64 {
        self.average_attendance_rate as f64 + self.diaries_logged as f64 * 0.5
    }
}
