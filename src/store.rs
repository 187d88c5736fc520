use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    Address, AttendanceDiary, AttendancePresence, ClassSession, ClassStatus, Course, Curriculum,
    Instructor, InstructorStatus, Lesson, PresenceStatus, Prospect, ProspectKind, ProspectStatus,
    Student, StudentStatus,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} '{id}' already exists")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{kind} '{id}': {field} references missing or dependent record '{target}'")]
    DanglingReference {
        kind: &'static str,
        id: String,
        field: &'static str,
        target: String,
    },

    #[error("class session '{id}' has {filled} seats filled but only {total} in total")]
    SeatCapacityExceeded { id: String, filled: u32, total: u32 },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A record kept in the store, addressed by its string id.
pub trait Entity: Clone {
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn id_mut(&mut self) -> &mut String;
}

macro_rules! entity {
    ($ty:ty, $kind:literal) => {
        impl Entity for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn id_mut(&mut self) -> &mut String {
                &mut self.id
            }
        }
    };
}

entity!(Course, "course");
entity!(Curriculum, "curriculum");
entity!(ClassSession, "class session");
entity!(Student, "student");
entity!(Instructor, "instructor");
entity!(Prospect, "prospect");
entity!(AttendanceDiary, "attendance diary");

fn position<T: Entity>(records: &[T], id: &str) -> StoreResult<usize> {
    records
        .iter()
        .position(|record| record.id() == id)
        .ok_or_else(|| StoreError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        })
}

fn prepare_insert<T: Entity>(records: &[T], mut record: T) -> StoreResult<T> {
    if record.id().trim().is_empty() {
        *record.id_mut() = Uuid::new_v4().to_string();
    }
    if records.iter().any(|existing| existing.id() == record.id()) {
        return Err(StoreError::DuplicateId {
            kind: T::KIND,
            id: record.id().to_string(),
        });
    }
    Ok(record)
}

fn dangling<T: Entity>(record: &T, field: &'static str, target: &str) -> StoreError {
    StoreError::DanglingReference {
        kind: T::KIND,
        id: record.id().to_string(),
        field,
        target: target.to_string(),
    }
}

/// In-memory owner of every domain record.
///
/// All mutation goes through the methods below, which keep the reference
/// invariants between records intact. Readers borrow slices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    #[serde(default)]
    courses: Vec<Course>,
    #[serde(default)]
    curricula: Vec<Curriculum>,
    #[serde(default)]
    class_sessions: Vec<ClassSession>,
    #[serde(default)]
    students: Vec<Student>,
    #[serde(default)]
    instructors: Vec<Instructor>,
    #[serde(default)]
    prospects: Vec<Prospect>,
    #[serde(default)]
    diaries: Vec<AttendanceDiary>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn curricula(&self) -> &[Curriculum] {
        &self.curricula
    }

    pub fn class_sessions(&self) -> &[ClassSession] {
        &self.class_sessions
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    pub fn prospects(&self) -> &[Prospect] {
        &self.prospects
    }

    pub fn diaries(&self) -> &[AttendanceDiary] {
        &self.diaries
    }

    pub fn get_course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    pub fn get_curriculum(&self, id: &str) -> Option<&Curriculum> {
        self.curricula.iter().find(|curriculum| curriculum.id == id)
    }

    pub fn get_class_session(&self, id: &str) -> Option<&ClassSession> {
        self.class_sessions.iter().find(|class| class.id == id)
    }

    pub fn get_student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    pub fn get_instructor(&self, id: &str) -> Option<&Instructor> {
        self.instructors.iter().find(|instructor| instructor.id == id)
    }

    pub fn get_prospect(&self, id: &str) -> Option<&Prospect> {
        self.prospects.iter().find(|prospect| prospect.id == id)
    }

    pub fn get_diary(&self, id: &str) -> Option<&AttendanceDiary> {
        self.diaries.iter().find(|diary| diary.id == id)
    }

    // ---- invariant checks ----

    fn check_curriculum(&self, curriculum: &Curriculum) -> StoreResult<()> {
        if self.get_course(&curriculum.course_id).is_none() {
            return Err(dangling(curriculum, "course_id", &curriculum.course_id));
        }
        Ok(())
    }

    fn check_class_session(&self, class: &ClassSession) -> StoreResult<()> {
        if self.get_curriculum(&class.curriculum_id).is_none() {
            return Err(dangling(class, "curriculum_id", &class.curriculum_id));
        }
        if let Some(instructor_id) = &class.instructor_id {
            if self.get_instructor(instructor_id).is_none() {
                return Err(dangling(class, "instructor_id", instructor_id));
            }
        }
        if class.seats_filled > class.seats_total {
            return Err(StoreError::SeatCapacityExceeded {
                id: class.id.clone(),
                filled: class.seats_filled,
                total: class.seats_total,
            });
        }
        Ok(())
    }

    fn check_student(&self, student: &Student) -> StoreResult<()> {
        if let Some(class_id) = &student.class_session_id {
            if self.get_class_session(class_id).is_none() {
                return Err(dangling(student, "class_session_id", class_id));
            }
        }
        Ok(())
    }

    fn check_diary(&self, diary: &AttendanceDiary) -> StoreResult<()> {
        if self.get_class_session(&diary.class_session_id).is_none() {
            return Err(dangling(diary, "class_session_id", &diary.class_session_id));
        }
        if self.get_instructor(&diary.instructor_id).is_none() {
            return Err(dangling(diary, "instructor_id", &diary.instructor_id));
        }
        Ok(())
    }

    fn check_unique<T: Entity>(records: &[T]) -> StoreResult<()> {
        for (index, record) in records.iter().enumerate() {
            if records[..index].iter().any(|earlier| earlier.id() == record.id()) {
                return Err(StoreError::DuplicateId {
                    kind: T::KIND,
                    id: record.id().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Re-checks every record, for stores that did not come through `add_*`.
    pub fn check_integrity(&self) -> StoreResult<()> {
        Self::check_unique(&self.courses)?;
        Self::check_unique(&self.curricula)?;
        Self::check_unique(&self.class_sessions)?;
        Self::check_unique(&self.students)?;
        Self::check_unique(&self.instructors)?;
        Self::check_unique(&self.prospects)?;
        Self::check_unique(&self.diaries)?;
        for curriculum in &self.curricula {
            self.check_curriculum(curriculum)?;
        }
        for class in &self.class_sessions {
            self.check_class_session(class)?;
        }
        for student in &self.students {
            self.check_student(student)?;
        }
        for diary in &self.diaries {
            self.check_diary(diary)?;
        }
        Ok(())
    }

    // ---- courses ----

    pub fn add_course(&mut self, course: Course) -> StoreResult<&Course> {
        let course = prepare_insert(&self.courses, course)?;
        debug!(id = %course.id, "course added");
        self.courses.push(course);
        Ok(&self.courses[self.courses.len() - 1])
    }

    pub fn update_course(
        &mut self,
        id: &str,
        patch: impl FnOnce(&mut Course),
    ) -> StoreResult<&Course> {
        let index = position(&self.courses, id)?;
        let mut updated = self.courses[index].clone();
        patch(&mut updated);
        updated.id = id.to_string();
        self.courses[index] = updated;
        debug!(id, "course updated");
        Ok(&self.courses[index])
    }

    pub fn delete_course(&mut self, id: &str) -> StoreResult<Course> {
        let index = position(&self.courses, id)?;
        if let Some(curriculum) = self.curricula.iter().find(|c| c.course_id == id) {
            return Err(dangling(&self.courses[index], "curriculum", &curriculum.id));
        }
        debug!(id, "course deleted");
        Ok(self.courses.remove(index))
    }

    // ---- curricula ----

    pub fn add_curriculum(&mut self, curriculum: Curriculum) -> StoreResult<&Curriculum> {
        let curriculum = prepare_insert(&self.curricula, curriculum)?;
        self.check_curriculum(&curriculum)?;
        debug!(id = %curriculum.id, "curriculum added");
        self.curricula.push(curriculum);
        Ok(&self.curricula[self.curricula.len() - 1])
    }

    pub fn update_curriculum(
        &mut self,
        id: &str,
        patch: impl FnOnce(&mut Curriculum),
    ) -> StoreResult<&Curriculum> {
        let index = position(&self.curricula, id)?;
        let mut updated = self.curricula[index].clone();
        patch(&mut updated);
        updated.id = id.to_string();
        self.check_curriculum(&updated)?;
        self.curricula[index] = updated;
        debug!(id, "curriculum updated");
        Ok(&self.curricula[index])
    }

    pub fn delete_curriculum(&mut self, id: &str) -> StoreResult<Curriculum> {
        let index = position(&self.curricula, id)?;
        if let Some(class) = self.class_sessions.iter().find(|c| c.curriculum_id == id) {
            return Err(dangling(&self.curricula[index], "class session", &class.id));
        }
        debug!(id, "curriculum deleted");
        Ok(self.curricula.remove(index))
    }

    // ---- class sessions ----

    pub fn add_class_session(&mut self, class: ClassSession) -> StoreResult<&ClassSession> {
        let class = prepare_insert(&self.class_sessions, class)?;
        self.check_class_session(&class)?;
        debug!(id = %class.id, "class session added");
        self.class_sessions.push(class);
        Ok(&self.class_sessions[self.class_sessions.len() - 1])
    }

    pub fn update_class_session(
        &mut self,
        id: &str,
        patch: impl FnOnce(&mut ClassSession),
    ) -> StoreResult<&ClassSession> {
        let index = position(&self.class_sessions, id)?;
        let mut updated = self.class_sessions[index].clone();
        patch(&mut updated);
        updated.id = id.to_string();
        self.check_class_session(&updated)?;
        self.class_sessions[index] = updated;
        debug!(id, "class session updated");
        Ok(&self.class_sessions[index])
    }

    /// Removes a class session, detaching its students and dropping its diaries.
    pub fn delete_class_session(&mut self, id: &str) -> StoreResult<ClassSession> {
        let index = position(&self.class_sessions, id)?;
        let mut detached = 0usize;
        for student in self
            .students
            .iter_mut()
            .filter(|student| student.class_session_id.as_deref() == Some(id))
        {
            student.class_session_id = None;
            detached += 1;
        }
        self.diaries.retain(|diary| diary.class_session_id != id);
        debug!(id, detached, "class session deleted");
        Ok(self.class_sessions.remove(index))
    }

    // ---- students ----

    pub fn add_student(&mut self, student: Student) -> StoreResult<&Student> {
        let student = prepare_insert(&self.students, student)?;
        self.check_student(&student)?;
        debug!(id = %student.id, "student added");
        self.students.push(student);
        Ok(&self.students[self.students.len() - 1])
    }

    pub fn update_student(
        &mut self,
        id: &str,
        patch: impl FnOnce(&mut Student),
    ) -> StoreResult<&Student> {
        let index = position(&self.students, id)?;
        let mut updated = self.students[index].clone();
        patch(&mut updated);
        updated.id = id.to_string();
        self.check_student(&updated)?;
        self.students[index] = updated;
        debug!(id, "student updated");
        Ok(&self.students[index])
    }

    pub fn delete_student(&mut self, id: &str) -> StoreResult<Student> {
        let index = position(&self.students, id)?;
        debug!(id, "student deleted");
        Ok(self.students.remove(index))
    }

    // ---- instructors ----

    pub fn add_instructor(&mut self, instructor: Instructor) -> StoreResult<&Instructor> {
        let instructor = prepare_insert(&self.instructors, instructor)?;
        debug!(id = %instructor.id, "instructor added");
        self.instructors.push(instructor);
        Ok(&self.instructors[self.instructors.len() - 1])
    }

    pub fn update_instructor(
        &mut self,
        id: &str,
        patch: impl FnOnce(&mut Instructor),
    ) -> StoreResult<&Instructor> {
        let index = position(&self.instructors, id)?;
        let mut updated = self.instructors[index].clone();
        patch(&mut updated);
        updated.id = id.to_string();
        self.instructors[index] = updated;
        debug!(id, "instructor updated");
        Ok(&self.instructors[index])
    }

    /// Removes an instructor and unassigns them from their class sessions.
    ///
    /// Diaries filed by the instructor reference them permanently, so an
    /// instructor with diaries cannot be deleted.
    pub fn delete_instructor(&mut self, id: &str) -> StoreResult<Instructor> {
        let index = position(&self.instructors, id)?;
        if let Some(diary) = self.diaries.iter().find(|d| d.instructor_id == id) {
            return Err(dangling(&self.instructors[index], "attendance diary", &diary.id));
        }
        for class in self
            .class_sessions
            .iter_mut()
            .filter(|class| class.instructor_id.as_deref() == Some(id))
        {
            class.instructor_id = None;
        }
        debug!(id, "instructor deleted");
        Ok(self.instructors.remove(index))
    }

    // ---- prospects ----

    pub fn add_prospect(&mut self, prospect: Prospect) -> StoreResult<&Prospect> {
        let prospect = prepare_insert(&self.prospects, prospect)?;
        debug!(id = %prospect.id, "prospect added");
        self.prospects.push(prospect);
        Ok(&self.prospects[self.prospects.len() - 1])
    }

    pub fn update_prospect(
        &mut self,
        id: &str,
        patch: impl FnOnce(&mut Prospect),
    ) -> StoreResult<&Prospect> {
        let index = position(&self.prospects, id)?;
        let mut updated = self.prospects[index].clone();
        patch(&mut updated);
        updated.id = id.to_string();
        self.prospects[index] = updated;
        debug!(id, "prospect updated");
        Ok(&self.prospects[index])
    }

    pub fn delete_prospect(&mut self, id: &str) -> StoreResult<Prospect> {
        let index = position(&self.prospects, id)?;
        debug!(id, "prospect deleted");
        Ok(self.prospects.remove(index))
    }

    // ---- attendance diaries ----

    pub fn add_diary(&mut self, diary: AttendanceDiary) -> StoreResult<&AttendanceDiary> {
        let diary = prepare_insert(&self.diaries, diary)?;
        self.check_diary(&diary)?;
        debug!(id = %diary.id, presences = diary.presences.len(), "attendance diary added");
        self.diaries.push(diary);
        Ok(&self.diaries[self.diaries.len() - 1])
    }

    pub fn update_diary(
        &mut self,
        id: &str,
        patch: impl FnOnce(&mut AttendanceDiary),
    ) -> StoreResult<&AttendanceDiary> {
        let index = position(&self.diaries, id)?;
        let mut updated = self.diaries[index].clone();
        patch(&mut updated);
        updated.id = id.to_string();
        self.check_diary(&updated)?;
        self.diaries[index] = updated;
        debug!(id, "attendance diary updated");
        Ok(&self.diaries[index])
    }

    pub fn delete_diary(&mut self, id: &str) -> StoreResult<AttendanceDiary> {
        let index = position(&self.diaries, id)?;
        debug!(id, "attendance diary deleted");
        Ok(self.diaries.remove(index))
    }

    // ---- snapshots ----

    /// Loads a JSON snapshot; a missing file yields an empty store.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no snapshot found, starting empty");
            return Ok(Self::new());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let store: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
        store
            .check_integrity()
            .with_context(|| format!("snapshot {} is inconsistent", path.display()))?;
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Students,
    Prospects,
}

#[derive(Deserialize)]
struct StudentCsvRow {
    id: Option<String>,
    name: String,
    birth_date: Option<NaiveDate>,
    gender: Option<String>,
    class_session_id: Option<String>,
    status: StudentStatus,
    street: Option<String>,
    neighborhood: Option<String>,
    city: Option<String>,
}

#[derive(Deserialize)]
struct ProspectCsvRow {
    id: Option<String>,
    name: String,
    kind: ProspectKind,
    status: ProspectStatus,
    desired_course_id: Option<String>,
    gender: Option<String>,
    ethnicity: Option<String>,
    schooling_level: Option<String>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Imports rows from a CSV file, skipping rows whose id is already stored.
///
/// Returns the number of inserted records. A row referencing a missing
/// class session aborts the import with the rows read so far kept.
pub fn import_csv(store: &mut EntityStore, kind: ImportKind, csv_path: &Path) -> anyhow::Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    match kind {
        ImportKind::Students => {
            for result in reader.deserialize::<StudentCsvRow>() {
                let row = result?;
                let id = blank_to_none(row.id).unwrap_or_default();
                if !id.is_empty() && store.get_student(&id).is_some() {
                    continue;
                }
                let (street, neighborhood, city) = (
                    blank_to_none(row.street),
                    blank_to_none(row.neighborhood),
                    blank_to_none(row.city),
                );
                let address = if street.is_none() && neighborhood.is_none() && city.is_none() {
                    None
                } else {
                    Some(Address {
                        street,
                        neighborhood,
                        city,
                    })
                };
                store.add_student(Student {
                    id,
                    name: row.name,
                    birth_date: row.birth_date,
                    gender: blank_to_none(row.gender),
                    class_session_id: blank_to_none(row.class_session_id),
                    status: row.status,
                    address,
                })?;
                inserted += 1;
            }
        }
        ImportKind::Prospects => {
            for result in reader.deserialize::<ProspectCsvRow>() {
                let row = result?;
                let id = blank_to_none(row.id).unwrap_or_default();
                if !id.is_empty() && store.get_prospect(&id).is_some() {
                    continue;
                }
                store.add_prospect(Prospect {
                    id,
                    name: row.name,
                    kind: row.kind,
                    status: row.status,
                    desired_course_id: blank_to_none(row.desired_course_id),
                    gender: blank_to_none(row.gender),
                    ethnicity: blank_to_none(row.ethnicity),
                    schooling_level: blank_to_none(row.schooling_level),
                })?;
                inserted += 1;
            }
        }
    }

    Ok(inserted)
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).context("invalid date")
}

/// Loads a realistic demo program into the store. Records already present are left alone.
pub fn seed(store: &mut EntityStore) -> anyhow::Result<()> {
    let courses = vec![
        ("course-web", "Desenvolvimento Web", "Técnico"),
        ("course-data", "Análise de Dados", "Superior"),
        ("course-digital", "Inclusão Digital", "Livre"),
    ];
    for (id, name, level) in courses {
        if store.get_course(id).is_none() {
            store.add_course(Course {
                id: id.to_string(),
                name: name.to_string(),
                education_level: level.to_string(),
            })?;
        }
    }

    let curricula = vec![
        ("ementa-web", "course-web", "Front-end do zero", vec!["HTML", "CSS", "JavaScript"]),
        ("ementa-data", "course-data", "Planilhas a Python", vec!["Planilhas", "SQL", "Python"]),
        ("ementa-digital", "course-digital", "Primeiros passos", vec!["Mouse e teclado", "Internet"]),
    ];
    for (id, course_id, title, lessons) in curricula {
        if store.get_curriculum(id).is_none() {
            store.add_curriculum(Curriculum {
                id: id.to_string(),
                course_id: course_id.to_string(),
                title: title.to_string(),
                lessons: lessons
                    .into_iter()
                    .map(|title| Lesson {
                        title: title.to_string(),
                        workload_hours: 8,
                    })
                    .collect(),
            })?;
        }
    }

    let instructors = vec![
        ("inst-ana", "Ana Souza", InstructorStatus::Active, vec!["Front-end", "UX"]),
        ("inst-bruno", "Bruno Lima", InstructorStatus::Active, vec!["Dados", "Python"]),
        ("inst-carla", "Carla Dias", InstructorStatus::Inactive, vec!["Inclusão digital"]),
    ];
    for (id, name, status, specialties) in instructors {
        if store.get_instructor(id).is_none() {
            store.add_instructor(Instructor {
                id: id.to_string(),
                name: name.to_string(),
                status,
                specialties: specialties.into_iter().map(str::to_string).collect(),
            })?;
        }
    }

    let classes = vec![
        ("turma-web-1", "Web 2026.1", "ementa-web", Some("inst-ana"), ClassStatus::InProgress, date(2026, 2, 2)?, date(2026, 6, 30)?, 25, 3),
        ("turma-data-1", "Dados 2025.2", "ementa-data", Some("inst-bruno"), ClassStatus::Finished, date(2025, 8, 4)?, date(2025, 12, 12)?, 20, 2),
        ("turma-digital-1", "Inclusão 2026.2", "ementa-digital", None, ClassStatus::Planned, date(2026, 8, 3)?, date(2026, 11, 27)?, 15, 0),
    ];
    for (id, name, curriculum_id, instructor_id, status, start_date, end_date, seats_total, seats_filled) in classes {
        if store.get_class_session(id).is_none() {
            store.add_class_session(ClassSession {
                id: id.to_string(),
                name: name.to_string(),
                curriculum_id: curriculum_id.to_string(),
                instructor_id: instructor_id.map(str::to_string),
                status,
                start_date,
                end_date,
                seats_total,
                seats_filled,
            })?;
        }
    }

    let students = vec![
        ("aluno-1", "Avery Lima", date(2004, 3, 12)?, "Feminino", Some("turma-web-1"), StudentStatus::Active, Some("Centro")),
        ("aluno-2", "Jules Moreno", date(1998, 11, 2)?, "Masculino", Some("turma-web-1"), StudentStatus::Active, Some("Boa Vista")),
        ("aluno-3", "Kiara Patel", date(2001, 7, 30)?, "Feminino", Some("turma-web-1"), StudentStatus::Dropped, None),
        ("aluno-4", "Diego Ramos", date(1989, 1, 5)?, "Masculino", Some("turma-data-1"), StudentStatus::Completed, Some("Centro")),
        ("aluno-5", "Elisa Torres", date(1979, 9, 21)?, "Feminino", Some("turma-data-1"), StudentStatus::Completed, Some("Jardim América")),
        ("aluno-6", "Felipe Nunes", date(2008, 5, 14)?, "Masculino", None, StudentStatus::Inactive, Some("Boa Vista")),
    ];
    for (id, name, birth_date, gender, class_id, status, neighborhood) in students {
        if store.get_student(id).is_none() {
            store.add_student(Student {
                id: id.to_string(),
                name: name.to_string(),
                birth_date: Some(birth_date),
                gender: Some(gender.to_string()),
                class_session_id: class_id.map(str::to_string),
                status,
                address: Some(Address {
                    street: None,
                    neighborhood: neighborhood.map(str::to_string),
                    city: Some("Recife".to_string()),
                }),
            })?;
        }
    }

    let prospects = vec![
        ("int-1", "Gabi Rocha", ProspectKind::Student, ProspectStatus::New, "course-web", "Feminino", "Parda", "Ensino médio completo"),
        ("int-2", "Hugo Alves", ProspectKind::Student, ProspectStatus::Contacted, "course-data", "Masculino", "Preta", "Superior incompleto"),
        ("int-3", "Iara Costa", ProspectKind::Volunteer, ProspectStatus::New, "course-web", "Feminino", "", "Superior completo"),
        ("int-4", "João Melo", ProspectKind::Student, ProspectStatus::Withdrawn, "course-digital", "", "Branca", "Ensino fundamental"),
    ];
    for (id, name, kind, status, course_id, gender, ethnicity, schooling) in prospects {
        if store.get_prospect(id).is_none() {
            store.add_prospect(Prospect {
                id: id.to_string(),
                name: name.to_string(),
                kind,
                status,
                desired_course_id: Some(course_id.to_string()),
                gender: blank_to_none(Some(gender.to_string())),
                ethnicity: blank_to_none(Some(ethnicity.to_string())),
                schooling_level: Some(schooling.to_string()),
            })?;
        }
    }

    let diaries = vec![
        ("diario-1", "turma-web-1", "inst-ana", date(2026, 10, 6)?, vec![("aluno-1", PresenceStatus::Present), ("aluno-2", PresenceStatus::Present), ("aluno-3", PresenceStatus::Absent)]),
        ("diario-2", "turma-web-1", "inst-ana", date(2026, 10, 13)?, vec![("aluno-1", PresenceStatus::Present), ("aluno-2", PresenceStatus::Justified), ("aluno-3", PresenceStatus::Absent)]),
        ("diario-3", "turma-data-1", "inst-bruno", date(2025, 11, 10)?, vec![("aluno-4", PresenceStatus::Present), ("aluno-5", PresenceStatus::Present)]),
    ];
    for (id, class_id, instructor_id, when, presences) in diaries {
        if store.get_diary(id).is_none() {
            store.add_diary(AttendanceDiary {
                id: id.to_string(),
                class_session_id: class_id.to_string(),
                instructor_id: instructor_id.to_string(),
                date: when,
                presences: presences
                    .into_iter()
                    .map(|(student_id, status)| AttendancePresence {
                        student_id: student_id.to_string(),
                        status,
                    })
                    .collect(),
            })?;
        }
    }

    Ok(())
}
