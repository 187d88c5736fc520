use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::filter::FilteredView;
use crate::models::{
    AttendanceDiary, ClassSession, ClassStatus, DistributionEntry, HasStatus, Instructor,
    InstructorPerformance, InstructorStatus, PresenceStatus, Status, StudentStatus,
};
use crate::store::EntityStore;

/// Label used for records whose grouping field is missing or blank.
pub const NOT_INFORMED: &str = "Not informed";

pub const NEIGHBORHOOD_TOP_N: usize = 10;

/// Counts records per status. Every status value is present, zero when unused.
pub fn status_counts<'a, T>(records: impl IntoIterator<Item = &'a T>) -> BTreeMap<T::Status, usize>
where
    T: HasStatus + 'a,
{
    let mut counts: BTreeMap<T::Status, usize> =
        <T::Status as Status>::ALL.iter().map(|status| (*status, 0)).collect();
    for record in records {
        *counts.entry(record.status()).or_insert(0) += 1;
    }
    counts
}

/// `count / total * 100` with one decimal place, or `"0"` when there is no total.
///
/// Ties round up, so 1 of 16 reads "6.3".
pub fn rate(count: usize, total: usize) -> String {
    if total == 0 {
        return "0".to_string();
    }
    let tenths = (count as u128 * 2000 + total as u128) / (total as u128 * 2);
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Groups records by an optional text field, largest groups first.
///
/// Missing and blank values are counted under [`NOT_INFORMED`]. Groups with
/// equal counts keep the order in which they were first seen.
pub fn distribution<'a, T: 'a>(
    records: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> Option<&str>,
    top_n: Option<usize>,
) -> Vec<DistributionEntry> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, usize)> = Vec::new();
    let mut total = 0usize;

    for record in records {
        let label = key(record)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(NOT_INFORMED);
        total += 1;
        match index.get(label) {
            Some(&slot) => groups[slot].1 += 1,
            None => {
                index.insert(label.to_string(), groups.len());
                groups.push((label.to_string(), 1));
            }
        }
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));
    if let Some(limit) = top_n {
        groups.truncate(limit);
    }

    groups
        .into_iter()
        .map(|(label, count)| DistributionEntry {
            percentage: rate(count, total),
            label,
            count,
        })
        .collect()
}

/// Whole years between `birth_date` and `today`, counting a year only once
/// the birthday has been reached.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

pub fn age_bracket(age: i32) -> &'static str {
    match age {
        i32::MIN..=17 => "<18",
        18..=24 => "18-24",
        25..=34 => "25-34",
        35..=49 => "35-49",
        _ => "50+",
    }
}

const AGE_BRACKETS: [&str; 6] = ["<18", "18-24", "25-34", "35-49", "50+", NOT_INFORMED];

fn presence_totals<'a>(diaries: impl IntoIterator<Item = &'a AttendanceDiary>) -> (usize, usize) {
    diaries
        .into_iter()
        .flat_map(|diary| diary.presences.iter())
        .fold((0, 0), |(present, total), presence| {
            let hit = usize::from(presence.status == PresenceStatus::Present);
            (present + hit, total + 1)
        })
}

/// Builds a performance record for every active instructor, in input order.
pub fn instructor_performance<'a>(
    instructors: impl IntoIterator<Item = &'a Instructor>,
    classes: &[&ClassSession],
    diaries: &[AttendanceDiary],
    today: NaiveDate,
) -> Vec<InstructorPerformance> {
    instructors
        .into_iter()
        .filter(|instructor| instructor.status == InstructorStatus::Active)
        .map(|instructor| {
            let own: Vec<&ClassSession> = classes
                .iter()
                .copied()
                .filter(|class| class.instructor_id.as_deref() == Some(instructor.id.as_str()))
                .collect();
            let own_ids: HashSet<&str> = own.iter().map(|class| class.id.as_str()).collect();

            let (present, total) = presence_totals(
                diaries
                    .iter()
                    .filter(|diary| own_ids.contains(diary.class_session_id.as_str())),
            );
            let average_attendance_rate = if total == 0 {
                0
            } else {
                (present as f64 / total as f64 * 100.0).round() as u32
            };

            let filed: Vec<&AttendanceDiary> = diaries
                .iter()
                .filter(|diary| diary.instructor_id == instructor.id)
                .collect();
            let diaries_this_month = filed
                .iter()
                .filter(|diary| {
                    diary.date.year() == today.year() && diary.date.month() == today.month()
                })
                .count();

            InstructorPerformance {
                instructor_id: instructor.id.clone(),
                name: instructor.name.clone(),
                active_classes: own
                    .iter()
                    .filter(|class| class.status == ClassStatus::InProgress)
                    .count(),
                finished_classes: own
                    .iter()
                    .filter(|class| class.status == ClassStatus::Finished)
                    .count(),
                total_students: own.iter().map(|class| class.seats_filled).sum(),
                average_attendance_rate,
                diaries_logged: filed.len(),
                diaries_this_month,
            }
        })
        .collect()
}

/// Orders performance records by score, best first. Equal scores keep their input order.
pub fn rank_instructors(mut records: Vec<InstructorPerformance>) -> Vec<InstructorPerformance> {
    records.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    records
}

/// Every number the impact dashboard shows for one filtered view.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactSummary {
    pub total_students: usize,
    pub total_classes: usize,
    pub total_instructors: usize,
    pub total_prospects: usize,
    pub student_status: BTreeMap<StudentStatus, usize>,
    pub class_status: BTreeMap<ClassStatus, usize>,
    pub completion_rate: String,
    pub dropout_rate: String,
    pub attendance_rate: String,
    pub seat_occupancy_rate: String,
    pub neighborhoods: Vec<DistributionEntry>,
    pub prospects_by_gender: Vec<DistributionEntry>,
    pub prospects_by_ethnicity: Vec<DistributionEntry>,
    pub prospects_by_schooling: Vec<DistributionEntry>,
    pub courses_by_education_level: Vec<DistributionEntry>,
    pub student_age_brackets: Vec<DistributionEntry>,
    pub ranking: Vec<InstructorPerformance>,
}

pub fn summarize(store: &EntityStore, view: &FilteredView<'_>, today: NaiveDate) -> ImpactSummary {
    let student_status = status_counts(view.students.iter().copied());
    let class_status = status_counts(view.classes.iter().copied());
    let total_students = view.students.len();

    let class_ids: HashSet<&str> = view.classes.iter().map(|class| class.id.as_str()).collect();
    let (present, presences) = presence_totals(
        store
            .diaries()
            .iter()
            .filter(|diary| class_ids.contains(diary.class_session_id.as_str())),
    );

    let seats_filled: u32 = view.classes.iter().map(|class| class.seats_filled).sum();
    let seats_total: u32 = view.classes.iter().map(|class| class.seats_total).sum();

    let curriculum_ids: HashSet<&str> = view
        .classes
        .iter()
        .map(|class| class.curriculum_id.as_str())
        .collect();
    let course_ids: HashSet<&str> = store
        .curricula()
        .iter()
        .filter(|curriculum| curriculum_ids.contains(curriculum.id.as_str()))
        .map(|curriculum| curriculum.course_id.as_str())
        .collect();
    let courses_by_education_level = distribution(
        store
            .courses()
            .iter()
            .filter(|course| course_ids.contains(course.id.as_str())),
        |course| Some(course.education_level.as_str()),
        None,
    );

    let mut brackets: HashMap<&str, usize> = HashMap::new();
    for student in view.students.iter() {
        let bracket = student
            .birth_date
            .map(|birth| age_bracket(age_on(birth, today)))
            .unwrap_or(NOT_INFORMED);
        *brackets.entry(bracket).or_insert(0) += 1;
    }
    let student_age_brackets = AGE_BRACKETS
        .iter()
        .map(|label| {
            let count = brackets.get(label).copied().unwrap_or(0);
            DistributionEntry {
                label: label.to_string(),
                count,
                percentage: rate(count, total_students),
            }
        })
        .collect();

    let performance = instructor_performance(
        view.instructors.iter().copied(),
        &view.classes,
        store.diaries(),
        today,
    );

    ImpactSummary {
        total_students,
        total_classes: view.classes.len(),
        total_instructors: view.instructors.len(),
        total_prospects: view.prospects.len(),
        completion_rate: rate(student_status[&StudentStatus::Completed], total_students),
        dropout_rate: rate(student_status[&StudentStatus::Dropped], total_students),
        attendance_rate: rate(present, presences),
        seat_occupancy_rate: rate(seats_filled as usize, seats_total as usize),
        neighborhoods: distribution(
            view.students.iter().copied(),
            |student| student.neighborhood(),
            Some(NEIGHBORHOOD_TOP_N),
        ),
        prospects_by_gender: distribution(
            view.prospects.iter().copied(),
            |prospect| prospect.gender.as_deref(),
            None,
        ),
        prospects_by_ethnicity: distribution(
            view.prospects.iter().copied(),
            |prospect| prospect.ethnicity.as_deref(),
            None,
        ),
        prospects_by_schooling: distribution(
            view.prospects.iter().copied(),
            |prospect| prospect.schooling_level.as_deref(),
            None,
        ),
        courses_by_education_level,
        student_age_brackets,
        ranking: rank_instructors(performance),
        student_status,
        class_status,
    }
}
