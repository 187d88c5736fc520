use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::{ClassSession, Instructor, Prospect, Student};
use crate::store::EntityStore;

/// Dashboard filter: an optional course and an inclusive range on class start dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub course_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.course_id.is_none() && self.date_from.is_none() && self.date_to.is_none()
    }

    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "all courses and dates".to_string();
        }
        let mut parts = Vec::new();
        if let Some(course_id) = &self.course_id {
            parts.push(format!("course {course_id}"));
        }
        match (self.date_from, self.date_to) {
            (Some(from), Some(to)) => parts.push(format!("classes starting {from} to {to}")),
            (Some(from), None) => parts.push(format!("classes starting from {from}")),
            (None, Some(to)) => parts.push(format!("classes starting until {to}")),
            (None, None) => {}
        }
        parts.join(", ")
    }
}

/// The four collections a dashboard renders, narrowed consistently.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    pub classes: Vec<&'a ClassSession>,
    pub students: Vec<&'a Student>,
    pub prospects: Vec<&'a Prospect>,
    pub instructors: Vec<&'a Instructor>,
}

pub fn apply<'a>(store: &'a EntityStore, criteria: &FilterCriteria) -> FilteredView<'a> {
    if criteria.is_empty() {
        return FilteredView {
            classes: store.class_sessions().iter().collect(),
            students: store.students().iter().collect(),
            prospects: store.prospects().iter().collect(),
            instructors: store.instructors().iter().collect(),
        };
    }

    let mut classes: Vec<&ClassSession> = store.class_sessions().iter().collect();

    if let Some(course_id) = criteria.course_id.as_deref() {
        let curricula: HashSet<&str> = store
            .curricula()
            .iter()
            .filter(|curriculum| curriculum.course_id == course_id)
            .map(|curriculum| curriculum.id.as_str())
            .collect();
        if curricula.is_empty() {
            return FilteredView::default();
        }
        classes.retain(|class| curricula.contains(class.curriculum_id.as_str()));
    }
    if let Some(from) = criteria.date_from {
        classes.retain(|class| class.start_date >= from);
    }
    if let Some(to) = criteria.date_to {
        classes.retain(|class| class.start_date <= to);
    }

    let class_ids: HashSet<&str> = classes.iter().map(|class| class.id.as_str()).collect();

    let students = store
        .students()
        .iter()
        .filter(|student| {
            student
                .class_session_id
                .as_deref()
                .is_some_and(|id| class_ids.contains(id))
        })
        .collect();

    // Prospects have no class reference, so only the course narrows them.
    let prospects = match criteria.course_id.as_deref() {
        Some(course_id) => {
            let course_name = store.get_course(course_id).map(|course| course.name.as_str());
            store
                .prospects()
                .iter()
                .filter(|prospect| {
                    prospect
                        .desired_course_id
                        .as_deref()
                        .is_some_and(|desired| desired == course_id || Some(desired) == course_name)
                })
                .collect()
        }
        None => store.prospects().iter().collect(),
    };

    let instructor_ids: HashSet<&str> = classes
        .iter()
        .filter_map(|class| class.instructor_id.as_deref())
        .collect();
    let instructors = store
        .instructors()
        .iter()
        .filter(|instructor| instructor_ids.contains(instructor.id.as_str()))
        .collect();

    FilteredView {
        classes,
        students,
        prospects,
        instructors,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::models::{
        Course, Curriculum, InstructorStatus, ProspectKind, ProspectStatus, StudentStatus,
    };
    use crate::store::tests::{class, day, instructor, student};

    fn prospect(id: &str, course: Option<&str>) -> Prospect {
        Prospect {
            id: id.to_string(),
            name: id.to_string(),
            kind: ProspectKind::Student,
            status: ProspectStatus::New,
            desired_course_id: course.map(str::to_string),
            gender: None,
            ethnicity: None,
            schooling_level: None,
        }
    }

    fn scenario() -> EntityStore {
        let mut store = EntityStore::new();
        for (id, name) in [("course1", "Web"), ("course2", "Dados"), ("course3", "Vazio")] {
            store
                .add_course(Course {
                    id: id.to_string(),
                    name: name.to_string(),
                    education_level: "Livre".to_string(),
                })
                .unwrap();
        }
        for (id, course_id) in [("e1", "course1"), ("e2", "course2")] {
            store
                .add_curriculum(Curriculum {
                    id: id.to_string(),
                    course_id: course_id.to_string(),
                    title: id.to_string(),
                    lessons: Vec::new(),
                })
                .unwrap();
        }
        store.add_instructor(instructor("i1", InstructorStatus::Active)).unwrap();
        store.add_instructor(instructor("i2", InstructorStatus::Active)).unwrap();
        store.add_instructor(instructor("i3", InstructorStatus::Active)).unwrap();

        store.add_class_session(class("c1", "e1", Some("i1"))).unwrap();
        let mut later = class("c2", "e1", Some("i2"));
        later.start_date = day("2024-03-01");
        store.add_class_session(later).unwrap();
        let mut other = class("c3", "e2", Some("i3"));
        other.start_date = day("2024-02-01");
        store.add_class_session(other).unwrap();

        store.add_student(student("s1", Some("c1"), StudentStatus::Active)).unwrap();
        store.add_student(student("s2", None, StudentStatus::Active)).unwrap();
        store.add_student(student("s3", Some("c2"), StudentStatus::Completed)).unwrap();
        store.add_student(student("s4", Some("c3"), StudentStatus::Dropped)).unwrap();

        store.add_prospect(prospect("p1", Some("course1"))).unwrap();
        store.add_prospect(prospect("p2", Some("Web"))).unwrap();
        store.add_prospect(prospect("p3", Some("course2"))).unwrap();
        store.add_prospect(prospect("p4", None)).unwrap();
        store
    }

    fn ids<T>(records: &[&T], id: impl Fn(&T) -> &str) -> Vec<String> {
        records.iter().map(|r| id(r).to_string()).collect()
    }

    #[test]
    fn empty_criteria_is_identity() {
        let store = scenario();
        let view = apply(&store, &FilterCriteria::default());
        assert_eq!(view.classes.len(), 3);
        assert_eq!(view.students.len(), 4);
        assert_eq!(view.prospects.len(), 4);
        assert_eq!(view.instructors.len(), 3);
    }

    #[test]
    fn course_filter_excludes_unlinked_students() {
        let mut store = EntityStore::new();
        store
            .add_course(Course {
                id: "course1".to_string(),
                name: "Web".to_string(),
                education_level: "Livre".to_string(),
            })
            .unwrap();
        store
            .add_curriculum(Curriculum {
                id: "e1".to_string(),
                course_id: "course1".to_string(),
                title: "e1".to_string(),
                lessons: Vec::new(),
            })
            .unwrap();
        store.add_instructor(instructor("i1", InstructorStatus::Active)).unwrap();
        store.add_class_session(class("c1", "e1", Some("i1"))).unwrap();
        store.add_student(student("s1", Some("c1"), StudentStatus::Active)).unwrap();
        store.add_student(student("s2", None, StudentStatus::Active)).unwrap();

        let criteria = FilterCriteria {
            course_id: Some("course1".to_string()),
            ..Default::default()
        };
        let view = apply(&store, &criteria);
        assert_eq!(ids(&view.classes, |c| c.id.as_str()), vec!["c1"]);
        assert_eq!(ids(&view.students, |s| s.id.as_str()), vec!["s1"]);
    }

    #[test]
    fn course_filter_narrows_every_collection() {
        let store = scenario();
        let criteria = FilterCriteria {
            course_id: Some("course1".to_string()),
            ..Default::default()
        };
        let view = apply(&store, &criteria);
        assert_eq!(ids(&view.classes, |c| c.id.as_str()), vec!["c1", "c2"]);
        assert_eq!(ids(&view.students, |s| s.id.as_str()), vec!["s1", "s3"]);
        assert_eq!(ids(&view.prospects, |p| p.id.as_str()), vec!["p1", "p2"]);
        assert_eq!(ids(&view.instructors, |i| i.id.as_str()), vec!["i1", "i2"]);
    }

    #[test]
    fn date_range_is_inclusive_and_leaves_prospects_alone() {
        let store = scenario();
        let criteria = FilterCriteria {
            course_id: None,
            date_from: Some(day("2024-02-01")),
            date_to: Some(day("2024-03-01")),
        };
        let view = apply(&store, &criteria);
        assert_eq!(ids(&view.classes, |c| c.id.as_str()), vec!["c2", "c3"]);
        assert_eq!(ids(&view.students, |s| s.id.as_str()), vec!["s3", "s4"]);
        assert_eq!(view.prospects.len(), 4);
        assert_eq!(ids(&view.instructors, |i| i.id.as_str()), vec!["i2", "i3"]);
    }

    #[test]
    fn prospects_ignore_dates_when_course_is_set() {
        let store = scenario();
        let criteria = FilterCriteria {
            course_id: Some("course1".to_string()),
            date_from: Some(day("2030-01-01")),
            date_to: None,
        };
        let view = apply(&store, &criteria);
        assert!(view.classes.is_empty());
        assert!(view.students.is_empty());
        assert!(view.instructors.is_empty());
        assert_eq!(ids(&view.prospects, |p| p.id.as_str()), vec!["p1", "p2"]);
    }

    #[test]
    fn course_without_curricula_empties_everything() {
        let store = scenario();
        for course_id in ["course3", "unknown"] {
            let criteria = FilterCriteria {
                course_id: Some(course_id.to_string()),
                ..Default::default()
            };
            let view = apply(&store, &criteria);
            assert!(view.classes.is_empty());
            assert!(view.students.is_empty());
            assert!(view.prospects.is_empty());
            assert!(view.instructors.is_empty());
        }
    }

    #[test]
    fn describes_scope() {
        assert_eq!(FilterCriteria::default().describe(), "all courses and dates");
        let criteria = FilterCriteria {
            course_id: Some("course1".to_string()),
            date_from: Some(day("2024-01-01")),
            date_to: None,
        };
        assert_eq!(
            criteria.describe(),
            "course course1, classes starting from 2024-01-01"
        );
    }

    proptest! {
        #[test]
        fn filtered_collections_are_subsets(
            course in prop::option::of(prop::sample::select(vec!["course1", "course2", "course3", "x"])),
            from in prop::option::of(0i64..120),
            to in prop::option::of(0i64..120),
        ) {
            let store = scenario();
            let base = day("2023-12-01");
            let criteria = FilterCriteria {
                course_id: course.map(str::to_string),
                date_from: from.map(|d| base + chrono::Duration::days(d)),
                date_to: to.map(|d| base + chrono::Duration::days(d)),
            };
            let view = apply(&store, &criteria);
            prop_assert!(view.classes.iter().all(|c| store.class_sessions().contains(c)));
            prop_assert!(view.students.iter().all(|s| store.students().contains(s)));
            prop_assert!(view.instructors.iter().all(|i| store.instructors().contains(i)));
            prop_assert!(view.prospects.iter().all(|p| store.prospects().contains(p)));
        }
    }
}
