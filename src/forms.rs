use anyhow::Context;
use chrono::NaiveDate;

use crate::models::{Address, Instructor, InstructorStatus, Student, StudentStatus};
use crate::validation::{FieldSchema, FormData, Rule};
use crate::wizard::{StepDefinition, WizardController, WizardDefinition};

pub const GENDERS: &[&str] = &["Feminino", "Masculino", "Não binário", "Prefiro não informar"];
pub const SHIFTS: &[&str] = &["morning", "afternoon", "evening", "weekend"];

pub fn student_enrollment() -> WizardController<FieldSchema> {
    let definition = WizardDefinition {
        name: "student-enrollment",
        steps: vec![
            StepDefinition::new("Personal data", &["name", "birth_date", "gender", "cpf"]),
            StepDefinition::new("Address", &["street", "neighborhood", "city"]),
            StepDefinition::new("Contact", &["email", "phone"]),
            StepDefinition::new("Guardian", &["guardian_name", "guardian_phone"]),
            StepDefinition::optional("Link to class", &["class_session_id"]),
            StepDefinition::optional("Documents", &["documents"]),
        ],
        allow_jump: true,
    };
    let schema = FieldSchema::new()
        .field("name", vec![Rule::Required, Rule::MinLength(3), Rule::MaxLength(120)])
        .field("birth_date", vec![Rule::Required, Rule::Date])
        .field("gender", vec![Rule::OneOf(GENDERS)])
        .field("cpf", vec![Rule::Required, Rule::Digits(11)])
        .field("street", vec![Rule::Required])
        .field("neighborhood", vec![Rule::Required])
        .field("city", vec![Rule::Required])
        .field("email", vec![Rule::Email])
        .field("phone", vec![Rule::Required, Rule::Digits(11)])
        .field("guardian_name", vec![Rule::MinLength(3)])
        .field("guardian_phone", vec![Rule::Digits(11)]);
    WizardController::new(definition, schema)
}

pub fn instructor_registration() -> WizardController<FieldSchema> {
    let definition = WizardDefinition {
        name: "instructor-registration",
        steps: vec![
            StepDefinition::new("Personal data", &["name", "birth_date", "cpf"]),
            StepDefinition::new("Contact", &["email", "phone"]),
            StepDefinition::new("Specialties", &["specialties"]),
            StepDefinition::new("Availability", &["availability"]),
            StepDefinition::optional("Documents", &["documents"]),
        ],
        allow_jump: false,
    };
    let schema = FieldSchema::new()
        .field("name", vec![Rule::Required, Rule::MinLength(3), Rule::MaxLength(120)])
        .field("birth_date", vec![Rule::Date])
        .field("cpf", vec![Rule::Required, Rule::Digits(11)])
        .field("email", vec![Rule::Required, Rule::Email])
        .field("phone", vec![Rule::Required, Rule::Digits(11)])
        .field("specialties", vec![Rule::Required, Rule::MinLength(2)])
        .field("availability", vec![Rule::Required, Rule::OneOf(SHIFTS)]);
    WizardController::new(definition, schema)
}

fn text(form: &FormData, field: &str) -> Option<String> {
    form.get(field)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Builds the student record a completed enrollment form describes.
pub fn student_from_form(form: &FormData) -> anyhow::Result<Student> {
    let name = text(form, "name").context("enrollment form is missing a name")?;
    let birth_date = text(form, "birth_date")
        .map(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d"))
        .transpose()
        .context("enrollment form has an invalid birth date")?;
    let address = Address {
        street: text(form, "street"),
        neighborhood: text(form, "neighborhood"),
        city: text(form, "city"),
    };

    Ok(Student {
        id: String::new(),
        name,
        birth_date,
        gender: text(form, "gender"),
        class_session_id: text(form, "class_session_id"),
        status: StudentStatus::Active,
        address: Some(address),
    })
}

/// Builds the instructor record a completed registration form describes.
///
/// Specialties are entered as a comma separated list and keep their order.
pub fn instructor_from_form(form: &FormData) -> anyhow::Result<Instructor> {
    let name = text(form, "name").context("registration form is missing a name")?;
    let specialties = text(form, "specialties")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Instructor {
        id: String::new(),
        name,
        status: InstructorStatus::Active,
        specialties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, &str)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete_student() -> FormData {
        answers(&[
            ("name", "Avery Lima"),
            ("birth_date", "2004-03-12"),
            ("gender", "Feminino"),
            ("cpf", "123.456.789-09"),
            ("street", "Rua da Aurora, 100"),
            ("neighborhood", "Boa Vista"),
            ("city", "Recife"),
            ("phone", "(81) 99876-5432"),
        ])
    }

    #[test]
    fn student_wizard_has_six_steps_with_optional_tail() {
        let wizard = student_enrollment();
        let definition = wizard.definition();
        assert_eq!(definition.step_count(), 6);
        assert!(definition.allow_jump);
        assert!(definition.step(5).unwrap().optional);
        assert!(definition.step(6).unwrap().optional);
        assert!(!definition.step(1).unwrap().optional);
    }

    #[test]
    fn student_wizard_walks_to_submission() {
        let mut wizard = student_enrollment();
        wizard.set_fields(complete_student());
        while !wizard.is_last_step() {
            assert!(wizard.next(), "blocked on {:?}", wizard.errors().messages());
        }
        let student = wizard.submit(student_from_form).unwrap().unwrap();
        assert_eq!(student.name, "Avery Lima");
        assert_eq!(student.neighborhood(), Some("Boa Vista"));
        assert_eq!(student.class_session_id, None);
        assert_eq!(student.status, StudentStatus::Active);
    }

    #[test]
    fn student_wizard_blocks_on_missing_address() {
        let mut form = complete_student();
        form.remove("neighborhood");
        let mut wizard = student_enrollment();
        wizard.set_fields(form);
        assert!(wizard.next());
        assert!(!wizard.next());
        assert_eq!(wizard.current_step(), 2);
        assert!(wizard.errors().get("neighborhood").is_some());
    }

    #[test]
    fn instructor_wizard_requires_known_shift() {
        let mut wizard = instructor_registration();
        wizard.set_fields(answers(&[
            ("name", "Bruno Lima"),
            ("cpf", "98765432100"),
            ("email", "bruno@example.org"),
            ("phone", "81988887777"),
            ("specialties", "Dados, Python, "),
            ("availability", "midnight"),
        ]));
        assert!(wizard.next());
        assert!(wizard.next());
        assert!(wizard.next());
        assert!(!wizard.next());
        assert_eq!(wizard.current_step(), 4);

        wizard.set_field("availability", "evening");
        assert!(wizard.next());
        let instructor = wizard.submit(instructor_from_form).unwrap().unwrap();
        assert_eq!(instructor.specialties, vec!["Dados", "Python"]);
        assert_eq!(instructor.status, InstructorStatus::Active);
    }

    #[test]
    fn conversion_rejects_bad_birth_date() {
        let mut form = complete_student();
        form.insert("birth_date".to_string(), "12/03/2004".to_string());
        assert!(student_from_form(&form).is_err());
    }
}
