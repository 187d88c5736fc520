use std::collections::BTreeSet;

use tracing::debug;

use crate::validation::{FormData, Schema, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub title: &'static str,
    pub fields: Vec<&'static str>,
    /// Optional steps never block navigation.
    pub optional: bool,
}

impl StepDefinition {
    pub fn new(title: &'static str, fields: &[&'static str]) -> Self {
        Self {
            title,
            fields: fields.to_vec(),
            optional: false,
        }
    }

    pub fn optional(title: &'static str, fields: &[&'static str]) -> Self {
        Self {
            optional: true,
            ..Self::new(title, fields)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardDefinition {
    pub name: &'static str,
    pub steps: Vec<StepDefinition>,
    /// Whether the step indicator can be clicked to jump between steps.
    pub allow_jump: bool,
}

impl WizardDefinition {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Steps are numbered from 1.
    pub fn step(&self, number: usize) -> Option<&StepDefinition> {
        number.checked_sub(1).and_then(|index| self.steps.get(index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    Next,
    Previous,
    JumpTo(usize),
    Submit,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub current_step: usize,
    pub completed_steps: BTreeSet<usize>,
    /// Errors from the last blocked transition, cleared by the next successful one.
    pub errors: ValidationErrors,
    pub submitted: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current_step: 1,
            completed_steps: BTreeSet::new(),
            errors: ValidationErrors::default(),
            submitted: false,
        }
    }
}

impl WizardState {
    pub fn is_completed(&self, step: usize) -> bool {
        self.completed_steps.contains(&step)
    }
}

fn validate_step(
    definition: &WizardDefinition,
    schema: &dyn Schema,
    step: usize,
    values: &FormData,
) -> ValidationErrors {
    match definition.step(step) {
        Some(step) if !step.optional => schema.validate(&step.fields, values),
        _ => ValidationErrors::default(),
    }
}

/// Computes the state that follows `action`.
///
/// Blocked moves return the same position with the field errors attached.
/// Moves that are not allowed at all (jumping ahead, submitting early,
/// anything after submission other than `Reset`) leave the state untouched.
pub fn transition(
    definition: &WizardDefinition,
    schema: &dyn Schema,
    state: &WizardState,
    values: &FormData,
    action: WizardAction,
) -> WizardState {
    if state.submitted && action != WizardAction::Reset {
        return state.clone();
    }

    let last = definition.step_count().max(1);
    let current = state.current_step;

    match action {
        WizardAction::Reset => WizardState::default(),
        WizardAction::Previous => WizardState {
            current_step: current.saturating_sub(1).max(1),
            errors: ValidationErrors::default(),
            ..state.clone()
        },
        WizardAction::Next => {
            let errors = validate_step(definition, schema, current, values);
            if !errors.is_empty() {
                return WizardState {
                    errors,
                    ..state.clone()
                };
            }
            let mut completed_steps = state.completed_steps.clone();
            completed_steps.insert(current);
            WizardState {
                current_step: (current + 1).min(last),
                completed_steps,
                errors,
                submitted: false,
            }
        }
        WizardAction::JumpTo(target) => {
            if !definition.allow_jump || target < 1 || target > last || target == current {
                state.clone()
            } else if target == current + 1 {
                transition(definition, schema, state, values, WizardAction::Next)
            } else if state.is_completed(target) {
                WizardState {
                    current_step: target,
                    errors: ValidationErrors::default(),
                    ..state.clone()
                }
            } else {
                state.clone()
            }
        }
        WizardAction::Submit => {
            if current != last {
                return state.clone();
            }
            let errors = validate_step(definition, schema, current, values);
            if !errors.is_empty() {
                return WizardState {
                    errors,
                    ..state.clone()
                };
            }
            let mut completed_steps = state.completed_steps.clone();
            completed_steps.insert(current);
            WizardState {
                current_step: current,
                completed_steps,
                errors,
                submitted: true,
            }
        }
    }
}

/// Holds one wizard's form data and drives it through [`transition`].
pub struct WizardController<S> {
    definition: WizardDefinition,
    schema: S,
    state: WizardState,
    values: FormData,
}

impl<S: Schema> WizardController<S> {
    pub fn new(definition: WizardDefinition, schema: S) -> Self {
        Self {
            definition,
            schema,
            state: WizardState::default(),
            values: FormData::new(),
        }
    }

    pub fn definition(&self) -> &WizardDefinition {
        &self.definition
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn values(&self) -> &FormData {
        &self.values
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn is_last_step(&self) -> bool {
        self.state.current_step == self.definition.step_count()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.state.errors
    }

    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn set_fields(&mut self, values: FormData) {
        self.values.extend(values);
    }

    fn apply(&mut self, action: WizardAction) {
        let next = transition(
            &self.definition,
            &self.schema,
            &self.state,
            &self.values,
            action,
        );
        if next.errors.is_empty() {
            debug!(
                wizard = self.definition.name,
                ?action,
                from = self.state.current_step,
                to = next.current_step,
                "wizard transition"
            );
        } else {
            debug!(
                wizard = self.definition.name,
                ?action,
                step = next.current_step,
                fields = ?next.errors.fields().collect::<Vec<_>>(),
                "wizard step blocked"
            );
        }
        self.state = next;
    }

    /// Returns whether the current step validated. On the last step a valid
    /// `next` completes the step without moving.
    pub fn next(&mut self) -> bool {
        let before = self.state.current_step;
        self.apply(WizardAction::Next);
        self.state.current_step != before || (self.state.errors.is_empty() && self.is_last_step())
    }

    pub fn previous(&mut self) -> bool {
        let before = self.state.current_step;
        self.apply(WizardAction::Previous);
        self.state.current_step != before
    }

    pub fn jump_to(&mut self, step: usize) -> bool {
        let before = self.state.current_step;
        self.apply(WizardAction::JumpTo(step));
        self.state.current_step != before
    }

    pub fn reset(&mut self) {
        self.apply(WizardAction::Reset);
        self.values.clear();
    }

    /// Validates the last step and hands the form data to `on_submit`.
    ///
    /// Returns `None` without calling `on_submit` when not on the last step,
    /// when the step does not validate, or when the wizard was already submitted.
    pub fn submit<R>(&mut self, on_submit: impl FnOnce(&FormData) -> R) -> Option<R> {
        if self.state.submitted {
            return None;
        }
        self.apply(WizardAction::Submit);
        if self.state.submitted {
            Some(on_submit(&self.values))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldError, FieldSchema, Rule};

    fn definition(allow_jump: bool) -> WizardDefinition {
        WizardDefinition {
            name: "test",
            steps: vec![
                StepDefinition::new("Identity", &["name"]),
                StepDefinition::new("Contact", &["email"]),
                StepDefinition::optional("Class", &["class_session_id"]),
                StepDefinition::new("Review", &["consent"]),
            ],
            allow_jump,
        }
    }

    fn schema() -> FieldSchema {
        FieldSchema::new()
            .field("name", vec![Rule::Required])
            .field("email", vec![Rule::Required, Rule::Email])
            .field("class_session_id", vec![Rule::Required])
            .field("consent", vec![Rule::Required, Rule::OneOf(&["yes"])])
    }

    fn values(pairs: &[(&str, &str)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn step(state: &WizardState, form: &FormData, action: WizardAction, allow_jump: bool) -> WizardState {
        transition(&definition(allow_jump), &schema(), state, form, action)
    }

    #[test]
    fn next_is_blocked_by_invalid_fields() {
        let state = WizardState::default();
        let next = step(&state, &values(&[]), WizardAction::Next, false);
        assert_eq!(next.current_step, 1);
        assert_eq!(next.errors.get("name"), Some(&FieldError::Required));
        assert!(next.completed_steps.is_empty());
    }

    #[test]
    fn next_advances_and_marks_completed() {
        let form = values(&[("name", "Ana")]);
        let next = step(&WizardState::default(), &form, WizardAction::Next, false);
        assert_eq!(next.current_step, 2);
        assert!(next.is_completed(1));
        assert!(next.errors.is_empty());
    }

    #[test]
    fn optional_step_always_passes() {
        let state = WizardState {
            current_step: 3,
            completed_steps: [1, 2].into_iter().collect(),
            ..WizardState::default()
        };
        let next = step(&state, &values(&[]), WizardAction::Next, false);
        assert_eq!(next.current_step, 4);
    }

    #[test]
    fn next_is_capped_at_last_step() {
        let state = WizardState {
            current_step: 4,
            ..WizardState::default()
        };
        let next = step(&state, &values(&[("consent", "yes")]), WizardAction::Next, false);
        assert_eq!(next.current_step, 4);
        assert!(next.is_completed(4));
    }

    #[test]
    fn previous_is_floored_at_first_step_and_skips_validation() {
        let first = step(&WizardState::default(), &values(&[]), WizardAction::Previous, false);
        assert_eq!(first.current_step, 1);

        let state = WizardState {
            current_step: 2,
            ..WizardState::default()
        };
        let back = step(&state, &values(&[]), WizardAction::Previous, false);
        assert_eq!(back.current_step, 1);
        assert!(back.errors.is_empty());
    }

    #[test]
    fn submit_only_from_last_step() {
        let form = values(&[("consent", "yes")]);
        let early = step(&WizardState::default(), &form, WizardAction::Submit, false);
        assert!(!early.submitted);
        assert_eq!(early, WizardState::default());

        let last = WizardState {
            current_step: 4,
            ..WizardState::default()
        };
        let rejected = step(&last, &values(&[("consent", "no")]), WizardAction::Submit, false);
        assert!(!rejected.submitted);
        assert!(rejected.errors.get("consent").is_some());

        let done = step(&last, &form, WizardAction::Submit, false);
        assert!(done.submitted);
    }

    #[test]
    fn submitted_wizard_ignores_everything_but_reset() {
        let state = WizardState {
            current_step: 4,
            submitted: true,
            ..WizardState::default()
        };
        for action in [WizardAction::Next, WizardAction::Previous, WizardAction::Submit] {
            assert_eq!(step(&state, &values(&[]), action, true), state);
        }
        assert_eq!(
            step(&state, &values(&[]), WizardAction::Reset, true),
            WizardState::default()
        );
    }

    #[test]
    fn jump_requires_completed_target_or_next() {
        let form = values(&[("name", "Ana"), ("email", "ana@example.org")]);
        let state = WizardState {
            current_step: 2,
            completed_steps: [1].into_iter().collect(),
            ..WizardState::default()
        };

        let back = step(&state, &form, WizardAction::JumpTo(1), true);
        assert_eq!(back.current_step, 1);

        let ahead = step(&state, &form, WizardAction::JumpTo(4), true);
        assert_eq!(ahead, state);

        let forward = step(&state, &form, WizardAction::JumpTo(3), true);
        assert_eq!(forward.current_step, 3);
        assert!(forward.is_completed(2));

        let blocked = step(&state, &values(&[]), WizardAction::JumpTo(3), true);
        assert_eq!(blocked.current_step, 2);
        assert!(blocked.errors.get("email").is_some());
    }

    #[test]
    fn jump_is_ignored_when_disabled() {
        let state = WizardState {
            current_step: 2,
            completed_steps: [1].into_iter().collect(),
            ..WizardState::default()
        };
        assert_eq!(step(&state, &values(&[]), WizardAction::JumpTo(1), false), state);
    }

    #[test]
    fn controller_runs_to_submission() {
        let mut wizard = WizardController::new(definition(false), schema());
        assert!(!wizard.next());
        assert_eq!(wizard.errors().len(), 1);

        wizard.set_field("name", "Ana");
        assert!(wizard.next());
        wizard.set_field("email", "ana@example.org");
        assert!(wizard.next());
        assert!(wizard.next());
        assert!(wizard.is_last_step());

        assert_eq!(wizard.submit(|_| ()), None);
        wizard.set_field("consent", "yes");
        let name = wizard.submit(|form| form["name"].clone());
        assert_eq!(name.as_deref(), Some("Ana"));
        assert!(wizard.state().submitted);

        assert_eq!(wizard.submit(|_| ()), None);
        wizard.reset();
        assert_eq!(wizard.current_step(), 1);
        assert!(wizard.values().is_empty());
    }

    #[test]
    fn controller_previous_and_jump() {
        let mut wizard = WizardController::new(definition(true), schema());
        wizard.set_fields(values(&[("name", "Ana"), ("email", "ana@example.org")]));
        assert!(wizard.next());
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), 3);
        assert!(wizard.jump_to(1));
        assert!(!wizard.jump_to(4));
        assert!(!wizard.previous());
        assert_eq!(wizard.current_step(), 1);
    }
}
