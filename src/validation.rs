use crate::regions::InputField;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        validate_range(value, self.min, self.max)
    }
}

pub const AGE_YEARS: Range = Range::new(1.0, 120.0);
pub const WORKOUT_MINUTES: Range = Range::new(10.0, 240.0);

pub fn validate_range(value: f64, min: f64, max: f64) -> bool {
    value >= min && value <= max
}

pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Live range check attached to one input. It only toggles the field's
/// invalid flag; reading the value is never blocked.
#[derive(Clone)]
pub struct ValidationRule {
    pub field: Arc<dyn InputField>,
    pub range: Range,
}

impl ValidationRule {
    pub fn new(field: Arc<dyn InputField>, range: Range) -> Self {
        Self { field, range }
    }

    /// Re-evaluates the current value, flags the field, and returns whether
    /// it passed. Empty and non-numeric values fail.
    pub fn evaluate(&self) -> bool {
        let valid = parse_number(&self.field.value()).is_some_and(|value| self.range.contains(value));
        self.field.set_invalid(!valid);
        valid
    }
}

/// Declared constraints of one field in a `needs-validation` form.
#[derive(Clone)]
pub struct FieldConstraint {
    pub field: Arc<dyn InputField>,
    pub required: bool,
    pub range: Option<Range>,
}

impl FieldConstraint {
    fn is_satisfied(&self) -> bool {
        let raw = self.field.value();
        if raw.trim().is_empty() {
            return !self.required;
        }
        match self.range {
            Some(range) => parse_number(&raw).is_some_and(|value| range.contains(value)),
            None => true,
        }
    }
}

/// Form-level gate: a submit goes through only when every declared
/// constraint holds. The form is marked validated after the first check
/// either way.
#[derive(Default)]
pub struct FormConstraints {
    fields: Vec<FieldConstraint>,
    was_validated: AtomicBool,
}

impl FormConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Arc<dyn InputField>, required: bool, range: Option<Range>) -> Self {
        self.fields.push(FieldConstraint {
            field,
            required,
            range,
        });
        self
    }

    pub fn check_validity(&self) -> bool {
        let valid = self.fields.iter().all(FieldConstraint::is_satisfied);
        self.was_validated.store(true, Ordering::Relaxed);
        valid
    }

    pub fn was_validated(&self) -> bool {
        self.was_validated.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::MemoryInput;

    #[test]
    fn age_bounds_are_inclusive() {
        assert!(!validate_range(0.0, 1.0, 120.0));
        assert!(validate_range(1.0, 1.0, 120.0));
        assert!(validate_range(120.0, 1.0, 120.0));
        assert!(!validate_range(121.0, 1.0, 120.0));
    }

    #[test]
    fn every_value_inside_range_is_accepted() {
        for minutes in 10..=240 {
            assert!(WORKOUT_MINUTES.contains(f64::from(minutes)), "{minutes}");
        }
        for minutes in [-1, 0, 9, 241, 1000] {
            assert!(!WORKOUT_MINUTES.contains(f64::from(minutes)), "{minutes}");
        }
    }

    #[test]
    fn rule_flags_and_unflags_the_field() {
        let input = MemoryInput::new();
        let rule = ValidationRule::new(Arc::new(input.clone()), AGE_YEARS);

        input.type_value("0");
        assert!(!rule.evaluate());
        assert!(input.is_invalid());

        input.type_value("35");
        assert!(rule.evaluate());
        assert!(!input.is_invalid());
        assert_eq!(input.value(), "35");
    }

    #[test]
    fn rule_rejects_empty_and_non_numeric() {
        let input = MemoryInput::new();
        let rule = ValidationRule::new(Arc::new(input.clone()), AGE_YEARS);
        for raw in ["", "  ", "abc", "NaN"] {
            input.type_value(raw);
            assert!(!rule.evaluate(), "{raw:?}");
        }
    }

    #[test]
    fn form_gate_checks_required_and_ranges() {
        let age = MemoryInput::new();
        let minutes = MemoryInput::new();
        let note = MemoryInput::new();
        let form = FormConstraints::new()
            .field(Arc::new(age.clone()), true, Some(AGE_YEARS))
            .field(Arc::new(minutes.clone()), true, Some(WORKOUT_MINUTES))
            .field(Arc::new(note.clone()), false, None);

        assert!(!form.was_validated());
        assert!(!form.check_validity());
        assert!(form.was_validated());

        age.type_value("30");
        minutes.type_value("5");
        assert!(!form.check_validity());

        minutes.type_value("45");
        assert!(form.check_validity());
    }
}
