//! Multi-step product form
//!
//! The admin product dialog walks Details → Variants → Media → Preview and
//! then submits. Moving forward is gated on the fields owned by the current
//! step; moving back is always allowed.

use std::fmt;

use validator::{Validate, ValidationErrors};

use crate::domain::aggregates::ProductInput;
use crate::first_message;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProductFormStep {
    #[default]
    Details,
    Variants,
    Media,
    Preview,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    Invalid { step: ProductFormStep, message: String },
    AlreadySubmitted,
}
impl std::error::Error for StepError {}
impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { message, .. } => write!(f, "{message}"),
            Self::AlreadySubmitted => write!(f, "Form already submitted"),
        }
    }
}

impl ProductFormStep {
    /// Input fields that must be valid before leaving this step.
    fn gated_fields(self) -> &'static [&'static str] {
        match self {
            Self::Details => &["title", "description", "title_price", "category_id"],
            Self::Variants => &["variants"],
            Self::Media => &["main_image_url", "images"],
            Self::Preview => &["title", "description", "title_price", "category_id", "variants", "main_image_url", "images"],
            Self::Submitted => &[],
        }
    }

    pub fn next(self, input: &ProductInput) -> Result<Self, StepError> {
        let following = match self {
            Self::Details => Self::Variants,
            Self::Variants => Self::Media,
            Self::Media => Self::Preview,
            Self::Preview => Self::Submitted,
            Self::Submitted => return Err(StepError::AlreadySubmitted),
        };
        if let Err(errors) = input.validate() {
            if let Some(message) = self.blocking_message(&errors) {
                return Err(StepError::Invalid { step: self, message });
            }
        }
        Ok(following)
    }

    pub fn back(self) -> Self {
        match self {
            Self::Details | Self::Variants => Self::Details,
            Self::Media => Self::Variants,
            Self::Preview => Self::Media,
            Self::Submitted => Self::Submitted,
        }
    }

    fn blocking_message(self, errors: &ValidationErrors) -> Option<String> {
        let mut scoped = ValidationErrors::new();
        let gated = self.gated_fields();
        for (field, kind) in errors.errors() {
            if gated.contains(field) {
                scoped.errors_mut().insert(*field, kind.clone());
            }
        }
        if scoped.errors().is_empty() {
            None
        } else {
            first_message(&scoped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::tests::sample_input;
    use uuid::Uuid;

    #[test]
    fn test_walks_to_submitted_with_valid_input() {
        let input = sample_input(Uuid::new_v4());
        let mut step = ProductFormStep::default();
        for expected in [ProductFormStep::Variants, ProductFormStep::Media, ProductFormStep::Preview, ProductFormStep::Submitted] {
            step = step.next(&input).unwrap();
            assert_eq!(step, expected);
        }
        assert_eq!(step.next(&input), Err(StepError::AlreadySubmitted));
    }

    #[test]
    fn test_gate_only_checks_current_step() {
        let mut input = sample_input(Uuid::new_v4());
        input.main_image_url = "nope".into();
        // Media problems do not block the first two steps.
        let step = ProductFormStep::Details.next(&input).unwrap();
        let step = step.next(&input).unwrap();
        assert_eq!(step, ProductFormStep::Media);
        let err = step.next(&input).unwrap_err();
        assert_eq!(err, StepError::Invalid { step: ProductFormStep::Media, message: "Main image must be a valid URL".into() });
    }

    #[test]
    fn test_variant_gate() {
        let mut input = sample_input(Uuid::new_v4());
        input.variants[0].value.clear();
        let err = ProductFormStep::Variants.next(&input).unwrap_err();
        assert_eq!(err.to_string(), "Value required (e.g. 1TB)");
    }

    #[test]
    fn test_back_transitions() {
        assert_eq!(ProductFormStep::Preview.back(), ProductFormStep::Media);
        assert_eq!(ProductFormStep::Media.back(), ProductFormStep::Variants);
        assert_eq!(ProductFormStep::Details.back(), ProductFormStep::Details);
    }
}
