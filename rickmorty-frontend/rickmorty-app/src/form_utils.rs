//! Form validation: small predicate validators over a field's text, the flags
//! they raise, and the user-facing copy for those flags.
//!
//! Every validator except [`required`] treats an empty value as valid, so
//! required-ness is always composed separately.

use regex::{Regex, RegexBuilder};
use rickmorty_api_types::Address;
use std::{collections::BTreeSet, sync::LazyLock};

/// First and last name separated by a single space.
pub const FULL_NAME_PATTERN: &str = "([a-zA-Z]+) ([a-zA-Z]+)";
pub const EMAIL_PATTERN: &str = r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,4}$";
/// Lookaheads are not supported by `regex`; [`pattern`] checks this one by hand.
pub const PASSWORD_PATTERN: &str = r"^(?=.*[a-z])(?=.*[A-Z])(?=.*\d)[a-zA-Z\d@$!%*?&]{8,}$";

pub const NAME_LENGTH: (usize, usize) = (5, 15);
pub const MAIL_LENGTH: (usize, usize) = (10, 50);
pub const PASSWORD_LENGTH: (usize, usize) = (8, 30);

// case-insensitive, `Rick@Citadel.com` is a valid address
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(EMAIL_PATTERN)
        .case_insensitive(true)
        .build()
        .expect("email pattern compiles")
});

static FULL_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^(?:{FULL_NAME_PATTERN})$")).expect("full name pattern compiles")
});

static PASSWORD_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9@$!%*?&]{8,}$").expect("password charset compiles"));

/// A named validation failure.
///
/// Variants are declared in display priority order: required, then length
/// bounds, then format, then the semantic checks. [`get_text_error`] reports
/// the first flag in that order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidationError {
    Required,
    MinLength { required: usize, actual: usize },
    MinLengthCustom { required: usize, actual: usize },
    NameMinLength { required: usize, actual: usize },
    NameMaxLength { required: usize, actual: usize },
    MailMinLength { required: usize, actual: usize },
    MailMaxLength { required: usize, actual: usize },
    PasswordMinLength { required: usize, actual: usize },
    PasswordMaxLength { required: usize, actual: usize },
    Pattern { required_pattern: String },
    InvalidEmailFormat,
    WeakPassword,
    PasswordsNotEqual,
    IncompleteAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeSet<ValidationError>);

impl ValidationErrors {
    pub fn insert(&mut self, error: ValidationError) {
        self.0.insert(error);
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<T: IntoIterator<Item = ValidationError>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Message for the highest priority flag, `None` if there are no flags.
pub fn get_text_error(errors: &ValidationErrors) -> Option<String> {
    errors.first().map(message_for)
}

pub fn message_for(error: &ValidationError) -> String {
    match error {
        ValidationError::Required => "Este campo es requerido".to_string(),
        ValidationError::MinLength { required, .. } => {
            format!("Mínimo de {required} caracteres.")
        }
        ValidationError::MinLengthCustom { required, .. } => {
            format!("La contraseña debe tener al menos {required} caracteres")
        }
        ValidationError::NameMinLength { required, .. } => {
            format!("El nombre debe tener al menos {required} caracteres")
        }
        ValidationError::NameMaxLength { required, .. } => {
            format!("El nombre debe tener máximo {required} caracteres")
        }
        ValidationError::MailMinLength { required, .. } => {
            format!("El mail debe tener al menos {required} caracteres")
        }
        ValidationError::MailMaxLength { required, .. } => {
            format!("El mail debe tener máximo {required} caracteres")
        }
        ValidationError::PasswordMinLength { required, .. } => {
            format!("La contraseña debe tener al menos {required} caracteres")
        }
        ValidationError::PasswordMaxLength { required, .. } => {
            format!("La contraseña debe tener máximo {required} caracteres")
        }
        ValidationError::Pattern { required_pattern } if required_pattern == EMAIL_PATTERN => {
            "El valor ingresado no luce como un correo electrónico".to_string()
        }
        ValidationError::Pattern { required_pattern } if required_pattern == PASSWORD_PATTERN => {
            "La contraseña debe tener al menos 8 caracteres, una mayúscula, una minúscula y un número".to_string()
        }
        ValidationError::Pattern { .. } => {
            "El valor ingresado no tiene el formato esperado".to_string()
        }
        ValidationError::InvalidEmailFormat => "El email debe tener un formato válido".to_string(),
        ValidationError::WeakPassword => "La contraseña debe tener al menos 8 caracteres, una mayúscula, una minúscula y un número".to_string(),
        ValidationError::PasswordsNotEqual => "Las contraseñas no coinciden".to_string(),
        ValidationError::IncompleteAddress => {
            "Si proporciona dirección, debe completar ciudad, región y código postal".to_string()
        }
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn required(value: &str) -> Option<ValidationError> {
    value.is_empty().then_some(ValidationError::Required)
}

pub fn min_length(required: usize) -> impl Fn(&str) -> Option<ValidationError> + Send + Sync {
    move |value: &str| {
        let actual = char_len(value);
        (!value.is_empty() && actual < required)
            .then_some(ValidationError::MinLength { required, actual })
    }
}

/// Whole-value pattern match. The pattern is anchored at both ends.
/// [`EMAIL_PATTERN`] and [`PASSWORD_PATTERN`] behave exactly like
/// [`email_validator`] and [`password_validator`] but raise `Pattern`.
pub fn pattern(
    required_pattern: &str,
) -> Result<impl Fn(&str) -> Option<ValidationError> + Send + Sync, regex::Error> {
    let matches: Box<dyn Fn(&str) -> bool + Send + Sync> = match required_pattern {
        EMAIL_PATTERN => Box::new(|value: &str| EMAIL_REGEX.is_match(value)),
        PASSWORD_PATTERN => Box::new(is_strong_password),
        other => {
            let anchored = Regex::new(&format!(
                "^(?:{})$",
                other.trim_start_matches('^').trim_end_matches('$')
            ))?;
            Box::new(move |value: &str| anchored.is_match(value))
        }
    };
    let required_pattern = required_pattern.to_string();
    Ok(move |value: &str| {
        (!value.is_empty() && !matches(value)).then(|| ValidationError::Pattern {
            required_pattern: required_pattern.clone(),
        })
    })
}

pub fn email_validator(value: &str) -> Option<ValidationError> {
    (!value.is_empty() && !EMAIL_REGEX.is_match(value))
        .then_some(ValidationError::InvalidEmailFormat)
}

pub fn full_name_validator(value: &str) -> Option<ValidationError> {
    (!value.is_empty() && !FULL_NAME_REGEX.is_match(value)).then(|| ValidationError::Pattern {
        required_pattern: FULL_NAME_PATTERN.to_string(),
    })
}

fn is_strong_password(value: &str) -> bool {
    PASSWORD_CHARSET.is_match(value)
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
}

/// At least one lowercase, one uppercase and one digit, eight or more
/// characters from `[a-zA-Z0-9@$!%*?&]`.
pub fn password_validator(value: &str) -> Option<ValidationError> {
    (!value.is_empty() && !is_strong_password(value)).then_some(ValidationError::WeakPassword)
}

pub fn min_length_validator(
    required: usize,
) -> impl Fn(&str) -> Option<ValidationError> + Send + Sync {
    move |value: &str| {
        let actual = char_len(value);
        (!value.is_empty() && actual < required)
            .then_some(ValidationError::MinLengthCustom { required, actual })
    }
}

pub fn name_validator(value: &str) -> Option<ValidationError> {
    if value.is_empty() {
        return None;
    }
    let actual = char_len(value);
    let (min, max) = NAME_LENGTH;
    if actual < min {
        return Some(ValidationError::NameMinLength { required: min, actual });
    }
    if actual > max {
        return Some(ValidationError::NameMaxLength { required: max, actual });
    }
    None
}

/// Format first, then length.
pub fn mail_validator(value: &str) -> Option<ValidationError> {
    if value.is_empty() {
        return None;
    }
    if let Some(error) = email_validator(value) {
        return Some(error);
    }
    let actual = char_len(value);
    let (min, max) = MAIL_LENGTH;
    if actual < min {
        return Some(ValidationError::MailMinLength { required: min, actual });
    }
    if actual > max {
        return Some(ValidationError::MailMaxLength { required: max, actual });
    }
    None
}

/// Length first, then strength.
pub fn password_validator_with_length(value: &str) -> Option<ValidationError> {
    if value.is_empty() {
        return None;
    }
    let actual = char_len(value);
    let (min, max) = PASSWORD_LENGTH;
    if actual < min {
        return Some(ValidationError::PasswordMinLength { required: min, actual });
    }
    if actual > max {
        return Some(ValidationError::PasswordMaxLength { required: max, actual });
    }
    password_validator(value)
}

pub fn fields_equal(first: &str, second: &str) -> Option<ValidationError> {
    (first != second).then_some(ValidationError::PasswordsNotEqual)
}

/// All four address parts or none of them.
pub fn address_group_validator(address: &Address) -> Option<ValidationError> {
    let parts = [
        &address.street,
        &address.city,
        &address.region,
        &address.postal_code,
    ];
    let any = parts.iter().any(|p| !p.is_empty());
    let all = parts.iter().all(|p| !p.is_empty());
    (any && !all).then_some(ValidationError::IncompleteAddress)
}

pub type Validator = Box<dyn Fn(&str) -> Option<ValidationError> + Send + Sync>;

pub fn validate_field(value: &str, validators: &[Validator]) -> ValidationErrors {
    validators.iter().filter_map(|v| v(value)).collect()
}

/// A single text input with its validators, in the manner of a reactive form control.
#[derive(Default)]
pub struct FormControl {
    pub value: String,
    pub touched: bool,
    validators: Vec<Validator>,
}

impl std::fmt::Debug for FormControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormControl")
            .field("value", &self.value)
            .field("touched", &self.touched)
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl FormControl {
    pub fn with<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> Option<ValidationError> + Send + Sync + 'static,
    {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.touched = true;
    }

    pub fn mark_as_touched(&mut self) {
        self.touched = true;
    }

    pub fn errors(&self) -> ValidationErrors {
        validate_field(&self.value, &self.validators)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Whether the control should currently render an error.
    pub fn shows_error(&self) -> bool {
        self.touched && !self.is_valid()
    }

    pub fn error_text(&self) -> Option<String> {
        get_text_error(&self.errors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength() {
        assert_eq!(password_validator("Abcdefg1"), None);
        assert_eq!(
            password_validator("abcdefg1"),
            Some(ValidationError::WeakPassword)
        );
        assert_eq!(password_validator("Ab1"), Some(ValidationError::WeakPassword));
        assert_eq!(
            password_validator("Abcdefg1#"),
            Some(ValidationError::WeakPassword),
            "# is outside the allowed charset"
        );
        assert_eq!(password_validator("Abcdef1!"), None);
        assert_eq!(password_validator(""), None);
    }

    #[test]
    fn test_password_with_length() {
        assert_eq!(
            password_validator_with_length("Ab1"),
            Some(ValidationError::PasswordMinLength { required: 8, actual: 3 })
        );
        let long = format!("Ab1{}", "a".repeat(28));
        assert_eq!(
            password_validator_with_length(&long),
            Some(ValidationError::PasswordMaxLength { required: 30, actual: 31 })
        );
        assert_eq!(
            password_validator_with_length("abcdefgh"),
            Some(ValidationError::WeakPassword)
        );
        assert_eq!(password_validator_with_length("Abcdefg1"), None);
    }

    #[test]
    fn test_email() {
        assert_eq!(email_validator("rick@citadel.com"), None);
        assert_eq!(email_validator("Rick@Citadel.com"), None);
        assert_eq!(
            email_validator("rick@citadel"),
            Some(ValidationError::InvalidEmailFormat)
        );
        assert_eq!(
            email_validator("rick@citadel.museum"),
            Some(ValidationError::InvalidEmailFormat)
        );
        assert_eq!(email_validator(""), None);
    }

    #[test]
    fn test_mail_checks_format_before_length() {
        assert_eq!(
            mail_validator("a@b"),
            Some(ValidationError::InvalidEmailFormat)
        );
        assert_eq!(
            mail_validator("a@b.co"),
            Some(ValidationError::MailMinLength { required: 10, actual: 6 })
        );
        let long = format!("{}@citadel.com", "r".repeat(40));
        assert!(matches!(
            mail_validator(&long),
            Some(ValidationError::MailMaxLength { required: 50, .. })
        ));
        assert_eq!(mail_validator("rick@citadel.com"), None);
    }

    #[test]
    fn test_name_bounds() {
        assert_eq!(
            name_validator("Rick"),
            Some(ValidationError::NameMinLength { required: 5, actual: 4 })
        );
        assert_eq!(name_validator("Rick Sanchez"), None);
        assert_eq!(
            name_validator("Rick Sanchez C137"),
            Some(ValidationError::NameMaxLength { required: 15, actual: 17 })
        );
    }

    #[test]
    fn test_structural_validators() {
        assert_eq!(required(""), Some(ValidationError::Required));
        assert_eq!(required("x"), None);
        assert_eq!(
            min_length(6)("12345"),
            Some(ValidationError::MinLength { required: 6, actual: 5 })
        );
        assert_eq!(min_length(6)(""), None);
        assert_eq!(
            min_length_validator(6)("12345"),
            Some(ValidationError::MinLengthCustom { required: 6, actual: 5 })
        );

        let full_name = pattern(FULL_NAME_PATTERN).unwrap();
        assert_eq!(full_name("Rick Sanchez"), None);
        assert!(full_name("Rick").is_some());
        // anchored: trailing text is a mismatch
        assert!(full_name("Rick Sanchez 2").is_some());
        assert_eq!(full_name(""), None);
        assert_eq!(full_name_validator("Rick Sanchez"), None);
        assert_eq!(full_name_validator("Rick Sanchez 2"), full_name("Rick Sanchez 2"));
    }

    #[test]
    fn test_named_patterns() {
        let email = pattern(EMAIL_PATTERN).unwrap();
        assert_eq!(email("Rick@Citadel.com"), None);
        assert_eq!(email("rick@citadel.com"), None);
        let error = email("rick@citadel").unwrap();
        assert_eq!(
            message_for(&error),
            "El valor ingresado no luce como un correo electrónico"
        );

        let password = pattern(PASSWORD_PATTERN).unwrap();
        assert_eq!(password("Abcdefg1"), None);
        let error = password("abcdefg1").unwrap();
        assert_eq!(
            error,
            ValidationError::Pattern {
                required_pattern: PASSWORD_PATTERN.to_string()
            }
        );
        assert_eq!(
            message_for(&error),
            "La contraseña debe tener al menos 8 caracteres, una mayúscula, una minúscula y un número"
        );
    }

    #[test]
    fn test_group_validators() {
        assert_eq!(fields_equal("Abcdefg1", "Abcdefg1"), None);
        assert_eq!(
            fields_equal("Abcdefg1", "Abcdefg2"),
            Some(ValidationError::PasswordsNotEqual)
        );

        assert_eq!(address_group_validator(&Address::default()), None);
        let partial = Address {
            street: "1 Main".to_string(),
            ..Default::default()
        };
        assert_eq!(
            address_group_validator(&partial),
            Some(ValidationError::IncompleteAddress)
        );
        let full = Address {
            street: "1 Main".to_string(),
            city: "Seattle".to_string(),
            region: "WA".to_string(),
            postal_code: "98101".to_string(),
        };
        assert_eq!(address_group_validator(&full), None);
    }

    #[test]
    fn test_text_error_priority() {
        assert_eq!(get_text_error(&ValidationErrors::default()), None);

        let errors: ValidationErrors = [
            ValidationError::WeakPassword,
            ValidationError::Required,
            ValidationError::PasswordMinLength { required: 8, actual: 0 },
        ]
        .into_iter()
        .collect();
        assert_eq!(get_text_error(&errors).unwrap(), "Este campo es requerido");

        let errors: ValidationErrors = [
            ValidationError::WeakPassword,
            ValidationError::MinLengthCustom { required: 6, actual: 3 },
        ]
        .into_iter()
        .collect();
        assert_eq!(
            get_text_error(&errors).unwrap(),
            "La contraseña debe tener al menos 6 caracteres"
        );

        let email_pattern: ValidationErrors = [ValidationError::Pattern {
            required_pattern: EMAIL_PATTERN.to_string(),
        }]
        .into_iter()
        .collect();
        assert_eq!(
            get_text_error(&email_pattern).unwrap(),
            "El valor ingresado no luce como un correo electrónico"
        );
    }

    #[test]
    fn test_form_control() {
        let mut control = FormControl::default()
            .with(required)
            .with(min_length_validator(6));
        assert!(!control.is_valid());
        assert!(!control.shows_error(), "untouched controls stay quiet");
        control.mark_as_touched();
        assert_eq!(control.error_text().unwrap(), "Este campo es requerido");

        control.set_value("abc");
        assert_eq!(
            control.errors().first(),
            Some(&ValidationError::MinLengthCustom { required: 6, actual: 3 })
        );
        control.set_value("abcdef");
        assert!(control.is_valid());
        assert_eq!(control.error_text(), None);
    }
}
