//! Form Validation
//!
//! Field rules shared by the auth, profile and task forms. Messages are the
//! user-facing Spanish texts.

use std::sync::LazyLock;

use regex::Regex;

pub type FieldResult = Result<(), &'static str>;

static SIMPLE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static LOGIN_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$").expect("valid email regex")
});

static TIME_24H: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid time regex"));

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

pub const TITLE_MAX: usize = 50;
pub const DETAIL_MAX: usize = 500;

// ========================
// Auth Forms
// ========================

pub fn login_email(value: &str) -> FieldResult {
    let value = value.trim();
    if value.is_empty() {
        return Err("El correo electrónico es obligatorio");
    }
    if !LOGIN_EMAIL.is_match(value) {
        return Err("Por favor, ingresa un correo electrónico válido");
    }
    Ok(())
}

pub fn login_password(value: &str) -> FieldResult {
    if value.trim().is_empty() {
        return Err("La contraseña es obligatoria");
    }
    Ok(())
}

pub fn recovery_email(value: &str) -> FieldResult {
    let value = value.trim();
    if value.is_empty() {
        return Err("El correo electrónico es obligatorio");
    }
    if !SIMPLE_EMAIL.is_match(value) {
        return Err("Por favor ingrese un correo electrónico válido");
    }
    Ok(())
}

pub fn signup_email(value: &str) -> FieldResult {
    let value = value.trim();
    if value.is_empty() {
        return Err("El email es obligatorio");
    }
    if !SIMPLE_EMAIL.is_match(value) {
        return Err("Por favor ingrese un correo electrónico válido");
    }
    Ok(())
}

/// First or last name at signup
pub fn person_name(value: &str) -> FieldResult {
    let value = value.trim();
    if value.is_empty() {
        return Err("Este campo es obligatorio");
    }
    if value.chars().count() < 2 {
        return Err("El nombre debe tener al menos 2 caracteres");
    }
    Ok(())
}

/// Integer age between 13 and 100
pub fn signup_age(value: &str) -> Result<u32, &'static str> {
    let value = value.trim();
    if value.is_empty() {
        return Err("La edad es obligatoria");
    }
    let age: u32 = value.parse().map_err(|_| "La edad debe ser un número entero")?;
    if age < 13 {
        return Err("Debes tener al menos 13 años");
    }
    if age > 100 {
        return Err("La edad debe ser menor o igual a 100 años");
    }
    Ok(age)
}

/// At least 8 chars with upper, lower, digit and a special character
pub fn strong_password(value: &str) -> FieldResult {
    if value.is_empty() {
        return Err("La contraseña es obligatoria");
    }
    if value.chars().count() < 8 {
        return Err("La contraseña debe tener al menos 8 caracteres");
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("La contraseña debe contener al menos una letra mayúscula");
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("La contraseña debe contener al menos una letra minúscula");
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err("La contraseña debe contener al menos un número");
    }
    if !value.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err("La contraseña debe contener al menos un carácter especial");
    }
    Ok(())
}

pub fn confirm_password(password: &str, confirm: &str) -> FieldResult {
    if confirm.is_empty() {
        return Err("Por favor confirme su contraseña");
    }
    if password != confirm {
        return Err("Las contraseñas no coinciden");
    }
    Ok(())
}

// ========================
// Profile Edit
// ========================

pub fn profile_first_name(value: &str) -> FieldResult {
    if value.trim().is_empty() {
        return Err("El nombre es requerido");
    }
    Ok(())
}

pub fn profile_last_name(value: &str) -> FieldResult {
    if value.trim().is_empty() {
        return Err("El apellido es requerido");
    }
    Ok(())
}

/// Age between 13 and 120
pub fn profile_age(value: &str) -> Result<u32, &'static str> {
    let age: u32 = value.trim().parse().map_err(|_| "La edad es requerida")?;
    if age < 13 {
        return Err("Debes tener al menos 13 años");
    }
    if age > 120 {
        return Err("Edad no válida");
    }
    Ok(age)
}

pub fn profile_email(value: &str) -> FieldResult {
    let value = value.trim();
    if value.is_empty() {
        return Err("El correo es requerido");
    }
    if !SIMPLE_EMAIL.is_match(value) {
        return Err("Formato de correo inválido");
    }
    Ok(())
}

pub fn current_password(value: &str) -> FieldResult {
    if value.is_empty() {
        return Err("La contraseña actual es requerida");
    }
    Ok(())
}

pub fn new_password(value: &str) -> FieldResult {
    if value.is_empty() {
        return Err("La nueva contraseña es requerida");
    }
    if value.chars().count() < 6 {
        return Err("Debe tener al menos 6 caracteres");
    }
    Ok(())
}

pub fn confirm_new_password(new_password: &str, confirm: &str) -> FieldResult {
    if confirm.is_empty() {
        return Err("Confirma la nueva contraseña");
    }
    if new_password != confirm {
        return Err("Las contraseñas no coinciden");
    }
    Ok(())
}

// ========================
// Task Form
// ========================

/// Per-field errors of the task modal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFormErrors {
    pub title: Option<&'static str>,
    pub detail: Option<&'static str>,
    pub date: Option<&'static str>,
    pub time: Option<&'static str>,
    pub status: Option<&'static str>,
}

impl TaskFormErrors {
    pub fn is_empty(&self) -> bool {
        self == &TaskFormErrors::default()
    }

    /// Text for the `aria-live` region
    pub fn summary(&self) -> String {
        let count = [self.title, self.detail, self.date, self.time, self.status]
            .iter()
            .filter(|e| e.is_some())
            .count();
        match count {
            0 => String::new(),
            1 => "Hay 1 campo con errores".to_string(),
            n => format!("Hay {} campos con errores", n),
        }
    }
}

pub fn is_valid_time(value: &str) -> bool {
    TIME_24H.is_match(value)
}

pub fn task_form(title: &str, detail: &str, date: &str, time: &str, status: &str) -> TaskFormErrors {
    let title = title.trim();
    let detail = detail.trim();
    let time = time.trim();
    TaskFormErrors {
        title: if title.is_empty() {
            Some("Completa este campo")
        } else if title.chars().count() > TITLE_MAX {
            Some("Máx. 50 caracteres")
        } else {
            None
        },
        detail: (detail.chars().count() > DETAIL_MAX).then_some("Máx. 500 caracteres"),
        date: date.is_empty().then_some("Completa este campo"),
        time: (!time.is_empty() && !is_valid_time(time)).then_some("Formato inválido. Usa HH:MM (ej: 14:30)"),
        status: status.is_empty().then_some("Completa este campo"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_email() {
        assert!(login_email("ana@example.com").is_ok());
        assert_eq!(login_email(""), Err("El correo electrónico es obligatorio"));
        assert!(login_email("ana@@example").is_err());
    }

    #[test]
    fn test_signup_age_bounds() {
        assert_eq!(signup_age("13"), Ok(13));
        assert_eq!(signup_age("12"), Err("Debes tener al menos 13 años"));
        assert_eq!(signup_age("101"), Err("La edad debe ser menor o igual a 100 años"));
        assert_eq!(signup_age("17.5"), Err("La edad debe ser un número entero"));
        assert_eq!(profile_age("120"), Ok(120));
        assert_eq!(profile_age("121"), Err("Edad no válida"));
    }

    #[test]
    fn test_strong_password_rules_in_order() {
        assert_eq!(strong_password("Ab1!"), Err("La contraseña debe tener al menos 8 caracteres"));
        assert_eq!(strong_password("abcdefg1!"), Err("La contraseña debe contener al menos una letra mayúscula"));
        assert_eq!(strong_password("ABCDEFG1!"), Err("La contraseña debe contener al menos una letra minúscula"));
        assert_eq!(strong_password("Abcdefgh!"), Err("La contraseña debe contener al menos un número"));
        assert_eq!(strong_password("Abcdefg12"), Err("La contraseña debe contener al menos un carácter especial"));
        assert!(strong_password("Abcdefg1!").is_ok());
    }

    #[test]
    fn test_task_form_rules() {
        let ok = task_form("Buy milk", "", "2024-05-01", "", "Por hacer");
        assert!(ok.is_empty());

        let long_title = "x".repeat(51);
        let errors = task_form(&long_title, "", "", "25:00", "");
        assert_eq!(errors.title, Some("Máx. 50 caracteres"));
        assert_eq!(errors.date, Some("Completa este campo"));
        assert_eq!(errors.time, Some("Formato inválido. Usa HH:MM (ej: 14:30)"));
        assert_eq!(errors.status, Some("Completa este campo"));
        assert_eq!(errors.summary(), "Hay 4 campos con errores");
    }

    #[test]
    fn test_time_format() {
        assert!(is_valid_time("00:00"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("9:30"));
        assert!(!is_valid_time("24:00"));
    }

    #[test]
    fn test_profile_password_change() {
        assert_eq!(new_password("12345"), Err("Debe tener al menos 6 caracteres"));
        assert_eq!(confirm_new_password("abcdef", "abcdeg"), Err("Las contraseñas no coinciden"));
        assert!(confirm_new_password("abcdef", "abcdef").is_ok());
    }
}
