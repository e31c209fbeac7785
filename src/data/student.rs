use crate::error::{InvalidStudentSnafu, RegistrarResult};
use serde::{Deserialize, Serialize};
use snafu::ensure;

const TAX_ID_LEN: usize = 11;
const NATIONAL_ID_LEN: usize = 9;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub tax_id: String,
    pub national_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub tax_id: String,
    pub national_id: String,
}

/// Body of a partial update. Missing, `null` and empty fields all leave the stored value alone.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub national_id: Option<String>,
}

impl Student {
    /// Overlays every field present in `patch` onto `self`, keeping the rest.
    #[must_use]
    pub fn merged_with(mut self, patch: StudentPatch) -> Self {
        let StudentPatch {
            name,
            tax_id,
            national_id,
        } = patch;

        overlay(&mut self.name, name);
        overlay(&mut self.tax_id, tax_id);
        overlay(&mut self.national_id, national_id);

        self
    }

    pub fn validate(&self) -> RegistrarResult<()> {
        validate_fields(&self.name, &self.tax_id, &self.national_id)
    }
}

impl NewStudent {
    pub fn validate(&self) -> RegistrarResult<()> {
        validate_fields(&self.name, &self.tax_id, &self.national_id)
    }
}

fn overlay(field: &mut String, value: Option<String>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        *field = value;
    }
}

fn is_digits_of_len(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

fn validate_fields(name: &str, tax_id: &str, national_id: &str) -> RegistrarResult<()> {
    let mut problems = vec![];

    if name.trim().is_empty() {
        problems.push("name must not be empty".to_string());
    }
    if !is_digits_of_len(tax_id, TAX_ID_LEN) {
        problems.push(format!("tax_id must be {TAX_ID_LEN} digits"));
    }
    if !is_digits_of_len(national_id, NATIONAL_ID_LEN) {
        problems.push(format!("national_id must be {NATIONAL_ID_LEN} digits"));
    }

    ensure!(problems.is_empty(), InvalidStudentSnafu { problems });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistrarError;

    fn existing() -> Student {
        Student {
            id: 4,
            name: "Nome aluno teste".to_string(),
            tax_id: "12345678910".to_string(),
            national_id: "123456789".to_string(),
        }
    }

    #[test]
    fn merge_only_overwrites_present_fields() {
        let patch = StudentPatch {
            tax_id: Some("02345678910".to_string()),
            national_id: Some("123456460".to_string()),
            ..StudentPatch::default()
        };

        let merged = existing().merged_with(patch);

        assert_eq!(merged.id, 4);
        assert_eq!(merged.name, "Nome aluno teste");
        assert_eq!(merged.tax_id, "02345678910");
        assert_eq!(merged.national_id, "123456460");
    }

    #[test]
    fn merge_ignores_empty_strings() {
        let patch = StudentPatch {
            name: Some(String::new()),
            tax_id: Some("02345678910".to_string()),
            national_id: None,
        };

        let merged = existing().merged_with(patch);

        assert_eq!(merged.name, "Nome aluno teste");
        assert_eq!(merged.tax_id, "02345678910");
        assert_eq!(merged.national_id, "123456789");
    }

    #[test]
    fn merge_is_idempotent() {
        let patch = StudentPatch {
            tax_id: Some("02345678910".to_string()),
            ..StudentPatch::default()
        };

        let once = existing().merged_with(patch.clone());
        let twice = once.clone().merged_with(patch);

        assert_eq!(once, twice);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        assert_eq!(existing().merged_with(StudentPatch::default()), existing());
    }

    #[test]
    fn patch_body_fields_are_all_optional() {
        let patch: StudentPatch = serde_json::from_str(r#"{"tax_id": "02345678910"}"#).unwrap();

        assert_eq!(patch.name, None);
        assert_eq!(patch.tax_id.as_deref(), Some("02345678910"));
        assert_eq!(patch.national_id, None);
    }

    #[test]
    fn valid_student_passes() {
        assert!(existing().validate().is_ok());
    }

    #[test]
    fn validation_reports_every_bad_field() {
        let student = NewStudent {
            name: "  ".to_string(),
            tax_id: "1234567891a".to_string(),
            national_id: "12345".to_string(),
        };

        match student.validate() {
            Err(RegistrarError::InvalidStudent { problems }) => assert_eq!(problems.len(), 3),
            other => panic!("expected InvalidStudent, got {other:?}"),
        }
    }
}
