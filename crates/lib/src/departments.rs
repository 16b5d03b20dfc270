//! # Department Directory
//!
//! Contact details for the teams a question is handed off to when it needs a
//! person rather than a policy document.

use crate::constants::FALLBACK_DEPARTMENT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contact card for a single department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    pub email: String,
    pub slack: String,
}

impl Department {
    pub fn new(name: &str, email: &str, slack: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            slack: slack.to_string(),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("the department directory must contain the fallback department '{0}'")]
    MissingFallback(String),
}

/// An ordered list of departments with a guaranteed fallback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentDirectory {
    departments: Vec<Department>,
}

impl Default for DepartmentDirectory {
    fn default() -> Self {
        Self {
            departments: vec![
                Department::new("재무", "fi@gaida.play.com", "#ask-fi"),
                Department::new("총무", "ga@gaida.play.com", "#ask-ga"),
                Department::new("인프라", "in@gaida.play.com", "#ask-in"),
                Department::new("보안", "se@gaida.play.com", "#ask-se"),
                Department::new("인사", "hr@gaida.play.com", "#ask-hr"),
            ],
        }
    }
}

impl DepartmentDirectory {
    /// Builds a directory from a custom list, which must include the fallback department.
    pub fn new(departments: Vec<Department>) -> Result<Self, DirectoryError> {
        if !departments.iter().any(|d| d.name == FALLBACK_DEPARTMENT) {
            return Err(DirectoryError::MissingFallback(
                FALLBACK_DEPARTMENT.to_string(),
            ));
        }
        Ok(Self { departments })
    }

    pub fn get(&self, name: &str) -> Option<&Department> {
        let name = name.trim();
        self.departments.iter().find(|d| d.name == name)
    }

    /// Looks up a department by name, falling back to the HR team.
    pub fn resolve(&self, name: Option<&str>) -> &Department {
        name.and_then(|n| self.get(n))
            .unwrap_or_else(|| self.fallback())
    }

    pub fn fallback(&self) -> &Department {
        // `new` and `default` both guarantee the fallback entry exists.
        self.departments
            .iter()
            .find(|d| d.name == FALLBACK_DEPARTMENT)
            .unwrap_or(&self.departments[0])
    }

    pub fn names(&self) -> Vec<&str> {
        self.departments.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Department> {
        self.departments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_departments() {
        let directory = DepartmentDirectory::default();
        let dept = directory.resolve(Some("보안"));
        assert_eq!(dept.email, "se@gaida.play.com");
        assert_eq!(dept.slack, "#ask-se");
    }

    #[test]
    fn unknown_or_missing_names_fall_back_to_hr() {
        let directory = DepartmentDirectory::default();
        assert_eq!(directory.resolve(Some("마케팅")).name, "인사");
        assert_eq!(directory.resolve(None).email, "hr@gaida.play.com");
    }

    #[test]
    fn custom_directory_requires_fallback() {
        let result = DepartmentDirectory::new(vec![Department::new(
            "재무",
            "fi@example.com",
            "#fi",
        )]);
        assert_eq!(
            result.unwrap_err(),
            DirectoryError::MissingFallback("인사".to_string())
        );
    }
}
