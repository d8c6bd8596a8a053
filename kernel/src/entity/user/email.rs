use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct UserEmail(String);

impl UserEmail {
    /// Emails are compared case-insensitively, so they are stored lowercased.
    pub fn new(email: impl Into<String>) -> Self {
        let email: String = email.into();
        Self(email.trim().to_lowercase())
    }

    pub fn looks_valid(&self) -> bool {
        match self.0.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }
}

#[cfg(test)]
mod test {
    use super::UserEmail;

    #[test]
    fn normalises_and_checks_shape() {
        let email = UserEmail::new("  Reader@Example.COM ");
        assert_eq!(AsRef::<String>::as_ref(&email), "reader@example.com");
        assert!(email.looks_valid());
        assert!(!UserEmail::new("reader").looks_valid());
        assert!(!UserEmail::new("@example.com").looks_valid());
    }
}
