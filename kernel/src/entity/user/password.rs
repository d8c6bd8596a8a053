use std::fmt::{Debug, Formatter};

use vodca::{AsRefln, Fromln};

/// Stored credential. Only ever holds a one-way hash of the password, never the
/// password itself.
#[derive(Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }
}

impl Debug for PasswordHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

#[cfg(test)]
mod test {
    use super::PasswordHash;

    #[test]
    fn debug_hides_hash() {
        let hash = PasswordHash::new("$2b$08$abcdefghijklmnopqrstuv");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
