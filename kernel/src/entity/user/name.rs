use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self(name.trim().to_string())
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}
