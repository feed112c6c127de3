use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub full_name: String,
    pub biography: Option<String>,
}

impl User {
    pub fn new(full_name: &str, biography: Option<&str>) -> Self {
        Self {
            full_name: full_name.to_string(),
            biography: biography.map(str::to_string),
        }
    }
}

crate::domain_entity!(User {
    full_name,
    biography
});
