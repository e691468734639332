use crate::api::client::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: u64,
    pub specialtyname: String,
}

impl Entity for Specialty {
    const COLLECTION: &'static str = "specialties";

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SpecialtyPayload {
    pub specialtyname: String,
}
