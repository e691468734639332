use crate::api::client::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub presentation: String,
    pub dose: String,
}

impl Medicine {
    /// `Ibuprofeno - Tableta (400 mg)`
    pub fn choice_label(&self) -> String {
        format!("{} - {} ({})", self.name, self.presentation, self.dose)
    }
}

impl Entity for Medicine {
    const COLLECTION: &'static str = "medicines";

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicinePayload {
    pub name: String,
    pub presentation: String,
    pub dose: String,
}
