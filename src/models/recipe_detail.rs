use super::medicine::Medicine;
use super::Linked;
use crate::api::client::Entity;
use serde::{Deserialize, Serialize};

/// One medicine line of a prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: u64,
    pub amount: u32,
    pub indications: String,
    pub prescription_id: u64,
    pub medicine_id: u64,
    #[serde(default)]
    pub medicine: Option<Medicine>,
}

impl RecipeDetail {
    pub fn medicine(&self) -> Linked<Medicine> {
        Linked::from_parts(self.medicine_id, self.medicine.clone())
    }

    pub fn medicine_name(&self) -> String {
        self.medicine().label("Medicine", |m| m.name.clone())
    }
}

impl Entity for RecipeDetail {
    const COLLECTION: &'static str = "recipedetails";

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetailPayload {
    pub amount: u32,
    pub indications: String,
    pub prescription_id: u64,
    pub medicine_id: u64,
}
