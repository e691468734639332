use super::{full_name, ActiveStatus};
use crate::api::client::Entity;
use serde::{Deserialize, Serialize};

closed_enum! {
    pub enum Gender {
        Male => ("M", "Male", Info),
        Female => ("F", "Female", Info),
        OtherGender => ("O", "Other", Neutral),
    }
}

closed_enum! {
    /// Colombian identity document types.
    pub enum DocumentType {
        CivilRegistry => ("R.C", "Civil registry", Neutral),
        IdentityCard => ("T.I", "Identity card", Neutral),
        CitizenId => ("C.C", "Citizenship ID", Neutral),
        ForeignerId => ("C.E", "Foreigner ID", Neutral),
        Passport => ("PAS", "Passport", Neutral),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: u64,
    pub name: String,
    pub last_name: String,
    pub gender: Gender,
    pub type_document: DocumentType,
    pub documentnumber: String,
    pub birth_date: String,
    pub address: String,
    pub telephone: String,
    pub status: ActiveStatus,
}

impl Patient {
    pub fn full_name(&self) -> String {
        full_name(&self.name, &self.last_name)
    }

    /// `C.C 1020304050`
    pub fn document(&self) -> String {
        format!("{} {}", self.type_document.as_wire(), self.documentnumber)
    }
}

impl Entity for Patient {
    const COLLECTION: &'static str = "patients";

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientPayload {
    pub name: String,
    pub last_name: String,
    pub gender: Gender,
    pub type_document: DocumentType,
    pub documentnumber: String,
    pub birth_date: String,
    pub address: String,
    pub telephone: String,
    pub status: ActiveStatus,
}
