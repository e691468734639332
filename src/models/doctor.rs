use super::{full_name, ActiveStatus, Linked, SpecialtySummary};
use crate::api::client::Entity;
use serde::{Deserialize, Serialize};

closed_enum! {
    pub enum DoctorGender {
        Male => ("M", "Male", Info),
        Female => ("F", "Female", Info),
        OtherGender => ("OTHER", "Other", Neutral),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: u64,
    pub name: String,
    pub last_name: String,
    pub gender: DoctorGender,
    pub telephone: String,
    pub email: String,
    pub specialty_id: u64,
    #[serde(default)]
    pub specialty: Option<SpecialtySummary>,
    pub status: ActiveStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Doctor {
    pub fn display_name(&self) -> String {
        format!("Dr. {}", full_name(&self.name, &self.last_name))
    }

    pub fn specialty(&self) -> Linked<SpecialtySummary> {
        Linked::from_parts(self.specialty_id, self.specialty.clone())
    }

    pub fn specialty_label(&self) -> String {
        self.specialty()
            .label("Specialty", |s| s.specialtyname.clone())
    }

    pub fn is_active(&self) -> bool {
        self.status == ActiveStatus::Active
    }
}

impl Entity for Doctor {
    const COLLECTION: &'static str = "doctors";

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorPayload {
    pub name: String,
    pub last_name: String,
    pub gender: DoctorGender,
    pub telephone: String,
    pub email: String,
    pub specialty_id: u64,
    pub status: ActiveStatus,
}
