use super::appointment::AppointmentContext;
use super::{AppointmentSummary, DoctorSummary, PersonSummary};
use crate::api::client::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalProcedure {
    pub id: u64,
    pub description: String,
    pub appointment_id: u64,
    #[serde(default)]
    pub appointment: Option<AppointmentSummary>,
    #[serde(default)]
    pub patient: Option<PersonSummary>,
    #[serde(default)]
    pub doctor: Option<DoctorSummary>,
}

impl MedicalProcedure {
    pub fn context(&self) -> AppointmentContext<'_> {
        AppointmentContext {
            appointment_id: self.appointment_id,
            appointment: self.appointment.as_ref(),
            patient: self.patient.as_ref(),
            doctor: self.doctor.as_ref(),
        }
    }
}

impl Entity for MedicalProcedure {
    const COLLECTION: &'static str = "medicalprocedures";

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcedurePayload {
    pub description: String,
    pub appointment_id: u64,
}
