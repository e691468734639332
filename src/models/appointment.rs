use super::dates::display_datetime;
use super::{
    doctor_label, patient_label, AppointmentSummary, DoctorSummary, Linked, PersonSummary,
    NOT_SPECIFIED,
};
use crate::api::client::Entity;
use serde::{Deserialize, Serialize};

closed_enum! {
    pub enum AppointmentStatus {
        Pending => ("PENDIENTE", "Pending", Warning),
        Attended => ("ATENDIDA", "Attended", Success),
        Cancelled => ("CANCELADA", "Cancelled", Danger),
        Rescheduled => ("REPROGRAMADA", "Rescheduled", Info),
        NoShow => ("NO ASISTIO", "No show", Neutral),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u64,
    pub appointment_date: String,
    pub reason: String,
    pub patient_id: u64,
    #[serde(default)]
    pub patient: Option<PersonSummary>,
    pub doctor_id: u64,
    #[serde(default)]
    pub doctor: Option<DoctorSummary>,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn patient(&self) -> Linked<PersonSummary> {
        Linked::from_parts(self.patient_id, self.patient.clone())
    }

    pub fn doctor(&self) -> Linked<DoctorSummary> {
        Linked::from_parts(self.doctor_id, self.doctor.clone())
    }

    pub fn patient_name(&self) -> String {
        patient_label(&self.patient())
    }

    pub fn doctor_name(&self) -> String {
        doctor_label(&self.doctor())
    }

    pub fn specialty_name(&self) -> &str {
        self.doctor
            .as_ref()
            .map(DoctorSummary::specialty_name)
            .unwrap_or(NOT_SPECIFIED)
    }

    /// Label used in appointment pickers.
    pub fn choice_label(&self) -> String {
        format!(
            "#{} - {} - {} ({}) - {} [{}]",
            self.id,
            self.patient_name(),
            self.doctor_name(),
            self.specialty_name(),
            display_datetime(&self.appointment_date),
            self.status.label()
        )
    }
}

impl Entity for Appointment {
    const COLLECTION: &'static str = "appointments";

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentPayload {
    pub appointment_date: String,
    pub reason: String,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub status: AppointmentStatus,
}

impl AppointmentSummary {
    pub fn patient_name(&self) -> Option<String> {
        match (&self.patient, self.patient_id) {
            (Some(patient), _) => Some(patient.full_name()),
            (None, Some(id)) => Some(format!("Patient #{id}")),
            (None, None) => None,
        }
    }

    pub fn doctor_name(&self) -> Option<String> {
        match (&self.doctor, self.doctor_id) {
            (Some(doctor), _) => Some(doctor.display_name()),
            (None, Some(id)) => Some(format!("Doctor #{id}")),
            (None, None) => None,
        }
    }
}

/// Who an appointment-bound record (prescription, diagnosis, procedure)
/// belongs to. Prefers the nested appointment, then a top-level summary,
/// then the bare appointment id.
pub struct AppointmentContext<'a> {
    pub appointment_id: u64,
    pub appointment: Option<&'a AppointmentSummary>,
    pub patient: Option<&'a PersonSummary>,
    pub doctor: Option<&'a DoctorSummary>,
}

impl AppointmentContext<'_> {
    pub fn appointment_label(&self) -> String {
        match self.appointment {
            Some(appointment) if !appointment.appointment_date.is_empty() => format!(
                "Appointment #{} - {}",
                self.appointment_id,
                display_datetime(&appointment.appointment_date)
            ),
            _ => format!("Appointment #{}", self.appointment_id),
        }
    }

    pub fn patient_name(&self) -> String {
        self.patient
            .map(PersonSummary::full_name)
            .or_else(|| self.appointment.and_then(AppointmentSummary::patient_name))
            .unwrap_or_else(|| format!("Patient (appointment #{})", self.appointment_id))
    }

    pub fn doctor_name(&self) -> String {
        self.doctor
            .map(DoctorSummary::display_name)
            .or_else(|| self.appointment.and_then(AppointmentSummary::doctor_name))
            .unwrap_or_else(|| format!("Doctor (appointment #{})", self.appointment_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_fall_back_to_ids() {
        let appointment: Appointment = serde_json::from_value(json!({
            "id": 12, "appointment_date": "2025-03-01T09:30:00Z", "reason": "Control",
            "patient_id": 7, "doctor_id": 3, "status": "ATENDIDA"
        }))
        .unwrap();

        assert_eq!(appointment.patient_name(), "Patient #7");
        assert_eq!(appointment.doctor_name(), "Doctor #3");
        assert_eq!(appointment.specialty_name(), NOT_SPECIFIED);
        assert_eq!(
            appointment.choice_label(),
            "#12 - Patient #7 - Doctor #3 (Not specified) - 01/03/2025 09:30 [Attended]"
        );
    }

    #[test]
    fn nested_summaries_are_preferred() {
        let appointment: Appointment = serde_json::from_value(json!({
            "id": 4, "appointment_date": "2025-03-01T09:30:00Z", "reason": "Control",
            "patient_id": 7, "patient": {"id": 7, "name": "Luis", "last_name": "Mora"},
            "doctor_id": 3,
            "doctor": {"id": 3, "name": "Ana", "last_name": "Ruiz",
                       "specialty": {"id": 1, "specialtyname": "Cardiología"}},
            "status": "NO ASISTIO"
        }))
        .unwrap();

        assert_eq!(appointment.patient_name(), "Luis Mora");
        assert_eq!(appointment.doctor_name(), "Dr. Ana Ruiz");
        assert_eq!(appointment.specialty_name(), "Cardiología");
        assert_eq!(appointment.status, AppointmentStatus::NoShow);
    }

    #[test]
    fn context_uses_the_best_available_source() {
        let summary: AppointmentSummary = serde_json::from_value(json!({
            "id": 9, "appointment_date": "2025-05-02T14:00:00Z", "status": "ATENDIDA",
            "patient_id": 5
        }))
        .unwrap();
        let context = AppointmentContext {
            appointment_id: 9,
            appointment: Some(&summary),
            patient: None,
            doctor: None,
        };
        assert_eq!(context.patient_name(), "Patient #5");
        assert_eq!(context.doctor_name(), "Doctor (appointment #9)");
        assert_eq!(context.appointment_label(), "Appointment #9 - 02/05/2025 14:00");

        let bare = AppointmentContext {
            appointment_id: 9,
            appointment: None,
            patient: None,
            doctor: None,
        };
        assert_eq!(bare.appointment_label(), "Appointment #9");
        assert_eq!(bare.patient_name(), "Patient (appointment #9)");
        assert_eq!(bare.doctor_name(), "Doctor (appointment #9)");
    }
}
