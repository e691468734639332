use super::{save, CellText, ResourceScreen};
use crate::api::client::ResourceClient;
use crate::api::clinic::Clinic;
use crate::api::ApiResult;
use crate::app::ResourceKind;
use crate::forms::choices::{appointment_choices, AppointmentPolicy};
use crate::forms::field::{FieldSpec, Rule};
use crate::forms::{FormMode, FormState, FormValues};
use crate::models::appointment::AppointmentContext;
use crate::models::diagnosis::{Diagnosis, DiagnosisPayload};
use ratatui::layout::Constraint;

/// Table columns for notes attached to an attended appointment.
pub(super) fn note_columns() -> Vec<(&'static str, Constraint)> {
    vec![
        ("ID", Constraint::Length(5)),
        ("Appointment", Constraint::Percentage(25)),
        ("Patient", Constraint::Percentage(20)),
        ("Doctor", Constraint::Percentage(20)),
        ("Description", Constraint::Percentage(35)),
    ]
}

pub(super) fn note_cells(
    id: u64,
    context: &AppointmentContext<'_>,
    description: &str,
) -> Vec<CellText> {
    vec![
        id.to_string().into(),
        context.appointment_label().into(),
        context.patient_name().into(),
        context.doctor_name().into(),
        description.into(),
    ]
}

pub(super) fn note_details(
    context: &AppointmentContext<'_>,
    description: &str,
) -> Vec<(String, String)> {
    vec![
        ("Appointment".into(), context.appointment_label()),
        ("Patient".into(), context.patient_name()),
        ("Doctor".into(), context.doctor_name()),
        ("Description".into(), description.to_string()),
    ]
}

pub(super) fn note_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::choice("appointment_id", "Appointment", Vec::new()).rules([Rule::Required]),
        FieldSpec::text("description", "Description").rules([
            Rule::Required,
            Rule::MinLen(10),
            Rule::MaxLen(1000),
        ]),
    ]
}

/// Only attended appointments, plus the current one when editing.
pub(super) fn load_attended(
    clinic: &Clinic,
    form: &mut FormState,
    current_appointment: Option<u64>,
) -> ApiResult<()> {
    let appointments = clinic.appointments.list_all()?;
    form.set_options(
        "appointment_id",
        appointment_choices(&appointments, AppointmentPolicy::AttendedOnly, current_appointment),
    );
    Ok(())
}

impl ResourceScreen for Diagnosis {
    const KIND: ResourceKind = ResourceKind::Diagnoses;
    const TITLE: &'static str = "DIAGNOSES";
    const SINGULAR: &'static str = "diagnosis";

    fn client(clinic: &Clinic) -> &ResourceClient<Self> {
        &clinic.diagnoses
    }

    fn columns() -> Vec<(&'static str, Constraint)> {
        note_columns()
    }

    fn cells(&self) -> Vec<CellText> {
        note_cells(self.id, &self.context(), &self.description)
    }

    fn details(&self) -> Vec<(String, String)> {
        note_details(&self.context(), &self.description)
    }

    fn form_fields(_mode: FormMode) -> Vec<FieldSpec> {
        note_fields()
    }

    fn prefill(&self, form: &mut FormState) {
        form.set_value("appointment_id", self.appointment_id.to_string());
        form.set_value("description", self.description.clone());
    }

    fn load_references(
        clinic: &Clinic,
        form: &mut FormState,
        current: Option<&Self>,
    ) -> ApiResult<()> {
        load_attended(clinic, form, current.map(|d| d.appointment_id))
    }

    fn submit(clinic: &Clinic, mode: FormMode, values: &FormValues) -> ApiResult<()> {
        let payload = DiagnosisPayload {
            description: values.text("description"),
            appointment_id: values.id("appointment_id")?,
        };
        save(&clinic.diagnoses, mode, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use serde_json::json;

    fn seed_appointment(backend: &MockBackend, status: &str) -> u64 {
        backend.seed(
            "appointments",
            json!({"appointment_date": "2025-03-01T09:30:00Z", "reason": "Control",
                   "patient_id": 1, "doctor_id": 2, "status": status}),
        )
    }

    fn option_ids(form: &FormState) -> Vec<String> {
        form.fields()[0].options().iter().map(|o| o.value.clone()).collect()
    }

    #[test]
    fn create_offers_attended_appointments_only() {
        let backend = MockBackend::new();
        let attended = seed_appointment(&backend, "ATENDIDA");
        seed_appointment(&backend, "PENDIENTE");
        seed_appointment(&backend, "CANCELADA");
        let clinic = Clinic::new(backend.clone());
        let mut form = FormState::new(FormMode::Create, Diagnosis::form_fields(FormMode::Create));

        Diagnosis::load_references(&clinic, &mut form, None).unwrap();
        assert_eq!(option_ids(&form), [attended.to_string()]);
    }

    #[test]
    fn edit_keeps_the_current_appointment() {
        let backend = MockBackend::new();
        let attended = seed_appointment(&backend, "ATENDIDA");
        let pending = seed_appointment(&backend, "PENDIENTE");
        let id = backend.seed(
            "diagnoses",
            json!({"description": "Hipertensión arterial leve", "appointment_id": pending}),
        );
        let clinic = Clinic::new(backend.clone());
        let current = clinic.diagnoses.get_by_id(id).unwrap();
        let mut form = FormState::new(
            FormMode::Edit(id),
            Diagnosis::form_fields(FormMode::Edit(id)),
        );

        Diagnosis::load_references(&clinic, &mut form, Some(&current)).unwrap();
        assert_eq!(option_ids(&form), [pending.to_string(), attended.to_string()]);
    }

    #[test]
    fn names_come_from_the_nested_appointment() {
        let diagnosis: Diagnosis = serde_json::from_value(json!({
            "id": 2, "description": "Migraña crónica", "appointment_id": 9,
            "appointment": {"id": 9, "appointment_date": "2025-05-02T14:00:00Z",
                            "status": "ATENDIDA",
                            "patient": {"id": 5, "name": "Luis", "last_name": "Mora"}}
        }))
        .unwrap();
        let cells = diagnosis.cells();
        assert_eq!(cells[1].text, "Appointment #9 - 02/05/2025 14:00");
        assert_eq!(cells[2].text, "Luis Mora");
        assert_eq!(cells[3].text, "Doctor (appointment #9)");
    }
}
