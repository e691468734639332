use super::{enum_options, fetch_both, save, CellText, ResourceScreen};
use crate::api::client::ResourceClient;
use crate::api::clinic::Clinic;
use crate::api::{ApiError, ApiResult};
use crate::app::ResourceKind;
use crate::forms::choices::{all_of, doctor_choices, selectable};
use crate::forms::field::{FieldSpec, Rule};
use crate::forms::{FormMode, FormState, FormValues};
use crate::models::appointment::{Appointment, AppointmentPayload, AppointmentStatus};
use crate::models::dates::{datetime_for_input, datetime_for_wire, display_datetime};
use crate::models::patient::Patient;
use ratatui::layout::Constraint;

impl ResourceScreen for Appointment {
    const KIND: ResourceKind = ResourceKind::Appointments;
    const TITLE: &'static str = "APPOINTMENTS";
    const SINGULAR: &'static str = "appointment";

    fn client(clinic: &Clinic) -> &ResourceClient<Self> {
        &clinic.appointments
    }

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("ID", Constraint::Length(5)),
            ("Date", Constraint::Length(17)),
            ("Patient", Constraint::Percentage(20)),
            ("Doctor", Constraint::Percentage(20)),
            ("Specialty", Constraint::Percentage(15)),
            ("Reason", Constraint::Percentage(25)),
            ("Status", Constraint::Length(12)),
        ]
    }

    fn cells(&self) -> Vec<CellText> {
        vec![
            self.id.to_string().into(),
            display_datetime(&self.appointment_date).into(),
            self.patient_name().into(),
            self.doctor_name().into(),
            self.specialty_name().into(),
            self.reason.as_str().into(),
            CellText::badge(self.status.label(), self.status.badge()),
        ]
    }

    fn details(&self) -> Vec<(String, String)> {
        vec![
            ("Date".into(), display_datetime(&self.appointment_date)),
            ("Patient".into(), self.patient_name()),
            ("Doctor".into(), self.doctor_name()),
            ("Specialty".into(), self.specialty_name().to_string()),
            ("Reason".into(), self.reason.clone()),
            ("Status".into(), self.status.label().to_string()),
        ]
    }

    fn delete_prompt(&self) -> String {
        format!(
            "Delete appointment #{} of {} ({})?",
            self.id,
            self.patient_name(),
            display_datetime(&self.appointment_date)
        )
    }

    fn form_fields(_mode: FormMode) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("appointment_date", "Date and time")
                .rules([Rule::Required, Rule::DateTime]),
            FieldSpec::text("reason", "Reason").rules([
                Rule::Required,
                Rule::MinLen(5),
                Rule::MaxLen(200),
            ]),
            FieldSpec::choice("patient_id", "Patient", Vec::new()).rules([Rule::Required]),
            FieldSpec::choice("doctor_id", "Doctor", Vec::new()).rules([Rule::Required]),
            FieldSpec::choice("status", "Status", enum_options(AppointmentStatus::pairs()))
                .rules([Rule::Required])
                .default_value(AppointmentStatus::Pending.as_wire()),
        ]
    }

    fn prefill(&self, form: &mut FormState) {
        form.set_value("appointment_date", datetime_for_input(&self.appointment_date));
        form.set_value("reason", self.reason.clone());
        form.set_value("patient_id", self.patient_id.to_string());
        form.set_value("doctor_id", self.doctor_id.to_string());
        form.set_value("status", self.status.as_wire());
    }

    fn load_references(
        clinic: &Clinic,
        form: &mut FormState,
        current: Option<&Self>,
    ) -> ApiResult<()> {
        let (patients, doctors) = fetch_both(
            || clinic.patients.list_all(),
            || clinic.doctors.list_all(),
        );

        if let Ok(patients) = &patients {
            let options = match current {
                Some(appointment) => selectable(
                    patients,
                    |p| p.id,
                    Patient::full_name,
                    |_| true,
                    Some(appointment.patient_id),
                ),
                None => all_of(patients, |p| p.id, Patient::full_name),
            };
            form.set_options("patient_id", options);
        }
        if let Ok(doctors) = &doctors {
            form.set_options("doctor_id", doctor_choices(doctors, current.map(|a| a.doctor_id)));
        }
        patients.and(doctors).map(|_| ())
    }

    fn submit(clinic: &Clinic, mode: FormMode, values: &FormValues) -> ApiResult<()> {
        let appointment_date = datetime_for_wire(values.get("appointment_date"))
            .ok_or_else(|| ApiError::Encode("appointment_date is not a valid date".into()))?;
        let payload = AppointmentPayload {
            appointment_date,
            reason: values.text("reason"),
            patient_id: values.id("patient_id")?,
            doctor_id: values.id("doctor_id")?,
            status: AppointmentStatus::from_wire(values.get("status")),
        };
        save(&clinic.appointments, mode, &payload)
    }
}
