use super::{save, CellText, ListOutcome, ResourceScreen};
use crate::api::client::ResourceClient;
use crate::api::clinic::Clinic;
use crate::api::ApiResult;
use crate::app::{Page, ResourceKind, Route};
use crate::forms::choices::{appointment_choices, AppointmentPolicy};
use crate::forms::field::{FieldSpec, Rule};
use crate::forms::{FormMode, FormState, FormValues};
use crate::models::dates::{date_for_input, display_date, today};
use crate::models::prescription::{Prescription, PrescriptionPayload};
use ratatui::layout::Constraint;

impl ResourceScreen for Prescription {
    const KIND: ResourceKind = ResourceKind::Prescriptions;
    const TITLE: &'static str = "PRESCRIPTIONS";
    const SINGULAR: &'static str = "prescription";

    fn client(clinic: &Clinic) -> &ResourceClient<Self> {
        &clinic.prescriptions
    }

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("ID", Constraint::Length(5)),
            ("Date", Constraint::Length(11)),
            ("Appointment", Constraint::Percentage(30)),
            ("Patient", Constraint::Percentage(25)),
            ("Medicines", Constraint::Length(10)),
        ]
    }

    fn cells(&self) -> Vec<CellText> {
        let context = self.context();
        vec![
            self.id.to_string().into(),
            display_date(&self.prescription_date).into(),
            context.appointment_label().into(),
            context.patient_name().into(),
            self.medicines_count().to_string().into(),
        ]
    }

    fn details(&self) -> Vec<(String, String)> {
        let context = self.context();
        let mut details = vec![
            ("Date".into(), display_date(&self.prescription_date)),
            ("Appointment".into(), context.appointment_label()),
            ("Patient".into(), context.patient_name()),
            ("Doctor".into(), context.doctor_name()),
        ];
        if !self.has_medicines() {
            details.push(("Medicines".into(), "None yet (press M to add)".into()));
        }
        for (n, line) in self.lines().iter().enumerate() {
            details.push((
                format!("Medicine {}", n + 1),
                format!(
                    "{} x{} - {}",
                    line.medicine_name(),
                    line.amount,
                    line.indications
                ),
            ));
        }
        details
    }

    fn delete_prompt(&self) -> String {
        match self.medicines_count() {
            0 => format!("Delete prescription #{}?", self.id),
            n => format!("Delete prescription #{} and its {n} medicine line(s)?", self.id),
        }
    }

    fn form_fields(mode: FormMode) -> Vec<FieldSpec> {
        let appointment =
            FieldSpec::choice("appointment_id", "Appointment", Vec::new()).rules([Rule::Required]);
        match mode {
            FormMode::Create => vec![appointment],
            FormMode::Edit(_) => vec![
                FieldSpec::text("prescription_date", "Date").rules([Rule::Required, Rule::Date]),
                appointment,
            ],
        }
    }

    fn prefill(&self, form: &mut FormState) {
        form.set_value("prescription_date", date_for_input(&self.prescription_date));
        form.set_value("appointment_id", self.appointment_id.to_string());
    }

    fn load_references(
        clinic: &Clinic,
        form: &mut FormState,
        current: Option<&Self>,
    ) -> ApiResult<()> {
        let appointments = clinic.appointments.list_all()?;
        form.set_options(
            "appointment_id",
            appointment_choices(
                &appointments,
                AppointmentPolicy::AttendedOrPending,
                current.map(|p| p.appointment_id),
            ),
        );
        Ok(())
    }

    fn submit(clinic: &Clinic, mode: FormMode, values: &FormValues) -> ApiResult<()> {
        let prescription_date = match mode {
            FormMode::Create => today(),
            FormMode::Edit(_) => values.text("prescription_date"),
        };
        let payload = PrescriptionPayload {
            prescription_date,
            appointment_id: values.id("appointment_id")?,
        };
        save(&clinic.prescriptions, mode, &payload)
    }

    fn list_keys() -> &'static [(char, &'static str)] {
        &[('m', "Add medicine")]
    }

    fn list_action(_clinic: &Clinic, record: &Self, key: char) -> Option<ListOutcome> {
        (key == 'm').then(|| {
            ListOutcome::Navigate(Route {
                kind: ResourceKind::RecipeDetails,
                page: Page::Create {
                    preset: vec![("prescription_id", record.id.to_string())],
                },
            })
        })
    }
}
