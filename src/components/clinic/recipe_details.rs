use super::{fetch_both, save, CellText, ResourceScreen};
use crate::api::client::ResourceClient;
use crate::api::clinic::Clinic;
use crate::api::ApiResult;
use crate::app::ResourceKind;
use crate::forms::choices::selectable;
use crate::forms::field::{FieldSpec, Rule};
use crate::forms::{FormMode, FormState, FormValues};
use crate::models::medicine::Medicine;
use crate::models::prescription::Prescription;
use crate::models::recipe_detail::{RecipeDetail, RecipeDetailPayload};
use ratatui::layout::Constraint;

impl ResourceScreen for RecipeDetail {
    const KIND: ResourceKind = ResourceKind::RecipeDetails;
    const TITLE: &'static str = "PRESCRIPTION LINES";
    const SINGULAR: &'static str = "prescription line";

    fn client(clinic: &Clinic) -> &ResourceClient<Self> {
        &clinic.recipe_details
    }

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("ID", Constraint::Length(5)),
            ("Prescription", Constraint::Length(13)),
            ("Medicine", Constraint::Percentage(30)),
            ("Amount", Constraint::Length(8)),
            ("Indications", Constraint::Percentage(45)),
        ]
    }

    fn cells(&self) -> Vec<CellText> {
        vec![
            self.id.to_string().into(),
            format!("#{}", self.prescription_id).into(),
            self.medicine_name().into(),
            self.amount.to_string().into(),
            self.indications.as_str().into(),
        ]
    }

    fn details(&self) -> Vec<(String, String)> {
        let mut details = vec![
            ("Prescription".into(), format!("#{}", self.prescription_id)),
            ("Medicine".into(), self.medicine_name()),
        ];
        if let Some(medicine) = self.medicine().full() {
            details.push((
                "Presentation".into(),
                format!("{} ({})", medicine.presentation, medicine.dose),
            ));
        }
        details.push(("Amount".into(), self.amount.to_string()));
        details.push(("Indications".into(), self.indications.clone()));
        details
    }

    fn delete_prompt(&self) -> String {
        format!(
            "Remove {} from prescription #{}?",
            self.medicine_name(),
            self.prescription_id
        )
    }

    fn form_fields(_mode: FormMode) -> Vec<FieldSpec> {
        vec![
            FieldSpec::choice("prescription_id", "Prescription", Vec::new())
                .rules([Rule::Required]),
            FieldSpec::choice("medicine_id", "Medicine", Vec::new()).rules([Rule::Required]),
            FieldSpec::text("amount", "Amount").rules([Rule::Required, Rule::MinInt(1)]),
            FieldSpec::text("indications", "Indications").rules([Rule::Required, Rule::MinLen(5)]),
        ]
    }

    fn prefill(&self, form: &mut FormState) {
        form.set_value("prescription_id", self.prescription_id.to_string());
        form.set_value("medicine_id", self.medicine_id.to_string());
        form.set_value("amount", self.amount.to_string());
        form.set_value("indications", self.indications.clone());
    }

    fn load_references(
        clinic: &Clinic,
        form: &mut FormState,
        current: Option<&Self>,
    ) -> ApiResult<()> {
        let (prescriptions, medicines) = fetch_both(
            || clinic.prescriptions.list_all(),
            || clinic.medicines.list_all(),
        );
        if let Ok(prescriptions) = &prescriptions {
            form.set_options(
                "prescription_id",
                selectable(
                    prescriptions,
                    |p| p.id,
                    Prescription::choice_label,
                    |_| true,
                    current.map(|d| d.prescription_id),
                ),
            );
        }
        if let Ok(medicines) = &medicines {
            form.set_options(
                "medicine_id",
                selectable(
                    medicines,
                    |m| m.id,
                    Medicine::choice_label,
                    |_| true,
                    current.map(|d| d.medicine_id),
                ),
            );
        }
        prescriptions.and(medicines).map(|_| ())
    }

    fn submit(clinic: &Clinic, mode: FormMode, values: &FormValues) -> ApiResult<()> {
        let payload = RecipeDetailPayload {
            amount: values.number("amount")?,
            indications: values.text("indications"),
            prescription_id: values.id("prescription_id")?,
            medicine_id: values.id("medicine_id")?,
        };
        save(&clinic.recipe_details, mode, &payload)
    }

    /// Prescriptions embed their lines.
    fn after_mutation(clinic: &Clinic) {
        clinic.prescriptions.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use serde_json::json;

    fn seed_line(backend: &MockBackend, prescription: u64, indications: &str) -> u64 {
        backend.seed(
            "recipedetails",
            json!({"amount": 1, "indications": indications, "prescription_id": prescription,
                   "medicine_id": 9}),
        )
    }

    #[test]
    fn deleting_a_line_updates_the_prescription_count() {
        let backend = MockBackend::new();
        backend.embed_children(
            "prescriptions",
            "recipe_details",
            "recipedetails",
            "prescription_id",
        );
        let prescription = backend.seed(
            "prescriptions",
            json!({"prescription_date": "2025-03-01", "appointment_id": 4}),
        );
        let first = seed_line(&backend, prescription, "Cada 8 horas");
        seed_line(&backend, prescription, "En ayunas");
        let clinic = Clinic::new(backend.clone());

        assert_eq!(clinic.prescriptions.list_all().unwrap()[0].medicines_count(), 2);

        clinic.recipe_details.remove(first).unwrap();
        RecipeDetail::after_mutation(&clinic);

        let prescriptions = clinic.prescriptions.store().snapshot();
        assert_eq!(prescriptions[0].medicines_count(), 1);
        assert_eq!(prescriptions[0].lines()[0].indications, "En ayunas");
    }

    #[test]
    fn medicines_are_offered_when_prescriptions_fail() {
        let backend = MockBackend::new();
        let medicine = backend.seed(
            "medicines",
            json!({"name": "Ibuprofeno", "presentation": "Tableta", "dose": "400 mg"}),
        );
        backend.seed("prescriptions", json!({"appointment_id": "not a number"}));
        let clinic = Clinic::new(backend.clone());
        let mut form = FormState::new(
            FormMode::Create,
            RecipeDetail::form_fields(FormMode::Create),
        );

        let result = RecipeDetail::load_references(&clinic, &mut form, None);

        assert!(matches!(result, Err(crate::api::ApiError::Decode { .. })));
        assert!(form.fields()[0].options().is_empty());
        let medicines = form.fields()[1].options();
        assert_eq!(medicines.len(), 1);
        assert_eq!(medicines[0].value, medicine.to_string());
    }

    #[test]
    fn amount_must_be_a_positive_whole_number() {
        let mut form = FormState::new(
            FormMode::Create,
            RecipeDetail::form_fields(FormMode::Create),
        );
        form.mark_ready();
        form.set_value("prescription_id", "1");
        form.set_value("medicine_id", "2");
        form.set_value("indications", "Cada 8 horas");
        form.set_value("amount", "0");
        assert!(form.begin_submit().is_err());
        assert_eq!(form.field_error(2).as_deref(), Some("Amount must be at least 1"));

        form.set_value("amount", "3");
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn missing_medicine_is_labelled_by_id() {
        let line: RecipeDetail = serde_json::from_value(json!({
            "id": 1, "amount": 2, "indications": "Cada 8 horas", "prescription_id": 5,
            "medicine_id": 8
        }))
        .unwrap();
        assert_eq!(line.cells()[2].text, "Medicine #8");
    }
}
