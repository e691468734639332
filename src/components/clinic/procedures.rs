use super::diagnoses::{load_attended, note_cells, note_columns, note_details, note_fields};
use super::{save, CellText, ResourceScreen};
use crate::api::client::ResourceClient;
use crate::api::clinic::Clinic;
use crate::api::ApiResult;
use crate::app::ResourceKind;
use crate::forms::field::FieldSpec;
use crate::forms::{FormMode, FormState, FormValues};
use crate::models::procedure::{MedicalProcedure, ProcedurePayload};
use ratatui::layout::Constraint;

impl ResourceScreen for MedicalProcedure {
    const KIND: ResourceKind = ResourceKind::Procedures;
    const TITLE: &'static str = "MEDICAL PROCEDURES";
    const SINGULAR: &'static str = "medical procedure";

    fn client(clinic: &Clinic) -> &ResourceClient<Self> {
        &clinic.procedures
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
        load_attended(clinic, form, current.map(|p| p.appointment_id))
    }

    fn submit(clinic: &Clinic, mode: FormMode, values: &FormValues) -> ApiResult<()> {
        let payload = ProcedurePayload {
            description: values.text("description"),
            appointment_id: values.id("appointment_id")?,
        };
        save(&clinic.procedures, mode, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use crate::api::transport::Method;
    use serde_json::json;

    #[test]
    fn short_description_blocks_submit() {
        let mut form = FormState::new(
            FormMode::Create,
            MedicalProcedure::form_fields(FormMode::Create),
        );
        form.mark_ready();
        form.set_value("appointment_id", "3");
        form.set_value("description", "Sutura");

        assert!(form.begin_submit().is_err());
        assert_eq!(
            form.field_error(1).as_deref(),
            Some("Description must have at least 10 characters")
        );
    }

    #[test]
    fn update_uses_put_on_the_procedure() {
        let backend = MockBackend::new();
        let id = backend.seed(
            "medicalprocedures",
            json!({"description": "Sutura de herida en antebrazo", "appointment_id": 3}),
        );
        let clinic = Clinic::new(backend.clone());
        let mut form = FormState::new(
            FormMode::Edit(id),
            MedicalProcedure::form_fields(FormMode::Edit(id)),
        );
        clinic.procedures.get_by_id(id).unwrap().prefill(&mut form);
        form.mark_ready();
        form.set_value("description", "Sutura de herida en antebrazo izquierdo");
        let values = form.begin_submit().unwrap();

        MedicalProcedure::submit(&clinic, FormMode::Edit(id), &values).unwrap();

        assert!(backend
            .requests()
            .contains(&(Method::Put, format!("/medicalprocedures/{id}/"))));
        assert_eq!(
            backend.record("medicalprocedures", id).unwrap()["description"],
            json!("Sutura de herida en antebrazo izquierdo")
        );
    }
}
