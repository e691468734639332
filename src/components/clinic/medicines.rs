use super::{save, CellText, ResourceScreen};
use crate::api::client::ResourceClient;
use crate::api::clinic::Clinic;
use crate::api::ApiResult;
use crate::app::ResourceKind;
use crate::forms::field::{FieldSpec, Rule};
use crate::forms::{FormMode, FormState, FormValues};
use crate::models::medicine::{Medicine, MedicinePayload};
use ratatui::layout::Constraint;

impl ResourceScreen for Medicine {
    const KIND: ResourceKind = ResourceKind::Medicines;
    const TITLE: &'static str = "MEDICINES";
    const SINGULAR: &'static str = "medicine";

    fn client(clinic: &Clinic) -> &ResourceClient<Self> {
        &clinic.medicines
    }

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("ID", Constraint::Length(5)),
            ("Name", Constraint::Percentage(40)),
            ("Presentation", Constraint::Percentage(30)),
            ("Dose", Constraint::Percentage(25)),
        ]
    }

    fn cells(&self) -> Vec<CellText> {
        vec![
            self.id.to_string().into(),
            self.name.as_str().into(),
            self.presentation.as_str().into(),
            self.dose.as_str().into(),
        ]
    }

    fn details(&self) -> Vec<(String, String)> {
        vec![
            ("Name".into(), self.name.clone()),
            ("Presentation".into(), self.presentation.clone()),
            ("Dose".into(), self.dose.clone()),
        ]
    }

    fn delete_prompt(&self) -> String {
        format!("Delete {}?", self.choice_label())
    }

    fn form_fields(_mode: FormMode) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("name", "Name").rules([
                Rule::Required,
                Rule::MinLen(2),
                Rule::MaxLen(100),
            ]),
            FieldSpec::text("presentation", "Presentation").rules([
                Rule::Required,
                Rule::MinLen(2),
                Rule::MaxLen(50),
            ]),
            FieldSpec::text("dose", "Dose").rules([
                Rule::Required,
                Rule::MinLen(2),
                Rule::MaxLen(50),
            ]),
        ]
    }

    fn prefill(&self, form: &mut FormState) {
        form.set_value("name", self.name.clone());
        form.set_value("presentation", self.presentation.clone());
        form.set_value("dose", self.dose.clone());
    }

    fn submit(clinic: &Clinic, mode: FormMode, values: &FormValues) -> ApiResult<()> {
        let payload = MedicinePayload {
            name: values.text("name"),
            presentation: values.text("presentation"),
            dose: values.text("dose"),
        };
        save(&clinic.medicines, mode, &payload)
    }
}
