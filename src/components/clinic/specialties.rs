use super::{save, CellText, ResourceScreen};
use crate::api::client::ResourceClient;
use crate::api::clinic::Clinic;
use crate::api::ApiResult;
use crate::app::ResourceKind;
use crate::forms::field::{FieldSpec, Rule};
use crate::forms::{FormMode, FormState, FormValues};
use crate::models::specialty::{Specialty, SpecialtyPayload};
use ratatui::layout::Constraint;

impl ResourceScreen for Specialty {
    const KIND: ResourceKind = ResourceKind::Specialties;
    const TITLE: &'static str = "SPECIALTIES";
    const SINGULAR: &'static str = "specialty";

    fn client(clinic: &Clinic) -> &ResourceClient<Self> {
        &clinic.specialties
    }

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![("ID", Constraint::Length(6)), ("Name", Constraint::Min(20))]
    }

    fn cells(&self) -> Vec<CellText> {
        vec![self.id.to_string().into(), self.specialtyname.as_str().into()]
    }

    fn details(&self) -> Vec<(String, String)> {
        vec![("Name".into(), self.specialtyname.clone())]
    }

    fn delete_prompt(&self) -> String {
        format!("Delete the specialty \"{}\"?", self.specialtyname)
    }

    fn form_fields(_mode: FormMode) -> Vec<FieldSpec> {
        vec![FieldSpec::text("specialtyname", "Name").rules([
            Rule::Required,
            Rule::MinLen(2),
            Rule::MaxLen(100),
        ])]
    }

    fn prefill(&self, form: &mut FormState) {
        form.set_value("specialtyname", self.specialtyname.clone());
    }

    fn submit(clinic: &Clinic, mode: FormMode, values: &FormValues) -> ApiResult<()> {
        let payload = SpecialtyPayload {
            specialtyname: values.text("specialtyname"),
        };
        save(&clinic.specialties, mode, &payload)
    }
}
