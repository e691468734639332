use super::{enum_options, save, CellText, ResourceScreen};
use crate::api::client::ResourceClient;
use crate::api::clinic::Clinic;
use crate::api::ApiResult;
use crate::app::ResourceKind;
use crate::forms::field::{FieldSpec, Rule};
use crate::forms::{FormMode, FormState, FormValues};
use crate::models::dates::{date_for_input, display_date};
use crate::models::patient::{DocumentType, Gender, Patient, PatientPayload};
use crate::models::ActiveStatus;
use ratatui::layout::Constraint;

impl ResourceScreen for Patient {
    const KIND: ResourceKind = ResourceKind::Patients;
    const TITLE: &'static str = "PATIENTS";
    const SINGULAR: &'static str = "patient";

    fn client(clinic: &Clinic) -> &ResourceClient<Self> {
        &clinic.patients
    }

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("ID", Constraint::Length(5)),
            ("Name", Constraint::Percentage(25)),
            ("Document", Constraint::Length(16)),
            ("Birth date", Constraint::Length(11)),
            ("Telephone", Constraint::Length(12)),
            ("Address", Constraint::Percentage(25)),
            ("Status", Constraint::Length(10)),
        ]
    }

    fn cells(&self) -> Vec<CellText> {
        vec![
            self.id.to_string().into(),
            self.full_name().into(),
            self.document().into(),
            display_date(&self.birth_date).into(),
            self.telephone.as_str().into(),
            self.address.as_str().into(),
            CellText::badge(self.status.label(), self.status.badge()),
        ]
    }

    fn details(&self) -> Vec<(String, String)> {
        vec![
            ("Name".into(), self.full_name()),
            (
                "Document".into(),
                format!("{} ({})", self.documentnumber, self.type_document.label()),
            ),
            ("Birth date".into(), display_date(&self.birth_date)),
            ("Gender".into(), self.gender.label().to_string()),
            ("Telephone".into(), self.telephone.clone()),
            ("Address".into(), self.address.clone()),
            ("Status".into(), self.status.label().to_string()),
        ]
    }

    fn delete_prompt(&self) -> String {
        format!("Delete patient {}?", self.full_name())
    }

    fn form_fields(_mode: FormMode) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("name", "Name").rules([Rule::Required, Rule::MinLen(2)]),
            FieldSpec::text("last_name", "Last name").rules([Rule::Required, Rule::MinLen(2)]),
            FieldSpec::text("birth_date", "Birth date").rules([Rule::Required, Rule::Date]),
            FieldSpec::choice("gender", "Gender", enum_options(Gender::pairs()))
                .rules([Rule::Required]),
            FieldSpec::choice(
                "type_document",
                "Document type",
                enum_options(DocumentType::pairs()),
            )
            .rules([Rule::Required])
            .default_value(DocumentType::CitizenId.as_wire()),
            FieldSpec::digits("documentnumber", "Document number", 10),
            FieldSpec::digits("telephone", "Telephone", 10),
            FieldSpec::text("address", "Address").rules([Rule::Required, Rule::MinLen(5)]),
            FieldSpec::choice("status", "Status", enum_options(ActiveStatus::pairs()))
                .rules([Rule::Required])
                .default_value(ActiveStatus::Active.as_wire()),
        ]
    }

    fn prefill(&self, form: &mut FormState) {
        form.set_value("name", self.name.clone());
        form.set_value("last_name", self.last_name.clone());
        form.set_value("birth_date", date_for_input(&self.birth_date));
        form.set_value("gender", self.gender.as_wire());
        form.set_value("type_document", self.type_document.as_wire());
        form.set_value("documentnumber", self.documentnumber.clone());
        form.set_value("telephone", self.telephone.clone());
        form.set_value("address", self.address.clone());
        form.set_value("status", self.status.as_wire());
    }

    fn submit(clinic: &Clinic, mode: FormMode, values: &FormValues) -> ApiResult<()> {
        let payload = PatientPayload {
            name: values.text("name"),
            last_name: values.text("last_name"),
            gender: Gender::from_wire(values.get("gender")),
            type_document: DocumentType::from_wire(values.get("type_document")),
            documentnumber: values.text("documentnumber"),
            birth_date: values.text("birth_date"),
            address: values.text("address"),
            telephone: values.text("telephone"),
            status: ActiveStatus::from_wire(values.get("status")),
        };
        save(&clinic.patients, mode, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use serde_json::json;

    fn patient_json() -> serde_json::Value {
        json!({
            "name": "Luis", "last_name": "Mora", "gender": "M", "type_document": "C.C",
            "documentnumber": "1020304050", "birth_date": "1990-04-12",
            "address": "Calle 10 # 5-20", "telephone": "3001234567", "status": "ACTIVE"
        })
    }

    #[test]
    fn document_number_must_have_ten_digits() {
        let mut form = FormState::new(FormMode::Create, Patient::form_fields(FormMode::Create));
        form.mark_ready();
        let record: Patient = serde_json::from_value({
            let mut value = patient_json();
            value["id"] = json!(1);
            value["documentnumber"] = json!("12345");
            value
        })
        .unwrap();
        record.prefill(&mut form);

        assert!(form.begin_submit().is_err());
        let index = form
            .fields()
            .iter()
            .position(|f| f.key == "documentnumber")
            .unwrap();
        assert_eq!(
            form.field_error(index).as_deref(),
            Some("Document number must have exactly 10 digits")
        );
    }

    #[test]
    fn update_changes_only_the_edited_fields() {
        let backend = MockBackend::new();
        let id = backend.seed("patients", patient_json());
        let clinic = Clinic::new(backend.clone());
        let record = clinic.patients.get_by_id(id).unwrap();

        let mut form = FormState::new(FormMode::Edit(id), Patient::form_fields(FormMode::Edit(id)));
        record.prefill(&mut form);
        form.mark_ready();
        form.set_value("address", "Carrera 7 # 12-30");
        let values = form.begin_submit().unwrap();
        Patient::submit(&clinic, FormMode::Edit(id), &values).unwrap();

        let updated = clinic.patients.get_by_id(id).unwrap();
        assert_eq!(updated.address, "Carrera 7 # 12-30");
        assert_eq!(updated.documentnumber, record.documentnumber);
        assert_eq!(updated.birth_date, "1990-04-12");
    }
}
