use super::{enum_options, save, CellText, ResourceScreen};
use crate::api::client::ResourceClient;
use crate::api::clinic::Clinic;
use crate::api::ApiResult;
use crate::app::ResourceKind;
use crate::forms::choices::all_of;
use crate::forms::field::{FieldSpec, Rule};
use crate::forms::{FormMode, FormState, FormValues};
use crate::models::dates::display_datetime;
use crate::models::doctor::{Doctor, DoctorGender, DoctorPayload};
use crate::models::ActiveStatus;
use ratatui::layout::Constraint;

impl ResourceScreen for Doctor {
    const KIND: ResourceKind = ResourceKind::Doctors;
    const TITLE: &'static str = "DOCTORS";
    const SINGULAR: &'static str = "doctor";

    fn client(clinic: &Clinic) -> &ResourceClient<Self> {
        &clinic.doctors
    }

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("ID", Constraint::Length(5)),
            ("Name", Constraint::Percentage(25)),
            ("Gender", Constraint::Length(8)),
            ("Telephone", Constraint::Length(12)),
            ("Email", Constraint::Percentage(30)),
            ("Status", Constraint::Length(10)),
        ]
    }

    fn cells(&self) -> Vec<CellText> {
        vec![
            self.id.to_string().into(),
            self.display_name().into(),
            self.gender.label().into(),
            self.telephone.as_str().into(),
            self.email.as_str().into(),
            CellText::badge(self.status.label(), self.status.badge()),
        ]
    }

    fn details(&self) -> Vec<(String, String)> {
        let mut details = vec![
            ("Name".into(), self.display_name()),
            ("Specialty".into(), self.specialty_label()),
            ("Gender".into(), self.gender.label().to_string()),
            ("Telephone".into(), self.telephone.clone()),
            ("Email".into(), self.email.clone()),
            ("Status".into(), self.status.label().to_string()),
        ];
        if let Some(created) = &self.created_at {
            details.push(("Created".into(), display_datetime(created)));
        }
        if let Some(updated) = &self.updated_at {
            details.push(("Updated".into(), display_datetime(updated)));
        }
        details
    }

    fn delete_prompt(&self) -> String {
        format!("Delete {}?", self.display_name())
    }

    fn form_fields(_mode: FormMode) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("name", "Name").rules([Rule::Required, Rule::MinLen(2)]),
            FieldSpec::text("last_name", "Last name").rules([Rule::Required, Rule::MinLen(2)]),
            FieldSpec::choice("gender", "Gender", enum_options(DoctorGender::pairs()))
                .rules([Rule::Required]),
            FieldSpec::digits("telephone", "Telephone", 10),
            FieldSpec::text("email", "Email").rules([Rule::Required, Rule::Email]),
            FieldSpec::choice("specialty_id", "Specialty", Vec::new()).rules([Rule::Required]),
            FieldSpec::choice("status", "Status", enum_options(ActiveStatus::pairs()))
                .rules([Rule::Required])
                .default_value(ActiveStatus::Active.as_wire()),
        ]
    }

    fn prefill(&self, form: &mut FormState) {
        form.set_value("name", self.name.clone());
        form.set_value("last_name", self.last_name.clone());
        form.set_value("gender", self.gender.as_wire());
        form.set_value("telephone", self.telephone.clone());
        form.set_value("email", self.email.clone());
        form.set_value("specialty_id", self.specialty_id.to_string());
        form.set_value("status", self.status.as_wire());
    }

    fn load_references(
        clinic: &Clinic,
        form: &mut FormState,
        _current: Option<&Self>,
    ) -> ApiResult<()> {
        let specialties = clinic.specialties.list_all()?;
        form.set_options(
            "specialty_id",
            all_of(&specialties, |s| s.id, |s| s.specialtyname.clone()),
        );
        Ok(())
    }

    fn submit(clinic: &Clinic, mode: FormMode, values: &FormValues) -> ApiResult<()> {
        let payload = DoctorPayload {
            name: values.text("name"),
            last_name: values.text("last_name"),
            gender: DoctorGender::from_wire(values.get("gender")),
            telephone: values.text("telephone"),
            email: values.text("email"),
            specialty_id: values.id("specialty_id")?,
            status: ActiveStatus::from_wire(values.get("status")),
        };
        save(&clinic.doctors, mode, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_shows_status_badge_and_details_fall_back_to_id() {
        let doctor: Doctor = serde_json::from_value(json!({
            "id": 3, "name": "Ana", "last_name": "Ruiz", "gender": "F",
            "telephone": "3001234567", "email": "ana@clinic.co", "specialty_id": 2,
            "status": "INACTIVE"
        }))
        .unwrap();

        let cells = doctor.cells();
        assert_eq!(cells[1].text, "Dr. Ana Ruiz");
        assert_eq!(cells[5].badge, Some(crate::models::Badge::Danger));
        assert!(doctor
            .details()
            .contains(&("Specialty".to_string(), "Specialty #2".to_string())));
    }
}
