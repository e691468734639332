use super::{enum_options, save, CellText, ListOutcome, ResourceScreen};
use crate::api::client::ResourceClient;
use crate::api::clinic::Clinic;
use crate::api::ApiResult;
use crate::app::ResourceKind;
use crate::forms::choices::{appointment_choices, AppointmentPolicy};
use crate::forms::field::{FieldSpec, Rule};
use crate::forms::{FormMode, FormState, FormValues};
use crate::models::dates::display_date;
use crate::models::payment::{
    Payment, PaymentMethod, PaymentPayload, PaymentStatus, PaymentStatusPatch,
};
use ratatui::layout::Constraint;

impl Payment {
    fn date_label(&self) -> String {
        self.payment_date
            .as_deref()
            .map(display_date)
            .unwrap_or_else(|| "-".to_string())
    }
}

impl ResourceScreen for Payment {
    const KIND: ResourceKind = ResourceKind::Payments;
    const TITLE: &'static str = "PAYMENTS";
    const SINGULAR: &'static str = "payment";

    fn client(clinic: &Clinic) -> &ResourceClient<Self> {
        &clinic.payments
    }

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("ID", Constraint::Length(5)),
            ("Appointment", Constraint::Percentage(25)),
            ("Method", Constraint::Length(14)),
            ("Amount", Constraint::Length(16)),
            ("Date", Constraint::Length(17)),
            ("Status", Constraint::Length(11)),
        ]
    }

    fn cells(&self) -> Vec<CellText> {
        vec![
            self.id.to_string().into(),
            self.context().appointment_label().into(),
            self.payment_method.label().into(),
            self.amount.to_string().into(),
            self.date_label().into(),
            CellText::badge(self.payment_status.label(), self.payment_status.badge()),
        ]
    }

    fn details(&self) -> Vec<(String, String)> {
        let context = self.context();
        vec![
            ("Appointment".into(), context.appointment_label()),
            ("Patient".into(), context.patient_name()),
            ("Method".into(), self.payment_method.label().to_string()),
            ("Amount".into(), self.amount.to_string()),
            ("Date".into(), self.date_label()),
            ("Status".into(), self.payment_status.label().to_string()),
        ]
    }

    fn delete_prompt(&self) -> String {
        format!("Delete payment #{} of {}?", self.id, self.amount)
    }

    fn form_fields(_mode: FormMode) -> Vec<FieldSpec> {
        vec![
            FieldSpec::choice("payment_method", "Method", enum_options(PaymentMethod::pairs()))
                .rules([Rule::Required])
                .default_value(PaymentMethod::Cash.as_wire()),
            FieldSpec::decimal("amount", "Amount")
                .rules([Rule::Required, Rule::Decimal { min_cents: 1 }]),
            FieldSpec::choice("appointment_id", "Appointment", Vec::new()).rules([Rule::Required]),
            FieldSpec::choice("payment_status", "Status", enum_options(PaymentStatus::pairs()))
                .rules([Rule::Required])
                .default_value(PaymentStatus::Pending.as_wire()),
        ]
    }

    fn prefill(&self, form: &mut FormState) {
        form.set_value("payment_method", self.payment_method.as_wire());
        form.set_value("amount", self.amount.raw());
        form.set_value("appointment_id", self.appointment_id.to_string());
        form.set_value("payment_status", self.payment_status.as_wire());
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
                AppointmentPolicy::Billable,
                current.map(|p| p.appointment_id),
            ),
        );
        Ok(())
    }

    fn submit(clinic: &Clinic, mode: FormMode, values: &FormValues) -> ApiResult<()> {
        let payload = PaymentPayload {
            payment_method: PaymentMethod::from_wire(values.get("payment_method")),
            amount: values.number("amount")?,
            appointment_id: values.id("appointment_id")?,
            payment_status: PaymentStatus::from_wire(values.get("payment_status")),
        };
        save(&clinic.payments, mode, &payload)
    }

    fn list_keys() -> &'static [(char, &'static str)] {
        &[('s', "Next status")]
    }

    fn list_action(clinic: &Clinic, record: &Self, key: char) -> Option<ListOutcome> {
        if key != 's' {
            return None;
        }
        let next = record.payment_status.next();
        let patch = PaymentStatusPatch {
            payment_status: next.clone(),
        };
        Some(match clinic.payments.patch(record.id, &patch) {
            Ok(_) => ListOutcome::Done(format!("Payment #{} is now {}", record.id, next.label())),
            Err(e) => ListOutcome::Failed(format!(
                "Could not update payment #{}: {e}",
                record.id
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use crate::api::transport::Method;
    use serde_json::json;

    #[test]
    fn status_key_sends_a_narrow_patch() {
        let backend = MockBackend::new();
        let id = backend.seed(
            "payments",
            json!({"payment_method": "TARJETA", "amount": "150.00", "appointment_id": 4,
                   "payment_status": "PENDIENTE"}),
        );
        let clinic = Clinic::new(backend.clone());
        let payment = clinic.payments.get_by_id(id).unwrap();

        let outcome = Payment::list_action(&clinic, &payment, 's');

        assert_eq!(
            outcome,
            Some(ListOutcome::Done(format!("Payment #{id} is now Received")))
        );
        assert!(backend
            .requests()
            .contains(&(Method::Patch, format!("/payments/{id}/"))));
        let stored = backend.record("payments", id).unwrap();
        assert_eq!(stored["payment_status"], json!("RECIBIDO"));
        assert_eq!(stored["amount"], json!("150.00"));
    }

    #[test]
    fn amount_is_validated_and_sent_as_a_number() {
        let backend = MockBackend::new();
        let clinic = Clinic::new(backend.clone());
        let mut form = FormState::new(FormMode::Create, Payment::form_fields(FormMode::Create));
        form.mark_ready();
        form.set_value("appointment_id", "4");
        form.set_value("amount", "0.00");
        assert!(form.begin_submit().is_err());

        form.set_value("amount", "150.50");
        let values = form.begin_submit().unwrap();
        Payment::submit(&clinic, FormMode::Create, &values).unwrap();

        let stored = backend.record("payments", 1).unwrap();
        assert_eq!(stored["amount"], json!(150.5));
        assert_eq!(stored["payment_status"], json!("PENDIENTE"));
        assert!(stored.get("payment_date").is_none());
    }

    #[test]
    fn missing_date_shows_a_dash() {
        let payment: Payment = serde_json::from_value(json!({
            "id": 1, "payment_method": "EFECTIVO", "amount": "150000.00",
            "appointment_id": 4, "payment_status": "REEMBOLSADO"
        }))
        .unwrap();
        let cells = payment.cells();
        assert_eq!(cells[3].text, "$ 150.000,00");
        assert_eq!(cells[4].text, "-");
        assert_eq!(cells[5].badge, Some(crate::models::Badge::Info));
    }

    #[test]
    fn backend_dates_are_shown_day_first() {
        let payment: Payment = serde_json::from_value(json!({
            "id": 3, "payment_method": "TARJETA", "payment_date": "2025-03-01",
            "amount": "150.00", "appointment_id": 4, "payment_status": "RECIBIDO"
        }))
        .unwrap();
        assert_eq!(payment.cells()[4].text, "01/03/2025");
        assert!(payment
            .details()
            .contains(&("Date".to_string(), "01/03/2025".to_string())));
    }
}
