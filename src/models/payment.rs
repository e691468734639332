use super::appointment::AppointmentContext;
use super::money::Money;
use super::AppointmentSummary;
use crate::api::client::Entity;
use serde::{Deserialize, Serialize};

closed_enum! {
    pub enum PaymentMethod {
        Cash => ("EFECTIVO", "Cash", Success),
        Card => ("TARJETA", "Card", Info),
        BankTransfer => ("TRANSFERENCIA_BANCARIA", "Bank transfer", Info),
    }
}

closed_enum! {
    pub enum PaymentStatus {
        Pending => ("PENDIENTE", "Pending", Warning),
        Received => ("RECIBIDO", "Received", Success),
        Cancelled => ("CANCELADO", "Cancelled", Danger),
        Refunded => ("REEMBOLSADO", "Refunded", Info),
    }
}

impl PaymentStatus {
    /// Next status in the list cycle. Unknown values restart at `Pending`.
    pub fn next(&self) -> PaymentStatus {
        match self {
            PaymentStatus::Pending => PaymentStatus::Received,
            PaymentStatus::Received => PaymentStatus::Cancelled,
            PaymentStatus::Cancelled => PaymentStatus::Refunded,
            PaymentStatus::Refunded | PaymentStatus::Other(_) => PaymentStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: u64,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_date: Option<String>,
    pub amount: Money,
    pub appointment_id: u64,
    #[serde(default)]
    pub appointment: Option<AppointmentSummary>,
    pub payment_status: PaymentStatus,
}

impl Payment {
    pub fn context(&self) -> AppointmentContext<'_> {
        AppointmentContext {
            appointment_id: self.appointment_id,
            appointment: self.appointment.as_ref(),
            patient: None,
            doctor: None,
        }
    }
}

impl Entity for Payment {
    const COLLECTION: &'static str = "payments";

    fn id(&self) -> u64 {
        self.id
    }
}

/// Amounts go out as JSON numbers.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentPayload {
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub appointment_id: u64,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatusPatch {
    pub payment_status: PaymentStatus,
}

/// Sum of the amounts that parse, in cents.
pub fn total_cents(payments: &[Payment]) -> i64 {
    payments.iter().filter_map(|p| p.amount.cents()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_cycle_wraps_around() {
        let mut status = PaymentStatus::Pending;
        let mut seen = Vec::new();
        for _ in 0..4 {
            status = status.next();
            seen.push(status.as_wire().to_string());
        }
        assert_eq!(seen, ["RECIBIDO", "CANCELADO", "REEMBOLSADO", "PENDIENTE"]);
        assert_eq!(PaymentStatus::Other("X".into()).next(), PaymentStatus::Pending);
    }

    #[test]
    fn decodes_string_amounts_and_sends_numbers() {
        let payment: Payment = serde_json::from_value(json!({
            "id": 1, "payment_method": "TARJETA", "payment_date": "2025-03-01",
            "amount": "150.00", "appointment_id": 4, "payment_status": "RECIBIDO"
        }))
        .unwrap();
        assert_eq!(payment.amount.to_string(), "$ 150,00");
        assert_eq!(total_cents(std::slice::from_ref(&payment)), 15_000);

        let payload = PaymentPayload {
            payment_method: payment.payment_method.clone(),
            amount: payment.amount.to_number().unwrap_or_default(),
            appointment_id: 4,
            payment_status: PaymentStatus::Pending,
        };
        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["amount"], json!(150.0));
        assert_eq!(body["payment_method"], json!("TARJETA"));
    }
}
