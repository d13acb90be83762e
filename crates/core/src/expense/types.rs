//! Domain records for a group's shared costs.

use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use divvy_shared::types::{CurrencyCode, ExpenseId, GroupId, ParticipantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reserved tag marking a record as an already-completed payment.
pub const PAYMENT_TAG: &str = "Payment";

/// A member of a group.
///
/// Identity is by `id` only; two values with the same id compare equal even
/// if their display details differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Bank account for receiving transfers.
    #[serde(default)]
    pub iban: Option<String>,
    /// Bank identifier code belonging to `iban`.
    #[serde(default)]
    pub bic: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
}

impl Participant {
    /// Creates a participant with a fresh id and no contact details.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(ParticipantId::new(), name)
    }

    /// Creates a participant with a known id.
    #[must_use]
    pub fn with_id(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            iban: None,
            bic: None,
            email: None,
        }
    }

    /// Sets bank transfer details.
    #[must_use]
    pub fn with_bank_details(mut self, iban: impl Into<String>, bic: impl Into<String>) -> Self {
        self.iban = Some(iban.into());
        self.bic = Some(bic.into());
        self
    }

    /// Sets the contact email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Participant {}

impl Hash for Participant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Category of an expense.
///
/// Only the `Payment` sentinel has meaning to the engine; every other tag is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExpenseTag {
    /// Money already moved from sponsor to the single debtor.
    Payment,
    /// Ordinary spend category such as "Food".
    Category(String),
}

impl ExpenseTag {
    /// Creates a category tag. The reserved name yields `Payment`.
    #[must_use]
    pub fn category(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }
}

impl From<String> for ExpenseTag {
    fn from(value: String) -> Self {
        if value == PAYMENT_TAG {
            Self::Payment
        } else {
            Self::Category(value)
        }
    }
}

impl From<ExpenseTag> for String {
    fn from(value: ExpenseTag) -> Self {
        match value {
            ExpenseTag::Payment => PAYMENT_TAG.to_string(),
            ExpenseTag::Category(name) => name,
        }
    }
}

impl std::fmt::Display for ExpenseTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payment => f.write_str(PAYMENT_TAG),
            Self::Category(name) => f.write_str(name),
        }
    }
}

/// A shared cost fronted by one sponsor and split evenly across its debtors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier.
    pub id: ExpenseId,
    /// Amount in `currency`. Never negative for valid records.
    pub amount: Decimal,
    /// Currency the amount was paid in.
    pub currency: CurrencyCode,
    /// Calendar date used for the exchange rate lookup.
    pub date: NaiveDate,
    /// Participant who paid.
    pub sponsor: ParticipantId,
    /// Participants who benefited. The sponsor may or may not be one of them.
    pub debtors: Vec<ParticipantId>,
    /// Category, or the `Payment` sentinel.
    pub tag: ExpenseTag,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Expense {
    /// Creates an expense with a fresh id.
    #[must_use]
    pub fn new(
        amount: Decimal,
        currency: CurrencyCode,
        date: NaiveDate,
        sponsor: ParticipantId,
        debtors: impl IntoIterator<Item = ParticipantId>,
        tag: ExpenseTag,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            amount,
            currency,
            date,
            sponsor,
            debtors: debtors.into_iter().collect(),
            tag,
            description: None,
        }
    }

    /// Records a completed payment of `amount` from `from` to `to`.
    #[must_use]
    pub fn payment(
        from: ParticipantId,
        to: ParticipantId,
        amount: Decimal,
        currency: CurrencyCode,
        date: NaiveDate,
    ) -> Self {
        Self::new(amount, currency, date, from, [to], ExpenseTag::Payment)
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true for Payment-tagged records.
    #[must_use]
    pub fn is_payment(&self) -> bool {
        self.tag == ExpenseTag::Payment
    }

    /// Share owed by each debtor, in the expense currency.
    ///
    /// An empty debtor list yields the full amount; validation rejects such
    /// expenses before they reach aggregation.
    #[must_use]
    pub fn share_per_debtor(&self) -> Decimal {
        let count = self.debtors.len().max(1);
        self.amount / Decimal::from(count)
    }
}

/// Recommended payment that moves a group towards zero balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Participant paying.
    pub from: ParticipantId,
    /// Participant receiving.
    pub to: ParticipantId,
    /// Positive amount in the reference currency of the run.
    pub amount: Decimal,
}

impl Transfer {
    /// Converts the recommendation into the payment record that settles it.
    #[must_use]
    pub fn into_payment(self, currency: CurrencyCode, date: NaiveDate) -> Expense {
        Expense::payment(self.from, self.to, self.amount, currency, date)
    }
}

/// One consistent fetch of a group's participants and expenses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSnapshot {
    /// The group the records belong to.
    pub group_id: GroupId,
    /// Full roster, including participants without expenses.
    pub participants: Vec<Participant>,
    /// Expenses and payments.
    pub expenses: Vec<Expense>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_participant_identity_is_by_id() {
        let id = ParticipantId::new();
        let plain = Participant::with_id(id, "Ana");
        let detailed = Participant::with_id(id, "Ana B.")
            .with_bank_details("DE89370400440532013000", "COBADEFFXXX")
            .with_email("ana@example.com");
        assert_eq!(plain, detailed);
        assert_ne!(plain, Participant::new("Ana"));
    }

    #[test]
    fn test_payment_tag_round_trip() {
        assert_eq!(ExpenseTag::category("Payment"), ExpenseTag::Payment);
        assert_eq!(
            ExpenseTag::category("Food"),
            ExpenseTag::Category("Food".to_string())
        );
        assert_eq!(String::from(ExpenseTag::Payment), "Payment");
        assert_eq!(ExpenseTag::category("payment").to_string(), "payment");
    }

    #[test]
    fn test_share_per_debtor() {
        let a = ParticipantId::new();
        let b = ParticipantId::new();
        let expense = Expense::new(
            dec!(30),
            CurrencyCode::unchecked("USD"),
            date(),
            a,
            [a, b, ParticipantId::new()],
            ExpenseTag::category("Food"),
        );
        assert_eq!(expense.share_per_debtor(), dec!(10));
    }

    #[test]
    fn test_share_without_debtors_is_full_amount() {
        let expense = Expense::new(
            dec!(42),
            CurrencyCode::unchecked("USD"),
            date(),
            ParticipantId::new(),
            [],
            ExpenseTag::category("Food"),
        );
        assert_eq!(expense.share_per_debtor(), dec!(42));
    }

    #[test]
    fn test_transfer_into_payment() {
        let transfer = Transfer {
            from: ParticipantId::new(),
            to: ParticipantId::new(),
            amount: dec!(17.5),
        };
        let payment = transfer
            .clone()
            .into_payment(CurrencyCode::unchecked("USD"), date());
        assert!(payment.is_payment());
        assert_eq!(payment.sponsor, transfer.from);
        assert_eq!(payment.debtors, vec![transfer.to]);
        assert_eq!(payment.amount, dec!(17.5));
    }

    #[test]
    fn test_expense_deserializes_from_source_json() {
        let json = r#"{
            "id": "0190a5b2-0000-7000-8000-000000000001",
            "amount": "12.50",
            "currency": "eur",
            "date": "2024-06-01",
            "sponsor": "0190a5b2-0000-7000-8000-0000000000a1",
            "debtors": ["0190a5b2-0000-7000-8000-0000000000b1"],
            "tag": "Payment"
        }"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert!(expense.is_payment());
        assert_eq!(expense.amount, dec!(12.50));
        assert_eq!(expense.currency.as_str(), "EUR");
        assert_eq!(expense.description, None);
    }
}
