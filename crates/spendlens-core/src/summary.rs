//! Spending totals over extracted and classified transactions.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::transaction::{Category, ClassifiedTransaction, ParsedTransaction, SpendType};

/// Totals of classified transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: Decimal,
    pub count: usize,
    pub by_category: BTreeMap<Category, Decimal>,
    pub by_type: BTreeMap<SpendType, Decimal>,
    /// Keyed by `YYYY-MM`.
    pub by_month: BTreeMap<String, Decimal>,
}

impl Summary {
    pub fn from_transactions(transactions: &[ClassifiedTransaction]) -> Self {
        let mut summary = Self::default();

        for t in transactions {
            summary.total += t.amount;
            summary.count += 1;
            *summary.by_category.entry(t.category).or_default() += t.amount;
            *summary.by_type.entry(t.kind).or_default() += t.amount;
            *summary
                .by_month
                .entry(t.date.format("%Y-%m").to_string())
                .or_default() += t.amount;
        }

        summary
    }

    /// Category with the largest total, ties broken by category order.
    pub fn top_category(&self) -> Option<(Category, Decimal)> {
        self.by_category
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(c, v)| (*c, *v))
    }
}

/// Money out versus money in, from descriptions alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowSummary {
    pub paid: Decimal,
    pub received: Decimal,
    pub other: Decimal,
    pub count: usize,
}

impl FlowSummary {
    /// Split by description prefix, e.g. "Paid to" and "Received from".
    pub fn from_parsed(transactions: &[ParsedTransaction], outgoing: &str, incoming: &str) -> Self {
        let mut flow = Self::default();

        for t in transactions {
            flow.count += 1;
            if t.description.starts_with(outgoing) {
                flow.paid += t.amount;
            } else if t.description.starts_with(incoming) {
                flow.received += t.amount;
            } else {
                flow.other += t.amount;
            }
        }

        flow
    }

    /// Received minus paid; unlabelled amounts are left out.
    pub fn net(&self) -> Decimal {
        self.received - self.paid
    }
}
