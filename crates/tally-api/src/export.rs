//! CSV rendering of the transaction set.

use tally_core::transaction::Transaction;

/// Column order of the export.
pub const CSV_HEADER: [&str; 8] = [
  "id",
  "title",
  "kind",
  "category",
  "amount",
  "date",
  "is_recurring",
  "frequency",
];

/// Render `transactions` as CSV with a header row. A missing frequency is an
/// empty field.
pub fn transactions_csv(transactions: &[Transaction]) -> Result<Vec<u8>, csv::Error> {
  let mut wtr = csv::Writer::from_writer(Vec::new());
  wtr.write_record(CSV_HEADER)?;

  for t in transactions {
    wtr.write_record([
      t.transaction_id.to_string(),
      t.title.clone(),
      t.kind.as_str().to_owned(),
      t.category.clone(),
      t.amount.to_string(),
      t.date.to_rfc3339(),
      t.is_recurring.to_string(),
      t.frequency.as_ref().map(|f| f.to_string()).unwrap_or_default(),
    ])?;
  }

  wtr.into_inner().map_err(|e| e.into_error().into())
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use rust_decimal::Decimal;
  use tally_core::transaction::{Frequency, TransactionKind};
  use uuid::Uuid;

  use super::*;

  #[test]
  fn header_and_quoting() {
    let id = Uuid::new_v4();
    let txns = vec![Transaction {
      transaction_id: id,
      title:          "Dinner, with friends".into(),
      amount:         Decimal::new(4550, 2),
      kind:           TransactionKind::Expense,
      category:       "Food".into(),
      date:           Utc.with_ymd_and_hms(2024, 2, 14, 19, 30, 0).unwrap(),
      is_recurring:   true,
      frequency:      Some(Frequency::Monthly),
    }];

    let out = String::from_utf8(transactions_csv(&txns).unwrap()).unwrap();
    let mut lines = out.lines();
    assert_eq!(
      lines.next(),
      Some("id,title,kind,category,amount,date,is_recurring,frequency")
    );
    assert_eq!(
      lines.next().unwrap(),
      format!(
        "{id},\"Dinner, with friends\",expense,Food,45.50,2024-02-14T19:30:00+00:00,true,monthly"
      )
    );
    assert_eq!(lines.next(), None);
  }

  #[test]
  fn empty_set_is_header_only() {
    let out = String::from_utf8(transactions_csv(&[]).unwrap()).unwrap();
    assert_eq!(out, "id,title,kind,category,amount,date,is_recurring,frequency\n");
  }
}
