//! CSV export of risk tables.

use std::io::Write;

use alm_cashflows::CashflowRow;

use crate::error::{RiskError, RiskResult};

/// A table with named columns.
///
/// Implementors only describe their headers and records; CSV writing is
/// provided.
pub trait Tabular {
    /// Column names.
    fn headers(&self) -> Vec<String>;

    /// Rows, each with one field per header.
    fn records(&self) -> Vec<Vec<String>>;

    /// Writes the table as CSV with a header line.
    fn write_csv<W: Write>(&self, writer: W) -> RiskResult<()>
    where
        Self: Sized,
    {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.headers())?;
        for record in self.records() {
            wtr.write_record(record)?;
        }
        wtr.flush().map_err(|e| RiskError::export(e.to_string()))?;
        Ok(())
    }

    /// Renders the table as a CSV string.
    fn to_csv_string(&self) -> RiskResult<String>
    where
        Self: Sized,
    {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| RiskError::export(e.to_string()))
    }
}

impl Tabular for Vec<CashflowRow> {
    fn headers(&self) -> Vec<String> {
        ["id", "account", "date", "cashflow", "interest", "capital", "remaining"]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.account.clone(),
                    r.date.to_string(),
                    r.cashflow.to_string(),
                    r.interest.to_string(),
                    r.capital.to_string(),
                    r.remaining.to_string(),
                ]
            })
            .collect()
    }
}
