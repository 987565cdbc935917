//! Immutable base tables and the borrowed views derived from them.
//!
//! Both datasets are loaded once at startup into a [`DataRepository`] that
//! is handed to every component by reference. Nothing writes back into a
//! [`TransactionTable`]; filters produce [`TableView`]s over its rows.

use crate::config::DataConfig;
use crate::error::DataError;
use crate::types::transaction::{TransactionRecord, COLUMN_COUNT};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// A named, immutable transaction dataset.
#[derive(Debug, Clone)]
pub struct TransactionTable {
    name: String,
    records: Vec<TransactionRecord>,
}

impl TransactionTable {
    pub fn new(name: &str, records: Vec<TransactionRecord>) -> Self {
        Self {
            name: name.to_string(),
            records,
        }
    }

    /// Load a table from a CSV file with a header row.
    pub fn from_path<P: AsRef<Path>>(name: &str, path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NotFound(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::from_reader(name, BufReader::new(file))?;
        info!(
            table = %name,
            path = %path.display(),
            rows = table.len(),
            "Dataset loaded"
        );
        Ok(table)
    }

    /// Parse a table from any CSV source with a header row.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let header_width = csv_reader
            .headers()
            .map_err(|e| record_error(name, 1, e))?
            .len();
        if header_width != COLUMN_COUNT {
            return Err(DataError::Schema {
                table: name.to_string(),
                expected: COLUMN_COUNT,
                found: header_width,
            });
        }

        let mut records = Vec::new();
        let mut row = StringRecord::new();
        loop {
            let line = csv_reader.position().line();
            match csv_reader.read_record(&mut row) {
                Ok(false) => break,
                Ok(true) => {}
                Err(e) => return Err(record_error(name, line, e)),
            }

            let line = row.position().map(|p| p.line()).unwrap_or(line);
            if row.len() != COLUMN_COUNT {
                return Err(DataError::Record {
                    table: name.to_string(),
                    line,
                    reason: format!("expected {} fields, found {}", COLUMN_COUNT, row.len()),
                });
            }

            // Positional: the header repeats "Account".
            let record: TransactionRecord = row
                .deserialize(None)
                .map_err(|e| record_error(name, line, e))?;
            records.push(record);
        }

        debug!(table = %name, rows = records.len(), "Parsed transaction records");
        Ok(Self::new(name, records))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// View over every row.
    pub fn view(&self) -> TableView<'_> {
        TableView {
            name: &self.name,
            rows: self.records.iter().collect(),
        }
    }

    /// Sorted distinct values of one string column.
    pub fn distinct<F>(&self, column: F) -> Vec<String>
    where
        F: Fn(&TransactionRecord) -> &str,
    {
        self.records
            .iter()
            .map(|r| column(r))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

fn record_error(table: &str, line: u64, err: csv::Error) -> DataError {
    DataError::Record {
        table: table.to_string(),
        line,
        reason: err.to_string(),
    }
}

/// Ordered subset of a table's rows.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    name: &'a str,
    rows: Vec<&'a TransactionRecord>,
}

impl<'a> TableView<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TransactionRecord> + '_ {
        self.rows.iter().copied()
    }

    /// Rows satisfying `predicate`, order preserved.
    pub fn filter<P>(&self, predicate: P) -> TableView<'a>
    where
        P: Fn(&TransactionRecord) -> bool,
    {
        TableView {
            name: self.name,
            rows: self.rows.iter().copied().filter(|r| predicate(r)).collect(),
        }
    }

    /// Rows labelled as laundering.
    pub fn laundering_only(&self) -> TableView<'a> {
        self.filter(|r| r.is_laundering)
    }
}

/// The two base tables, loaded once for the process lifetime.
#[derive(Debug, Clone)]
pub struct DataRepository {
    li_small: TransactionTable,
    hi_small: TransactionTable,
}

impl DataRepository {
    pub fn new(li_small: TransactionTable, hi_small: TransactionTable) -> Self {
        Self { li_small, hi_small }
    }

    /// Load both datasets named in the configuration.
    pub fn load(config: &DataConfig) -> Result<Self, DataError> {
        let li_small = TransactionTable::from_path("li_small", &config.li_small_path)?;
        let hi_small = TransactionTable::from_path("hi_small", &config.hi_small_path)?;
        Ok(Self::new(li_small, hi_small))
    }

    /// Low illicit-ratio table; also the reference for encoders and
    /// currency options.
    pub fn li_small(&self) -> &TransactionTable {
        &self.li_small
    }

    pub fn hi_small(&self) -> &TransactionTable {
        &self.hi_small
    }

    pub fn tables(&self) -> [&TransactionTable; 2] {
        [&self.li_small, &self.hi_small]
    }

    /// Payment currencies offered by the analytics filter.
    pub fn currency_options(&self) -> Vec<String> {
        self.li_small.distinct(|r| r.payment_currency.as_str())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub const HEADER: &str = "Timestamp,From Bank,Account,To Bank,Account,Amount Received,\
Receiving Currency,Amount Paid,Payment Currency,Payment Format,Is Laundering";

    pub const LI_ROWS: &str = "\
2022/09/01 00:20,010,8000EBD30,010,8000EBD30,3697.34,US Dollar,3697.34,US Dollar,Reinvestment,0
2022/09/01 00:20,03208,8000F4580,001,8000F5340,0.01,US Dollar,0.01,US Dollar,Cheque,0
2022/09/01 00:00,03209,8000F4670,03209,8000F4670,14675.57,US Dollar,14675.57,US Dollar,Reinvestment,0
2022/09/01 00:02,012,8000F5030,012,8000F5030,2806.97,Euro,2806.97,Euro,Reinvestment,0
2022/09/01 00:06,010,8000F5200,010,8000F5200,36682.97,Yuan,36682.97,Yuan,Reinvestment,0
2022/09/01 00:03,1120,8000F5AD0,1120,8000F5AD0,6162.44,US Dollar,6162.44,US Dollar,Reinvestment,0
2022/09/01 00:08,1124,800059120,1124,800059120,11.04,Euro,11.04,Euro,Credit Card,0
2022/09/02 00:21,1467,80006A120,1467,80006A120,246.87,US Dollar,246.87,US Dollar,Credit Card,0
2022/09/01 10:05,070,100428660,001,8000EC280,2124.09,Euro,2124.09,Euro,ACH,1
2022/09/02 14:18,001120,8000EC1E0,002563,8001C2B10,897.37,US Dollar,897.37,US Dollar,ACH,1
2022/09/05 19:31,0134266,80E8F6D80,0024750,81B1C8840,10.49,Yuan,0.09,UK Pound,Wire,1
2022/09/05 20:01,0216,8003C8B40,0216,8003C8B40,500.00,US Dollar,500.00,US Dollar,Cash,1
";

    pub const HI_ROWS: &str = "\
2022/09/01 00:15,020,800104D70,020,800104D70,6794.63,US Dollar,6794.63,US Dollar,Reinvestment,0
2022/09/01 00:16,3196,800107150,3196,800107150,7739.29,US Dollar,7739.29,US Dollar,Reinvestment,0
2022/09/01 00:26,0224,8000A94C0,0224,8000A94C0,38.72,Saudi Riyal,38.72,Saudi Riyal,Reinvestment,0
2022/09/01 02:22,0118,8000ED4E0,0118,8000ED4E0,8.27,Euro,8.27,Euro,Cash,0
2022/09/01 00:04,0038,8000F0590,0038,8000F0590,7.66,Euro,7.66,Euro,Cash,1
2022/09/03 11:23,011,801C0A600,0224,80A7B0C50,4493.85,Saudi Riyal,4493.85,Saudi Riyal,ACH,1
2022/09/03 11:55,001,8000F1C00,0148,8017DA030,80.73,US Dollar,80.73,US Dollar,ACH,1
";

    pub fn csv(rows: &str) -> String {
        format!("{}\n{}", HEADER, rows)
    }

    pub fn li_small() -> TransactionTable {
        TransactionTable::from_reader("li_small", csv(LI_ROWS).as_bytes()).unwrap()
    }

    pub fn hi_small() -> TransactionTable {
        TransactionTable::from_reader("hi_small", csv(HI_ROWS).as_bytes()).unwrap()
    }

    pub fn repository() -> DataRepository {
        DataRepository::new(li_small(), hi_small())
    }
}
