use csv::StringRecord;
use crate::csv_reader::LoadError;

/// Header names of the online banking export and the field each one is loaded into.
pub(crate) const COLUMN_MAPPING: [(&str, &str); 19] = [
    ("Bezeichnung Auftragskonto", "account_name"),
    ("IBAN Auftragskonto", "iban_account"),
    ("BIC Auftragskonto", "bic_account"),
    ("Bankname Auftragskonto", "bank_name_account"),
    ("Buchungstag", "booking_date"),
    ("Valutadatum", "value_date"),
    ("Name Zahlungsbeteiligter", "payer_name"),
    ("IBAN Zahlungsbeteiligter", "payer_iban"),
    ("BIC (SWIFT-Code) Zahlungsbeteiligter", "payer_bic"),
    ("Buchungstext", "booking_text"),
    ("Verwendungszweck", "purpose"),
    ("Betrag", "amount"),
    ("Waehrung", "currency"),
    ("Saldo nach Buchung", "balance_after_booking"),
    ("Bemerkung", "remark"),
    ("Kategorie", "category"),
    ("Steuerrelevant", "tax_relevant"),
    ("Glaeubiger ID", "creditor_id"),
    ("Mandatsreferenz", "mandate_reference"),
];

/// Fields a ledger cannot be processed without
const REQUIRED_FIELDS: [&str; 3] = ["booking_date", "amount", "balance_after_booking"];

/// Look up the normalized field name of an export header
pub(crate) fn normalized_name(header: &str) -> Option<&'static str> {
    COLUMN_MAPPING.iter()
        .find(|(source, _)| *source == header)
        .map(|(_, target)| *target)
}

/// Column positions of a parsed header row.
/// The column number uses 0-based index.
pub(crate) struct ColumnInfo {
    /// Normalized field name and the column it is read from
    mapped: Vec<(&'static str, usize)>,
    /// Headers outside the rename table, in file order
    pub(crate) extra: Vec<(usize, String)>,
}

impl ColumnInfo {
    pub(crate) fn from_headers(headers: &StringRecord) -> Result<ColumnInfo, LoadError> {
        let mut mapped = vec![];
        let mut extra = vec![];

        for (i, header) in headers.iter().enumerate() {
            let header = clean_header(header);
            match normalized_name(header) {
                Some(field) => mapped.push((field, i)),
                None => extra.push((i, header.to_string())),
            }
        }

        for field in REQUIRED_FIELDS {
            if !mapped.iter().any(|(f, _)| *f == field) {
                let source = COLUMN_MAPPING.iter()
                    .find(|(_, target)| *target == field)
                    .map(|(source, _)| *source)
                    .unwrap_or(field);
                return Err(LoadError::MissingColumn(source.to_string()));
            }
        }

        Ok(ColumnInfo { mapped, extra })
    }

    pub(crate) fn index_of(&self, field: &str) -> Option<usize> {
        self.mapped.iter()
            .find(|(f, _)| *f == field)
            .map(|(_, i)| *i)
    }

    /// Value of a normalized field in a row, empty when the export has no such column
    pub(crate) fn get<'r>(&self, row: &'r StringRecord, field: &str) -> &'r str {
        self.index_of(field)
            .and_then(|i| row.get(i))
            .unwrap_or("")
    }

    /// Normalized names for mapped columns and original names for the rest, in file order
    pub(crate) fn column_names(&self) -> Vec<String> {
        let mut columns: Vec<(usize, String)> = self.mapped.iter()
            .map(|(field, i)| (*i, field.to_string()))
            .chain(self.extra.iter().cloned())
            .collect();
        columns.sort_by_key(|(i, _)| *i);
        columns.into_iter().map(|(_, name)| name).collect()
    }
}

fn clean_header(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}
