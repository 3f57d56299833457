//! Rate-sheet import.
//!
//! The sheet carries one row per (region, role) with one base-rate
//! column per seniority tier, e.g.:
//!
//! ```csv
//! Region,Role,Intermediate (AED),Advanced (AED),Expert (AED)
//! Middle East,Backend Developer,9500,11875,15200
//! ```
//!
//! Each priced cell becomes one rate entry with the cell value as that
//! tier's base rate (multiplier 1.0, since the sheet already prices
//! seniority) and a regional multiplier derived from the region name.
//! Rows are upserted, so re-importing a corrected sheet is safe and the
//! (role, region, seniority) key stays unique.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use ratecard_core::domain::rate::{RateEntry, Seniority};
use ratecard_core::config::{AppConfig, LoadOptions};
use ratecard_db::repositories::{RateRepository, SqlRateRepository};
use ratecard_db::{connect_with_settings, migrations};

use crate::commands::CommandResult;

#[derive(Debug, PartialEq, Eq)]
struct SheetColumns {
    region: usize,
    role: usize,
    seniority: Vec<(Seniority, usize)>,
}

#[derive(Debug)]
struct ParsedSheet {
    entries: Vec<RateEntry>,
    rows_read: usize,
    cells_skipped: usize,
}

pub fn run(file: &Path) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "import",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let reader = match std::fs::File::open(file) {
        Ok(reader) => reader,
        Err(error) => {
            return CommandResult::failure(
                "import",
                "file_not_found",
                format!("could not open `{}`: {error}", file.display()),
                2,
            );
        }
    };

    let sheet = match parse_rate_sheet(reader) {
        Ok(sheet) => sheet,
        Err(error) => {
            return CommandResult::failure("import", "invalid_sheet", error, 4);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "import",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let entry_count = sheet.entries.len();
    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let repository = SqlRateRepository::new(pool.clone());
        for entry in sheet.entries {
            repository
                .upsert_rate(entry)
                .await
                .map_err(|error| ("import_execution", error.to_string(), 5u8))?;
        }

        pool.close().await;
        Ok::<(), (&'static str, String, u8)>(())
    });

    match result {
        Ok(()) => CommandResult::success(
            "import",
            format!(
                "imported {} rate entries from {} rows ({} cells skipped)",
                entry_count, sheet.rows_read, sheet.cells_skipped
            ),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("import", error_class, message, exit_code)
        }
    }
}

fn parse_rate_sheet(reader: impl Read) -> Result<ParsedSheet, String> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|error| format!("could not read headers: {error}"))?
        .clone();
    let columns = locate_columns(&headers)?;

    let mut entries = Vec::new();
    let mut rows_read = 0usize;
    let mut cells_skipped = 0usize;

    for record in csv_reader.records() {
        let record = record.map_err(|error| format!("could not read row: {error}"))?;
        let region = record.get(columns.region).unwrap_or_default();
        let role = record.get(columns.role).unwrap_or_default();
        if region.is_empty() || role.is_empty() {
            continue;
        }
        rows_read += 1;

        for (seniority, index) in &columns.seniority {
            let raw = record.get(*index).unwrap_or_default();
            let base_rate = raw.replace(',', "");
            match Decimal::from_str(&base_rate) {
                Ok(base_rate) if base_rate.is_sign_positive() && !base_rate.is_zero() => {
                    entries.push(RateEntry {
                        role: role.to_string(),
                        region: region.to_string(),
                        seniority: *seniority,
                        base_rate,
                        regional_multiplier: region_multiplier(region),
                        // the sheet prices each tier explicitly
                        seniority_multiplier: Decimal::ONE,
                    });
                }
                _ => cells_skipped += 1,
            }
        }
    }

    Ok(ParsedSheet { entries, rows_read, cells_skipped })
}

fn locate_columns(headers: &csv::StringRecord) -> Result<SheetColumns, String> {
    let mut region = None;
    let mut role = None;
    let mut seniority = Vec::new();

    for (index, header) in headers.iter().enumerate() {
        let header = header.to_ascii_lowercase();
        if header.contains("region") {
            region = Some(index);
        } else if header.contains("role") {
            role = Some(index);
        } else if header.contains("intermediate") {
            seniority.push((Seniority::Intermediate, index));
        } else if header.contains("advanced") {
            seniority.push((Seniority::Advanced, index));
        } else if header.contains("expert") {
            seniority.push((Seniority::Expert, index));
        }
    }

    let region = region.ok_or_else(|| "Region column not found in sheet".to_string())?;
    let role = role.ok_or_else(|| "Role column not found in sheet".to_string())?;
    if seniority.is_empty() {
        return Err("no seniority-level columns found in sheet".to_string());
    }

    Ok(SheetColumns { region, role, seniority })
}

fn region_multiplier(region: &str) -> Decimal {
    let region = region.to_ascii_lowercase();

    if region.contains("south east asia") {
        return Decimal::ONE;
    }
    if region.contains("middle east") || region.contains("uae") {
        return Decimal::new(12, 1);
    }
    if region.contains("europe") || region.contains("uk") {
        return Decimal::new(15, 1);
    }
    if region.contains("us") || region.contains("north america") {
        return Decimal::new(18, 1);
    }

    Decimal::ONE
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use ratecard_core::domain::rate::Seniority;

    use super::{parse_rate_sheet, region_multiplier};

    const SHEET: &str = "\
Region,Role,Intermediate (AED),Advanced (AED),Expert (AED)
Middle East,Backend Developer,9500,11875,15200
Europe,Backend Developer,\"12,350\",15437,n/a
,Frontend Developer,9000,11250,14400
";

    #[test]
    fn parses_one_entry_per_priced_cell() {
        let sheet = parse_rate_sheet(SHEET.as_bytes()).expect("parse");

        // blank-region row skipped; "n/a" cell skipped
        assert_eq!(sheet.rows_read, 2);
        assert_eq!(sheet.entries.len(), 5);
        assert_eq!(sheet.cells_skipped, 1);

        let expert = sheet
            .entries
            .iter()
            .find(|entry| entry.seniority == Seniority::Expert)
            .expect("expert entry");
        assert_eq!(expert.base_rate, Decimal::new(15_200, 0));
        assert_eq!(expert.region, "Middle East");
        assert_eq!(expert.seniority_multiplier, Decimal::ONE);
    }

    #[test]
    fn strips_thousands_separators_from_cells() {
        let sheet = parse_rate_sheet(SHEET.as_bytes()).expect("parse");
        let grouped = sheet
            .entries
            .iter()
            .find(|entry| entry.region == "Europe" && entry.seniority == Seniority::Intermediate)
            .expect("grouped cell entry");
        assert_eq!(grouped.base_rate, Decimal::new(12_350, 0));
    }

    #[test]
    fn derives_the_regional_multiplier_from_the_name() {
        assert_eq!(region_multiplier("Middle East"), Decimal::new(12, 1));
        assert_eq!(region_multiplier("UAE / Middle East"), Decimal::new(12, 1));
        assert_eq!(region_multiplier("Europe"), Decimal::new(15, 1));
        assert_eq!(region_multiplier("North America"), Decimal::new(18, 1));
        assert_eq!(region_multiplier("South East Asia"), Decimal::ONE);
        assert_eq!(region_multiplier("Antarctica"), Decimal::ONE);
    }

    #[test]
    fn missing_key_columns_fail_the_import() {
        let error = parse_rate_sheet("Country,Position\nUAE,Dev\n".as_bytes())
            .expect_err("no role/region columns");
        assert!(error.contains("Region column"));

        let error = parse_rate_sheet("Region,Role\nUAE,Dev\n".as_bytes())
            .expect_err("no seniority columns");
        assert!(error.contains("seniority-level"));
    }
}
