//! Load and save household snapshots as JSON

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::Snapshot;
use crate::error::Result;

/// Load and validate a snapshot from a JSON file
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
    let path = path.as_ref();
    log::debug!("Loading snapshot from {}", path.display());
    let file = File::open(path)?;
    load_snapshot_from_reader(BufReader::new(file))
}

/// Load and validate a snapshot from any reader (e.g., string buffer, stdin)
pub fn load_snapshot_from_reader<R: Read>(reader: R) -> Result<Snapshot> {
    let mut snapshot: Snapshot = serde_json::from_reader(reader)?;
    snapshot.normalize();
    snapshot.validate()?;

    log::info!(
        "Loaded snapshot: {} debts, {} income entries, {} payments",
        snapshot.debts.len(),
        snapshot.income.len(),
        snapshot.payments.len()
    );
    Ok(snapshot)
}

/// Write a snapshot as pretty-printed JSON
pub fn save_snapshot<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.flush()?;
    log::info!("Saved snapshot to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::projection::Strategy;

    const SNAPSHOT_JSON: &str = r#"{
        "debts": [
            { "id": 1, "name": "Card", "balance": 1200.0, "annual_rate": 0.2, "min_payment": 40.0 },
            { "id": 2, "name": "Car", "balance": 8000.0, "annual_rate": 0.06, "min_payment": 250.0,
              "original_balance": 12000.0 }
        ],
        "income": [
            { "id": 10, "date": "2025-01-20", "amount": 1000.0, "type": "commission",
              "splits": { "tithe": 10.0, "tax": 22.9, "debt": 30.0, "flexible": 37.1 },
              "tithe": 100.0, "tax": 229.0, "debt": 300.0, "flexible": 371.0 }
        ],
        "settings": { "strategy": "avalanche" }
    }"#;

    #[test]
    fn test_load_from_reader() {
        let snapshot = load_snapshot_from_reader(SNAPSHOT_JSON.as_bytes()).unwrap();

        assert_eq!(snapshot.debts.len(), 2);
        // Missing original balance falls back to the current balance
        assert_eq!(snapshot.debts[0].original_balance, 1200.0);
        assert_eq!(snapshot.debts[1].original_balance, 12000.0);
        assert_eq!(snapshot.income.len(), 1);
        assert!(!snapshot.income[0].override_debt_reduction);
        assert!(snapshot.payments.is_empty());
        assert_eq!(snapshot.settings.strategy, Strategy::Avalanche);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let err = load_snapshot_from_reader("{ \"debts\": [".as_bytes()).unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("payoff_snapshot_{}.json", std::process::id()));
        let mut snapshot = Snapshot::sample();
        snapshot.settings.strategy = Strategy::Avalanche;

        save_snapshot(&path, &snapshot).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.debts, snapshot.debts);
        assert_eq!(loaded.settings.strategy, Strategy::Avalanche);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_snapshot("does/not/exist.json").unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
