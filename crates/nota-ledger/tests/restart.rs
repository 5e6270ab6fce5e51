//! Ledger state carried across process restarts through the JSON file.

use nota_ledger::{DeliveryLedger, JsonFileStore};
use pretty_assertions::assert_eq;

#[test]
fn deliveries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("sent-files.json");

    {
        let mut ledger = DeliveryLedger::open(JsonFileStore::new(&path)).unwrap();
        ledger.mark_delivered("35240001.xml").unwrap();
        ledger.mark_delivered("35240002.xml").unwrap();
    }

    let reopened = DeliveryLedger::open(JsonFileStore::new(&path)).unwrap();
    assert!(reopened.was_delivered("35240001.xml"));
    assert!(reopened.was_delivered("35240002.xml"));
    assert!(!reopened.was_delivered("35240003.xml"));
    assert_eq!(reopened.len(), 2);
}

#[test]
fn duplicate_mark_writes_single_entry_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sent-files.json");

    let mut ledger = DeliveryLedger::open(JsonFileStore::new(&path)).unwrap();
    ledger.mark_delivered("a.xml").unwrap();
    ledger.mark_delivered("a.xml").unwrap();

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, serde_json::json!({ "sent": ["a.xml"] }));
}

#[test]
fn reads_ledger_written_by_earlier_deployments() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sent-files.json");
    std::fs::write(
        &path,
        "{\n  \"sent\": [\n    \"z.xml\",\n    \"a.xml\"\n  ]\n}",
    )
    .unwrap();

    let mut ledger = DeliveryLedger::open(JsonFileStore::new(&path)).unwrap();
    assert!(ledger.was_delivered("z.xml"));
    assert!(!ledger.mark_delivered("z.xml").unwrap());
    assert!(ledger.mark_delivered("m.xml").unwrap());
    assert_eq!(ledger.entries().collect::<Vec<_>>(), vec!["a.xml", "m.xml", "z.xml"]);
}
