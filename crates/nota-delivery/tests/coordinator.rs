//! Transfer coordinator against a scripted remote.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use nota_delivery::{
    Candidates, Destination, ObjectStoreRemote, RemotePath, RemoteSession, RemoteStore,
    TransferCoordinator, TransferError, TransferSummary, object_path,
};
use nota_ledger::{DeliveryLedger, MemoryStore};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Connect,
    Mkdir(String),
    Put(String),
    Close,
}

/// Remote that records every call and can fail the nth upload.
#[derive(Clone, Default)]
struct ScriptedRemote {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_put: Option<usize>,
    refuse_connection: bool,
}

impl ScriptedRemote {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

struct ScriptedSession {
    remote: ScriptedRemote,
    puts: usize,
}

impl RemoteStore for ScriptedRemote {
    type Session = ScriptedSession;

    async fn connect(&self) -> Result<ScriptedSession, TransferError> {
        self.calls.lock().unwrap().push(Call::Connect);
        if self.refuse_connection {
            return Err(TransferError::Auth {
                user: "nota".into(),
                message: "denied".into(),
            });
        }
        Ok(ScriptedSession {
            remote: self.clone(),
            puts: 0,
        })
    }
}

impl RemoteSession for ScriptedSession {
    async fn create_dir_all(&mut self, dir: &RemotePath) -> Result<(), TransferError> {
        self.remote.calls.lock().unwrap().push(Call::Mkdir(dir.to_string()));
        Ok(())
    }

    async fn put(&mut self, local: &Path, remote: &RemotePath) -> Result<(), TransferError> {
        assert!(local.is_file(), "uploading missing file {}", local.display());
        self.puts += 1;
        if self.remote.fail_put == Some(self.puts) {
            return Err(TransferError::Transfer {
                file: remote.to_string(),
                message: "connection reset".into(),
            });
        }
        self.remote.calls.lock().unwrap().push(Call::Put(remote.to_string()));
        Ok(())
    }

    async fn close(self) -> Result<(), TransferError> {
        self.remote.calls.lock().unwrap().push(Call::Close);
        Ok(())
    }
}

fn destination() -> Destination {
    Destination {
        base: "/uploads".into(),
        client_id: "acme".into(),
        platform_id: "amazon".into(),
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

fn source_with(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in files {
        fs::write(dir.path().join(file), format!("<NFe>{file}</NFe>")).unwrap();
    }
    dir
}

#[tokio::test]
async fn skips_already_delivered_and_records_the_rest() {
    let source = source_with(&["a.xml", "b.xml", "c.xml"]);
    let store = MemoryStore::with_entries(["b.xml"]);
    let mut ledger = DeliveryLedger::open(&store).unwrap();
    let remote = ScriptedRemote::default();
    let coordinator = TransferCoordinator::new(remote.clone(), destination(), "xml");

    let summary = coordinator
        .deliver_on(date(), source.path(), Candidates::All, &mut ledger)
        .await
        .unwrap();

    assert_eq!(summary, TransferSummary { sent: 2, skipped: 1 });
    assert_eq!(
        store.snapshot().into_iter().collect::<Vec<_>>(),
        vec!["a.xml", "b.xml", "c.xml"]
    );
    assert_eq!(
        remote.calls(),
        vec![
            Call::Connect,
            Call::Mkdir("/uploads/acme/amazon/2024-03-05".into()),
            Call::Put("/uploads/acme/amazon/2024-03-05/a.xml".into()),
            Call::Put("/uploads/acme/amazon/2024-03-05/c.xml".into()),
            Call::Close,
        ]
    );
}

#[tokio::test]
async fn second_run_sends_nothing() {
    let source = source_with(&["a.xml", "b.xml"]);
    let store = MemoryStore::default();
    let coordinator = TransferCoordinator::new(ScriptedRemote::default(), destination(), "xml");

    let mut ledger = DeliveryLedger::open(&store).unwrap();
    coordinator
        .deliver_on(date(), source.path(), Candidates::All, &mut ledger)
        .await
        .unwrap();

    let mut reopened = DeliveryLedger::open(&store).unwrap();
    let summary = coordinator
        .deliver_on(date(), source.path(), Candidates::All, &mut reopened)
        .await
        .unwrap();
    assert_eq!(summary, TransferSummary { sent: 0, skipped: 2 });
}

#[tokio::test]
async fn failed_upload_aborts_keeps_earlier_entries_and_closes() {
    let source = source_with(&["a.xml", "b.xml", "c.xml"]);
    let store = MemoryStore::default();
    let mut ledger = DeliveryLedger::open(&store).unwrap();
    let remote = ScriptedRemote {
        fail_put: Some(2),
        ..ScriptedRemote::default()
    };
    let coordinator = TransferCoordinator::new(remote.clone(), destination(), "xml");

    let err = coordinator
        .deliver_on(date(), source.path(), Candidates::All, &mut ledger)
        .await
        .unwrap_err();

    assert!(matches!(err, TransferError::Transfer { ref file, .. } if file.ends_with("b.xml")));
    assert_eq!(store.snapshot().into_iter().collect::<Vec<_>>(), vec!["a.xml"]);
    assert_eq!(remote.calls().last(), Some(&Call::Close));
    assert!(!remote.calls().contains(&Call::Put(
        "/uploads/acme/amazon/2024-03-05/c.xml".into()
    )));
}

#[tokio::test]
async fn connection_failure_is_fatal_and_records_nothing() {
    let source = source_with(&["a.xml"]);
    let store = MemoryStore::default();
    let mut ledger = DeliveryLedger::open(&store).unwrap();
    let remote = ScriptedRemote {
        refuse_connection: true,
        ..ScriptedRemote::default()
    };
    let coordinator = TransferCoordinator::new(remote.clone(), destination(), "xml");

    let err = coordinator
        .deliver_on(date(), source.path(), Candidates::All, &mut ledger)
        .await
        .unwrap_err();

    assert!(matches!(err, TransferError::Auth { .. }));
    assert!(store.snapshot().is_empty());
    assert_eq!(remote.calls(), vec![Call::Connect]);
}

#[tokio::test]
async fn only_listed_documents_with_the_extension_are_sent() {
    let source = source_with(&["a.xml", "b.xml", "c.xml", "d.pdf"]);
    let store = MemoryStore::default();
    let mut ledger = DeliveryLedger::open(&store).unwrap();
    let remote = ScriptedRemote::default();
    let coordinator = TransferCoordinator::new(remote.clone(), destination(), "xml");

    let summary = coordinator
        .deliver_on(
            date(),
            source.path(),
            Candidates::Only(vec!["c.xml".into(), "a.xml".into(), "d.pdf".into()]),
            &mut ledger,
        )
        .await
        .unwrap();

    assert_eq!(summary, TransferSummary { sent: 2, skipped: 0 });
    let puts: Vec<_> = remote
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Put(_)))
        .collect();
    assert_eq!(
        puts,
        vec![
            Call::Put("/uploads/acme/amazon/2024-03-05/c.xml".into()),
            Call::Put("/uploads/acme/amazon/2024-03-05/a.xml".into()),
        ]
    );
}

#[tokio::test]
async fn delivers_into_object_store_layout() {
    let source = source_with(&["a.xml", "b.xml"]);
    let store = MemoryStore::default();
    let mut ledger = DeliveryLedger::open(&store).unwrap();
    let remote = ObjectStoreRemote::in_memory();
    let coordinator = TransferCoordinator::new(remote.clone(), destination(), "xml");

    coordinator
        .deliver_on(date(), source.path(), Candidates::All, &mut ledger)
        .await
        .unwrap();

    let key = object_path(&RemotePath::new("/uploads/acme/amazon/2024-03-05/b.xml"));
    let body = remote.store().get(&key).await.unwrap().bytes().await.unwrap();
    assert_eq!(body.as_ref(), b"<NFe>b.xml</NFe>");
}
