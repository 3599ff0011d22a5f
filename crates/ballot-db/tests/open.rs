//! Integration test: several handles opening the same new database file at
//! once must all succeed and leave exactly one schema version behind.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;

use uuid::Uuid;

use ballot_db::{Database, Store};

const THREADS: usize = 4;
const ROUNDS: usize = 10;

fn remove_db_files(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

fn open_concurrently(path: &Path) -> Vec<anyhow::Result<Database>> {
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = barrier.clone();
            let path: PathBuf = path.to_path_buf();
            thread::spawn(move || {
                barrier.wait();
                Database::open(&path)
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn racing_opens_of_a_new_file_all_succeed() {
    for round in 0..ROUNDS {
        let path = std::env::temp_dir().join(format!("ballot_open_race_{}.db", Uuid::new_v4()));

        let results = open_concurrently(&path);
        let failures: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err().map(|e| format!("{:#}", e)))
            .collect();
        assert!(failures.is_empty(), "round {}: {:?}", round, failures);

        let db = results.into_iter().next().unwrap().unwrap();
        let versions: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(versions, 1, "round {}", round);

        // Schema is usable from the surviving handle
        db.with_conn(|conn| conn.insert_rfc("r1", "After the race").map(|_| ()))
            .unwrap();

        drop(db);
        remove_db_files(&path);
    }
}
