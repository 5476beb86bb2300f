use plantguard_auth::{AccountMap, AccountRecord, CredentialStore, FileStore, SessionUser};

fn sample_accounts() -> AccountMap {
    let mut accounts = AccountMap::new();
    accounts.insert(
        "ada@example.com".to_string(),
        AccountRecord {
            name: "Ada Lovelace".to_string(),
            password_hash: "1abc2de".to_string(),
        },
    );
    accounts
}

#[test]
fn missing_files_read_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("never-created"));

    assert!(store.load_accounts().unwrap().is_empty());
    assert!(store.load_session().unwrap().is_none());
}

#[test]
fn accounts_round_trip_through_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path());

    let accounts = sample_accounts();
    store.save_accounts(&accounts).unwrap();

    assert_eq!(FileStore::open(dir.path()).load_accounts().unwrap(), accounts);
}

#[test]
fn session_round_trip_through_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path());

    let session = SessionUser {
        id: "1abc2de".to_string(),
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
    };
    store.save_session(&session).unwrap();

    assert_eq!(
        FileStore::open(dir.path()).load_session().unwrap(),
        Some(session)
    );
}

#[test]
fn clearing_an_absent_session_is_fine() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path());

    store.clear_session().unwrap();
    store.clear_session().unwrap();
}

#[test]
fn empty_files_read_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("accounts.json"), "  \n").unwrap();

    let store = FileStore::open(dir.path());
    assert!(store.load_accounts().unwrap().is_empty());
}

#[test]
fn corrupt_account_data_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("accounts.json"), "{broken").unwrap();

    let store = FileStore::open(dir.path());
    assert!(store.load_accounts().is_err());
}
