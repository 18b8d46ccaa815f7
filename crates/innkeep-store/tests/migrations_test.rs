// Integration tests for the migration runner

use innkeep_core::errors::ExErrorKind;
use rusqlite::Connection;

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
        .unwrap();
    let tables = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap();
    tables
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = setup_test_db();
    let result = innkeep_store::migrations::apply_migrations(&mut conn);
    assert!(result.is_ok(), "Migrations should succeed: {:?}", result.err());

    let tables = get_table_names(&conn);
    for expected in [
        "schema_version",
        "room_types",
        "rooms",
        "guests",
        "reservations",
        "invoices",
        "invoice_items",
        "payments",
        "housekeeping_tasks",
        "accounts",
        "transactions",
        "journal_lines",
        "expenses",
        "budgets",
        "tax_rates",
        "employees",
        "attendance",
        "leave_requests",
        "payroll_runs",
        "payslips",
        "performance_reviews",
    ] {
        assert!(
            tables.contains(&expected.to_string()),
            "Missing table: {}",
            expected
        );
    }
}

#[test]
fn test_default_chart_is_seeded() {
    let mut conn = setup_test_db();
    innkeep_store::migrations::apply_migrations(&mut conn).unwrap();

    let codes: Vec<String> = conn
        .prepare("SELECT code FROM accounts WHERE is_system = 1 ORDER BY code")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        codes,
        vec![
            "1000", "1010", "1200", "2100", "2200", "3000", "4000", "4100", "4200", "4900",
            "5000", "5100"
        ]
    );

    let equity: String = conn
        .query_row("SELECT name FROM accounts WHERE code = '3000'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(equity, "Owner's Equity");
}

#[test]
fn test_migration_idempotency() {
    let mut conn = setup_test_db();
    innkeep_store::migrations::apply_migrations(&mut conn).unwrap();
    let result = innkeep_store::migrations::apply_migrations(&mut conn);
    assert!(result.is_ok(), "Re-running migrations should succeed");

    let version_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version_count, 2);

    let accounts: i64 = conn
        .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
        .unwrap();
    assert_eq!(accounts, 12, "Seed must not be applied twice");
}

#[test]
fn test_checksum_is_recorded() {
    let mut conn = setup_test_db();
    innkeep_store::migrations::apply_migrations(&mut conn).unwrap();

    let checksum: String = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?",
            ["001_initial_schema"],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(checksum.len(), 64, "SHA256 checksum should be 64 hex chars");
}

#[test]
fn test_edited_migration_is_refused() {
    let mut conn = setup_test_db();
    innkeep_store::migrations::apply_migrations(&mut conn).unwrap();
    conn.execute(
        "UPDATE schema_version SET checksum = 'deadbeef' WHERE migration_id = '002_default_chart'",
        [],
    )
    .unwrap();

    let err = innkeep_store::migrations::apply_migrations(&mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert_eq!(err.op(), Some("migration_checksum"));
}

#[test]
fn test_open_and_migrate_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("innkeep.db");
    let conn = innkeep_store::db::open_and_migrate(&path).unwrap();
    assert!(path.exists());

    let applied = innkeep_store::migrations::applied_migrations(&conn).unwrap();
    assert_eq!(applied, vec!["001_initial_schema", "002_default_chart"]);
}
