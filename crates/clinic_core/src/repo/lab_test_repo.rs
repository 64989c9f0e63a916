//! Lab test repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide order/result-entry/CRUD APIs over the `lab_tests` table.
//! - Provide the lab listing joined with patient names, optionally pending only.
//!
//! # Invariants
//! - `ordered_on` is stamped once at creation.
//! - `result` and `reported_on` are always written together; the table has a
//!   CHECK constraint enforcing that both are null or both are set.
//! - Joined listing is ordered by `ordered_on DESC, id DESC`.

use crate::model::lab_test::{
    validate_result, LabTest, LabTestId, LabTestPatch, LabTestView, NewLabTest,
};
use crate::model::validation::now_timestamp;
use crate::repo::common::{
    ensure_connection_ready, ensure_row_exists, read_optional_timestamp, read_timestamp,
    timestamp_to_db,
};
use crate::repo::error::RepoResult;
use rusqlite::{params, Connection, Row};

const LAB_TEST_COLUMNS: &[&str] = &[
    "id",
    "patient_id",
    "test_name",
    "cost",
    "result",
    "ordered_on",
    "reported_on",
];

const LAB_TEST_SELECT_SQL: &str = "SELECT
    id,
    patient_id,
    test_name,
    cost,
    result,
    ordered_on,
    reported_on
FROM lab_tests";

/// Repository interface for lab test operations.
pub trait LabTestRepository {
    /// Orders one lab test for an existing patient, stamped with the current time.
    fn order_lab_test(&self, test: NewLabTest) -> RepoResult<LabTest>;
    fn get_lab_test(&self, id: LabTestId) -> RepoResult<Option<LabTest>>;
    /// Lists all lab tests ordered by id.
    fn list_lab_tests(&self) -> RepoResult<Vec<LabTest>>;
    /// Lists lab tests with patient names, newest order first.
    fn list_lab_test_views(&self, pending_only: bool) -> RepoResult<Vec<LabTestView>>;
    /// Sets the result text and stamps `reported_on`; `None` when `id` does not exist.
    fn record_lab_result(&self, id: LabTestId, result: &str) -> RepoResult<Option<LabTest>>;
    /// Applies supplied overrides; returns `None` when `id` does not exist.
    fn update_lab_test(&self, id: LabTestId, patch: LabTestPatch) -> RepoResult<Option<LabTest>>;
    /// Deletes one lab test; returns whether a row was removed.
    fn delete_lab_test(&self, id: LabTestId) -> RepoResult<bool>;
}

/// SQLite-backed lab test repository.
pub struct SqliteLabTestRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLabTestRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "lab_tests", LAB_TEST_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl LabTestRepository for SqliteLabTestRepository<'_> {
    fn order_lab_test(&self, test: NewLabTest) -> RepoResult<LabTest> {
        let test = test.normalized()?;
        ensure_row_exists(self.conn, "patients", test.patient_id)?;
        let ordered_on = now_timestamp();

        self.conn.execute(
            "INSERT INTO lab_tests (
                patient_id,
                test_name,
                cost,
                ordered_on
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                test.patient_id,
                test.test_name.as_str(),
                test.cost,
                timestamp_to_db(ordered_on),
            ],
        )?;

        Ok(LabTest {
            id: self.conn.last_insert_rowid(),
            patient_id: test.patient_id,
            test_name: test.test_name,
            cost: test.cost,
            ordered_on,
            result: None,
            reported_on: None,
        })
    }

    fn get_lab_test(&self, id: LabTestId) -> RepoResult<Option<LabTest>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LAB_TEST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_lab_test_row(row)?));
        }
        Ok(None)
    }

    fn list_lab_tests(&self) -> RepoResult<Vec<LabTest>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LAB_TEST_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tests = Vec::new();
        while let Some(row) = rows.next()? {
            tests.push(parse_lab_test_row(row)?);
        }
        Ok(tests)
    }

    fn list_lab_test_views(&self, pending_only: bool) -> RepoResult<Vec<LabTestView>> {
        let mut sql = String::from(
            "SELECT
                lt.id AS id,
                lt.patient_id AS patient_id,
                lt.test_name AS test_name,
                lt.cost AS cost,
                lt.result AS result,
                lt.ordered_on AS ordered_on,
                lt.reported_on AS reported_on,
                p.name AS patient_name
             FROM lab_tests lt
             INNER JOIN patients p ON p.id = lt.patient_id",
        );
        if pending_only {
            sql.push_str(" WHERE lt.result IS NULL");
        }
        sql.push_str(" ORDER BY lt.ordered_on DESC, lt.id DESC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut views = Vec::new();
        while let Some(row) = rows.next()? {
            views.push(LabTestView {
                test: parse_lab_test_row(row)?,
                patient_name: row.get("patient_name")?,
            });
        }
        Ok(views)
    }

    fn record_lab_result(&self, id: LabTestId, result: &str) -> RepoResult<Option<LabTest>> {
        let result = validate_result(result)?;
        let reported_on = now_timestamp();

        let changed = self.conn.execute(
            "UPDATE lab_tests
             SET
                result = ?1,
                reported_on = ?2
             WHERE id = ?3;",
            params![result.as_str(), timestamp_to_db(reported_on), id],
        )?;
        if changed == 0 {
            return Ok(None);
        }

        self.get_lab_test(id)
    }

    fn update_lab_test(&self, id: LabTestId, patch: LabTestPatch) -> RepoResult<Option<LabTest>> {
        let Some(existing) = self.get_lab_test(id)? else {
            return Ok(None);
        };
        let updated = existing.apply(patch)?;

        self.conn.execute(
            "UPDATE lab_tests
             SET
                test_name = ?1,
                cost = ?2
             WHERE id = ?3;",
            params![updated.test_name.as_str(), updated.cost, id],
        )?;

        Ok(Some(updated))
    }

    fn delete_lab_test(&self, id: LabTestId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM lab_tests WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_lab_test_row(row: &Row<'_>) -> RepoResult<LabTest> {
    Ok(LabTest {
        id: row.get("id")?,
        patient_id: row.get("patient_id")?,
        test_name: row.get("test_name")?,
        cost: row.get("cost")?,
        ordered_on: read_timestamp(row, "ordered_on")?,
        result: row.get("result")?,
        reported_on: read_optional_timestamp(row, "reported_on")?,
    })
}
