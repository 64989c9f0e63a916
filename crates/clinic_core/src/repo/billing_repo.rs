//! Billing repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and payment APIs over the `billing` table.
//! - Provide the bill listing joined with patient names, optionally unpaid only.
//!
//! # Invariants
//! - New bills are stamped with today's date and start unpaid.
//! - Negative amounts are rejected by validation and by a CHECK constraint.
//! - Joined listing is ordered by `billed_on DESC, id DESC`.

use crate::model::billing::{BillId, BillPatch, BillView, BillingRecord, NewBill};
use crate::model::validation::today;
use crate::repo::common::{
    bool_to_int, date_to_db, ensure_connection_ready, ensure_row_exists, read_bool, read_date,
};
use crate::repo::error::RepoResult;
use rusqlite::{params, Connection, Row};

const BILLING_COLUMNS: &[&str] = &[
    "id",
    "patient_id",
    "amount",
    "description",
    "billed_on",
    "paid",
];

const BILLING_SELECT_SQL: &str = "SELECT
    id,
    patient_id,
    amount,
    description,
    billed_on,
    paid
FROM billing";

/// Repository interface for billing operations.
pub trait BillingRepository {
    /// Creates one unpaid bill for an existing patient.
    fn create_bill(&self, bill: NewBill) -> RepoResult<BillingRecord>;
    fn get_bill(&self, id: BillId) -> RepoResult<Option<BillingRecord>>;
    /// Lists all bills ordered by id.
    fn list_bills(&self) -> RepoResult<Vec<BillingRecord>>;
    /// Lists bills with patient names, newest first.
    fn list_bill_views(&self, unpaid_only: bool) -> RepoResult<Vec<BillView>>;
    /// Applies supplied overrides; returns `None` when `id` does not exist.
    fn update_bill(&self, id: BillId, patch: BillPatch) -> RepoResult<Option<BillingRecord>>;
    /// Marks one bill as paid; returns whether a row matched.
    fn mark_bill_paid(&self, id: BillId) -> RepoResult<bool>;
    /// Deletes one bill; returns whether a row was removed.
    fn delete_bill(&self, id: BillId) -> RepoResult<bool>;
}

/// SQLite-backed billing repository.
pub struct SqliteBillingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBillingRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "billing", BILLING_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl BillingRepository for SqliteBillingRepository<'_> {
    fn create_bill(&self, bill: NewBill) -> RepoResult<BillingRecord> {
        let bill = bill.normalized()?;
        ensure_row_exists(self.conn, "patients", bill.patient_id)?;
        let billed_on = today();

        self.conn.execute(
            "INSERT INTO billing (
                patient_id,
                amount,
                description,
                billed_on,
                paid
            ) VALUES (?1, ?2, ?3, ?4, 0);",
            params![
                bill.patient_id,
                bill.amount,
                bill.description.as_deref(),
                date_to_db(billed_on),
            ],
        )?;

        Ok(BillingRecord {
            id: self.conn.last_insert_rowid(),
            patient_id: bill.patient_id,
            amount: bill.amount,
            description: bill.description,
            billed_on,
            paid: false,
        })
    }

    fn get_bill(&self, id: BillId) -> RepoResult<Option<BillingRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BILLING_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_bill_row(row)?));
        }
        Ok(None)
    }

    fn list_bills(&self) -> RepoResult<Vec<BillingRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BILLING_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut bills = Vec::new();
        while let Some(row) = rows.next()? {
            bills.push(parse_bill_row(row)?);
        }
        Ok(bills)
    }

    fn list_bill_views(&self, unpaid_only: bool) -> RepoResult<Vec<BillView>> {
        let mut sql = String::from(
            "SELECT
                b.id AS id,
                b.patient_id AS patient_id,
                b.amount AS amount,
                b.description AS description,
                b.billed_on AS billed_on,
                b.paid AS paid,
                p.name AS patient_name
             FROM billing b
             INNER JOIN patients p ON p.id = b.patient_id",
        );
        if unpaid_only {
            sql.push_str(" WHERE b.paid = 0");
        }
        sql.push_str(" ORDER BY b.billed_on DESC, b.id DESC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut views = Vec::new();
        while let Some(row) = rows.next()? {
            views.push(BillView {
                bill: parse_bill_row(row)?,
                patient_name: row.get("patient_name")?,
            });
        }
        Ok(views)
    }

    fn update_bill(&self, id: BillId, patch: BillPatch) -> RepoResult<Option<BillingRecord>> {
        let Some(existing) = self.get_bill(id)? else {
            return Ok(None);
        };
        let updated = existing.apply(patch)?;

        self.conn.execute(
            "UPDATE billing
             SET
                amount = ?1,
                description = ?2,
                paid = ?3
             WHERE id = ?4;",
            params![
                updated.amount,
                updated.description.as_deref(),
                bool_to_int(updated.paid),
                id,
            ],
        )?;

        Ok(Some(updated))
    }

    fn mark_bill_paid(&self, id: BillId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("UPDATE billing SET paid = 1 WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn delete_bill(&self, id: BillId) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM billing WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_bill_row(row: &Row<'_>) -> RepoResult<BillingRecord> {
    Ok(BillingRecord {
        id: row.get("id")?,
        patient_id: row.get("patient_id")?,
        amount: row.get("amount")?,
        description: row.get("description")?,
        billed_on: read_date(row, "billed_on")?,
        paid: read_bool(row, "paid")?,
    })
}
