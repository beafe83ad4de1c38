use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{
    AccountNumber, FraudLog, FraudStatus, NewTransaction, RuleName, Transaction, TransactionId,
};

use super::traits::{FraudLogStore, TransactionStore};

/// PostgreSQL-backed transaction and fraud-log store.
///
/// Account queries order by the `seq` column (a bigserial) rather than
/// the transaction timestamp, matching the insertion-order contract of
/// the store traits.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect with a pool of the given size.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_transaction(row: &sqlx::postgres::PgRow) -> anyhow::Result<Transaction> {
        let id: Uuid = row.get("id");
        let account_number: String = row.get("account_number");
        let amount: Decimal = row.get("amount");
        let location: String = row.get("location");
        let transaction_time: DateTime<Utc> = row.get("transaction_time");
        let risk_score: Option<i32> = row.get("risk_score");
        let status: Option<String> = row.get("status");

        Ok(Transaction {
            id: TransactionId(id),
            account_number: AccountNumber::new(account_number),
            amount,
            location,
            transaction_time,
            risk_score: risk_score.map(|s| s as u8),
            status: status.as_deref().and_then(FraudStatus::from_str),
        })
    }
}

#[async_trait]
impl TransactionStore for PgStore {
    async fn insert(&self, tx: &NewTransaction) -> anyhow::Result<Transaction> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (account_number, amount, location, transaction_time)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(tx.account_number.as_str())
        .bind(tx.amount)
        .bind(&tx.location)
        .bind(tx.transaction_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(tx.clone().into_transaction(TransactionId(id)))
    }

    async fn find(&self, id: TransactionId) -> anyhow::Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, account_number, amount, location, transaction_time, risk_score, status
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_transaction).transpose()
    }

    async fn find_by_account(&self, account: &AccountNumber) -> anyhow::Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_number, amount, location, transaction_time, risk_score, status
            FROM transactions
            WHERE account_number = $1
            ORDER BY seq
            "#,
        )
        .bind(account.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn find_by_account_after(
        &self,
        account: &AccountNumber,
        after: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_number, amount, location, transaction_time, risk_score, status
            FROM transactions
            WHERE account_number = $1
              AND transaction_time > $2
            ORDER BY seq
            "#,
        )
        .bind(account.as_str())
        .bind(after)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn update_assessment(
        &self,
        id: TransactionId,
        risk_score: u8,
        status: FraudStatus,
    ) -> anyhow::Result<()> {
        let updated = sqlx::query(
            r#"
            UPDATE transactions
            SET risk_score = $2, status = $3
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(risk_score as i32)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            anyhow::bail!("transaction {id} not found");
        }
        Ok(())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_number, amount, location, transaction_time, risk_score, status
            FROM transactions
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn find_by_status(&self, status: FraudStatus) -> anyhow::Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_number, amount, location, transaction_time, risk_score, status
            FROM transactions
            WHERE status = $1
            ORDER BY seq
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_transaction).collect()
    }
}

#[async_trait]
impl FraudLogStore for PgStore {
    async fn append(&self, entry: &FraudLog) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO fraud_logs (transaction_id, rule, risk_score, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(entry.transaction_id.0)
        .bind(entry.rule.as_str())
        .bind(entry.risk_score as i32)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_transaction(&self, id: TransactionId) -> anyhow::Result<Vec<FraudLog>> {
        let rows = sqlx::query(
            r#"
            SELECT transaction_id, rule, risk_score, created_at
            FROM fraud_logs
            WHERE transaction_id = $1
            ORDER BY seq
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let transaction_id: Uuid = row.get("transaction_id");
                let rule: String = row.get("rule");
                let risk_score: i32 = row.get("risk_score");
                let created_at: DateTime<Utc> = row.get("created_at");

                let rule = parse_rule_name(&rule)
                    .ok_or_else(|| anyhow::anyhow!("unknown rule name in fraud_logs: {rule}"))?;

                Ok(FraudLog {
                    transaction_id: TransactionId(transaction_id),
                    rule,
                    risk_score: risk_score as u32,
                    created_at,
                })
            })
            .collect()
    }
}

fn parse_rule_name(s: &str) -> Option<RuleName> {
    match s {
        "HIGH_AMOUNT_TRANSACTION" => Some(RuleName::HighAmountTransaction),
        "RAPID_MULTIPLE_TRANSACTIONS" => Some(RuleName::RapidMultipleTransactions),
        "LOCATION_MISMATCH" => Some(RuleName::LocationMismatch),
        "NIGHT_TIME_TRANSACTION" => Some(RuleName::NightTimeTransaction),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_name_covers_closed_set() {
        for rule in [
            RuleName::HighAmountTransaction,
            RuleName::RapidMultipleTransactions,
            RuleName::LocationMismatch,
            RuleName::NightTimeTransaction,
        ] {
            assert_eq!(parse_rule_name(rule.as_str()), Some(rule));
        }
        assert_eq!(parse_rule_name("SOMETHING_ELSE"), None);
    }
}
