//! PostgreSQL target store
//!
//! Idempotent upserts for customers and cards. Each batch runs in one
//! transaction with a savepoint per row: a per-row constraint violation
//! rolls back only that row's savepoint and is reported as a row failure,
//! while any other error aborts the whole transaction.

use crate::adapters::postgres::client::PostgresClient;
use crate::adapters::store::{RowFailure, TargetStore, UpsertOutcome};
use crate::domain::{CardRecord, CustomerRecord, Result, TamizError};
use async_trait::async_trait;
use tokio_postgres::Transaction;

const UPSERT_CUSTOMER: &str = "\
INSERT INTO clientes (
    cod_cliente, nombre, apellido1, apellido2,
    dni_hash, dni_ok, dni_ko,
    correo, correo_ok, correo_ko,
    telefono, telefono_ok, telefono_ko,
    fecha_carga
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
ON CONFLICT (cod_cliente) DO UPDATE SET
    nombre = EXCLUDED.nombre,
    apellido1 = EXCLUDED.apellido1,
    apellido2 = EXCLUDED.apellido2,
    dni_hash = EXCLUDED.dni_hash,
    dni_ok = EXCLUDED.dni_ok,
    dni_ko = EXCLUDED.dni_ko,
    correo = EXCLUDED.correo,
    correo_ok = EXCLUDED.correo_ok,
    correo_ko = EXCLUDED.correo_ko,
    telefono = EXCLUDED.telefono,
    telefono_ok = EXCLUDED.telefono_ok,
    telefono_ko = EXCLUDED.telefono_ko,
    fecha_carga = EXCLUDED.fecha_carga";

const UPSERT_CARD: &str = "\
INSERT INTO tarjetas (
    tarjeta_hash, cod_cliente, tarjeta_mask,
    tarjeta_ok, tarjeta_ko, fecha_carga
) VALUES ($1, $2, $3, $4, $5, $6)
ON CONFLICT (tarjeta_hash) DO UPDATE SET
    cod_cliente = EXCLUDED.cod_cliente,
    tarjeta_mask = EXCLUDED.tarjeta_mask,
    tarjeta_ok = EXCLUDED.tarjeta_ok,
    tarjeta_ko = EXCLUDED.tarjeta_ko,
    fecha_carga = EXCLUDED.fecha_carga";

/// Target store backed by PostgreSQL
pub struct PostgresStore {
    client: PostgresClient,
}

impl PostgresStore {
    /// Create a store over an existing client
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }

    /// Run one row's statement under a savepoint
    ///
    /// Returns `Ok(None)` when the row applied, `Ok(Some(message))` when
    /// the store refused it for a constraint violation (SQLSTATE class 23),
    /// and `Err` for anything else.
    async fn upsert_row(
        tx: &mut Transaction<'_>,
        statement: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
        index: usize,
    ) -> Result<Option<String>> {
        let savepoint_name = format!("row_{}", index);
        let sp = tx
            .savepoint(savepoint_name)
            .await
            .map_err(|e| TamizError::Database(format!("Failed to create savepoint: {}", e)))?;

        match sp.execute(statement, params).await {
            Ok(_) => {
                sp.commit()
                    .await
                    .map_err(|e| TamizError::Database(format!("Failed to release savepoint: {}", e)))?;
                Ok(None)
            }
            Err(e) => {
                let constraint_violation = e
                    .as_db_error()
                    .map(|db| db.code().code().starts_with("23"))
                    .unwrap_or(false);

                if constraint_violation {
                    let message = e.to_string();
                    sp.rollback().await.map_err(|e| {
                        TamizError::Database(format!("Failed to roll back savepoint: {}", e))
                    })?;
                    Ok(Some(message))
                } else {
                    Err(TamizError::Database(format!("Upsert failed: {}", e)))
                }
            }
        }
    }
}

#[async_trait]
impl TargetStore for PostgresStore {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn upsert_customers(&self, records: &[CustomerRecord]) -> Result<UpsertOutcome> {
        let mut connection = self.client.get_connection().await?;
        let mut tx = connection
            .transaction()
            .await
            .map_err(|e| TamizError::Database(format!("Failed to begin transaction: {}", e)))?;

        let mut outcome = UpsertOutcome::new();
        for (index, record) in records.iter().enumerate() {
            let cod_cliente = record.cod_cliente.as_str();
            let dni_ok = record.dni_status.ok_flag();
            let dni_ko = record.dni_status.ko_flag();
            let correo_ok = record.correo_status.ok_flag();
            let correo_ko = record.correo_status.ko_flag();
            let telefono_ok = record.telefono_status.ok_flag();
            let telefono_ko = record.telefono_status.ko_flag();
            let params: [&(dyn tokio_postgres::types::ToSql + Sync); 14] = [
                &cod_cliente,
                &record.nombre,
                &record.apellido1,
                &record.apellido2,
                &record.dni_hash,
                &dni_ok,
                &dni_ko,
                &record.correo,
                &correo_ok,
                &correo_ko,
                &record.telefono,
                &telefono_ok,
                &telefono_ko,
                &record.fecha_carga,
            ];

            if let Some(error) = Self::upsert_row(&mut tx, UPSERT_CUSTOMER, &params, index).await? {
                outcome
                    .row_failures
                    .push(RowFailure::new(index, record.cod_cliente.as_str(), error));
            } else {
                outcome.applied += 1;
            }
        }

        tx.commit()
            .await
            .map_err(|e| TamizError::Database(format!("Failed to commit transaction: {}", e)))?;

        tracing::info!(
            applied = outcome.applied,
            refused = outcome.row_failures.len(),
            "Upserted customer batch"
        );
        Ok(outcome)
    }

    async fn upsert_cards(&self, records: &[CardRecord]) -> Result<UpsertOutcome> {
        let mut connection = self.client.get_connection().await?;
        let mut tx = connection
            .transaction()
            .await
            .map_err(|e| TamizError::Database(format!("Failed to begin transaction: {}", e)))?;

        let mut outcome = UpsertOutcome::new();
        for (index, record) in records.iter().enumerate() {
            let cod_cliente = record.cod_cliente.as_str();
            let tarjeta_ok = record.tarjeta_status.ok_flag();
            let tarjeta_ko = record.tarjeta_status.ko_flag();
            let params: [&(dyn tokio_postgres::types::ToSql + Sync); 6] = [
                &record.tarjeta_hash,
                &cod_cliente,
                &record.tarjeta_mask,
                &tarjeta_ok,
                &tarjeta_ko,
                &record.fecha_carga,
            ];

            if let Some(error) = Self::upsert_row(&mut tx, UPSERT_CARD, &params, index).await? {
                outcome
                    .row_failures
                    .push(RowFailure::new(index, record.tarjeta_hash.clone(), error));
            } else {
                outcome.applied += 1;
            }
        }

        tx.commit()
            .await
            .map_err(|e| TamizError::Database(format!("Failed to commit transaction: {}", e)))?;

        tracing::info!(
            applied = outcome.applied,
            refused = outcome.row_failures.len(),
            "Upserted card batch"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_upsert_is_keyed_on_cod_cliente() {
        assert!(UPSERT_CUSTOMER.contains("ON CONFLICT (cod_cliente) DO UPDATE"));
        // Every non-key column is refreshed on conflict
        for column in [
            "nombre", "apellido1", "apellido2", "dni_hash", "dni_ok", "dni_ko", "correo",
            "correo_ok", "correo_ko", "telefono", "telefono_ok", "telefono_ko", "fecha_carga",
        ] {
            assert!(
                UPSERT_CUSTOMER.contains(&format!("{column} = EXCLUDED.{column}")),
                "missing update for {column}"
            );
        }
    }

    #[test]
    fn test_card_upsert_is_keyed_on_hash() {
        assert!(UPSERT_CARD.contains("ON CONFLICT (tarjeta_hash) DO UPDATE"));
        assert!(UPSERT_CARD.contains("cod_cliente = EXCLUDED.cod_cliente"));
    }
}
