//! Card row transformation

use super::{RowTransformer, TransformResult};
use crate::core::anonymize::mask_card;
use crate::core::validate::{clean_text, validate_card};
use crate::domain::records::REASON_MISSING_KEY_FIELD;
use crate::domain::{
    CardRecord, ClienteId, EntityKind, FieldFailure, FieldStatus, RawRecord, RejectedRow,
};

impl RowTransformer {
    /// Transforms one raw card row
    ///
    /// Both `cod_cliente` and `numero_tarjeta` are mandatory: the card
    /// hash is the record's identity, so a missing or malformed number
    /// rejects the row. Accepted records carry the hash and the masked
    /// form, never the raw number.
    pub fn transform_card(&self, raw: &RawRecord) -> TransformResult<CardRecord> {
        let mut failures = Vec::new();

        let cod_cliente = match ClienteId::new(clean_text(raw.get("cod_cliente"))) {
            Ok(id) => Some(id),
            Err(_) => {
                failures.push(FieldFailure::new("cod_cliente", REASON_MISSING_KEY_FIELD));
                None
            }
        };

        let (numero, numero_status) = validate_card(raw.get("numero_tarjeta"));
        if !numero_status.is_valid() {
            failures.push(FieldFailure::new("numero_tarjeta", REASON_MISSING_KEY_FIELD));
        }

        let cod_cliente = match (cod_cliente, numero_status.is_valid()) {
            (Some(id), true) => id,
            _ => {
                return Err(RejectedRow::new(
                    EntityKind::Tarjeta,
                    raw.clone(),
                    failures,
                    self.load_date(),
                ));
            }
        };

        Ok(CardRecord {
            cod_cliente,
            tarjeta_hash: self.anonymizer().hash_card(&numero),
            tarjeta_mask: mask_card(&numero),
            tarjeta_status: FieldStatus::Valid,
            fecha_carga: self.load_date(),
        })
    }
}
