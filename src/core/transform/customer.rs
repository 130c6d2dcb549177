//! Customer row transformation

use super::{RowTransformer, TransformResult};
use crate::core::validate::{clean_text, validate_dni, validate_email, validate_phone};
use crate::domain::records::{
    REASON_INVALID_EMAIL, REASON_INVALID_PHONE, REASON_MISSING_EMAIL, REASON_MISSING_KEY_FIELD,
    REASON_MISSING_PHONE,
};
use crate::domain::{
    ClienteId, CustomerRecord, EntityKind, FieldFailure, FieldStatus, RawRecord, RejectedRow,
};

impl RowTransformer {
    /// Transforms one raw customer row
    ///
    /// Mandatory fields are `cod_cliente` and `dni`; either failing rejects
    /// the row with reason `missing_key_field`. Email and phone failures
    /// are recorded on the record (`ko` at the store boundary) but never
    /// block acceptance. The accepted record carries the DNI hash, never
    /// the raw document number; the rejection carries the raw row verbatim
    /// and every failing field.
    pub fn transform_customer(&self, raw: &RawRecord) -> TransformResult<CustomerRecord> {
        let mut failures = Vec::new();

        let cod_cliente = match ClienteId::new(clean_text(raw.get("cod_cliente"))) {
            Ok(id) => Some(id),
            Err(_) => {
                failures.push(FieldFailure::new("cod_cliente", REASON_MISSING_KEY_FIELD));
                None
            }
        };

        let (dni, dni_status) = validate_dni(raw.get("dni"));
        if !dni_status.is_valid() {
            failures.push(FieldFailure::new("dni", REASON_MISSING_KEY_FIELD));
        }

        let (correo, correo_status) = validate_email(raw.get("correo"));
        match correo_status {
            FieldStatus::Invalid => failures.push(FieldFailure::new("correo", REASON_INVALID_EMAIL)),
            FieldStatus::Missing => failures.push(FieldFailure::new("correo", REASON_MISSING_EMAIL)),
            FieldStatus::Valid => {}
        }

        let (telefono, telefono_status) = validate_phone(raw.get("telefono"));
        match telefono_status {
            FieldStatus::Invalid => {
                failures.push(FieldFailure::new("telefono", REASON_INVALID_PHONE))
            }
            FieldStatus::Missing => {
                failures.push(FieldFailure::new("telefono", REASON_MISSING_PHONE))
            }
            FieldStatus::Valid => {}
        }

        // Mandatory failure: divert the whole row, listing every failing field
        let cod_cliente = match (cod_cliente, dni_status.is_valid()) {
            (Some(id), true) => id,
            _ => {
                return Err(RejectedRow::new(
                    EntityKind::Cliente,
                    raw.clone(),
                    failures,
                    self.load_date(),
                ));
            }
        };

        Ok(CustomerRecord {
            cod_cliente,
            nombre: clean_text(raw.get("nombre")),
            apellido1: clean_text(raw.get("apellido1")),
            apellido2: clean_text(raw.get("apellido2")),
            dni_hash: self.anonymizer().hash_identity(&dni),
            dni_status,
            correo,
            correo_status,
            telefono,
            telefono_status,
            fecha_carga: self.load_date(),
        })
    }
}
