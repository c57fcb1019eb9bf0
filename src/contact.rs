//! Customer contact/order form record.
//!
//! Field rules mirror the storefront form: name of at least two characters,
//! a valid email address, and the order id the customer is writing about.
//! Subject and message are pre-filled from the checkout summary, so they are
//! optional here. Validation only — there is no server to submit to.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::Result;

#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct ContactDetails {
    #[validate(length(min = 2, message = "El nombre debe tener al menos 2 caracteres."))]
    pub name: String,
    #[validate(email(message = "Dirección de correo electrónico inválida."))]
    pub email: String,
    #[validate(length(min = 1, message = "ID de pedido es requerido."))]
    pub order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ContactDetails {
    /// Validated record for the customer's own book-keeping alongside an
    /// order summary.
    pub fn for_order(
        name: impl Into<String>,
        email: impl Into<String>,
        order_id: impl Into<String>,
    ) -> Result<Self> {
        let details = Self {
            name: name.into(),
            email: email.into(),
            order_id: order_id.into(),
            subject: None,
            message: None,
        };
        details.validate()?;
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorefrontError;

    #[test]
    fn test_valid_details() {
        let details = ContactDetails::for_order("María", "maria@example.es", "MV-1717171717171").unwrap();
        assert_eq!(details.name, "María");
        assert!(details.subject.is_none());
    }

    #[test]
    fn test_short_name_rejected() {
        assert!(matches!(
            ContactDetails::for_order("M", "maria@example.es", "MV-1"),
            Err(StorefrontError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_email_rejected() {
        assert!(ContactDetails::for_order("María", "no-es-un-correo", "MV-1").is_err());
    }

    #[test]
    fn test_missing_order_id_rejected() {
        assert!(ContactDetails::for_order("María", "maria@example.es", "").is_err());
    }
}
