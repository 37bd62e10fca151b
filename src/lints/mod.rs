//! Built-in lints.
//!
//! Names carry the severity a violation produces: `e_` lints report Error,
//! `w_` lints report Warn. Each lint is a leaf implementing `LintCheck`
//! and adds nothing to the engine.

mod dsa_unique_correct_representation;
mod ext_duplicate_extension;
mod generalized_time_fraction_seconds;
mod name_constraint_on_edi_party_name;
mod sub_cert_valid_time_39_months;
mod subject_dn_serial_number_max_length;
mod subject_dn_trailing_whitespace;
mod subject_given_name_max_length;

pub use dsa_unique_correct_representation::DsaUniqueCorrectRepresentation;
pub use ext_duplicate_extension::ExtDuplicateExtension;
pub use generalized_time_fraction_seconds::{classify_time, GeneralizedTimeFraction, TimeForm};
pub use name_constraint_on_edi_party_name::NameConstraintOnEdiPartyName;
pub use sub_cert_valid_time_39_months::SubCertValidTimeLongerThan39Months;
pub use subject_dn_serial_number_max_length::SubjectDnSerialNumberMaxLength;
pub use subject_dn_trailing_whitespace::SubjectDnTrailingWhitespace;
pub use subject_given_name_max_length::SubjectGivenNameMaxLength;

use crate::error::RegistryError;
use crate::registry::{Lint, RegistryBuilder};

/// Every built-in lint, unregistered.
pub fn builtin() -> Vec<Lint> {
    vec![
        dsa_unique_correct_representation::lint(),
        ext_duplicate_extension::lint(),
        generalized_time_fraction_seconds::lint(),
        name_constraint_on_edi_party_name::lint(),
        sub_cert_valid_time_39_months::lint(),
        subject_dn_serial_number_max_length::lint(),
        subject_dn_trailing_whitespace::lint(),
        subject_given_name_max_length::lint(),
    ]
}

/// Register every built-in lint.
///
/// A lint whose setup fails is logged and left out. Only a name clash with
/// a lint already in `builder` is returned as an error.
pub fn register_all(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
    builder.register_all(builtin())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registers_every_lint() {
        let mut builder = RegistryBuilder::new();
        register_all(&mut builder).unwrap();
        assert_eq!(builder.len(), builtin().len());
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::certificate::{Certificate, PublicKey};
    use crate::source::utc_date;

    /// Version 3 subscriber certificate issued 2020-01-01 for one year.
    pub fn leaf() -> Certificate {
        let mut cert = Certificate::new(
            3,
            utc_date(2020, 1, 1),
            utc_date(2021, 1, 1),
            PublicKey::Ec {
                curve: "P-256".into(),
            },
        );
        cert.subject.common_name.push("www.example.com".into());
        cert.issuer.common_name.push("Example Issuing CA".into());
        cert
    }
}
