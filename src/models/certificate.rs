//! Parsed certificate view consumed by lints.
//!
//! The engine never decodes DER or PEM. Whatever parses the certificate
//! hands over this structure, either in memory or as a JSON document:
//!
//! ```json
//! {
//!   "version": 3,
//!   "not_before": "2016-01-01T00:00:00Z",
//!   "not_after": "2017-01-01T00:00:00Z",
//!   "raw_not_before": { "tag": "generalized_time", "value": "20160101000000Z" },
//!   "subject": { "common_name": ["example.com"] },
//!   "extensions": [{ "oid": "2.5.29.15", "critical": true, "value": "030205a0" }],
//!   "public_key": { "algorithm": "rsa", "modulus": "c0ffee", "exponent": 65537 }
//! }
//! ```
//!
//! Big integers and extension values are hex strings. The view is
//! read-only once built and is shared across worker threads.

use crate::error::CertLoadError;
use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Dotted-decimal identifiers referenced by the built-in lints.
pub mod oid {
    pub const KEY_USAGE: &str = "2.5.29.15";
    pub const SUBJECT_ALT_NAME: &str = "2.5.29.17";
    pub const BASIC_CONSTRAINTS: &str = "2.5.29.19";
    pub const NAME_CONSTRAINTS: &str = "2.5.29.30";
    pub const CERTIFICATE_POLICIES: &str = "2.5.29.32";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// X.509 version as written in certificates (1, 2 or 3).
    pub version: u8,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// Encoded validity times as they appear in the TBSCertificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_not_before: Option<Asn1Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_not_after: Option<Asn1Time>,
    #[serde(default)]
    pub subject: Name,
    #[serde(default)]
    pub issuer: Name,
    #[serde(default)]
    pub extensions: Vec<Extension>,
    pub public_key: PublicKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_constraints: Option<BasicConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_constraints: Option<NameConstraints>,
}

impl Certificate {
    /// Minimal view with empty names and no extensions.
    pub fn new(
        version: u8,
        not_before: DateTime<Utc>,
        not_after: DateTime<Utc>,
        public_key: PublicKey,
    ) -> Self {
        Self {
            version,
            not_before,
            not_after,
            raw_not_before: None,
            raw_not_after: None,
            subject: Name::default(),
            issuer: Name::default(),
            extensions: Vec::new(),
            public_key,
            basic_constraints: None,
            name_constraints: None,
        }
    }

    /// Read a certificate view from a JSON document on disk.
    pub fn load(path: &Path) -> Result<Self, CertLoadError> {
        let data = fs::read_to_string(path).map_err(|source| CertLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| CertLoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn has_extension(&self, oid: &str) -> bool {
        self.extensions.iter().any(|e| e.oid == oid)
    }

    pub fn is_ca(&self) -> bool {
        self.basic_constraints.as_ref().is_some_and(|bc| bc.ca)
    }

    /// Subject and issuer carry the same name.
    pub fn is_self_issued(&self) -> bool {
        self.subject == self.issuer
    }

    /// End-entity certificate issued by someone else.
    pub fn is_subscriber(&self) -> bool {
        !self.is_ca() && !self.is_self_issued()
    }

    /// Encoded (notBefore, notAfter) pair, when the parser preserved them.
    pub fn validity_times(&self) -> (Option<&Asn1Time>, Option<&Asn1Time>) {
        (self.raw_not_before.as_ref(), self.raw_not_after.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// ASN.1 universal tag of an encoded time.
pub enum TimeTag {
    UtcTime,
    GeneralizedTime,
}

impl TimeTag {
    pub fn number(&self) -> u8 {
        match self {
            TimeTag::UtcTime => 23,
            TimeTag::GeneralizedTime => 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// An encoded time: its tag plus the content octets as ASCII.
pub struct Asn1Time {
    pub tag: TimeTag,
    pub value: String,
}

impl Asn1Time {
    pub fn generalized(value: impl Into<String>) -> Self {
        Self {
            tag: TimeTag::GeneralizedTime,
            value: value.into(),
        }
    }

    pub fn utc(value: impl Into<String>) -> Self {
        Self {
            tag: TimeTag::UtcTime,
            value: value.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Distinguished name, one list per attribute type.
pub struct Name {
    pub country: Vec<String>,
    pub organization: Vec<String>,
    pub organizational_unit: Vec<String>,
    pub locality: Vec<String>,
    pub province: Vec<String>,
    pub street_address: Vec<String>,
    pub postal_code: Vec<String>,
    pub common_name: Vec<String>,
    pub serial_number: Vec<String>,
    pub given_name: Vec<String>,
    pub surname: Vec<String>,
}

impl Name {
    /// Every attribute value, tagged with its short attribute name, in a
    /// fixed order.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        let groups: [(&'static str, &Vec<String>); 11] = [
            ("C", &self.country),
            ("O", &self.organization),
            ("OU", &self.organizational_unit),
            ("L", &self.locality),
            ("ST", &self.province),
            ("street", &self.street_address),
            ("postalCode", &self.postal_code),
            ("CN", &self.common_name),
            ("serialNumber", &self.serial_number),
            ("GN", &self.given_name),
            ("SN", &self.surname),
        ];
        groups
            .into_iter()
            .flat_map(|(label, values)| values.iter().map(move |v| (label, v.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.attributes().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub oid: String,
    #[serde(default)]
    pub critical: bool,
    #[serde(default, with = "hex_bytes")]
    pub value: Vec<u8>,
}

impl Extension {
    pub fn new(oid: impl Into<String>, critical: bool, value: Vec<u8>) -> Self {
        Self {
            oid: oid.into(),
            critical,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
/// Subject public key, typed by algorithm.
pub enum PublicKey {
    Rsa {
        #[serde(with = "hex_biguint")]
        modulus: BigUint,
        exponent: u64,
    },
    Dsa {
        #[serde(with = "hex_biguint")]
        p: BigUint,
        #[serde(with = "hex_biguint")]
        q: BigUint,
        #[serde(with = "hex_biguint")]
        g: BigUint,
        #[serde(with = "hex_biguint")]
        y: BigUint,
    },
    Ec {
        curve: String,
    },
    Ed25519,
    Unknown {
        oid: String,
    },
}

impl PublicKey {
    pub fn algorithm(&self) -> &'static str {
        match self {
            PublicKey::Rsa { .. } => "rsa",
            PublicKey::Dsa { .. } => "dsa",
            PublicKey::Ec { .. } => "ec",
            PublicKey::Ed25519 => "ed25519",
            PublicKey::Unknown { .. } => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicConstraints {
    pub ca: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_len: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Decoded name constraints extension.
pub struct NameConstraints {
    pub permitted: GeneralSubtrees,
    pub excluded: GeneralSubtrees,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Subtrees grouped by name form.
pub struct GeneralSubtrees {
    pub dns_names: Vec<String>,
    pub email_addresses: Vec<String>,
    pub ip_addresses: Vec<String>,
    pub directory_names: Vec<Name>,
    pub edi_party_names: Vec<EdiPartyName>,
    pub registered_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdiPartyName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_assigner: Option<String>,
    pub party_name: String,
}

mod hex_biguint {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &BigUint, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_str_radix(16))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(d)?;
        let digits = s.trim_start_matches("0x");
        BigUint::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| de::Error::custom(format!("invalid hex integer '{}'", s)))
    }
}

mod hex_bytes {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(v))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s.trim()).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::utc_date;

    #[test]
    fn test_deserialize_document() {
        let doc = r#"{
            "version": 3,
            "not_before": "2016-01-01T00:00:00Z",
            "not_after": "2017-01-01T00:00:00Z",
            "raw_not_before": { "tag": "generalized_time", "value": "20160101000000Z" },
            "subject": { "common_name": ["example.com"], "serial_number": ["42"] },
            "issuer": { "common_name": ["Example CA"] },
            "extensions": [{ "oid": "2.5.29.15", "critical": true, "value": "030205a0" }],
            "public_key": { "algorithm": "dsa", "p": "0x17", "q": "b", "g": "2", "y": "4" }
        }"#;
        let cert: Certificate = serde_json::from_str(doc).unwrap();
        assert_eq!(cert.version, 3);
        assert_eq!(cert.not_before, utc_date(2016, 1, 1));
        assert_eq!(cert.extensions[0].value, vec![0x03, 0x02, 0x05, 0xa0]);
        assert_eq!(
            cert.raw_not_before.as_ref().map(|t| t.tag.number()),
            Some(24)
        );
        match &cert.public_key {
            PublicKey::Dsa { p, y, .. } => {
                assert_eq!(*p, BigUint::from(23u32));
                assert_eq!(*y, BigUint::from(4u32));
            }
            other => panic!("unexpected key {:?}", other),
        }
        assert!(cert.is_subscriber());
    }

    #[test]
    fn test_rejects_bad_hex() {
        let doc = r#"{
            "version": 3,
            "not_before": "2016-01-01T00:00:00Z",
            "not_after": "2017-01-01T00:00:00Z",
            "public_key": { "algorithm": "rsa", "modulus": "zz", "exponent": 3 }
        }"#;
        assert!(serde_json::from_str::<Certificate>(doc).is_err());
    }

    #[test]
    fn test_subscriber_classification() {
        let mut cert = Certificate::new(
            3,
            utc_date(2020, 1, 1),
            utc_date(2021, 1, 1),
            PublicKey::Ed25519,
        );
        // empty subject == empty issuer
        assert!(cert.is_self_issued());
        assert!(!cert.is_subscriber());

        cert.subject.common_name.push("leaf".into());
        assert!(cert.is_subscriber());

        cert.basic_constraints = Some(BasicConstraints {
            ca: true,
            path_len: None,
        });
        assert!(!cert.is_subscriber());
    }

    #[test]
    fn test_name_attributes_order() {
        let name = Name {
            common_name: vec!["cn".into()],
            country: vec!["US".into()],
            given_name: vec!["Ada".into(), "Grace".into()],
            ..Name::default()
        };
        let attrs: Vec<_> = name.attributes().collect();
        assert_eq!(
            attrs,
            vec![("C", "US"), ("CN", "cn"), ("GN", "Ada"), ("GN", "Grace")]
        );
        assert!(Name::default().is_empty());
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Certificate::load(&path).unwrap_err();
        assert!(matches!(err, CertLoadError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));

        let missing = Certificate::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, CertLoadError::Io { .. }));
    }
}
