//! Encoded forms of an email address used as search needles.

use base64::Engine as _;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use super::murmur;

/// Number of entries every catalog holds.
pub const CATALOG_SIZE: usize = 25;

/// One named encoding of a plaintext value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedValue {
    pub name: &'static str,
    pub value: String,
}

impl EncodedValue {
    fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// The fixed, ordered set of encodings of one address.
///
/// Composition and order never change, so catalogs for equal inputs are
/// equal. All numeric outputs are unsigned; hex forms are lowercase without
/// leading zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingCatalog {
    entries: Vec<EncodedValue>,
}

impl EncodingCatalog {
    pub fn for_address(address: &str) -> Self {
        let bytes = address.as_bytes();
        let mut entries = Vec::with_capacity(CATALOG_SIZE);

        entries.push(EncodedValue::new("raw", address));
        entries.push(EncodedValue::new(
            "urlencoded",
            url::form_urlencoded::byte_serialize(bytes).collect::<String>(),
        ));
        entries.push(EncodedValue::new(
            "base64",
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes),
        ));

        entries.push(EncodedValue::new("md5", hex::encode(Md5::digest(bytes))));
        entries.push(EncodedValue::new("sha1", hex::encode(Sha1::digest(bytes))));
        entries.push(EncodedValue::new("sha224", hex::encode(Sha224::digest(bytes))));
        entries.push(EncodedValue::new("sha256", hex::encode(Sha256::digest(bytes))));
        entries.push(EncodedValue::new("sha384", hex::encode(Sha384::digest(bytes))));
        entries.push(EncodedValue::new("sha512", hex::encode(Sha512::digest(bytes))));

        let crc = crc32fast::hash(bytes);
        let adler = adler2::adler32_slice(bytes);
        push_numeric(&mut entries, "crc32", "crc32-hex", crc as u64);
        push_numeric(&mut entries, "adler32", "adler32-hex", adler as u64);

        push_numeric(&mut entries, "mmh1", "mmh1-hex", murmur::murmur1_32(bytes, 0) as u64);
        push_numeric(&mut entries, "mmh2", "mmh2-hex", murmur::murmur2_32(bytes, 0) as u64);
        push_numeric(&mut entries, "mmh2-64", "mmh2-64-hex", murmur::murmur2_64(bytes, 0));
        push_numeric(&mut entries, "mmh3-32", "mmh3-32-hex", murmur::murmur3_32(bytes, 0) as u64);

        let (h1, h2) = murmur::murmur3_128(bytes, 0);
        push_numeric(&mut entries, "mmh3-128-1", "mmh3-128-1-hex", h1);
        push_numeric(&mut entries, "mmh3-128-2", "mmh3-128-2-hex", h2);

        debug_assert_eq!(entries.len(), CATALOG_SIZE);
        Self { entries }
    }

    pub fn entries(&self) -> &[EncodedValue] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EncodedValue> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&EncodedValue> {
        self.entries.iter().find(|e| e.name == name)
    }
}

impl<'a> IntoIterator for &'a EncodingCatalog {
    type Item = &'a EncodedValue;
    type IntoIter = std::slice::Iter<'a, EncodedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn push_numeric(entries: &mut Vec<EncodedValue>, name: &'static str, hex_name: &'static str, n: u64) {
    entries.push(EncodedValue::new(name, n.to_string()));
    entries.push(EncodedValue::new(hex_name, format!("{n:x}")));
}
