use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Read};

/// SHA-256 digest of a class file's raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Drains `reader` through SHA-256. Returns the digest and the number of bytes read.
pub fn hash_reader<R: Read + ?Sized>(reader: &mut R) -> io::Result<(ContentHash, u64)> {
    let mut hasher = Sha256::new();
    let size = io::copy(reader, &mut hasher)?;
    Ok((ContentHash(hasher.finalize().into()), size))
}

pub fn hash_bytes(content: &[u8]) -> ContentHash {
    ContentHash(Sha256::digest(content).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn hashing_is_deterministic() {
        let bytes = b"\xCA\xFE\xBA\xBE\x00\x00\x00\x41";
        assert_eq!(hash_bytes(bytes), hash_bytes(bytes));

        let (streamed, size) = hash_reader(&mut Cursor::new(&bytes[..])).unwrap();
        assert_eq!(streamed, hash_bytes(bytes));
        assert_eq!(size, bytes.len() as u64);
    }

    #[test]
    fn one_byte_changes_the_hash() {
        assert_ne!(hash_bytes(b"class A"), hash_bytes(b"class B"));
    }

    #[test]
    fn displays_as_lowercase_hex() {
        let hash = hash_bytes(b"");
        assert_eq!(
            hash.to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
