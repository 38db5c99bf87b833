/// Algorithm suites of the envelope message format
use crate::error::HubmailError;

/// Key derivation applied to the unwrapped data key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kdf {
    /// Data key is the content key
    Identity,
    HkdfSha256,
    HkdfSha384,
    /// HKDF-SHA512 with a key commitment check
    HkdfSha512Commit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmSuite {
    pub id: u16,
    /// AES key length in bytes
    pub key_len: usize,
    pub kdf: Kdf,
    /// Footer carries an ECDSA P-384 signature
    pub signed: bool,
}

pub const IV_LEN: usize = 12;
pub const TAG_LEN: usize = 16;
pub const COMMITMENT_LEN: usize = 32;

impl AlgorithmSuite {
    pub fn from_id(id: u16) -> Result<Self, HubmailError> {
        let (key_len, kdf, signed) = match id {
            0x0014 => (16, Kdf::Identity, false),
            0x0078 => (32, Kdf::Identity, false),
            0x0114 => (16, Kdf::HkdfSha256, false),
            0x0178 => (32, Kdf::HkdfSha256, false),
            0x0378 => (32, Kdf::HkdfSha384, true),
            0x0478 => (32, Kdf::HkdfSha512Commit, false),
            0x0578 => (32, Kdf::HkdfSha512Commit, true),
            0x0046 | 0x0146 | 0x0214 | 0x0346 => {
                return Err(HubmailError::Decrypt(format!(
                    "Unsupported algorithm suite 0x{:04X}",
                    id
                )));
            }
            _ => {
                return Err(HubmailError::Decrypt(format!(
                    "Unknown algorithm suite 0x{:04X}",
                    id
                )));
            }
        };

        Ok(Self {
            id,
            key_len,
            kdf,
            signed,
        })
    }

    pub fn is_committing(&self) -> bool {
        self.kdf == Kdf::HkdfSha512Commit
    }

    /// Message format version this suite is serialized with
    pub fn message_version(&self) -> u8 {
        if self.is_committing() { 2 } else { 1 }
    }
}
