/// Decrypt-only envelope message client bound to a single KMS key
use super::message::{ContentType, MessageHeader, Reader, read_frames};
use super::suite::{AlgorithmSuite, COMMITMENT_LEN, Kdf};
use crate::error::HubmailError;
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, Nonce};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hkdf::Hkdf;
use p384::ecdsa::signature::Verifier;
use p384::ecdsa::{Signature, VerifyingKey};
use sha2::{Sha256, Sha384, Sha512};
use std::collections::HashMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

pub const KMS_PROVIDER_ID: &str = "aws-kms";
pub const PUBLIC_KEY_CONTEXT_KEY: &str = "aws-crypto-public-key";

const DERIVE_KEY_LABEL: &[u8] = b"DERIVEKEY";
const COMMIT_KEY_LABEL: &[u8] = b"COMMITKEY";

/// Unwraps an encrypted data key with the master key it was wrapped under
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataKeyDecryptor: Send + Sync {
    async fn decrypt_data_key(
        &self,
        key_id: &str,
        ciphertext: &[u8],
        encryption_context: &HashMap<String, String>,
    ) -> Result<Vec<u8>, HubmailError>;
}

/// Turns the base64 `code` of a trigger event into plaintext bytes
#[async_trait]
pub trait CodeDecryptor: Send + Sync {
    async fn decrypt(&self, code: &str) -> Result<Vec<u8>, HubmailError>;
}

/// Which algorithm suites a decrypt call will accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitmentPolicy {
    /// Never encrypt; decrypt committing and legacy messages alike
    #[default]
    ForbidEncryptAllowDecrypt,
    /// Only decrypt messages whose suite commits to its key
    RequireEncryptRequireDecrypt,
}

impl CommitmentPolicy {
    pub fn allows(&self, suite: &AlgorithmSuite) -> bool {
        match self {
            Self::ForbidEncryptAllowDecrypt => true,
            Self::RequireEncryptRequireDecrypt => suite.is_committing(),
        }
    }
}

enum ContentCipher {
    Aes128(Aes128Gcm),
    Aes256(Aes256Gcm),
}

impl ContentCipher {
    fn new(key: &[u8]) -> Result<Self, HubmailError> {
        let invalid = |_| HubmailError::Decrypt(format!("Invalid content key length {}", key.len()));
        match key.len() {
            16 => Ok(Self::Aes128(Aes128Gcm::new_from_slice(key).map_err(invalid)?)),
            32 => Ok(Self::Aes256(Aes256Gcm::new_from_slice(key).map_err(invalid)?)),
            other => Err(HubmailError::Decrypt(format!(
                "Invalid content key length {}",
                other
            ))),
        }
    }

    fn open(
        &self,
        iv: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, HubmailError> {
        let mut sealed = Vec::with_capacity(ciphertext.len() + tag.len());
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);
        let payload = Payload { msg: &sealed, aad };

        let result = match self {
            Self::Aes128(cipher) => cipher.decrypt(Nonce::from_slice(iv), payload),
            Self::Aes256(cipher) => cipher.decrypt(Nonce::from_slice(iv), payload),
        };
        result.map_err(|_| HubmailError::Decrypt("Authentication tag mismatch".to_string()))
    }
}

/// Envelope decryptor restricted to one KMS key.
///
/// Only encrypted data keys wrapped by `key_id` are attempted. There is no
/// encrypt path.
pub struct EnvelopeCodeDecryptor {
    key_id: String,
    data_keys: Arc<dyn DataKeyDecryptor>,
    policy: CommitmentPolicy,
}

impl EnvelopeCodeDecryptor {
    pub fn new(
        key_id: impl Into<String>,
        data_keys: Arc<dyn DataKeyDecryptor>,
    ) -> Result<Self, HubmailError> {
        let key_id = key_id.into();
        if key_id.trim().is_empty() {
            return Err(HubmailError::Config(format!(
                "Invalid KMS key ARN {:?}",
                key_id
            )));
        }

        Ok(Self {
            key_id,
            data_keys,
            policy: CommitmentPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: CommitmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Decrypts a raw (already base64-decoded) envelope message
    pub async fn decrypt_message(&self, message: &[u8]) -> Result<Vec<u8>, HubmailError> {
        let mut reader = Reader::new(message);
        let header = MessageHeader::parse(&mut reader)?;

        if !self.policy.allows(&header.suite) {
            return Err(HubmailError::Decrypt(format!(
                "Algorithm suite 0x{:04X} is not allowed by commitment policy {:?}",
                header.suite.id, self.policy
            )));
        }

        let has_public_key = header
            .encryption_context
            .contains_key(PUBLIC_KEY_CONTEXT_KEY);
        if has_public_key != header.suite.signed {
            return Err(HubmailError::Decrypt(
                "Signing public key does not match algorithm suite".to_string(),
            ));
        }

        let data_key = self.unwrap_data_key(&header).await?;
        let content_key = derive_content_key(&header, &data_key)?;
        let cipher = ContentCipher::new(&content_key)?;

        cipher
            .open(&header.auth_iv, &[], &header.auth_tag, &header.body_bytes)
            .map_err(|_| HubmailError::Decrypt("Header authentication failed".to_string()))?;

        let frames = read_frames(&mut reader, &header)?;
        let mut plaintext = Vec::new();
        for frame in &frames {
            let aad = frame.aad(&header.message_id, header.content_type);
            let chunk = cipher.open(frame.iv, frame.ciphertext, frame.tag, &aad)?;
            plaintext.extend_from_slice(&chunk);
        }

        if header.suite.signed {
            let signed_len = reader.position();
            let signature = reader.short_prefixed()?;
            verify_signature(&header, &message[..signed_len], signature)?;
        }

        if reader.remaining() != 0 {
            return Err(HubmailError::Decrypt(format!(
                "{} trailing bytes after message",
                reader.remaining()
            )));
        }

        debug!(
            suite_id = header.suite.id,
            framed = header.content_type == ContentType::Framed,
            frames = frames.len(),
            "Decrypted envelope message"
        );

        Ok(plaintext)
    }

    async fn unwrap_data_key(&self, header: &MessageHeader) -> Result<Vec<u8>, HubmailError> {
        let mut last_error = None;

        let candidates = header.encrypted_data_keys.iter().filter(|edk| {
            edk.provider_id == KMS_PROVIDER_ID && edk.provider_info == self.key_id.as_bytes()
        });

        for edk in candidates {
            match self
                .data_keys
                .decrypt_data_key(&self.key_id, &edk.ciphertext, &header.encryption_context)
                .await
            {
                Ok(key) if key.len() == header.suite.key_len => return Ok(key),
                Ok(key) => {
                    last_error = Some(HubmailError::Decrypt(format!(
                        "Data key has length {}, suite needs {}",
                        key.len(),
                        header.suite.key_len
                    )));
                }
                Err(e) => {
                    warn!(error = %e, "Failed to unwrap encrypted data key");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            HubmailError::Decrypt("No encrypted data key was wrapped by the configured key".to_string())
        }))
    }
}

#[async_trait]
impl CodeDecryptor for EnvelopeCodeDecryptor {
    async fn decrypt(&self, code: &str) -> Result<Vec<u8>, HubmailError> {
        let message = STANDARD.decode(code.trim())?;
        self.decrypt_message(&message).await
    }
}

fn derive_content_key(header: &MessageHeader, data_key: &[u8]) -> Result<Vec<u8>, HubmailError> {
    let suite = &header.suite;
    let expand_failed = |_| HubmailError::Decrypt("Key derivation failed".to_string());
    let mut key = vec![0u8; suite.key_len];

    let mut legacy_info = suite.id.to_be_bytes().to_vec();
    legacy_info.extend_from_slice(&header.message_id);

    match suite.kdf {
        Kdf::Identity => key.copy_from_slice(data_key),
        Kdf::HkdfSha256 => Hkdf::<Sha256>::new(None, data_key)
            .expand(&legacy_info, &mut key)
            .map_err(expand_failed)?,
        Kdf::HkdfSha384 => Hkdf::<Sha384>::new(None, data_key)
            .expand(&legacy_info, &mut key)
            .map_err(expand_failed)?,
        Kdf::HkdfSha512Commit => {
            let hkdf = Hkdf::<Sha512>::new(Some(&header.message_id), data_key);

            let mut info = suite.id.to_be_bytes().to_vec();
            info.extend_from_slice(DERIVE_KEY_LABEL);
            hkdf.expand(&info, &mut key).map_err(expand_failed)?;

            let mut commitment = [0u8; COMMITMENT_LEN];
            hkdf.expand(COMMIT_KEY_LABEL, &mut commitment)
                .map_err(expand_failed)?;

            let expected = header.suite_data.as_deref().unwrap_or_default();
            if !bool::from(commitment.as_slice().ct_eq(expected)) {
                return Err(HubmailError::Decrypt(
                    "Key commitment does not match".to_string(),
                ));
            }
        }
    }

    Ok(key)
}

fn verify_signature(
    header: &MessageHeader,
    signed: &[u8],
    signature: &[u8],
) -> Result<(), HubmailError> {
    let encoded = header
        .encryption_context
        .get(PUBLIC_KEY_CONTEXT_KEY)
        .ok_or_else(|| HubmailError::Decrypt("Missing signing public key".to_string()))?;

    let point = STANDARD.decode(encoded)?;
    let verifying_key = VerifyingKey::from_sec1_bytes(&point)
        .map_err(|_| HubmailError::Decrypt("Invalid signing public key".to_string()))?;
    let signature = Signature::from_der(signature)
        .map_err(|_| HubmailError::Decrypt("Malformed message signature".to_string()))?;

    verifying_key
        .verify(signed, &signature)
        .map_err(|_| HubmailError::Decrypt("Message signature verification failed".to_string()))
}
