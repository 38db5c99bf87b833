/// Envelope-encrypted code decryption
///
/// The user pool wraps verification codes in an encryption SDK message: a
/// data key wrapped by KMS, HKDF key derivation, AES-GCM frames and, for the
/// default suite, an ECDSA P-384 footer signature. Only decryption exists
/// here.
pub mod decryptor;
pub mod message;
pub mod suite;

pub use decryptor::{
    CodeDecryptor, CommitmentPolicy, DataKeyDecryptor, EnvelopeCodeDecryptor, KMS_PROVIDER_ID,
};
pub use suite::AlgorithmSuite;
