/// KMS-backed data key unwrapping
use crate::crypto::DataKeyDecryptor;
use crate::error::HubmailError;
use async_trait::async_trait;
use aws_sdk_kms::primitives::Blob;
use std::collections::HashMap;

pub struct KmsDataKeyDecryptor {
    client: aws_sdk_kms::Client,
}

impl KmsDataKeyDecryptor {
    pub fn new(client: aws_sdk_kms::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataKeyDecryptor for KmsDataKeyDecryptor {
    async fn decrypt_data_key(
        &self,
        key_id: &str,
        ciphertext: &[u8],
        encryption_context: &HashMap<String, String>,
    ) -> Result<Vec<u8>, HubmailError> {
        let response = self
            .client
            .decrypt()
            .key_id(key_id)
            .ciphertext_blob(Blob::new(ciphertext))
            .set_encryption_context(Some(encryption_context.clone()))
            .send()
            .await
            .map_err(|e| HubmailError::Decrypt(format!("KMS decrypt failed: {}", e)))?;

        if response.key_id() != Some(key_id) {
            return Err(HubmailError::Decrypt(format!(
                "KMS decrypted with unexpected key {:?}",
                response.key_id()
            )));
        }

        response
            .plaintext()
            .map(|blob| blob.as_ref().to_vec())
            .ok_or_else(|| HubmailError::Decrypt("KMS returned no plaintext".to_string()))
    }
}
