/// Recording mocks for the sender's external collaborators
use async_trait::async_trait;
use hubmail_core::HubmailError;
use hubmail_core::crypto::{CodeDecryptor, DataKeyDecryptor};
use hubmail_core::email::{HandlebarsTemplateRenderer, TemplateRenderer};
use hubmail_core::models::EmailMessage;
use hubmail_core::services::{MailSender, PasswordAssigner, SecretStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Ordered record of every collaborator call, shared by all mocks of a test
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().unwrap().is_empty()
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .position(|c| c == call)
    }
}

/// Mock code decryptor returning a fixed plaintext or a decrypt error
#[derive(Clone)]
pub struct MockDecryptor {
    log: CallLog,
    plaintext: Arc<Mutex<Option<Vec<u8>>>>,
    pub inputs: Arc<Mutex<Vec<String>>>,
}

impl MockDecryptor {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            plaintext: Arc::new(Mutex::new(None)),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn returns(&self, plaintext: &[u8]) {
        *self.plaintext.lock().unwrap() = Some(plaintext.to_vec());
    }

    pub fn fails(&self) {
        *self.plaintext.lock().unwrap() = None;
    }
}

#[async_trait]
impl CodeDecryptor for MockDecryptor {
    async fn decrypt(&self, code: &str) -> Result<Vec<u8>, HubmailError> {
        self.log.record("decrypt");
        self.inputs.lock().unwrap().push(code.to_string());
        self.plaintext
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| HubmailError::Decrypt("invalid base64 ciphertext".to_string()))
    }
}

/// KMS stand-in for driving the real envelope decryptor
#[derive(Clone)]
pub struct MockKms {
    log: CallLog,
}

impl MockKms {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl DataKeyDecryptor for MockKms {
    async fn decrypt_data_key(
        &self,
        _key_id: &str,
        _ciphertext: &[u8],
        _encryption_context: &HashMap<String, String>,
    ) -> Result<Vec<u8>, HubmailError> {
        self.log.record("kms_decrypt");
        Err(HubmailError::Decrypt("AccessDeniedException".to_string()))
    }
}

/// A recorded password assignment
#[derive(Debug, Clone)]
pub struct PasswordCall {
    pub user_pool_id: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
pub struct MockPasswordAssigner {
    log: CallLog,
    fail: Arc<Mutex<bool>>,
    pub calls: Arc<Mutex<Vec<PasswordCall>>>,
}

impl MockPasswordAssigner {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail: Arc::new(Mutex::new(false)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fails(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<PasswordCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PasswordAssigner for MockPasswordAssigner {
    async fn set_permanent_password(
        &self,
        user_pool_id: &str,
        username: &str,
        password: &str,
    ) -> Result<(), HubmailError> {
        self.log.record("set_permanent_password");
        self.calls.lock().unwrap().push(PasswordCall {
            user_pool_id: user_pool_id.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        });

        if *self.fail.lock().unwrap() {
            return Err(HubmailError::CredentialReset(
                "UserNotFoundException".to_string(),
            ));
        }
        Ok(())
    }
}

/// In-memory parameter store
#[derive(Clone)]
pub struct MockSecretStore {
    log: CallLog,
    pub parameters: Arc<Mutex<HashMap<String, String>>>,
}

impl MockSecretStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            parameters: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn put(&self, name: &str, value: &str) {
        self.parameters
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub fn clear(&self) {
        self.parameters.lock().unwrap().clear();
    }
}

#[async_trait]
impl SecretStore for MockSecretStore {
    async fn get_secret(&self, name: &str) -> Result<String, HubmailError> {
        self.log.record("get_secret");
        match self.parameters.lock().unwrap().get(name) {
            Some(value) if !value.is_empty() => Ok(value.clone()),
            _ => Err(HubmailError::SecretNotFound(format!(
                "SSM parameter {} is empty or not found",
                name
            ))),
        }
    }
}

/// Delegates to the real Handlebars renderer and records the template name
#[derive(Clone)]
pub struct RecordingRenderer {
    log: CallLog,
    inner: Arc<HandlebarsTemplateRenderer>,
}

impl RecordingRenderer {
    pub fn new(log: CallLog, dir: &str) -> Self {
        Self {
            log,
            inner: Arc::new(HandlebarsTemplateRenderer::new(dir)),
        }
    }
}

impl TemplateRenderer for RecordingRenderer {
    fn render(
        &self,
        name: &str,
        context: &HashMap<String, String>,
    ) -> Result<String, HubmailError> {
        self.log.record(format!("render:{}", name));
        self.inner.render(name, context)
    }
}

/// A recorded mail submission
#[derive(Debug, Clone)]
pub struct SentMail {
    pub message: EmailMessage,
    pub api_key: String,
}

#[derive(Clone)]
pub struct MockMailSender {
    log: CallLog,
    fail: Arc<Mutex<bool>>,
    pub sent: Arc<Mutex<Vec<SentMail>>>,
}

impl MockMailSender {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail: Arc::new(Mutex::new(false)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fails(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailSender for MockMailSender {
    async fn send(
        &self,
        message: &EmailMessage,
        api_key: &str,
    ) -> Result<Option<String>, HubmailError> {
        self.log.record("send");

        if *self.fail.lock().unwrap() {
            return Err(HubmailError::MailDelivery(
                "Mail API returned 500 Internal Server Error".to_string(),
            ));
        }

        self.sent.lock().unwrap().push(SentMail {
            message: message.clone(),
            api_key: api_key.to_string(),
        });
        Ok(Some("mock-message-id".to_string()))
    }
}
