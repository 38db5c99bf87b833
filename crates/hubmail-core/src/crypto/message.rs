/// Envelope message parsing (header, body frames, footer)
use super::suite::{AlgorithmSuite, COMMITMENT_LEN, IV_LEN, TAG_LEN};
use crate::error::HubmailError;
use std::collections::HashMap;

pub const FRAME_AAD: &[u8] = b"AWSKMSEncryptionClient Frame";
pub const FINAL_FRAME_AAD: &[u8] = b"AWSKMSEncryptionClient Final Frame";
pub const SINGLE_BLOCK_AAD: &[u8] = b"AWSKMSEncryptionClient Single Block";

const FINAL_FRAME_MARKER: u32 = 0xFFFF_FFFF;
const V1_MESSAGE_TYPE: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    NonFramed,
    Framed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedDataKey {
    pub provider_id: String,
    pub provider_info: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct MessageHeader {
    pub version: u8,
    pub suite: AlgorithmSuite,
    pub message_id: Vec<u8>,
    pub encryption_context: HashMap<String, String>,
    pub encrypted_data_keys: Vec<EncryptedDataKey>,
    pub content_type: ContentType,
    pub frame_length: u32,
    /// Key commitment, only present for committing suites
    pub suite_data: Option<Vec<u8>>,
    /// Serialized header up to, not including, the authentication fields
    pub body_bytes: Vec<u8>,
    pub auth_iv: [u8; IV_LEN],
    pub auth_tag: [u8; TAG_LEN],
}

/// One authenticated chunk of content
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub sequence: u32,
    pub iv: &'a [u8],
    pub ciphertext: &'a [u8],
    pub tag: &'a [u8],
    pub is_final: bool,
}

impl Frame<'_> {
    /// Additional authenticated data bound to this frame
    pub fn aad(&self, message_id: &[u8], content_type: ContentType) -> Vec<u8> {
        let label = match (content_type, self.is_final) {
            (ContentType::NonFramed, _) => SINGLE_BLOCK_AAD,
            (ContentType::Framed, true) => FINAL_FRAME_AAD,
            (ContentType::Framed, false) => FRAME_AAD,
        };

        let mut aad = Vec::with_capacity(message_id.len() + label.len() + 12);
        aad.extend_from_slice(message_id);
        aad.extend_from_slice(label);
        aad.extend_from_slice(&self.sequence.to_be_bytes());
        aad.extend_from_slice(&(self.ciphertext.len() as u64).to_be_bytes());
        aad
    }
}

/// Big-endian cursor over the raw message
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn consumed(&self) -> &'a [u8] {
        &self.data[..self.pos]
    }

    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8], HubmailError> {
        if self.remaining() < len {
            return Err(HubmailError::Decrypt(format!(
                "Truncated message: needed {} bytes at offset {}, {} left",
                len,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn u8(&mut self) -> Result<u8, HubmailError> {
        Ok(self.bytes(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, HubmailError> {
        let b = self.bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn u32(&mut self) -> Result<u32, HubmailError> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn u64(&mut self) -> Result<u64, HubmailError> {
        let b = self.bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(u64::from_be_bytes(buf))
    }

    /// u16 length prefix followed by that many bytes
    pub fn short_prefixed(&mut self) -> Result<&'a [u8], HubmailError> {
        let len = self.u16()? as usize;
        self.bytes(len)
    }
}

fn utf8(bytes: &[u8], what: &str) -> Result<String, HubmailError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| HubmailError::Decrypt(format!("{} is not valid UTF-8", what)))
}

fn parse_encryption_context(bytes: &[u8]) -> Result<HashMap<String, String>, HubmailError> {
    let mut context = HashMap::new();
    if bytes.is_empty() {
        return Ok(context);
    }

    let mut reader = Reader::new(bytes);
    let count = reader.u16()?;
    for _ in 0..count {
        let key = utf8(reader.short_prefixed()?, "Encryption context key")?;
        let value = utf8(reader.short_prefixed()?, "Encryption context value")?;
        if context.insert(key, value).is_some() {
            return Err(HubmailError::Decrypt(
                "Duplicate encryption context key".to_string(),
            ));
        }
    }

    if reader.remaining() != 0 {
        return Err(HubmailError::Decrypt(
            "Trailing bytes in encryption context".to_string(),
        ));
    }
    Ok(context)
}

fn parse_data_keys(reader: &mut Reader<'_>) -> Result<Vec<EncryptedDataKey>, HubmailError> {
    let count = reader.u16()?;
    if count == 0 {
        return Err(HubmailError::Decrypt(
            "Message has no encrypted data keys".to_string(),
        ));
    }

    (0..count)
        .map(|_| -> Result<EncryptedDataKey, HubmailError> {
            Ok(EncryptedDataKey {
                provider_id: utf8(reader.short_prefixed()?, "Key provider id")?,
                provider_info: reader.short_prefixed()?.to_vec(),
                ciphertext: reader.short_prefixed()?.to_vec(),
            })
        })
        .collect()
}

fn parse_content_type(byte: u8) -> Result<ContentType, HubmailError> {
    match byte {
        0x01 => Ok(ContentType::NonFramed),
        0x02 => Ok(ContentType::Framed),
        other => Err(HubmailError::Decrypt(format!(
            "Unknown content type 0x{:02X}",
            other
        ))),
    }
}

impl MessageHeader {
    /// Parses the header, leaving `reader` at the first body byte
    pub fn parse(reader: &mut Reader<'_>) -> Result<Self, HubmailError> {
        let start = reader.position();
        let version = reader.u8()?;

        match version {
            0x01 => {
                let message_type = reader.u8()?;
                if message_type != V1_MESSAGE_TYPE {
                    return Err(HubmailError::Decrypt(format!(
                        "Unknown message type 0x{:02X}",
                        message_type
                    )));
                }
            }
            0x02 => {}
            other => {
                return Err(HubmailError::Decrypt(format!(
                    "Unsupported message format version {}",
                    other
                )));
            }
        }

        let suite = AlgorithmSuite::from_id(reader.u16()?)?;
        if suite.message_version() != version {
            return Err(HubmailError::Decrypt(format!(
                "Algorithm suite 0x{:04X} is not valid for message version {}",
                suite.id, version
            )));
        }

        let message_id_len = if version == 0x01 { 16 } else { 32 };
        let message_id = reader.bytes(message_id_len)?.to_vec();
        let encryption_context = parse_encryption_context(reader.short_prefixed()?)?;
        let encrypted_data_keys = parse_data_keys(reader)?;
        let content_type = parse_content_type(reader.u8()?)?;

        let (frame_length, suite_data) = if version == 0x01 {
            if reader.bytes(4)?.iter().any(|b| *b != 0) {
                return Err(HubmailError::Decrypt(
                    "Reserved header field is not zero".to_string(),
                ));
            }
            let iv_len = reader.u8()? as usize;
            if iv_len != IV_LEN {
                return Err(HubmailError::Decrypt(format!(
                    "Unexpected IV length {}",
                    iv_len
                )));
            }
            (reader.u32()?, None)
        } else {
            let frame_length = reader.u32()?;
            (frame_length, Some(reader.bytes(COMMITMENT_LEN)?.to_vec()))
        };

        if content_type == ContentType::Framed && frame_length == 0 {
            return Err(HubmailError::Decrypt(
                "Framed message with zero frame length".to_string(),
            ));
        }

        let body_bytes = reader.consumed()[start..].to_vec();

        let mut auth_iv = [0u8; IV_LEN];
        if version == 0x01 {
            auth_iv.copy_from_slice(reader.bytes(IV_LEN)?);
        }
        let mut auth_tag = [0u8; TAG_LEN];
        auth_tag.copy_from_slice(reader.bytes(TAG_LEN)?);

        Ok(Self {
            version,
            suite,
            message_id,
            encryption_context,
            encrypted_data_keys,
            content_type,
            frame_length,
            suite_data,
            body_bytes,
            auth_iv,
            auth_tag,
        })
    }
}

/// Reads every body frame in order, checking sequence numbers
pub fn read_frames<'a>(
    reader: &mut Reader<'a>,
    header: &MessageHeader,
) -> Result<Vec<Frame<'a>>, HubmailError> {
    match header.content_type {
        ContentType::NonFramed => {
            let iv = reader.bytes(IV_LEN)?;
            let len = usize::try_from(reader.u64()?).map_err(|_| {
                HubmailError::Decrypt("Content length does not fit in memory".to_string())
            })?;
            let ciphertext = reader.bytes(len)?;
            let tag = reader.bytes(TAG_LEN)?;
            Ok(vec![Frame {
                sequence: 1,
                iv,
                ciphertext,
                tag,
                is_final: true,
            }])
        }
        ContentType::Framed => {
            let mut frames = Vec::new();
            let mut expected: u32 = 1;
            loop {
                let marker = reader.u32()?;
                let is_final = marker == FINAL_FRAME_MARKER;
                let sequence = if is_final { reader.u32()? } else { marker };
                if sequence != expected {
                    return Err(HubmailError::Decrypt(format!(
                        "Frame out of order: expected {}, got {}",
                        expected, sequence
                    )));
                }

                let iv = reader.bytes(IV_LEN)?;
                let len = if is_final {
                    let len = reader.u32()?;
                    if len > header.frame_length {
                        return Err(HubmailError::Decrypt(
                            "Final frame longer than frame length".to_string(),
                        ));
                    }
                    len
                } else {
                    header.frame_length
                };
                let ciphertext = reader.bytes(len as usize)?;
                let tag = reader.bytes(TAG_LEN)?;

                frames.push(Frame {
                    sequence,
                    iv,
                    ciphertext,
                    tag,
                    is_final,
                });

                if is_final {
                    return Ok(frames);
                }
                expected = expected.checked_add(1).ok_or_else(|| {
                    HubmailError::Decrypt("Frame sequence number overflow".to_string())
                })?;
            }
        }
    }
}
