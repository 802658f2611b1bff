//! Request wire format.
//!
//! A request is a `RequestData` encoded with the shared codec and sent on
//! `<topic>_REQUEST`. The value depends on the kind:
//!
//! | Kind        | Value                                  |
//! |-------------|----------------------------------------|
//! | `Hash`      | the 32-byte hash                       |
//! | `Nonce`     | the nonce, 8 bytes big-endian          |
//! | `HashArray` | a codec-encoded `Batch` of 32-byte hashes |

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_types::{codec, Batch, CodecError, Hash, HASH_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestDataKind {
    Hash,
    Nonce,
    HashArray,
}

impl RequestDataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestDataKind::Hash => "hash",
            RequestDataKind::Nonce => "nonce",
            RequestDataKind::HashArray => "hash_array",
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestData {
    pub kind: RequestDataKind,
    #[serde_as(as = "Bytes")]
    pub value: Vec<u8>,
}

impl RequestData {
    pub fn from_hash(hash: &Hash) -> Self {
        Self {
            kind: RequestDataKind::Hash,
            value: hash.to_vec(),
        }
    }

    pub fn from_nonce(nonce: u64) -> Self {
        Self {
            kind: RequestDataKind::Nonce,
            value: nonce.to_be_bytes().to_vec(),
        }
    }

    pub fn from_hashes(hashes: &[Hash]) -> Result<Self, CodecError> {
        let batch = Batch::new(hashes.iter().map(|h| h.to_vec()).collect());
        Ok(Self {
            kind: RequestDataKind::HashArray,
            value: codec::encode(&batch)?,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        codec::decode(bytes)
    }

    /// The requested hash, for `Hash` requests.
    pub fn hash(&self) -> Result<Hash, CodecError> {
        to_hash(&self.value)
    }

    /// The requested nonce, for `Nonce` requests.
    pub fn nonce(&self) -> Result<u64, CodecError> {
        let bytes: [u8; 8] = self.value.as_slice().try_into().map_err(|_| {
            CodecError::Decode(format!("nonce must be 8 bytes, got {}", self.value.len()))
        })?;
        Ok(u64::from_be_bytes(bytes))
    }

    /// The requested hashes, for `HashArray` requests.
    pub fn hashes(&self) -> Result<Vec<Hash>, CodecError> {
        let batch: Batch = codec::decode(&self.value)?;
        batch.data.iter().map(|h| to_hash(h)).collect()
    }
}

fn to_hash(bytes: &[u8]) -> Result<Hash, CodecError> {
    bytes.try_into().map_err(|_| {
        CodecError::Decode(format!("hash must be {HASH_LEN} bytes, got {}", bytes.len()))
    })
}
