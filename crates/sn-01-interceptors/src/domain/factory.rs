//! Topic-bound factory turning raw batch elements into intercepted data.

use shared_types::{codec, MetaHeader, MiniBlock, ShardCoordinator, ShardHeader, Transaction};

use crate::domain::intercepted::{
    DataKind, InterceptContext, InterceptedData, InterceptedMetaHeader, InterceptedMiniBlock,
    InterceptedShardHeader, InterceptedTransaction,
};
use crate::events::{FactoryError, InterceptorError};

/// Deserializes one raw payload into exactly one known variant.
pub trait InterceptedDataFactory: Send + Sync {
    fn create(&self, buff: &[u8]) -> Result<InterceptedData, FactoryError>;
}

/// Factory for the payload kind carried on one topic family.
#[derive(Debug, Clone)]
pub struct TopicDataFactory {
    kind: DataKind,
    ctx: InterceptContext,
}

impl TopicDataFactory {
    pub fn new(
        kind: DataKind,
        coordinator: ShardCoordinator,
        chain_id: Vec<u8>,
    ) -> Result<Self, InterceptorError> {
        if chain_id.is_empty() {
            return Err(InterceptorError::InvalidConfig("empty chain id".to_string()));
        }
        Ok(Self {
            kind,
            ctx: InterceptContext {
                coordinator,
                chain_id,
            },
        })
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }
}

impl InterceptedDataFactory for TopicDataFactory {
    fn create(&self, buff: &[u8]) -> Result<InterceptedData, FactoryError> {
        let ctx = self.ctx.clone();
        let data = match self.kind {
            DataKind::Transaction => {
                let tx: Transaction = codec::decode(buff).map_err(FactoryError::Decode)?;
                let hash = codec::hash_of(&tx).map_err(FactoryError::Hashing)?;
                InterceptedData::Transaction(InterceptedTransaction::new(tx, hash, ctx))
            }
            DataKind::ShardHeader => {
                let header: ShardHeader = codec::decode(buff).map_err(FactoryError::Decode)?;
                let hash = codec::hash_of(&header).map_err(FactoryError::Hashing)?;
                InterceptedData::ShardHeader(InterceptedShardHeader::new(header, hash, ctx))
            }
            DataKind::MetaHeader => {
                let header: MetaHeader = codec::decode(buff).map_err(FactoryError::Decode)?;
                let hash = codec::hash_of(&header).map_err(FactoryError::Hashing)?;
                InterceptedData::MetaHeader(InterceptedMetaHeader::new(header, hash, ctx))
            }
            DataKind::MiniBlock => {
                let mini_block: MiniBlock = codec::decode(buff).map_err(FactoryError::Decode)?;
                let hash = codec::hash_of(&mini_block).map_err(FactoryError::Hashing)?;
                InterceptedData::MiniBlock(InterceptedMiniBlock::new(mini_block, hash, ctx))
            }
        };
        Ok(data)
    }
}
