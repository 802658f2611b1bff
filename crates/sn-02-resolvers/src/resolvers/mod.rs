//! Resolver implementations, their container and the finder.

mod builder;
mod common;
pub mod container;
pub mod finder;
pub mod header;
pub mod miniblock;
pub mod tx;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::ResolverBuilder;
pub use container::{ResolversContainer, ResolversContainerFactory};
pub use finder::ResolverFinder;
pub use header::{HeaderResolver, HeaderSource};
pub use miniblock::MiniBlockResolver;
pub use tx::TxResolver;
