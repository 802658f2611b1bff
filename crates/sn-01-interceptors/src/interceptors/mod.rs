//! Interceptors: the per-topic admission pipeline.

mod common;
pub mod container;
pub mod multi_data;
pub mod single_data;

#[cfg(test)]
pub(crate) mod test_support;

pub use common::InterceptorBuilder;
pub use container::{InterceptorsContainer, InterceptorsContainerFactory, ProcessorSet};
pub use multi_data::MultiDataInterceptor;
pub use single_data::SingleDataInterceptor;
