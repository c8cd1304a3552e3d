//! Resume tailoring: bullet generation, pooling, allocation and the page-fit loop.

pub mod bullet_generator;
pub mod bullet_pool;
pub mod handlers;
pub mod page_fit;
pub mod pipeline;
pub mod populator;
pub mod prompts;
pub mod section;
pub mod tracker;
