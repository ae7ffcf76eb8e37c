pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{Page, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
