pub mod idgen;
pub mod ids;

pub use idgen::{IdGenerator, IdStrategy, default_id_strategy, id_generator, set_id_strategy};
pub use ids::{AnchorId, BlockId, ResourceName};
