// Repository factory and its sealed bindings

pub mod bindings;
pub mod repository;
pub mod traits;

pub use bindings::{BindingSlot, Bindings, TypeBinding};
pub use repository::{OnMissing, Repository, RepositoryBuilder};
pub use traits::{ColumnOf, CrudRepository, EntityOf, Fields, ModelOf};
