pub mod photo;
pub mod project;
pub mod task;

pub use photo::Entity as Photo;
pub use project::Entity as Project;
pub use task::Entity as Task;
