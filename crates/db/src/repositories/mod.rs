//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod module_repo;
pub mod path_repo;
pub mod progress_repo;
pub mod question_repo;
pub mod quiz_attempt_repo;
pub mod quiz_purchase_repo;
pub mod quiz_repo;
pub mod resource_repo;
pub mod session_repo;
pub mod user_repo;

pub use module_repo::ModuleRepo;
pub use path_repo::PathRepo;
pub use progress_repo::ProgressRepo;
pub use question_repo::QuestionRepo;
pub use quiz_attempt_repo::QuizAttemptRepo;
pub use quiz_purchase_repo::QuizPurchaseRepo;
pub use quiz_repo::QuizRepo;
pub use resource_repo::ResourceRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
