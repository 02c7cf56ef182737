//! Repository layer - Data access abstraction
//!
//! Each resource type has one repository trait (the seam handlers depend
//! on) and one file-backed implementation. Implementations keep an
//! ordered-by-id map behind a coarse mutex and rewrite their snapshot file
//! on every mutation, so concurrent operations on the same store serialize
//! while different stores stay independent.

mod cupboard_repository;
mod session_repository;
mod user_repository;

pub use cupboard_repository::{CupboardFileStore, CupboardRepository};
pub use session_repository::{SessionFileStore, SessionRepository};
pub use user_repository::{UserFileStore, UserRepository};

#[cfg(test)]
pub use cupboard_repository::MockCupboardRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
