pub mod actor;
pub mod session;
pub mod verification;

pub use actor::PostgresActorStore;
pub use session::PostgresSessionStore;
pub use verification::PostgresVerificationEventStore;
