pub mod sqlite_booking_repo;
pub mod sqlite_court_repo;
pub mod sqlite_payment_repo;
pub mod sqlite_tournament_repo;
pub mod sqlite_user_repo;

pub mod postgres_booking_repo;
pub mod postgres_court_repo;
pub mod postgres_payment_repo;
pub mod postgres_tournament_repo;
pub mod postgres_user_repo;
