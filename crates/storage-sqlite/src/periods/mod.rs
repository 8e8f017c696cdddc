pub mod model;
pub mod repository;

pub use model::PeriodDB;
pub use repository::PeriodRepository;
