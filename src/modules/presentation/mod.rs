pub mod page;
pub mod gauge;

pub use page::DashboardPage;
