pub mod dashboard_profile;
