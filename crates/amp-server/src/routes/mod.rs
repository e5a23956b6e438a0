pub mod actions;
pub mod areas;
pub mod inbox;
pub mod overview;
pub mod projects;
pub mod reviews;
pub mod settings;
pub mod users;
