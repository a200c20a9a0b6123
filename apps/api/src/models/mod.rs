pub mod activity;
pub mod placement;
pub mod resume;
pub mod skill;
pub mod student;
pub mod training;
pub mod user;
