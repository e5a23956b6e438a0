pub mod capture;
pub mod inbox;
pub mod init;
pub mod review;
pub mod serve;
pub mod triage;
