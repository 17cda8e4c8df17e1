pub mod import;
pub mod run;
pub mod sources;
