pub mod compile;
pub mod watch;
