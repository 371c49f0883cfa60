pub mod filter_sessions;
