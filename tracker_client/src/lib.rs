pub mod solanatracker_client;

pub use solanatracker_client::{SolanaTrackerClient, TrackerError, WalletTradesResponse};
