pub mod followed_trader;
pub mod notification_settings;
pub mod profile;
pub mod tracked_wallet;

pub use followed_trader::FollowedTrader;
pub use notification_settings::NotificationSettings;
pub use profile::Profile;
pub use tracked_wallet::{normalize_wallet_address, TrackedWallet};
