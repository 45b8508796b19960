//! Binding of resolution outcomes to client-visible state.

mod leaderboard;
mod session;
mod view;

pub use leaderboard::{bind_leaderboard, LeaderboardRow};
pub use session::Session;
pub use view::{format_balance, ProfileView, DEFAULT_AVATAR, DEFAULT_NAME};
