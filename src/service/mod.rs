//! Entity services. Each owns the transaction boundary for its mutations;
//! the league-rule check and the player version guard run inside that
//! boundary so a failure rolls the whole request back.

pub mod league_rule;
pub mod leagues;
pub mod memberships;
pub mod players;
pub mod teams;
pub mod validation;

pub use leagues::{LeagueInclude, LeagueService};
pub use memberships::MembershipService;
pub use players::PlayerService;
pub use teams::{TeamInclude, TeamService};
