// Each domain contains: mod.rs, resolvers.rs, types.rs

pub mod draft;
pub mod notifications;
pub mod players;
pub mod prospects;
pub mod results;
pub mod seasons;
pub mod standings;
