pub mod resolvers;

pub use resolvers::{DraftMutation, DraftQuery};
