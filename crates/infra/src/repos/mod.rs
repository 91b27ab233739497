pub mod divisions;
pub mod match_results;
pub mod memberships;
pub mod players;
pub mod prospects;
pub mod seasons;
pub mod subscriptions;
pub mod users;

pub use match_results::CreateMatchResult;
pub use memberships::CreateMembership;
pub use players::CreatePlayer;
pub use prospects::{CreateProspect, ProspectStatus};
pub use seasons::CreateSeason;
pub use users::{CreateUser, UpdateUserNames};

/// `%term%` for a case-insensitive `LIKE ... ESCAPE '\'` match, with the
/// term's own wildcard characters taken literally.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
