use serde::Deserialize;

use crate::normalize::ProposalView;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    /// Not yet executed
    Active,
    /// Executed
    Ended,
}

impl StatusFilter {
    pub fn matches(self, executed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !executed,
            StatusFilter::Ended => executed,
        }
    }
}

/// Case-insensitive substring match on the title. An empty term matches all.
pub fn title_matches(title: &str, term: &str) -> bool {
    term.is_empty() || title.to_lowercase().contains(&term.to_lowercase())
}

/// Status filter AND title search, keeping input order.
pub fn apply<'a>(proposals: &'a [ProposalView], status: StatusFilter, term: &str) -> Vec<&'a ProposalView> {
    proposals
        .iter()
        .filter(|p| status.matches(p.executed) && title_matches(&p.title, term))
        .collect()
}

/// Voting page search: title, or the decimal ID containing the term.
pub fn search_by_title_or_id<'a>(proposals: &'a [ProposalView], term: &str) -> Vec<&'a ProposalView> {
    proposals
        .iter()
        .filter(|p| title_matches(&p.title, term) || p.id.to_string().contains(term))
        .collect()
}
