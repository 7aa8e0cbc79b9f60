use std::fmt;

/// Keys of the cached queries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    CollectionCards,
    Collections,
    User,
    Stats,
    /// One entry per search string
    Search(String),
    Sets,
}

impl QueryKey {
    /// Queries whose data changes whenever collection membership changes
    pub const COLLECTION_QUERIES: [QueryKey; 3] = [
        QueryKey::CollectionCards,
        QueryKey::Collections,
        QueryKey::Stats,
    ];
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::CollectionCards => write!(f, "collection-cards"),
            QueryKey::Collections => write!(f, "collections"),
            QueryKey::User => write!(f, "user"),
            QueryKey::Stats => write!(f, "stats"),
            QueryKey::Search(q) => write!(f, "search:{}", q),
            QueryKey::Sets => write!(f, "sets"),
        }
    }
}
