// How a user-id filter is compared against stored ids.
// Export matches substrings; the analytics charts match exactly.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserIdMatch {
    Exact,
    Substring,
}
