//! Leading-token interpretation of classifier responses

/// The yes/no answer a classifier response opens with
///
/// Only the first five characters are inspected, case-insensitively. A
/// response counts as `Yes` when that window mentions "yes" and not "no",
/// as `No` for the converse, and as `Unclear` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Response opens with an affirmative
    Yes,
    /// Response opens with a negative
    No,
    /// Neither or both tokens appear in the leading window
    Unclear,
}

/// Number of leading characters inspected
pub const LEADING_WINDOW: usize = 5;

impl Verdict {
    /// Classify the leading token of a response
    ///
    /// # Examples
    ///
    /// ```
    /// use rootcause_domain::Verdict;
    ///
    /// assert_eq!(Verdict::parse("Yes. The disk filled up."), Verdict::Yes);
    /// assert_eq!(Verdict::parse("NO - user error"), Verdict::No);
    /// assert_eq!(Verdict::parse("Possibly"), Verdict::Unclear);
    /// ```
    pub fn parse(response: &str) -> Self {
        let head: String = response
            .chars()
            .take(LEADING_WINDOW)
            .collect::<String>()
            .to_lowercase();

        match (head.contains("yes"), head.contains("no")) {
            (true, false) => Verdict::Yes,
            (false, true) => Verdict::No,
            _ => Verdict::Unclear,
        }
    }

    /// Whether the response opened with a clear yes or no
    pub fn is_clear(&self) -> bool {
        !matches!(self, Verdict::Unclear)
    }
}
