use crate::core::normalize::normalize;

/// A search result that can be compared against a catalog entry.
pub trait Candidate {
    fn title(&self) -> &str;
    fn artist(&self) -> &str;
}

/// Picks the candidate matching `title` by artist `artist`.
///
/// The first candidate with an equal normalized title and an artist that
/// equals, contains or is contained in the target artist wins. Without such
/// a candidate the first one is returned, since providers rank by relevance.
pub fn best_match<'a, C: Candidate>(candidates: &'a [C], artist: &str, title: &str) -> Option<&'a C> {
    let n_artist = normalize(artist);
    let n_title = normalize(title);

    candidates
        .iter()
        .find(|c| {
            let c_title = normalize(c.title());
            let c_artist = normalize(c.artist());
            c_title == n_title
                && (c_artist == n_artist
                    || c_artist.contains(&n_artist)
                    || n_artist.contains(&c_artist))
        })
        .or_else(|| candidates.first())
}
