use std::collections::HashSet;

/// Merges id sequences into one, keeping each id once at its first position.
///
/// Ids are never reordered, only dropped when already seen.
pub fn collect<I, S>(result_sets: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for id in result_sets.into_iter().flatten() {
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }
    ids
}
