//! Dotted path lookup: `a.b[0].c`, optionally prefixed with `$`.

use super::{ReadOnlyView, VariantRead};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step<'p> {
    Member(&'p str),
    Index(usize),
}

fn parse(path: &str) -> Option<Vec<Step<'_>>> {
    let mut steps = Vec::new();
    let mut rest = path.strip_prefix('$').unwrap_or(path);
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('[') {
            let close = after.find(']')?;
            steps.push(Step::Index(after[..close].trim().parse().ok()?));
            rest = &after[close + 1..];
        } else {
            let body = rest.strip_prefix('.').unwrap_or(rest);
            let end = body.find(|c: char| c == '.' || c == '[').unwrap_or(body.len());
            if end == 0 {
                return None;
            }
            steps.push(Step::Member(&body[..end]));
            rest = &body[end..];
        }
    }
    Some(steps)
}

/// Follow `path` from `root` without allocating.
///
/// A missing step or a malformed path yields an unbound view.
pub fn lookup<'a, V: VariantRead<'a> + ?Sized>(root: &V, path: &str) -> ReadOnlyView<'a> {
    let Some(steps) = parse(path) else {
        return ReadOnlyView::unbound();
    };
    let mut current = root.view();
    for step in steps {
        current = match step {
            Step::Member(key) => current.get_member(key),
            Step::Index(index) => current.get(index),
        };
        if !current.is_bound() {
            break;
        }
    }
    current
}
